//! Generated project assembly
//!
//! Combines the unit and end-to-end plans with a build descriptor and entry
//! point, writes the project next to the solution manifest and registers it.

use crate::config::HarnessConfig;
use crate::csproj::{BuildDescriptor, PROGRAM_SOURCE};
use crate::e2e::plan_e2e;
use crate::error::{HarnessError, HarnessResult};
use crate::solution::register_project;
use crate::unit::{plan_unit, HarnessSource};
use autobench_model::{BuildTool, ProjectModel};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Which generated project to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HarnessKind {
    /// Per-type unit harnesses
    Unit,
    /// Per-project end-to-end harnesses
    EndToEnd,
}

impl std::fmt::Display for HarnessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HarnessKind::Unit => write!(f, "unit"),
            HarnessKind::EndToEnd => write!(f, "e2e"),
        }
    }
}

/// Everything needed to write one generated project
#[derive(Debug, Clone)]
pub struct ProjectPlan {
    /// Generated project name (`<Solution>.<Suffix>`)
    pub name: String,
    /// Generated project directory
    pub dir: PathBuf,
    /// Build descriptor contents
    pub descriptor: BuildDescriptor,
    /// Harness classes
    pub harnesses: Vec<HarnessSource>,
}

impl ProjectPlan {
    /// Path of the generated `.csproj`
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(format!("{}.csproj", self.name))
    }

    /// Harness class names, in file order
    #[must_use]
    pub fn class_names(&self) -> Vec<String> {
        self.harnesses.iter().map(|h| h.class_name.clone()).collect()
    }
}

/// A generated project written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProject {
    /// Generated project name
    pub name: String,
    /// Generated project directory
    pub dir: PathBuf,
    /// Path of the `.csproj`
    pub manifest_path: PathBuf,
    /// Harness class names
    pub harness_classes: Vec<String>,
}

/// Writes and registers generated harness projects
#[derive(Clone)]
pub struct HarnessGenerator {
    config: HarnessConfig,
    build_tool: Arc<dyn BuildTool>,
}

impl std::fmt::Debug for HarnessGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarnessGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HarnessGenerator {
    /// Create generator
    #[must_use]
    pub fn new(config: HarnessConfig, build_tool: Arc<dyn BuildTool>) -> Self {
        Self { config, build_tool }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Plan a generated project without touching the filesystem
    ///
    /// # Errors
    /// Returns `InvalidSolutionPath` if the solution has no directory or name.
    pub fn plan(
        &self,
        solution: &Path,
        projects: &[ProjectModel],
        kind: HarnessKind,
    ) -> HarnessResult<ProjectPlan> {
        let invalid = || HarnessError::InvalidSolutionPath(solution.to_path_buf());
        let solution_dir = solution.parent().ok_or_else(invalid)?;
        let solution_name = solution
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(invalid)?;

        let (suffix, harnesses, exercised, web_testing, hub_client) = match kind {
            HarnessKind::Unit => {
                let plan = plan_unit(projects, &self.config);
                (&self.config.unit_suffix, plan.harnesses, plan.exercised, false, false)
            }
            HarnessKind::EndToEnd => {
                let plan = plan_e2e(projects, &self.config);
                (
                    &self.config.e2e_suffix,
                    plan.harnesses,
                    plan.exercised,
                    plan.web_testing,
                    plan.hub_client,
                )
            }
        };

        let name = format!("{}.{}", solution_name, suffix);
        Ok(ProjectPlan {
            dir: solution_dir.join(&name),
            name,
            descriptor: BuildDescriptor {
                references: exercised.iter().map(|&idx| projects[idx].path.clone()).collect(),
                web_testing,
                hub_client,
            },
            harnesses,
        })
    }

    /// Write a planned project to disk
    ///
    /// # Errors
    /// Returns `Io` if a directory or file cannot be written.
    pub async fn write(&self, plan: &ProjectPlan) -> HarnessResult<()> {
        tokio::fs::create_dir_all(&plan.dir)
            .await
            .map_err(|e| HarnessError::io_error(&plan.dir, e))?;

        let manifest = plan.manifest_path();
        write_file(&manifest, &plan.descriptor.render(&plan.dir, &self.config)).await?;
        write_file(&plan.dir.join("Program.cs"), PROGRAM_SOURCE).await?;
        for harness in &plan.harnesses {
            write_file(&plan.dir.join(harness.file_name()), &harness.source).await?;
        }
        Ok(())
    }

    /// Plan, write and register one generated project
    ///
    /// # Errors
    /// Propagates planning, IO and registration errors.
    pub async fn generate(
        &self,
        solution: &Path,
        projects: &[ProjectModel],
        kind: HarnessKind,
    ) -> HarnessResult<GeneratedProject> {
        let plan = self.plan(solution, projects, kind)?;
        self.write(&plan).await?;

        let manifest_path = plan.manifest_path();
        register_project(solution, &manifest_path, self.build_tool.as_ref()).await?;

        info!(
            project = %plan.name,
            kind = %kind,
            harnesses = plan.harnesses.len(),
            references = plan.descriptor.references.len(),
            "Generated harness project"
        );
        Ok(GeneratedProject {
            harness_classes: plan.class_names(),
            name: plan.name,
            dir: plan.dir,
            manifest_path,
        })
    }

    /// Generate the unit harness project
    ///
    /// # Errors
    /// See [`HarnessGenerator::generate`].
    pub async fn generate_unit(
        &self,
        solution: &Path,
        projects: &[ProjectModel],
    ) -> HarnessResult<GeneratedProject> {
        self.generate(solution, projects, HarnessKind::Unit).await
    }

    /// Generate the end-to-end harness project
    ///
    /// # Errors
    /// See [`HarnessGenerator::generate`].
    pub async fn generate_e2e(
        &self,
        solution: &Path,
        projects: &[ProjectModel],
    ) -> HarnessResult<GeneratedProject> {
        self.generate(solution, projects, HarnessKind::EndToEnd).await
    }
}

async fn write_file(path: &Path, contents: &str) -> HarnessResult<()> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| HarnessError::io_error(path, e))
}
