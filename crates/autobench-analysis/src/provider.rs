//! Source-model provider seam
//!
//! The codebase under analysis is only reached through this trait. A provider
//! loads a solution into projects with their manifests and parsed compilation
//! units, and answers simple type-resolution queries across the solution.

use crate::error::AnalysisResult;
use autobench_model::syntax::{CompilationUnit, TypeDecl};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

static QUALIFIED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*").expect("name regex"));

/// Loads a solution into a source model
#[async_trait::async_trait]
pub trait SourceModelProvider: Send + Sync {
    /// Load every project listed by the solution manifest
    ///
    /// # Errors
    /// Missing solution files and unsupported manifest extensions are errors;
    /// unreadable individual projects are not.
    async fn load_solution(&self, solution_path: &Path) -> AnalysisResult<SolutionSource>;
}

/// One project as seen by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceProject {
    /// Project name (manifest file stem)
    pub name: String,
    /// Path to the project manifest
    pub manifest_path: PathBuf,
    /// Manifest text, `None` when it could not be read
    pub manifest_text: Option<String>,
    /// Parsed compilation units
    pub units: Vec<CompilationUnit>,
}

impl SourceProject {
    /// Create a project without sources
    #[must_use]
    pub fn new(name: impl Into<String>, manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            manifest_path: manifest_path.into(),
            manifest_text: None,
            units: Vec::new(),
        }
    }

    /// With manifest text
    #[must_use]
    pub fn with_manifest(mut self, text: impl Into<String>) -> Self {
        self.manifest_text = Some(text.into());
        self
    }

    /// With compilation unit
    #[must_use]
    pub fn with_unit(mut self, unit: CompilationUnit) -> Self {
        self.units.push(unit);
        self
    }

    /// Every type declaration, in unit then source order
    pub fn type_decls(&self) -> impl Iterator<Item = &TypeDecl> {
        self.units.iter().flat_map(|unit| unit.types.iter())
    }
}

/// A loaded solution with a cross-project type index
#[derive(Debug, Clone)]
pub struct SolutionSource {
    /// Solution manifest path
    pub path: PathBuf,
    /// Projects in manifest order
    pub projects: Vec<SourceProject>,
    index: TypeIndex,
}

impl SolutionSource {
    /// Build a solution and index its declared types
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, projects: Vec<SourceProject>) -> Self {
        let index = TypeIndex::build(&projects);
        Self {
            path: path.into(),
            projects,
            index,
        }
    }

    /// Solution name (manifest file stem)
    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Resolve a written type name to a declared full name
    #[must_use]
    pub fn resolve_type(&self, written: &str) -> Option<&str> {
        self.index.resolve(written)
    }

    /// Base types of a declared type, as written
    #[must_use]
    pub fn base_types_of(&self, full_name: &str) -> &[String] {
        self.index.bases_of(full_name)
    }

    /// Rewrite every resolvable name inside a type signature to its full name
    #[must_use]
    pub fn qualify(&self, type_sig: &str) -> String {
        QUALIFIED_NAME
            .replace_all(type_sig, |caps: &regex::Captures<'_>| {
                let name = &caps[0];
                self.index.resolve(name).unwrap_or(name).to_string()
            })
            .into_owned()
    }

    /// Simple names of every ancestor reachable from the written base types
    ///
    /// Declared types are followed through their own bases; unknown names end
    /// the walk. Each name is visited once, so cyclic declarations terminate.
    #[must_use]
    pub fn ancestor_names(&self, bases: &[String]) -> Vec<String> {
        let mut queue: VecDeque<String> = bases.iter().cloned().collect();
        let mut seen = HashSet::new();
        let mut names = Vec::new();

        while let Some(base) = queue.pop_front() {
            let simple = simple_name(&base).to_string();
            if !seen.insert(base.clone()) {
                continue;
            }
            names.push(simple);
            if let Some(full) = self.index.resolve(&base) {
                queue.extend(self.index.bases_of(full).iter().cloned());
            }
        }
        names
    }
}

/// Simple name of a possibly qualified, possibly generic type
#[must_use]
pub fn simple_name(written: &str) -> &str {
    let base = written.split('<').next().unwrap_or(written).trim();
    base.rsplit('.').next().unwrap_or(base)
}

#[derive(Debug, Clone, Default)]
struct TypeIndex {
    by_simple: HashMap<String, Vec<String>>,
    bases: HashMap<String, Vec<String>>,
}

impl TypeIndex {
    fn build(projects: &[SourceProject]) -> Self {
        let mut index = Self::default();
        for decl in projects.iter().flat_map(SourceProject::type_decls) {
            let full = decl.full_name();
            index
                .by_simple
                .entry(decl.name.clone())
                .or_default()
                .push(full.clone());
            index
                .bases
                .entry(full)
                .or_insert_with(|| decl.base_types.clone());
        }
        index
    }

    /// First declared match wins for ambiguous simple names
    fn resolve(&self, written: &str) -> Option<&str> {
        let name = written.split('<').next().unwrap_or(written).trim();
        let name = name.strip_prefix("global::").unwrap_or(name);

        if let Some((full, _)) = self.bases.get_key_value(name) {
            return Some(full.as_str());
        }

        let simple = simple_name(name);
        let candidates = self.by_simple.get(simple)?;
        if name.contains('.') {
            candidates
                .iter()
                .find(|full| full.ends_with(&format!(".{}", name)))
                .map(String::as_str)
        } else {
            candidates.first().map(String::as_str)
        }
    }

    fn bases_of(&self, full_name: &str) -> &[String] {
        self.bases.get(full_name).map_or(&[], Vec::as_slice)
    }
}
