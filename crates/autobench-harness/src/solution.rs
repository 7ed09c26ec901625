//! Solution manifest registration
//!
//! `.slnx` manifests are edited in place and registration is idempotent on the
//! normalized relative path. Legacy `.sln` manifests are handed to the
//! platform's solution command.

use crate::error::{HarnessError, HarnessResult};
use crate::paths::{normalize, relative_path};
use autobench_analysis::manifest::{SolutionFormat, SLNX_PROJECT};
use autobench_model::BuildTool;
use std::path::Path;
use tracing::{debug, info};

/// Outcome of a registration attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The project entry was added
    Added,
    /// An equivalent entry already existed
    AlreadyPresent,
}

/// Insert a `<Project Path=".."/>` element before the closing root tag
///
/// Returns `Ok(None)` when an entry with the same normalized path exists.
///
/// # Errors
/// Returns `MalformedManifest` if the document has no closing `</Solution>`.
pub fn insert_slnx_project(
    manifest_path: &Path,
    text: &str,
    relative: &str,
) -> HarnessResult<Option<String>> {
    let wanted = normalize(relative);
    let exists = SLNX_PROJECT
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .any(|path| normalize(path.as_str()) == wanted);
    if exists {
        return Ok(None);
    }

    let close = text
        .to_ascii_lowercase()
        .rfind("</solution>")
        .ok_or_else(|| HarnessError::MalformedManifest(manifest_path.to_path_buf()))?;

    let mut updated = String::with_capacity(text.len() + relative.len() + 32);
    updated.push_str(&text[..close]);
    if !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(&format!("  <Project Path=\"{}\" />\n", relative));
    updated.push_str(&text[close..]);
    Ok(Some(updated))
}

/// Register a generated project into the solution manifest
///
/// # Errors
/// Unsupported manifest extensions, unreadable or malformed `.slnx` files and
/// a failing platform command for `.sln` files are errors.
pub async fn register_project(
    solution: &Path,
    project_manifest: &Path,
    build_tool: &dyn BuildTool,
) -> HarnessResult<Registration> {
    let format = SolutionFormat::from_path(solution)
        .map_err(|_| HarnessError::UnsupportedManifest(solution.to_path_buf()))?;

    match format {
        SolutionFormat::Slnx => {
            let solution_dir = solution
                .parent()
                .ok_or_else(|| HarnessError::InvalidSolutionPath(solution.to_path_buf()))?;
            let relative = relative_path(solution_dir, project_manifest);

            let text = tokio::fs::read_to_string(solution)
                .await
                .map_err(|e| HarnessError::io_error(solution, e))?;
            match insert_slnx_project(solution, &text, &relative)? {
                Some(updated) => {
                    tokio::fs::write(solution, updated)
                        .await
                        .map_err(|e| HarnessError::io_error(solution, e))?;
                    info!(solution = %solution.display(), project = %relative, "Registered project");
                    Ok(Registration::Added)
                }
                None => {
                    debug!(solution = %solution.display(), project = %relative, "Project already registered");
                    Ok(Registration::AlreadyPresent)
                }
            }
        }
        SolutionFormat::Sln => {
            let output = build_tool.add_to_solution(solution, project_manifest).await?;
            if !output.success() {
                return Err(HarnessError::Registration {
                    solution: solution.to_path_buf(),
                    project: project_manifest.to_path_buf(),
                    exit_code: output.exit_code,
                    stderr: output.stderr,
                });
            }
            info!(solution = %solution.display(), project = %project_manifest.display(), "Registered project");
            Ok(Registration::Added)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autobench_model::ProcessOutput;
    use autobench_test_utils::MockBuildTool;
    use pretty_assertions::assert_eq;

    const SLNX: &str = "<Solution>\n  <Project Path=\"src/App/App.csproj\" />\n</Solution>\n";

    #[test]
    fn insert_before_closing_tag() {
        let updated = insert_slnx_project(
            Path::new("App.slnx"),
            SLNX,
            "App.UnitBenchmarks/App.UnitBenchmarks.csproj",
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            updated,
            "<Solution>\n  <Project Path=\"src/App/App.csproj\" />\n  <Project Path=\"App.UnitBenchmarks/App.UnitBenchmarks.csproj\" />\n</Solution>\n"
        );
    }

    #[test]
    fn existing_entry_matches_case_and_separator_insensitively() {
        let result = insert_slnx_project(Path::new("App.slnx"), SLNX, "SRC\\App\\app.csproj").unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn missing_root_is_malformed() {
        let result = insert_slnx_project(Path::new("App.slnx"), "<Other />", "a.csproj");
        assert!(matches!(result, Err(HarnessError::MalformedManifest(_))));
    }

    #[tokio::test]
    async fn registering_twice_yields_one_entry() {
        let temp = tempfile::tempdir().unwrap();
        let solution = temp.path().join("App.slnx");
        std::fs::write(&solution, SLNX).unwrap();
        let project = temp.path().join("App.UnitBenchmarks/App.UnitBenchmarks.csproj");
        let tool = MockBuildTool::new();

        let first = register_project(&solution, &project, &tool).await.unwrap();
        let second = register_project(&solution, &project, &tool).await.unwrap();

        assert_eq!(first, Registration::Added);
        assert_eq!(second, Registration::AlreadyPresent);
        let text = std::fs::read_to_string(&solution).unwrap();
        assert_eq!(text.matches("App.UnitBenchmarks.csproj").count(), 1);
    }

    #[tokio::test]
    async fn legacy_solution_uses_platform() {
        let mut tool = MockBuildTool::new();
        tool.expect_add_to_solution()
            .times(1)
            .returning(|_, _| Ok(ProcessOutput::ok()));

        let result = register_project(
            Path::new("/repo/Juno.sln"),
            Path::new("/repo/Juno.E2EBenchmarks/Juno.E2EBenchmarks.csproj"),
            &tool,
        )
        .await
        .unwrap();
        assert_eq!(result, Registration::Added);
    }

    #[tokio::test]
    async fn legacy_solution_failure_is_fatal() {
        let mut tool = MockBuildTool::new();
        tool.expect_add_to_solution()
            .returning(|_, _| Ok(ProcessOutput::failed(1, "invalid solution")));

        let err = register_project(Path::new("/repo/Juno.sln"), Path::new("/repo/p.csproj"), &tool)
            .await
            .unwrap_err();
        assert!(matches!(err, HarnessError::Registration { exit_code: 1, .. }));
    }

    #[tokio::test]
    async fn other_extensions_are_rejected() {
        let tool = MockBuildTool::new();
        let err = register_project(Path::new("/repo/App.sln.bak"), Path::new("/repo/p.csproj"), &tool)
            .await
            .unwrap_err();
        assert!(matches!(err, HarnessError::UnsupportedManifest(_)));
    }
}
