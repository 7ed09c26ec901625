//! Solution discovery and isolated artifact copies

use crate::error::CopyError;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Directory names never copied (compared case-insensitively)
pub const EXCLUDED_DIRS: [&str; 3] = ["bin", "obj", ".git"];

/// Whether a directory name is excluded from copies and discovery
#[must_use]
pub fn is_excluded_dir(name: &str) -> bool {
    EXCLUDED_DIRS.iter().any(|excluded| name.eq_ignore_ascii_case(excluded))
}

fn is_excluded(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && is_excluded_dir(&entry.file_name().to_string_lossy())
}

fn is_solution_manifest(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("slnx") || ext.eq_ignore_ascii_case("sln"))
}

/// Find every `.slnx` and `.sln` below `dir`, sorted by path
///
/// A missing directory yields nothing.
#[must_use]
pub fn discover_solutions(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "Solutions directory does not exist");
        return Vec::new();
    }

    let mut solutions: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_solution_manifest(entry.path()))
        .map(DirEntry::into_path)
        .collect();
    solutions.sort();

    info!(dir = %dir.display(), count = solutions.len(), "Discovered solutions");
    solutions
}

/// Name used for a solution's artifact copy: its directory name
#[must_use]
pub fn solution_dir_name(solution: &Path) -> Option<String> {
    solution
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
}

/// Clear read-only flags on every file below `dir`
///
/// # Errors
/// Returns an error if the tree cannot be walked or a permission change fails.
pub fn clear_read_only(dir: &Path) -> Result<(), CopyError> {
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let mut permissions = entry.metadata()?.permissions();
        if permissions.readonly() {
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
            std::fs::set_permissions(entry.path(), permissions)
                .map_err(|e| CopyError::io_error(entry.path(), e))?;
        }
    }
    Ok(())
}

/// Copy a solution's directory into `<artifacts>/<dir name>` and return the
/// copied manifest path
///
/// A previous copy is deleted first. `bin`, `obj` and `.git` are skipped.
///
/// # Errors
/// Returns an error for a solution without a directory or any IO failure.
pub fn copy_solution(solution: &Path, artifacts_dir: &Path) -> Result<PathBuf, CopyError> {
    let invalid = || CopyError::InvalidSolutionPath(solution.to_path_buf());
    let source_dir = solution.parent().ok_or_else(invalid)?;
    let dir_name = solution_dir_name(solution).ok_or_else(invalid)?;
    let manifest_name = solution.file_name().ok_or_else(invalid)?;
    let target_dir = artifacts_dir.join(&dir_name);

    if target_dir.exists() {
        info!(dir = %target_dir.display(), "Cleaning existing artifact copy");
        clear_read_only(&target_dir)?;
        std::fs::remove_dir_all(&target_dir).map_err(|e| CopyError::io_error(&target_dir, e))?;
    }

    info!(solution = %dir_name, target = %target_dir.display(), "Copying solution");
    let mut files = 0usize;
    for entry in WalkDir::new(source_dir)
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry))
    {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|_| CopyError::InvalidSolutionPath(entry.path().to_path_buf()))?;
        let target = target_dir.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| CopyError::io_error(&target, e))?;
        } else if entry.file_type().is_file() {
            std::fs::copy(entry.path(), &target).map_err(|e| CopyError::io_error(&target, e))?;
            files += 1;
        }
    }
    debug!(solution = %dir_name, files, "Solution copied");

    Ok(target_dir.join(manifest_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use autobench_test_utils::write_file;
    use pretty_assertions::assert_eq;

    #[test]
    fn discovery_is_sorted_and_skips_build_output() {
        let temp = tempfile::tempdir().unwrap();
        write_file(&temp.path().join("Zeta/Zeta.sln"), "");
        write_file(&temp.path().join("Alpha/Alpha.slnx"), "<Solution />");
        write_file(&temp.path().join("Alpha/bin/Stale.slnx"), "<Solution />");
        write_file(&temp.path().join("Alpha/notes.txt"), "");

        let found = discover_solutions(temp.path());
        assert_eq!(
            found,
            vec![temp.path().join("Alpha/Alpha.slnx"), temp.path().join("Zeta/Zeta.sln")]
        );
    }

    #[test]
    fn missing_directory_discovers_nothing() {
        let temp = tempfile::tempdir().unwrap();
        assert!(discover_solutions(&temp.path().join("absent")).is_empty());
    }

    #[test]
    fn copy_excludes_build_and_vcs_dirs() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("solutions/Apollo");
        write_file(&source.join("Apollo.slnx"), "<Solution />");
        write_file(&source.join("src/App/App.cs"), "class A {}");
        write_file(&source.join("src/App/BIN/App.dll"), "");
        write_file(&source.join("src/App/obj/x.json"), "");
        write_file(&source.join(".git/HEAD"), "");

        let artifacts = temp.path().join("artifacts");
        let copied = copy_solution(&source.join("Apollo.slnx"), &artifacts).unwrap();

        assert_eq!(copied, artifacts.join("Apollo/Apollo.slnx"));
        assert!(copied.is_file());
        assert!(artifacts.join("Apollo/src/App/App.cs").is_file());
        assert!(!artifacts.join("Apollo/src/App/BIN").exists());
        assert!(!artifacts.join("Apollo/src/App/obj").exists());
        assert!(!artifacts.join("Apollo/.git").exists());
    }

    #[test]
    fn read_only_previous_copy_is_replaced() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("solutions/Apollo");
        write_file(&source.join("Apollo.slnx"), "<Solution />");
        let artifacts = temp.path().join("artifacts");

        let stale = artifacts.join("Apollo/stale.txt");
        write_file(&stale, "old");
        let mut permissions = std::fs::metadata(&stale).unwrap().permissions();
        permissions.set_readonly(true);
        std::fs::set_permissions(&stale, permissions).unwrap();

        copy_solution(&source.join("Apollo.slnx"), &artifacts).unwrap();
        assert!(!stale.exists());
        assert!(artifacts.join("Apollo/Apollo.slnx").is_file());
    }
}
