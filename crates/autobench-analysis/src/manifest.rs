//! Solution manifest reading
//!
//! Two formats: the XML element listing (`.slnx`) and the legacy text format
//! (`.sln`). Only project paths are read; everything else is ignored.

use crate::error::{AnalysisError, AnalysisResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// `<Project Path="..." />` inside an `.slnx` listing
pub static SLNX_PROJECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<Project\b[^>]*?\bPath\s*=\s*"([^"]+)""#).expect("slnx project regex")
});

static SLN_PROJECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*Project\("\{[^}]*\}"\)\s*=\s*"[^"]*"\s*,\s*"([^"]+\.csproj)""#)
        .expect("sln project regex")
});

/// Solution manifest format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolutionFormat {
    /// XML element listing
    Slnx,
    /// Legacy text format
    Sln,
}

impl SolutionFormat {
    /// Format from the manifest extension (case-insensitive)
    ///
    /// # Errors
    /// Returns `UnsupportedManifest` for any other extension.
    pub fn from_path(path: &Path) -> AnalysisResult<Self> {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
        match ext.as_deref() {
            Some("slnx") => Ok(Self::Slnx),
            Some("sln") => Ok(Self::Sln),
            _ => Err(AnalysisError::UnsupportedManifest(path.to_path_buf())),
        }
    }
}

/// Project manifest paths listed by a solution, resolved against its directory
#[must_use]
pub fn project_paths(solution_path: &Path, text: &str, format: SolutionFormat) -> Vec<PathBuf> {
    let base = solution_path.parent().unwrap_or_else(|| Path::new(""));
    let pattern = match format {
        SolutionFormat::Slnx => &*SLNX_PROJECT,
        SolutionFormat::Sln => &*SLN_PROJECT,
    };

    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().replace('\\', "/"))
        .filter(|rel| rel.to_ascii_lowercase().ends_with(".csproj"))
        .map(|rel| base.join(rel))
        .collect()
}
