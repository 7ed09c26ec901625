//! Error types for solution loading and extraction

use std::path::PathBuf;

/// Errors raised while loading a solution into a source model
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The solution manifest does not exist
    #[error("solution not found: {0}")]
    SolutionNotFound(PathBuf),

    /// The manifest extension is neither `.slnx` nor `.sln`
    #[error("unsupported solution manifest: {0}")]
    UnsupportedManifest(PathBuf),

    /// IO error while reading sources
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The language grammar could not be loaded
    #[error("parser initialization failed: {0}")]
    ParserInit(String),

    /// A source file produced no syntax tree
    #[error("failed to parse {0}")]
    ParseFailed(PathBuf),

    /// A background parse task did not complete
    #[error("analysis task failed: {0}")]
    Task(String),
}

impl AnalysisError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
