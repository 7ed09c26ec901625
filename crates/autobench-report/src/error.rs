//! Error types for report output

use std::path::PathBuf;

/// Errors raised while writing reports
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A report file or its directory could not be written
    #[error("io error writing report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for report operations
pub type ReportResult<T> = Result<T, ReportError>;
