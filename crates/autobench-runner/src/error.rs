//! Error types for result collection

use std::path::PathBuf;

/// Errors raised while reading benchmark result files
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A result file or directory could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A result file is not valid report JSON
    #[error("malformed result file {path}: {source}")]
    MalformedReport {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl RunnerError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create malformed report error for path
    pub fn malformed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::MalformedReport {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for runner operations
pub type RunnerResult<T> = Result<T, RunnerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display_names_file() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RunnerError::malformed("/tmp/a-report-full.json", source);
        assert!(err.to_string().contains("a-report-full.json"));
    }
}
