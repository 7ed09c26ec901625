//! Error types for harness generation and registration

use autobench_model::PlatformError;
use std::path::PathBuf;

/// Errors raised while writing or registering a generated project
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The solution path has no parent directory or file stem
    #[error("invalid solution path: {0}")]
    InvalidSolutionPath(PathBuf),

    /// The solution manifest is neither `.slnx` nor `.sln`
    #[error("unsupported solution manifest: {0}")]
    UnsupportedManifest(PathBuf),

    /// An `.slnx` manifest has no root element to append to
    #[error("malformed solution manifest: {0}")]
    MalformedManifest(PathBuf),

    /// The platform refused to register the project
    #[error("failed to add {project} to {solution} (exit code {exit_code}): {stderr}")]
    Registration {
        solution: PathBuf,
        project: PathBuf,
        exit_code: i32,
        stderr: String,
    },

    /// IO error while writing generated files
    #[error("io error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The platform could not be invoked
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}

impl HarnessError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;
