//! Error types for configuration, artifact copies and the pipeline

use autobench_analysis::AnalysisError;
use autobench_harness::HarnessError;
use autobench_report::ReportError;
use std::path::PathBuf;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("io error reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for the config schema
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An environment override has an unusable value
    #[error("invalid value '{value}' for {name}")]
    InvalidOverride { name: String, value: String },
}

/// Errors raised while copying a solution into the artifacts directory
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// The solution path has no containing directory
    #[error("invalid solution path: {0}")]
    InvalidSolutionPath(PathBuf),

    /// IO error while copying or cleaning
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl CopyError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors that fail one solution's pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Artifact copy failed
    #[error("copy failed: {0}")]
    Copy(#[from] CopyError),

    /// Solution analysis failed
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    /// Harness generation or registration failed
    #[error("generation failed: {0}")]
    Harness(#[from] HarnessError),

    /// Report output failed
    #[error("report failed: {0}")]
    Report(#[from] ReportError),

    /// A blocking task could not complete
    #[error("task failed: {0}")]
    Task(String),

    /// Cancellation was requested before the stage started
    #[error("cancelled")]
    Cancelled,
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_error_converts() {
        let err: PipelineError = AnalysisError::SolutionNotFound(PathBuf::from("/x/App.slnx")).into();
        assert!(matches!(err, PipelineError::Analysis(_)));
        assert!(err.to_string().starts_with("analysis failed"));
    }
}
