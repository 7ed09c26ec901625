//! Execution platform seam
//!
//! The external toolchain that builds and runs generated projects and
//! registers them into legacy solution files.

use crate::error::PlatformError;
use std::path::{Path, PathBuf};

/// Captured output of a finished process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// Exit code (`-1` when terminated by a signal)
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ProcessOutput {
    /// Successful output with no text
    #[must_use]
    pub fn ok() -> Self {
        Self::default()
    }

    /// Failed output with stderr text
    #[must_use]
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the process exited with code zero
    #[inline]
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Build-and-run request for one generated project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Generated project directory (also the working directory)
    pub project_dir: PathBuf,
    /// Exporter flag value passed to the harness (`json`)
    pub exporter: String,
    /// Optional benchmark filter pattern
    pub filter: Option<String>,
    /// Optional artifacts directory override
    pub artifacts_dir: Option<PathBuf>,
}

impl RunRequest {
    /// Request a full run of a project with the JSON exporter
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            exporter: "json".to_string(),
            filter: None,
            artifacts_dir: None,
        }
    }

    /// With benchmark filter
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// With artifacts directory
    #[must_use]
    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = Some(dir.into());
        self
    }
}

/// External build tool
///
/// Implementations block on the child process; no timeout is applied.
#[async_trait::async_trait]
pub trait BuildTool: Send + Sync {
    /// Build the project in an optimized configuration and run it
    async fn build_and_run(&self, request: &RunRequest) -> Result<ProcessOutput, PlatformError>;

    /// Register a project into a legacy solution file
    async fn add_to_solution(
        &self,
        solution: &Path,
        project: &Path,
    ) -> Result<ProcessOutput, PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_request_defaults_to_json_exporter() {
        let request = RunRequest::new("/tmp/App.UnitBenchmarks");
        assert_eq!(request.exporter, "json");
        assert!(request.filter.is_none());
        assert!(request.artifacts_dir.is_none());
    }

    #[test]
    fn process_output_success() {
        assert!(ProcessOutput::ok().success());
        assert!(!ProcessOutput::failed(1, "boom").success());
    }
}
