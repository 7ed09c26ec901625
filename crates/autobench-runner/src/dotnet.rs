//! `dotnet` command-line platform

use async_trait::async_trait;
use autobench_model::{BuildTool, PlatformError, ProcessOutput, RunRequest};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Filter that selects every benchmark without prompting
pub const MATCH_ALL_FILTER: &str = "*";

/// [`BuildTool`] backed by the `dotnet` CLI
#[derive(Debug, Clone)]
pub struct DotnetCli {
    program: String,
}

impl Default for DotnetCli {
    fn default() -> Self {
        Self {
            program: "dotnet".to_string(),
        }
    }
}

impl DotnetCli {
    /// Create with the default `dotnet` binary
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a different binary
    #[inline]
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    async fn execute(&self, dir: &Path, args: &[String]) -> Result<ProcessOutput, PlatformError> {
        debug!(program = %self.program, dir = %dir.display(), args = ?args, "Starting process");
        let child = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PlatformError::spawn(&self.program, dir, e))?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| PlatformError::io(&self.program, e))?;

        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Arguments for an optimized build-and-run of a harness project
#[must_use]
pub fn run_arguments(request: &RunRequest) -> Vec<String> {
    let mut args: Vec<String> = ["run", "-c", "Release", "--", "--exporters"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    args.push(request.exporter.clone());
    args.push("--filter".to_string());
    args.push(
        request
            .filter
            .clone()
            .unwrap_or_else(|| MATCH_ALL_FILTER.to_string()),
    );
    if let Some(dir) = &request.artifacts_dir {
        args.push("--artifacts".to_string());
        args.push(dir.display().to_string());
    }
    args
}

/// Arguments registering a project into a legacy solution
#[must_use]
pub fn add_arguments(solution: &Path, project: &Path) -> Vec<String> {
    vec![
        "sln".to_string(),
        solution.display().to_string(),
        "add".to_string(),
        project.display().to_string(),
    ]
}

#[async_trait]
impl BuildTool for DotnetCli {
    async fn build_and_run(&self, request: &RunRequest) -> Result<ProcessOutput, PlatformError> {
        self.execute(&request.project_dir, &run_arguments(request)).await
    }

    async fn add_to_solution(
        &self,
        solution: &Path,
        project: &Path,
    ) -> Result<ProcessOutput, PlatformError> {
        let dir = solution.parent().unwrap_or_else(|| Path::new("."));
        self.execute(dir, &add_arguments(solution, project)).await
    }
}
