//! Execution runner
//!
//! Each run starts one platform process and turns its outcome into a
//! [`BenchmarkSummary`]. Runs never fail as a whole: a spawn error or a
//! non-zero exit becomes a failed summary.

use crate::results::{collect_results, results_dir, ARTIFACTS_DIR};
use autobench_model::{BenchmarkSummary, BuildTool, RunRequest};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Runs generated projects through a [`BuildTool`]
#[derive(Clone)]
pub struct ExecutionRunner {
    build_tool: Arc<dyn BuildTool>,
}

impl std::fmt::Debug for ExecutionRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionRunner").finish_non_exhaustive()
    }
}

impl ExecutionRunner {
    /// Create runner
    #[must_use]
    pub fn new(build_tool: Arc<dyn BuildTool>) -> Self {
        Self { build_tool }
    }

    /// Run every benchmark in a generated project
    pub async fn run(&self, project_dir: &Path) -> BenchmarkSummary {
        self.execute(project_name(project_dir), RunRequest::new(project_dir))
            .await
    }

    /// Run one filtered process per harness class, at most `cap` at a time
    ///
    /// Each partition writes to its own artifacts directory and yields its own
    /// summary, in partition order. `namespace` is the harness classes'
    /// namespace; filters are anchored on it.
    pub async fn run_partitioned(
        &self,
        project_dir: &Path,
        namespace: &str,
        partitions: &[String],
        cap: usize,
    ) -> Vec<BenchmarkSummary> {
        let project = project_name(project_dir);
        let artifacts_root = project_dir.join(ARTIFACTS_DIR);

        stream::iter(partitions.iter().map(|class| {
            let request = RunRequest::new(project_dir)
                .with_filter(partition_filter(namespace, class))
                .with_artifacts_dir(artifacts_root.join(class));
            self.execute(format!("{project} [{class}]"), request)
        }))
        .buffered(cap.max(1))
        .collect()
        .await
    }

    async fn execute(&self, name: String, request: RunRequest) -> BenchmarkSummary {
        let executed_at = Utc::now();
        info!(project = %name, filter = ?request.filter, "Running benchmarks");

        let output = match self.build_tool.build_and_run(&request).await {
            Ok(output) => output,
            Err(e) => {
                warn!(project = %name, error = %e, "Benchmark process could not run");
                return BenchmarkSummary::failed(name, executed_at, e.to_string());
            }
        };

        if !output.success() {
            warn!(project = %name, exit_code = output.exit_code, "Benchmark run failed");
            return BenchmarkSummary::failed(
                name,
                executed_at,
                format!(
                    "Benchmark execution failed with exit code {}: {}",
                    output.exit_code, output.stderr
                ),
            );
        }

        let dir = results_dir(&request.project_dir, request.artifacts_dir.as_deref());
        let results = collect_results(&dir).await;
        info!(project = %name, results = results.len(), "Benchmark run complete");
        BenchmarkSummary::succeeded(name, executed_at, results)
    }
}

/// Filter selecting exactly one harness class's benchmarks
///
/// Anchored on the full name so a class never matches another class whose
/// name merely contains it.
#[must_use]
pub fn partition_filter(namespace: &str, class: &str) -> String {
    if namespace.is_empty() {
        format!("{class}.*")
    } else {
        format!("{namespace}.{class}.*")
    }
}

fn project_name(project_dir: &Path) -> String {
    project_dir
        .file_name()
        .map_or_else(|| project_dir.display().to_string(), |n| n.to_string_lossy().into_owned())
}
