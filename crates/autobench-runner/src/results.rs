//! Result file parsing
//!
//! The harness JSON exporter writes one `*-report-full.json` per harness class
//! into `BenchmarkDotNet.Artifacts/results`. Only the fields below are read.

use crate::error::{RunnerError, RunnerResult};
use autobench_model::BenchmarkResult;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Artifacts directory created next to the generated project
pub const ARTIFACTS_DIR: &str = "BenchmarkDotNet.Artifacts";

/// Result file name suffix
pub const REPORT_SUFFIX: &str = "-report-full.json";

/// Error attached to entries that carry no statistics
pub const MISSING_STATISTICS: &str = "no statistics reported";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ReportDocument {
    #[serde(default)]
    benchmarks: Vec<ReportEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ReportEntry {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    statistics: Option<Statistics>,
    #[serde(default)]
    memory: Option<Memory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Statistics {
    #[serde(default)]
    mean: Option<f64>,
    #[serde(default)]
    standard_deviation: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Memory {
    #[serde(default)]
    bytes_allocated_per_operation: Option<f64>,
}

impl ReportEntry {
    fn into_result(self) -> BenchmarkResult {
        let full_name = self.full_name.unwrap_or_default();
        let name = display_name(&full_name).to_string();
        let mut result = BenchmarkResult::new(name, self.method.unwrap_or_default());

        if let Some(bytes) = self.memory.and_then(|m| m.bytes_allocated_per_operation) {
            result = result.with_allocated_bytes(bytes);
        }
        match self.statistics {
            Some(Statistics {
                mean: Some(mean),
                standard_deviation,
            }) => result
                .with_mean_ns(mean)
                .with_stddev_ns(standard_deviation.unwrap_or_default()),
            _ => result.with_error(MISSING_STATISTICS),
        }
    }
}

/// Last dot-separated segment of a benchmark identifier
#[must_use]
pub fn display_name(full_name: &str) -> &str {
    full_name.rsplit('.').next().unwrap_or(full_name)
}

/// Results directory for a run, honoring an artifacts override
#[must_use]
pub fn results_dir(project_dir: &Path, artifacts_dir: Option<&Path>) -> PathBuf {
    artifacts_dir
        .map_or_else(|| project_dir.join(ARTIFACTS_DIR), Path::to_path_buf)
        .join("results")
}

/// Parse one result document
///
/// # Errors
/// Returns `MalformedReport` if the text is not a report document.
pub fn parse_report(path: &Path, text: &str) -> RunnerResult<Vec<BenchmarkResult>> {
    let document: ReportDocument =
        serde_json::from_str(text).map_err(|e| RunnerError::malformed(path, e))?;
    Ok(document
        .benchmarks
        .into_iter()
        .map(ReportEntry::into_result)
        .collect())
}

async fn read_report(path: &Path) -> RunnerResult<Vec<BenchmarkResult>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| RunnerError::io_error(path, e))?;
    parse_report(path, &text)
}

async fn report_files(dir: &Path) -> RunnerResult<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| RunnerError::io_error(dir, e))?;
    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| RunnerError::io_error(dir, e))?
    {
        let path = entry.path();
        let is_report = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(REPORT_SUFFIX));
        if is_report && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Collect results from every report file in `dir`
///
/// A missing directory yields no results. Unreadable or malformed files are
/// logged and skipped.
pub async fn collect_results(dir: &Path) -> Vec<BenchmarkResult> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "No results directory");
        return Vec::new();
    }

    let files = match report_files(dir).await {
        Ok(files) => files,
        Err(e) => {
            warn!(error = %e, "Failed to list result files");
            return Vec::new();
        }
    };

    let mut results = Vec::new();
    for file in files {
        match read_report(&file).await {
            Ok(parsed) => {
                debug!(file = %file.display(), count = parsed.len(), "Parsed result file");
                results.extend(parsed);
            }
            Err(e) => warn!(error = %e, "Skipping result file"),
        }
    }
    results
}
