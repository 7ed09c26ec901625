//! Result model
//!
//! What the execution runner produces and the report renderers consume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// One measured operation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Display name (last dot-separated segment of the benchmark identifier)
    pub name: String,
    /// Measured operation (harness method) name
    pub method: String,
    /// Mean duration in nanoseconds
    pub mean_ns: f64,
    /// Standard deviation in nanoseconds
    pub stddev_ns: f64,
    /// Bytes allocated per operation
    pub allocated_bytes: f64,
    /// Set when the entry carried no usable statistics
    pub error: Option<String>,
}

impl BenchmarkResult {
    /// Create a result for a measured operation
    #[must_use]
    pub fn new(name: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: method.into(),
            ..Self::default()
        }
    }

    /// With mean duration
    #[must_use]
    pub fn with_mean_ns(mut self, mean_ns: f64) -> Self {
        self.mean_ns = mean_ns;
        self
    }

    /// With standard deviation
    #[must_use]
    pub fn with_stddev_ns(mut self, stddev_ns: f64) -> Self {
        self.stddev_ns = stddev_ns;
        self
    }

    /// With allocation
    #[must_use]
    pub fn with_allocated_bytes(mut self, bytes: f64) -> Self {
        self.allocated_bytes = bytes;
        self
    }

    /// With error
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Whether the entry carries usable statistics
    #[inline]
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.error.is_none()
    }

    /// Mean in microseconds
    #[inline]
    #[must_use]
    pub fn mean_us(&self) -> f64 {
        self.mean_ns / 1_000.0
    }

    /// Mean in milliseconds
    #[inline]
    #[must_use]
    pub fn mean_ms(&self) -> f64 {
        self.mean_ns / 1_000_000.0
    }

    /// Mean in seconds
    #[inline]
    #[must_use]
    pub fn mean_secs(&self) -> f64 {
        self.mean_ns / NANOS_PER_SECOND
    }

    /// Allocation in kilobytes
    #[inline]
    #[must_use]
    pub fn allocated_kb(&self) -> f64 {
        self.allocated_bytes / 1024.0
    }

    /// Allocation in megabytes
    #[inline]
    #[must_use]
    pub fn allocated_mb(&self) -> f64 {
        self.allocated_bytes / (1024.0 * 1024.0)
    }

    /// Operations per second; zero for a non-positive mean
    #[inline]
    #[must_use]
    pub fn throughput(&self) -> f64 {
        if self.mean_ns > 0.0 {
            NANOS_PER_SECOND / self.mean_ns
        } else {
            0.0
        }
    }
}

/// Outcome of running one generated project
///
/// Built through [`BenchmarkSummary::succeeded`] or [`BenchmarkSummary::failed`]
/// so a failed summary always has an error message and no results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSummary {
    /// Generated project name
    pub project_name: String,
    /// Parsed results, in file then entry order
    pub results: Vec<BenchmarkResult>,
    /// When the run started
    pub executed_at: DateTime<Utc>,
    /// Whether the platform run succeeded
    pub success: bool,
    /// Failure description (empty on success)
    pub error_message: String,
}

impl BenchmarkSummary {
    /// Successful run with its results
    #[must_use]
    pub fn succeeded(
        project_name: impl Into<String>,
        executed_at: DateTime<Utc>,
        results: Vec<BenchmarkResult>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            results,
            executed_at,
            success: true,
            error_message: String::new(),
        }
    }

    /// Failed run; an empty message is replaced with a generic one
    #[must_use]
    pub fn failed(
        project_name: impl Into<String>,
        executed_at: DateTime<Utc>,
        error_message: impl Into<String>,
    ) -> Self {
        let mut error_message = error_message.into();
        if error_message.trim().is_empty() {
            error_message = "benchmark run failed without diagnostic output".to_string();
        }
        Self {
            project_name: project_name.into(),
            results: Vec::new(),
            executed_at,
            success: false,
            error_message,
        }
    }

    /// Number of measured operations
    #[inline]
    #[must_use]
    pub fn result_count(&self) -> usize {
        self.results.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unit_conversions() {
        let result = BenchmarkResult::new("Measure_Run", "Measure_Run")
            .with_mean_ns(150_000_000.0)
            .with_allocated_bytes(204_800.0);

        assert!((result.mean_ms() - 150.0).abs() < f64::EPSILON);
        assert!((result.allocated_kb() - 200.0).abs() < f64::EPSILON);
        assert!((result.throughput() - 1e9 / 150_000_000.0).abs() < 1e-9);
    }

    #[test]
    fn zero_mean_has_zero_throughput() {
        let result = BenchmarkResult::new("x", "x");
        assert_eq!(result.throughput(), 0.0);
    }

    #[test]
    fn failed_summary_never_has_results_or_empty_message() {
        let summary = BenchmarkSummary::failed("App.UnitBenchmarks", Utc::now(), "   ");
        assert!(!summary.success);
        assert!(summary.results.is_empty());
        assert!(!summary.error_message.is_empty());
    }

    #[test]
    fn succeeded_summary_keeps_results() {
        let results = vec![BenchmarkResult::new("a", "a"), BenchmarkResult::new("b", "b")];
        let summary = BenchmarkSummary::succeeded("App.E2EBenchmarks", Utc::now(), results);
        assert!(summary.success);
        assert_eq!(summary.result_count(), 2);
        assert!(summary.error_message.is_empty());
    }

    proptest! {
        #[test]
        fn failed_summary_message_is_never_empty(message in ".*") {
            let summary = BenchmarkSummary::failed("p", Utc::now(), message);
            prop_assert!(!summary.error_message.trim().is_empty());
            prop_assert!(summary.results.is_empty());
        }
    }
}
