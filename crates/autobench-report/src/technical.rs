//! Engineer-facing report
//!
//! Section order is fixed: executive summary, performance overview, one block
//! per successful run, failed runs, interpretation guide.

use crate::format::{format_grouped, format_memory, format_thousands, format_time};
use autobench_model::{BenchmarkResult, BenchmarkSummary};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Allocation above which an operation is listed as memory heavy
pub const HIGH_MEMORY_BYTES: f64 = 100.0 * 1024.0;

/// Mean above which an operation is listed as slow
pub const SLOW_OPERATION_MS: f64 = 100.0;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Aggregate counts over a set of summaries
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Overview {
    /// Summaries rendered
    pub attempted: usize,
    /// Successful runs
    pub succeeded: usize,
    /// Failed runs
    pub failed: usize,
    /// Parsed operations, measured or not
    pub operations: usize,
    /// Arithmetic mean of per-result throughput, if anything was measured
    pub average_throughput: Option<f64>,
    /// Mean allocation in bytes, if anything was measured
    pub average_allocation: Option<f64>,
}

impl Overview {
    /// Compute counts and averages; unmeasured results are left out of averages
    #[must_use]
    pub fn from_summaries(summaries: &[BenchmarkSummary]) -> Self {
        let measured: Vec<&BenchmarkResult> = summaries
            .iter()
            .flat_map(|s| s.results.iter())
            .filter(|r| r.is_measured())
            .collect();
        let count = measured.len() as f64;
        let (average_throughput, average_allocation) = if measured.is_empty() {
            (None, None)
        } else {
            (
                Some(measured.iter().map(|r| r.throughput()).sum::<f64>() / count),
                Some(measured.iter().map(|r| r.allocated_bytes).sum::<f64>() / count),
            )
        };

        let succeeded = summaries.iter().filter(|s| s.success).count();
        Self {
            attempted: summaries.len(),
            succeeded,
            failed: summaries.len() - succeeded,
            operations: summaries.iter().map(BenchmarkSummary::result_count).sum(),
            average_throughput,
            average_allocation,
        }
    }
}

fn by_mean(a: &&BenchmarkResult, b: &&BenchmarkResult) -> Ordering {
    a.mean_ns.partial_cmp(&b.mean_ns).unwrap_or(Ordering::Equal)
}

/// Results listed under "High Memory Allocation"
#[must_use]
pub fn high_memory(results: &[BenchmarkResult]) -> Vec<&BenchmarkResult> {
    results
        .iter()
        .filter(|r| r.is_measured() && r.allocated_bytes > HIGH_MEMORY_BYTES)
        .collect()
}

/// Results listed under "Slow Operations"
#[must_use]
pub fn slow_operations(results: &[BenchmarkResult]) -> Vec<&BenchmarkResult> {
    results
        .iter()
        .filter(|r| r.is_measured() && r.mean_ms() > SLOW_OPERATION_MS)
        .collect()
}

/// Render the technical report
#[must_use]
pub fn render_technical(summaries: &[BenchmarkSummary], generated_at: DateTime<Utc>) -> String {
    let overview = Overview::from_summaries(summaries);
    let mut out = String::new();

    out.push_str("# Benchmark Results Report\n\n");
    out.push_str(&format!(
        "**Generated:** {} UTC\n\n",
        generated_at.format(TIMESTAMP_FORMAT)
    ));

    out.push_str("## Executive Summary\n\n");
    out.push_str(&format!("- **Total Benchmark Projects:** {}\n", overview.attempted));
    out.push_str(&format!("- **Successful Runs:** {}\n", overview.succeeded));
    out.push_str(&format!("- **Failed Runs:** {}\n", overview.failed));
    out.push_str(&format!("- **Total Benchmarks Executed:** {}\n\n", overview.operations));

    if let (Some(throughput), Some(allocation)) =
        (overview.average_throughput, overview.average_allocation)
    {
        out.push_str("## Performance Overview\n\n");
        out.push_str(&format!(
            "- **Average Throughput:** {} operations/second\n",
            format_thousands(throughput)
        ));
        out.push_str(&format!(
            "- **Average Memory Allocation:** {} KB per operation\n\n",
            format_grouped(allocation / 1024.0, 2)
        ));
    }

    for summary in summaries.iter().filter(|s| s.success) {
        render_project(&mut out, summary);
    }

    if overview.failed > 0 {
        out.push_str("## Failed Runs\n\n");
        for summary in summaries.iter().filter(|s| !s.success) {
            out.push_str(&format!("### {}\n\n", summary.project_name));
            out.push_str(&format!("**Error:** {}\n\n", summary.error_message));
        }
    }

    out.push_str(INTERPRETATION_GUIDE);
    out
}

fn render_project(out: &mut String, summary: &BenchmarkSummary) {
    out.push_str(&format!("## {}\n\n", summary.project_name));
    out.push_str(&format!(
        "**Execution Time:** {} UTC\n\n",
        summary.executed_at.format(TIMESTAMP_FORMAT)
    ));

    let mut measured: Vec<&BenchmarkResult> =
        summary.results.iter().filter(|r| r.is_measured()).collect();
    if measured.is_empty() {
        out.push_str("*No benchmark results available for this project.*\n\n");
        render_unmeasured(out, summary);
        return;
    }
    measured.sort_by(by_mean);

    out.push_str("### Performance Metrics\n\n");
    out.push_str("| Benchmark | Mean Time | Std Dev | Throughput (ops/sec) | Memory Allocated |\n");
    out.push_str("|-----------|-----------|---------|---------------------|------------------|\n");
    for result in &measured {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            result.method,
            format_time(result.mean_ns),
            format_time(result.stddev_ns),
            format_thousands(result.throughput()),
            format_memory(result.allocated_bytes)
        ));
    }
    out.push('\n');

    out.push_str("### Quality Analysis\n\n");
    let fastest = measured[0];
    let slowest = measured[measured.len() - 1];
    // First encountered wins on equal allocation
    let heaviest = measured
        .iter()
        .copied()
        .reduce(|best, r| if r.allocated_bytes > best.allocated_bytes { r } else { best })
        .unwrap_or(fastest);

    out.push_str("**Fastest Operation:**\n");
    out.push_str(&format!("- `{}`: {}\n\n", fastest.method, format_time(fastest.mean_ns)));
    out.push_str("**Slowest Operation:**\n");
    out.push_str(&format!("- `{}`: {}\n\n", slowest.method, format_time(slowest.mean_ns)));
    out.push_str("**Most Memory Intensive:**\n");
    out.push_str(&format!(
        "- `{}`: {}\n\n",
        heaviest.method,
        format_memory(heaviest.allocated_bytes)
    ));

    out.push_str("### Performance Limits & Recommendations\n\n");
    let heavy = high_memory(&summary.results);
    if !heavy.is_empty() {
        out.push_str("**⚠️ High Memory Allocation Detected:**\n");
        for op in &heavy {
            out.push_str(&format!(
                "- `{}`: {} per operation\n",
                op.method,
                format_memory(op.allocated_bytes)
            ));
        }
        out.push('\n');
    }
    let slow = slow_operations(&summary.results);
    if !slow.is_empty() {
        out.push_str("**⚠️ Slow Operations Detected:**\n");
        for op in &slow {
            out.push_str(&format!("- `{}`: {}\n", op.method, format_time(op.mean_ns)));
        }
        out.push('\n');
    }
    if heavy.is_empty() && slow.is_empty() {
        out.push_str("✅ All operations are performing within acceptable limits.\n\n");
    }

    render_unmeasured(out, summary);
}

fn render_unmeasured(out: &mut String, summary: &BenchmarkSummary) {
    let unmeasured: Vec<&BenchmarkResult> =
        summary.results.iter().filter(|r| !r.is_measured()).collect();
    if unmeasured.is_empty() {
        return;
    }
    out.push_str("**Unmeasured Operations:**\n");
    for result in unmeasured {
        out.push_str(&format!(
            "- `{}`: {}\n",
            result.method,
            result.error.as_deref().unwrap_or_default()
        ));
    }
    out.push('\n');
}

const INTERPRETATION_GUIDE: &str = "---

## Interpretation Guide

### Metrics Explained

- **Mean Time:** Average execution time per operation
- **Std Dev:** Standard deviation indicating consistency
- **Throughput:** Number of operations that can be performed per second
- **Memory Allocated:** Bytes allocated on the heap per operation

### Performance Categories

- **Fast:** < 1ms
- **Moderate:** 1-100ms
- **Slow:** > 100ms

### Memory Categories

- **Low:** < 1KB
- **Moderate:** 1-100KB
- **High:** > 100KB
";

#[cfg(test)]
mod tests {
    use super::*;
    use autobench_test_utils::{fixed_time, result, summary_failed, summary_ok};
    use pretty_assertions::assert_eq;

    #[test]
    fn overview_excludes_unmeasured_from_averages() {
        let summaries = vec![summary_ok(
            "App.UnitBenchmarks",
            vec![
                result("Measure_A", 1_000.0, 2_048.0),
                BenchmarkResult::new("Measure_B", "Measure_B").with_error("no statistics reported"),
            ],
        )];
        let overview = Overview::from_summaries(&summaries);
        assert_eq!(overview.operations, 2);
        assert_eq!(overview.average_throughput, Some(1_000_000.0));
        assert_eq!(overview.average_allocation, Some(2_048.0));
    }

    #[test]
    fn table_sorted_by_mean() {
        let summaries = vec![summary_ok(
            "App.UnitBenchmarks",
            vec![result("Measure_Slow", 5_000.0, 0.0), result("Measure_Fast", 50.0, 0.0)],
        )];
        let report = render_technical(&summaries, fixed_time());
        let fast = report.find("| Measure_Fast |").unwrap();
        let slow = report.find("| Measure_Slow |").unwrap();
        assert!(fast < slow);
        assert!(report.contains("✅ All operations are performing within acceptable limits."));
    }

    #[test]
    fn header_and_guide_are_fixed() {
        let report = render_technical(&[], fixed_time());
        assert!(report.starts_with("# Benchmark Results Report\n\n**Generated:** 2025-03-14 09:26:53 UTC\n"));
        assert!(report.contains("- **Total Benchmark Projects:** 0\n"));
        assert!(!report.contains("## Performance Overview"));
        assert!(report.ends_with("- **High:** > 100KB\n"));
    }

    #[test]
    fn failed_runs_carry_error_text() {
        let summaries = vec![
            summary_ok("App.UnitBenchmarks", vec![]),
            summary_failed("App.E2EBenchmarks", "Benchmark execution failed with exit code 1: boom"),
        ];
        let report = render_technical(&summaries, fixed_time());
        assert!(report.contains("*No benchmark results available for this project.*"));
        assert!(report.contains(
            "## Failed Runs\n\n### App.E2EBenchmarks\n\n**Error:** Benchmark execution failed with exit code 1: boom\n"
        ));
    }

    #[test]
    fn equal_allocation_keeps_first() {
        let results = vec![result("Measure_A", 10.0, 64.0), result("Measure_B", 20.0, 64.0)];
        let report = render_technical(&[summary_ok("p", results)], fixed_time());
        assert!(report.contains("**Most Memory Intensive:**\n- `Measure_A`: 64 B\n"));
    }
}
