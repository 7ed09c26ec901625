//! Non-technical report
//!
//! Results are graded with a fixed verdict ladder and split into real-time
//! message delivery (the live-endpoint harness operation) and internal
//! operations. The HTTP and process-launch sentinels belong to neither group.

use crate::format::{format_memory, format_time};
use autobench_model::{BenchmarkResult, BenchmarkSummary};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Operation name of the live message-flow harness
pub const MESSAGE_FLOW_OPERATION: &str = "MeasureSignalRMessageFlow";

/// Operation names reserved for the HTTP and process-launch harnesses
pub const SENTINEL_OPERATIONS: [&str; 2] = ["MeasureRootEndpoint", "MeasureConsoleExecution"];

/// Number of entries in the focus-area ranking
pub const FOCUS_AREA_LIMIT: usize = 10;

/// Health grade of one operation, worst first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verdict {
    /// Over 100 ms or over 500 KB
    AtRisk,
    /// Over 10 ms or over 100 KB
    NeedsInvestigation,
    /// Over 1 ms or over 10 KB
    Acceptable,
    /// Everything else
    Healthy,
}

impl Verdict {
    /// All verdicts, worst first
    pub const ALL: [Verdict; 4] = [
        Verdict::AtRisk,
        Verdict::NeedsInvestigation,
        Verdict::Acceptable,
        Verdict::Healthy,
    ];

    /// Grade a mean duration and allocation; the first matching rung wins
    #[must_use]
    pub fn classify(mean_ns: f64, allocated_bytes: f64) -> Self {
        let mean_ms = mean_ns / 1_000_000.0;
        let kb = allocated_bytes / 1024.0;
        if mean_ms > 100.0 || kb > 500.0 {
            Verdict::AtRisk
        } else if mean_ms > 10.0 || kb > 100.0 {
            Verdict::NeedsInvestigation
        } else if mean_ms > 1.0 || kb > 10.0 {
            Verdict::Acceptable
        } else {
            Verdict::Healthy
        }
    }

    /// Grade a measured result
    #[inline]
    #[must_use]
    pub fn of(result: &BenchmarkResult) -> Self {
        Self::classify(result.mean_ns, result.allocated_bytes)
    }

    /// Label with its marker
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Verdict::AtRisk => "🔴 At Risk",
            Verdict::NeedsInvestigation => "🟠 Needs Investigation",
            Verdict::Acceptable => "🟡 Acceptable",
            Verdict::Healthy => "🟢 Healthy",
        }
    }

    fn meaning(self) -> &'static str {
        match self {
            Verdict::AtRisk => {
                "Users are likely to notice delays or the service may struggle under load. Plan work to address it."
            }
            Verdict::NeedsInvestigation => {
                "Noticeably slower or heavier than typical. Worth a closer look by the team before it grows."
            }
            Verdict::Acceptable => "Within normal limits for most features. Keep an eye on it as usage grows.",
            Verdict::Healthy => "Fast and lightweight. No action needed.",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Verdict::AtRisk => "At Risk",
            Verdict::NeedsInvestigation => "Needs Investigation",
            Verdict::Acceptable => "Acceptable",
            Verdict::Healthy => "Healthy",
        };
        f.write_str(name)
    }
}

/// Combined latency and allocation pressure used for ranking
#[inline]
#[must_use]
pub fn focus_score(result: &BenchmarkResult) -> f64 {
    result.mean_ns * (1.0 + result.allocated_bytes / 1024.0)
}

/// A result together with the run it came from
#[derive(Debug, Clone, Copy)]
pub struct Graded<'a> {
    /// Run the result belongs to
    pub project: &'a str,
    /// The measured result
    pub result: &'a BenchmarkResult,
    /// Its verdict
    pub verdict: Verdict,
}

/// Measured results split by audience-facing group
#[derive(Debug, Clone, Default)]
pub struct Partition<'a> {
    /// Live message delivery results
    pub message_flow: Vec<Graded<'a>>,
    /// Everything except message flow and the sentinels
    pub internal: Vec<Graded<'a>>,
}

impl<'a> Partition<'a> {
    /// Split the measured results of successful runs
    #[must_use]
    pub fn from_summaries(summaries: &'a [BenchmarkSummary]) -> Self {
        let mut partition = Partition::default();
        for (project, result) in measured(summaries) {
            let graded = Graded {
                project,
                result,
                verdict: Verdict::of(result),
            };
            if result.method == MESSAGE_FLOW_OPERATION {
                partition.message_flow.push(graded);
            } else if !SENTINEL_OPERATIONS.contains(&result.method.as_str()) {
                partition.internal.push(graded);
            }
        }
        partition
    }
}

fn measured(summaries: &[BenchmarkSummary]) -> impl Iterator<Item = (&str, &BenchmarkResult)> {
    summaries
        .iter()
        .filter(|s| s.success)
        .flat_map(|s| s.results.iter().map(move |r| (s.project_name.as_str(), r)))
        .filter(|(_, r)| r.is_measured())
}

/// Highest-scoring results across every run, ties in input order
#[must_use]
pub fn focus_areas(summaries: &[BenchmarkSummary]) -> Vec<Graded<'_>> {
    let mut all: Vec<Graded<'_>> = measured(summaries)
        .map(|(project, result)| Graded {
            project,
            result,
            verdict: Verdict::of(result),
        })
        .collect();
    all.sort_by(|a, b| {
        focus_score(b.result)
            .partial_cmp(&focus_score(a.result))
            .unwrap_or(Ordering::Equal)
    });
    all.truncate(FOCUS_AREA_LIMIT);
    all
}

fn friendly_name(method: &str) -> &str {
    method.strip_prefix("Measure_").unwrap_or(method)
}

fn first_line(text: &str) -> &str {
    text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or(text)
}

/// Render the product-owner report
#[must_use]
pub fn render_product_owner(summaries: &[BenchmarkSummary], generated_at: DateTime<Utc>) -> String {
    let partition = Partition::from_summaries(summaries);
    let graded: Vec<&Graded<'_>> = partition
        .message_flow
        .iter()
        .chain(partition.internal.iter())
        .collect();
    let failed: Vec<&BenchmarkSummary> = summaries.iter().filter(|s| !s.success).collect();

    let mut out = String::new();
    out.push_str("# Performance Health Report\n\n");
    out.push_str(&format!(
        "**Generated:** {} UTC\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    out.push_str("## At a Glance\n\n");
    let overall = graded.iter().map(|g| g.verdict).min();
    match overall {
        Some(verdict) => out.push_str(&format!("**Overall health:** {}\n\n", verdict.label())),
        None => out.push_str("**Overall health:** not enough data to judge\n\n"),
    }
    out.push_str(&format!(
        "- **Benchmark runs completed:** {} of {}\n",
        summaries.len() - failed.len(),
        summaries.len()
    ));
    out.push_str(&format!("- **Operations checked:** {}\n", graded.len()));
    for verdict in Verdict::ALL {
        let count = graded.iter().filter(|g| g.verdict == verdict).count();
        out.push_str(&format!("- {}: {}\n", verdict.label(), count));
    }
    out.push('\n');

    out.push_str("## Real-Time Message Delivery\n\n");
    if partition.message_flow.is_empty() {
        out.push_str("*No real-time message flows were measured.*\n\n");
    } else {
        out.push_str("How long it takes for a live update to reach a connected client.\n\n");
        out.push_str("| Service | Delivery Time | Verdict |\n");
        out.push_str("|---------|---------------|---------|\n");
        for g in &partition.message_flow {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                g.project,
                format_time(g.result.mean_ns),
                g.verdict.label()
            ));
        }
        out.push('\n');
    }

    out.push_str("## Internal Operations\n\n");
    if partition.internal.is_empty() {
        out.push_str("*No internal operations were measured.*\n\n");
    } else {
        out.push_str("| Verdict | Operations |\n");
        out.push_str("|---------|------------|\n");
        for verdict in Verdict::ALL {
            let count = partition.internal.iter().filter(|g| g.verdict == verdict).count();
            out.push_str(&format!("| {} | {} |\n", verdict.label(), count));
        }
        out.push('\n');
    }

    out.push_str("## Top 10 Focus Areas\n\n");
    let focus = focus_areas(summaries);
    if focus.is_empty() {
        out.push_str("*Nothing to rank yet.*\n\n");
    } else {
        for (rank, g) in focus.iter().enumerate() {
            out.push_str(&format!(
                "{}. **{}** ({}): {} per call, {} memory per call. {}\n",
                rank + 1,
                friendly_name(&g.result.method),
                g.project,
                format_time(g.result.mean_ns),
                format_memory(g.result.allocated_bytes),
                g.verdict.label()
            ));
        }
        out.push('\n');
    }

    out.push_str("## What Could Not Be Measured\n\n");
    let unmeasured: Vec<(&str, &BenchmarkResult)> = summaries
        .iter()
        .filter(|s| s.success)
        .flat_map(|s| s.results.iter().map(move |r| (s.project_name.as_str(), r)))
        .filter(|(_, r)| !r.is_measured())
        .collect();
    if failed.is_empty() && unmeasured.is_empty() {
        out.push_str("Every benchmark run completed.\n\n");
    } else {
        for summary in failed {
            out.push_str(&format!(
                "- **{}** did not finish, so its operations have no numbers this time. Reason reported: {}\n",
                summary.project_name,
                first_line(&summary.error_message)
            ));
        }
        for (project, result) in unmeasured {
            out.push_str(&format!(
                "- **{}** ({}) ran but reported no timing.\n",
                friendly_name(&result.method),
                project
            ));
        }
        out.push('\n');
    }

    out.push_str("---\n\n");
    out.push_str("## What the Verdicts Mean\n\n");
    for verdict in Verdict::ALL {
        out.push_str(&format!("- **{}:** {}\n", verdict.label(), verdict.meaning()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use autobench_test_utils::{fixed_time, result, summary_failed, summary_ok};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn ladder_is_top_down() {
        assert_eq!(Verdict::classify(5_000_000.0, 50.0 * 1024.0), Verdict::Acceptable);
        assert_eq!(Verdict::classify(150_000_000.0, 0.0), Verdict::AtRisk);
        assert_eq!(Verdict::classify(1_000.0, 600.0 * 1024.0), Verdict::AtRisk);
        assert_eq!(Verdict::classify(20_000_000.0, 0.0), Verdict::NeedsInvestigation);
        assert_eq!(Verdict::classify(500.0, 200.0 * 1024.0), Verdict::NeedsInvestigation);
        assert_eq!(Verdict::classify(1_000_000.0, 10.0 * 1024.0), Verdict::Healthy);
    }

    #[test]
    fn sentinels_are_excluded_from_both_groups() {
        let summaries = vec![summary_ok(
            "App.E2EBenchmarks",
            vec![
                result(MESSAGE_FLOW_OPERATION, 2_000_000.0, 0.0),
                result("MeasureRootEndpoint", 1_000_000.0, 0.0),
                result("MeasureConsoleExecution", 90_000_000.0, 0.0),
                result("Measure_Smooth", 10.0, 0.0),
            ],
        )];
        let partition = Partition::from_summaries(&summaries);
        assert_eq!(partition.message_flow.len(), 1);
        let internal: Vec<&str> = partition.internal.iter().map(|g| g.result.method.as_str()).collect();
        assert_eq!(internal, vec!["Measure_Smooth"]);
    }

    #[test]
    fn focus_areas_rank_by_score_and_cap_at_ten() {
        let results: Vec<BenchmarkResult> = (1..=12)
            .map(|i| result(&format!("Measure_{i}"), f64::from(i) * 1_000.0, 0.0))
            .chain(std::iter::once(result("Measure_Heavy", 1_000.0, 1_024.0 * 100.0)))
            .collect();
        let summaries = vec![summary_ok("p", results)];
        let focus = focus_areas(&summaries);
        assert_eq!(focus.len(), FOCUS_AREA_LIMIT);
        assert_eq!(focus[0].result.method, "Measure_Heavy");
        assert_eq!(focus[1].result.method, "Measure_12");
    }

    #[test]
    fn failures_are_plain_language() {
        let summaries = vec![summary_failed(
            "App.UnitBenchmarks",
            "Benchmark execution failed with exit code 1: \nerror CS0246\nmore",
        )];
        let report = render_product_owner(&summaries, fixed_time());
        assert!(report.contains("**App.UnitBenchmarks** did not finish"));
        assert!(report.contains("Reason reported: Benchmark execution failed with exit code 1:\n"));
        assert!(report.contains("**Overall health:** not enough data to judge"));
    }

    #[test]
    fn unmeasured_operations_are_listed() {
        let summaries = vec![summary_ok(
            "App.UnitBenchmarks",
            vec![
                result("Measure_Smooth", 500.0, 0.0),
                BenchmarkResult::new("Measure_Flush", "Measure_Flush").with_error("no statistics reported"),
            ],
        )];
        let report = render_product_owner(&summaries, fixed_time());
        assert!(report.contains("- **Flush** (App.UnitBenchmarks) ran but reported no timing."));
        assert!(!report.contains("Every benchmark run completed."));
        assert!(report.contains("- **Operations checked:** 1\n"));
    }

    #[test]
    fn message_flow_table() {
        let summaries = vec![summary_ok(
            "Apollo.E2EBenchmarks",
            vec![result(MESSAGE_FLOW_OPERATION, 5_000_000.0, 50.0 * 1024.0)],
        )];
        let report = render_product_owner(&summaries, fixed_time());
        assert!(report.contains("| Apollo.E2EBenchmarks | 5.00 ms | 🟡 Acceptable |"));
        assert!(report.contains("**Overall health:** 🟡 Acceptable"));
    }

    proptest! {
        #[test]
        fn ladder_is_monotonic(mean in 0.0f64..1e9, bytes in 0.0f64..1e7, extra in 0.0f64..1e8) {
            prop_assert!(Verdict::classify(mean + extra, bytes) <= Verdict::classify(mean, bytes));
            prop_assert!(Verdict::classify(mean, bytes + extra) <= Verdict::classify(mean, bytes));
        }
    }
}
