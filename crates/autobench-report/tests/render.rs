//! Rendering over realistic mixed summaries

use autobench_report::prelude::*;
use autobench_test_utils::{fixed_time, result, summary_failed, summary_ok};
use pretty_assertions::assert_eq;

#[test]
fn slow_heavy_operation_is_flagged_twice() {
    let summaries = vec![summary_ok(
        "Apollo.UnitBenchmarks",
        vec![
            result("Measure_Smooth", 150_000_000.0, 204_800.0),
            result("Measure_FlushAsync", 800.0, 0.0),
        ],
    )];
    let report = render_technical(&summaries, fixed_time());

    assert!(report.contains("| Measure_Smooth | 150.00 ms | 1.50 ms | 7 | 200.00 KB |"));
    assert!(report.contains(
        "**⚠️ High Memory Allocation Detected:**\n- `Measure_Smooth`: 200.00 KB per operation\n"
    ));
    assert!(report.contains("**⚠️ Slow Operations Detected:**\n- `Measure_Smooth`: 150.00 ms\n"));
    assert!(!report.contains("✅"));
}

#[test]
fn sections_keep_their_order() {
    let summaries = vec![
        summary_ok("Apollo.UnitBenchmarks", vec![result("Measure_A", 10.0, 0.0)]),
        summary_failed("Apollo.E2EBenchmarks", "Benchmark execution failed with exit code 1: x"),
    ];
    let report = render_technical(&summaries, fixed_time());
    let positions: Vec<usize> = [
        "## Executive Summary",
        "## Performance Overview",
        "## Apollo.UnitBenchmarks",
        "## Failed Runs",
        "## Interpretation Guide",
    ]
    .iter()
    .map(|heading| report.find(heading).unwrap())
    .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

#[test]
fn product_owner_report_grades_every_group() {
    let summaries = vec![
        summary_ok(
            "Apollo.UnitBenchmarks",
            vec![
                result("Measure_Smooth", 5_000_000.0, 50.0 * 1024.0),
                result("Measure_Checksum", 40.0, 0.0),
            ],
        ),
        summary_ok(
            "Apollo.E2EBenchmarks",
            vec![
                result("MeasureSignalRMessageFlow", 120_000_000.0, 0.0),
                result("MeasureRootEndpoint", 2_000_000.0, 0.0),
            ],
        ),
    ];
    let report = render_product_owner(&summaries, fixed_time());

    assert!(report.contains("**Overall health:** 🔴 At Risk"));
    assert!(report.contains("| Apollo.E2EBenchmarks | 120.00 ms | 🔴 At Risk |"));
    assert!(report.contains("| 🟡 Acceptable | 1 |"));
    assert!(report.contains("| 🟢 Healthy | 1 |"));
    assert!(report.contains("1. **Smooth** (Apollo.UnitBenchmarks)"));
    assert!(report.contains("2. **MeasureSignalRMessageFlow** (Apollo.E2EBenchmarks)"));
    assert!(report.contains("Every benchmark run completed."));
    assert_eq!(Verdict::classify(5_000_000.0, 50.0 * 1024.0), Verdict::Acceptable);
}
