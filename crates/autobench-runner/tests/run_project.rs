//! Runs against a mocked platform that leaves result files behind

use autobench_model::ProcessOutput;
use autobench_runner::prelude::*;
use autobench_test_utils::{write_file, MockBuildTool};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const FILTER_REPORT: &str = r#"{
  "Benchmarks": [
    {
      "FullName": "Benchmarks.SignalFilterBenchmarks.Measure_Smooth",
      "Method": "Measure_Smooth",
      "Statistics": { "Mean": 150000000.0, "StandardDeviation": 1500000.0 },
      "Memory": { "BytesAllocatedPerOperation": 204800 }
    }
  ]
}"#;

const CHECKSUM_REPORT: &str = r#"{
  "Benchmarks": [
    {
      "FullName": "Benchmarks.ChecksumBenchmarks.Measure_Compute",
      "Method": "Measure_Compute",
      "Statistics": { "Mean": 42.0, "StandardDeviation": 0.5 },
      "Memory": { "BytesAllocatedPerOperation": 0 }
    }
  ]
}"#;

#[tokio::test]
async fn successful_run_collects_every_report() {
    let temp = tempfile::tempdir().unwrap();
    let project_dir = temp.path().join("Apollo.UnitBenchmarks");
    let results = project_dir.join("BenchmarkDotNet.Artifacts/results");
    write_file(&results.join("Benchmarks.ChecksumBenchmarks-report-full.json"), CHECKSUM_REPORT);
    write_file(&results.join("Benchmarks.SignalFilterBenchmarks-report-full.json"), FILTER_REPORT);
    write_file(&results.join("Benchmarks.Broken-report-full.json"), "{\"Benchmarks\": [");

    let mut tool = MockBuildTool::new();
    let expected_dir = project_dir.clone();
    tool.expect_build_and_run()
        .withf(move |request| request.project_dir == expected_dir && request.exporter == "json")
        .times(1)
        .returning(|_| Ok(ProcessOutput::ok()));

    let summary = ExecutionRunner::new(Arc::new(tool)).run(&project_dir).await;

    assert!(summary.success);
    assert_eq!(summary.project_name, "Apollo.UnitBenchmarks");
    let names: Vec<&str> = summary.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Measure_Compute", "Measure_Smooth"]);
    assert!((summary.results[1].mean_ms() - 150.0).abs() < 1e-9);
    assert!((summary.results[1].allocated_kb() - 200.0).abs() < 1e-9);
}

#[tokio::test]
async fn partitioned_runs_read_their_own_artifacts() {
    let temp = tempfile::tempdir().unwrap();
    let project_dir = temp.path().join("Apollo.E2EBenchmarks");
    let artifacts = project_dir.join("BenchmarkDotNet.Artifacts");
    write_file(
        &artifacts.join("ApolloToolE2EBenchmarks/results/Tool-report-full.json"),
        CHECKSUM_REPORT,
    );

    let mut tool = MockBuildTool::new();
    tool.expect_build_and_run().times(2).returning(|request| {
        if request.filter.as_deref() == Some("Benchmarks.ApolloApiE2EBenchmarks.*") {
            Ok(ProcessOutput::failed(134, "host crashed"))
        } else {
            Ok(ProcessOutput::ok())
        }
    });

    let partitions = vec![
        "ApolloToolE2EBenchmarks".to_string(),
        "ApolloApiE2EBenchmarks".to_string(),
    ];
    let summaries = ExecutionRunner::new(Arc::new(tool))
        .run_partitioned(&project_dir, "Benchmarks", &partitions, 1)
        .await;

    assert_eq!(summaries.len(), 2);
    assert!(summaries[0].success);
    assert_eq!(summaries[0].results.len(), 1);
    assert!(!summaries[1].success);
    assert!(summaries[1].error_message.contains("exit code 134: host crashed"));
}
