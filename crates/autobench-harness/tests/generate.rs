//! Generation over an analyzed on-disk solution

use autobench_analysis::prelude::*;
use autobench_harness::prelude::*;
use autobench_model::ProjectModel;
use autobench_test_utils::{write_sample_solution, MockBuildTool};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::sync::Arc;

async fn analyze(solution: &Path) -> Vec<ProjectModel> {
    let provider = CSharpModelProvider::new(CSharpToolchain::initialize().unwrap());
    let source = provider.load_solution(solution).await.unwrap();
    Extractor::default().extract(&source)
}

fn generator() -> HarnessGenerator {
    HarnessGenerator::new(HarnessConfig::default(), Arc::new(MockBuildTool::new()))
}

#[tokio::test]
async fn unit_project_covers_only_constructible_types() {
    let temp = tempfile::tempdir().unwrap();
    let solution = write_sample_solution(temp.path(), "Apollo");
    let projects = analyze(&solution).await;

    let unit = generator().generate_unit(&solution, &projects).await.unwrap();

    assert_eq!(
        unit.harness_classes,
        vec!["SignalFilterBenchmarks".to_string(), "ChecksumBenchmarks".to_string()]
    );
    assert_eq!(
        unit.manifest_path,
        solution.parent().unwrap().join("Apollo.UnitBenchmarks/Apollo.UnitBenchmarks.csproj")
    );

    let csproj = std::fs::read_to_string(&unit.manifest_path).unwrap();
    assert!(csproj.contains("../src/Apollo.Core/Apollo.Core.csproj"));
    assert!(csproj.contains("../src/Apollo.Tool/Apollo.Tool.csproj"));
    assert!(!csproj.contains("Apollo.Api.csproj"));

    let filter = std::fs::read_to_string(unit.dir.join("SignalFilterBenchmarks.cs")).unwrap();
    assert!(filter.contains("NullLogger<Apollo.Core.SignalFilter>.Instance"));
    assert!(filter.contains("await _testSubject!.FlushAsync()"));

    for entry in std::fs::read_dir(&unit.dir).unwrap() {
        let text = std::fs::read_to_string(entry.unwrap().path()).unwrap();
        assert!(!text.contains("ReadingRepository"));
        assert!(!text.contains("TelemetryHub"));
    }
}

#[tokio::test]
async fn e2e_project_skips_libraries_and_wires_hub() {
    let temp = tempfile::tempdir().unwrap();
    let solution = write_sample_solution(temp.path(), "Apollo");
    let projects = analyze(&solution).await;

    let e2e = generator().generate_e2e(&solution, &projects).await.unwrap();
    assert_eq!(
        e2e.harness_classes,
        vec!["ApolloToolE2EBenchmarks".to_string(), "ApolloApiE2EBenchmarks".to_string()]
    );

    let csproj = std::fs::read_to_string(&e2e.manifest_path).unwrap();
    assert!(!csproj.contains("Apollo.Core.csproj"));
    assert!(csproj.contains("Microsoft.AspNetCore.SignalR.Client"));

    let api = std::fs::read_to_string(e2e.dir.join("ApolloApiE2EBenchmarks.cs")).unwrap();
    assert!(api.contains("/hubs/telemetry"));
    assert!(api.contains("\"ReceiveTelemetry\""));
    assert!(api.contains("InvokeAsync(\"Subscribe\", \"telemetry\")"));
}

#[tokio::test]
async fn regeneration_keeps_single_registration() {
    let temp = tempfile::tempdir().unwrap();
    let solution = write_sample_solution(temp.path(), "Apollo");
    let projects = analyze(&solution).await;
    let generator = generator();

    generator.generate_unit(&solution, &projects).await.unwrap();
    generator.generate_unit(&solution, &projects).await.unwrap();
    generator.generate_e2e(&solution, &projects).await.unwrap();

    let text = std::fs::read_to_string(&solution).unwrap();
    assert_eq!(text.matches("Apollo.UnitBenchmarks.csproj").count(), 1);
    assert_eq!(text.matches("Apollo.E2EBenchmarks.csproj").count(), 1);
    assert!(text.trim_end().ends_with("</Solution>"));
}

#[tokio::test]
async fn unsupported_manifest_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let solution: PathBuf = temp.path().join("Apollo.txt");
    std::fs::write(&solution, "").unwrap();

    let err = generator().generate_unit(&solution, &[]).await.unwrap_err();
    assert!(matches!(err, HarnessError::UnsupportedManifest(_)));
}
