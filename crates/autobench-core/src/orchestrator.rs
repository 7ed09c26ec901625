//! Batch orchestrator
//!
//! Per solution: `Copy → Analyze → Generate → RunUnit → RunE2e → Report`.
//! A stage error fails that solution only; the batch moves on and finishes
//! with aggregate reports over the summaries of completed solutions.

use crate::analyzer::SolutionAnalyzer;
use crate::cancel::CancelFlag;
use crate::config::RunnerConfig;
use crate::copier::{copy_solution, discover_solutions, solution_dir_name};
use crate::error::{PipelineError, PipelineResult};
use autobench_harness::{GeneratedProject, HarnessGenerator};
use autobench_model::{BenchmarkSummary, BuildTool, ProjectModel};
use autobench_report::{write_reports, WrittenReports};
use autobench_runner::ExecutionRunner;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Pipeline stage of one solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Artifact copy
    Copy,
    /// Source analysis
    Analyze,
    /// Harness generation and registration
    Generate,
    /// Unit harness run
    RunUnit,
    /// End-to-end harness run
    RunE2e,
    /// Per-solution reports
    Report,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Copy => "copy",
            Stage::Analyze => "analyze",
            Stage::Generate => "generate",
            Stage::RunUnit => "run-unit",
            Stage::RunE2e => "run-e2e",
            Stage::Report => "report",
        };
        f.write_str(name)
    }
}

impl Stage {
    /// Attach an error to this stage
    #[must_use]
    pub fn failed(self, error: impl Into<PipelineError>) -> StageFailure {
        StageFailure {
            stage: self,
            error: error.into(),
        }
    }
}

/// The stage a solution failed in and why
#[derive(Debug)]
pub struct StageFailure {
    /// Failing stage
    pub stage: Stage,
    /// Cause
    pub error: PipelineError,
}

/// What happened to one solution
#[derive(Debug)]
pub struct SolutionOutcome {
    /// Discovered manifest path
    pub solution: PathBuf,
    /// Display name (the solution's directory name)
    pub name: String,
    /// Summaries collected before completion or failure
    pub summaries: Vec<BenchmarkSummary>,
    /// Per-solution reports, once written
    pub reports: Option<WrittenReports>,
    /// Set when a stage failed
    pub failure: Option<StageFailure>,
}

impl SolutionOutcome {
    fn new(solution: &Path) -> Self {
        Self {
            solution: solution.to_path_buf(),
            name: solution_dir_name(solution).unwrap_or_else(|| solution.display().to_string()),
            summaries: Vec::new(),
            reports: None,
            failure: None,
        }
    }

    /// Whether every stage completed
    #[inline]
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

/// Result of a batch
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Outcomes in discovery order
    pub solutions: Vec<SolutionOutcome>,
    /// Aggregate reports, when a completed solution produced any summary
    pub aggregate: Option<WrittenReports>,
    /// Whether the batch stopped early on cancellation
    pub cancelled: bool,
}

impl BatchOutcome {
    /// Solutions whose pipeline completed
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.solutions.iter().filter(|s| s.succeeded()).count()
    }

    /// Summaries of solutions whose pipeline completed, in solution then run order
    ///
    /// A failed solution's partial summaries stay on its own outcome.
    pub fn summaries(&self) -> impl Iterator<Item = &BenchmarkSummary> {
        self.solutions
            .iter()
            .filter(|s| s.succeeded())
            .flat_map(|s| s.summaries.iter())
    }

    /// Process exit code: 2 cancelled, 1 when every discovered solution failed
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.cancelled {
            2
        } else if !self.solutions.is_empty() && self.succeeded() == 0 {
            1
        } else {
            0
        }
    }
}

/// Generated projects of one solution
#[derive(Debug, Clone)]
pub struct GeneratedPair {
    /// Unit harness project
    pub unit: GeneratedProject,
    /// End-to-end harness project
    pub e2e: GeneratedProject,
}

/// Drives the per-solution pipeline
pub struct Pipeline {
    config: RunnerConfig,
    analyzer: Arc<dyn SolutionAnalyzer>,
    generator: HarnessGenerator,
    runner: ExecutionRunner,
    cancel: CancelFlag,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Create pipeline over an analyzer and a build tool
    #[must_use]
    pub fn new(
        config: RunnerConfig,
        analyzer: Arc<dyn SolutionAnalyzer>,
        build_tool: Arc<dyn BuildTool>,
    ) -> Self {
        Self {
            generator: HarnessGenerator::new(config.harness.clone(), Arc::clone(&build_tool)),
            runner: ExecutionRunner::new(build_tool),
            analyzer,
            config,
            cancel: CancelFlag::new(),
        }
    }

    /// With cancellation flag
    #[inline]
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Process every solution below the solutions directory
    pub async fn run_batch(&self) -> BatchOutcome {
        let solutions = discover_solutions(&self.config.solutions_dir);
        let mut outcome = BatchOutcome::default();
        if solutions.is_empty() {
            warn!(dir = %self.config.solutions_dir.display(), "No solutions found");
            return outcome;
        }
        info!(count = solutions.len(), "Benchmarking solutions");

        for solution in &solutions {
            if self.cancel.is_cancelled() {
                outcome.cancelled = true;
                break;
            }
            let result = self.process_solution(solution).await;
            outcome.solutions.push(result);
        }
        if self.cancel.is_cancelled() {
            outcome.cancelled = true;
        }

        let summaries: Vec<BenchmarkSummary> = outcome.summaries().cloned().collect();
        if !summaries.is_empty() {
            let artifacts = &self.config.artifacts_dir;
            let technical = artifacts.join(&self.config.reports.aggregate);
            let product_owner = artifacts.join(&self.config.reports.product_owner);
            match write_reports(&summaries, &technical, &product_owner).await {
                Ok(written) => outcome.aggregate = Some(written),
                Err(e) => error!(error = %e, "Failed to write aggregate reports"),
            }
        }

        info!(
            succeeded = outcome.succeeded(),
            total = solutions.len(),
            cancelled = outcome.cancelled,
            "Benchmarking complete"
        );
        outcome
    }

    /// Run every stage for one solution, recording the first failure
    pub async fn process_solution(&self, solution: &Path) -> SolutionOutcome {
        let mut outcome = SolutionOutcome::new(solution);
        info!(solution = %outcome.name, "Processing solution");

        match self.stages(solution, &mut outcome).await {
            Ok(()) => info!(solution = %outcome.name, "Solution benchmarked"),
            Err(failure) => {
                error!(
                    solution = %outcome.name,
                    stage = %failure.stage,
                    error = %failure.error,
                    "Solution failed, continuing with next"
                );
                outcome.failure = Some(failure);
            }
        }
        outcome
    }

    async fn stages(
        &self,
        solution: &Path,
        outcome: &mut SolutionOutcome,
    ) -> Result<(), StageFailure> {
        self.checkpoint(Stage::Copy)?;
        let copied = self.copy(solution).await.map_err(|e| Stage::Copy.failed(e))?;

        self.checkpoint(Stage::Analyze)?;
        let projects = self
            .analyzer
            .analyze(&copied)
            .await
            .map_err(|e| Stage::Analyze.failed(e))?;

        self.checkpoint(Stage::Generate)?;
        let generated = self
            .generate(&copied, &projects)
            .await
            .map_err(|e| Stage::Generate.failed(e))?;

        self.checkpoint(Stage::RunUnit)?;
        let unit = self.runner.run(&generated.unit.dir).await;
        log_summary(&unit);
        outcome.summaries.push(unit);

        self.checkpoint(Stage::RunE2e)?;
        let e2e = self.run_e2e(&generated.e2e).await;
        e2e.iter().for_each(log_summary);
        outcome.summaries.extend(e2e);

        self.checkpoint(Stage::Report)?;
        let artifact_dir = copied.parent().unwrap_or_else(|| Path::new("."));
        let technical = artifact_dir.join(&self.config.reports.technical);
        let product_owner = artifact_dir.join(&self.config.reports.product_owner);
        let reports = write_reports(&outcome.summaries, &technical, &product_owner)
            .await
            .map_err(|e| Stage::Report.failed(e))?;
        outcome.reports = Some(reports);
        Ok(())
    }

    fn checkpoint(&self, stage: Stage) -> Result<(), StageFailure> {
        if self.cancel.is_cancelled() {
            return Err(stage.failed(PipelineError::Cancelled));
        }
        info!(stage = %stage, "Stage starting");
        Ok(())
    }

    async fn copy(&self, solution: &Path) -> PipelineResult<PathBuf> {
        let solution = solution.to_path_buf();
        let artifacts = self.config.artifacts_dir.clone();
        let copied = tokio::task::spawn_blocking(move || copy_solution(&solution, &artifacts))
            .await
            .map_err(|e| PipelineError::Task(e.to_string()))??;
        Ok(copied)
    }

    /// Analyze and generate both harness projects in place
    ///
    /// # Errors
    /// Analysis and generation errors are returned unchanged.
    pub async fn generate_only(&self, solution: &Path) -> PipelineResult<GeneratedPair> {
        let projects = self.analyzer.analyze(solution).await?;
        self.generate(solution, &projects).await
    }

    async fn generate(
        &self,
        solution: &Path,
        projects: &[ProjectModel],
    ) -> PipelineResult<GeneratedPair> {
        let unit = self.generator.generate_unit(solution, projects).await?;
        let e2e = self.generator.generate_e2e(solution, projects).await?;
        Ok(GeneratedPair { unit, e2e })
    }

    async fn run_e2e(&self, project: &GeneratedProject) -> Vec<BenchmarkSummary> {
        let cap = self.config.e2e_concurrency;
        if cap > 1 && project.harness_classes.len() > 1 {
            self.runner
                .run_partitioned(
                    &project.dir,
                    &self.config.harness.namespace,
                    &project.harness_classes,
                    cap,
                )
                .await
        } else {
            vec![self.runner.run(&project.dir).await]
        }
    }

    /// Generate, run and report one solution in place
    ///
    /// Reports go to `output` (technical) and a product-owner report beside
    /// it; the default is the solution's directory.
    ///
    /// # Errors
    /// Analysis, generation and report errors are returned unchanged.
    pub async fn run_single(
        &self,
        solution: &Path,
        output: Option<&Path>,
    ) -> PipelineResult<(Vec<BenchmarkSummary>, WrittenReports)> {
        let generated = self.generate_only(solution).await?;

        let mut summaries = vec![self.runner.run(&generated.unit.dir).await];
        summaries.extend(self.run_e2e(&generated.e2e).await);
        summaries.iter().for_each(log_summary);

        let solution_dir = solution.parent().unwrap_or_else(|| Path::new("."));
        let technical = output.map_or_else(
            || solution_dir.join(&self.config.reports.technical),
            Path::to_path_buf,
        );
        let product_owner = technical
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&self.config.reports.product_owner);
        let reports = write_reports(&summaries, &technical, &product_owner).await?;
        Ok((summaries, reports))
    }
}

fn log_summary(summary: &BenchmarkSummary) {
    if summary.success {
        info!(project = %summary.project_name, results = summary.result_count(), "Benchmarks completed");
    } else {
        warn!(project = %summary.project_name, error = %summary.error_message, "Benchmarks failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autobench_analysis::{AnalysisError, AnalysisResult};
    use autobench_model::ProcessOutput;
    use autobench_test_utils::{library_project, summary_ok, write_file, MockBuildTool};
    use pretty_assertions::assert_eq;

    struct FixedAnalyzer;

    #[async_trait::async_trait]
    impl SolutionAnalyzer for FixedAnalyzer {
        async fn analyze(&self, solution: &Path) -> AnalysisResult<Vec<ProjectModel>> {
            let root = solution.parent().unwrap_or_else(|| Path::new("."));
            if root.ends_with("Broken") {
                return Err(AnalysisError::ParseFailed(solution.to_path_buf()));
            }
            Ok(vec![library_project(root)])
        }
    }

    fn passing_tool() -> Arc<dyn BuildTool> {
        let mut tool = MockBuildTool::new();
        tool.expect_build_and_run().returning(|_| Ok(ProcessOutput::ok()));
        Arc::new(tool)
    }

    fn solutions_root(names: &[&str]) -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        for name in names {
            write_file(
                &temp.path().join(format!("solutions/{name}/{name}.slnx")),
                "<Solution>\n</Solution>\n",
            );
        }
        temp
    }

    fn config(root: &Path) -> RunnerConfig {
        RunnerConfig::new()
            .with_solutions_dir(root.join("solutions"))
            .with_artifacts_dir(root.join("artifacts"))
    }

    #[test]
    fn exit_codes() {
        let mut outcome = BatchOutcome::default();
        assert_eq!(outcome.exit_code(), 0);
        outcome.solutions.push(SolutionOutcome::new(Path::new("/s/A/A.slnx")));
        outcome.solutions[0].failure = Some(StageFailure {
            stage: Stage::Analyze,
            error: PipelineError::Cancelled,
        });
        assert_eq!(outcome.exit_code(), 1);
        outcome.cancelled = true;
        assert_eq!(outcome.exit_code(), 2);
    }

    #[test]
    fn partial_summaries_of_failed_solutions_are_not_aggregated() {
        let mut done = SolutionOutcome::new(Path::new("/s/A/A.slnx"));
        done.summaries.push(summary_ok("A.UnitBenchmarks", Vec::new()));
        let mut cut_short = SolutionOutcome::new(Path::new("/s/B/B.slnx"));
        cut_short.summaries.push(summary_ok("B.UnitBenchmarks", Vec::new()));
        cut_short.failure = Some(Stage::RunE2e.failed(PipelineError::Cancelled));

        let outcome = BatchOutcome {
            solutions: vec![done, cut_short],
            ..BatchOutcome::default()
        };
        let names: Vec<&str> = outcome.summaries().map(|s| s.project_name.as_str()).collect();
        assert_eq!(names, vec!["A.UnitBenchmarks"]);
    }

    #[tokio::test]
    async fn failing_solution_does_not_stop_batch() {
        let temp = solutions_root(&["Alpha", "Broken", "Gamma"]);
        let pipeline = Pipeline::new(config(temp.path()), Arc::new(FixedAnalyzer), passing_tool());

        let outcome = pipeline.run_batch().await;

        assert_eq!(outcome.solutions.len(), 3);
        assert_eq!(outcome.succeeded(), 2);
        let failure = outcome.solutions[1].failure.as_ref().unwrap();
        assert_eq!(failure.stage, Stage::Analyze);
        assert!(outcome.solutions[1].summaries.is_empty());

        let projects: Vec<&str> = outcome.summaries().map(|s| s.project_name.as_str()).collect();
        assert_eq!(
            projects,
            vec![
                "Alpha.UnitBenchmarks",
                "Alpha.E2EBenchmarks",
                "Gamma.UnitBenchmarks",
                "Gamma.E2EBenchmarks"
            ]
        );
        assert!(temp.path().join("artifacts/Alpha/BenchmarkReport.md").is_file());
        assert!(!temp.path().join("artifacts/Broken/BenchmarkReport.md").exists());
        assert!(outcome.aggregate.is_some());
        assert_eq!(outcome.exit_code(), 0);
    }

    #[tokio::test]
    async fn cancelled_before_start_runs_nothing() {
        let temp = solutions_root(&["Alpha"]);
        let cancel = CancelFlag::new();
        cancel.cancel();
        let pipeline = Pipeline::new(config(temp.path()), Arc::new(FixedAnalyzer), passing_tool())
            .with_cancel(cancel);

        let outcome = pipeline.run_batch().await;
        assert!(outcome.cancelled);
        assert!(outcome.solutions.is_empty());
        assert!(outcome.aggregate.is_none());
        assert_eq!(outcome.exit_code(), 2);
    }

    #[tokio::test]
    async fn empty_solutions_directory_is_not_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(config(temp.path()), Arc::new(FixedAnalyzer), passing_tool());
        let outcome = pipeline.run_batch().await;
        assert!(outcome.solutions.is_empty());
        assert!(!temp.path().join("artifacts/AggregateReport.md").exists());
        assert_eq!(outcome.exit_code(), 0);
    }
}
