use anyhow::Context;
use autobench_analysis::{CSharpModelProvider, CSharpToolchain, Extractor};
use autobench_core::{CancelFlag, Pipeline, RunnerConfig, SourceAnalyzer};
use autobench_model::BuildTool;
use autobench_runner::DotnetCli;
use clap::{value_parser, Arg, ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn cli() -> Command {
    let solution = || {
        Arg::new("solution")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Path to a .slnx or .sln manifest")
    };

    Command::new("autobench")
        .version(autobench_core::VERSION)
        .about("Generate, run and report BenchmarkDotNet harnesses for .NET solutions")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file (default: ./autobench.toml if present)"),
        )
        .subcommand(
            Command::new("batch")
                .about("Benchmark every solution below the solutions directory")
                .arg(
                    Arg::new("solutions-dir")
                        .long("solutions-dir")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory searched for solutions"),
                )
                .arg(
                    Arg::new("artifacts-dir")
                        .long("artifacts-dir")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory receiving copies and reports"),
                )
                .arg(
                    Arg::new("e2e-concurrency")
                        .long("e2e-concurrency")
                        .value_parser(value_parser!(usize))
                        .help("Concurrent end-to-end partitions"),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate harness projects into a solution in place")
                .arg(solution()),
        )
        .subcommand(
            Command::new("run")
                .about("Generate, run and report one solution in place")
                .arg(solution())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Technical report path (default: next to the solution)"),
                ),
        )
}

fn pipeline(config: RunnerConfig, cancel: CancelFlag) -> anyhow::Result<Pipeline> {
    let toolchain = CSharpToolchain::initialize().context("failed to load C# grammar")?;
    let analyzer = SourceAnalyzer::new(
        CSharpModelProvider::new(toolchain),
        Extractor::new(config.endpoints.clone()),
    );
    let build_tool: Arc<dyn BuildTool> = Arc::new(DotnetCli::default());
    Ok(Pipeline::new(config, Arc::new(analyzer), build_tool).with_cancel(cancel))
}

fn batch_config(mut config: RunnerConfig, args: &ArgMatches) -> RunnerConfig {
    if let Some(dir) = args.get_one::<PathBuf>("solutions-dir") {
        config = config.with_solutions_dir(dir);
    }
    if let Some(dir) = args.get_one::<PathBuf>("artifacts-dir") {
        config = config.with_artifacts_dir(dir);
    }
    if let Some(cap) = args.get_one::<usize>("e2e-concurrency") {
        config = config.with_e2e_concurrency(*cap);
    }
    config
}

async fn run(matches: ArgMatches) -> anyhow::Result<i32> {
    let config = RunnerConfig::resolve(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))
        .context("failed to load configuration")?;
    let cancel = CancelFlag::new();
    cancel.cancel_on_ctrl_c();

    match matches.subcommand() {
        Some(("batch", args)) => {
            let pipeline = pipeline(batch_config(config, args), cancel)?;
            let outcome = pipeline.run_batch().await;
            for solution in &outcome.solutions {
                if let Some(failure) = &solution.failure {
                    error!(solution = %solution.name, stage = %failure.stage, "Failed");
                }
            }
            if let Some(aggregate) = &outcome.aggregate {
                info!(
                    technical = %aggregate.technical.display(),
                    product_owner = %aggregate.product_owner.display(),
                    "Aggregate reports written"
                );
            }
            Ok(outcome.exit_code())
        }
        Some(("generate", args)) => {
            let solution = args.get_one::<PathBuf>("solution").context("missing solution")?;
            let generated = pipeline(config, cancel)?.generate_only(solution).await?;
            info!(
                unit = %generated.unit.manifest_path.display(),
                e2e = %generated.e2e.manifest_path.display(),
                "Harness projects generated"
            );
            Ok(0)
        }
        Some(("run", args)) => {
            let solution = args.get_one::<PathBuf>("solution").context("missing solution")?;
            let output = args.get_one::<PathBuf>("output").map(PathBuf::as_path);
            let (summaries, reports) = pipeline(config, cancel)?.run_single(solution, output).await?;
            info!(
                technical = %reports.technical.display(),
                product_owner = %reports.product_owner.display(),
                "Reports written"
            );
            Ok(if summaries.iter().any(|s| s.success) { 0 } else { 1 })
        }
        _ => Ok(0),
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let code = match run(cli().get_matches()).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %format!("{e:#}"), "autobench failed");
            1
        }
    };
    std::process::exit(code);
}
