//! autobench Core
//!
//! Batch orchestration over a directory of .NET solutions:
//! - **Config**: [`RunnerConfig`] from `autobench.toml` and the environment
//! - **Copier**: discovery and isolated per-solution artifact copies
//! - **Analyzer**: the [`SolutionAnalyzer`] seam over source analysis
//! - **Orchestrator**: the staged [`Pipeline`] with per-solution failure isolation
//! - **Cancel**: cooperative cancellation checked at stage boundaries

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod analyzer;
pub mod cancel;
pub mod config;
pub mod copier;
pub mod error;
pub mod orchestrator;

pub use analyzer::{SolutionAnalyzer, SourceAnalyzer};
pub use cancel::CancelFlag;
pub use config::{ReportNames, RunnerConfig, CONFIG_FILE};
pub use copier::{copy_solution, discover_solutions};
pub use error::{ConfigError, CopyError, PipelineError, PipelineResult};
pub use orchestrator::{
    BatchOutcome, GeneratedPair, Pipeline, SolutionOutcome, Stage, StageFailure,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the pipeline
    pub use crate::analyzer::{SolutionAnalyzer, SourceAnalyzer};
    pub use crate::cancel::CancelFlag;
    pub use crate::config::RunnerConfig;
    pub use crate::error::{PipelineError, PipelineResult};
    pub use crate::orchestrator::{BatchOutcome, Pipeline, Stage};
}
