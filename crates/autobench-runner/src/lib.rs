//! autobench Runner
//!
//! Execution of generated benchmark projects:
//! - **Platform**: [`DotnetCli`], the `dotnet` implementation of [`BuildTool`](autobench_model::BuildTool)
//! - **Runner**: whole-project and partitioned runs producing summaries
//! - **Results**: tolerant parsing of `*-report-full.json` files

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod dotnet;
pub mod error;
pub mod results;
pub mod runner;

pub use dotnet::DotnetCli;
pub use error::{RunnerError, RunnerResult};
pub use results::{collect_results, parse_report};
pub use runner::{partition_filter, ExecutionRunner};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running benchmarks
    pub use crate::dotnet::DotnetCli;
    pub use crate::error::{RunnerError, RunnerResult};
    pub use crate::runner::ExecutionRunner;
}
