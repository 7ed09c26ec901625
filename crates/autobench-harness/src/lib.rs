//! autobench Harness
//!
//! Synthesis of runnable benchmark projects from an extracted project model:
//! - **Unit**: one harness class per eligible type, methods measured in isolation
//! - **End-to-end**: HTTP round-trip, live message flow and console launch harnesses
//! - **Build descriptors**: `.csproj` files with relative project references
//! - **Registration**: idempotent insertion into `.slnx`, platform command for `.sln`
//!
//! # Usage
//!
//! ```no_run
//! use autobench_harness::prelude::*;
//! # use std::sync::Arc;
//!
//! # async fn example(
//! #     tool: Arc<dyn autobench_model::BuildTool>,
//! #     projects: Vec<autobench_model::ProjectModel>,
//! # ) -> HarnessResult<()> {
//! let generator = HarnessGenerator::new(HarnessConfig::default(), tool);
//! let unit = generator.generate_unit("Apollo.slnx".as_ref(), &projects).await?;
//! println!("{} harnesses in {}", unit.harness_classes.len(), unit.name);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod csproj;
pub mod e2e;
pub mod error;
pub mod generator;
pub mod paths;
pub mod solution;
pub mod unit;

pub use config::HarnessConfig;
pub use csproj::{BuildDescriptor, PROGRAM_SOURCE};
pub use e2e::{plan_e2e, E2ePlan};
pub use error::{HarnessError, HarnessResult};
pub use generator::{GeneratedProject, HarnessGenerator, HarnessKind, ProjectPlan};
pub use solution::{register_project, Registration};
pub use unit::{plan_unit, HarnessSource, UnitPlan};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for harness generation
    pub use crate::config::HarnessConfig;
    pub use crate::error::{HarnessError, HarnessResult};
    pub use crate::generator::{GeneratedProject, HarnessGenerator, HarnessKind};
    pub use crate::solution::Registration;
}
