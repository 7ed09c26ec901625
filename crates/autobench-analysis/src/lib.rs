//! autobench Analysis
//!
//! Static extraction of the project model from a .NET solution:
//! - **Provider**: the [`SourceModelProvider`] seam and its tree-sitter C# adapter
//! - **Classifier**: Library / Console / Service from the project manifest
//! - **Extractor**: public types, constructors, methods and infrastructure flags
//! - **Endpoint matchers**: literal `MapHub` / `SendAsync` pattern detection
//! - **Synthesis**: argument literals and unit-harness eligibility
//!
//! # Usage
//!
//! ```no_run
//! use autobench_analysis::prelude::*;
//!
//! # async fn example() -> Result<(), AnalysisError> {
//! let toolchain = CSharpToolchain::initialize()?;
//! let provider = CSharpModelProvider::new(toolchain);
//! let solution = provider.load_solution("Apollo.slnx".as_ref()).await?;
//! let projects = Extractor::default().extract(&solution);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod classifier;
pub mod csharp;
pub mod endpoint;
pub mod error;
pub mod extractor;
pub mod manifest;
pub mod provider;
pub mod synthesis;

pub use classifier::classify;
pub use csharp::{CSharpModelProvider, CSharpToolchain};
pub use endpoint::EndpointPatterns;
pub use error::{AnalysisError, AnalysisResult};
pub use extractor::{Extractor, INFRASTRUCTURE_MARKERS};
pub use manifest::SolutionFormat;
pub use provider::{SolutionSource, SourceModelProvider, SourceProject};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for solution analysis
    pub use crate::csharp::{CSharpModelProvider, CSharpToolchain};
    pub use crate::endpoint::EndpointPatterns;
    pub use crate::error::{AnalysisError, AnalysisResult};
    pub use crate::extractor::Extractor;
    pub use crate::provider::{SolutionSource, SourceModelProvider, SourceProject};
}
