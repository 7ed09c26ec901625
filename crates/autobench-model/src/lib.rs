//! autobench Model
//!
//! The typed vocabulary every pipeline stage speaks:
//! - **Project model**: projects, public types, methods, live endpoints
//! - **Syntax model**: the slice of a compilation unit the extractor reads
//! - **Result model**: measured operations and per-run summaries
//! - **Platform seam**: the external build-and-run collaborator
//!
//! # Architecture
//!
//! ```text
//! SourceModelProvider → syntax::CompilationUnit → Extractor → ProjectModel
//!                                                                  ↓
//!            BenchmarkSummary ← Runner ← BuildTool ← Harness Generator
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod platform;
pub mod project;
pub mod result;
pub mod syntax;

pub use error::PlatformError;
pub use platform::{BuildTool, ProcessOutput, RunRequest};
pub use project::{
    HubEndpointModel, MethodModel, ParameterModel, ProjectKind, ProjectModel, SequenceKind,
    TypeModel,
};
pub use result::{BenchmarkResult, BenchmarkSummary};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the autobench model
    pub use crate::platform::{BuildTool, ProcessOutput, RunRequest};
    pub use crate::project::{
        HubEndpointModel, MethodModel, ParameterModel, ProjectKind, ProjectModel, SequenceKind,
        TypeModel,
    };
    pub use crate::result::{BenchmarkResult, BenchmarkSummary};
}
