//! autobench Report
//!
//! Markdown rendering of benchmark summaries:
//! - **Technical**: counts, averages, per-run tables, threshold warnings, failures
//! - **Product owner**: verdict ladder, message-flow vs internal split, focus ranking
//! - **Format**: shared duration, size and digit-grouping helpers
//!
//! Renderers are pure functions of the summaries and a timestamp; only
//! [`write_reports`] touches the filesystem.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod format;
pub mod product_owner;
pub mod technical;
pub mod writer;

pub use error::{ReportError, ReportResult};
pub use product_owner::{focus_score, render_product_owner, Verdict};
pub use technical::{render_technical, Overview};
pub use writer::{write_document, write_reports, WrittenReports};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for report rendering
    pub use crate::error::{ReportError, ReportResult};
    pub use crate::product_owner::{render_product_owner, Verdict};
    pub use crate::technical::render_technical;
    pub use crate::writer::{write_reports, WrittenReports};
}
