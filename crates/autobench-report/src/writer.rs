//! Report output

use crate::error::{ReportError, ReportResult};
use crate::product_owner::render_product_owner;
use crate::technical::render_technical;
use autobench_model::BenchmarkSummary;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::info;

/// Paths of a written report pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenReports {
    /// Technical report path
    pub technical: PathBuf,
    /// Product-owner report path
    pub product_owner: PathBuf,
}

/// Write a document, creating its parent directory
///
/// # Errors
/// Returns `Io` if the directory or file cannot be written.
pub async fn write_document(path: &Path, contents: &str) -> ReportResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ReportError::io_error(parent, e))?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| ReportError::io_error(path, e))
}

/// Render both reports over `summaries` and write them
///
/// # Errors
/// Returns `Io` if either file cannot be written.
pub async fn write_reports(
    summaries: &[BenchmarkSummary],
    technical: &Path,
    product_owner: &Path,
) -> ReportResult<WrittenReports> {
    let generated_at = Utc::now();
    write_document(technical, &render_technical(summaries, generated_at)).await?;
    info!(path = %technical.display(), "Technical report written");
    write_document(product_owner, &render_product_owner(summaries, generated_at)).await?;
    info!(path = %product_owner.display(), "Product owner report written");
    Ok(WrittenReports {
        technical: technical.to_path_buf(),
        product_owner: product_owner.to_path_buf(),
    })
}
