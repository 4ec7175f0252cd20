//! JSON export of the ranked company list.
//!
//! The document carries the run metadata next to the leads so a later reader
//! can tell which variant and selections produced it:
//!
//! ```json
//! {
//!   "generated_at": "2025-01-06T10:30:00+05:30",
//!   "variant": "sme-jobs",
//!   "industries": ["Manufacturing"],
//!   "technologies": ["ERP"],
//!   "summary": { "queries": 25, "articles_found": 180, ... },
//!   "companies": [ ... ]
//! }
//! ```

use super::output_filename;
use crate::models::{CompanyRecord, Variant};
use crate::pipeline::RunSummary;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

#[derive(Debug, Serialize)]
pub struct CompanyReport<'a> {
    pub generated_at: DateTime<Local>,
    pub variant: Variant,
    pub industries: &'a [String],
    pub technologies: &'a [String],
    pub summary: &'a RunSummary,
    pub companies: &'a [CompanyRecord],
}

/// Write a [`CompanyReport`] into `output_dir` and return its path.
///
/// The file name uses the report's own `generated_at` stamp.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_companies(
    report: &CompanyReport<'_>,
    output_dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    info!("Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = output_dir.join(output_filename(&report.generated_at, "json"));
    info!(path = %path.display(), "Writing JSON");
    fs::write(&path, json).await?;
    info!(
        path = %path.display(),
        companies = report.companies.len(),
        "Wrote JSON export"
    );

    Ok(path)
}
