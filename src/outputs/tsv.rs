//! Tab-separated export of ranked companies.
//!
//! UTF-8, a header row, one row per company. Tabs and line breaks inside a
//! value are replaced with spaces so every record stays on one line. The
//! `Company Size` column only appears in the SME variants and `Job Platforms`
//! only in the job variants.

use super::output_filename;
use crate::models::{CompanyRecord, Variant, NOT_SPECIFIED};
use chrono::{DateTime, Local};
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Written instead of a table when there is nothing to export.
pub const EMPTY_SENTINEL: &str = "No digital transformation companies found";

fn sanitize(value: &str) -> String {
    value.replace(['\t', '\r', '\n'], " ")
}

/// Column headers for `variant`, in output order.
pub fn headers(variant: Variant) -> Vec<&'static str> {
    let mut headers = vec!["Company Name", "Website", "Industry"];
    if variant.is_sme() {
        headers.push("Company Size");
    }
    headers.extend([
        "Revenue",
        "Digital Transformation",
        "Transformation Details",
        "Hiring Trends 2025-2026",
    ]);
    if variant.tracks_job_platforms() {
        headers.push("Job Platforms");
    }
    headers.extend(["Source Link", "Confidence", "Relevance Score"]);
    headers
}

fn row(company: &CompanyRecord, variant: Variant) -> String {
    let mut fields = vec![
        company.name.clone(),
        company.website.clone(),
        company.industry.clone(),
    ];
    if variant.is_sme() {
        fields.push(
            company
                .company_size
                .clone()
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        );
    }
    fields.extend([
        company.revenue.clone(),
        company.digital_transformation.clone(),
        company.transformation_details.clone(),
        company.hiring_trend.clone(),
    ]);
    if variant.tracks_job_platforms() {
        fields.push(if company.job_platforms.is_empty() {
            NOT_SPECIFIED.to_string()
        } else {
            company.job_platforms.join(", ")
        });
    }
    fields.extend([
        company.source_link.clone(),
        company.confidence.as_str().to_string(),
        company.relevance_score.to_string(),
    ]);

    fields
        .iter()
        .map(|f| sanitize(f))
        .collect::<Vec<_>>()
        .join("\t")
}

/// Render companies as TSV text (no trailing newline).
pub fn render_tsv(companies: &[CompanyRecord], variant: Variant) -> String {
    if companies.is_empty() {
        return EMPTY_SENTINEL.to_string();
    }
    std::iter::once(headers(variant).join("\t"))
        .chain(companies.iter().map(|c| row(c, variant)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the TSV export into `output_dir` and return its path.
///
/// `at` stamps the file name; pass the JSON report's `generated_at` so both
/// exports of one run share a stem.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), count = companies.len()))]
pub async fn write_tsv(
    companies: &[CompanyRecord],
    variant: Variant,
    at: &DateTime<Local>,
    output_dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(output_filename(at, "tsv"));
    fs::write(&path, render_tsv(companies, variant)).await?;
    info!(path = %path.display(), "Wrote TSV export");
    Ok(path)
}
