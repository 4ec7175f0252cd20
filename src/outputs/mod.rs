//! Output generation for ranked company leads.
//!
//! # Submodules
//!
//! - [`tsv`]: tab-separated export, one row per company
//! - [`json`]: the ranked list plus run metadata
//! - [`insights`]: aggregate counts logged at the end of a run
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── digital_transformation_companies_20250106_1030.tsv
//! └── digital_transformation_companies_20250106_1030.json
//! ```

pub mod insights;
pub mod json;
pub mod tsv;

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Shared stem of every output file name.
pub const FILE_STEM: &str = "digital_transformation_companies";

/// `{FILE_STEM}_{YYYYmmdd_HHMM}.{extension}`
pub fn output_filename<Tz>(at: &DateTime<Tz>, extension: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{}_{}.{}", FILE_STEM, at.format("%Y%m%d_%H%M"), extension)
}
