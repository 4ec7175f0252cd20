//! Small text and file-system helpers shared across the pipeline.
//!
//! - String truncation for logging and for model input
//! - Markup stripping for feed descriptions
//! - Keyword matching: substring for the region filter, whole words for
//!   technology counts
//! - File system validation for the output directory

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes (backing off to a char boundary)
/// with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Keep at most `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Remove anything that looks like an HTML tag.
pub fn strip_tags(s: &str) -> String {
    TAG_RE.replace_all(s, "").into_owned()
}

/// Case-insensitive substring test against a keyword list.
pub fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    keywords
        .iter()
        .any(|k| !k.is_empty() && haystack.contains(&k.to_lowercase()))
}

/// Whether `word` occurs in `haystack` as a whole word (case-insensitive).
///
/// A match must not touch a letter or digit on either side, so "AI" is found
/// in "AI-driven" but not in "retail" or "supply chain".
pub fn contains_word(haystack: &str, word: &str) -> bool {
    let word = word.to_lowercase();
    if word.is_empty() {
        return false;
    }
    let haystack = haystack.to_lowercase();
    haystack.match_indices(&word).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + word.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Number of distinct keywords found as whole words in `haystack`.
pub fn count_matches(haystack: &str, keywords: &[String]) -> usize {
    keywords.iter().filter(|k| contains_word(haystack, k)).count()
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a scratch file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    let scratch_path = format!("{}/..__write_check__", path.trim_end_matches('/'));
    match stdfs::File::create(&scratch_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&scratch_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
