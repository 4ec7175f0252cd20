//! Session state carried between runs.
//!
//! Holds the most recently fetched articles and the accumulated company
//! leads. Articles are always replaced wholesale; companies are either
//! replaced or merged by company key (existing records win). The state can be
//! saved to and loaded from a JSON file so consecutive runs build one list.

use crate::dedupe::{company_key, dedupe_companies};
use crate::models::{ArticleRecord, CompanyRecord};
use crate::scoring::rank;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub articles: Vec<ArticleRecord>,
    #[serde(default)]
    pub companies: Vec<CompanyRecord>,
}

impl AppState {
    pub fn replace_articles(&mut self, articles: Vec<ArticleRecord>) {
        self.articles = articles;
    }

    pub fn replace_companies(&mut self, companies: Vec<CompanyRecord>) {
        self.companies = dedupe_companies(companies);
    }

    /// Append companies whose key is not present yet, then re-rank.
    ///
    /// Returns the number of records added.
    pub fn merge_companies(&mut self, companies: Vec<CompanyRecord>) -> usize {
        let mut seen: HashSet<String> = self.companies.iter().map(company_key).collect();
        let before = self.companies.len();
        for company in companies {
            if seen.insert(company_key(&company)) {
                self.companies.push(company);
            }
        }
        rank(&mut self.companies);
        self.companies.len() - before
    }

    /// Load a saved state; a missing file yields an empty state.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        if !fs::try_exists(path).await? {
            info!("No saved state; starting fresh");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).await?;
        let state: AppState = serde_json::from_str(&raw)?;
        info!(
            articles = state.articles.len(),
            companies = state.companies.len(),
            "Loaded saved state"
        );
        Ok(state)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn save(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?).await?;
        info!(companies = self.companies.len(), "Saved state");
        Ok(())
    }
}
