//! Search-engine scrapers and the collector that drives them.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Google News | [`google_news`] | RSS over GET | Locale `en-IN`, `after:` cutoff |
//! | DuckDuckGo | [`duckduckgo`] | HTML over POST | Redirect links are unwrapped |
//!
//! Each module exports a `search(client, config, query, max_results)` that
//! returns `Result<Vec<ArticleRecord>, SearchError>` plus a pure parser used
//! by the tests. [`SourceCollector::hybrid_search`] runs every query against
//! both endpoints one after another, sleeps after every call, and turns
//! endpoint errors into recorded [`SourceFailure`]s instead of aborting.

pub mod duckduckgo;
pub mod google_news;

use crate::config::SearchConfig;
use crate::dedupe::dedupe_articles;
use crate::error::SearchError;
use crate::models::{ArticleRecord, ArticleSource};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

/// An endpoint call that failed and contributed no articles.
#[derive(Debug)]
pub struct SourceFailure {
    pub query: String,
    pub source: ArticleSource,
    pub error: SearchError,
}

/// A failed endpoint call, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedSearch {
    pub query: String,
    pub source: ArticleSource,
    pub reason: String,
}

impl From<&SourceFailure> for FailedSearch {
    fn from(failure: &SourceFailure) -> Self {
        Self {
            query: failure.query.clone(),
            source: failure.source,
            reason: failure.error.to_string(),
        }
    }
}

/// Unique articles from a collection run, plus the calls that failed.
#[derive(Debug, Default)]
pub struct CollectionReport {
    pub articles: Vec<ArticleRecord>,
    pub failures: Vec<SourceFailure>,
}

impl CollectionReport {
    pub fn count_from(&self, source: ArticleSource) -> usize {
        self.articles.iter().filter(|a| a.source == source).count()
    }

    pub fn failed_searches(&self) -> Vec<FailedSearch> {
        self.failures.iter().map(FailedSearch::from).collect()
    }
}

/// Runs queries against both search endpoints with blind pacing.
#[derive(Debug)]
pub struct SourceCollector {
    client: Client,
    config: SearchConfig,
}

impl SourceCollector {
    pub fn new(config: SearchConfig) -> Self {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, config }
    }

    async fn pace(&self) {
        let delay: Duration = self.config.delay();
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }

    /// Search every query on both endpoints and deduplicate the hits.
    ///
    /// Never fails: an endpoint error is logged, recorded in
    /// [`CollectionReport::failures`] and contributes nothing.
    #[instrument(level = "info", skip_all, fields(queries = queries.len(), max_per_source))]
    pub async fn hybrid_search(&self, queries: &[String], max_per_source: usize) -> CollectionReport {
        let mut report = CollectionReport::default();
        let mut raw = Vec::new();

        for (i, query) in queries.iter().enumerate() {
            info!(index = i + 1, total = queries.len(), %query, "Searching");

            match google_news::search(&self.client, &self.config, query, max_per_source).await {
                Ok(articles) => raw.extend(articles),
                Err(error) => {
                    warn!(%query, error = %error, "Google News search failed");
                    report.failures.push(SourceFailure {
                        query: query.clone(),
                        source: ArticleSource::GoogleNews,
                        error,
                    });
                }
            }
            self.pace().await;

            match duckduckgo::search(&self.client, &self.config, query, max_per_source).await {
                Ok(articles) => raw.extend(articles),
                Err(error) => {
                    warn!(%query, error = %error, "DuckDuckGo search failed");
                    report.failures.push(SourceFailure {
                        query: query.clone(),
                        source: ArticleSource::DuckDuckGo,
                        error,
                    });
                }
            }
            self.pace().await;
        }

        let fetched = raw.len();
        report.articles = dedupe_articles(raw);
        info!(
            fetched,
            unique = report.articles.len(),
            failures = report.failures.len(),
            "Collected articles"
        );
        report
    }
}
