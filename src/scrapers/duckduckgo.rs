//! DuckDuckGo HTML search.
//!
//! Posts the query to the JavaScript-free `html.duckduckgo.com` endpoint and
//! scrapes the result blocks. Result links are usually wrapped in a
//! `//duckduckgo.com/l/?uddg=<percent-encoded url>` redirect, which is
//! unwrapped before filtering.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::models::{ArticleRecord, ArticleSource};
use crate::utils::contains_any;
use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument};

static RESULT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.result").expect("valid result selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.result__a").expect("valid title selector"));
static SNIPPET_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.result__snippet").expect("valid snippet selector"));
static UDDG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"uddg=([^&]+)").expect("valid uddg regex"));

/// Unwrap a DuckDuckGo redirect link; other links are returned unchanged.
pub fn resolve_redirect(link: &str) -> String {
    UDDG_RE
        .captures(link)
        .and_then(|caps| caps.get(1))
        .and_then(|m| urlencoding::decode(m.as_str()).ok())
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|| link.to_string())
}

/// Post a single query and parse the result page.
#[instrument(level = "info", skip(client, config))]
pub async fn search(
    client: &Client,
    config: &SearchConfig,
    query: &str,
    max_results: usize,
) -> Result<Vec<ArticleRecord>, SearchError> {
    let q = format!("{} {}", query, config.query_suffix());
    let params = [("q", q.as_str()), ("kl", "in-en")];

    let response = client
        .post(&config.duckduckgo_url)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "en-US,en;q=0.5")
        .form(&params)
        .timeout(Duration::from_secs(config.duckduckgo_timeout_secs))
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(SearchError::Status {
            endpoint: "DuckDuckGo",
            status: response.status().as_u16(),
        });
    }
    let body = response.text().await?;
    let articles = parse_results(&body, config, max_results);

    info!(count = articles.len(), "DuckDuckGo results");
    Ok(articles)
}

/// Parse a result page into article records.
///
/// Results mentioning an excluded region or linking outside the approved
/// top-level domains are dropped; at most `max_results` records are returned.
pub fn parse_results(html: &str, config: &SearchConfig, max_results: usize) -> Vec<ArticleRecord> {
    let document = Html::parse_document(html);
    let published = format!("{}+", config.published_after.year());

    let mut articles = Vec::new();
    for result in document.select(&RESULT_SELECTOR) {
        if articles.len() >= max_results {
            break;
        }
        let Some(title_elem) = result.select(&TITLE_SELECTOR).next() else {
            continue;
        };
        let title = title_elem.text().collect::<String>().trim().to_string();
        let Some(href) = title_elem.value().attr("href") else {
            continue;
        };
        let snippet = result
            .select(&SNIPPET_SELECTOR)
            .next()
            .map(|s| s.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        if contains_any(&format!("{} {}", title, snippet), &config.exclude_regions) {
            debug!(%title, "Dropping result from excluded region");
            continue;
        }

        let link = resolve_redirect(href);
        if !config
            .approved_tlds
            .iter()
            .any(|tld| link.contains(tld.as_str()))
        {
            debug!(%link, "Dropping result outside approved domains");
            continue;
        }

        articles.push(ArticleRecord::new(
            title,
            link,
            snippet,
            ArticleSource::DuckDuckGo,
            published.clone(),
        ));
    }
    articles
}
