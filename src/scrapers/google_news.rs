//! Google News RSS search.
//!
//! Queries `news.google.com/rss/search` with the India locale, appends the
//! region qualifier, exclusion terms and a `after:` cutoff to the query, and
//! parses the RSS 2.0 `<item>` list with `quick-xml`.
//!
//! # URL Pattern
//!
//! ```text
//! https://news.google.com/rss/search?q=ERP+India+-Kerala+after%3A2024-01-01&hl=en-IN&gl=IN&ceid=IN%3Aen
//! ```

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::models::{ArticleRecord, ArticleSource};
use crate::utils::{contains_any, strip_tags};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use quick_xml::Reader;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

#[derive(Debug, Clone, Copy)]
enum Field {
    Title,
    Link,
    PubDate,
    Description,
}

#[derive(Debug, Default)]
struct FeedItem {
    title: String,
    link: String,
    pub_date: String,
    description: String,
}

impl FeedItem {
    fn push(&mut self, field: Field, text: &str) {
        let target = match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::PubDate => &mut self.pub_date,
            Field::Description => &mut self.description,
        };
        target.push_str(text);
    }
}

fn feed_err(e: impl std::fmt::Display) -> SearchError {
    SearchError::Feed(e.to_string())
}

/// Build the feed URL for `query`.
pub fn feed_url(config: &SearchConfig, query: &str) -> Result<Url, SearchError> {
    let mut url = Url::parse(&format!(
        "{}/search",
        config.google_news_url.trim_end_matches('/')
    ))?;
    let q = format!(
        "{} {} after:{}",
        query,
        config.query_suffix(),
        config.published_after.format("%Y-%m-%d")
    );
    url.query_pairs_mut()
        .append_pair("q", &q)
        .append_pair("hl", "en-IN")
        .append_pair("gl", "IN")
        .append_pair("ceid", "IN:en");
    Ok(url)
}

/// Fetch and parse the feed for a single query.
#[instrument(level = "info", skip(client, config))]
pub async fn search(
    client: &Client,
    config: &SearchConfig,
    query: &str,
    max_results: usize,
) -> Result<Vec<ArticleRecord>, SearchError> {
    let url = feed_url(config, query)?;
    debug!(%url, "Fetching Google News RSS");

    let response = client
        .get(url)
        .timeout(Duration::from_secs(config.google_timeout_secs))
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(SearchError::Status {
            endpoint: "Google News",
            status: response.status().as_u16(),
        });
    }
    let body = response.text().await?;
    let articles = parse_feed(&body, config, max_results)?;

    info!(count = articles.len(), "Google News results");
    Ok(articles)
}

fn resolve_reference(reference: &BytesRef<'_>) -> Result<String, SearchError> {
    if let Some(ch) = reference.resolve_char_ref().map_err(feed_err)? {
        return Ok(ch.to_string());
    }
    let name = reference.decode().map_err(feed_err)?;
    Ok(match resolve_predefined_entity(&name) {
        Some(resolved) => resolved.to_string(),
        None => format!("&{};", name),
    })
}

/// Parse an RSS document into article records.
///
/// Descriptions are stripped of markup, items mentioning an excluded region
/// are dropped, and at most `max_results` records are returned.
pub fn parse_feed(
    xml: &str,
    config: &SearchConfig,
    max_results: usize,
) -> Result<Vec<ArticleRecord>, SearchError> {
    let mut reader = Reader::from_str(xml);
    let mut items = Vec::new();
    let mut current: Option<FeedItem> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event().map_err(feed_err)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"item" => current = Some(FeedItem::default()),
                b"title" => field = Some(Field::Title),
                b"link" => field = Some(Field::Link),
                b"pubDate" => field = Some(Field::PubDate),
                b"description" => field = Some(Field::Description),
                _ => field = None,
            },
            Event::End(e) => {
                if e.local_name().as_ref() == b"item" {
                    if let Some(item) = current.take() {
                        items.push(item);
                    }
                }
                field = None;
            }
            Event::Text(t) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    item.push(f, &t.decode().map_err(feed_err)?);
                }
            }
            Event::CData(c) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    item.push(f, &c.decode().map_err(feed_err)?);
                }
            }
            Event::GeneralRef(r) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    item.push(f, &resolve_reference(&r)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let total = items.len();
    let articles: Vec<ArticleRecord> = items
        .into_iter()
        .filter_map(|item| {
            let title = item.title.trim().to_string();
            let description = strip_tags(&item.description).trim().to_string();
            if contains_any(
                &format!("{} {}", title, description),
                &config.exclude_regions,
            ) {
                debug!(%title, "Dropping item from excluded region");
                return None;
            }
            Some(ArticleRecord::new(
                title,
                item.link.trim().to_string(),
                description,
                ArticleSource::GoogleNews,
                item.pub_date.trim().to_string(),
            ))
        })
        .take(max_results)
        .collect();

    debug!(total, kept = articles.len(), "Parsed Google News feed");
    Ok(articles)
}
