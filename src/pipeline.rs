//! The fetch → dedupe → extract → dedupe → score → rank pipeline.
//!
//! Stages run strictly in sequence against an explicit [`AppState`]:
//! 1. **Queries**: expand templates into a capped query list
//! 2. **Collection**: search both endpoints per query, dedupe articles
//! 3. **Extraction**: one model call per article (up to `max_articles`)
//! 4. **Ranking**: dedupe companies by name, score, stable sort
//! 5. **Merge**: fold the ranked leads into the session state

use crate::api::AskAsync;
use crate::config::Config;
use crate::dedupe::dedupe_companies;
use crate::extract::{Extractor, SkippedArticle};
use crate::models::{ArticleRecord, ArticleSource, CompanyRecord, Variant};
use crate::prompts::PromptContext;
use crate::queries::build_queries;
use crate::scoring::{rank, Scorer};
use crate::scrapers::{FailedSearch, SourceCollector};
use crate::state::AppState;
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Per-run selections, usually taken from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub variant: Variant,
    pub industries: Vec<String>,
    pub technologies: Vec<String>,
    pub max_articles: usize,
    pub max_per_source: usize,
    /// Replace the accumulated companies instead of merging into them.
    pub replace: bool,
}

/// Counters and failure details describing one pipeline run.
///
/// The failure lists tell "nothing matched" apart from "the call failed".
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub queries: usize,
    pub articles_found: usize,
    pub google_news_articles: usize,
    pub duckduckgo_articles: usize,
    pub search_failures: usize,
    pub articles_analyzed: usize,
    /// Articles that yielded at least one accepted company.
    pub articles_with_companies: usize,
    pub articles_skipped: usize,
    pub companies_extracted: usize,
    pub companies_added: usize,
    pub failed_searches: Vec<FailedSearch>,
    pub skipped_articles: Vec<SkippedArticle>,
}

/// Ranked leads from one extraction pass.
#[derive(Debug, Default)]
pub struct Analysis {
    pub companies: Vec<CompanyRecord>,
    pub analyzed: usize,
    pub productive: usize,
    pub skipped: Vec<SkippedArticle>,
}

/// Extract, dedupe, score and rank companies from already-collected articles.
#[instrument(level = "info", skip_all, fields(articles = articles.len(), variant = %options.variant))]
pub async fn analyze_articles<A>(
    articles: &[ArticleRecord],
    client: &A,
    config: &Config,
    options: &RunOptions,
) -> Analysis
where
    A: AskAsync<Response = String>,
{
    let selected = &articles[..articles.len().min(options.max_articles)];

    let mut context = PromptContext::new(options.variant, &config.extraction, &config.search);
    if !options.industries.is_empty() {
        context.industries = options.industries.clone();
    }
    let extractor = Extractor::new(
        client,
        context,
        config.extraction.batch_size,
        config.extraction.batch_delay(),
    );
    let report = extractor.extract_all(selected).await;
    let skipped = report.skipped_articles();
    let productive = report.productive();

    let mut companies = dedupe_companies(report.companies);
    let scorer = Scorer::new(options.variant, config.scoring.clone());
    scorer.apply(&mut companies);
    rank(&mut companies);

    info!(
        analyzed = selected.len(),
        productive,
        skipped = skipped.len(),
        companies = companies.len(),
        "Ranked companies"
    );
    Analysis {
        companies,
        analyzed: selected.len(),
        productive,
        skipped,
    }
}

/// Run every stage and merge the result into `state`.
#[instrument(level = "info", skip_all, fields(variant = %options.variant))]
pub async fn run<A>(
    state: &mut AppState,
    collector: &SourceCollector,
    client: &A,
    config: &Config,
    options: &RunOptions,
) -> RunSummary
where
    A: AskAsync<Response = String>,
{
    let mut summary = RunSummary::default();

    let queries = build_queries(&options.industries, &options.technologies, &config.queries);
    summary.queries = queries.len();
    info!(
        queries = queries.len(),
        industries = options.industries.len(),
        "Using targeted queries"
    );

    let collection = collector
        .hybrid_search(&queries, options.max_per_source)
        .await;
    summary.articles_found = collection.articles.len();
    summary.google_news_articles = collection.count_from(ArticleSource::GoogleNews);
    summary.duckduckgo_articles = collection.count_from(ArticleSource::DuckDuckGo);
    summary.search_failures = collection.failures.len();
    summary.failed_searches = collection.failed_searches();
    state.replace_articles(collection.articles);

    if state.articles.is_empty() {
        warn!(
            failures = summary.search_failures,
            "No articles found; check connectivity or broaden the selection"
        );
        return summary;
    }

    let Analysis {
        companies,
        analyzed,
        productive,
        skipped,
    } = analyze_articles(&state.articles, client, config, options).await;
    summary.articles_analyzed = analyzed;
    summary.articles_with_companies = productive;
    summary.articles_skipped = skipped.len();
    summary.skipped_articles = skipped;
    summary.companies_extracted = companies.len();
    if companies.is_empty() {
        warn!("No digital transformation companies extracted");
    }
    summary.companies_added = if options.replace {
        state.replace_companies(companies);
        state.companies.len()
    } else {
        state.merge_companies(companies)
    };

    info!(
        articles = summary.articles_found,
        analyzed = summary.articles_analyzed,
        skipped = summary.articles_skipped,
        search_failures = summary.search_failures,
        added = summary.companies_added,
        "Pipeline finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::extract::tests::{xyz_article, ScriptedAsk, XYZ_REPLY};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn options(variant: Variant) -> RunOptions {
        RunOptions {
            variant,
            industries: vec!["Manufacturing".to_string()],
            technologies: vec!["ERP".to_string()],
            max_articles: 25,
            max_per_source: 12,
            replace: false,
        }
    }

    fn quiet_config() -> Config {
        let mut config = Config::default();
        config.search.delay_ms = 0;
        config.extraction.batch_delay_ms = 0;
        config.queries.max_queries = 1;
        config
    }

    #[tokio::test]
    async fn test_xyz_article_yields_scored_lead() {
        let ask = ScriptedAsk::new(vec![Some(XYZ_REPLY)]);
        let analysis = analyze_articles(
            &[xyz_article()],
            &ask,
            &quiet_config(),
            &options(Variant::Enterprise),
        )
        .await;

        assert_eq!((analysis.analyzed, analysis.productive), (1, 1));
        assert!(analysis.skipped.is_empty());
        assert_eq!(analysis.companies.len(), 1);
        let lead = &analysis.companies[0];
        assert_eq!(lead.name, "XYZ Manufacturing Ltd");
        assert_eq!(lead.digital_transformation, "Yes");
        // high (3) + priority industry (2) + ERP (1) + hiring (2)
        assert_eq!(lead.relevance_score, 8);
    }

    #[tokio::test]
    async fn test_duplicate_companies_collapse_before_scoring() {
        let ask = ScriptedAsk::new(vec![Some(XYZ_REPLY), Some(XYZ_REPLY)]);
        let mut second = xyz_article();
        second.link = "https://example.com/other".to_string();
        let companies = analyze_articles(
            &[xyz_article(), second],
            &ask,
            &quiet_config(),
            &options(Variant::Enterprise),
        )
        .await
        .companies;
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].source_link, "https://example.com/xyz");
    }

    #[tokio::test]
    async fn test_max_articles_limits_model_calls() {
        let ask = ScriptedAsk::new(vec![Some("{\"companies\": []}"); 3]);
        let articles = vec![xyz_article(), xyz_article(), xyz_article()];
        let mut opts = options(Variant::Enterprise);
        opts.max_articles = 2;
        let analysis = analyze_articles(&articles, &ask, &quiet_config(), &opts).await;
        assert_eq!(analysis.analyzed, 2);
        assert_eq!(ask.prompts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_excluded_region_never_reaches_extraction() {
        let feed = r#"<rss><channel>
<item><title>Kochi hospital chain deploys AI and ERP</title><link>https://news.in/kochi</link><pubDate>d</pubDate><description>The Kochi, Kerala group rolled out SAP ERP</description></item>
<item><title>XYZ Manufacturing Ltd goes live on SAP</title><link>https://example.com/xyz</link><pubDate>d</pubDate><description>XYZ Manufacturing Ltd implemented SAP ERP to digitize its factory operations in Pune, hiring 50 new staff for the rollout</description></item>
</channel></rss>"#;
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let mut config = quiet_config();
        config.search = SearchConfig {
            google_news_url: server.uri(),
            duckduckgo_url: server.uri(),
            delay_ms: 0,
            ..SearchConfig::default()
        };
        let collector = SourceCollector::new(config.search.clone());
        let ask = ScriptedAsk::new(vec![Some(XYZ_REPLY)]);
        let mut state = AppState::default();

        let summary = run(&mut state, &collector, &ask, &config, &options(Variant::Enterprise)).await;

        assert_eq!(summary.queries, 1);
        assert_eq!(summary.articles_found, 1);
        assert_eq!(summary.articles_analyzed, 1);
        assert_eq!(summary.companies_added, 1);
        let prompts = ask.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(!prompts[0].user.to_lowercase().contains("kochi"));
        assert_eq!(state.companies[0].name, "XYZ Manufacturing Ltd");
    }

    #[tokio::test]
    async fn test_replace_discards_previous_companies() {
        let server = MockServer::start().await;
        let feed = r#"<rss><channel><item><title>XYZ Manufacturing Ltd goes live on SAP</title><link>https://example.com/xyz</link><pubDate>d</pubDate><description>SAP ERP in Pune</description></item></channel></rss>"#;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let mut config = quiet_config();
        config.search.google_news_url = server.uri();
        config.search.duckduckgo_url = server.uri();
        let collector = SourceCollector::new(config.search.clone());

        let mut state = AppState::default();
        state.merge_companies(vec![crate::dedupe::tests::company("Old Co")]);

        let ask = ScriptedAsk::new(vec![Some(XYZ_REPLY)]);
        let mut opts = options(Variant::Enterprise);
        opts.replace = true;
        let summary = run(&mut state, &collector, &ask, &config, &opts).await;

        assert_eq!(summary.companies_added, 1);
        let names: Vec<_> = state.companies.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["XYZ Manufacturing Ltd"]);
    }

    #[tokio::test]
    async fn test_no_articles_skips_extraction() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut config = quiet_config();
        config.search.google_news_url = server.uri();
        config.search.duckduckgo_url = server.uri();
        let collector = SourceCollector::new(config.search.clone());
        let ask = ScriptedAsk::new(vec![]);
        let mut state = AppState::default();

        let summary = run(&mut state, &collector, &ask, &config, &options(Variant::Sme)).await;
        assert_eq!(summary.search_failures, 2);
        let sources: Vec<_> = summary.failed_searches.iter().map(|f| f.source).collect();
        assert_eq!(sources, vec![ArticleSource::GoogleNews, ArticleSource::DuckDuckGo]);
        assert!(summary.failed_searches.iter().all(|f| f.reason.contains("500")));
        assert_eq!(summary.articles_analyzed, 0);
        assert!(ask.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_skipped_articles_reach_summary() {
        let feed = r#"<rss><channel>
<item><title>XYZ Manufacturing Ltd goes live on SAP</title><link>https://example.com/xyz</link><pubDate>d</pubDate><description>SAP ERP in Pune</description></item>
<item><title>Pune plant adds cloud analytics</title><link>https://example.com/pune</link><pubDate>d</pubDate><description>A Pune plant moved to cloud analytics</description></item>
</channel></rss>"#;
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let mut config = quiet_config();
        config.search.google_news_url = server.uri();
        config.search.duckduckgo_url = server.uri();
        let collector = SourceCollector::new(config.search.clone());
        let ask = ScriptedAsk::new(vec![Some(XYZ_REPLY), None]);
        let mut state = AppState::default();

        let summary = run(&mut state, &collector, &ask, &config, &options(Variant::Enterprise)).await;

        assert_eq!(summary.articles_analyzed, 2);
        assert_eq!(summary.articles_with_companies, 1);
        assert_eq!(summary.articles_skipped, 1);
        assert!(summary.failed_searches.is_empty());
        let skipped = &summary.skipped_articles[0];
        assert_eq!(skipped.index, 1);
        assert_eq!(skipped.title, "Pune plant adds cloud analytics");
        assert!(skipped.reason.starts_with("model call failed"));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["skipped_articles"][0]["title"], "Pune plant adds cloud analytics");
        assert_eq!(json["failed_searches"], serde_json::json!([]));
    }
}
