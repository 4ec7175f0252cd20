//! Company extraction from articles through the language model.
//!
//! One model call per article, strictly one after another. Every article ends
//! with an explicit [`ArticleOutcome`], so a skipped article can be told apart
//! from one that simply mentioned no qualifying company. In the SME variants
//! articles are processed in batches with a pause between batches; batching
//! never changes the result.

use crate::api::AskAsync;
use crate::error::ExtractError;
use crate::models::{ArticleRecord, CompanyRecord, ExtractionResponse, RawCompany};
use crate::prompts::PromptContext;
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// What happened to a single article.
#[derive(Debug)]
pub enum ArticleOutcome {
    /// The model named this many accepted companies.
    Extracted(usize),
    /// The reply was valid but no company passed the filters.
    NoCompanies,
    /// The model call failed on every attempt.
    CallFailed(ExtractError),
    /// The reply was not valid JSON of the expected shape.
    MalformedResponse(ExtractError),
}

impl ArticleOutcome {
    pub fn is_skipped(&self) -> bool {
        self.skip_reason().is_some()
    }

    /// Why the article contributed nothing because of a failure.
    pub fn skip_reason(&self) -> Option<String> {
        match self {
            ArticleOutcome::CallFailed(e) | ArticleOutcome::MalformedResponse(e) => {
                Some(e.to_string())
            }
            ArticleOutcome::Extracted(_) | ArticleOutcome::NoCompanies => None,
        }
    }

    /// Accepted companies; zero unless [`ArticleOutcome::Extracted`].
    pub fn companies(&self) -> usize {
        match self {
            ArticleOutcome::Extracted(n) => *n,
            _ => 0,
        }
    }
}

#[derive(Debug)]
pub struct ArticleResult {
    /// Zero-based position in the submitted article list.
    pub index: usize,
    pub title: String,
    pub outcome: ArticleOutcome,
}

/// An article the model could not process, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedArticle {
    pub index: usize,
    pub title: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ExtractionReport {
    pub companies: Vec<CompanyRecord>,
    pub results: Vec<ArticleResult>,
}

impl ExtractionReport {
    pub fn skipped(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_skipped()).count()
    }

    pub fn skipped_articles(&self) -> Vec<SkippedArticle> {
        self.results
            .iter()
            .filter_map(|r| {
                r.outcome.skip_reason().map(|reason| SkippedArticle {
                    index: r.index,
                    title: r.title.clone(),
                    reason,
                })
            })
            .collect()
    }

    /// Articles that yielded at least one accepted company.
    pub fn productive(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.companies() > 0).count()
    }
}

/// Sends articles to the model and turns replies into company records.
#[derive(Debug)]
pub struct Extractor<'a, A> {
    client: &'a A,
    context: PromptContext,
    approved_sizes: Vec<String>,
    batch_size: usize,
    batch_delay: Duration,
}

impl<'a, A> Extractor<'a, A>
where
    A: AskAsync<Response = String>,
{
    pub fn new(client: &'a A, context: PromptContext, batch_size: usize, batch_delay: Duration) -> Self {
        let approved_sizes = context.approved_sizes.clone();
        Self {
            client,
            context,
            approved_sizes,
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }

    /// Post-filter applied to every company the model returns.
    pub fn accept(&self, company: &RawCompany) -> bool {
        if company.usable_name().is_none() || !company.is_transforming() {
            return false;
        }
        if !self.context.variant.is_sme() {
            return true;
        }
        company.company_size.as_deref().is_some_and(|size| {
            self.approved_sizes
                .iter()
                .any(|approved| approved.eq_ignore_ascii_case(size.trim()))
        })
    }

    /// Parse a model reply into accepted company records for `article`.
    ///
    /// Only a reply that is not a JSON object with a `companies` list is an
    /// error; an entry that cannot be read is dropped on its own.
    pub fn parse_reply(
        &self,
        reply: &str,
        article: &ArticleRecord,
    ) -> Result<Vec<CompanyRecord>, ExtractError> {
        let response: ExtractionResponse = serde_json::from_str(reply.trim())?;
        let offered = response.companies.len();
        let companies: Vec<CompanyRecord> = response
            .companies
            .into_iter()
            .filter_map(|entry| {
                RawCompany::from_value(entry)
                    .inspect_err(|e| debug!(error = %e, "Dropping unreadable company entry"))
                    .ok()
            })
            .filter(|c| self.accept(c))
            .filter_map(|c| c.into_record(article))
            .collect();
        debug!(offered, accepted = companies.len(), "Filtered model companies");
        Ok(companies)
    }

    /// Run one article through the model.
    #[instrument(level = "info", skip_all, fields(title = %truncate_for_log(&article.title, 80)))]
    pub async fn extract_article(
        &self,
        article: &ArticleRecord,
    ) -> Result<Vec<CompanyRecord>, ExtractError> {
        let prompt = self.context.prompt_for(article);
        let reply = self.client.ask(&prompt).await?;
        self.parse_reply(&reply, article).inspect_err(|e| {
            warn!(
                error = %e,
                response_preview = %truncate_for_log(&reply, 300),
                "Model returned non-conforming JSON"
            );
        })
    }

    async fn process(&self, index: usize, total: usize, article: &ArticleRecord) -> (ArticleResult, Vec<CompanyRecord>) {
        info!(article = index + 1, total, "Analyzing article");
        let (outcome, companies) = match self.extract_article(article).await {
            Ok(companies) if companies.is_empty() => (ArticleOutcome::NoCompanies, companies),
            Ok(companies) => (ArticleOutcome::Extracted(companies.len()), companies),
            Err(e @ ExtractError::Llm(_)) => {
                warn!(article = index + 1, error = %e, "Model call failed; skipping article");
                (ArticleOutcome::CallFailed(e), Vec::new())
            }
            Err(e @ ExtractError::Json(_)) => {
                warn!(article = index + 1, error = %e, "Failed to parse model reply; skipping article");
                (ArticleOutcome::MalformedResponse(e), Vec::new())
            }
        };
        let result = ArticleResult {
            index,
            title: article.title.clone(),
            outcome,
        };
        (result, companies)
    }

    /// Extract companies from every article, batch by batch.
    ///
    /// Enterprise variants run a single batch; SME variants pause between
    /// batches of `batch_size` articles.
    #[instrument(level = "info", skip_all, fields(articles = articles.len(), variant = %self.context.variant))]
    pub async fn extract_all(&self, articles: &[ArticleRecord]) -> ExtractionReport {
        let mut report = ExtractionReport::default();
        if articles.is_empty() {
            return report;
        }

        let total = articles.len();
        let chunk = if self.context.variant.is_sme() {
            self.batch_size
        } else {
            total
        };
        let batches = total.div_ceil(chunk);

        for (b, batch) in articles.chunks(chunk).enumerate() {
            if b > 0 && !self.batch_delay.is_zero() {
                debug!(delay = ?self.batch_delay, "Pausing between batches");
                sleep(self.batch_delay).await;
            }
            info!(batch = b + 1, batches, size = batch.len(), "Processing batch");

            let offset = b * chunk;
            let processed: Vec<(ArticleResult, Vec<CompanyRecord>)> =
                stream::iter(batch.iter().enumerate())
                    .then(|(i, article)| self.process(offset + i, total, article))
                    .collect()
                    .await;

            for (result, companies) in processed {
                report.results.push(result);
                report.companies.extend(companies);
            }
        }

        info!(
            articles = total,
            companies = report.companies.len(),
            skipped = report.skipped(),
            "Extraction complete"
        );
        report
    }
}
