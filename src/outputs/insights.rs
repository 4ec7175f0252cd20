//! Aggregate view over a run's leads and articles.

use crate::models::{ArticleRecord, CompanyRecord, Confidence};
use crate::utils::contains_word;
use itertools::Itertools;
use serde::Serialize;
use tracing::info;

/// Technologies counted in [`Insights::technology_adoption`], in report order.
pub const ADOPTION_KEYWORDS: [&str; 6] = ["ERP", "AI", "Cloud", "RPA", "Analytics", "DMS"];

const HIRING_MARKERS: [&str; 2] = ["hiring", "expanding"];

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub total_companies: usize,
    /// Companies per industry, most common first.
    pub industry_distribution: Vec<(String, usize)>,
    /// Companies whose details name each technology as a whole word; zero
    /// counts omitted.
    pub technology_adoption: Vec<(String, usize)>,
    pub hiring_companies: usize,
    /// Percentage of companies showing hiring activity.
    pub hiring_share: f64,
    pub high_confidence: usize,
    /// Articles per search source, most common first.
    pub articles_by_source: Vec<(String, usize)>,
}

fn by_count_desc(counts: impl IntoIterator<Item = (String, usize)>) -> Vec<(String, usize)> {
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .collect()
}

fn is_hiring(company: &CompanyRecord) -> bool {
    let trend = company.hiring_trend.to_lowercase();
    HIRING_MARKERS.iter().any(|m| trend.contains(m))
}

impl Insights {
    pub fn compute(companies: &[CompanyRecord], articles: &[ArticleRecord]) -> Self {
        let industry_distribution =
            by_count_desc(companies.iter().map(|c| c.industry.clone()).counts());

        let technology_adoption = ADOPTION_KEYWORDS
            .iter()
            .map(|tech| {
                let count = companies
                    .iter()
                    .filter(|c| contains_word(&c.transformation_details, tech))
                    .count();
                (tech.to_string(), count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();

        let hiring_companies = companies.iter().filter(|c| is_hiring(c)).count();
        let hiring_share = if companies.is_empty() {
            0.0
        } else {
            hiring_companies as f64 * 100.0 / companies.len() as f64
        };

        Self {
            total_companies: companies.len(),
            industry_distribution,
            technology_adoption,
            hiring_companies,
            hiring_share,
            high_confidence: companies
                .iter()
                .filter(|c| c.confidence == Confidence::High)
                .count(),
            articles_by_source: by_count_desc(
                articles.iter().map(|a| a.source.to_string()).counts(),
            ),
        }
    }

    pub fn log(&self) {
        if self.total_companies == 0 {
            info!("No companies to summarize");
            return;
        }
        info!(
            companies = self.total_companies,
            high_confidence = self.high_confidence,
            hiring = self.hiring_companies,
            hiring_share = %format!("{:.1}%", self.hiring_share),
            "Digital transformation insights"
        );
        for (industry, count) in &self.industry_distribution {
            info!(%industry, count, "Industry distribution");
        }
        for (technology, count) in &self.technology_adoption {
            info!(%technology, count, "Technology adoption");
        }
        for (source, count) in &self.articles_by_source {
            info!(%source, count, "Articles by source");
        }
    }
}
