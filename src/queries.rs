//! Search query generation.
//!
//! Queries are expanded from templates in a fixed order (industry templates,
//! industry × mapped technology, selected technologies, vendors), duplicates
//! are dropped keeping the first occurrence, and the list is capped. The
//! result is identical across runs for the same inputs.

use crate::config::QueryConfig;
use itertools::Itertools;
use tracing::{debug, instrument};

fn fill(template: &str, industry: &str, tech: &str, vendor: &str) -> String {
    template
        .replace("{industry}", industry)
        .replace("{tech}", tech)
        .replace("{vendor}", vendor)
}

/// Build the ordered, de-duplicated, capped list of queries.
#[instrument(level = "info", skip_all, fields(industries = industries.len(), technologies = technologies.len()))]
pub fn build_queries(
    industries: &[String],
    technologies: &[String],
    config: &QueryConfig,
) -> Vec<String> {
    let mut queries = Vec::new();

    for industry in industries {
        for template in &config.industry_templates {
            queries.push(fill(template, industry, "", ""));
        }
        if let Some(techs) = config.industry_technologies.get(industry) {
            for tech in techs {
                for template in &config.industry_tech_templates {
                    queries.push(fill(template, industry, tech, ""));
                }
            }
        }
    }

    for tech in technologies.iter().take(config.tech_limit) {
        for template in &config.tech_templates {
            queries.push(fill(template, "", tech, ""));
        }
    }

    for vendor in config.vendors.iter().take(config.vendor_limit) {
        for template in &config.vendor_templates {
            queries.push(fill(template, "", "", vendor));
        }
    }

    let generated = queries.len();
    let queries: Vec<String> = queries
        .into_iter()
        .unique()
        .take(config.max_queries)
        .collect();
    debug!(generated, kept = queries.len(), "Built search queries");
    queries
}
