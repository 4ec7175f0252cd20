//! Relevance scoring and ranking of company leads.
//!
//! The score is a sum of independent integer contributions:
//!
//! | Signal | Enterprise | SME |
//! |--------|-----------:|----:|
//! | confidence high / medium / low | 3 / 2 / 1 | 3 / 2 / 1 |
//! | priority industry | 2 | |
//! | size tier (first match) | | 3 / 2 |
//! | technology keywords in details | ≤ 3 | ≤ 3 |
//! | hiring keyword in hiring trend | 2 | 2 |
//! | revenue band (first match) | | 2 / 1 |
//! | present on a job platform (`sme-jobs`) | | 1 |
//!
//! SME scores are clamped to `max_score`; enterprise scores are not.

use crate::config::{KeywordTier, ScoringConfig};
use crate::models::{CompanyRecord, Confidence, Variant};
use crate::utils::{contains_any, count_matches};

/// Scorer bound to one variant and keyword set.
#[derive(Debug, Clone)]
pub struct Scorer {
    variant: Variant,
    config: ScoringConfig,
}

fn tier_points(text: &str, tiers: &[KeywordTier]) -> u32 {
    tiers
        .iter()
        .find(|tier| contains_any(text, &tier.keywords))
        .map_or(0, |tier| tier.points)
}

impl Scorer {
    pub fn new(variant: Variant, config: ScoringConfig) -> Self {
        Self { variant, config }
    }

    /// Score a record. Pure: depends only on the record's current fields.
    pub fn score(&self, company: &CompanyRecord) -> u32 {
        let mut score = match company.confidence {
            Confidence::High => 3,
            Confidence::Medium => 2,
            Confidence::Low => 1,
        };

        if self.variant.is_sme() {
            if let Some(size) = &company.company_size {
                score += tier_points(size, &self.config.size_tiers);
            }
        } else if self
            .config
            .priority_industries
            .iter()
            .any(|i| i == &company.industry)
        {
            score += 2;
        }

        let tech = count_matches(&company.transformation_details, &self.config.tech_keywords);
        score += u32::try_from(tech)
            .unwrap_or(u32::MAX)
            .min(self.config.tech_cap);

        if contains_any(&company.hiring_trend, &self.config.hiring_keywords) {
            score += 2;
        }

        if self.variant.is_sme() {
            score += tier_points(&company.revenue, &self.config.revenue_tiers);
            if self.variant.tracks_job_platforms() && !company.job_platforms.is_empty() {
                score += 1;
            }
            score = score.min(self.config.max_score);
        }

        score
    }

    /// Set `relevance_score` on every record.
    pub fn apply(&self, companies: &mut [CompanyRecord]) {
        for company in companies.iter_mut() {
            company.relevance_score = self.score(company);
        }
    }
}

/// Stable sort, highest score first; ties keep their prior order.
pub fn rank(companies: &mut [CompanyRecord]) {
    companies.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedupe::tests::company;

    fn scorer(variant: Variant) -> Scorer {
        Scorer::new(variant, ScoringConfig::default())
    }

    #[test]
    fn test_enterprise_contributions() {
        let mut c = company("XYZ Manufacturing Ltd");
        c.confidence = Confidence::High;
        c.industry = "Manufacturing".to_string();
        c.transformation_details = "SAP ERP to digitize factory operations".to_string();
        c.hiring_trend = "hiring 50 new staff".to_string();
        // 3 (high) + 2 (industry) + 1 (ERP) + 2 (hiring)
        assert_eq!(scorer(Variant::Enterprise).score(&c), 8);
    }

    #[test]
    fn test_tech_contribution_is_capped() {
        let mut c = company("Acme");
        c.confidence = Confidence::Low;
        c.industry = "Insurance".to_string();
        c.transformation_details = "ERP, AI, DMS, RPA and analytics".to_string();
        assert_eq!(scorer(Variant::Enterprise).score(&c), 1 + 3);
    }

    #[test]
    fn test_keywords_inside_words_add_nothing() {
        let mut c = company("Chain Co");
        c.confidence = Confidence::Low;
        c.industry = "Retail".to_string();
        c.transformation_details = "Retail chain maintains its supply chain".to_string();
        assert_eq!(scorer(Variant::Enterprise).score(&c), 1);
        c.transformation_details = "Retail chain rolls out AI-driven pricing".to_string();
        assert_eq!(scorer(Variant::Enterprise).score(&c), 2);
    }

    #[test]
    fn test_score_is_pure() {
        let c = company("Acme");
        let s = scorer(Variant::SmeJobs);
        assert_eq!(s.score(&c), s.score(&c));
    }

    #[test]
    fn test_sme_is_clamped() {
        let mut c = company("Max Co");
        c.confidence = Confidence::High;
        c.company_size = Some("Medium".to_string());
        c.transformation_details = "ERP AI DMS RPA analytics".to_string();
        c.hiring_trend = "Expanding team".to_string();
        c.revenue = "₹250 crore".to_string();
        c.job_platforms = vec!["Naukri".to_string()];
        // raw: 3 + 3 + 3 + 2 + 2 + 1 = 14
        assert_eq!(scorer(Variant::SmeJobs).score(&c), 10);
    }

    #[test]
    fn test_enterprise_is_not_clamped() {
        let config = ScoringConfig {
            tech_cap: 10,
            ..ScoringConfig::default()
        };
        let mut c = company("Big Co");
        c.confidence = Confidence::High;
        c.industry = "BFSI".to_string();
        c.transformation_details = "ERP AI DMS RPA analytics".to_string();
        c.hiring_trend = "hiring".to_string();
        // 3 + 2 + 5 + 2
        assert_eq!(Scorer::new(Variant::Enterprise, config).score(&c), 12);
    }

    #[test]
    fn test_sme_tiers_first_match_wins() {
        let mut c = company("Tier Co");
        c.confidence = Confidence::Medium;
        c.transformation_details = String::new();
        c.company_size = Some("Small".to_string());
        c.revenue = "₹40 crore".to_string();
        // 2 + 2 (small) + 1 (crore)
        assert_eq!(scorer(Variant::Sme).score(&c), 5);
        // the industry bonus is enterprise-only
        c.industry = "Manufacturing".to_string();
        assert_eq!(scorer(Variant::Sme).score(&c), 5);
    }

    #[test]
    fn test_job_bonus_only_for_sme_jobs() {
        let mut c = company("Jobs Co");
        c.transformation_details = String::new();
        c.job_platforms = vec!["LinkedIn".to_string()];
        assert_eq!(scorer(Variant::Sme).score(&c), 2);
        assert_eq!(scorer(Variant::SmeJobs).score(&c), 3);
        c.industry = "Retail".to_string();
        assert_eq!(scorer(Variant::EnterpriseJobs).score(&c), 2);
    }

    #[test]
    fn test_rank_is_stable_descending() {
        let mut companies: Vec<_> = [("a", 3), ("b", 7), ("c", 7), ("d", 1)]
            .into_iter()
            .map(|(name, score)| {
                let mut c = company(name);
                c.relevance_score = score;
                c
            })
            .collect();
        rank(&mut companies);
        let names: Vec<_> = companies.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a", "d"]);
    }
}
