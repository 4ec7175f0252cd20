//! First-seen deduplication by derived key.
//!
//! Order is preserved and the first record per key wins. There is no fuzzy
//! matching: two records collapse only if their keys are byte-identical.

use crate::models::{ArticleRecord, CompanyRecord};
use itertools::Itertools;
use std::hash::Hash;

/// Characters of the title that take part in the article key.
const TITLE_KEY_CHARS: usize = 100;

/// Keep the first record for each distinct key, preserving order.
pub fn dedupe_by<T, K, F>(records: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> K,
{
    records.into_iter().unique_by(key).collect()
}

/// (first 100 chars of title, link); kept apart so no separator can collide.
pub fn article_key(article: &ArticleRecord) -> (String, String) {
    let title: String = article.title.chars().take(TITLE_KEY_CHARS).collect();
    (title, article.link.clone())
}

/// Lowercased, trimmed company name.
pub fn company_key(company: &CompanyRecord) -> String {
    company.name.trim().to_lowercase()
}

pub fn dedupe_articles(articles: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    dedupe_by(articles, article_key)
}

pub fn dedupe_companies(companies: Vec<CompanyRecord>) -> Vec<CompanyRecord> {
    dedupe_by(companies, company_key)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{ArticleSource, Confidence};

    fn article(title: &str, link: &str, description: &str) -> ArticleRecord {
        ArticleRecord::new(
            title.to_string(),
            link.to_string(),
            description.to_string(),
            ArticleSource::GoogleNews,
            String::new(),
        )
    }

    pub(crate) fn company(name: &str) -> CompanyRecord {
        CompanyRecord {
            name: name.to_string(),
            website: "Not specified".to_string(),
            industry: "Manufacturing".to_string(),
            revenue: "Not specified".to_string(),
            digital_transformation: "Yes".to_string(),
            transformation_details: "ERP rollout".to_string(),
            hiring_trend: "Not specified".to_string(),
            confidence: Confidence::Medium,
            relevance_score: 0,
            source_link: "https://example.com".to_string(),
            source_article_title: "title".to_string(),
            source: ArticleSource::GoogleNews,
            published_date: String::new(),
            source_validation: String::new(),
            company_size: None,
            job_platforms: Vec::new(),
        }
    }

    #[test]
    fn test_article_key_collision_keeps_first() {
        let articles = vec![
            article("Same title", "https://a.in/1", "first"),
            article("Same title", "https://a.in/1", "second"),
            article("Same title", "https://a.in/2", "third"),
        ];
        let unique = dedupe_articles(articles);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].description, "first");
        assert_eq!(unique[1].description, "third");
    }

    #[test]
    fn test_article_key_uses_first_100_chars_of_title() {
        let prefix = "t".repeat(100);
        let articles = vec![
            article(&format!("{}AAA", prefix), "https://a.in/1", "first"),
            article(&format!("{}BBB", prefix), "https://a.in/1", "second"),
        ];
        let unique = dedupe_articles(articles);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].description, "first");
    }

    #[test]
    fn test_underscores_do_not_merge_distinct_articles() {
        let articles = vec![
            article("a_b", "c", "first"),
            article("a", "b_c", "second"),
        ];
        let unique = dedupe_articles(articles);
        assert_eq!(unique.len(), 2);
        assert_ne!(article_key(&unique[0]), article_key(&unique[1]));
    }

    #[test]
    fn test_company_key_folds_case_and_whitespace() {
        let companies = vec![
            company("Tata Steel"),
            company("  tata steel "),
            company("Tata Steels"),
        ];
        let unique = dedupe_companies(companies);
        let names: Vec<_> = unique.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Tata Steel", "Tata Steels"]);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let articles = vec![
            article("A", "https://a.in/1", "1"),
            article("B", "https://a.in/2", "2"),
            article("A", "https://a.in/1", "3"),
            article("C", "https://a.in/3", "4"),
        ];
        let once = dedupe_articles(articles);
        let twice = dedupe_articles(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dedupe_preserves_order() {
        let unique = dedupe_by(vec![3, 1, 3, 2, 1], |n| *n);
        assert_eq!(unique, vec![3, 1, 2]);
    }
}
