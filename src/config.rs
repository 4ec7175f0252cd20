//! Runtime configuration loaded from an optional YAML file.
//!
//! Every field has a default, so an empty (or absent) file yields a working
//! configuration. Command-line flags are applied on top in `main`.
//!
//! ```yaml
//! search:
//!   exclude_regions: ["Kerala"]
//!   published_after: 2024-01-01
//! llm:
//!   model: llama-3.3-70b-versatile
//! extraction:
//!   batch_size: 25
//! ```

use crate::error::ConfigError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub queries: QueryConfig,
    pub llm: LlmConfig,
    pub extraction: ExtractionConfig,
    pub scoring: ScoringConfig,
}

impl Config {
    /// Load from `path`, or return defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            info!("No config file given; using defaults");
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml(&raw)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }
}

/// Search endpoints, qualifiers and pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub google_news_url: String,
    pub duckduckgo_url: String,
    pub user_agent: String,
    /// Appended to every query, e.g. `India`.
    pub region_qualifier: String,
    /// Regions whose articles are dropped (case-insensitive substring match).
    pub exclude_regions: Vec<String>,
    pub published_after: NaiveDate,
    /// A DuckDuckGo link is kept only if it contains one of these.
    pub approved_tlds: Vec<String>,
    pub google_timeout_secs: u64,
    pub duckduckgo_timeout_secs: u64,
    /// Pause after every endpoint call.
    pub delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            google_news_url: "https://news.google.com/rss".to_string(),
            duckduckgo_url: "https://html.duckduckgo.com/html/".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            region_qualifier: "India".to_string(),
            exclude_regions: strings(&["Kerala"]),
            published_after: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            approved_tlds: strings(&[".com", ".in", ".org", ".net", ".co"]),
            google_timeout_secs: 15,
            duckduckgo_timeout_secs: 20,
            delay_ms: 1000,
        }
    }
}

impl SearchConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// `India -Kerala` style suffix appended to every query.
    pub fn query_suffix(&self) -> String {
        let mut suffix = self.region_qualifier.clone();
        for region in &self.exclude_regions {
            if !suffix.is_empty() {
                suffix.push(' ');
            }
            suffix.push('-');
            suffix.push_str(region);
        }
        suffix
    }
}

/// Query templates. `{industry}`, `{tech}` and `{vendor}` are substituted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub industry_templates: Vec<String>,
    pub industry_tech_templates: Vec<String>,
    pub industry_technologies: BTreeMap<String, Vec<String>>,
    pub tech_templates: Vec<String>,
    pub tech_limit: usize,
    pub vendors: Vec<String>,
    pub vendor_templates: Vec<String>,
    pub vendor_limit: usize,
    pub max_queries: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        let mut industry_technologies = BTreeMap::new();
        industry_technologies.insert(
            "Manufacturing".to_string(),
            strings(&["ERP", "IIoT", "automation", "smart factory", "digital manufacturing"]),
        );
        industry_technologies.insert(
            "BFSI".to_string(),
            strings(&["core banking", "fintech", "digital lending", "risk analytics", "blockchain"]),
        );
        industry_technologies.insert(
            "Healthcare".to_string(),
            strings(&["EHR", "EMR", "telemedicine", "healthtech", "medical records"]),
        );
        industry_technologies.insert(
            "Hospitals".to_string(),
            strings(&[
                "hospital management",
                "patient records",
                "medical imaging AI",
                "healthcare analytics",
            ]),
        );

        Self {
            industry_templates: strings(&[
                "{industry} digital transformation India",
                "{industry} ERP implementation India",
                "{industry} AI adoption India",
                "{industry} cloud migration India",
                "{industry} automation initiative India",
            ]),
            industry_tech_templates: strings(&[
                "{industry} {tech} implementation India",
                "{industry} {tech} project India",
            ]),
            industry_technologies,
            tech_templates: strings(&[
                "{tech} implementation India",
                "{tech} project India",
                "{tech} adoption Indian companies",
                "implementing {tech} India",
            ]),
            tech_limit: 5,
            vendors: strings(&["TCS", "Infosys", "Wipro", "HCL", "Accenture", "IBM", "Capgemini"]),
            vendor_templates: strings(&[
                "{vendor} \"digital transformation\" client India",
                "{vendor} \"implemented\" India",
            ]),
            vendor_limit: 3,
            max_queries: 25,
        }
    }
}

/// Chat completion endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Attempts per article, including the first.
    pub max_attempts: usize,
    pub retry_pause_ms: u64,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            api_key: None,
            temperature: 0.1,
            max_tokens: 2500,
            max_attempts: 2,
            retry_pause_ms: 1000,
            timeout_secs: 60,
        }
    }
}

/// What the model is told to look for, and how articles are paced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub industries: Vec<String>,
    pub technologies: Vec<String>,
    /// Industries selected when none are given on the command line.
    pub default_industries: Vec<String>,
    pub default_technologies: Vec<String>,
    /// Sizes accepted by the SME variants (case-insensitive).
    pub approved_sizes: Vec<String>,
    pub job_platforms: Vec<String>,
    /// Characters of article content sent to the model.
    pub max_content_chars: usize,
    pub batch_size: usize,
    pub batch_delay_ms: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            industries: strings(&[
                "Manufacturing",
                "BFSI",
                "Healthcare",
                "Hospitals",
                "Pharmaceutical",
                "Insurance",
                "Banking",
                "Financial Services",
            ]),
            technologies: strings(&[
                "DMS",
                "Document Management System",
                "DCM",
                "Digital Contract Management",
                "ERP",
                "Enterprise Resource Planning",
                "RPA",
                "Robotic Process Automation",
                "Managed IT Services",
                "AI",
                "Artificial Intelligence",
                "Data Analytics",
                "digital transformation",
                "digital initiative",
                "technology transformation",
                "cloud migration",
                "automation",
                "business intelligence",
                "BI",
                "SAP",
                "Oracle",
                "Microsoft Dynamics",
                "Salesforce",
                "ServiceNow",
            ]),
            default_industries: strings(&["Manufacturing", "BFSI", "Healthcare"]),
            default_technologies: strings(&["ERP", "AI", "RPA", "DMS", "Data Analytics"]),
            approved_sizes: strings(&["Small", "Medium", "SME"]),
            job_platforms: strings(&["Naukri", "LinkedIn", "Indeed", "Foundit", "Instahire"]),
            max_content_chars: 3000,
            batch_size: 25,
            batch_delay_ms: 2000,
        }
    }
}

impl ExtractionConfig {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

/// A keyword and the points it contributes when found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTier {
    pub keywords: Vec<String>,
    pub points: u32,
}

impl KeywordTier {
    fn new(keywords: &[&str], points: u32) -> Self {
        Self {
            keywords: strings(keywords),
            points,
        }
    }
}

/// Keyword lists behind the relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub priority_industries: Vec<String>,
    pub tech_keywords: Vec<String>,
    pub tech_cap: u32,
    pub hiring_keywords: Vec<String>,
    /// Checked in order; the first tier with a match wins.
    pub size_tiers: Vec<KeywordTier>,
    /// Checked in order; the first tier with a match wins.
    pub revenue_tiers: Vec<KeywordTier>,
    pub max_score: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            priority_industries: strings(&["Manufacturing", "BFSI", "Healthcare"]),
            tech_keywords: strings(&["ERP", "AI", "DMS", "RPA", "analytics"]),
            tech_cap: 3,
            hiring_keywords: strings(&["hiring", "expanding"]),
            size_tiers: vec![
                KeywordTier::new(&["medium"], 3),
                KeywordTier::new(&["small", "sme"], 2),
            ],
            revenue_tiers: vec![
                KeywordTier::new(&["100 crore", "250 crore", "500 crore", "million"], 2),
                KeywordTier::new(&["crore", "lakh"], 1),
            ],
            max_score: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_is_default() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.queries.max_queries, 25);
        assert_eq!(config.llm.model, "llama-3.3-70b-versatile");
        assert_eq!(config.extraction.max_content_chars, 3000);
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = r#"
search:
  exclude_regions: ["Kerala", "Goa"]
  delay_ms: 0
llm:
  model: test-model
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.search.exclude_regions, vec!["Kerala", "Goa"]);
        assert_eq!(config.search.delay(), Duration::ZERO);
        assert_eq!(config.search.region_qualifier, "India");
        assert_eq!(config.llm.model, "test-model");
        assert_eq!(config.llm.max_attempts, 2);
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let err = Config::from_yaml("search: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_query_suffix() {
        let search = SearchConfig::default();
        assert_eq!(search.query_suffix(), "India -Kerala");
    }

    #[test]
    fn test_published_after_parses() {
        let config = Config::from_yaml("search:\n  published_after: 2025-06-01\n").unwrap();
        assert_eq!(
            config.search.published_after,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
    }
}
