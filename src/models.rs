//! Data models for fetched articles and extracted company leads.
//!
//! - [`ArticleRecord`]: one normalized search hit, produced by the scrapers
//! - [`CompanyRecord`]: one extracted company profile, produced by extraction
//! - [`ExtractionResponse`] / [`RawCompany`]: the JSON shape the model returns
//! - [`Variant`]: which prompt/scoring profile a run uses
//!
//! The raw model types use snake_case field names that match the JSON schema
//! written into the system prompt.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Placeholder written into optional fields the model left out.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Search surface an article was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArticleSource {
    GoogleNews,
    DuckDuckGo,
}

impl fmt::Display for ArticleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleSource::GoogleNews => f.write_str("Google News"),
            ArticleSource::DuckDuckGo => f.write_str("DuckDuckGo"),
        }
    }
}

/// A single search hit, normalized across endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub link: String,
    /// Snippet or feed description with markup removed.
    pub description: String,
    pub source: ArticleSource,
    /// Free-form date string as reported by the endpoint.
    pub published_date: String,
    /// `"{title}. {description}"`, the text sent to the model.
    pub content: String,
}

impl ArticleRecord {
    pub fn new(
        title: String,
        link: String,
        description: String,
        source: ArticleSource,
        published_date: String,
    ) -> Self {
        let content = format!("{}. {}", title, description);
        Self {
            title,
            link,
            description,
            source,
            published_date,
            content,
        }
    }
}

/// Model-reported confidence in an extracted company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Missing values count as medium; anything unrecognized counts as low.
    pub fn from_model(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()) {
            None => Confidence::Medium,
            Some(v) if v.is_empty() => Confidence::Medium,
            Some(v) => match v.as_str() {
                "high" => Confidence::High,
                "medium" => Confidence::Medium,
                _ => Confidence::Low,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// An extracted company lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub name: String,
    pub website: String,
    pub industry: String,
    pub revenue: String,
    /// `"Yes"` or `"No"`, as reported by the model.
    pub digital_transformation: String,
    pub transformation_details: String,
    pub hiring_trend: String,
    pub confidence: Confidence,
    pub relevance_score: u32,
    pub source_link: String,
    pub source_article_title: String,
    pub source: ArticleSource,
    pub published_date: String,
    pub source_validation: String,
    /// Size classification; only requested by the SME variants.
    pub company_size: Option<String>,
    /// Job platforms the company is hiring on; only requested by the job variants.
    #[serde(default)]
    pub job_platforms: Vec<String>,
}

/// Top-level object the model is instructed to return.
///
/// Entries stay untyped here so one unreadable company does not discard its
/// siblings; see [`RawCompany::from_value`].
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ExtractionResponse {
    #[serde(default)]
    pub companies: Vec<Value>,
}

/// One company entry exactly as the model returned it.
///
/// Every field is optional; [`RawCompany::into_record`] fills the gaps.
/// Text fields also accept numbers, booleans and lists of scalars, which the
/// model sometimes emits instead of strings.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RawCompany {
    #[serde(deserialize_with = "loose_text")]
    pub company_name: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub website: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub industry: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub revenue: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub digital_transformation: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub transformation_details: Option<String>,
    #[serde(alias = "hiring_trends", deserialize_with = "loose_text")]
    pub hiring_trends_2025_2026: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub source_validation: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub confidence_score: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub company_size: Option<String>,
    #[serde(deserialize_with = "loose_list")]
    pub job_platforms: Option<Vec<String>>,
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("Yes".to_string()),
        Value::Bool(false) => Some("No".to_string()),
        _ => None,
    }
}

fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(
            items.iter().filter_map(scalar_text).collect::<Vec<_>>().join(", "),
        )),
        Some(other) => scalar_text(&other)
            .map(Some)
            .ok_or_else(|| de::Error::custom("expected text, number or list")),
    }
}

/// A list of strings, or one comma-separated string.
fn loose_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.split(',').map(str::to_string).collect())),
        Some(Value::Array(items)) => Ok(Some(items.iter().filter_map(scalar_text).collect())),
        Some(_) => Err(de::Error::custom("expected a list or comma-separated text")),
    }
}

fn or_not_specified(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_SPECIFIED.to_string(),
    }
}

impl RawCompany {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// The company name, if it is usable as a record key.
    pub fn usable_name(&self) -> Option<&str> {
        let name = self.company_name.as_deref()?.trim();
        if name.is_empty() || name.eq_ignore_ascii_case("null") {
            None
        } else {
            Some(name)
        }
    }

    pub fn is_transforming(&self) -> bool {
        self.digital_transformation
            .as_deref()
            .is_some_and(|flag| flag.trim() == "Yes")
    }

    /// Build a [`CompanyRecord`] attributed to `article`.
    ///
    /// Returns `None` when the name is missing, empty or `"null"`.
    pub fn into_record(self, article: &ArticleRecord) -> Option<CompanyRecord> {
        let name = self.usable_name()?.to_string();
        let confidence = Confidence::from_model(self.confidence_score.as_deref());
        Some(CompanyRecord {
            name,
            website: or_not_specified(self.website),
            industry: or_not_specified(self.industry),
            revenue: or_not_specified(self.revenue),
            digital_transformation: self
                .digital_transformation
                .map(|f| f.trim().to_string())
                .unwrap_or_else(|| "No".to_string()),
            transformation_details: self
                .transformation_details
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| "Digital initiatives mentioned".to_string()),
            hiring_trend: or_not_specified(self.hiring_trends_2025_2026),
            confidence,
            relevance_score: 0,
            source_link: article.link.clone(),
            source_article_title: article.title.clone(),
            source: article.source,
            published_date: article.published_date.clone(),
            source_validation: self
                .source_validation
                .unwrap_or_else(|| "Article mentions digital initiatives".to_string()),
            company_size: self.company_size.map(|s| s.trim().to_string()),
            job_platforms: self
                .job_platforms
                .unwrap_or_default()
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        })
    }
}

/// Prompt, filter and scoring profile of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Enterprise-wide leads.
    Enterprise,
    /// Enterprise-wide leads with job-platform presence.
    EnterpriseJobs,
    /// Small and medium enterprises.
    Sme,
    /// Small and medium enterprises with job-platform presence.
    SmeJobs,
}

impl Variant {
    pub fn is_sme(&self) -> bool {
        matches!(self, Variant::Sme | Variant::SmeJobs)
    }

    pub fn tracks_job_platforms(&self) -> bool {
        matches!(self, Variant::EnterpriseJobs | Variant::SmeJobs)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Enterprise => "enterprise",
            Variant::EnterpriseJobs => "enterprise-jobs",
            Variant::Sme => "sme",
            Variant::SmeJobs => "sme-jobs",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> ArticleRecord {
        ArticleRecord::new(
            "XYZ goes digital".to_string(),
            "https://example.com/xyz".to_string(),
            "SAP ERP rollout".to_string(),
            ArticleSource::GoogleNews,
            "Mon, 06 Jan 2025 10:00:00 GMT".to_string(),
        )
    }

    #[test]
    fn test_article_content_joins_title_and_description() {
        let a = article();
        assert_eq!(a.content, "XYZ goes digital. SAP ERP rollout");
    }

    #[test]
    fn test_confidence_defaults() {
        assert_eq!(Confidence::from_model(None), Confidence::Medium);
        assert_eq!(Confidence::from_model(Some("HIGH")), Confidence::High);
        assert_eq!(Confidence::from_model(Some(" medium ")), Confidence::Medium);
        assert_eq!(Confidence::from_model(Some("unsure")), Confidence::Low);
    }

    #[test]
    fn test_raw_company_rejects_null_name() {
        let raw = RawCompany {
            company_name: Some("null".to_string()),
            ..Default::default()
        };
        assert!(raw.into_record(&article()).is_none());

        let raw = RawCompany {
            company_name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(raw.into_record(&article()).is_none());
    }

    #[test]
    fn test_raw_company_fills_defaults() {
        let raw = RawCompany {
            company_name: Some("  XYZ Manufacturing Ltd ".to_string()),
            digital_transformation: Some("Yes".to_string()),
            ..Default::default()
        };
        let record = raw.into_record(&article()).unwrap();
        assert_eq!(record.name, "XYZ Manufacturing Ltd");
        assert_eq!(record.website, NOT_SPECIFIED);
        assert_eq!(record.hiring_trend, NOT_SPECIFIED);
        assert_eq!(record.confidence, Confidence::Medium);
        assert_eq!(record.source_link, "https://example.com/xyz");
        assert_eq!(record.source_article_title, "XYZ goes digital");
        assert!(record.job_platforms.is_empty());
    }

    #[test]
    fn test_extraction_response_deserialization() {
        let json = r#"{
            "companies": [
                {
                    "company_name": "Acme Pharma",
                    "industry": "Pharmaceutical",
                    "digital_transformation": "Yes",
                    "hiring_trends": "hiring 200 engineers",
                    "confidence_score": "high",
                    "job_platforms": ["Naukri", "LinkedIn"]
                }
            ]
        }"#;
        let response: ExtractionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.companies.len(), 1);
        let company = RawCompany::from_value(response.companies[0].clone()).unwrap();
        assert!(company.is_transforming());
        assert_eq!(
            company.hiring_trends_2025_2026.as_deref(),
            Some("hiring 200 engineers")
        );
        assert_eq!(company.job_platforms.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_off_type_fields_are_coerced() {
        let value = serde_json::json!({
            "company_name": "Num Rev Co",
            "revenue": 120,
            "digital_transformation": true,
            "transformation_details": ["ERP", "RPA"],
            "job_platforms": "Naukri, LinkedIn"
        });
        let company = RawCompany::from_value(value).unwrap();
        assert_eq!(company.revenue.as_deref(), Some("120"));
        assert!(company.is_transforming());
        assert_eq!(company.transformation_details.as_deref(), Some("ERP, RPA"));

        let record = company.into_record(&article()).unwrap();
        assert_eq!(record.job_platforms, vec!["Naukri", "LinkedIn"]);
    }

    #[test]
    fn test_nested_object_field_is_unreadable() {
        let value = serde_json::json!({
            "company_name": "Odd Co",
            "revenue": { "amount": 5 }
        });
        assert!(RawCompany::from_value(value).is_err());
    }

    #[test]
    fn test_missing_companies_key_is_empty() {
        let response: ExtractionResponse = serde_json::from_str("{}").unwrap();
        assert!(response.companies.is_empty());
    }

    #[test]
    fn test_variant_flags() {
        assert!(!Variant::Enterprise.is_sme());
        assert!(Variant::SmeJobs.is_sme());
        assert!(Variant::SmeJobs.tracks_job_platforms());
        assert!(!Variant::Sme.tracks_job_platforms());
        assert_eq!(Variant::EnterpriseJobs.to_string(), "enterprise-jobs");
    }
}
