//! Prompt text sent to the language model.
//!
//! The system prompt carries the business rules and the output schema; it
//! changes with the [`Variant`]. The user prompt carries one article.

use crate::api::Prompt;
use crate::config::{ExtractionConfig, SearchConfig};
use crate::models::{ArticleRecord, Variant};
use crate::utils::truncate_chars;

/// Everything the prompts need that does not change between articles.
#[derive(Debug, Clone)]
pub struct PromptContext {
    pub variant: Variant,
    pub industries: Vec<String>,
    pub technologies: Vec<String>,
    pub exclude_regions: Vec<String>,
    pub approved_sizes: Vec<String>,
    pub job_platforms: Vec<String>,
    pub max_content_chars: usize,
}

impl PromptContext {
    pub fn new(variant: Variant, extraction: &ExtractionConfig, search: &SearchConfig) -> Self {
        Self {
            variant,
            industries: extraction.industries.clone(),
            technologies: extraction.technologies.clone(),
            exclude_regions: search.exclude_regions.clone(),
            approved_sizes: extraction.approved_sizes.clone(),
            job_platforms: extraction.job_platforms.clone(),
            max_content_chars: extraction.max_content_chars,
        }
    }

    fn schema(&self) -> String {
        let mut fields = vec![
            r#""company_name": "extracted company name""#.to_string(),
            r#""website": "company website if mentioned, else empty""#.to_string(),
            format!(r#""industry": "one of {}""#, self.industries.join("/")),
        ];
        if self.variant.is_sme() {
            fields.push(format!(
                r#""company_size": "one of {} or Large""#,
                self.approved_sizes.join("/")
            ));
            fields.push(
                r#""revenue": "annual revenue or turnover band if mentioned (e.g. ₹50-100 crore), else 'Not specified'""#
                    .to_string(),
            );
        } else {
            fields.push(
                r#""revenue": "revenue information if mentioned, else 'Not specified'""#.to_string(),
            );
        }
        fields.extend([
            r#""digital_transformation": "Yes/No""#.to_string(),
            r#""transformation_details": "specific technologies and projects mentioned""#.to_string(),
            r#""hiring_trends_2025_2026": "hiring indications if mentioned, else 'Not specified'""#
                .to_string(),
        ]);
        if self.variant.tracks_job_platforms() {
            fields.push(format!(
                r#""job_platforms": ["job platforms the company is known to hire on, from {}"]"#,
                self.job_platforms.join(", ")
            ));
        }
        fields.extend([
            r#""source_validation": "how confident based on article content""#.to_string(),
            r#""confidence_score": "high/medium/low""#.to_string(),
        ]);

        let body = fields
            .iter()
            .map(|f| format!("            {}", f))
            .collect::<Vec<_>>()
            .join(",\n");
        format!(
            "{{\n    \"companies\": [\n        {{\n{}\n        }}\n    ]\n}}",
            body
        )
    }

    /// Business rules and output schema.
    pub fn system_prompt(&self) -> String {
        let focus = if self.variant.is_sme() {
            format!(
                "small and medium enterprises (company_size {}) undergoing digital transformation; skip large enterprises and listed conglomerates",
                self.approved_sizes.join("/")
            )
        } else {
            "companies undergoing digital transformation initiatives".to_string()
        };
        let exclusions = self.exclude_regions.join(", ");

        format!(
            "You are an expert Indian business analyst specializing in digital transformation. \
Extract company information from news articles with focus on digital initiatives.\n\n\
TARGET INDUSTRIES: {industries}\n\
DIGITAL TECHNOLOGIES: {technologies}\n\
EXCLUDE COMPANIES: Based in {exclusions}\n\n\
CRITICAL: Extract {focus}. Look for:\n\
- ERP, DMS, DCM, RPA implementations\n\
- AI and Data Analytics projects\n\
- Managed IT Services adoption\n\
- Digital transformation announcements\n\n\
Return EXACT JSON format:\n{schema}\n\n\
If no relevant companies found, return: {{\"companies\": []}}",
            industries = self.industries.join(", "),
            technologies = self.technologies.join(", "),
            exclusions = exclusions,
            focus = focus,
            schema = self.schema(),
        )
    }

    /// The article, truncated to the configured character budget.
    pub fn user_prompt(&self, article: &ArticleRecord) -> String {
        let content = truncate_chars(&article.content, self.max_content_chars);
        format!(
            "Analyze this Indian business/technology news article for companies undergoing digital transformation:\n\n\
TITLE: {title}\n\
CONTENT: {content}\n\n\
Extract ALL companies mentioned. Focus on:\n\
- Industries: {industries}\n\
- Technologies: {technologies}\n\
- Exclude companies based in {exclusions}\n\
- Look for revenue mentions and hiring trends for 2025-2026",
            title = article.title,
            content = content,
            industries = self.industries.join(", "),
            technologies = self.technologies.join(", "),
            exclusions = self.exclude_regions.join(", "),
        )
    }

    pub fn prompt_for(&self, article: &ArticleRecord) -> Prompt {
        Prompt {
            system: self.system_prompt(),
            user: self.user_prompt(article),
        }
    }
}
