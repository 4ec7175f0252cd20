//! Command-line interface definitions for dt_scout.
//!
//! Every option can be given as a flag; the API key can also come from the
//! environment. Flags override values from the optional YAML config file.

use crate::models::Variant;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the dt_scout application.
///
/// # Examples
///
/// ```sh
/// # Enterprise leads in the default industries
/// dt_scout -o ./leads
///
/// # SME leads with job-platform presence, narrower selection
/// dt_scout -o ./leads --variant sme-jobs \
///     --industries Manufacturing,BFSI --technologies ERP,RPA
///
/// # Accumulate leads across runs
/// dt_scout -o ./leads --state-file ./leads/session.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output directory for the TSV and JSON exports
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Prompt, filter and scoring profile
    #[arg(long, value_enum, default_value_t = Variant::Enterprise)]
    pub variant: Variant,

    /// Target industries (comma separated); defaults come from the config
    #[arg(short, long, value_delimiter = ',')]
    pub industries: Vec<String>,

    /// Target technologies (comma separated); defaults come from the config
    #[arg(short, long, value_delimiter = ',')]
    pub technologies: Vec<String>,

    /// Maximum number of articles sent to the model
    #[arg(long, default_value_t = 25)]
    pub max_articles: usize,

    /// Maximum results taken from each search endpoint per query
    #[arg(long, default_value_t = 12)]
    pub max_per_source: usize,

    /// Articles per extraction batch (SME variants)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// JSON file holding the session state between runs
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Replace the companies saved in the state file instead of merging
    #[arg(long)]
    pub replace: bool,

    /// API key for the chat completions endpoint
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name override
    #[arg(long)]
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["dt_scout"]);

        assert_eq!(cli.variant, Variant::Enterprise);
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert_eq!(cli.max_articles, 25);
        assert_eq!(cli.max_per_source, 12);
        assert!(cli.industries.is_empty());
        assert!(cli.batch_size.is_none());
        assert!(cli.state_file.is_none());
        assert!(!cli.replace);
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "dt_scout",
            "--output-dir",
            "/tmp/leads",
            "--variant",
            "sme-jobs",
            "--industries",
            "Manufacturing,BFSI",
            "--technologies",
            "ERP",
            "--max-articles",
            "10",
            "--batch-size",
            "5",
            "--api-key",
            "gsk_test",
            "--model",
            "llama-3.1-8b-instant",
        ]);

        assert_eq!(cli.output_dir, PathBuf::from("/tmp/leads"));
        assert_eq!(cli.variant, Variant::SmeJobs);
        assert_eq!(cli.industries, vec!["Manufacturing", "BFSI"]);
        assert_eq!(cli.technologies, vec!["ERP"]);
        assert_eq!(cli.max_articles, 10);
        assert_eq!(cli.batch_size, Some(5));
        assert_eq!(cli.api_key.as_deref(), Some("gsk_test"));
        assert_eq!(cli.model.as_deref(), Some("llama-3.1-8b-instant"));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "dt_scout",
            "-c",
            "config.yaml",
            "-o",
            "./out",
            "-i",
            "Healthcare",
            "-t",
            "AI,Cloud",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("config.yaml")));
        assert_eq!(cli.output_dir, PathBuf::from("./out"));
        assert_eq!(cli.industries, vec!["Healthcare"]);
        assert_eq!(cli.technologies, vec!["AI", "Cloud"]);
    }
}
