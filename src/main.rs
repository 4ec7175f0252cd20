//! # dt_scout
//!
//! A lead-discovery pipeline that searches Indian business news for
//! companies undergoing digital transformation, extracts structured company
//! profiles through an OpenAI-compatible LLM API, scores and ranks them, and
//! exports the result as TSV and JSON.
//!
//! ## Features
//!
//! - Targeted query generation per industry, technology and vendor
//! - Hybrid search over Google News RSS and DuckDuckGo HTML
//! - Region exclusion and domain filtering before any model call
//! - Four profiles: `enterprise`, `enterprise-jobs`, `sme`, `sme-jobs`
//! - Ranked TSV/JSON exports, run insights and an optional session state file
//!
//! ## Usage
//!
//! ```sh
//! GROQ_API_KEY=... dt_scout -o ./leads --variant sme
//! ```
//!
//! ## Architecture
//!
//! 1. **Queries**: expand the selected industries and technologies
//! 2. **Collection**: search both endpoints, sequentially, with pacing
//! 3. **Extraction**: one model call per article, batched for SME variants
//! 4. **Ranking**: dedupe by company name, score, stable sort
//! 5. **Output**: TSV, JSON, logged insights, saved state

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod config;
mod dedupe;
mod error;
mod extract;
mod models;
mod outputs;
mod pipeline;
mod prompts;
mod queries;
mod scoring;
mod scrapers;
mod state;
mod utils;

use cli::Cli;
use config::Config;
use error::ConfigError;
use outputs::insights::Insights;
use outputs::json::{self, CompanyReport};
use outputs::tsv;
use pipeline::RunOptions;
use scrapers::SourceCollector;
use state::AppState;
use utils::ensure_writable_dir;

/// `--api-key` (or `GROQ_API_KEY`) wins over the config file.
fn resolve_api_key(cli: &Cli, config: &Config) -> Result<String, ConfigError> {
    cli.api_key
        .as_deref()
        .or(config.llm.api_key.as_deref())
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::MissingApiKey)
}

fn selection(
    requested: &[String],
    defaults: &[String],
    what: &'static str,
) -> Result<Vec<String>, ConfigError> {
    let chosen: Vec<String> = if requested.is_empty() {
        defaults.to_vec()
    } else {
        requested.to_vec()
    };
    let chosen: Vec<String> = chosen
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if chosen.is_empty() {
        return Err(ConfigError::EmptySelection(what));
    }
    Ok(chosen)
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("dt_scout starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.output_dir, variant = %args.variant, "Parsed CLI arguments");

    // ---- Config & preconditions ----
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(model) = &args.model {
        config.llm.model = model.clone();
    }
    if let Some(batch_size) = args.batch_size {
        config.extraction.batch_size = batch_size;
    }

    let api_key = match resolve_api_key(&args, &config) {
        Ok(key) => key,
        Err(e) => {
            error!(error = %e, "Cannot start without a language-model API key");
            return Err(e.into());
        }
    };
    let industries = selection(
        &args.industries,
        &config.extraction.default_industries,
        "industry",
    )?;
    let technologies = selection(
        &args.technologies,
        &config.extraction.default_technologies,
        "technology",
    )?;

    let output_dir = args.output_dir.display().to_string();
    if let Err(e) = ensure_writable_dir(&output_dir).await {
        error!(
            path = %output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Session state ----
    let mut state = match &args.state_file {
        Some(path) => AppState::load(path).await?,
        None => AppState::default(),
    };

    // ---- Pipeline ----
    let options = RunOptions {
        variant: args.variant,
        industries,
        technologies,
        max_articles: args.max_articles,
        max_per_source: args.max_per_source,
        replace: args.replace,
    };
    info!(
        variant = %options.variant,
        industries = ?options.industries,
        technologies = ?options.technologies,
        model = %config.llm.model,
        "Starting discovery"
    );

    let collector = SourceCollector::new(config.search.clone());
    let client = api::build_client(&config.llm, &api_key);
    let summary = pipeline::run(&mut state, &collector, &client, &config, &options).await;

    // ---- Output ----
    let generated_at = Local::now();
    if let Err(e) =
        tsv::write_tsv(&state.companies, options.variant, &generated_at, &args.output_dir).await
    {
        error!(error = %e, "Failed to write TSV export");
    }

    let report = CompanyReport {
        generated_at,
        variant: options.variant,
        industries: &options.industries,
        technologies: &options.technologies,
        summary: &summary,
        companies: &state.companies,
    };
    if let Err(e) = json::write_companies(&report, &args.output_dir).await {
        error!(error = %e, "Failed to write JSON export");
    }

    Insights::compute(&state.companies, &state.articles).log();

    if let Some(path) = &args.state_file {
        if let Err(e) = state.save(path).await {
            warn!(path = %path.display(), error = %e, "Failed to save session state");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        companies = state.companies.len(),
        added = summary.companies_added,
        "Execution complete"
    );

    Ok(())
}
