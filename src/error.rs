//! Error types for each call site of the pipeline.
//!
//! Every outbound call returns a typed error so callers can tell "nothing
//! matched" apart from "the call failed":
//!
//! | Error | Raised by | Recovery |
//! |-------|-----------|----------|
//! | [`SearchError`] | search endpoints | empty result + recorded failure |
//! | [`LlmError`] | chat completion client | retried, then article skipped |
//! | [`ExtractError`] | per-article extraction | article skipped |
//! | [`ConfigError`] | startup | fatal |

use thiserror::Error;

/// Failure of a single search endpoint call.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} returned status {status}")]
    Status { endpoint: &'static str, status: u16 },

    #[error("malformed feed: {0}")]
    Feed(String),

    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
}

/// Failure of a language-model call.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("empty response from model")]
    EmptyResponse,
}

/// Reason a single article produced no company records.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model returned malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fatal startup problems; the pipeline never starts when one of these is raised.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("language-model API key missing (pass --api-key or set GROQ_API_KEY)")]
    MissingApiKey,

    #[error("at least one {0} must be selected")]
    EmptySelection(&'static str),
}
