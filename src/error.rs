//! Crate-wide error and result types.
//!
//! The core speaks a small set of typed error kinds independent of
//! transport. Opportunity-level rejections are not represented here — they
//! live on `Opportunity::validation_trail` as data, not as `Err`.

use thiserror::Error;

/// Errors surfaced while loading and validating [`crate::app::config::Config`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    /// Market Source could not be reached after exhausting its retry budget.
    /// Fatal for the scan (`SOURCE_UNAVAILABLE`).
    #[error("market source unavailable after {attempts} attempts: {reason}")]
    SourceUnavailable { attempts: u32, reason: String },

    /// A page or record could not be decoded (`SOURCE_FORMAT`). Not fatal;
    /// the offending record is skipped by the caller.
    #[error("malformed venue data: {0}")]
    SourceFormat(String),

    /// A parser refuses to guess (`PARSE_AMBIGUOUS`). Not fatal.
    #[error("ambiguous parse: {0}")]
    ParseAmbiguous(String),

    /// The LLM Analyzer's response could not be recovered as JSON even
    /// after stripping prose (`ANALYZER_PARSE_FAILURE`). Not fatal; the
    /// pair under analysis is skipped.
    #[error("could not parse analyzer response: {0}")]
    AnalyzerParseFailure(String),

    /// The scan's LLM call budget (`scan.max_llm_calls`) was exhausted
    /// (`ANALYZER_BUDGET_EXHAUSTED`). Not fatal; remaining candidates are
    /// skipped for the rest of the scan.
    #[error("analyzer call budget of {max_calls} exhausted")]
    AnalyzerBudgetExhausted { max_calls: u32 },

    /// The scan was canceled by the caller.
    #[error("scan canceled")]
    Canceled,

    #[error("invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, Error>;
