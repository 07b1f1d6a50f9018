//! Error taxonomy for FaqClaw.
//!
//! Retrieval errors (`EmptyCorpus`, `NoFaqs`, `MalformedRecord`) are
//! deterministic and data-dependent — they are never retried. Provider
//! errors (`Http`, `Provider`, `ApiKeyMissing`) may be transient and are
//! handled by the bot layer, which always degrades to a stored answer or
//! a canned message instead of surfacing them to the user.

use thiserror::Error;

/// Convenience alias used across all FaqClaw crates.
pub type Result<T> = std::result::Result<T, FaqClawError>;

#[derive(Debug, Error)]
pub enum FaqClawError {
    /// No FAQ entries to build a TF-IDF model from. Fatal at startup.
    #[error("FAQ corpus is empty — nothing to build a model from")]
    EmptyCorpus,

    /// Matcher invoked against an empty document set. Should not happen
    /// once startup has succeeded.
    #[error("no FAQ vectors to match against")]
    NoFaqs,

    /// A dataset entry is missing required fields or violates id
    /// uniqueness. Rejected at load time.
    #[error("malformed FAQ record: {0}")]
    MalformedRecord(String),

    /// Configuration file problems.
    #[error("config error: {0}")]
    Config(String),

    /// Provider returned an API-level error (bad status, no choices).
    #[error("provider error: {0}")]
    Provider(String),

    /// Transport-level HTTP failure.
    #[error("http error: {0}")]
    Http(String),

    /// Provider requires an API key and none was resolved.
    #[error("no API key configured for provider '{0}'")]
    ApiKeyMissing(String),

    /// Unknown provider name in configuration.
    #[error("unknown provider: '{0}'")]
    ProviderNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
