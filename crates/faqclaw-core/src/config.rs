//! FaqClaw configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqClawConfig {
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_provider")]
    pub default_provider: String,
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_api_key() -> String { String::new() }
fn default_provider() -> String { "openai".into() }
fn default_model() -> String { "gpt-4o-mini".into() }

impl Default for FaqClawConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            default_provider: default_provider(),
            default_model: default_model(),
            retrieval: RetrievalConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl FaqClawConfig {
    /// Load config from the default path (~/.faqclaw/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::FaqClawError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| crate::error::FaqClawError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::FaqClawError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".faqclaw")
            .join("config.toml")
    }

    /// Get the FaqClaw home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".faqclaw")
    }

    /// Effective provider name: `[llm]` section wins over the legacy
    /// top-level field.
    pub fn provider_name(&self) -> &str {
        if !self.llm.provider.is_empty() {
            &self.llm.provider
        } else {
            &self.default_provider
        }
    }

    /// Effective model name, same resolution order.
    pub fn model_name(&self) -> &str {
        if !self.llm.model.is_empty() {
            &self.llm.model
        } else {
            &self.default_model
        }
    }
}

/// Retrieval engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Path to the FAQ dataset (JSON array).
    #[serde(default = "default_faq_path")]
    pub faq_path: String,
    /// Cosine-similarity threshold on a 0–1 scale. Below it the bot falls
    /// back; at or above it the matched FAQ is used. Tunable per
    /// deployment — corpus size and quality vary.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// Rewrite matched answers through the LLM when one is configured.
    #[serde(default = "bool_true")]
    pub refine: bool,
    /// Drop common English stop words during tokenization.
    #[serde(default = "bool_true")]
    pub stop_words: bool,
    /// Index word bigrams in addition to unigrams.
    #[serde(default = "bool_true")]
    pub bigrams: bool,
}

fn default_faq_path() -> String { "data/faqs.json".into() }
fn default_threshold() -> f32 { 0.35 }
fn bool_true() -> bool { true }

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            faq_path: default_faq_path(),
            threshold: default_threshold(),
            refine: true,
            stop_words: true,
            bigrams: true,
        }
    }
}

/// LLM configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name ("openai", "openrouter", "ollama", "custom:<url>", ...).
    /// Empty means: use the top-level `default_provider`.
    #[serde(default)]
    pub provider: String,
    /// Model id. Empty means: use the top-level `default_model`.
    #[serde(default)]
    pub model: String,
    /// API key. Empty means: resolve from env vars via the registry.
    #[serde(default)]
    pub api_key: String,
    /// Base URL override. Empty means: registry default / env override.
    #[serde(default)]
    pub endpoint: String,
    /// Optional fallback provider tried when the primary is unhealthy.
    #[serde(default)]
    pub fallback_provider: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Hard timeout per HTTP request.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Completion attempts per reply (1 = no retry).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base delay for exponential backoff between attempts.
    #[serde(default = "default_backoff_ms")]
    pub backoff_base_ms: u64,
}

fn default_temperature() -> f32 { 0.4 }
fn default_max_tokens() -> u32 { 512 }
fn default_timeout_secs() -> u64 { 20 }
fn default_max_attempts() -> u32 { 3 }
fn default_backoff_ms() -> u64 { 500 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: String::new(),
            model: String::new(),
            api_key: String::new(),
            endpoint: String::new(),
            fallback_provider: String::new(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_ms(),
        }
    }
}
