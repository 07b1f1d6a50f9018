//! # FaqClaw Providers
//!
//! LLM provider implementations for FaqClaw.
//!
//! All OpenAI-compatible endpoints (OpenAI, OpenRouter, DeepSeek, Groq,
//! Ollama) are handled by a single `OpenAiCompatibleProvider`; they differ
//! only in base URL, auth style, and which env vars hold the key. The
//! retrieval core never touches this crate — the bot layer invokes a
//! provider only when the decision policy asks for refinement or fallback.

pub mod failover;
pub mod openai_compatible;
pub mod provider_registry;

use faqclaw_core::config::FaqClawConfig;
use faqclaw_core::error::{FaqClawError, Result};
use faqclaw_core::traits::Provider;

/// Create a provider from configuration.
///
/// Resolution order for the provider name:
/// 1. `config.llm.provider` (from the `[llm]` section)
/// 2. `config.default_provider` (legacy top-level field)
pub fn create_provider(config: &FaqClawConfig) -> Result<Box<dyn Provider>> {
    create_named(config.provider_name(), config)
}

/// Create a provider by explicit name.
pub fn create_named(name: &str, config: &FaqClawConfig) -> Result<Box<dyn Provider>> {
    match name {
        // Custom endpoint: "custom:https://my-server.com/v1"
        other if other.starts_with("custom:") => Ok(Box::new(
            openai_compatible::OpenAiCompatibleProvider::custom(other, config)?,
        )),

        // All known OpenAI-compatible providers
        _ => {
            let registry = provider_registry::get_provider_config(name)
                .ok_or_else(|| FaqClawError::ProviderNotFound(name.into()))?;
            Ok(Box::new(
                openai_compatible::OpenAiCompatibleProvider::from_registry(registry, config)?,
            ))
        }
    }
}

/// Create the configured provider, wrapped in a failover chain when a
/// fallback provider is configured.
pub fn create_provider_chain(config: &FaqClawConfig) -> Result<Box<dyn Provider>> {
    let primary = create_provider(config)?;
    if config.llm.fallback_provider.is_empty() {
        return Ok(primary);
    }
    let fallback = create_named(&config.llm.fallback_provider, config)?;
    Ok(Box::new(failover::FailoverProvider::with_fallback(
        primary, fallback,
    )))
}

/// List all available provider names.
pub fn available_providers() -> Vec<&'static str> {
    let mut names = provider_registry::all_provider_names();
    names.push("custom");
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_is_an_error() {
        let mut config = FaqClawConfig::default();
        config.default_provider = "definitely-not-a-provider".into();
        let err = create_provider(&config).unwrap_err();
        assert!(matches!(err, FaqClawError::ProviderNotFound(_)));
    }

    #[test]
    fn test_every_advertised_name_resolves() {
        let config = FaqClawConfig::default();
        for name in provider_registry::all_provider_names() {
            assert!(
                create_named(name, &config).is_ok(),
                "provider {name} failed to construct"
            );
        }
    }

    #[test]
    fn test_custom_endpoint_constructs() {
        let config = FaqClawConfig::default();
        let provider = create_named("custom:https://my-server.com/v1", &config).unwrap();
        assert_eq!(provider.name(), "custom");
    }

    #[test]
    fn test_chain_wraps_when_fallback_configured() {
        let mut config = FaqClawConfig::default();
        config.llm.fallback_provider = "ollama".into();
        let provider = create_provider_chain(&config).unwrap();
        // Failover reports the primary provider's name.
        assert_eq!(provider.name(), "openai");
    }
}
