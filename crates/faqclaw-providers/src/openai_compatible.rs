//! Unified OpenAI-compatible provider.
//!
//! A single struct that handles chat completions for ALL OpenAI-compatible
//! APIs. Different providers are distinguished only by endpoint URL, auth
//! style, and API key. Every request carries a bounded timeout — the bot
//! layer owns retries, so a hung call must not hang a reply.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use faqclaw_core::config::FaqClawConfig;
use faqclaw_core::error::{FaqClawError, Result};
use faqclaw_core::traits::provider::{GenerateParams, Provider};
use faqclaw_core::types::{Message, ModelInfo, ProviderResponse, Usage};

use crate::provider_registry::{AuthStyle, ProviderConfig};

/// A unified provider that works with any OpenAI-compatible API.
#[derive(Debug)]
pub struct OpenAiCompatibleProvider {
    /// Provider name (e.g. "openai", "openrouter").
    name: String,
    /// API key for authentication.
    api_key: String,
    /// Base URL for the API (e.g. "https://api.openai.com/v1").
    base_url: String,
    /// Path for chat completions (e.g. "/chat/completions").
    chat_path: String,
    /// Path for listing models (e.g. "/models").
    models_path: String,
    /// Authentication style.
    auth_style: AuthStyle,
    /// Default models to return from `list_models`.
    default_models: Vec<ModelInfo>,
    /// HTTP client with the configured request timeout.
    client: reqwest::Client,
}

fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| FaqClawError::Http(format!("failed to build HTTP client: {e}")))
}

impl OpenAiCompatibleProvider {
    /// Create from a known provider config + FaqClawConfig.
    ///
    /// Resolution order:
    /// - API key: `config.llm.api_key` > `config.api_key` > env vars > empty
    /// - Base URL: `config.llm.endpoint` > env override > registry default
    pub fn from_registry(registry: &ProviderConfig, config: &FaqClawConfig) -> Result<Self> {
        let api_key = if !config.llm.api_key.is_empty() {
            config.llm.api_key.clone()
        } else if !config.api_key.is_empty() {
            config.api_key.clone()
        } else {
            registry
                .env_keys
                .iter()
                .find_map(|key| std::env::var(key).ok())
                .unwrap_or_default()
        };

        let base_url = if !config.llm.endpoint.is_empty() {
            config.llm.endpoint.trim_end_matches('/').to_string()
        } else {
            registry
                .base_url_env
                .and_then(|env_key| {
                    let val = std::env::var(env_key).ok()?;
                    let val = val.trim_end_matches('/').to_string();
                    // OLLAMA_HOST style values lack the /v1 suffix
                    if val.ends_with("/v1") {
                        Some(val)
                    } else {
                        Some(format!("{val}/v1"))
                    }
                })
                .unwrap_or_else(|| registry.base_url.to_string())
        };

        let default_models = registry
            .default_models
            .iter()
            .map(|m| m.to_model_info(registry.name))
            .collect();

        Ok(Self {
            name: registry.name.to_string(),
            api_key,
            base_url,
            chat_path: registry.chat_path.to_string(),
            models_path: registry.models_path.to_string(),
            auth_style: registry.auth_style,
            default_models,
            client: build_client(config.llm.request_timeout_secs)?,
        })
    }

    /// Create for a custom endpoint (e.g. "custom:https://my-server.com/v1").
    pub fn custom(endpoint: &str, config: &FaqClawConfig) -> Result<Self> {
        let base_url = endpoint
            .strip_prefix("custom:")
            .unwrap_or(endpoint)
            .trim_end_matches('/')
            .to_string();

        let api_key = if !config.llm.api_key.is_empty() {
            config.llm.api_key.clone()
        } else if !config.api_key.is_empty() {
            config.api_key.clone()
        } else {
            std::env::var("CUSTOM_API_KEY").unwrap_or_default()
        };

        let auth_style = if api_key.is_empty() {
            AuthStyle::None
        } else {
            AuthStyle::Bearer
        };

        Ok(Self {
            name: "custom".to_string(),
            api_key,
            base_url,
            chat_path: "/chat/completions".to_string(),
            models_path: "/models".to_string(),
            auth_style,
            default_models: vec![],
            client: build_client(config.llm.request_timeout_secs)?,
        })
    }

    /// Build the auth header for the request.
    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_style {
            AuthStyle::Bearer if !self.api_key.is_empty() => {
                req.header("Authorization", format!("Bearer {}", self.api_key))
            }
            _ => req,
        }
    }

    #[cfg(test)]
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Provider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        messages: &[Message],
        params: &GenerateParams,
    ) -> Result<ProviderResponse> {
        // For providers that require auth, check the API key up front
        if self.auth_style != AuthStyle::None && self.api_key.is_empty() {
            return Err(FaqClawError::ApiKeyMissing(self.name.clone()));
        }

        let body = json!({
            "model": params.model,
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
            "messages": messages,
        });

        let url = format!("{}{}", self.base_url, self.chat_path);
        let req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        let req = self.apply_auth(req);

        let resp = req.send().await.map_err(|e| {
            FaqClawError::Http(format!("{} connection failed ({}): {}", self.name, url, e))
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(FaqClawError::Provider(format!(
                "{} API error {}: {}",
                self.name, status, text
            )));
        }

        // Parse response — standard OpenAI format
        let json: Value = resp
            .json()
            .await
            .map_err(|e| FaqClawError::Http(e.to_string()))?;

        let choice = json["choices"]
            .get(0)
            .ok_or_else(|| FaqClawError::Provider("No choices in response".into()))?;

        let content = choice["message"]["content"].as_str().map(String::from);

        let usage = json["usage"].as_object().map(|u| Usage {
            prompt_tokens: u.get("prompt_tokens").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
            completion_tokens: u
                .get("completion_tokens")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32,
            total_tokens: u.get("total_tokens").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
        });

        Ok(ProviderResponse {
            content,
            finish_reason: choice["finish_reason"].as_str().map(String::from),
            usage,
        })
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        // Try to fetch models from the API, fall back to the static list
        let url = format!("{}{}", self.base_url, self.models_path);
        let req = self.client.get(&url);
        let req = self.apply_auth(req);

        match req.send().await {
            Ok(r) if r.status().is_success() => {
                let json: Value = r.json().await.unwrap_or_default();
                let models: Vec<ModelInfo> = json["data"]
                    .as_array()
                    .map(|arr| {
                        arr.iter()
                            .filter_map(|m| {
                                Some(ModelInfo {
                                    id: m["id"].as_str()?.to_string(),
                                    name: m["id"].as_str()?.to_string(),
                                    provider: self.name.clone(),
                                    context_length: 4096,
                                    max_output_tokens: Some(4096),
                                })
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                if models.is_empty() {
                    Ok(self.default_models.clone())
                } else {
                    Ok(models)
                }
            }
            _ => Ok(self.default_models.clone()),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        if self.auth_style != AuthStyle::None {
            // For cloud providers, just check whether a key is set
            return Ok(!self.api_key.is_empty());
        }

        // For local servers (ollama), try to connect
        let url = format!("{}{}", self.base_url, self.models_path);
        let resp = self.client.get(&url).send().await;
        Ok(resp.is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider_registry;

    #[test]
    fn test_custom_endpoint_strips_prefix_and_slash() {
        let config = FaqClawConfig::default();
        let p =
            OpenAiCompatibleProvider::custom("custom:https://my-server.com/v1/", &config).unwrap();
        assert_eq!(p.name(), "custom");
        assert_eq!(p.base_url(), "https://my-server.com/v1");
    }

    #[test]
    fn test_config_endpoint_beats_registry_default() {
        let mut config = FaqClawConfig::default();
        config.llm.endpoint = "http://10.0.0.5:8000/v1/".into();
        let registry = provider_registry::get_provider_config("openai").unwrap();
        let p = OpenAiCompatibleProvider::from_registry(registry, &config).unwrap();
        assert_eq!(p.base_url(), "http://10.0.0.5:8000/v1");
    }

    #[test]
    fn test_cloud_provider_without_key_fails_complete() {
        let mut config = FaqClawConfig::default();
        // Pin the endpoint so a stray OPENAI_API_BASE cannot interfere;
        // key resolution still goes through env only if config keys are empty.
        config.llm.api_key = String::new();
        config.llm.endpoint = "https://api.openai.com/v1".into();
        let registry = provider_registry::get_provider_config("groq").unwrap();
        let p = OpenAiCompatibleProvider::from_registry(registry, &config).unwrap();
        if p.api_key.is_empty() {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let err = rt
                .block_on(p.complete(&[Message::user("hi")], &GenerateParams::default()))
                .unwrap_err();
            assert!(matches!(err, FaqClawError::ApiKeyMissing(_)));
        }
    }
}
