//! The `Provider` trait — one capability: turn a prompt into text.
//!
//! The retrieval core never calls a provider directly; it only signals
//! (via the decision policy) when the bot layer should.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Message, ModelInfo, ProviderResponse};

/// Generation parameters passed to every completion call.
#[derive(Debug, Clone)]
pub struct GenerateParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            temperature: 0.4,
            max_tokens: 512,
        }
    }
}

/// An interchangeable LLM completion backend.
#[async_trait]
pub trait Provider: Send + Sync + std::fmt::Debug {
    /// Provider identifier (e.g. "openai", "openrouter").
    fn name(&self) -> &str;

    /// Run a chat completion and return the generated text.
    async fn complete(
        &self,
        messages: &[Message],
        params: &GenerateParams,
    ) -> Result<ProviderResponse>;

    /// List models this provider can serve.
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;

    /// Cheap liveness probe. For cloud providers this checks the API key;
    /// for local servers it checks connectivity.
    async fn health_check(&self) -> Result<bool>;
}
