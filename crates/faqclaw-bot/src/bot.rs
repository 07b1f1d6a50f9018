//! The support bot — retrieval decision plus LLM orchestration.
//!
//! A provider failure never reaches the user: refinement degrades to the
//! verbatim stored answer, fallback degrades to a canned contact-support
//! message. Retrieval errors are deterministic and are the only errors
//! `reply` can return.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use rand::Rng;

use faqclaw_core::config::FaqClawConfig;
use faqclaw_core::error::{FaqClawError, Result};
use faqclaw_core::traits::provider::{GenerateParams, Provider};
use faqclaw_core::types::Message;
use faqclaw_retrieval::{Decision, FaqEngine};

use crate::prompts;

const EMPTY_MESSAGE: &str = "Please type a message 🙂";
const GREETING_MESSAGE: &str = "Hi there! 👋 How can I help you today?";
const CANNED_FALLBACK: &str = "I couldn't find an exact answer.\n\
     Please contact our human support team at support@example.com.";
const REFINE_UNAVAILABLE_NOTE: &str = "\n\n_(AI refinement temporarily unavailable.)_";

/// How a reply was produced, for logging and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// Empty input, no search performed.
    Empty,
    /// Greeting shortcut, no search performed.
    Greeting,
    /// Stored answer returned verbatim.
    Direct,
    /// Stored answer rewritten by the LLM.
    Refined,
    /// Refinement failed; verbatim stored answer with a note.
    RefineDegraded,
    /// No FAQ match; answer synthesized by the LLM.
    LlmFallback,
    /// No FAQ match and no usable LLM; canned message.
    CannedFallback,
}

/// A finished reply with the match confidence the caller may display.
#[derive(Debug, Clone)]
pub struct BotReply {
    pub text: String,
    pub kind: ReplyKind,
    /// Best cosine score for this query (0.0 for shortcut replies).
    pub score: f32,
    /// Id of the matched FAQ, when there was one.
    pub faq_id: Option<u64>,
}

/// Retry policy for provider calls: exponential backoff with jitter,
/// capped attempts.
#[derive(Debug, Clone, Copy)]
struct RetryPolicy {
    max_attempts: u32,
    backoff_base: Duration,
}

pub struct SupportBot {
    /// Current retrieval snapshot. Reload builds a new engine off-lock and
    /// swaps the Arc, so readers never see a half-built vocabulary.
    engine: RwLock<Arc<FaqEngine>>,
    provider: Option<Box<dyn Provider>>,
    params: GenerateParams,
    refine: bool,
    retry: RetryPolicy,
}

impl SupportBot {
    pub fn new(
        engine: FaqEngine,
        provider: Option<Box<dyn Provider>>,
        config: &FaqClawConfig,
    ) -> Self {
        Self {
            engine: RwLock::new(Arc::new(engine)),
            provider,
            params: GenerateParams {
                model: config.model_name().to_string(),
                temperature: config.llm.temperature,
                max_tokens: config.llm.max_tokens,
            },
            refine: config.retrieval.refine,
            retry: RetryPolicy {
                max_attempts: config.llm.max_attempts.max(1),
                backoff_base: Duration::from_millis(config.llm.backoff_base_ms),
            },
        }
    }

    /// The current engine snapshot.
    pub fn engine(&self) -> Arc<FaqEngine> {
        self.engine
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Swap in a freshly built engine. In-flight queries keep the old
    /// snapshot; new queries see the new one.
    pub fn reload(&self, engine: FaqEngine) {
        let mut slot = self.engine.write().unwrap_or_else(|e| e.into_inner());
        *slot = Arc::new(engine);
        tracing::info!("♻️ FAQ engine reloaded: {} entries", slot.store().len());
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Produce a reply for one user query.
    pub async fn reply(&self, query: &str) -> Result<BotReply> {
        let query = query.trim();

        if query.is_empty() {
            return Ok(BotReply {
                text: EMPTY_MESSAGE.into(),
                kind: ReplyKind::Empty,
                score: 0.0,
                faq_id: None,
            });
        }

        if matches!(query.to_lowercase().as_str(), "hi" | "hello" | "hey") {
            return Ok(BotReply {
                text: GREETING_MESSAGE.into(),
                kind: ReplyKind::Greeting,
                score: 0.0,
                faq_id: None,
            });
        }

        let engine = self.engine();
        let (result, decision) = engine.search_and_decide(query, self.use_refinement())?;
        tracing::debug!(
            "Query scored {:.3} (threshold {:.2}, matched: {})",
            result.score,
            engine.threshold(),
            result.matched
        );

        let reply = match decision {
            Decision::DirectAnswer(faq) => BotReply {
                text: render_answer(&faq.question, &faq.answer, result.score),
                kind: ReplyKind::Direct,
                score: result.score,
                faq_id: Some(faq.id),
            },
            Decision::RefineAnswer(faq) => {
                let prompt = prompts::refine_prompt(query, &faq.answer);
                match self.complete(&prompt).await {
                    Ok(refined) => BotReply {
                        text: render_answer(&faq.question, &refined, result.score),
                        kind: ReplyKind::Refined,
                        score: result.score,
                        faq_id: Some(faq.id),
                    },
                    // A valid match must always produce an answer.
                    Err(e) => {
                        tracing::warn!("Refinement failed, using stored answer: {e}");
                        let text = format!(
                            "{}{}",
                            render_answer(&faq.question, &faq.answer, result.score),
                            REFINE_UNAVAILABLE_NOTE
                        );
                        BotReply {
                            text,
                            kind: ReplyKind::RefineDegraded,
                            score: result.score,
                            faq_id: Some(faq.id),
                        }
                    }
                }
            }
            Decision::Fallback => {
                let prompt = prompts::fallback_prompt(query);
                match self.complete(&prompt).await {
                    Ok(answer) => BotReply {
                        text: answer,
                        kind: ReplyKind::LlmFallback,
                        score: result.score,
                        faq_id: None,
                    },
                    Err(e) => {
                        if self.provider.is_some() {
                            tracing::warn!("Fallback completion failed: {e}");
                        }
                        BotReply {
                            text: CANNED_FALLBACK.into(),
                            kind: ReplyKind::CannedFallback,
                            score: result.score,
                            faq_id: None,
                        }
                    }
                }
            }
        };

        Ok(reply)
    }

    fn use_refinement(&self) -> bool {
        self.refine && self.provider.is_some()
    }

    /// Run one prompt through the provider with retry-with-backoff.
    async fn complete(&self, prompt: &str) -> Result<String> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| FaqClawError::Provider("no provider configured".into()))?;

        let messages = [Message::user(prompt)];
        let mut last_error = None;

        for attempt in 1..=self.retry.max_attempts {
            match provider.complete(&messages, &self.params).await {
                Ok(resp) => match resp.text() {
                    Some(text) => return Ok(text.to_string()),
                    None => {
                        last_error =
                            Some(FaqClawError::Provider("empty completion".into()));
                    }
                },
                // A missing key will not appear between attempts.
                Err(e @ FaqClawError::ApiKeyMissing(_)) => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        "Provider {} attempt {}/{} failed: {}",
                        provider.name(),
                        attempt,
                        self.retry.max_attempts,
                        e
                    );
                    last_error = Some(e);
                }
            }

            if attempt < self.retry.max_attempts {
                tokio::time::sleep(self.backoff_delay(attempt)).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| FaqClawError::Provider("completion failed".into())))
    }

    /// Exponential backoff with jitter: base * 2^(attempt-1) + up to half
    /// the base extra.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = self.retry.backoff_base * 2u32.saturating_pow(attempt - 1);
        let jitter_ms = rand::thread_rng().gen_range(0..=self.retry.backoff_base.as_millis().max(1) as u64 / 2);
        base + Duration::from_millis(jitter_ms)
    }
}

fn render_answer(question: &str, answer: &str, score: f32) -> String {
    format!("**Q:** {question}\n**A:** {answer}\n\n_Match confidence: {score:.2}_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use faqclaw_core::types::{ModelInfo, ProviderResponse};
    use faqclaw_retrieval::{EngineOptions, FaqStore};
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct StubProvider {
        reply: Option<&'static str>,
        calls: Arc<AtomicU32>,
    }

    impl StubProvider {
        fn answering(reply: &'static str) -> Box<Self> {
            Box::new(Self {
                reply: Some(reply),
                calls: Arc::new(AtomicU32::new(0)),
            })
        }

        fn failing() -> Box<Self> {
            Box::new(Self {
                reply: None,
                calls: Arc::new(AtomicU32::new(0)),
            })
        }
    }

    #[async_trait]
    impl Provider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            _messages: &[Message],
            _params: &GenerateParams,
        ) -> Result<ProviderResponse> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            match self.reply {
                Some(text) => Ok(ProviderResponse {
                    content: Some(text.into()),
                    finish_reason: Some("stop".into()),
                    usage: None,
                }),
                None => Err(FaqClawError::Http("connection refused".into())),
            }
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(vec![])
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(self.reply.is_some())
        }
    }

    fn engine() -> FaqEngine {
        let store = FaqStore::from_json(
            r#"[{"id": 1, "question": "How can I track my order?", "answer": "We send a tracking link...", "category": "orders"}]"#,
        )
        .unwrap();
        FaqEngine::build(store, EngineOptions::default()).unwrap()
    }

    fn test_config() -> FaqClawConfig {
        let mut config = FaqClawConfig::default();
        // keep provider-failure tests fast
        config.llm.max_attempts = 1;
        config.llm.backoff_base_ms = 1;
        config
    }

    fn bot(provider: Option<Box<StubProvider>>, refine: bool) -> SupportBot {
        let mut config = test_config();
        config.retrieval.refine = refine;
        let provider = provider.map(|p| p as Box<dyn Provider>);
        SupportBot::new(engine(), provider, &config)
    }

    fn run<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Runtime::new().unwrap().block_on(fut)
    }

    #[test]
    fn test_empty_input_shortcut() {
        let reply = run(bot(None, false).reply("   ")).unwrap();
        assert_eq!(reply.kind, ReplyKind::Empty);
        assert_eq!(reply.score, 0.0);
    }

    #[test]
    fn test_greeting_shortcut_skips_search() {
        for greeting in ["hi", "Hello", "HEY"] {
            let reply = run(bot(None, false).reply(greeting)).unwrap();
            assert_eq!(reply.kind, ReplyKind::Greeting);
            assert!(reply.faq_id.is_none());
        }
    }

    #[test]
    fn test_direct_answer_without_llm() {
        let reply = run(bot(None, false).reply("track my order")).unwrap();
        assert_eq!(reply.kind, ReplyKind::Direct);
        assert_eq!(reply.faq_id, Some(1));
        assert!(reply.text.contains("We send a tracking link..."));
        assert!(reply.text.contains("Match confidence:"));
    }

    #[test]
    fn test_refine_uses_provider_output() {
        let reply = run(
            bot(Some(StubProvider::answering("Here is your tracking info!")), true)
                .reply("track my order"),
        )
        .unwrap();
        assert_eq!(reply.kind, ReplyKind::Refined);
        assert!(reply.text.contains("Here is your tracking info!"));
        assert_eq!(reply.faq_id, Some(1));
    }

    #[test]
    fn test_refine_failure_degrades_to_stored_answer() {
        let reply =
            run(bot(Some(StubProvider::failing()), true).reply("track my order")).unwrap();
        assert_eq!(reply.kind, ReplyKind::RefineDegraded);
        assert!(reply.text.contains("We send a tracking link..."));
        assert!(reply.text.contains("temporarily unavailable"));
        assert_eq!(reply.faq_id, Some(1));
    }

    #[test]
    fn test_refine_flag_without_provider_stays_direct() {
        let reply = run(bot(None, true).reply("track my order")).unwrap();
        assert_eq!(reply.kind, ReplyKind::Direct);
    }

    #[test]
    fn test_fallback_uses_provider() {
        let reply = run(
            bot(Some(StubProvider::answering("Let me help anyway.")), true)
                .reply("what is the weather today"),
        )
        .unwrap();
        assert_eq!(reply.kind, ReplyKind::LlmFallback);
        assert_eq!(reply.text, "Let me help anyway.");
        assert!(reply.faq_id.is_none());
    }

    #[test]
    fn test_fallback_without_provider_is_canned() {
        let reply = run(bot(None, false).reply("what is the weather today")).unwrap();
        assert_eq!(reply.kind, ReplyKind::CannedFallback);
        assert!(reply.text.contains("human support team"));
    }

    #[test]
    fn test_fallback_provider_failure_is_canned() {
        let reply = run(
            bot(Some(StubProvider::failing()), true).reply("what is the weather today"),
        )
        .unwrap();
        assert_eq!(reply.kind, ReplyKind::CannedFallback);
    }

    #[test]
    fn test_retry_respects_max_attempts() {
        let provider = StubProvider::failing();
        let calls = provider.calls.clone();
        let mut config = test_config();
        config.llm.max_attempts = 3;
        config.retrieval.refine = true;
        let bot = SupportBot::new(engine(), Some(provider as Box<dyn Provider>), &config);
        let reply = run(bot.reply("track my order")).unwrap();
        assert_eq!(reply.kind, ReplyKind::RefineDegraded);
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_reload_swaps_snapshot() {
        let bot = bot(None, false);
        let before = run(bot.reply("reset my password")).unwrap();
        assert_eq!(before.kind, ReplyKind::CannedFallback);

        let store = FaqStore::from_json(
            r#"[{"id": 9, "question": "How do I reset my password?", "answer": "Use the forgot-password link."}]"#,
        )
        .unwrap();
        bot.reload(FaqEngine::build(store, EngineOptions::default()).unwrap());

        let after = run(bot.reply("reset my password")).unwrap();
        assert_eq!(after.kind, ReplyKind::Direct);
        assert_eq!(after.faq_id, Some(9));
    }
}
