//! # FaqClaw Bot
//!
//! The orchestration layer around the retrieval core. Owns everything the
//! core deliberately does not: calling the LLM when the decision policy
//! asks for it, retry-with-backoff on transient provider errors, and the
//! canned degradation messages that guarantee the user always gets an
//! answer.

pub mod bot;
pub mod prompts;

pub use bot::{BotReply, ReplyKind, SupportBot};
