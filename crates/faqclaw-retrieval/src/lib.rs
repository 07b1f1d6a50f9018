//! # FaqClaw Retrieval
//!
//! Lexical FAQ retrieval — no vector DB, no embeddings, no network.
//!
//! ## Design
//! - **TF-IDF over FAQ questions** — smoothed idf, unigrams + bigrams
//! - **Cosine ranking** — best match with deterministic first-index tie-break
//! - **Threshold decision policy** — direct answer / refine / fallback
//! - **Immutable snapshots** — the model is built once and shared read-only;
//!   reload builds a fresh [`FaqEngine`] and swaps it in whole
//!
//! ## How it works
//! ```text
//! User: "how do I track my order?"
//!   ↓ tokenize + project into the frozen vocabulary
//! Query vector
//!   ↓ cosine against every precomputed FAQ vector
//! (best FAQ, score 0.83)
//!   ↓ threshold 0.35, refine on
//! Decision::RefineAnswer → bot layer calls the LLM with the stored answer
//! ```

pub mod engine;
pub mod matcher;
pub mod policy;
pub mod store;
pub mod vectorizer;

pub use engine::{EngineOptions, FaqEngine, MatchResult};
pub use policy::{Decision, decide};
pub use store::{FaqEntry, FaqStore};
pub use vectorizer::{SparseVector, TfidfModel};
