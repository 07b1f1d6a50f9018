//! The FAQ engine — one immutable snapshot of store + built model +
//! precomputed document vectors.
//!
//! Built once at startup, then shared read-only across request tasks.
//! Reloading the dataset builds a whole new engine; the caller swaps the
//! `Arc` so in-flight queries never see a half-built vocabulary.

use std::path::Path;

use faqclaw_core::error::Result;

use crate::matcher;
use crate::policy::{self, Decision};
use crate::store::{FaqEntry, FaqStore};
use crate::vectorizer::{SparseVector, TfidfModel, TokenizerOptions};

/// Engine build options, typically derived from `RetrievalConfig`.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    pub threshold: f32,
    pub stop_words: bool,
    pub bigrams: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            threshold: 0.35,
            stop_words: true,
            bigrams: true,
        }
    }
}

/// Per-query ranking outcome. Ephemeral, recomputed each query.
/// `matched` is true iff `score >= threshold`; `entry` is only populated
/// for matched queries.
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    pub entry: Option<&'a FaqEntry>,
    pub score: f32,
    pub matched: bool,
}

/// Immutable retrieval snapshot.
#[derive(Debug)]
pub struct FaqEngine {
    store: FaqStore,
    model: TfidfModel,
    doc_vectors: Vec<SparseVector>,
    threshold: f32,
}

impl FaqEngine {
    /// Build the model over the store's questions and precompute every FAQ
    /// vector. Fails with `EmptyCorpus` on an empty store — the process
    /// must not proceed to serve queries without a corpus.
    pub fn build(store: FaqStore, options: EngineOptions) -> Result<Self> {
        let tokenizer = TokenizerOptions {
            stop_words: options.stop_words,
            bigrams: options.bigrams,
        };
        let model = TfidfModel::build(store.questions(), tokenizer)?;
        let doc_vectors = store
            .questions()
            .map(|q| model.transform(q))
            .collect::<Vec<_>>();
        tracing::debug!(
            "🔍 FAQ engine built: {} entries, {} vocabulary terms, threshold {}",
            store.len(),
            model.vocabulary_len(),
            options.threshold
        );
        Ok(Self {
            store,
            model,
            doc_vectors,
            threshold: options.threshold,
        })
    }

    /// Load the dataset from disk and build an engine over it.
    pub fn load(path: &Path, options: EngineOptions) -> Result<Self> {
        let store = FaqStore::load(path)?;
        Self::build(store, options)
    }

    /// Rank the query against every FAQ. Empty or whitespace-only queries
    /// short-circuit to an unmatched result with score 0.0.
    pub fn search(&self, query: &str) -> Result<MatchResult<'_>> {
        if query.trim().is_empty() {
            return Ok(MatchResult {
                entry: None,
                score: 0.0,
                matched: false,
            });
        }

        let query_vec = self.model.transform(query);
        let (idx, score) = matcher::best_match(&query_vec, &self.doc_vectors)?;
        let matched = score >= self.threshold;
        Ok(MatchResult {
            entry: if matched { self.store.get(idx) } else { None },
            score,
            matched,
        })
    }

    /// Rank and classify in one step.
    pub fn search_and_decide(&self, query: &str, refine_enabled: bool) -> Result<(MatchResult<'_>, Decision<'_>)> {
        let result = self.search(query)?;
        let decision = policy::decide(result.entry, result.score, self.threshold, refine_enabled);
        Ok((result, decision))
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn store(&self) -> &FaqStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faqclaw_core::error::FaqClawError;

    fn sample_store() -> FaqStore {
        FaqStore::from_json(
            r#"[
                {"id": 1, "question": "How can I track my order?", "answer": "We send a tracking link...", "category": "orders"},
                {"id": 2, "question": "What is your return policy?", "answer": "30 days return.", "category": "returns"}
            ]"#,
        )
        .unwrap()
    }

    fn engine() -> FaqEngine {
        FaqEngine::build(sample_store(), EngineOptions::default()).unwrap()
    }

    #[test]
    fn test_empty_store_fails_to_build() {
        let store = FaqStore::from_json("[]").unwrap();
        let err = FaqEngine::build(store, EngineOptions::default()).unwrap_err();
        assert!(matches!(err, FaqClawError::EmptyCorpus));
    }

    #[test]
    fn test_track_order_scenario() {
        // threshold 0.35, refinement disabled
        let e = engine();
        let (result, decision) = e.search_and_decide("track my order", false).unwrap();
        assert!(result.matched);
        assert!(result.score >= 0.35);
        match decision {
            Decision::DirectAnswer(faq) => assert_eq!(faq.id, 1),
            other => panic!("expected DirectAnswer, got {other:?}"),
        }
    }

    #[test]
    fn test_refine_scenario() {
        let e = engine();
        let (_, decision) = e.search_and_decide("track my order", true).unwrap();
        match decision {
            Decision::RefineAnswer(faq) => assert_eq!(faq.id, 1),
            other => panic!("expected RefineAnswer, got {other:?}"),
        }
    }

    #[test]
    fn test_weather_scenario_falls_back() {
        let e = engine();
        let (result, decision) = e.search_and_decide("what is the weather today", true).unwrap();
        assert!(!result.matched);
        assert!(result.entry.is_none());
        assert_eq!(decision, Decision::Fallback);
    }

    #[test]
    fn test_empty_query_short_circuits() {
        let e = engine();
        let result = e.search("   ").unwrap();
        assert!(!result.matched);
        assert_eq!(result.score, 0.0);
        assert!(result.entry.is_none());
    }

    #[test]
    fn test_exact_question_matches_itself() {
        let e = engine();
        let result = e.search("What is your return policy?").unwrap();
        assert!(result.matched);
        assert_eq!(result.entry.unwrap().id, 2);
        assert!((result.score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        let e = std::sync::Arc::new(engine());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let e = e.clone();
                std::thread::spawn(move || {
                    let r = e.search("track my order").unwrap();
                    assert!(r.matched);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }
}
