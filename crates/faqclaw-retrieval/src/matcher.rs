//! Cosine-similarity ranking of FAQ vectors against a query vector.
//!
//! Pure functions over immutable inputs — safe to call concurrently from
//! any number of request tasks sharing one built model.

use faqclaw_core::error::{FaqClawError, Result};

use crate::vectorizer::SparseVector;

/// Cosine of the angle between two non-negative weight vectors, in [0, 1].
/// Zero-norm vectors (empty query, all tokens unseen) score 0.0 — that is
/// a valid "no overlap" outcome, not an error.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    let norm_a = a.norm();
    let norm_b = b.norm();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    // f32 rounding can nudge an exact self-match just past 1.0.
    (a.dot(b) / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Rank every FAQ vector against the query and return the best index with
/// its score. Ties go to the first FAQ in corpus order — strict `>` while
/// scanning makes that deterministic.
pub fn best_match(query: &SparseVector, docs: &[SparseVector]) -> Result<(usize, f32)> {
    if docs.is_empty() {
        return Err(FaqClawError::NoFaqs);
    }
    let mut best_idx = 0;
    let mut best_score = cosine_similarity(query, &docs[0]);
    for (idx, doc) in docs.iter().enumerate().skip(1) {
        let score = cosine_similarity(query, doc);
        if score > best_score {
            best_idx = idx;
            best_score = score;
        }
    }
    Ok((best_idx, best_score))
}
