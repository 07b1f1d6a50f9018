//! Decision policy — turns a raw similarity score into an actionable
//! disposition for the caller.

use crate::store::FaqEntry;

/// How a query should be answered. A pure function of the match outcome
/// and the refinement flag; the retrieval core never calls the LLM itself,
/// it only signals when one is needed.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision<'a> {
    /// Good match, refinement off: return the stored answer verbatim.
    DirectAnswer(&'a FaqEntry),
    /// Good match, refinement on: the caller should ask the LLM to tailor
    /// the stored answer to the query's phrasing. If that call fails, the
    /// caller must fall back to the verbatim stored answer.
    RefineAnswer(&'a FaqEntry),
    /// No usable match: the caller synthesizes an answer (LLM) or emits a
    /// canned message.
    Fallback,
}

impl Decision<'_> {
    /// The matched entry, when there is one.
    pub fn entry(&self) -> Option<&FaqEntry> {
        match self {
            Decision::DirectAnswer(e) | Decision::RefineAnswer(e) => Some(e),
            Decision::Fallback => None,
        }
    }
}

/// Classify a ranked match.
///
/// `score < threshold` → `Fallback`; otherwise `RefineAnswer` when
/// refinement is enabled, `DirectAnswer` when it is not.
pub fn decide<'a>(
    entry: Option<&'a FaqEntry>,
    score: f32,
    threshold: f32,
    refine_enabled: bool,
) -> Decision<'a> {
    match entry {
        Some(e) if score >= threshold => {
            if refine_enabled {
                Decision::RefineAnswer(e)
            } else {
                Decision::DirectAnswer(e)
            }
        }
        _ => Decision::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> FaqEntry {
        FaqEntry {
            id: 1,
            question: "How can I track my order?".into(),
            answer: "We send a tracking link...".into(),
            category: None,
        }
    }

    #[test]
    fn test_below_threshold_is_fallback() {
        let e = entry();
        assert_eq!(decide(Some(&e), 0.2, 0.35, true), Decision::Fallback);
        assert_eq!(decide(Some(&e), 0.2, 0.35, false), Decision::Fallback);
    }

    #[test]
    fn test_above_threshold_respects_refine_flag() {
        let e = entry();
        assert_eq!(decide(Some(&e), 0.8, 0.35, false), Decision::DirectAnswer(&e));
        assert_eq!(decide(Some(&e), 0.8, 0.35, true), Decision::RefineAnswer(&e));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let e = entry();
        assert_eq!(decide(Some(&e), 0.35, 0.35, false), Decision::DirectAnswer(&e));
    }

    #[test]
    fn test_no_entry_is_always_fallback() {
        assert_eq!(decide(None, 0.9, 0.35, true), Decision::Fallback);
    }

    #[test]
    fn test_monotonic_in_score() {
        // Raising the score from below to above the threshold can only
        // move Fallback → answer, never the reverse.
        let e = entry();
        let mut crossed = false;
        for step in 0..=100 {
            let score = step as f32 / 100.0;
            let answered = decide(Some(&e), score, 0.35, false) != Decision::Fallback;
            if crossed {
                assert!(answered, "decision regressed at score {score}");
            }
            crossed |= answered;
        }
        assert!(crossed);
    }
}
