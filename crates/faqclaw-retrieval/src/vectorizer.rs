//! TF-IDF vectorizer — builds a bag-of-words weighting model over the FAQ
//! questions and projects arbitrary text into that frozen space.
//!
//! Tokenization: lowercase, split on non-alphanumeric boundaries, optional
//! English stop-word filtering, optional word bigrams. The idf uses the
//! smoothed form `ln((1+N)/(1+df)) + 1`, which is monotonic in document
//! frequency and defined for terms appearing in zero or all documents.

use std::collections::{HashMap, HashSet};

use faqclaw_core::error::{FaqClawError, Result};

/// Common English stop words dropped before indexing. A fixed, compact
/// list — enough to keep question scaffolding ("how can I ...") from
/// dominating the vocabulary.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "can", "could",
    "did", "do", "does", "for", "from", "had", "has", "have", "how", "i",
    "if", "in", "into", "is", "it", "its", "me", "my", "no", "not", "of",
    "on", "or", "our", "should", "so", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "to", "was", "we",
    "were", "what", "when", "where", "which", "who", "why", "will", "with",
    "would", "you", "your",
];

/// Tokenizer options, fixed at model build time.
#[derive(Debug, Clone, Copy)]
pub struct TokenizerOptions {
    pub stop_words: bool,
    pub bigrams: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            stop_words: true,
            bigrams: true,
        }
    }
}

/// Split text into lowercase terms. Bigrams are formed over the
/// already-filtered token stream, so documents and queries see the same
/// pipeline.
fn tokenize(text: &str, opts: TokenizerOptions) -> Vec<String> {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .filter(|w| !opts.stop_words || !STOP_WORDS.contains(&w.as_str()))
        .collect();

    let mut terms = words.clone();
    if opts.bigrams {
        for pair in words.windows(2) {
            terms.push(format!("{} {}", pair[0], pair[1]));
        }
    }
    terms
}

/// A sparse weight vector over the model's frozen vocabulary.
/// Terms are (column index, weight), sorted by index.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    terms: Vec<(u32, f32)>,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.terms.len() && j < other.terms.len() {
            let (a_idx, a_w) = self.terms[i];
            let (b_idx, b_w) = other.terms[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn norm(&self) -> f32 {
        self.terms
            .iter()
            .map(|(_, w)| w * w)
            .sum::<f32>()
            .sqrt()
    }
}

/// A built TF-IDF model. Read-only once constructed; the vocabulary is
/// frozen and queries are projected into it (unseen terms weigh zero).
#[derive(Debug, Clone)]
pub struct TfidfModel {
    vocabulary: HashMap<String, u32>,
    idf: Vec<f32>,
    opts: TokenizerOptions,
}

impl TfidfModel {
    /// Build a model from the corpus questions, in corpus order.
    ///
    /// Fails with [`FaqClawError::EmptyCorpus`] when there are no
    /// documents — no vocabulary can be built.
    pub fn build<'a, I>(questions: I, opts: TokenizerOptions) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let docs: Vec<Vec<String>> = questions
            .into_iter()
            .map(|q| tokenize(q, opts))
            .collect();
        if docs.is_empty() {
            return Err(FaqClawError::EmptyCorpus);
        }

        // Column indices in first-seen order keeps builds deterministic.
        let mut vocabulary: HashMap<String, u32> = HashMap::new();
        let mut df: Vec<u32> = Vec::new();
        for doc in &docs {
            let mut seen: HashSet<&str> = HashSet::new();
            for term in doc {
                let next = vocabulary.len() as u32;
                let idx = *vocabulary.entry(term.clone()).or_insert_with(|| {
                    df.push(0);
                    next
                });
                if seen.insert(term.as_str()) {
                    df[idx as usize] += 1;
                }
            }
        }

        if vocabulary.is_empty() {
            tracing::warn!("TF-IDF vocabulary is empty — every question was all stop words");
        }

        let n = docs.len() as f32;
        let idf = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f32)).ln() + 1.0)
            .collect();

        Ok(Self {
            vocabulary,
            idf,
            opts,
        })
    }

    /// Project text into the frozen vocabulary space. Unseen tokens
    /// contribute nothing — that is expected, not an error. No hidden
    /// state: transforming the same text twice yields identical vectors.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<u32, f32> = HashMap::new();
        for term in tokenize(text, self.opts) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        let mut terms: Vec<(u32, f32)> = counts
            .into_iter()
            .map(|(idx, count)| (idx, count * self.idf[idx as usize]))
            .collect();
        terms.sort_unstable_by_key(|&(idx, _)| idx);
        SparseVector { terms }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(questions: &[&str]) -> TfidfModel {
        TfidfModel::build(questions.iter().copied(), TokenizerOptions::default()).unwrap()
    }

    #[test]
    fn test_empty_corpus_fails() {
        let err =
            TfidfModel::build(std::iter::empty::<&str>(), TokenizerOptions::default()).unwrap_err();
        assert!(matches!(err, FaqClawError::EmptyCorpus));
    }

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        let opts = TokenizerOptions {
            stop_words: false,
            bigrams: false,
        };
        let toks = tokenize("Track-my_ORDER, please!", opts);
        assert_eq!(toks, vec!["track", "my", "order", "please"]);
    }

    #[test]
    fn test_stop_words_dropped() {
        let opts = TokenizerOptions {
            stop_words: true,
            bigrams: false,
        };
        let toks = tokenize("How can I track my order?", opts);
        assert_eq!(toks, vec!["track", "order"]);
    }

    #[test]
    fn test_bigrams_follow_stop_word_filtering() {
        let toks = tokenize("How can I track my order?", TokenizerOptions::default());
        assert_eq!(toks, vec!["track", "order", "track order"]);
    }

    #[test]
    fn test_unseen_terms_weigh_zero() {
        let m = model(&["How can I track my order?"]);
        let v = m.transform("what is the weather today");
        assert!(v.is_empty());
        assert_eq!(v.norm(), 0.0);
    }

    #[test]
    fn test_transform_is_idempotent() {
        let m = model(&["What is your return policy?", "How can I track my order?"]);
        let a = m.transform("return policy");
        let b = m.transform("return policy");
        assert_eq!(a, b);
    }

    #[test]
    fn test_idf_monotonic_in_document_frequency() {
        // "order" appears in both docs, "refund" in one: rarer term must
        // weigh more.
        let m = model(&["cancel my order", "refund my order"]);
        let both = m.transform("order");
        let rare = m.transform("refund");
        assert!(rare.norm() > both.norm());
    }

    #[test]
    fn test_all_stop_word_corpus_builds_with_empty_vocabulary() {
        let m = model(&["is it that"]);
        assert_eq!(m.vocabulary_len(), 0);
        assert!(m.transform("is it that").is_empty());
    }

    #[test]
    fn test_sparse_dot_merges_on_indices() {
        let a = SparseVector {
            terms: vec![(0, 1.0), (2, 2.0), (5, 3.0)],
        };
        let b = SparseVector {
            terms: vec![(2, 4.0), (3, 1.0), (5, 1.0)],
        };
        assert!((a.dot(&b) - 11.0).abs() < 1e-6);
        assert!((b.dot(&a) - 11.0).abs() < 1e-6);
    }
}
