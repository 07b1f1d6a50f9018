//! FAQ store — the immutable record list the engine is built from.
//!
//! The loader is strict: an entry missing a required field, or reusing an
//! id, fails the whole load with an index-bearing error. The corpus is the
//! product; silently dropping records would hide data bugs.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use faqclaw_core::error::{FaqClawError, Result};

/// One FAQ record. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: u64,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// The full in-memory FAQ list for the session lifetime.
#[derive(Debug, Clone)]
pub struct FaqStore {
    entries: Vec<FaqEntry>,
}

impl FaqStore {
    /// Build a store from already-constructed entries, enforcing id
    /// uniqueness.
    pub fn new(entries: Vec<FaqEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for (idx, entry) in entries.iter().enumerate() {
            if !seen.insert(entry.id) {
                return Err(FaqClawError::MalformedRecord(format!(
                    "entry {idx}: duplicate id {}",
                    entry.id
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Load a store from a JSON array on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let store = Self::from_json(&content)?;
        tracing::info!("📚 Loaded {} FAQ entries from {}", store.len(), path.display());
        Ok(store)
    }

    /// Parse a JSON array of FAQ records.
    ///
    /// Validation is per-entry so the error can name the offending array
    /// index instead of pointing at a byte offset.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<Value> = serde_json::from_str(json)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (idx, value) in raw.iter().enumerate() {
            entries.push(parse_entry(idx, value)?);
        }
        Self::new(entries)
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn get(&self, idx: usize) -> Option<&FaqEntry> {
        self.entries.get(idx)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Questions in corpus order, for the vectorizer build.
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.question.as_str())
    }
}

fn parse_entry(idx: usize, value: &Value) -> Result<FaqEntry> {
    let obj = value.as_object().ok_or_else(|| {
        FaqClawError::MalformedRecord(format!("entry {idx}: not a JSON object"))
    })?;

    let id = obj
        .get("id")
        .and_then(Value::as_u64)
        .ok_or_else(|| missing(idx, "id"))?;
    let question = required_str(idx, obj, "question")?;
    let answer = required_str(idx, obj, "answer")?;
    let category = obj
        .get("category")
        .and_then(Value::as_str)
        .map(String::from);

    Ok(FaqEntry {
        id,
        question,
        answer,
        category,
    })
}

fn required_str(idx: usize, obj: &serde_json::Map<String, Value>, field: &str) -> Result<String> {
    let s = obj
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| missing(idx, field))?;
    if s.trim().is_empty() {
        return Err(FaqClawError::MalformedRecord(format!(
            "entry {idx}: field `{field}` is empty"
        )));
    }
    Ok(s.to_string())
}

fn missing(idx: usize, field: &str) -> FaqClawError {
    FaqClawError::MalformedRecord(format!("entry {idx}: missing field `{field}`"))
}
