use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

use crate::text::{truncate, MAX_CHARS};

/// Readable text pulled out of a fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    pub raw_text: String,
}

impl Document {
    pub fn new(url: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            raw_text: raw_text.into(),
        }
    }

    pub fn bounded(&self) -> BoundedText {
        BoundedText::new(&self.raw_text)
    }
}

/// Text capped to a character budget, ready to be placed in a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundedText(String);

impl BoundedText {
    pub fn new(text: &str) -> Self {
        Self::with_limit(text, MAX_CHARS)
    }

    pub fn with_limit(text: &str, limit: usize) -> Self {
        Self(truncate(text, limit))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for BoundedText {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryPair {
    pub english: String,
    pub urdu: String,
}

/// What a caller gets back for one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub content: String,
    pub summary_en: String,
    /// Urdu summary.
    pub summary: String,
}

impl PipelineResult {
    pub fn new(content: BoundedText, pair: SummaryPair) -> Self {
        Self {
            content: content.into_inner(),
            summary_en: pair.english,
            summary: pair.urdu,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub url: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub url: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl DocumentRecord {
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}
