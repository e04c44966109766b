//! Identifier and label types shared by every layer.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Task identifier
// ---------------------------------------------------------------------------

/// Opaque identifier of one analysis task, as assigned by the backend.
///
/// The value is embedded verbatim in request paths and routes, so it may
/// not be empty and may not contain path, query, or fragment delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Validate and wrap a task identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        if id.is_empty() {
            return Err(CoreError::Validation(
                "Task id must not be empty".to_string(),
            ));
        }
        if id
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '&'))
        {
            return Err(CoreError::Validation(format!(
                "Task id '{id}' contains a reserved character"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TaskId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskId> for String {
    fn from(value: TaskId) -> Self {
        value.0
    }
}

// ---------------------------------------------------------------------------
// Sentiment
// ---------------------------------------------------------------------------

/// Canonical wire value for positive sentiment.
pub const SENTIMENT_POSITIVE: &str = "positive";
/// Canonical wire value for negative sentiment.
pub const SENTIMENT_NEGATIVE: &str = "negative";
/// Legacy short form still emitted by older analysis runs.
pub const SENTIMENT_POSITIVE_SHORT: &str = "pos";
/// Legacy short form still emitted by older analysis runs.
pub const SENTIMENT_NEGATIVE_SHORT: &str = "neg";

/// Binary sentiment label attached to a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    /// Parse a canonical or legacy label. Matching is case-insensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        match label.as_str() {
            SENTIMENT_POSITIVE | SENTIMENT_POSITIVE_SHORT => Some(Self::Positive),
            SENTIMENT_NEGATIVE | SENTIMENT_NEGATIVE_SHORT => Some(Self::Negative),
            _ => None,
        }
    }

    /// Parse a label coming from a review row.
    ///
    /// Anything that is not a positive label is displayed as negative,
    /// including the backend's `unknown` placeholder.
    pub fn from_label_lossy(label: &str) -> Self {
        Self::from_label(label).unwrap_or(Self::Negative)
    }

    /// Canonical wire value, used for the `sentiment` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => SENTIMENT_POSITIVE,
            Self::Negative => SENTIMENT_NEGATIVE,
        }
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_label_lossy(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn task_id_accepts_uuid() {
        let id = TaskId::new("3f0c7a4e-2b1d-4f5a-9c3e-1a2b3c4d5e6f").unwrap();
        assert_eq!(id.as_str(), "3f0c7a4e-2b1d-4f5a-9c3e-1a2b3c4d5e6f");
    }

    #[test]
    fn task_id_rejects_empty() {
        assert_matches!(TaskId::new(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn task_id_rejects_path_separator() {
        assert_matches!(TaskId::new("a/b"), Err(CoreError::Validation(_)));
        assert_matches!(TaskId::new("a?b=1"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn task_id_deserialize_validates() {
        let err = serde_json::from_str::<TaskId>("\"\"");
        assert!(err.is_err());
    }

    #[test]
    fn sentiment_accepts_legacy_forms() {
        assert_eq!(Sentiment::from_label("pos"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::from_label("neg"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::from_label("Positive"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::from_label("neutral"), None);
    }

    #[test]
    fn sentiment_unknown_row_label_is_negative() {
        let s: Sentiment = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(s, Sentiment::Negative);
    }

    #[test]
    fn sentiment_serializes_canonical_value() {
        assert_eq!(
            serde_json::to_string(&Sentiment::Positive).unwrap(),
            "\"positive\""
        );
    }
}
