//! Result bundle payload returned by `GET /api/results/{task_id}`.
//!
//! Every sub-result is independently optional. Decoding is lenient at the
//! sub-result level: a field that is missing, `null`, or malformed decodes
//! to `None` instead of failing the whole bundle, so one broken chart can
//! never take the rest of the dashboard down with it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Lenient field decoding
// ---------------------------------------------------------------------------

/// Decode an optional field, mapping `null` and shape mismatches to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

// ---------------------------------------------------------------------------
// Task status
// ---------------------------------------------------------------------------

/// Lifecycle status of an analysis task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Parse a status string. Unrecognised values are treated as pending.
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::from_str_lossy).unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// The complete, possibly partial, set of analysis outputs for one task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultBundle {
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "lenient")]
    pub statistics: Option<Statistics>,
    #[serde(default, deserialize_with = "lenient")]
    pub wordcloud: Option<WordClouds>,
    #[serde(default, deserialize_with = "lenient")]
    pub charts: Option<Charts>,
}

/// Aggregate counts over the analysed dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default, deserialize_with = "lenient")]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub positive: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub negative: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub positive_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub accuracy: Option<f64>,
}

/// Rendered word-cloud images, usually `data:image/png;base64,...` URIs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordClouds {
    #[serde(default, deserialize_with = "lenient")]
    pub positive: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub negative: Option<String>,
}

/// Named chart sub-results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Charts {
    #[serde(default, deserialize_with = "lenient")]
    pub pie_data: Option<Vec<PieSlice>>,
    #[serde(default, deserialize_with = "lenient")]
    pub confusion_matrix: Option<ConfusionMatrix>,
    #[serde(default, deserialize_with = "lenient")]
    pub time_series: Option<TimeSeries>,
    #[serde(default, deserialize_with = "lenient")]
    pub bar_3d: Option<ConfidenceBars>,
    #[serde(default, deserialize_with = "lenient")]
    pub lda: Option<TopicModelPayload>,
    #[serde(default, deserialize_with = "lenient")]
    pub keywords: Option<Vec<Keyword>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub name: String,
    #[serde(default)]
    pub value: u64,
}

/// Sentiment counts per review batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub positive: Vec<u64>,
    #[serde(default)]
    pub negative: Vec<u64>,
    #[serde(default)]
    pub total: Vec<u64>,
}

/// Review counts per confidence bucket, split by sentiment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBars {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub positive: Vec<u64>,
    #[serde(default)]
    pub negative: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    pub freq: u64,
}

/// Raw LDA topic-model output. `error` is set when the upstream step failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicModelPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub num_topics: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub topics: Option<Vec<Topic>>,
    #[serde(default, deserialize_with = "lenient")]
    pub vis_html: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: u32,
    #[serde(default)]
    pub top_words: Vec<String>,
}

// ---------------------------------------------------------------------------
// Confusion matrix
// ---------------------------------------------------------------------------

/// Rows are actual classes, columns are predicted classes, both ordered
/// negative then positive.
///
/// All rows have the same length; construction rejects ragged input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u64>>", into = "Vec<Vec<u64>>")]
pub struct ConfusionMatrix {
    rows: Vec<Vec<u64>>,
}

impl ConfusionMatrix {
    pub fn new(rows: Vec<Vec<u64>>) -> Result<Self, CoreError> {
        if let Some(first) = rows.first() {
            let width = first.len();
            if let Some(bad) = rows.iter().position(|r| r.len() != width) {
                return Err(CoreError::InvalidData(format!(
                    "Confusion matrix row {bad} has {} cells, expected {width}",
                    rows[bad].len()
                )));
            }
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<u64>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Largest cell value across the whole matrix, `0` when there are no cells.
    pub fn max_value(&self) -> u64 {
        self.rows.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn get(&self, actual: usize, predicted: usize) -> Option<u64> {
        self.rows.get(actual).and_then(|r| r.get(predicted)).copied()
    }
}

impl TryFrom<Vec<Vec<u64>>> for ConfusionMatrix {
    type Error = CoreError;

    fn try_from(rows: Vec<Vec<u64>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<ConfusionMatrix> for Vec<Vec<u64>> {
    fn from(matrix: ConfusionMatrix) -> Self {
        matrix.rows
    }
}
