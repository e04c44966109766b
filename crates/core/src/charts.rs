//! Per-visualization view-models.
//!
//! Each derivation is a pure function from an optional raw sub-result to a
//! [`ChartView`]. The decision between "nothing to draw" and "ready" is made
//! once here; render code only matches on the variant.

use serde::Serialize;

use crate::bundle::{ConfidenceBars, ConfusionMatrix, Keyword, PieSlice, TimeSeries, TopicModelPayload};
use crate::types::Sentiment;

// ---------------------------------------------------------------------------
// ChartView
// ---------------------------------------------------------------------------

/// Render state of a single visualization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ChartView<T> {
    /// No data present, or present but zero-length.
    Empty,
    /// The upstream step reported a failure. Only produced for topic models.
    Error(String),
    /// Normalized payload ready to hand to a renderer.
    Ready(T),
}

impl<T> ChartView<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(payload) => Some(payload),
            _ => None,
        }
    }

    /// Short state name, matching the serialized `state` tag.
    pub fn state_label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Error(_) => "error",
            Self::Ready(_) => "ready",
        }
    }
}

/// Colour family a series element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    /// Classify a series name as emitted by the backend (`正面` / `负面`) or
    /// by a canonical sentiment label.
    pub fn from_series_name(name: &str) -> Self {
        match name.trim() {
            "正面" => Self::Positive,
            "负面" => Self::Negative,
            other => match Sentiment::from_label(other) {
                Some(Sentiment::Positive) => Self::Positive,
                Some(Sentiment::Negative) => Self::Negative,
                None => Self::Neutral,
            },
        }
    }
}

impl From<Sentiment> for Tone {
    fn from(sentiment: Sentiment) -> Self {
        match sentiment {
            Sentiment::Positive => Self::Positive,
            Sentiment::Negative => Self::Negative,
        }
    }
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSegment {
    pub name: String,
    pub value: u64,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieView {
    pub segments: Vec<PieSegment>,
    pub total: u64,
}

pub fn derive_pie(raw: Option<&[PieSlice]>) -> ChartView<PieView> {
    let Some(slices) = raw.filter(|s| !s.is_empty()) else {
        return ChartView::Empty;
    };
    let segments: Vec<PieSegment> = slices
        .iter()
        .map(|s| PieSegment {
            name: s.name.clone(),
            value: s.value,
            tone: Tone::from_series_name(&s.name),
        })
        .collect();
    let total = segments.iter().map(|s| s.value).sum();
    ChartView::Ready(PieView { segments, total })
}

// ---------------------------------------------------------------------------
// Line chart (sentiment trend)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendView {
    pub dates: Vec<String>,
    pub positive: Vec<u64>,
    pub negative: Vec<u64>,
    pub total: Vec<u64>,
}

pub fn derive_trend(raw: Option<&TimeSeries>) -> ChartView<TrendView> {
    match raw {
        Some(series) if !series.dates.is_empty() => ChartView::Ready(TrendView {
            dates: series.dates.clone(),
            positive: series.positive.clone(),
            negative: series.negative.clone(),
            total: series.total.clone(),
        }),
        _ => ChartView::Empty,
    }
}

// ---------------------------------------------------------------------------
// Bar chart (confidence distribution)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceBarsView {
    pub categories: Vec<String>,
    pub positive: Vec<u64>,
    pub negative: Vec<u64>,
}

pub fn derive_confidence_bars(raw: Option<&ConfidenceBars>) -> ChartView<ConfidenceBarsView> {
    match raw {
        Some(bars) if !bars.categories.is_empty() => ChartView::Ready(ConfidenceBarsView {
            categories: bars.categories.clone(),
            positive: bars.positive.clone(),
            negative: bars.negative.clone(),
        }),
        _ => ChartView::Empty,
    }
}

// ---------------------------------------------------------------------------
// Heatmap (confusion matrix)
// ---------------------------------------------------------------------------

/// Column labels of the 2x2 matrix (predicted class).
pub const PREDICTED_LABELS: [&str; 2] = ["Predicted negative", "Predicted positive"];

/// Row labels of the 2x2 matrix (actual class).
pub const ACTUAL_LABELS: [&str; 2] = ["Actual negative", "Actual positive"];

/// One heatmap cell. `predicted` is the x coordinate, `actual` the y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatmapCell {
    pub predicted: usize,
    pub actual: usize,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapView {
    pub cells: Vec<HeatmapCell>,
    pub scale_min: u64,
    pub scale_max: u64,
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
}

impl HeatmapView {
    pub fn cell(&self, predicted: usize, actual: usize) -> Option<u64> {
        self.cells
            .iter()
            .find(|c| c.predicted == predicted && c.actual == actual)
            .map(|c| c.value)
    }
}

fn axis_labels(known: &[&str; 2], prefix: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match known.get(i) {
            Some(label) if count == known.len() => (*label).to_string(),
            _ => format!("{prefix} {i}"),
        })
        .collect()
}

pub fn derive_heatmap(raw: Option<&ConfusionMatrix>) -> ChartView<HeatmapView> {
    let Some(matrix) = raw.filter(|m| !m.is_empty()) else {
        return ChartView::Empty;
    };
    let cells = matrix
        .rows()
        .iter()
        .enumerate()
        .flat_map(|(actual, row)| {
            row.iter().enumerate().map(move |(predicted, &value)| HeatmapCell {
                predicted,
                actual,
                value,
            })
        })
        .collect();
    ChartView::Ready(HeatmapView {
        cells,
        scale_min: 0,
        scale_max: matrix.max_value(),
        x_labels: axis_labels(&PREDICTED_LABELS, "Predicted", matrix.column_count()),
        y_labels: axis_labels(&ACTUAL_LABELS, "Actual", matrix.row_count()),
    })
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

/// Ratio of the maximum frequency above which a keyword is top tier.
pub const TOP_TIER_RATIO: f64 = 0.7;

/// Ratio of the maximum frequency above which a keyword is mid tier.
pub const MID_TIER_RATIO: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordTier {
    Top,
    Mid,
    Low,
}

/// Bucket a frequency relative to the maximum of its set.
///
/// Boundaries are exclusive: a ratio of exactly 0.7 is mid tier.
pub fn keyword_tier(freq: u64, max_freq: u64) -> KeywordTier {
    if max_freq == 0 {
        return KeywordTier::Low;
    }
    let ratio = freq as f64 / max_freq as f64;
    if ratio > TOP_TIER_RATIO {
        KeywordTier::Top
    } else if ratio > MID_TIER_RATIO {
        KeywordTier::Mid
    } else {
        KeywordTier::Low
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordTag {
    pub word: String,
    pub freq: u64,
    pub tier: KeywordTier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordCloud {
    pub tags: Vec<KeywordTag>,
    pub max_freq: u64,
}

pub fn derive_keywords(raw: Option<&[Keyword]>) -> ChartView<KeywordCloud> {
    let Some(keywords) = raw.filter(|k| !k.is_empty()) else {
        return ChartView::Empty;
    };
    let max_freq = keywords.iter().map(|k| k.freq).max().unwrap_or(0);
    let tags = keywords
        .iter()
        .map(|k| KeywordTag {
            word: k.word.clone(),
            freq: k.freq,
            tier: keyword_tier(k.freq, max_freq),
        })
        .collect();
    ChartView::Ready(KeywordCloud { tags, max_freq })
}

// ---------------------------------------------------------------------------
// Topic model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicView {
    pub id: u32,
    /// Display label, 1-based (`Topic 1` for id 0).
    pub label: String,
    /// Top words in rank order; empty renders a "no keywords" marker.
    pub words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicsView {
    pub num_topics: u32,
    pub topics: Vec<TopicView>,
    /// Opaque HTML visualization, independent of the topic list.
    pub visualization: Option<String>,
}

/// Derive the topic-model view.
///
/// A non-empty `error` wins over any topics that were also sent. An empty
/// topics list without an error is still `Ready`.
pub fn derive_topics(raw: Option<&TopicModelPayload>) -> ChartView<TopicsView> {
    let Some(payload) = raw else {
        return ChartView::Empty;
    };
    if let Some(error) = payload.error.as_deref().filter(|e| !e.is_empty()) {
        return ChartView::Error(error.to_string());
    }
    let topics = payload
        .topics
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|t| TopicView {
            id: t.id,
            label: format!("Topic {}", u64::from(t.id) + 1),
            words: t.top_words.clone(),
        })
        .collect();
    ChartView::Ready(TopicsView {
        num_topics: payload.num_topics.unwrap_or(0),
        topics,
        visualization: payload.vis_html.clone().filter(|h| !h.is_empty()),
    })
}

// ---------------------------------------------------------------------------
// Word clouds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordCloudView {
    pub sentiment: Sentiment,
    pub tone: Tone,
    /// Image payload, typically a `data:` URI.
    pub image: String,
}

pub fn derive_word_cloud(raw: Option<&str>, sentiment: Sentiment) -> ChartView<WordCloudView> {
    match raw {
        Some(image) if !image.is_empty() => ChartView::Ready(WordCloudView {
            sentiment,
            tone: sentiment.into(),
            image: image.to_string(),
        }),
        _ => ChartView::Empty,
    }
}
