//! Headline statistic cards shown above the dashboard tabs.

use serde::Serialize;

use crate::bundle::Statistics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    TotalReviews,
    PositiveReviews,
    NegativeReviews,
    ModelAccuracy,
}

impl StatKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::TotalReviews => "Total reviews",
            Self::PositiveReviews => "Positive reviews",
            Self::NegativeReviews => "Negative reviews",
            Self::ModelAccuracy => "Model accuracy",
        }
    }
}

/// One rendered card: a main value and an optional suffix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub kind: StatKind,
    pub value: String,
    pub suffix: Option<String>,
}

/// Normalized statistics with every absent count defaulted to zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSummary {
    pub total: u64,
    pub positive: u64,
    pub negative: u64,
    pub positive_percent: f64,
    pub negative_percent: f64,
    pub accuracy_percent: f64,
}

impl StatisticsSummary {
    pub fn from_statistics(stats: &Statistics) -> Self {
        let total = stats.total.unwrap_or(0);
        let positive = stats.positive.unwrap_or(0);
        let negative = stats.negative.unwrap_or(0);

        // An empty dataset divides by one and reads as 0%, never as undefined.
        let divisor = if total == 0 { 1 } else { total };

        Self {
            total,
            positive,
            negative,
            positive_percent: stats.positive_rate.unwrap_or(0.0) * 100.0,
            negative_percent: negative as f64 / divisor as f64 * 100.0,
            accuracy_percent: stats.accuracy.unwrap_or(0.0) * 100.0,
        }
    }

    pub fn cards(&self) -> [StatCard; 4] {
        [
            StatCard {
                kind: StatKind::TotalReviews,
                value: self.total.to_string(),
                suffix: None,
            },
            StatCard {
                kind: StatKind::PositiveReviews,
                value: self.positive.to_string(),
                suffix: Some(format!("({}%)", format_percent(self.positive_percent))),
            },
            StatCard {
                kind: StatKind::NegativeReviews,
                value: self.negative.to_string(),
                suffix: Some(format!("{}%", format_percent(self.negative_percent))),
            },
            StatCard {
                kind: StatKind::ModelAccuracy,
                value: format_percent(self.accuracy_percent),
                suffix: Some("%".to_string()),
            },
        ]
    }
}

/// Format a percentage with one decimal place.
pub fn format_percent(percent: f64) -> String {
    format!("{percent:.1}")
}
