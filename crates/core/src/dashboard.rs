//! Composition of every visualization view-model into a tabbed dashboard.

use serde::Serialize;

use crate::bundle::{ResultBundle, TaskStatus};
use crate::charts::{
    derive_confidence_bars, derive_heatmap, derive_keywords, derive_pie, derive_topics, derive_trend,
    derive_word_cloud, ChartView, ConfidenceBarsView, HeatmapView, KeywordCloud, PieView, TopicsView,
    TrendView, WordCloudView,
};
use crate::statistics::StatisticsSummary;
use crate::types::Sentiment;

/// Tabs of the results page, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardTab {
    WordClouds,
    Statistics,
    Topics,
    Keywords,
    Reviews,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 5] = [
        Self::WordClouds,
        Self::Statistics,
        Self::Topics,
        Self::Keywords,
        Self::Reviews,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::WordClouds => "Word clouds",
            Self::Statistics => "Statistics",
            Self::Topics => "Topic model",
            Self::Keywords => "Keywords",
            Self::Reviews => "Reviews",
        }
    }
}

/// Every view-model derived from one result bundle.
///
/// Built once per successful bundle fetch. The review list is not part of
/// the bundle and is driven separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub status: TaskStatus,
    /// `None` hides the statistic cards entirely.
    pub statistics: Option<StatisticsSummary>,
    pub positive_cloud: ChartView<WordCloudView>,
    pub negative_cloud: ChartView<WordCloudView>,
    pub pie: ChartView<PieView>,
    pub heatmap: ChartView<HeatmapView>,
    pub trend: ChartView<TrendView>,
    pub confidence_bars: ChartView<ConfidenceBarsView>,
    pub topics: ChartView<TopicsView>,
    pub keywords: ChartView<KeywordCloud>,
}

impl Dashboard {
    pub fn from_bundle(bundle: &ResultBundle) -> Self {
        let clouds = bundle.wordcloud.as_ref();
        let charts = bundle.charts.as_ref();

        Self {
            status: bundle.status,
            statistics: bundle.statistics.as_ref().map(StatisticsSummary::from_statistics),
            positive_cloud: derive_word_cloud(
                clouds.and_then(|c| c.positive.as_deref()),
                Sentiment::Positive,
            ),
            negative_cloud: derive_word_cloud(
                clouds.and_then(|c| c.negative.as_deref()),
                Sentiment::Negative,
            ),
            pie: derive_pie(charts.and_then(|c| c.pie_data.as_deref())),
            heatmap: derive_heatmap(charts.and_then(|c| c.confusion_matrix.as_ref())),
            trend: derive_trend(charts.and_then(|c| c.time_series.as_ref())),
            confidence_bars: derive_confidence_bars(charts.and_then(|c| c.bar_3d.as_ref())),
            topics: derive_topics(charts.and_then(|c| c.lda.as_ref())),
            keywords: derive_keywords(charts.and_then(|c| c.keywords.as_deref())),
        }
    }

    /// Whether the "analysis complete" banner is shown.
    pub fn show_completion_banner(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Number of visualizations with something to draw.
    pub fn ready_count(&self) -> usize {
        [
            self.positive_cloud.is_ready(),
            self.negative_cloud.is_ready(),
            self.pie.is_ready(),
            self.heatmap.is_ready(),
            self.trend.is_ready(),
            self.confidence_bars.is_ready(),
            self.topics.is_ready(),
            self.keywords.is_ready(),
        ]
        .into_iter()
        .filter(|ready| *ready)
        .count()
    }
}
