//! Review rows and the pagination query that selects them.
//!
//! Reviews are not part of the result bundle. They are fetched a page at a
//! time from `GET /api/results/{task_id}/reviews`, with the server doing the
//! filtering and truncation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Sentiment;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Page sizes offered by the review table.
pub const ALLOWED_PAGE_SIZES: &[u32] = &[10, 20, 50, 100];

/// Default number of reviews per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// First page number (1-based).
pub const FIRST_PAGE: u32 = 1;

/// Check whether a page size is one of [`ALLOWED_PAGE_SIZES`].
pub fn is_allowed_page_size(size: u32) -> bool {
    ALLOWED_PAGE_SIZES.contains(&size)
}

// ---------------------------------------------------------------------------
// PaginationQuery
// ---------------------------------------------------------------------------

/// The sole input that determines which review page is fetched.
///
/// Serializes to the `?page=&page_size=&sentiment=` query string; the
/// `sentiment` key is omitted when no filter is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationQuery {
    page: u32,
    page_size: u32,
    #[serde(rename = "sentiment", skip_serializing_if = "Option::is_none")]
    sentiment_filter: Option<Sentiment>,
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sentiment_filter: None,
        }
    }
}

impl PaginationQuery {
    pub fn new(page: u32, page_size: u32, sentiment_filter: Option<Sentiment>) -> Result<Self, CoreError> {
        validate_page(page)?;
        validate_page_size(page_size)?;
        Ok(Self {
            page,
            page_size,
            sentiment_filter,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sentiment_filter(&self) -> Option<Sentiment> {
        self.sentiment_filter
    }

    /// Move to another page, keeping size and filter.
    pub fn with_page(self, page: u32) -> Result<Self, CoreError> {
        validate_page(page)?;
        Ok(Self { page, ..self })
    }

    /// Change the page size. A different size resets to the first page.
    pub fn with_page_size(self, page_size: u32) -> Result<Self, CoreError> {
        validate_page_size(page_size)?;
        if page_size == self.page_size {
            return Ok(self);
        }
        Ok(Self {
            page: FIRST_PAGE,
            page_size,
            ..self
        })
    }

    /// Combined change emitted by a pagination widget.
    ///
    /// When the size changes the requested page is ignored and the query
    /// resets to the first page.
    pub fn with_page_and_size(self, page: u32, page_size: u32) -> Result<Self, CoreError> {
        validate_page(page)?;
        validate_page_size(page_size)?;
        if page_size != self.page_size {
            return Ok(Self {
                page: FIRST_PAGE,
                page_size,
                ..self
            });
        }
        Ok(Self { page, ..self })
    }

    /// Change the sentiment filter. A different filter resets to the first page.
    pub fn with_sentiment_filter(self, sentiment_filter: Option<Sentiment>) -> Self {
        if sentiment_filter == self.sentiment_filter {
            return self;
        }
        Self {
            page: FIRST_PAGE,
            sentiment_filter,
            ..self
        }
    }

    /// Number of pages needed to show `total` rows (at least one).
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.page_size)).max(1)
    }
}

fn validate_page(page: u32) -> Result<(), CoreError> {
    if page < FIRST_PAGE {
        return Err(CoreError::Validation(format!(
            "Page must be at least {FIRST_PAGE}, got {page}"
        )));
    }
    Ok(())
}

fn validate_page_size(page_size: u32) -> Result<(), CoreError> {
    if !is_allowed_page_size(page_size) {
        return Err(CoreError::Validation(format!(
            "Page size {page_size} is not one of {ALLOWED_PAGE_SIZES:?}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// Confidence above which a prediction is shown as high confidence.
pub const HIGH_CONFIDENCE: f64 = 0.7;

/// Confidence above which a prediction is shown as medium confidence.
pub const MEDIUM_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > HIGH_CONFIDENCE {
            Self::High
        } else if confidence > MEDIUM_CONFIDENCE {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// One analysed review row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    #[serde(default)]
    pub content: String,
    pub sentiment: Sentiment,
    #[serde(default)]
    pub confidence: f64,
}

impl Review {
    /// Confidence as a percentage with one decimal place, e.g. `"85.0"`.
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}", self.confidence * 100.0)
    }

    pub fn confidence_band(&self) -> ConfidenceBand {
        ConfidenceBand::from_confidence(self.confidence)
    }
}

/// One server-delivered page of reviews.
///
/// `total` counts every row matching the current filter, not just this page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewPage {
    #[serde(default)]
    pub data: Vec<Review>,
    #[serde(default)]
    pub total: u64,
}
