//! Review list controller: server-side pagination and sentiment filtering.
//!
//! Every change to the [`PaginationQuery`] triggers exactly one page fetch.
//! Responses are applied last-query-wins: each fetch carries a sequence
//! number and a snapshot of the query it was issued for, and a response is
//! discarded unless both still match when it resolves. While a fetch is in
//! flight the previous rows stay visible with `loading` set.

use std::convert::Infallible;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use sentiscope_client::ResultsApi;
use sentiscope_core::review::{PaginationQuery, Review, ReviewPage};
use sentiscope_core::types::{Sentiment, TaskId};
use sentiscope_core::CoreError;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Snapshot of the review list as the shell should render it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReviewListState {
    pub query: PaginationQuery,
    pub rows: Vec<Review>,
    /// Rows matching the current filter across all pages.
    pub total: u64,
    pub loading: bool,
    pub error: Option<String>,
}

impl ReviewListState {
    pub fn total_pages(&self) -> u64 {
        self.query.total_pages(self.total)
    }

    /// Footer text for the pagination widget.
    pub fn summary(&self) -> String {
        format!("{} reviews", self.total)
    }
}

/// What happened to one mutation's fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page replaced rows and total.
    Applied,
    /// A newer query was issued before the response arrived.
    Discarded,
    /// The fetch failed; rows and total were kept.
    Failed(String),
    /// The mutation left the query as it was, so nothing was fetched.
    Unchanged,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the review list of one task.
pub struct ReviewController {
    api: Arc<dyn ResultsApi>,
    task_id: TaskId,
    seq: AtomicU64,
    state: watch::Sender<ReviewListState>,
}

impl fmt::Debug for ReviewController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReviewController")
            .field("task_id", &self.task_id)
            .field("seq", &self.seq.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl ReviewController {
    /// Create a controller on page 1 with the default page size and no
    /// filter. Nothing is fetched until [`refresh`](Self::refresh).
    pub fn new(api: Arc<dyn ResultsApi>, task_id: TaskId) -> Self {
        let (state, _) = watch::channel(ReviewListState::default());
        Self {
            api,
            task_id,
            seq: AtomicU64::new(0),
            state,
        }
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn snapshot(&self) -> ReviewListState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ReviewListState> {
        self.state.subscribe()
    }

    /// Fetch the current query again. Used for the initial load.
    pub async fn refresh(&self) -> FetchOutcome {
        match self.mutate(Ok::<_, Infallible>, true).await {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        }
    }

    pub async fn set_page(&self, page: u32) -> Result<FetchOutcome, CoreError> {
        self.mutate(|query| query.with_page(page), false).await
    }

    /// A different size resets to page 1.
    pub async fn set_page_size(&self, page_size: u32) -> Result<FetchOutcome, CoreError> {
        self.mutate(|query| query.with_page_size(page_size), false).await
    }

    /// Combined change from the pagination widget, fetched once.
    pub async fn set_page_and_size(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<FetchOutcome, CoreError> {
        self.mutate(|query| query.with_page_and_size(page, page_size), false)
            .await
    }

    /// A different filter resets to page 1.
    pub async fn set_sentiment_filter(&self, filter: Option<Sentiment>) -> FetchOutcome {
        match self
            .mutate(
                |query| Ok::<_, Infallible>(query.with_sentiment_filter(filter)),
                false,
            )
            .await
        {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        }
    }

    // ---- private helpers ----

    /// Apply `change` to the query, then fetch the resulting page.
    ///
    /// The query update and sequence bump happen under the channel's write
    /// lock, so issue order and sequence order always agree.
    async fn mutate<E>(
        &self,
        change: impl FnOnce(PaginationQuery) -> Result<PaginationQuery, E>,
        force: bool,
    ) -> Result<FetchOutcome, E> {
        let mut issued = None;
        let mut failure = None;

        self.state.send_if_modified(|state| {
            let next = match change(state.query) {
                Ok(next) => next,
                Err(e) => {
                    failure = Some(e);
                    return false;
                }
            };
            if next == state.query && !force {
                return false;
            }
            let seq = self.seq.fetch_add(1, Ordering::AcqRel) + 1;
            state.query = next;
            state.loading = true;
            state.error = None;
            issued = Some((seq, next));
            true
        });

        if let Some(e) = failure {
            return Err(e);
        }
        let Some((seq, query)) = issued else {
            return Ok(FetchOutcome::Unchanged);
        };

        tracing::debug!(
            task_id = %self.task_id,
            seq,
            page = query.page(),
            page_size = query.page_size(),
            sentiment = query.sentiment_filter().map(|s| s.as_str()),
            "Fetching review page",
        );
        let result = self.api.fetch_review_page(&self.task_id, &query).await;

        let mut outcome = FetchOutcome::Discarded;
        self.state.send_if_modified(|state| {
            if self.seq.load(Ordering::Acquire) != seq || state.query != query {
                return false;
            }
            state.loading = false;
            match &result {
                Ok(ReviewPage { data, total }) => {
                    state.rows = data.clone();
                    state.total = *total;
                    state.error = None;
                    outcome = FetchOutcome::Applied;
                }
                Err(e) => {
                    let message = e.user_message();
                    state.error = Some(message.clone());
                    outcome = FetchOutcome::Failed(message);
                }
            }
            true
        });

        match (&outcome, &result) {
            (FetchOutcome::Discarded, _) => {
                tracing::debug!(task_id = %self.task_id, seq, "Discarding stale review page");
            }
            (FetchOutcome::Failed(_), Err(e)) => {
                tracing::warn!(task_id = %self.task_id, page = query.page(), error = %e, "Failed to fetch review page");
            }
            _ => {}
        }
        Ok(outcome)
    }
}
