//! Review list pagination and filtering against a scripted backend.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;

use common::{page_of, results_api, service_error, task};
use sentiscope_core::review::PaginationQuery;
use sentiscope_core::types::Sentiment;
use sentiscope_core::CoreError;
use sentiscope_dashboard::{FetchOutcome, ReviewController};

fn controller(api: &Arc<common::FakeResultsApi>) -> Arc<ReviewController> {
    Arc::new(ReviewController::new(api.clone(), task("t-1")))
}

/// Load page 1 with `label` rows so later tests start from a populated list.
async fn loaded(api: &Arc<common::FakeResultsApi>, label: &str, total: u64) -> Arc<ReviewController> {
    let ctrl = controller(api);
    let refresh = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.refresh().await }
    });
    api.reviews.next().await.succeed(page_of(label, total));
    assert_eq!(refresh.await.unwrap(), FetchOutcome::Applied);
    ctrl
}

// ---------------------------------------------------------------------------
// Test: initial load fetches the default query
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refresh_fetches_first_page_of_twenty() {
    let (api, _) = results_api();
    let ctrl = controller(&api);

    let refresh = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.refresh().await }
    });
    let call = api.reviews.next().await;
    assert_eq!(call.request, PaginationQuery::default());
    assert!(ctrl.snapshot().loading);

    call.succeed(page_of("first", 45));
    assert_eq!(refresh.await.unwrap(), FetchOutcome::Applied);

    let state = ctrl.snapshot();
    assert!(!state.loading);
    assert_eq!(state.total, 45);
    assert_eq!(state.total_pages(), 3);
    assert_eq!(state.rows[0].content, "first");
}

// ---------------------------------------------------------------------------
// Test: last query wins
// ---------------------------------------------------------------------------

#[tokio::test]
async fn filter_change_overtakes_pending_page_change() {
    let (api, _) = results_api();
    let ctrl = loaded(&api, "initial", 100).await;

    let to_page_two = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.set_page(2).await }
    });
    let page_two = api.reviews.next().await;
    assert_eq!(page_two.request.page(), 2);

    let to_positive = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.set_sentiment_filter(Some(Sentiment::Positive)).await }
    });
    let positive = api.reviews.next().await;
    assert_eq!(positive.request.page(), 1);
    assert_eq!(positive.request.sentiment_filter(), Some(Sentiment::Positive));

    positive.succeed(page_of("positive page 1", 30));
    assert_eq!(to_positive.await.unwrap(), FetchOutcome::Applied);

    page_two.succeed(page_of("stale page 2", 100));
    assert_eq!(to_page_two.await.unwrap().unwrap(), FetchOutcome::Discarded);

    let state = ctrl.snapshot();
    assert_eq!(state.query.page(), 1);
    assert_eq!(state.query.sentiment_filter(), Some(Sentiment::Positive));
    assert_eq!(state.rows[0].content, "positive page 1");
    assert_eq!(state.total, 30);
    assert!(!state.loading);
    assert_eq!(api.reviews.total(), 3);
}

#[tokio::test]
async fn stale_response_resolving_first_keeps_loading() {
    let (api, _) = results_api();
    let ctrl = loaded(&api, "initial", 100).await;

    let to_page_two = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.set_page(2).await }
    });
    let page_two = api.reviews.next().await;

    let to_negative = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.set_sentiment_filter(Some(Sentiment::Negative)).await }
    });
    let negative = api.reviews.next().await;

    page_two.succeed(page_of("stale page 2", 100));
    assert_eq!(to_page_two.await.unwrap().unwrap(), FetchOutcome::Discarded);

    // The newer query is still in flight: old rows stay, still loading.
    let state = ctrl.snapshot();
    assert!(state.loading);
    assert_eq!(state.rows[0].content, "initial");
    assert_eq!(state.total, 100);

    negative.succeed(page_of("negative page 1", 12));
    assert_eq!(to_negative.await.unwrap(), FetchOutcome::Applied);
    assert_eq!(ctrl.snapshot().rows[0].content, "negative page 1");
}

// ---------------------------------------------------------------------------
// Test: no flash to empty while loading
// ---------------------------------------------------------------------------

#[tokio::test]
async fn previous_rows_visible_while_next_page_loads() {
    let (api, _) = results_api();
    let ctrl = loaded(&api, "page 1", 60).await;

    let to_page_three = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.set_page(3).await }
    });
    let call = api.reviews.next().await;

    let state = ctrl.snapshot();
    assert!(state.loading);
    assert_eq!(state.query.page(), 3);
    assert_eq!(state.rows[0].content, "page 1");
    assert_eq!(state.total, 60);

    call.succeed(page_of("page 3", 60));
    assert_eq!(to_page_three.await.unwrap().unwrap(), FetchOutcome::Applied);
}

// ---------------------------------------------------------------------------
// Test: failure is local and keeps rows
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failure_keeps_rows_and_total() {
    let (api, _) = results_api();
    let ctrl = loaded(&api, "page 1", 60).await;

    let to_page_two = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.set_page(2).await }
    });
    api.reviews.next().await.fail(service_error("Database unavailable"));

    assert_eq!(
        to_page_two.await.unwrap().unwrap(),
        FetchOutcome::Failed("Database unavailable".into())
    );
    let state = ctrl.snapshot();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Database unavailable"));
    assert_eq!(state.rows[0].content, "page 1");
    assert_eq!(state.total, 60);

    // A retry clears the error as soon as it is issued.
    let retry = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.refresh().await }
    });
    let call = api.reviews.next().await;
    assert_eq!(call.request.page(), 2);
    assert_eq!(ctrl.snapshot().error, None);
    call.succeed(page_of("page 2", 60));
    assert_eq!(retry.await.unwrap(), FetchOutcome::Applied);
}

// ---------------------------------------------------------------------------
// Test: reset rules and no-op mutations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn page_size_change_resets_to_first_page() {
    let (api, _) = results_api();
    let ctrl = loaded(&api, "page 1", 500).await;

    let to_page_four = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.set_page(4).await }
    });
    api.reviews.next().await.succeed(page_of("page 4", 500));
    to_page_four.await.unwrap().unwrap();

    let to_fifty = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.set_page_and_size(4, 50).await }
    });
    let call = api.reviews.next().await;
    assert_eq!(call.request.page(), 1);
    assert_eq!(call.request.page_size(), 50);
    call.succeed(page_of("page 1 of 50", 500));
    assert_eq!(to_fifty.await.unwrap().unwrap(), FetchOutcome::Applied);
    assert_eq!(ctrl.snapshot().total_pages(), 10);
}

#[tokio::test]
async fn unchanged_query_does_not_fetch() {
    let (api, _) = results_api();
    let ctrl = loaded(&api, "page 1", 10).await;

    assert_eq!(ctrl.set_page(1).await.unwrap(), FetchOutcome::Unchanged);
    assert_eq!(ctrl.set_page_size(20).await.unwrap(), FetchOutcome::Unchanged);
    assert_eq!(ctrl.set_sentiment_filter(None).await, FetchOutcome::Unchanged);
    assert_eq!(api.reviews.total(), 1);
}

#[tokio::test]
async fn invalid_mutations_rejected_without_fetch() {
    let (api, _) = results_api();
    let ctrl = loaded(&api, "page 1", 10).await;

    assert_matches!(ctrl.set_page(0).await, Err(CoreError::Validation(_)));
    assert_matches!(ctrl.set_page_size(25).await, Err(CoreError::Validation(_)));
    assert_eq!(ctrl.snapshot().query, PaginationQuery::default());
    assert_eq!(api.reviews.total(), 1);
}
