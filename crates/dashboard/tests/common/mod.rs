//! Scripted backend doubles for controller tests.
//!
//! Every call parks on a [`Gate`] until the test answers it, so the order in
//! which responses resolve is decided by the test, not the scheduler.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use sentiscope_client::{AnalysisTicket, ClientError, JobsApi, ResultsApi, UploadReceipt};
use sentiscope_core::bundle::{ResultBundle, Statistics, TaskStatus};
use sentiscope_core::review::{PaginationQuery, Review, ReviewPage};
use sentiscope_core::routes::Route;
use sentiscope_core::types::{Sentiment, TaskId};
use sentiscope_dashboard::Navigator;

/// How many scheduler turns to wait for a call before failing the test.
const MAX_YIELDS: usize = 10_000;

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

pub struct Call<Req, Resp> {
    pub request: Req,
    reply: oneshot::Sender<Result<Resp, ClientError>>,
}

impl<Req, Resp> Call<Req, Resp> {
    pub fn succeed(self, response: Resp) {
        let _ = self.reply.send(Ok(response));
    }

    pub fn fail(self, error: ClientError) {
        let _ = self.reply.send(Err(error));
    }
}

pub struct Gate<Req, Resp> {
    pending: Mutex<VecDeque<Call<Req, Resp>>>,
    total: AtomicUsize,
}

impl<Req, Resp> Default for Gate<Req, Resp> {
    fn default() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            total: AtomicUsize::new(0),
        }
    }
}

impl<Req, Resp> Gate<Req, Resp> {
    /// Park a call until the test answers it.
    async fn enter(&self, request: Req) -> Result<Resp, ClientError> {
        let (reply, rx) = oneshot::channel();
        self.total.fetch_add(1, Ordering::SeqCst);
        self.pending
            .lock()
            .unwrap()
            .push_back(Call { request, reply });
        rx.await
            .unwrap_or_else(|_| Err(ClientError::Decode("call abandoned by test".into())))
    }

    /// Wait until a call is parked and take the oldest one.
    pub async fn next(&self) -> Call<Req, Resp> {
        for _ in 0..MAX_YIELDS {
            let call = self.pending.lock().unwrap().pop_front();
            if let Some(call) = call {
                return call;
            }
            tokio::task::yield_now().await;
        }
        panic!("no call arrived");
    }

    /// Calls received so far, answered or not.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeResultsApi {
    pub bundles: Gate<TaskId, ResultBundle>,
    pub reviews: Gate<PaginationQuery, ReviewPage>,
}

#[async_trait]
impl ResultsApi for FakeResultsApi {
    async fn fetch_result_bundle(&self, task_id: &TaskId) -> Result<ResultBundle, ClientError> {
        self.bundles.enter(task_id.clone()).await
    }

    async fn fetch_review_page(
        &self,
        _task_id: &TaskId,
        query: &PaginationQuery,
    ) -> Result<ReviewPage, ClientError> {
        self.reviews.enter(*query).await
    }
}

#[derive(Default)]
pub struct FakeJobsApi {
    /// Request is `(file_name, size)`.
    pub uploads: Gate<(String, usize), UploadReceipt>,
    pub demos: Gate<(), UploadReceipt>,
    /// Request is the `file_id`.
    pub analyses: Gate<String, AnalysisTicket>,
}

#[async_trait]
impl JobsApi for FakeJobsApi {
    async fn upload_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadReceipt, ClientError> {
        self.uploads.enter((file_name.to_string(), bytes.len())).await
    }

    async fn load_demo_dataset(&self) -> Result<UploadReceipt, ClientError> {
        self.demos.enter(()).await
    }

    async fn start_analysis(&self, file_id: &str) -> Result<AnalysisTicket, ClientError> {
        self.analyses.enter(file_id.to_string()).await
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn task(id: &str) -> TaskId {
    TaskId::new(id).unwrap()
}

pub fn bundle(total: u64) -> ResultBundle {
    ResultBundle {
        status: TaskStatus::Completed,
        statistics: Some(Statistics {
            total: Some(total),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// A page whose single row names the page it came from.
pub fn page_of(label: &str, total: u64) -> ReviewPage {
    ReviewPage {
        data: vec![Review {
            id: 1,
            content: label.to_string(),
            sentiment: Sentiment::Positive,
            confidence: 0.9,
        }],
        total,
    }
}

pub fn receipt(file_id: &str) -> UploadReceipt {
    UploadReceipt {
        file_id: file_id.to_string(),
        message: None,
    }
}

pub fn ticket(task_id: &str) -> AnalysisTicket {
    AnalysisTicket {
        task_id: task(task_id),
        status: TaskStatus::Pending,
    }
}

pub fn service_error(detail: &str) -> ClientError {
    ClientError::Service {
        status: 500,
        detail: Some(detail.to_string()),
    }
}

/// Shared handles in the shapes the controllers take.
pub fn results_api() -> (Arc<FakeResultsApi>, Arc<RecordingNavigator>) {
    (Arc::new(FakeResultsApi::default()), Arc::new(RecordingNavigator::default()))
}

pub fn jobs_api() -> (Arc<FakeJobsApi>, Arc<RecordingNavigator>) {
    (Arc::new(FakeJobsApi::default()), Arc::new(RecordingNavigator::default()))
}
