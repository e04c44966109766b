//! Backend seams the dashboard controllers are written against.
//!
//! [`SentimentApi`](crate::SentimentApi) is the production implementation;
//! tests substitute scripted doubles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sentiscope_core::bundle::{ResultBundle, TaskStatus};
use sentiscope_core::review::{PaginationQuery, ReviewPage};
use sentiscope_core::types::TaskId;

use crate::error::ClientError;

/// Response of `POST /api/upload` and `POST /api/upload/demo/load`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub file_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisTicket {
    pub task_id: TaskId,
    #[serde(default)]
    pub status: TaskStatus,
}

/// Read side: result bundles and review pages.
///
/// Implementations perform no retries and mutate no shared state.
#[async_trait]
pub trait ResultsApi: Send + Sync {
    async fn fetch_result_bundle(&self, task_id: &TaskId) -> Result<ResultBundle, ClientError>;

    async fn fetch_review_page(
        &self,
        task_id: &TaskId,
        query: &PaginationQuery,
    ) -> Result<ReviewPage, ClientError>;
}

/// Write side: dataset provisioning and job submission.
#[async_trait]
pub trait JobsApi: Send + Sync {
    async fn upload_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadReceipt, ClientError>;

    async fn load_demo_dataset(&self) -> Result<UploadReceipt, ClientError>;

    async fn start_analysis(&self, file_id: &str) -> Result<AnalysisTicket, ClientError>;
}
