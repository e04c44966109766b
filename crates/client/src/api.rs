//! REST API client for the sentiment-analysis backend.
//!
//! Wraps the upload, analysis, and results endpoints using [`reqwest`].
//! A single fixed timeout is configured on the underlying client; no call
//! is retried here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::de::DeserializeOwned;

use sentiscope_core::bundle::ResultBundle;
use sentiscope_core::review::{PaginationQuery, ReviewPage};
use sentiscope_core::types::TaskId;

use crate::config::ClientConfig;
use crate::error::{extract_detail, ClientError};
use crate::service::{AnalysisTicket, JobsApi, ResultsApi, UploadReceipt};

/// MIME type sent with uploaded datasets.
const CSV_MIME: &str = "text/csv";

/// HTTP client for one analysis backend.
#[derive(Debug, Clone)]
pub struct SentimentApi {
    client: reqwest::Client,
    api_url: String,
    timeout: Duration,
}

impl SentimentApi {
    /// Create a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(
            client,
            config.api_url.clone(),
            config.request_timeout,
        ))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    ///
    /// `timeout` is only used to describe timeouts in error messages; the
    /// caller is responsible for configuring it on `client`.
    pub fn with_client(client: reqwest::Client, api_url: String, timeout: Duration) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Upload a CSV dataset.
    ///
    /// Sends `POST /upload` as `multipart/form-data` with a single `file`
    /// part.
    pub async fn upload_file(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, ClientError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(CSV_MIME)?;
        let form = multipart::Form::new().part("file", part);

        tracing::debug!(file_name, "Uploading dataset");
        let request = self
            .client
            .post(format!("{}/upload", self.api_url))
            .multipart(form);
        self.send_json(request).await
    }

    /// Ask the backend to provision its bundled sample dataset.
    ///
    /// Sends `POST /upload/demo/load`.
    pub async fn load_demo_dataset(&self) -> Result<UploadReceipt, ClientError> {
        let request = self
            .client
            .post(format!("{}/upload/demo/load", self.api_url));
        self.send_json(request).await
    }

    /// Start an analysis job for an uploaded file.
    ///
    /// Sends `POST /analyze` with `{"file_id": ...}`.
    pub async fn start_analysis(&self, file_id: &str) -> Result<AnalysisTicket, ClientError> {
        let body = serde_json::json!({ "file_id": file_id });
        let request = self
            .client
            .post(format!("{}/analyze", self.api_url))
            .json(&body);
        self.send_json(request).await
    }

    /// Retrieve the full result bundle of a task.
    ///
    /// Sends `GET /results/{task_id}`.
    pub async fn fetch_result_bundle(&self, task_id: &TaskId) -> Result<ResultBundle, ClientError> {
        let request = self
            .client
            .get(format!("{}/results/{}", self.api_url, task_id));
        self.send_json(request).await
    }

    /// Retrieve one page of reviews; the server filters and truncates.
    ///
    /// Sends `GET /results/{task_id}/reviews?page=&page_size=&sentiment=`.
    pub async fn fetch_review_page(
        &self,
        task_id: &TaskId,
        query: &PaginationQuery,
    ) -> Result<ReviewPage, ClientError> {
        let request = self
            .client
            .get(format!("{}/results/{}/reviews", self.api_url, task_id))
            .query(query);
        self.send_json(request).await
    }

    // ---- private helpers ----

    /// Send a request and decode a successful JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::from_transport(e, self.timeout))?;
        let response = self.ensure_success(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::from_transport(e, self.timeout))
    }

    /// Ensure the response has a success status code, turning anything else
    /// into a [`ClientError::Service`] carrying the body's `detail`.
    async fn ensure_success(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(&body);
        tracing::warn!(
            status = status.as_u16(),
            detail = detail.as_deref().unwrap_or(""),
            "Backend returned an error status",
        );
        Err(ClientError::Service {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl ResultsApi for SentimentApi {
    async fn fetch_result_bundle(&self, task_id: &TaskId) -> Result<ResultBundle, ClientError> {
        SentimentApi::fetch_result_bundle(self, task_id).await
    }

    async fn fetch_review_page(
        &self,
        task_id: &TaskId,
        query: &PaginationQuery,
    ) -> Result<ReviewPage, ClientError> {
        SentimentApi::fetch_review_page(self, task_id, query).await
    }
}

#[async_trait]
impl JobsApi for SentimentApi {
    async fn upload_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadReceipt, ClientError> {
        SentimentApi::upload_file(self, file_name, bytes).await
    }

    async fn load_demo_dataset(&self) -> Result<UploadReceipt, ClientError> {
        SentimentApi::load_demo_dataset(self).await
    }

    async fn start_analysis(&self, file_id: &str) -> Result<AnalysisTicket, ClientError> {
        SentimentApi::start_analysis(self, file_id).await
    }
}
