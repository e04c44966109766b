//! Upload flow: client-side pre-check, then upload, analyze, navigate.

use std::path::Path;
use std::sync::Arc;

use sentiscope_client::{ClientError, JobsApi};
use sentiscope_core::types::TaskId;

use crate::launch::{analyze_and_navigate, settle, LaunchOutcome, SequenceGuard};
use crate::navigator::Navigator;

/// Required file name suffix.
pub const CSV_EXTENSION: &str = ".csv";

/// Files must be strictly smaller than this (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Shown when the upload sequence fails without a more specific message.
pub const UPLOAD_FAILURE_MESSAGE: &str = "Operation failed, please try again";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Only CSV files can be uploaded, got '{0}'")]
    NotCsv(String),

    #[error("File must be smaller than 10 MB, got {0} bytes")]
    TooLarge(u64),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// A dataset that passed the client-side checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvUpload {
    file_name: String,
    bytes: Vec<u8>,
}

impl CsvUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, UploadError> {
        let file_name = file_name.into();
        check_name(&file_name)?;
        check_size(bytes.len() as u64)?;
        Ok(Self { file_name, bytes })
    }

    /// Read a dataset from disk. The size is checked before the file is read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let io_err = |source| UploadError::Io {
            path: path.display().to_string(),
            source,
        };

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        check_name(&file_name)?;

        let metadata = tokio::fs::metadata(path).await.map_err(io_err)?;
        check_size(metadata.len())?;

        let bytes = tokio::fs::read(path).await.map_err(io_err)?;
        Self::new(file_name, bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn check_name(file_name: &str) -> Result<(), UploadError> {
    if file_name.ends_with(CSV_EXTENSION) {
        Ok(())
    } else {
        Err(UploadError::NotCsv(file_name.to_string()))
    }
}

fn check_size(len: u64) -> Result<(), UploadError> {
    if len < MAX_UPLOAD_BYTES {
        Ok(())
    } else {
        Err(UploadError::TooLarge(len))
    }
}

/// Upload a dataset and open its analysis; never runs twice concurrently.
pub struct UploadFlow {
    jobs: Arc<dyn JobsApi>,
    navigator: Arc<dyn Navigator>,
    guard: SequenceGuard,
}

impl UploadFlow {
    pub fn new(jobs: Arc<dyn JobsApi>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            jobs,
            navigator,
            guard: SequenceGuard::new(),
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.guard.is_running()
    }

    pub async fn submit(&self, upload: CsvUpload) -> LaunchOutcome {
        let Some(_ticket) = self.guard.try_acquire() else {
            tracing::info!(file_name = %upload.file_name, "Upload already in progress, ignoring request");
            return LaunchOutcome::AlreadyRunning;
        };

        settle("upload", self.run(upload).await, UPLOAD_FAILURE_MESSAGE)
    }

    async fn run(&self, upload: CsvUpload) -> Result<TaskId, ClientError> {
        let CsvUpload { file_name, bytes } = upload;
        let size = bytes.len();
        let receipt = self.jobs.upload_file(&file_name, bytes).await?;
        tracing::info!(file_name = %file_name, size, file_id = %receipt.file_id, "Dataset uploaded");
        analyze_and_navigate(self.jobs.as_ref(), self.navigator.as_ref(), receipt).await
    }
}
