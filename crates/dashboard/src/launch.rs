//! Shared plumbing for the two ways of starting an analysis job: uploading a
//! file and loading the bundled demo dataset.
//!
//! Both are multi-step sequences (provision a file, start the analysis,
//! navigate to its results) that must never run twice at the same time.
//! [`SequenceGuard`] is the in-flight flag; it is checked and set in one
//! atomic step and cleared when the sequence finishes, whatever the outcome.

use std::sync::atomic::{AtomicBool, Ordering};

use sentiscope_client::{ClientError, JobsApi, UploadReceipt};
use sentiscope_core::routes::Route;
use sentiscope_core::types::TaskId;

use crate::navigator::Navigator;

// ---------------------------------------------------------------------------
// SequenceGuard
// ---------------------------------------------------------------------------

/// In-flight flag for one guarded action sequence.
#[derive(Debug, Default)]
pub struct SequenceGuard {
    running: AtomicBool,
}

impl SequenceGuard {
    pub const fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
        }
    }

    /// Claim the guard, or return `None` if a sequence is already running.
    ///
    /// The guard is released when the returned ticket is dropped.
    pub fn try_acquire(&self) -> Option<GuardTicket<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GuardTicket { guard: self })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Proof that the holder owns a [`SequenceGuard`].
#[derive(Debug)]
pub struct GuardTicket<'a> {
    guard: &'a SequenceGuard,
}

impl Drop for GuardTicket<'_> {
    fn drop(&mut self) {
        self.guard.running.store(false, Ordering::Release);
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of one attempt to start an analysis job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The job was started and the shell was sent to its results page.
    Started(TaskId),
    /// Another sequence held the guard; nothing was sent to the backend.
    AlreadyRunning,
    /// A step failed. Carries the message to show the user.
    Failed(String),
}

/// Start analysis of a provisioned file and navigate to its results.
pub(crate) async fn analyze_and_navigate(
    jobs: &dyn JobsApi,
    navigator: &dyn Navigator,
    receipt: UploadReceipt,
) -> Result<TaskId, ClientError> {
    let ticket = jobs.start_analysis(&receipt.file_id).await?;
    tracing::info!(
        file_id = %receipt.file_id,
        task_id = %ticket.task_id,
        status = ticket.status.as_str(),
        "Analysis job started",
    );
    navigator.navigate(Route::analysis(ticket.task_id.clone()));
    Ok(ticket.task_id)
}

/// Fold a finished sequence into a [`LaunchOutcome`], logging failures.
pub(crate) fn settle(
    sequence: &'static str,
    result: Result<TaskId, ClientError>,
    fallback: &str,
) -> LaunchOutcome {
    match result {
        Ok(task_id) => LaunchOutcome::Started(task_id),
        Err(e) => {
            tracing::warn!(sequence, error = %e, "Launch sequence failed");
            let message = e.user_message();
            if message.trim().is_empty() {
                LaunchOutcome::Failed(fallback.to_string())
            } else {
                LaunchOutcome::Failed(message)
            }
        }
    }
}
