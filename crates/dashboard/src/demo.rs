use std::sync::Arc;

use sentiscope_client::{ClientError, JobsApi};
use sentiscope_core::routes::Route;
use sentiscope_core::types::TaskId;

use crate::launch::{analyze_and_navigate, settle, LaunchOutcome, SequenceGuard};
use crate::navigator::Navigator;

/// Shown when the demo sequence fails without a more specific message.
pub const DEMO_FAILURE_MESSAGE: &str =
    "Failed to load the demo dataset, please upload a file manually";

/// Quick-start path: load the sample dataset, analyze it, open the results.
pub struct DemoLauncher {
    jobs: Arc<dyn JobsApi>,
    navigator: Arc<dyn Navigator>,
    guard: SequenceGuard,
}

impl DemoLauncher {
    pub fn new(jobs: Arc<dyn JobsApi>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            jobs,
            navigator,
            guard: SequenceGuard::new(),
        }
    }

    /// Whether a demo sequence is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.guard.is_running()
    }

    /// Run the demo sequence unless one is already running.
    ///
    /// A rejected call sends nothing to the backend and does not navigate.
    pub async fn launch(&self) -> LaunchOutcome {
        let Some(_ticket) = self.guard.try_acquire() else {
            tracing::info!("Demo load already in progress, ignoring request");
            return LaunchOutcome::AlreadyRunning;
        };

        settle("demo", self.run().await, DEMO_FAILURE_MESSAGE)
    }

    /// React to a route arriving at the upload page.
    ///
    /// Returns `None` unless the route asks for the demo to auto-load.
    pub async fn handle_route(&self, route: &Route) -> Option<LaunchOutcome> {
        match route {
            Route::Upload {
                auto_load_demo: true,
            } => Some(self.launch().await),
            _ => None,
        }
    }

    async fn run(&self) -> Result<TaskId, ClientError> {
        let receipt = self.jobs.load_demo_dataset().await?;
        tracing::info!(file_id = %receipt.file_id, "Demo dataset loaded");
        analyze_and_navigate(self.jobs.as_ref(), self.navigator.as_ref(), receipt).await
    }
}
