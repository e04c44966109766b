//! Results orchestrator: the top-level state machine of the analysis page.
//!
//! ```text
//!   Idle ──open(A)──▶ Loading(A) ──ok──▶ Success(A) ──refresh──▶ Loading(A)
//!                        │                   │
//!                        └──err──▶ Failed(A) ┘──open(B)──▶ Loading(B)
//!                                     │
//!                                  retry ──▶ Loading(A)
//!
//!   any state ──go_back──▶ Idle
//! ```
//!
//! Every entry into `Loading` bumps an epoch and performs exactly one bundle
//! fetch. A response is applied only if the epoch it was issued under is
//! still current, so data from a previous task can never reach the new one.
//! `Loading` doubles as the in-flight guard: a second request for the task
//! being loaded is rejected without a fetch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use sentiscope_client::ResultsApi;
use sentiscope_core::bundle::ResultBundle;
use sentiscope_core::dashboard::Dashboard;
use sentiscope_core::routes::Route;
use sentiscope_core::types::TaskId;

use crate::navigator::Navigator;
use crate::reviews::ReviewController;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub enum ResultsState {
    /// No task has been opened yet.
    #[default]
    Idle,
    Loading {
        task_id: TaskId,
    },
    Success {
        task_id: TaskId,
        bundle: Arc<ResultBundle>,
        dashboard: Arc<Dashboard>,
        /// Fresh for every successful load, starting on page 1.
        reviews: Arc<ReviewController>,
    },
    Failed {
        task_id: TaskId,
        message: String,
    },
}

impl ResultsState {
    pub fn task_id(&self) -> Option<&TaskId> {
        match self {
            Self::Idle => None,
            Self::Loading { task_id }
            | Self::Success { task_id, .. }
            | Self::Failed { task_id, .. } => Some(task_id),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn dashboard(&self) -> Option<&Arc<Dashboard>> {
        match self {
            Self::Success { dashboard, .. } => Some(dashboard),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Success { .. } => "success",
            Self::Failed { .. } => "failed",
        }
    }
}

/// What happened to one request to (re)load a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed(String),
    /// The same task is already being loaded; no fetch was issued.
    AlreadyLoading,
    /// Another load began while this one was in flight; its response was
    /// discarded.
    Superseded,
    /// The request did not apply to the current state (e.g. retry outside
    /// `Failed`, or opening the task already shown).
    Ignored,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct ResultsOrchestrator {
    api: Arc<dyn ResultsApi>,
    navigator: Arc<dyn Navigator>,
    epoch: AtomicU64,
    state: watch::Sender<ResultsState>,
}

impl ResultsOrchestrator {
    pub fn new(api: Arc<dyn ResultsApi>, navigator: Arc<dyn Navigator>) -> Self {
        let (state, _) = watch::channel(ResultsState::Idle);
        Self {
            api,
            navigator,
            epoch: AtomicU64::new(0),
            state,
        }
    }

    pub fn state(&self) -> ResultsState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResultsState> {
        self.state.subscribe()
    }

    /// The review list of the loaded task. Only available in `Success`.
    pub fn reviews(&self) -> Option<Arc<ReviewController>> {
        match &*self.state.borrow() {
            ResultsState::Success { reviews, .. } => Some(Arc::clone(reviews)),
            _ => None,
        }
    }

    /// Show a task. A different task resets all state and loads it.
    pub async fn open(&self, target: TaskId) -> LoadOutcome {
        self.transition(move |state| match state {
            ResultsState::Loading { task_id } if *task_id == target => {
                Err(LoadOutcome::AlreadyLoading)
            }
            ResultsState::Success { task_id, .. } | ResultsState::Failed { task_id, .. }
                if *task_id == target =>
            {
                Err(LoadOutcome::Ignored)
            }
            _ => Ok(target),
        })
        .await
    }

    /// Reload the task that failed.
    pub async fn retry(&self) -> LoadOutcome {
        self.transition(|state| match state {
            ResultsState::Failed { task_id, .. } => Ok(task_id.clone()),
            ResultsState::Loading { .. } => Err(LoadOutcome::AlreadyLoading),
            _ => Err(LoadOutcome::Ignored),
        })
        .await
    }

    /// Reload the task currently shown.
    pub async fn refresh(&self) -> LoadOutcome {
        self.transition(|state| match state {
            ResultsState::Success { task_id, .. } | ResultsState::Failed { task_id, .. } => {
                Ok(task_id.clone())
            }
            ResultsState::Loading { .. } => Err(LoadOutcome::AlreadyLoading),
            ResultsState::Idle => Err(LoadOutcome::Ignored),
        })
        .await
    }

    /// Leave the results page. The shown task is dropped and any load still
    /// in flight is superseded, so the next `open` always fetches.
    pub fn go_back(&self) {
        self.state.send_modify(|state| {
            self.epoch.fetch_add(1, Ordering::AcqRel);
            *state = ResultsState::Idle;
        });
        self.navigator.navigate(Route::upload());
    }

    // ---- private helpers ----

    /// Decide under the channel lock whether to enter `Loading`, then fetch.
    async fn transition(
        &self,
        decide: impl FnOnce(&ResultsState) -> Result<TaskId, LoadOutcome>,
    ) -> LoadOutcome {
        let mut decision = Err(LoadOutcome::Ignored);
        let mut epoch = 0;

        self.state.send_if_modified(|state| {
            decision = decide(state);
            let Ok(task_id) = &decision else {
                return false;
            };
            epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
            *state = ResultsState::Loading {
                task_id: task_id.clone(),
            };
            true
        });

        match decision {
            Ok(task_id) => self.load(epoch, task_id).await,
            Err(outcome) => {
                if outcome == LoadOutcome::AlreadyLoading {
                    tracing::info!("Bundle already loading, ignoring request");
                }
                outcome
            }
        }
    }

    async fn load(&self, epoch: u64, task_id: TaskId) -> LoadOutcome {
        tracing::info!(task_id = %task_id, epoch, "Loading result bundle");
        let result = self.api.fetch_result_bundle(&task_id).await;

        let mut outcome = LoadOutcome::Superseded;
        self.state.send_if_modified(|state| {
            if self.epoch.load(Ordering::Acquire) != epoch {
                return false;
            }
            *state = match &result {
                Ok(bundle) => {
                    outcome = LoadOutcome::Loaded;
                    ResultsState::Success {
                        task_id: task_id.clone(),
                        dashboard: Arc::new(Dashboard::from_bundle(bundle)),
                        bundle: Arc::new(bundle.clone()),
                        reviews: Arc::new(ReviewController::new(
                            Arc::clone(&self.api),
                            task_id.clone(),
                        )),
                    }
                }
                Err(e) => {
                    let message = e.user_message();
                    outcome = LoadOutcome::Failed(message.clone());
                    ResultsState::Failed {
                        task_id: task_id.clone(),
                        message,
                    }
                }
            };
            true
        });

        match (&outcome, &result) {
            (LoadOutcome::Loaded, _) => {
                tracing::info!(task_id = %task_id, "Result bundle loaded");
            }
            (LoadOutcome::Failed(_), Err(e)) => {
                tracing::warn!(task_id = %task_id, error = %e, "Failed to load result bundle");
            }
            _ => {
                tracing::debug!(task_id = %task_id, epoch, "Discarding superseded result bundle");
            }
        }
        outcome
    }
}
