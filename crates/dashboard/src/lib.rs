//! Headless controllers for the sentiment analysis dashboard.
//!
//! Each controller owns its state exclusively and publishes whole snapshots
//! through a [`tokio::sync::watch`] channel that a UI shell subscribes to.

pub mod demo;
pub mod launch;
pub mod navigator;
pub mod orchestrator;
pub mod reviews;
pub mod upload;

pub use demo::DemoLauncher;
pub use launch::{LaunchOutcome, SequenceGuard};
pub use navigator::Navigator;
pub use orchestrator::{LoadOutcome, ResultsOrchestrator, ResultsState};
pub use reviews::{FetchOutcome, ReviewController, ReviewListState};
pub use upload::{CsvUpload, UploadError, UploadFlow};
