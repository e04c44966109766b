//! HTTP client for the sentiment-analysis backend.
//!
//! [`SentimentApi`] wraps the five REST endpoints the dashboard consumes and
//! implements the [`ResultsApi`] and [`JobsApi`] seams that the controllers
//! are written against. Every failure is reported as a [`ClientError`] whose
//! [`user_message`](ClientError::user_message) is the single string shown to
//! the user.

pub mod api;
pub mod config;
pub mod error;
pub mod service;

pub use api::SentimentApi;
pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
pub use service::{AnalysisTicket, JobsApi, ResultsApi, UploadReceipt};
