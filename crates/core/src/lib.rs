//! Domain types and view-model derivation for the SentiScope results
//! dashboard.
//!
//! This crate performs no I/O. It describes the payloads produced by the
//! sentiment-analysis backend ([`bundle::ResultBundle`],
//! [`review::ReviewPage`]) and turns them into render-ready view-models
//! ([`charts::ChartView`], [`dashboard::Dashboard`]) that degrade to an
//! explicit empty state whenever a sub-result is missing.

pub mod bundle;
pub mod charts;
pub mod dashboard;
pub mod error;
pub mod review;
pub mod routes;
pub mod statistics;
pub mod types;

pub use error::CoreError;
