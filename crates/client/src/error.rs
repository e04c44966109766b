//! Client error taxonomy and message normalization.

use std::time::Duration;

use serde::Deserialize;

/// Shown when a failure carries no usable message at all.
pub const GENERIC_FAILURE_MESSAGE: &str = "Request failed";

/// Errors from the backend REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No response was received (network, DNS, TLS, connection reset).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The configured upper bound elapsed before a response arrived.
    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The backend answered with a non-2xx status.
    #[error("Backend error ({status}): {}", .detail.as_deref().unwrap_or("<no detail>"))]
    Service {
        /// HTTP status code.
        status: u16,
        /// Server-supplied human-readable reason, from the `detail` field.
        detail: Option<String>,
    },

    /// A 2xx response whose body did not match the expected shape.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ClientError {
    /// Classify a transport-level [`reqwest::Error`].
    pub fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err)
        }
    }

    /// The single message surfaced to the user for this failure.
    ///
    /// A server-supplied `detail` is returned verbatim. Otherwise the
    /// transport's own description is used.
    pub fn user_message(&self) -> String {
        match self {
            Self::Service {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            Self::Service { status, .. } => format!("Request failed with status code {status}"),
            Self::Request(err) => {
                let message = err.to_string();
                if message.is_empty() {
                    GENERIC_FAILURE_MESSAGE.to_string()
                } else {
                    message
                }
            }
            Self::Timeout(timeout) => format!("Request timed out after {}s", timeout.as_secs()),
            Self::Decode(msg) => format!("Invalid response from server: {msg}"),
        }
    }

    /// HTTP status of a service error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error envelope of a non-2xx response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Extract the `detail` string from an error body, if it has one.
///
/// Structured details (e.g. validation error arrays) are not surfaced.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(detail) => Some(detail),
        _ => None,
    }
}
