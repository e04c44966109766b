use std::time::Duration;

/// Default backend base URL (the `/api` prefix is part of the base).
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Default upper bound on a single request, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a valid {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Backend client configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development against the
/// analysis backend on port 8000.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub api_url: String,
    /// Upper bound on a single request. Exceeding it fails the call on the
    /// client side only; server-side work is not aborted.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                           | Default                     |
    /// |-----------------------------------|-----------------------------|
    /// | `SENTISCOPE_API_URL`              | `http://localhost:8000/api` |
    /// | `SENTISCOPE_REQUEST_TIMEOUT_SECS` | `60`                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("SENTISCOPE_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let request_timeout_secs = match lookup("SENTISCOPE_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    var: "SENTISCOPE_REQUEST_TIMEOUT_SECS",
                    expected: "positive integer",
                    value: raw,
                })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}
