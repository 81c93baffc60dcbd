//! Client configuration.
//!
//! Resolves stream targets against a base URL and carries the headers sent
//! with every streaming request.

use std::time::Duration;

use crate::traits::Headers;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable that overrides [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "AGENT_STREAM_BASE_URL";

/// Connect timeout used by the console front-end.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for opening stream sessions.
///
/// Use the builder methods to customize.
///
/// # Example
///
/// ```ignore
/// use agent_stream::config::ClientConfig;
///
/// let config = ClientConfig::from_env()
///     .with_header("Authorization", "Bearer token")
///     .with_connect_timeout(std::time::Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL that relative targets are appended to
    pub base_url: String,
    /// Headers sent with every request
    pub headers: Headers,
    /// Bound on establishing the connection; `None` leaves the transport default
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headers,
            connect_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config honoring `AGENT_STREAM_BASE_URL`.
    ///
    /// An empty value is treated as unset.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::default().with_base_url(url.trim()),
            _ => Self::default(),
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Add or replace a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Turn a target into an absolute URL.
    ///
    /// Targets starting with `http` are used verbatim; anything else is an
    /// endpoint path joined to the base URL.
    pub fn resolve_url(&self, target: &str) -> String {
        if target.starts_with("http") {
            return target.to_string();
        }

        let base = self.base_url.trim_end_matches('/');
        if target.is_empty() {
            base.to_string()
        } else if target.starts_with('/') {
            format!("{}{}", base, target)
        } else {
            format!("{}/{}", base, target)
        }
    }
}
