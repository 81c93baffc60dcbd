//! Streaming-related error types.
//!
//! This module defines the terminal failure conditions of a stream session
//! and the caller-level conditions derived from the events it delivered.

use std::fmt;

use super::category::ErrorCategory;
use crate::traits::HttpError;

/// Message shown when a stream closes without a terminal event.
pub const CONNECTION_LOST_MESSAGE: &str = "Connection lost. Please retry.";

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// The request could not be sent or no response head arrived.
    Transport {
        source: HttpError,
    },

    /// The server answered the open request with a non-success status.
    OpenFailed {
        status: u16,
        message: String,
    },

    /// Success status, but nothing readable to stream from.
    StreamingUnsupported,

    /// The body failed mid-stream.
    ReadFailed {
        message: String,
    },

    /// The request body could not be serialized.
    InvalidRequest {
        message: String,
    },

    /// `run` called on a session that is not idle.
    AlreadyStarted,

    /// The stream closed normally without a `done` or `error` event.
    ConnectionLost,

    /// The agent reported an error via an `error` event.
    BackendError {
        message: String,
    },
}

impl StreamError {
    /// Build the open failure for a rejected request.
    ///
    /// Uses the response body when it has any text, otherwise a
    /// status-coded fallback.
    pub fn open_failed(status: u16, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            format!("Stream error: {}", status)
        } else {
            body.to_string()
        };
        StreamError::OpenFailed { status, message }
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            StreamError::Transport { source } => match source {
                HttpError::InvalidUrl(_) => ErrorCategory::Configuration,
                _ => ErrorCategory::Network,
            },
            StreamError::OpenFailed { status, .. } => {
                if *status >= 500 || *status == 429 || *status == 408 {
                    ErrorCategory::Server
                } else {
                    ErrorCategory::Configuration
                }
            }
            StreamError::StreamingUnsupported => ErrorCategory::Configuration,
            StreamError::ReadFailed { .. } | StreamError::ConnectionLost => ErrorCategory::Network,
            StreamError::InvalidRequest { .. } | StreamError::AlreadyStarted => {
                ErrorCategory::Client
            }
            StreamError::BackendError { .. } => ErrorCategory::Server,
        }
    }

    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::Transport { .. } => "Error: Could not reach agent.".to_string(),
            StreamError::OpenFailed { message, .. } => message.clone(),
            StreamError::StreamingUnsupported => {
                "Streaming is not supported by this transport.".to_string()
            }
            StreamError::ReadFailed { message } => {
                format!("The stream was interrupted: {}", message)
            }
            StreamError::InvalidRequest { message } => {
                format!("The request could not be encoded: {}", message)
            }
            StreamError::AlreadyStarted => "This stream session has already run.".to_string(),
            StreamError::ConnectionLost => CONNECTION_LOST_MESSAGE.to_string(),
            StreamError::BackendError { message } => message.clone(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Transport { .. } => "E_STREAM_TRANSPORT",
            StreamError::OpenFailed { .. } => "E_STREAM_OPEN",
            StreamError::StreamingUnsupported => "E_STREAM_UNSUPPORTED",
            StreamError::ReadFailed { .. } => "E_STREAM_READ",
            StreamError::InvalidRequest { .. } => "E_STREAM_REQUEST",
            StreamError::AlreadyStarted => "E_STREAM_STARTED",
            StreamError::ConnectionLost => "E_STREAM_CONN",
            StreamError::BackendError { .. } => "E_STREAM_BACKEND",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Transport { source } => write!(f, "Transport error: {}", source),
            StreamError::OpenFailed { status, message } => {
                write!(f, "Stream open failed ({}): {}", status, message)
            }
            StreamError::StreamingUnsupported => write!(f, "Streaming not supported"),
            StreamError::ReadFailed { message } => write!(f, "Stream read failed: {}", message),
            StreamError::InvalidRequest { message } => {
                write!(f, "Invalid request body: {}", message)
            }
            StreamError::AlreadyStarted => write!(f, "Stream session already started"),
            StreamError::ConnectionLost => {
                write!(f, "Stream ended without a terminal event")
            }
            StreamError::BackendError { message } => write!(f, "Backend error: {}", message),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Transport { source } => Some(source),
            _ => None,
        }
    }
}

impl From<HttpError> for StreamError {
    fn from(source: HttpError) -> Self {
        StreamError::Transport { source }
    }
}

impl From<serde_json::Error> for StreamError {
    fn from(e: serde_json::Error) -> Self {
        StreamError::InvalidRequest {
            message: e.to_string(),
        }
    }
}
