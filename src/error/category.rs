//! Error category classification.
//!
//! A coarse grouping used to pick a recovery hint and decide whether a
//! failed turn is worth retrying.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection problems, dropped streams, timeouts.
    /// Generally transient and retryable.
    Network,

    /// The agent backend rejected or failed the request.
    /// Generally transient and retryable after delay.
    Server,

    /// Client-side errors (invalid state, unserializable request).
    /// Not retryable - indicates a programming error.
    Client,

    /// Misconfiguration (bad base URL, unsupported transport).
    /// Not retryable until configuration is corrected.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient
    /// and the operation can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your connection and try again",
            ErrorCategory::Server => "The agent may be experiencing issues. Please try again later",
            ErrorCategory::Client => "This may be a bug. Please report this issue if it persists",
            ErrorCategory::Configuration => "Check the base URL and endpoint settings",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_retryable() {
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Server.is_retryable());
        assert!(!ErrorCategory::Client.is_retryable());
        assert!(!ErrorCategory::Configuration.is_retryable());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(format!("{}", ErrorCategory::Network), "network");
        assert_eq!(format!("{}", ErrorCategory::Configuration), "configuration");
    }

    #[test]
    fn test_category_recovery_hint() {
        assert!(ErrorCategory::Network.recovery_hint().contains("connection"));
        assert!(ErrorCategory::Server.recovery_hint().contains("try again"));
    }
}
