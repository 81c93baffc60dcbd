//! Error handling for stream sessions.
//!
//! - **Error Categories**: High-level classification for handling decisions
//! - **Stream Errors**: Terminal failures of a session plus the caller-level
//!   conditions derived from what it delivered
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection failures, dropped streams | Yes |
//! | Server | Backend errors (5xx, `error` events) | Yes |
//! | Client | Programming errors | No |
//! | Configuration | Bad URL, unsupported transport | No |

mod category;
mod stream;

pub use category::ErrorCategory;
pub use stream::{StreamError, CONNECTION_LOST_MESSAGE};

/// Result alias for session operations.
pub type StreamResult<T> = Result<T, StreamError>;
