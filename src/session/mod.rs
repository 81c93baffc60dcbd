//! Stream sessions.
//!
//! A [`StreamSession`] opens one streaming request through an
//! [`HttpClient`](crate::traits::HttpClient), feeds the body through an
//! [`SseParser`](crate::sse::SseParser) and hands each event to a callback
//! until the stream ends, fails or is cancelled.
//!
//! ```text
//! Idle -> Opening -> Streaming -> Completed
//!            |           |-----> Cancelled
//!            |           `-----> Failed
//!            |-----------------> Cancelled / Failed
//! ```

pub mod decoder;
pub mod runner;
pub mod state;

pub use decoder::Utf8StreamDecoder;
pub use runner::{stream_events, SessionOutcome, SessionRequest, StreamSession};
pub use state::SessionState;
