//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - Scripted streaming transport with request recording

pub mod http;

pub use http::{MockChunk, MockHttpClient, MockResponse, RecordedRequest};
