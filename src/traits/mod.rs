//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - Opening streaming HTTP requests

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError, StreamResponse};
