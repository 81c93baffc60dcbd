//! HTTP client trait abstraction.
//!
//! Provides a trait-based abstraction for opening streaming requests,
//! enabling dependency injection and mocking in tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use futures_util::StreamExt;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// Incrementally delivered response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// An opened streaming response.
///
/// The body is `None` when the transport has nothing readable to offer
/// (e.g. a 204 response).
pub struct StreamResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body, read chunk by chunk
    pub body: Option<ByteStream>,
}

impl StreamResponse {
    /// Create a response with a body stream.
    pub fn new(status: u16, body: ByteStream) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Some(body),
        }
    }

    /// Create a response without a readable body.
    pub fn without_body(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Attach response headers.
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Drain the whole body into a string.
    ///
    /// Used for error responses, where the body is a short explanation
    /// rather than an event stream. Invalid UTF-8 is replaced.
    pub async fn into_text(self) -> Result<String, HttpError> {
        let Some(mut body) = self.body else {
            return Ok(String::new());
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = body.next().await {
            bytes.extend_from_slice(&chunk?);
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl std::fmt::Debug for StreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &self.body.as_ref().map(|_| "<stream>"))
            .finish()
    }
}

/// HTTP client errors.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// Connection failed
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// Server returned an error status
    ServerError { status: u16, message: String },
    /// Request was cancelled
    Cancelled,
    /// IO error
    Io(String),
    /// Invalid URL
    InvalidUrl(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::ServerError { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            HttpError::Cancelled => write!(f, "Request cancelled"),
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for the transport underneath a stream session.
///
/// Implementations include the production reqwest-based client and a
/// scripted mock for tests.
///
/// # Example
///
/// ```ignore
/// use agent_stream::traits::{HttpClient, Headers};
///
/// async fn status_of<C: HttpClient>(client: &C) -> u16 {
///     match client.open_stream("http://localhost:8000/query/stream", None, &Headers::new()).await {
///         Ok(response) => response.status,
///         Err(_) => 0,
///     }
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a POST request and return as soon as the response head arrives.
    ///
    /// A non-success status is not an error at this layer; the caller
    /// inspects [`StreamResponse::status`]. Errors mean the request could
    /// not be sent or no response head was received.
    ///
    /// # Arguments
    /// * `url` - The URL to request
    /// * `body` - Serialized request body, if any
    /// * `headers` - Request headers
    async fn open_stream(
        &self,
        url: &str,
        body: Option<&str>,
        headers: &Headers,
    ) -> Result<StreamResponse, HttpError>;
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    async fn open_stream(
        &self,
        url: &str,
        body: Option<&str>,
        headers: &Headers,
    ) -> Result<StreamResponse, HttpError> {
        (**self).open_stream(url, body, headers).await
    }
}
