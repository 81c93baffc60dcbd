//! Mock HTTP client for testing.
//!
//! Provides a scripted transport that returns predefined responses, replays
//! body chunks one read at a time and records every request it receives.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use futures_util::StreamExt;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, StreamResponse};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body
    pub body: Option<String>,
}

/// One scripted read from a mock body.
#[derive(Debug, Clone)]
pub enum MockChunk {
    /// Deliver these bytes
    Bytes(Bytes),
    /// Fail the read
    Error(HttpError),
    /// Never complete the read
    Hang,
}

impl MockChunk {
    /// Deliver UTF-8 text as one chunk.
    pub fn text(text: &str) -> Self {
        MockChunk::Bytes(Bytes::copy_from_slice(text.as_bytes()))
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Respond with a status and a body delivered chunk by chunk
    Stream { status: u16, chunks: Vec<MockChunk> },
    /// Respond with a status and no readable body
    NoBody { status: u16 },
    /// Fail before a response head arrives
    Error(HttpError),
}

impl MockResponse {
    /// Respond with a status and scripted body chunks.
    pub fn stream(status: u16, chunks: Vec<MockChunk>) -> Self {
        MockResponse::Stream { status, chunks }
    }

    /// Respond 200 with an SSE body split into the given text chunks.
    pub fn sse(chunks: &[&str]) -> Self {
        MockResponse::Stream {
            status: 200,
            chunks: chunks.iter().map(|c| MockChunk::text(c)).collect(),
        }
    }
}

/// Body stream that counts itself released when dropped.
struct TrackedBody {
    inner: ByteStream,
    released: Arc<AtomicUsize>,
}

impl Stream for TrackedBody {
    type Item = Result<Bytes, HttpError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl Drop for TrackedBody {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Mock HTTP client for testing.
///
/// Clones share configuration, recorded requests and body counters.
///
/// # Example
///
/// ```ignore
/// use agent_stream::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://localhost:8000/query/stream",
///     MockResponse::sse(&["event: answer\ndata: {\"answer\":\"hi\"}\n\n"]),
/// );
///
/// // ... run a session with client.clone() ...
///
/// assert_eq!(client.get_requests().len(), 1);
/// assert!(client.body_released());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Configured responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    bodies_opened: Arc<AtomicUsize>,
    bodies_released: Arc<AtomicUsize>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a specific URL.
    ///
    /// The URL is matched exactly first, then as a prefix.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        lock(&self.responses).insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    /// Number of response bodies handed out.
    pub fn bodies_opened(&self) -> usize {
        self.bodies_opened.load(Ordering::SeqCst)
    }

    /// Check that at least one body was handed out and every one was dropped.
    pub fn body_released(&self) -> bool {
        let opened = self.bodies_opened();
        opened > 0 && self.bodies_released.load(Ordering::SeqCst) == opened
    }

    fn record_request(&self, url: &str, headers: &Headers, body: Option<&str>) {
        lock(&self.requests).push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
            body: body.map(str::to_string),
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = lock(&self.responses);

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }

        lock(&self.default_response).clone()
    }

    fn body_from(&self, chunks: Vec<MockChunk>) -> ByteStream {
        let reads = futures::stream::iter(chunks).then(|chunk| async move {
            match chunk {
                MockChunk::Bytes(bytes) => Ok(bytes),
                MockChunk::Error(err) => Err(err),
                MockChunk::Hang => futures::future::pending().await,
            }
        });

        self.bodies_opened.fetch_add(1, Ordering::SeqCst);
        Box::pin(TrackedBody {
            inner: Box::pin(reads),
            released: Arc::clone(&self.bodies_released),
        })
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn open_stream(
        &self,
        url: &str,
        body: Option<&str>,
        headers: &Headers,
    ) -> Result<StreamResponse, HttpError> {
        self.record_request(url, headers, body);

        match self.get_response(url) {
            Some(MockResponse::Stream { status, chunks }) => {
                Ok(StreamResponse::new(status, self.body_from(chunks)))
            }
            Some(MockResponse::NoBody { status }) => Ok(StreamResponse::without_body(status)),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}
