//! Drives one streaming request from open to a terminal state.

use bytes::Bytes;
use futures_util::StreamExt;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::decoder::Utf8StreamDecoder;
use super::state::SessionState;
use crate::config::ClientConfig;
use crate::error::{StreamError, StreamResult};
use crate::sse::{SseEvent, SseParser};
use crate::traits::{ByteStream, HttpClient, HttpError};

/// What to stream: a target, an optional body and an optional cancel token.
#[derive(Debug, Clone)]
pub struct SessionRequest {
    /// Endpoint path or absolute URL
    pub target: String,
    /// Serialized request body
    pub body: Option<String>,
    /// Cooperative cancellation signal
    pub cancel: Option<CancellationToken>,
}

impl SessionRequest {
    /// Create a request for a target with no body.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            body: None,
            cancel: None,
        }
    }

    /// Serialize `body` as the JSON request body.
    pub fn with_json<T: Serialize>(mut self, body: &T) -> StreamResult<Self> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self)
    }

    /// Use an already serialized request body.
    pub fn with_raw_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// How a session ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The transport signalled end-of-stream
    Completed { events: usize },
    /// The cancellation token fired; no error is reported
    Cancelled { events: usize },
}

impl SessionOutcome {
    /// Number of events handed to the callback.
    pub fn events_dispatched(&self) -> usize {
        match self {
            SessionOutcome::Completed { events } | SessionOutcome::Cancelled { events } => *events,
        }
    }

    /// Check whether the session was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SessionOutcome::Cancelled { .. })
    }
}

/// Owns a response body for the duration of the read loop.
///
/// Dropping it releases the body, whichever way the loop exits.
struct BodyReader<'a> {
    body: ByteStream,
    session_id: &'a str,
}

impl<'a> BodyReader<'a> {
    fn new(body: ByteStream, session_id: &'a str) -> Self {
        Self { body, session_id }
    }

    async fn next(&mut self) -> Option<Result<Bytes, HttpError>> {
        self.body.next().await
    }
}

impl Drop for BodyReader<'_> {
    fn drop(&mut self) {
        debug!(session_id = %self.session_id, "released response body");
    }
}

enum ReadStep {
    Chunk(Bytes),
    End,
    Cancelled,
    Failed(HttpError),
}

/// A single streaming request/response interaction.
///
/// Owns its own [`SseParser`]; events go to the caller's callback in the
/// order the parser produced them, before the next chunk is read.
///
/// # Example
///
/// ```ignore
/// use agent_stream::adapters::ReqwestHttpClient;
/// use agent_stream::config::ClientConfig;
/// use agent_stream::session::{SessionRequest, StreamSession};
///
/// let request = SessionRequest::new("/query/stream").with_json(&body)?;
/// let mut session = StreamSession::new(ReqwestHttpClient::new(), ClientConfig::from_env(), request);
/// let outcome = session.run(|event| println!("{}: {:?}", event.kind, event.payload)).await?;
/// ```
pub struct StreamSession<C> {
    id: String,
    client: C,
    config: ClientConfig,
    request: SessionRequest,
    parser: SseParser,
    state: SessionState,
}

impl<C: HttpClient> StreamSession<C> {
    /// Create an idle session.
    pub fn new(client: C, config: ClientConfig, request: SessionRequest) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client,
            config,
            request,
            parser: SseParser::new(),
            state: SessionState::Idle,
        }
    }

    /// Identifier used in log records for this session.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The absolute URL this session streams from.
    pub fn url(&self) -> String {
        self.config.resolve_url(&self.request.target)
    }

    /// Open the stream and dispatch every event to `on_event`.
    ///
    /// Resolves exactly once: `Ok(Completed)` at end-of-stream,
    /// `Ok(Cancelled)` when the token fires, `Err` when opening or reading
    /// fails. The callback is never invoked after that. A session can only
    /// run once.
    pub async fn run<F>(&mut self, mut on_event: F) -> StreamResult<SessionOutcome>
    where
        F: FnMut(SseEvent),
    {
        if self.state != SessionState::Idle {
            return Err(StreamError::AlreadyStarted);
        }

        let cancel = self.request.cancel.clone().unwrap_or_default();
        let url = self.url();

        self.transition(SessionState::Opening);
        info!(session_id = %self.id, %url, "opening stream");

        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.client.open_stream(&url, self.request.body.as_deref(), &self.config.headers) => Some(result),
        };

        let response = match opened {
            None | Some(Err(HttpError::Cancelled)) => return Ok(self.cancelled(0)),
            Some(Err(e)) => return Err(self.fail(e.into())),
            Some(Ok(response)) => response,
        };

        if !response.is_success() {
            let status = response.status;
            let body = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                text = response.into_text() => Some(text.unwrap_or_default()),
            };
            let Some(body) = body else {
                return Ok(self.cancelled(0));
            };
            return Err(self.fail(StreamError::open_failed(status, &body)));
        }

        let Some(body) = response.body else {
            return Err(self.fail(StreamError::StreamingUnsupported));
        };

        self.transition(SessionState::Streaming);

        let session_id = self.id.clone();
        let mut reader = BodyReader::new(body, &session_id);
        let mut decoder = Utf8StreamDecoder::new();
        let mut dispatched = 0usize;

        loop {
            let step = tokio::select! {
                biased;
                _ = cancel.cancelled() => ReadStep::Cancelled,
                chunk = reader.next() => match chunk {
                    Some(Ok(bytes)) => ReadStep::Chunk(bytes),
                    Some(Err(e)) => ReadStep::Failed(e),
                    None => ReadStep::End,
                },
            };

            match step {
                ReadStep::Chunk(bytes) => {
                    let text = decoder.decode(&bytes);
                    let events = self.parser.push(&text);
                    debug!(
                        session_id = %self.id,
                        bytes = bytes.len(),
                        events = events.len(),
                        "read chunk"
                    );

                    for event in events {
                        if cancel.is_cancelled() {
                            return Ok(self.cancelled(dispatched));
                        }
                        on_event(event);
                        dispatched += 1;
                    }
                }
                ReadStep::End => {
                    let pending = decoder.pending_len();
                    if !decoder.finish().is_empty() {
                        debug!(
                            session_id = %self.id,
                            bytes = pending,
                            "discarding incomplete trailing character"
                        );
                    }
                    return Ok(self.completed(dispatched));
                }
                ReadStep::Cancelled | ReadStep::Failed(HttpError::Cancelled) => {
                    return Ok(self.cancelled(dispatched));
                }
                ReadStep::Failed(e) => {
                    return Err(self.fail(StreamError::ReadFailed {
                        message: e.to_string(),
                    }));
                }
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal session transition {} -> {}",
            self.state,
            next
        );
        debug!(session_id = %self.id, from = %self.state, to = %next, "session state change");
        self.state = next;
    }

    fn completed(&mut self, events: usize) -> SessionOutcome {
        if !self.parser.is_empty() {
            debug!(
                session_id = %self.id,
                bytes = self.parser.buffered().len(),
                "stream ended with an unterminated frame"
            );
        }
        self.parser.reset();
        self.transition(SessionState::Completed);
        info!(session_id = %self.id, events, "stream completed");
        SessionOutcome::Completed { events }
    }

    fn cancelled(&mut self, events: usize) -> SessionOutcome {
        self.parser.reset();
        self.transition(SessionState::Cancelled);
        info!(session_id = %self.id, events, "stream cancelled");
        SessionOutcome::Cancelled { events }
    }

    fn fail(&mut self, error: StreamError) -> StreamError {
        self.parser.reset();
        self.transition(SessionState::Failed);
        warn!(
            session_id = %self.id,
            code = error.error_code(),
            error = %error,
            "stream failed"
        );
        error
    }
}

/// Run a one-off session: open `request` with `client` and dispatch events.
pub async fn stream_events<C, F>(
    client: C,
    config: ClientConfig,
    request: SessionRequest,
    on_event: F,
) -> StreamResult<SessionOutcome>
where
    C: HttpClient,
    F: FnMut(SseEvent),
{
    StreamSession::new(client, config, request).run(on_event).await
}
