//! Common test utilities for integration tests.
//!
//! Fixtures for SSE bodies and helpers for running sessions to completion.

#![allow(dead_code)]

use agent_stream::config::ClientConfig;
use agent_stream::error::StreamResult;
use agent_stream::session::{stream_events, SessionOutcome, SessionRequest};
use agent_stream::sse::SseEvent;
use agent_stream::traits::HttpClient;
use serde_json::{json, Value};

/// Render one frame in wire format.
pub fn sse_frame(kind: &str, data: &Value) -> String {
    format!("event: {}\ndata: {}\n\n", kind, data)
}

/// A complete agent turn: status, trace, answer, done.
pub fn agent_transcript() -> String {
    [
        sse_frame("status", &json!({"message": "Searching the graph"})),
        sse_frame(
            "trace",
            &json!({"step": "Action", "thought": "look up tokio", "tool": "graph_search"}),
        ),
        sse_frame("answer", &json!({"answer": "Tokio is an async runtime. ✓ café"})),
        sse_frame("done", &json!({"session_id": "sess-1"})),
    ]
    .concat()
}

/// Kinds of the events in [`agent_transcript`], in order.
pub fn agent_transcript_kinds() -> Vec<&'static str> {
    vec!["status", "trace", "answer", "done"]
}

/// Run a session to completion and collect its events.
pub async fn collect_events<C: HttpClient>(
    client: C,
    config: ClientConfig,
    request: SessionRequest,
) -> (StreamResult<SessionOutcome>, Vec<SseEvent>) {
    let mut events = Vec::new();
    let result = stream_events(client, config, request, |event| events.push(event)).await;
    (result, events)
}

/// Event kinds, for compact assertions.
pub fn kinds(events: &[SseEvent]) -> Vec<&str> {
    events.iter().map(|e| e.kind.as_str()).collect()
}
