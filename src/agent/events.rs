//! Agent event interpretation.
//!
//! The agent backend emits five event kinds on its query stream. This module
//! maps a decoded [`SseEvent`] onto the variant the console cares about,
//! falling back to defaults when a payload field is missing, empty or not
//! JSON at all.

use serde::Serialize;
use serde_json::Value;

use crate::sse::SseEvent;

pub const STATUS_EVENT: &str = "status";
pub const TRACE_EVENT: &str = "trace";
pub const ANSWER_EVENT: &str = "answer";
pub const DONE_EVENT: &str = "done";
pub const ERROR_EVENT: &str = "error";

/// Status text shown when a `status` event names neither a message nor a stage.
pub const DEFAULT_STATUS: &str = "Working...";

/// Error text shown when an `error` event carries no message.
pub const DEFAULT_ERROR_MESSAGE: &str = "Error: Could not reach agent.";

/// One step of the agent's reasoning trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceStep {
    /// Step label
    pub step: String,
    /// What the agent was thinking
    pub thought: String,
    /// Tool invoked in this step, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// Tool result, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
}

/// An interpreted agent event.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// Progress indicator
    Status { message: String },
    /// Reasoning step
    Trace(TraceStep),
    /// Answer text; `None` keeps whatever answer was shown before
    Answer { text: Option<String> },
    /// Turn finished; carries the id to continue the conversation with
    Done { session_id: Option<String> },
    /// Backend reported a failure
    Error { message: String },
    /// Unrecognized kind, passed through untouched
    Other(SseEvent),
}

impl AgentEvent {
    /// Interpret a decoded stream event.
    pub fn from_sse(event: &SseEvent) -> Self {
        let text = |key: &str| non_empty(event.payload.str_field(key));

        match event.kind.as_str() {
            STATUS_EVENT => AgentEvent::Status {
                message: text("message")
                    .or_else(|| text("stage"))
                    .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            },
            TRACE_EVENT => AgentEvent::Trace(TraceStep {
                step: text("step").unwrap_or_else(|| "Trace".to_string()),
                thought: text("thought").unwrap_or_default(),
                tool: display_field(event, "tool"),
                observation: display_field(event, "observation"),
            }),
            ANSWER_EVENT => AgentEvent::Answer {
                text: text("answer"),
            },
            DONE_EVENT => AgentEvent::Done {
                session_id: text("session_id"),
            },
            ERROR_EVENT => AgentEvent::Error {
                message: text("message").unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
            },
            _ => AgentEvent::Other(event.clone()),
        }
    }

    /// `done` and `error` end a turn.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentEvent::Done { .. } | AgentEvent::Error { .. })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

/// A string field verbatim, any other non-null JSON value rendered compactly.
fn display_field(event: &SseEvent, key: &str) -> Option<String> {
    match event.payload.as_json()?.get(key)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
