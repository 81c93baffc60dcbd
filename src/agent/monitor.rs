//! Per-turn bookkeeping.
//!
//! A [`TurnMonitor`] watches the events of one query turn and, once the
//! session has resolved, decides how the turn ended. An explicit `error`
//! event wins over everything, then `done`, then the session's own outcome.

use tracing::debug;

use super::events::{AgentEvent, TraceStep};
use crate::error::{StreamError, StreamResult, CONNECTION_LOST_MESSAGE};
use crate::session::SessionOutcome;
use crate::sse::SseEvent;

/// Shown when the user stops a turn.
pub const STOPPED_MESSAGE: &str = "Stopped by user.";

/// How a query turn ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The agent sent `done`
    Completed {
        answer: Option<String>,
        session_id: Option<String>,
    },
    /// The user cancelled before a terminal event
    Stopped,
    /// The stream closed cleanly without `done` or `error`
    ConnectionLost,
    /// The agent sent `error`, or the session failed
    Failed { message: String },
}

impl TurnOutcome {
    /// Text to show in place of the answer, if the turn did not complete.
    pub fn message(&self) -> Option<&str> {
        match self {
            TurnOutcome::Completed { .. } => None,
            TurnOutcome::Stopped => Some(STOPPED_MESSAGE),
            TurnOutcome::ConnectionLost => Some(CONNECTION_LOST_MESSAGE),
            TurnOutcome::Failed { message } => Some(message),
        }
    }

    /// Failed and lost turns are errors; stopping is not.
    pub fn is_error(&self) -> bool {
        matches!(self, TurnOutcome::ConnectionLost | TurnOutcome::Failed { .. })
    }

    /// The caller-level error for a turn that did not complete, if any.
    pub fn to_error(&self) -> Option<StreamError> {
        match self {
            TurnOutcome::ConnectionLost => Some(StreamError::ConnectionLost),
            TurnOutcome::Failed { message } => Some(StreamError::BackendError {
                message: message.clone(),
            }),
            _ => None,
        }
    }

    /// The continuation id reported by `done`.
    pub fn session_id(&self) -> Option<&str> {
        match self {
            TurnOutcome::Completed { session_id, .. } => session_id.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Terminal {
    Done { session_id: Option<String> },
    Error { message: String },
}

/// Tracks one turn's status, trace, answer and terminal event.
#[derive(Debug, Default)]
pub struct TurnMonitor {
    status: Option<String>,
    trace: Vec<TraceStep>,
    answer: Option<String>,
    terminal: Option<Terminal>,
    ignored: usize,
}

impl TurnMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event.
    ///
    /// Returns the interpreted event, or `None` when a terminal event was
    /// already seen and this one is ignored.
    pub fn observe(&mut self, event: &SseEvent) -> Option<AgentEvent> {
        if self.terminal.is_some() {
            self.ignored += 1;
            debug!(kind = %event.kind, "ignoring event after terminal event");
            return None;
        }

        let interpreted = AgentEvent::from_sse(event);
        match &interpreted {
            AgentEvent::Status { message } => self.status = Some(message.clone()),
            AgentEvent::Trace(step) => self.trace.push(step.clone()),
            AgentEvent::Answer { text: Some(text) } => self.answer = Some(text.clone()),
            AgentEvent::Answer { text: None } | AgentEvent::Other(_) => {}
            AgentEvent::Done { session_id } => {
                self.status = None;
                self.terminal = Some(Terminal::Done {
                    session_id: session_id.clone(),
                });
            }
            AgentEvent::Error { message } => {
                self.status = None;
                self.terminal = Some(Terminal::Error {
                    message: message.clone(),
                });
            }
        }
        Some(interpreted)
    }

    /// Latest status text, cleared once the turn reaches a terminal event.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn trace(&self) -> &[TraceStep] {
        &self.trace
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    /// Whether `done` or `error` has been observed.
    pub fn saw_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    /// Events dropped because they arrived after the terminal event.
    pub fn ignored_events(&self) -> usize {
        self.ignored
    }

    /// Combine what was observed with how the session resolved.
    pub fn finish(self, result: StreamResult<SessionOutcome>) -> TurnOutcome {
        match (self.terminal, result) {
            (Some(Terminal::Error { message }), _) => TurnOutcome::Failed { message },
            (Some(Terminal::Done { session_id }), _) => TurnOutcome::Completed {
                answer: self.answer,
                session_id,
            },
            (None, Ok(SessionOutcome::Cancelled { .. })) => TurnOutcome::Stopped,
            (None, Ok(SessionOutcome::Completed { .. })) => TurnOutcome::ConnectionLost,
            (None, Err(e)) => TurnOutcome::Failed {
                message: e.user_message(),
            },
        }
    }
}
