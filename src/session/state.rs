//! Session lifecycle states.

use std::fmt;

/// Where a [`StreamSession`](super::StreamSession) is in its lifecycle.
///
/// `Idle -> Opening -> Streaming -> {Completed, Cancelled, Failed}`.
/// `Opening` may also go straight to `Cancelled` or `Failed`. The three
/// terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Created, not yet run
    #[default]
    Idle,
    /// Request sent, waiting for the response head
    Opening,
    /// Reading chunks and dispatching events
    Streaming,
    /// The transport signalled end-of-stream
    Completed,
    /// The cancellation token fired
    Cancelled,
    /// Open or read failed
    Failed,
}

impl SessionState {
    /// Check whether this state is final.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Cancelled | SessionState::Failed
        )
    }

    /// Check whether moving to `next` is a legal step.
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Idle, Opening)
                | (Opening, Streaming)
                | (Opening, Cancelled)
                | (Opening, Failed)
                | (Streaming, Completed)
                | (Streaming, Cancelled)
                | (Streaming, Failed)
        )
    }

    /// Returns a short label suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Opening => "opening",
            SessionState::Streaming => "streaming",
            SessionState::Completed => "completed",
            SessionState::Cancelled => "cancelled",
            SessionState::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
