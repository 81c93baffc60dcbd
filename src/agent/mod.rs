//! Agent query turns.
//!
//! Interprets the agent backend's event kinds (`status`, `trace`, `answer`,
//! `done`, `error`) on top of the generic [`crate::sse`] layer, and decides
//! how a turn ended.

pub mod events;
pub mod monitor;
pub mod request;

pub use events::{AgentEvent, TraceStep, DEFAULT_ERROR_MESSAGE, DEFAULT_STATUS};
pub use monitor::{TurnMonitor, TurnOutcome, STOPPED_MESSAGE};
pub use request::{QueryRequest, QUERY_STREAM_ENDPOINT};
