//! Line-based rendering of agent turns.

use std::io::{self, Write};
use std::time::Duration;

use crate::agent::{AgentEvent, TraceStep, TurnOutcome};
use crate::sse::SseEvent;

/// Line width for separators.
const LINE_WIDTH: usize = 60;

/// Status icons
pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const FAILURE: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const STATUS: &str = "…";
    pub const TRACE: &str = "•";
}

/// Format elapsed milliseconds as `m:ss`.
///
/// ```
/// use agent_stream::cli_output::format_elapsed;
///
/// assert_eq!(format_elapsed(0), "0:00");
/// assert_eq!(format_elapsed(65_000), "1:05");
/// ```
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let total_seconds = elapsed_ms / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Same as [`format_elapsed`] for a [`Duration`].
pub fn format_duration(elapsed: Duration) -> String {
    format_elapsed(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

/// Print one interpreted event as it arrives.
///
/// ```text
///   … Searching the graph
///   • Action: look up the node
///       tool: graph_search
/// ```
///
/// Answers are held back until the turn ends; unknown kinds are skipped.
pub fn render_event<W: Write>(out: &mut W, event: &AgentEvent) -> io::Result<()> {
    match event {
        AgentEvent::Status { message } => writeln!(out, "  {} {}", icons::STATUS, message),
        AgentEvent::Trace(step) => render_trace_step(out, step),
        _ => Ok(()),
    }
}

fn render_trace_step<W: Write>(out: &mut W, step: &TraceStep) -> io::Result<()> {
    if step.thought.is_empty() {
        writeln!(out, "  {} {}", icons::TRACE, step.step)?;
    } else {
        writeln!(out, "  {} {}: {}", icons::TRACE, step.step, step.thought)?;
    }
    if let Some(tool) = &step.tool {
        writeln!(out, "      tool: {}", tool)?;
    }
    if let Some(observation) = &step.observation {
        writeln!(out, "      observation: {}", observation)?;
    }
    Ok(())
}

/// Print how the turn ended.
///
/// ```text
/// ────────────────────────────────────────────────────────────
/// The answer text
///
/// ✓ 0:04
/// ```
pub fn render_outcome<W: Write>(
    out: &mut W,
    outcome: &TurnOutcome,
    elapsed: Duration,
) -> io::Result<()> {
    let elapsed = format_duration(elapsed);
    match outcome {
        TurnOutcome::Completed { answer, .. } => {
            writeln!(out, "{}", "─".repeat(LINE_WIDTH))?;
            if let Some(answer) = answer {
                writeln!(out, "{}", answer)?;
                writeln!(out)?;
            }
            writeln!(out, "{} {}", icons::SUCCESS, elapsed)
        }
        TurnOutcome::Stopped => {
            writeln!(out, "{} {} ({})", icons::WARNING, outcome.message().unwrap_or_default(), elapsed)
        }
        TurnOutcome::ConnectionLost | TurnOutcome::Failed { .. } => {
            writeln!(out, "{} {} ({})", icons::FAILURE, outcome.message().unwrap_or_default(), elapsed)?;
            match outcome.to_error() {
                Some(error) if error.is_retryable() => {
                    writeln!(out, "  {}", error.category().recovery_hint())
                }
                _ => Ok(()),
            }
        }
    }
}

/// Print a decoded event as one JSON line: `{"event":kind,"data":payload}`.
pub fn render_raw<W: Write>(out: &mut W, event: &SseEvent) -> io::Result<()> {
    let line = serde_json::json!({
        "event": event.kind,
        "data": event.payload,
    });
    writeln!(out, "{}", line)
}
