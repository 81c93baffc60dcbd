//! Frame-level parsing: classify lines and decode one complete frame.

use crate::sse::events::{Payload, SseEvent, SseLine, DEFAULT_EVENT_KIND};

/// Parse a single SSE line into its component type
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        return SseLine::Data(rest.trim_start().to_string());
    }

    SseLine::Ignored(line.to_string())
}

/// Decode the text of one frame (without its terminating blank line).
///
/// Returns `None` when the frame has no `data:` line, whatever else it
/// carries.
pub fn parse_frame(raw: &str) -> Option<SseEvent> {
    let mut kind: Option<String> = None;
    let mut data_lines: Vec<String> = Vec::new();

    for line in raw.split('\n') {
        match parse_sse_line(line) {
            // An empty kind keeps whatever was set before it
            SseLine::Event(event_kind) if !event_kind.is_empty() => kind = Some(event_kind),
            SseLine::Data(data) => data_lines.push(data),
            _ => {}
        }
    }

    if data_lines.is_empty() {
        return None;
    }

    Some(SseEvent {
        kind: kind.unwrap_or_else(|| DEFAULT_EVENT_KIND.to_string()),
        payload: Payload::decode(data_lines.join("\n")),
    })
}
