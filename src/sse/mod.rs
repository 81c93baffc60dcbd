//! SSE (Server-Sent Events) stream parser
//!
//! Turns an arbitrarily chunked text stream into discrete events.
//! SSE format consists of:
//! - `event: <kind>` - event kind line
//! - `data: <payload>` - data payload line, may repeat
//! - Empty line - signals end of event
//! - Anything else (including `:` comments) - ignored
//!
//! CRLF and lone CR terminators are accepted and treated as LF.
//!
//! # Module structure
//! - `events` - Event type definitions (SseEvent, Payload, SseLine)
//! - `parser` - Incremental framer (SseParser) and line/frame parsing

mod events;
mod parser;

pub use events::{Payload, SseEvent, SseLine, DEFAULT_EVENT_KIND};
pub use parser::{
    normalize_line_endings, parse_frame, parse_sse_line, LineEndingNormalizer, SseParser,
};
