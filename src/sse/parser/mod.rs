//! Incremental SSE framer.
//!
//! [`SseParser`] accepts text chunks of any size and emits every frame whose
//! terminating blank line has been seen. Whatever follows the last boundary
//! stays buffered until a later chunk completes it.

mod frame;
mod line_endings;

pub use frame::{parse_frame, parse_sse_line};
pub use line_endings::{normalize_line_endings, LineEndingNormalizer};

use crate::sse::events::SseEvent;

const FRAME_BOUNDARY: &[u8] = b"\n\n";

/// Stateful SSE parser that accumulates chunks and emits complete events.
///
/// One parser per stream. The emitted sequence depends only on the
/// concatenated input, never on how it was split into chunks.
#[derive(Debug, Default)]
pub struct SseParser {
    /// Normalized text after the last frame boundary
    buffer: String,
    /// Carries a trailing CR between chunks
    line_endings: LineEndingNormalizer,
    /// Byte offset in `buffer` where the next boundary search starts
    scan_from: usize,
}

impl SseParser {
    /// Create a new SSE parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk, returning every event it completes in arrival order.
    pub fn push(&mut self, chunk: &str) -> Vec<SseEvent> {
        if chunk.is_empty() {
            return Vec::new();
        }

        let normalized = self.line_endings.normalize(chunk);
        self.buffer.push_str(&normalized);

        let mut events = Vec::new();
        let mut consumed = 0;
        let mut search_from = self.scan_from;

        while let Some(boundary) = find_boundary(&self.buffer, search_from) {
            match parse_frame(&self.buffer[consumed..boundary]) {
                Some(event) => {
                    tracing::debug!(kind = %event.kind, "parsed SSE frame");
                    events.push(event);
                }
                None => {
                    tracing::trace!("dropping SSE frame without data");
                }
            }
            consumed = boundary + FRAME_BOUNDARY.len();
            search_from = consumed;
        }

        if consumed > 0 {
            self.buffer.drain(..consumed);
        }
        // A boundary may straddle the old end and the next chunk's first byte
        self.scan_from = self.buffer.len().saturating_sub(1);

        events
    }

    /// Text received but not yet terminated by a blank line.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// Check whether any unterminated text is buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.line_endings.reset();
        self.scan_from = 0;
    }
}

/// Byte offset of the first `\n\n` at or after `from`.
fn find_boundary(buffer: &str, from: usize) -> Option<usize> {
    buffer
        .as_bytes()
        .get(from..)?
        .windows(FRAME_BOUNDARY.len())
        .position(|window| window == FRAME_BOUNDARY)
        .map(|pos| from + pos)
}
