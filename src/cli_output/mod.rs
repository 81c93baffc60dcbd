//! Console output for agent turns.
//!
//! Renders status lines, trace steps and the final answer, or each decoded
//! event as a JSON line in raw mode.

mod render;

pub use render::*;
