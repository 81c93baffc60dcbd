//! Agent Stream - incremental agent responses over server-sent events
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod agent;
pub mod cli;
pub mod cli_output;
pub mod config;
pub mod error;
pub mod session;
pub mod sse;
pub mod traits;
