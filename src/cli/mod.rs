//! Console front-end.
//!
//! Argument parsing, version display and the turn driver used by the
//! binary's one-shot and interactive modes.
//!
//! # Usage
//!
//! ```ignore
//! use agent_stream::cli::{parse_args, CliCommand};
//!
//! match parse_args(std::env::args())? {
//!     CliCommand::Version => println!("{}", agent_stream::cli::version_line()),
//!     CliCommand::Help => println!("{}", agent_stream::cli::usage()),
//!     CliCommand::Run(options) => { /* build a Conversation and ask */ }
//! }
//! ```

pub mod args;
pub mod turn;
pub mod version;

pub use args::{parse_args, usage, ArgsError, CliCommand, RunOptions};
pub use turn::Conversation;
pub use version::{version_line, VERSION};

/// Prompt input that ends the interactive loop.
pub const EXIT_COMMAND: &str = "/exit";

/// What to do with one line read at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptInput<'a> {
    Query(&'a str),
    Skip,
    Exit,
}

/// Classify a line read at the prompt.
pub fn classify_prompt_line(line: &str) -> PromptInput<'_> {
    let line = line.trim();
    if line.is_empty() {
        PromptInput::Skip
    } else if line == EXIT_COMMAND {
        PromptInput::Exit
    } else {
        PromptInput::Query(line)
    }
}
