//! Command-line argument parsing.
//!
//! Hand-rolled: the surface is a handful of flags and a free-form query.

use thiserror::Error;

use crate::agent::QUERY_STREAM_ENDPOINT;

/// Errors from parsing the command line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgsError {
    #[error("missing value for {0}")]
    MissingValue(String),
    #[error("unknown option: {0}")]
    UnknownOption(String),
}

/// Options for running queries.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Endpoint path or absolute URL to stream from
    pub endpoint: String,
    /// Overrides the configured base URL
    pub base_url: Option<String>,
    /// Conversation to continue
    pub session_id: Option<String>,
    /// Print decoded events as JSON lines
    pub raw: bool,
    /// Log at debug level unless RUST_LOG says otherwise
    pub verbose: bool,
    /// One-shot query; `None` starts the interactive prompt
    pub query: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            endpoint: QUERY_STREAM_ENDPOINT.to_string(),
            base_url: None,
            session_id: None,
            raw: false,
            verbose: false,
            query: None,
        }
    }
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Stream one query or start the prompt
    Run(RunOptions),
}

/// Parse command-line arguments, program name first.
///
/// Options accept `--flag value` and `--flag=value`. Everything that is not
/// an option is joined with spaces into the query; `--` ends option parsing.
///
/// # Examples
///
/// ```
/// use agent_stream::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["agent-stream".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut options = RunOptions::default();
    let mut words: Vec<String> = Vec::new();
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        if !arg.starts_with('-') || arg == "-" {
            words.push(arg);
            continue;
        }

        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |name: &str| -> Result<String, ArgsError> {
            match inline.clone().or_else(|| args.next()) {
                Some(v) => Ok(v),
                None => Err(ArgsError::MissingValue(name.to_string())),
            }
        };

        match flag.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--raw" => options.raw = true,
            "--verbose" | "-v" => options.verbose = true,
            "--endpoint" => options.endpoint = value("--endpoint")?,
            "--base-url" => options.base_url = Some(value("--base-url")?),
            "--session" => options.session_id = Some(value("--session")?),
            "--" => {
                words.extend(args.by_ref());
                break;
            }
            _ => return Err(ArgsError::UnknownOption(arg)),
        }
    }

    let query = words.join(" ");
    if !query.trim().is_empty() {
        options.query = Some(query.trim().to_string());
    }
    Ok(CliCommand::Run(options))
}

/// Usage text for `--help`.
pub fn usage() -> String {
    format!(
        "\
Usage: agent-stream [OPTIONS] [QUERY...]

Streams an agent's response to QUERY. Without a query, reads one query per
line until EOF or /exit.

Options:
      --endpoint <PATH>   Stream endpoint [default: {endpoint}]
      --base-url <URL>    Agent base URL [env: {env}]
      --session <ID>      Continue an existing session
      --raw               Print decoded events as JSON lines
  -v, --verbose           Debug logging (RUST_LOG takes precedence)
  -h, --help              Print help
  -V, --version           Print version",
        endpoint = QUERY_STREAM_ENDPOINT,
        env = crate::config::BASE_URL_ENV,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliCommand, ArgsError> {
        let mut all = vec!["agent-stream".to_string()];
        all.extend(args.iter().map(|a| a.to_string()));
        parse_args(all.into_iter())
    }

    fn run_options(args: &[&str]) -> RunOptions {
        match parse(args) {
            Ok(CliCommand::Run(options)) => options,
            other => panic!("expected run options, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), Ok(CliCommand::Version));
        assert_eq!(parse(&["-V"]), Ok(CliCommand::Version));
    }

    #[test]
    fn test_parse_help_flag() {
        assert_eq!(parse(&["--help"]), Ok(CliCommand::Help));
        assert_eq!(parse(&["what", "-h"]), Ok(CliCommand::Help));
    }

    #[test]
    fn test_parse_no_args_starts_prompt() {
        assert_eq!(run_options(&[]), RunOptions::default());
    }

    #[test]
    fn test_parse_query_words_joined() {
        let options = run_options(&["who", "wrote", "serde?"]);
        assert_eq!(options.query.as_deref(), Some("who wrote serde?"));
        assert_eq!(options.endpoint, "/query/stream");
    }

    #[test]
    fn test_parse_options_with_values() {
        let options = run_options(&[
            "--endpoint",
            "/v2/stream",
            "--base-url=http://agent:9000",
            "--session",
            "s-1",
            "--raw",
            "--verbose",
            "hello",
        ]);
        assert_eq!(options.endpoint, "/v2/stream");
        assert_eq!(options.base_url.as_deref(), Some("http://agent:9000"));
        assert_eq!(options.session_id.as_deref(), Some("s-1"));
        assert!(options.raw);
        assert!(options.verbose);
        assert_eq!(options.query.as_deref(), Some("hello"));
    }

    #[test]
    fn test_double_dash_ends_options() {
        let options = run_options(&["--", "--raw", "is", "a", "flag"]);
        assert!(!options.raw);
        assert_eq!(options.query.as_deref(), Some("--raw is a flag"));
    }

    #[test]
    fn test_missing_value() {
        assert_eq!(
            parse(&["--endpoint"]),
            Err(ArgsError::MissingValue("--endpoint".to_string()))
        );
    }

    #[test]
    fn test_unknown_option() {
        assert_eq!(
            parse(&["--update"]),
            Err(ArgsError::UnknownOption("--update".to_string()))
        );
        assert_eq!(
            ArgsError::UnknownOption("--x".to_string()).to_string(),
            "unknown option: --x"
        );
    }

    #[test]
    fn test_usage_mentions_env() {
        assert!(usage().contains("AGENT_STREAM_BASE_URL"));
    }
}
