use agent_stream::adapters::ReqwestHttpClient;
use agent_stream::cli::{
    classify_prompt_line, parse_args, usage, version_line, CliCommand, Conversation, PromptInput,
    RunOptions,
};
use agent_stream::config::{ClientConfig, DEFAULT_CONNECT_TIMEOUT};

use color_eyre::Result;
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status after an interrupt at the prompt.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Token of the turn currently streaming, if any.
type ActiveTurn = Arc<Mutex<Option<CancellationToken>>>;

fn lock(active: &ActiveTurn) -> MutexGuard<'_, Option<CancellationToken>> {
    active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Ctrl+C stops the streaming turn, or exits when nothing is streaming.
fn install_interrupt_handler(active: ActiveTurn) -> Result<()> {
    ctrlc::set_handler(move || match lock(&active).as_ref() {
        Some(token) => token.cancel(),
        None => std::process::exit(INTERRUPTED_EXIT_CODE),
    })?;
    Ok(())
}

fn ask(
    runtime: &tokio::runtime::Runtime,
    conversation: &mut Conversation<Arc<ReqwestHttpClient>>,
    active: &ActiveTurn,
    query: &str,
    raw: bool,
) -> Result<bool> {
    let token = CancellationToken::new();
    *lock(active) = Some(token.clone());

    let mut stdout = io::stdout();
    let result = runtime.block_on(conversation.ask(query, token, &mut stdout));
    *lock(active) = None;

    let outcome = result?;
    if raw {
        // Raw mode keeps stdout machine-readable.
        if let Some(message) = outcome.message() {
            eprintln!("{}", message);
        }
    }
    Ok(!outcome.is_error())
}

fn run_prompt(
    runtime: &tokio::runtime::Runtime,
    conversation: &mut Conversation<Arc<ReqwestHttpClient>>,
    active: &ActiveTurn,
    raw: bool,
) -> Result<()> {
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }

        match classify_prompt_line(&line) {
            PromptInput::Exit => return Ok(()),
            PromptInput::Skip => continue,
            PromptInput::Query(query) => {
                ask(runtime, conversation, active, query, raw)?;
                println!();
            }
        }
    }
}

fn run(options: RunOptions) -> Result<()> {
    color_eyre::install()?;
    init_tracing(options.verbose);

    let mut config = ClientConfig::from_env().with_connect_timeout(DEFAULT_CONNECT_TIMEOUT);
    if let Some(base_url) = &options.base_url {
        config = config.with_base_url(base_url.as_str());
    }

    let client = Arc::new(ReqwestHttpClient::from_config(&config)?);
    let mut conversation = Conversation::new(client, config, options.endpoint.as_str())
        .with_session(options.session_id.clone())
        .with_raw(options.raw);

    let active: ActiveTurn = Arc::new(Mutex::new(None));
    install_interrupt_handler(Arc::clone(&active))?;

    let runtime = tokio::runtime::Runtime::new()?;

    match &options.query {
        Some(query) => {
            if !ask(&runtime, &mut conversation, &active, query, options.raw)? {
                std::process::exit(1);
            }
            Ok(())
        }
        None => run_prompt(&runtime, &mut conversation, &active, options.raw),
    }
}

fn main() -> Result<()> {
    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, usage());
            std::process::exit(2);
        }
    };

    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            Ok(())
        }
        CliCommand::Help => {
            println!("{}", usage());
            Ok(())
        }
        CliCommand::Run(options) => run(options),
    }
}
