//! lc - live console client
//!
//! # Examples
//!
//! ```bash
//! # Attach to a running server, token from the environment
//! LC_TOKEN=... lc --server-key 8f2c1a
//!
//! # Attach to a server that is still installing, without history
//! lc --server-key 8f2c1a --token ... --status installing --no-history
//! ```

use lc_cli::{
    Cli, HELP, InputCommand, Result as CliErrorResult, TOKEN_ENV, logger, parse_line,
    render_event, render_snapshot,
};
use lc_client::{
    ConsoleClient, ConsoleDeps, ConsoleEvent, ConsoleHandle, CredentialProvider, EnvToken, StaticToken,
    SubscriptionKey,
};
use lc_config::Config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliErrorResult<()> {
    // Load and validate configuration
    let mut config = Config::load()?;
    cli.apply_to(&mut config);
    config.validate()?;

    logger::initialize(
        config.logging.level,
        config.logging.file.as_ref().map(PathBuf::from),
        config.logging.colored,
    )?;
    config.log_summary();

    let key = SubscriptionKey::parse(&cli.server_key)?;
    let credentials: Arc<dyn CredentialProvider> = match cli.token {
        Some(ref token) => Arc::new(StaticToken::new(token.clone())),
        None => Arc::new(EnvToken::new(TOKEN_ENV)),
    };
    if credentials.token().is_none() {
        warn!(
            "No token given (--token or {}); waiting for one before connecting",
            TOKEN_ENV
        );
    }

    let deps = ConsoleDeps::from_config(key.clone(), &config, credentials)?
        .with_initial_status(cli.status);
    let handle = ConsoleClient::spawn(deps);
    let events = handle.subscribe();

    info!("Attached to console {} (status {})", key, cli.status);

    let result = attach(&handle, events).await;
    handle.shutdown().await?;
    result
}

/// Pump events to stdout and stdin lines to the console until quit or Ctrl-C
async fn attach(
    handle: &ConsoleHandle,
    mut events: broadcast::Receiver<ConsoleEvent>,
) -> CliErrorResult<()> {
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if let Some(text) = render_event(&event) {
                        println!("{}", text);
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!("Output fell behind, {} events skipped", missed);
                }
                Err(RecvError::Closed) => break,
            },
            line = stdin.next_line(), if stdin_open => match line? {
                Some(line) => {
                    if !handle_input(handle, &line).await? {
                        break;
                    }
                }
                None => {
                    info!("stdin closed, streaming until interrupted");
                    stdin_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    Ok(())
}

/// Returns false when the user asked to quit
async fn handle_input(handle: &ConsoleHandle, line: &str) -> CliErrorResult<bool> {
    match parse_line(line) {
        InputCommand::Send(text) => handle.send_command(text)?,
        InputCommand::Status(status) => handle.status_changed(status)?,
        InputCommand::Snapshot => {
            let snapshot = handle.snapshot().await?;
            println!("{}", render_snapshot(&snapshot));
        }
        InputCommand::Connect => handle.ensure_connected()?,
        InputCommand::Close => handle.close()?,
        InputCommand::Quit => return Ok(false),
        InputCommand::Help => println!("{}", HELP),
        InputCommand::Unknown(directive) => {
            eprintln!("Unknown command: {} (type :help)", directive);
        }
        InputCommand::Empty => {}
    }
    Ok(true)
}
