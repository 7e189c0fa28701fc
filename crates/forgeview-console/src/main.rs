//! Forgeview console entry point.
//!
//! Connects to the simulation backend, prints telemetry as it arrives,
//! and forwards commands typed on stdin.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use forgeview_client::{ClientConfig, ConnectionManager};
use forgeview_console::{parse_line, ConsoleInput, ConsoleSink, InputError};
use forgeview_protocol::Command;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const HELP: &str = "commands:
    start            restart the simulation from its initial time
    stop             stop the simulation
    pause            pause the simulation clock
    resume           resume a paused simulation
    speed <value>    set the simulation speed
    stats            request an operation statistics report
    reset-stats      reset the backend's statistics counters
    loglevel [<channel>] <level>
                     change backend logging levels
    status           print the local status report
    help             this text
    quit             leave the console";

/// Real-time monitoring and control console for the plant simulation
/// backend.
#[derive(Debug, Parser)]
#[command(name = "forgeview", version, about)]
struct Args {
    /// Backend host and port.
    #[arg(long, default_value = "127.0.0.1:8080")]
    host: String,

    /// Connect over TLS (wss).
    #[arg(long)]
    secure: bool,

    /// Milliseconds between reconnect attempts.
    #[arg(long, default_value_t = 2000)]
    retry_delay_ms: u64,

    /// Verbose logging (debug level).
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = ClientConfig::for_host(&args.host, args.secure)?
        .with_retry_delay(Duration::from_millis(args.retry_delay_ms));

    let sink = ConsoleSink::new();
    let manager = ConnectionManager::new(config, sink.clone());
    manager.connect();

    println!("forgeview console - type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(ConsoleInput::Command(command)) => {
                if command == Command::Start {
                    // A fresh run starts with empty KPI series.
                    sink.clear_kpi_series();
                }
                if let Err(error) = manager.send(command) {
                    println!("command dropped: {error}");
                }
            }
            Ok(ConsoleInput::Status) => println!("{}", sink.status_report()),
            Ok(ConsoleInput::Help) => println!("{HELP}"),
            Ok(ConsoleInput::Quit) => break,
            Err(InputError::Empty) => {}
            Err(error) => println!("{error}"),
        }
    }

    Ok(())
}
