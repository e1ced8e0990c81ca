//! git-broadcast CLI

mod cli;

use anstream::eprintln;
use clap::Parser;
use cli::style::fatal;
use cli::{BroadcastArgs, init_logging, run_broadcast};
use std::process::ExitCode;
use tracing::debug;

/// Merge one source branch into many target branches
#[derive(Parser)]
#[command(name = "git-broadcast", version)]
struct Cli {
    #[command(flatten)]
    broadcast: BroadcastArgs,

    /// Output more logging info
    #[arg(short, long)]
    verbose: bool,

    /// Suppress log prefixes (timestamp and level), eg when redirecting to chat
    #[arg(long)]
    suppress_log_prefixes: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.suppress_log_prefixes);
    debug!(version = env!("CARGO_PKG_VERSION"), "git-broadcast starting");

    match run_broadcast(&cli.broadcast).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", fatal(&format!("{e:?}")));
            ExitCode::from(1)
        }
    }
}
