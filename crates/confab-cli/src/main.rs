//! Confab pipeline CLI
//!
//! Each subcommand is one stream stage: JSONL records in on stdin, JSONL
//! records out on stdout, diagnostics on stderr only. Stages compose
//! over plain pipes:
//!
//! ```bash
//! cat claude-capture.jsonl \
//!     | confab normalize --provider claude \
//!     | confab store --cache-dir ~/.confab/cache \
//!     | confab render > transcript.md
//! ```
//!
//! Exit status 0 means the contract was honored for every record that
//! was emitted, with per-record skips logged as warnings; non-zero means
//! a fatal failure and possibly incomplete output. Set `RUST_LOG=info`
//! to see end-of-stage summaries, `RUST_LOG=debug` for cache traffic.

mod args;
mod commands;
mod router;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use args::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout belongs to the record stream.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let stage = cli.command.stage_name();

    match router::route(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{} stage failed: {}", stage, e);
            ExitCode::FAILURE
        }
    }
}
