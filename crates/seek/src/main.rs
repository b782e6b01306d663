//! Command-line interface for `seek`.

use std::{io, process::ExitCode};

use clap::Parser;
use seek::cli::{CommandContext, args::Cli, commands};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "SEEK_LOG";

/// Installs a stderr subscriber filtered by `SEEK_LOG`, defaulting to warnings only.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("warning: could not initialise logging: {e}");
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let ctx = match CommandContext::load() {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    commands::run(cli.command, &ctx)
}
