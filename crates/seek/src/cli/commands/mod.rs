//! Command implementations and dispatch.

pub mod config;
pub mod expand;
pub mod filter;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Expand(cmd) => expand::run(ctx, &cmd),
        Commands::Filter(cmd) => filter::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
    }
}
