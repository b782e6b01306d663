//! Clap argument definitions for the `seek` CLI.

use std::num::NonZeroUsize;

use clap::{Args, Parser, Subcommand};
use seek_stream::SelectPath;

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "seek")]
#[command(about = "Expand search query predicates and filter streamed search results")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared output mode flags.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `seek expand`.
#[derive(Args, Debug, Clone)]
pub struct ExpandCommand {
    /// Query text (multiple arguments are joined with spaces)
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Treat unquoted patterns as literals instead of regular expressions
    #[arg(long)]
    pub literal: bool,

    /// Output flags.
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for `seek filter`.
#[derive(Args, Debug, Clone)]
pub struct FilterCommand {
    /// Maximum result units before the stream is cut off [default: 500]
    #[arg(short = 'n', long)]
    pub limit: Option<NonZeroUsize>,

    /// Project results onto repo, file, content, symbol[.kind], or commit
    #[arg(short = 's', long)]
    pub select: Option<SelectPath>,

    /// Output flags.
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Supported `seek` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show how the predicates in a query expand
    Expand(ExpandCommand),

    /// Read match events as JSON lines on stdin and apply limit and select
    Filter(FilterCommand),

    /// Show the effective configuration
    Config,
}
