//! Implementation of `seek filter`.

use std::{
    io::{self, BufRead},
    num::NonZeroUsize,
    process::ExitCode,
};

use seek_stream::{
    CollectSink, Event, Match, Scope, SelectPath, Sink, Stats, collect, with_limit, with_select,
};
use serde::Serialize;
use tracing::debug;

use crate::cli::{
    args::FilterCommand,
    context::CommandContext,
    output::{format_match, print_json, summary},
};

/// JSON shape of the command output.
#[derive(Serialize)]
struct FilterOutput<'a> {
    /// Matches that made it through the pipeline.
    matches: &'a [Match],
    /// Merged stats, including the limit flag.
    stats: &'a Stats,
    /// Total result units across `matches`.
    result_count: usize,
}

/// Streams JSON-lines events from stdin through a limit and optional select stage.
pub fn run(ctx: &CommandContext, cmd: &FilterCommand) -> ExitCode {
    let limit = cmd.limit.map_or(ctx.config.search.limit, NonZeroUsize::get);
    let select = cmd
        .select
        .clone()
        .or_else(|| ctx.config.search.select.clone());

    let stdin = io::stdin();
    let (collected, result) = collect(|sink| stream_events(stdin.lock(), sink, limit, select));
    if let Err(e) = result {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    let result_count = collected.matches.iter().map(Match::result_count).sum();
    if cmd.output.json {
        return print_json(&FilterOutput {
            matches: &collected.matches,
            stats: &collected.stats,
            result_count,
        });
    }

    for m in &collected.matches {
        println!("{}", format_match(m));
    }
    eprintln!(
        "{}",
        summary(collected.matches.len(), result_count, &collected.stats)
    );
    ExitCode::SUCCESS
}

/// Wires the pipeline in front of `sink` and feeds it every event read from `reader`.
fn stream_events<R: BufRead>(
    reader: R,
    sink: &CollectSink,
    limit: usize,
    select: Option<SelectPath>,
) -> Result<(), String> {
    let root = Scope::new();
    let (scope, limited, release) = with_limit(&root, sink, limit);
    let head: Box<dyn Sink + '_> = match select {
        Some(path) => Box::new(with_select(Some(&limited), path)),
        None => Box::new(&limited),
    };

    let result = pump(reader, &*head, &scope);
    release.release();
    result
}

/// Parses one event per non-blank line and delivers it until input ends or `scope` is
/// cancelled.
fn pump<R: BufRead>(reader: R, sink: &dyn Sink, scope: &Scope) -> Result<(), String> {
    for (i, line) in reader.lines().enumerate() {
        if scope.is_cancelled() {
            debug!(line = i + 1, "limit reached, ignoring remaining input");
            break;
        }
        let line = line.map_err(|e| format!("failed to read stdin: {e}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let event: Event =
            serde_json::from_str(&line).map_err(|e| format!("line {}: {e}", i + 1))?;
        sink.deliver(event);
    }
    Ok(())
}
