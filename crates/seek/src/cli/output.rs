//! Output formatting helpers for CLI commands.

use std::process::ExitCode;

use seek_stream::{Match, RepoStatus, Stats};
use serde::Serialize;

/// Prints `value` as pretty JSON, failing if it cannot be serialized.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize output: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Renders a match as one or more tab-separated lines.
pub fn format_match(m: &Match) -> String {
    match m {
        Match::Repo(r) if r.rev.is_empty() => format!("repo\t{}", r.name),
        Match::Repo(r) => format!("repo\t{}@{}", r.name, r.rev),
        Match::File(f) => {
            let mut out = format!("file\t{}\t{}", f.file.repo, f.file.path);
            for line in &f.line_matches {
                out.push_str(&format!("\n  {}: {}", line.line_number + 1, line.preview));
            }
            out
        }
        Match::Symbol(s) => s
            .symbols
            .iter()
            .map(|symbol| {
                format!(
                    "symbol\t{}\t{}\t{}\t{}",
                    s.file.repo, s.file.path, symbol.kind, symbol.name
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Match::Commit(c) => {
            let subject = c.message.lines().next().unwrap_or_default();
            format!("commit\t{}\t{}\t{subject}", c.repo, c.oid)
        }
    }
}

/// One-line summary of collected results for stderr.
pub fn summary(matches: usize, result_count: usize, stats: &Stats) -> String {
    let mut out = format!("{matches} matches, {result_count} results");
    let timed_out = stats.repos_with(RepoStatus::TIMED_OUT).count();
    if timed_out > 0 {
        out.push_str(&format!(", {timed_out} repos timed out"));
    }
    if stats.is_limit_hit {
        out.push_str(" (limit hit)");
    }
    out
}
