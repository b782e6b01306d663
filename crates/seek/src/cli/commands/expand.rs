//! Implementation of `seek expand`.

use std::process::ExitCode;

use seek_query::{Node, PredicateCall, Query, SearchType, default_registry, find_predicates, parse};
use serde::Serialize;

use crate::cli::{args::ExpandCommand, context::CommandContext, output::print_json};

/// JSON shape of one expanded predicate.
#[derive(Serialize)]
struct ExpandedPredicate<'a> {
    /// Position of the predicate in the top-level query.
    index: usize,
    /// Field the predicate is attached to.
    field: &'static str,
    /// Predicate name.
    name: &'static str,
    /// Whether the predicate parameter was negated.
    negated: bool,
    /// Original predicate node.
    original: &'a Node,
    /// Expansion rendered back to query syntax.
    expansion: String,
    /// Expansion as AST nodes.
    nodes: Query,
}

/// JSON shape of the whole command output.
#[derive(Serialize)]
struct ExpandOutput<'a> {
    /// The parsed query rendered back to query syntax.
    query: String,
    /// Every predicate found, in query order.
    predicates: Vec<ExpandedPredicate<'a>>,
}

/// Parses the query and prints how each predicate in it expands.
pub fn run(ctx: &CommandContext, cmd: &ExpandCommand) -> ExitCode {
    let input = cmd.query.join(" ");
    let search_type = if cmd.literal {
        SearchType::Literal
    } else {
        ctx.config.query.search_type
    };

    let query = match parse(&input, search_type) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let calls = match find_predicates(&query, default_registry()) {
        Ok(calls) => calls,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.output.json {
        let output = ExpandOutput {
            query: query.to_string(),
            predicates: calls.iter().map(|call| to_output(&query, call)).collect(),
        };
        return print_json(&output);
    }

    if calls.is_empty() {
        eprintln!("no predicates found");
        return ExitCode::SUCCESS;
    }

    for call in &calls {
        let original = &query.nodes()[call.index];
        println!("{original}");
        println!("  {}", call.expand(&query));
    }
    ExitCode::SUCCESS
}

/// Builds the JSON record for a single predicate call.
fn to_output<'a>(query: &'a Query, call: &PredicateCall) -> ExpandedPredicate<'a> {
    let nodes = call.expand(query);
    ExpandedPredicate {
        index: call.index,
        field: call.predicate.field(),
        name: call.predicate.name(),
        negated: call.negated,
        original: &query.nodes()[call.index],
        expansion: nodes.to_string(),
        nodes,
    }
}
