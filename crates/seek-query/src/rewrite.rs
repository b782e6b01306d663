//! Locating and substituting predicate calls in a parsed query.

use tracing::debug;

use crate::{
    ast::{Labels, Node, Parameter, Query},
    predicate::{Predicate, PredicateError, PredicateRegistry, parse_as_predicate},
};

/// A resolved predicate occurrence at the top level of a query.
#[derive(Debug)]
pub struct PredicateCall {
    /// Position of the predicate parameter within the query.
    pub index: usize,
    /// Whether the parameter was negated.
    pub negated: bool,
    /// The parsed predicate instance.
    pub predicate: Box<dyn Predicate>,
}

impl PredicateCall {
    /// Returns the sub-query that stands in for this predicate.
    pub fn expand(&self, parent: &Query) -> Query {
        self.predicate.expand(parent)
    }
}

/// Splits a parameter into `(field, name, params)` when its value calls a predicate
/// registered in `registry`.
///
/// Quoted values are always plain values, as are `name(...)` values with no registered
/// predicate behind them.
fn predicate_call<'a>(
    parameter: &'a Parameter,
    registry: &PredicateRegistry,
) -> Option<(String, &'a str, &'a str)> {
    if parameter.annotation.labels.contains(Labels::QUOTED) {
        return None;
    }
    let (name, params) = parse_as_predicate(&parameter.value).ok()?;
    let field = parameter.field.to_ascii_lowercase();
    registry
        .contains(&field, name)
        .then_some((field, name, params))
}

/// Finds every top-level predicate parameter in `query` and instantiates it through
/// `registry`.
///
/// The first predicate that fails to parse halts the search.
pub fn find_predicates(
    query: &Query,
    registry: &PredicateRegistry,
) -> Result<Vec<PredicateCall>, PredicateError> {
    let mut calls = Vec::new();

    for (index, node) in query.iter().enumerate() {
        let Node::Parameter(parameter) = node else {
            continue;
        };
        let Some((field, name, params)) = predicate_call(parameter, registry) else {
            continue;
        };

        let predicate = registry.get(&field, name, params)?;
        calls.push(PredicateCall {
            index,
            negated: parameter.negated,
            predicate,
        });
    }

    debug!(count = calls.len(), "found predicates");
    Ok(calls)
}

/// Checks that every predicate in `query`, including those nested in operators, parses.
pub fn validate_predicates(
    query: &Query,
    registry: &PredicateRegistry,
) -> Result<(), PredicateError> {
    validate_nodes(query, registry)
}

/// Recursive worker for [`validate_predicates`].
fn validate_nodes(nodes: &[Node], registry: &PredicateRegistry) -> Result<(), PredicateError> {
    for node in nodes {
        match node {
            Node::Parameter(parameter) => {
                if let Some((field, name, params)) = predicate_call(parameter, registry) {
                    registry.get(&field, name, params)?;
                }
            }
            Node::Pattern(_) => {}
            Node::Operator(op) => validate_nodes(&op.operands, registry)?,
        }
    }
    Ok(())
}

/// Returns a copy of `query` with the node at `index` replaced by `replacement`.
///
/// The replacement nodes are spliced in place, so the query stays flat. An out-of-range
/// `index` returns the query unchanged.
pub fn substitute(query: &Query, index: usize, replacement: Query) -> Query {
    if index >= query.len() {
        return query.clone();
    }

    let mut nodes = Vec::with_capacity(query.len() + replacement.len());
    nodes.extend_from_slice(&query[..index]);
    nodes.extend(replacement);
    nodes.extend_from_slice(&query[index + 1..]);
    Query::from(nodes)
}
