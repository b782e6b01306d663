//! Error types for predicate lookup and parameter parsing.

use thiserror::Error;

use crate::error::QueryError;

/// Errors raised while resolving a predicate.
///
/// Any of these halts the rewrite of the query that contained the predicate.
#[derive(Debug, Error)]
pub enum PredicateError {
    /// The registry has no predicates for the field.
    #[error("no predicates registered for field {field}")]
    UnknownField {
        /// The field that was looked up.
        field: String,
    },

    /// The field exists but has no predicate with this name.
    #[error("field '{field}' has no predicate named '{name}'")]
    UnknownPredicate {
        /// The field that was looked up.
        field: String,
        /// The predicate name that was not found.
        name: String,
    },

    /// The predicate rejected its parameters.
    #[error("failed to parse params: {0}")]
    Params(#[source] ParamError),

    /// A value does not have `name(params)` syntax.
    #[error("value '{value}' is not a predicate")]
    NotAPredicate {
        /// The offending value.
        value: String,
    },
}

/// Errors raised by a predicate while parsing its parameter body.
#[derive(Debug, Error)]
pub enum ParamError {
    /// The parameter body is not a valid query.
    #[error("{}", .0.message())]
    Syntax(#[source] QueryError),

    /// An option was given more than once.
    #[error("cannot specify {option} multiple times")]
    DuplicateOption {
        /// The repeated option.
        option: &'static str,
    },

    /// A parameter used a field the predicate does not accept.
    #[error("unsupported option {field:?}")]
    UnsupportedOption {
        /// The rejected field, as written.
        field: String,
    },

    /// A node kind the predicate cannot interpret, such as an operator.
    #[error("unsupported node type {kind}")]
    UnsupportedNode {
        /// The node kind.
        kind: &'static str,
    },

    /// None of the required options were set.
    #[error("one of file or content must be set")]
    Empty,
}
