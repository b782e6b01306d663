//! Field-scoped query predicates.
//!
//! A predicate is a field value of the form `name(params)`, such as the `contains` in
//! `repo:contains(file:README)`. Each predicate parses its own parameter body and expands
//! into a sub-query that stands in for it when the containing query is evaluated.

mod error;
mod registry;
mod repo_contains;

use std::{fmt, sync::LazyLock};

use regex::Regex;

pub use self::{
    error::{ParamError, PredicateError},
    registry::{PredicateFactory, PredicateRegistry, default_registry},
    repo_contains::RepoContainsPredicate,
};
use crate::ast::Query;

/// A parameterised query rewrite scoped to one field and name.
///
/// Instances are single-use: the registry creates a fresh one per occurrence,
/// [`parse_params`](Predicate::parse_params) fills it in, and
/// [`expand`](Predicate::expand) reads it.
pub trait Predicate: fmt::Debug + Send + Sync {
    /// The field the predicate belongs to, e.g. `repo`.
    fn field(&self) -> &'static str;

    /// The predicate name, e.g. `contains`.
    fn name(&self) -> &'static str;

    /// Populates the predicate from the text between its parentheses.
    fn parse_params(&mut self, params: &str) -> Result<(), ParamError>;

    /// Returns the query that replaces this predicate, given the query that contains it.
    fn expand(&self, parent: &Query) -> Query;
}

/// Matches `name(params)` with a lowercase ASCII name.
static PREDICATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[a-z]+)\((?P<params>.*)\)$").expect("predicate pattern is valid")
});

/// Splits a field value into a predicate name and its parameter body.
///
/// The outermost parentheses delimit the parameters; anything between them, nested
/// parentheses included, is returned verbatim. Newlines are not allowed.
///
/// ```
/// use seek_query::parse_as_predicate;
///
/// assert_eq!(parse_as_predicate("contains(file:a)").unwrap(), ("contains", "file:a"));
/// assert!(parse_as_predicate("^github\\.com/").is_err());
/// ```
pub fn parse_as_predicate(value: &str) -> Result<(&str, &str), PredicateError> {
    let captures = PREDICATE_PATTERN
        .captures(value)
        .ok_or_else(|| PredicateError::NotAPredicate {
            value: value.to_string(),
        })?;

    match (captures.name("name"), captures.name("params")) {
        (Some(name), Some(params)) => Ok((name.as_str(), params.as_str())),
        _ => Err(PredicateError::NotAPredicate {
            value: value.to_string(),
        }),
    }
}
