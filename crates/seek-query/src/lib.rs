//! Query parsing, AST, and predicate expansion for seek.
//!
//! Queries are written in a field-oriented search language:
//!
//! - **Patterns**: `foo.*bar` - raw search patterns (regular expressions by default)
//! - **Quoted patterns**: `"error handling"` - searched literally
//! - **Parameters**: `repo:^github\.com/` - field-scoped filters
//! - **Negation**: `-file:_test\.go$` or `not file:_test\.go$`
//! - **Operators**: `a or b`, `(a and b)` - explicit boolean structure
//! - **Predicates**: `repo:contains(file:README)` - field values that expand into sub-queries
//!
//! # Example
//!
//! ```
//! use seek_query::{SearchType, default_registry, find_predicates, parse};
//!
//! let query = parse("repo:^x$ repo:contains(file:README) TODO", SearchType::Regex).unwrap();
//! let calls = find_predicates(&query, default_registry()).unwrap();
//! assert_eq!(calls.len(), 1);
//!
//! let expanded = calls[0].expand(&query);
//! assert_eq!(expanded.to_string(), "select:repo file:README repo:^x$");
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod parser;
mod predicate;
mod rewrite;

pub use ast::{
    Annotation, FIELD_CONTENT, FIELD_FILE, FIELD_REPO, FIELD_SELECT, Labels, Node, Operator,
    OperatorKind, Parameter, Pattern, Query, Span,
};
pub use error::{LexError, ParseError, QueryError, QueryErrorKind};
pub use lexer::{Lexeme, Token, tokenize};
pub use parser::{SearchType, parse};
pub use predicate::{
    ParamError, Predicate, PredicateError, PredicateFactory, PredicateRegistry,
    RepoContainsPredicate, default_registry, parse_as_predicate,
};
pub use rewrite::{PredicateCall, find_predicates, substitute, validate_predicates};
