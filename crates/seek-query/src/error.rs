//! Error types for malformed query text.
//!
//! Predicate errors live with the predicate registry.

use std::{error::Error as StdError, fmt};

use thiserror::Error;

/// Hints shown under a syntax error, keyed by a fragment of its message.
const HINTS: &[(&str, &str)] = &[
    ("unclosed quote", "add a closing quote to complete the value"),
    ("unbalanced parenthesis", "close the parenthesis or escape it as \\("),
    ("closing parenthesis", "balance the parentheses around the group"),
    ("unexpected or", "operators need an expression on both sides, e.g. 'foo or bar'"),
    ("unexpected and", "operators need an expression on both sides, e.g. 'foo and bar'"),
    ("missing value", "give the field a value, e.g. 'file:README'"),
];

/// Tokenization failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at byte {position}")]
pub struct LexError {
    /// What went wrong.
    pub message: String,
    /// Byte offset of the offending character.
    pub position: usize,
    /// The text being tokenized.
    pub input: String,
}

impl LexError {
    /// Creates a lexer error over `input`.
    pub fn new(message: impl Into<String>, position: usize, input: &str) -> Self {
        Self {
            message: message.into(),
            position,
            input: input.to_string(),
        }
    }
}

/// Structural failure in an otherwise well-tokenized query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// What went wrong.
    pub message: String,
    /// Byte offset of the offending token, absent at end of input.
    pub position: Option<usize>,
}

impl ParseError {
    /// Creates a parse error.
    pub fn new(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Which stage rejected the query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryErrorKind {
    /// Tokenization failed.
    #[error(transparent)]
    Lex(LexError),
    /// Parsing failed.
    #[error(transparent)]
    Parse(ParseError),
}

/// A syntax error in query text.
///
/// Displays as the message followed by the query with a caret under the offending byte,
/// plus a hint for common mistakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// The underlying failure.
    pub kind: QueryErrorKind,
    /// The query text, when known.
    pub query: Option<String>,
}

impl QueryError {
    /// Attaches the query text.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// The bare error message.
    pub fn message(&self) -> &str {
        match &self.kind {
            QueryErrorKind::Lex(e) => &e.message,
            QueryErrorKind::Parse(e) => &e.message,
        }
    }

    /// Byte offset of the error, if known.
    pub const fn position(&self) -> Option<usize> {
        match &self.kind {
            QueryErrorKind::Lex(e) => Some(e.position),
            QueryErrorKind::Parse(e) => e.position,
        }
    }

    /// A fix-it hint for common mistakes.
    pub fn suggestion(&self) -> Option<&'static str> {
        let message = self.message();
        HINTS
            .iter()
            .find(|(fragment, _)| message.contains(fragment))
            .map(|(_, hint)| *hint)
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "query syntax error: {}", self.message())?;
        if let Some(query) = &self.query {
            write!(f, "\n  {query}")?;
            if let Some(pos) = self.position() {
                write!(f, "\n  {:>width$}", "^", width = pos.min(query.len()) + 1)?;
            }
        }
        if let Some(hint) = self.suggestion() {
            write!(f, "\nhint: {hint}")?;
        }
        Ok(())
    }
}

impl StdError for QueryError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            QueryErrorKind::Lex(e) => Some(e),
            QueryErrorKind::Parse(e) => Some(e),
        }
    }
}

impl From<LexError> for QueryError {
    fn from(err: LexError) -> Self {
        let query = Some(err.input.clone());
        Self {
            kind: QueryErrorKind::Lex(err),
            query,
        }
    }
}

impl From<ParseError> for QueryError {
    fn from(err: ParseError) -> Self {
        Self {
            kind: QueryErrorKind::Parse(err),
            query: None,
        }
    }
}
