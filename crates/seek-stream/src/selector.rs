//! Result projections named by `select:` values.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Symbol kinds accepted after `symbol.`.
const SYMBOL_KINDS: &[&str] = &[
    "file",
    "module",
    "namespace",
    "package",
    "class",
    "method",
    "property",
    "field",
    "constructor",
    "enum",
    "interface",
    "function",
    "variable",
    "constant",
    "string",
    "number",
    "boolean",
    "array",
    "object",
    "key",
    "null",
    "enum-member",
    "struct",
    "event",
    "operator",
    "type-parameter",
];

/// A projection applied to every match by the selecting sink.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectPath {
    /// Leave matches unchanged.
    Identity,
    /// The repository containing the match.
    Repo,
    /// The file containing the match, without line matches.
    File,
    /// File matches that carry line matches.
    Content,
    /// Symbol matches, optionally restricted to one kind.
    Symbol(Option<String>),
    /// Commit matches.
    Commit,
}

/// Errors from parsing a select path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// The path is empty.
    #[error("empty select path")]
    Empty,

    /// The first path segment is not a known result type.
    #[error("invalid select type '{0}'; expected one of repo, file, content, symbol, commit")]
    UnknownType(String),

    /// The symbol kind is not recognised.
    #[error("invalid symbol kind '{0}'")]
    UnknownSymbolKind(String),

    /// The result type takes no sub-path.
    #[error("select type '{0}' has no fields")]
    UnexpectedField(String),
}

impl FromStr for SelectPath {
    type Err = SelectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s.is_empty() {
            return Err(SelectError::Empty);
        }

        let (head, rest) = match s.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (s.as_str(), None),
        };

        let path = match head {
            "repo" => Self::Repo,
            "file" => Self::File,
            "content" => Self::Content,
            "commit" => Self::Commit,
            "symbol" => {
                return match rest {
                    None => Ok(Self::Symbol(None)),
                    Some(kind) if SYMBOL_KINDS.contains(&kind) => {
                        Ok(Self::Symbol(Some(kind.to_string())))
                    }
                    Some(kind) => Err(SelectError::UnknownSymbolKind(kind.to_string())),
                };
            }
            other => return Err(SelectError::UnknownType(other.to_string())),
        };

        match rest {
            None => Ok(path),
            Some(_) => Err(SelectError::UnexpectedField(head.to_string())),
        }
    }
}

impl fmt::Display for SelectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => f.write_str("identity"),
            Self::Repo => f.write_str("repo"),
            Self::File => f.write_str("file"),
            Self::Content => f.write_str("content"),
            Self::Symbol(None) => f.write_str("symbol"),
            Self::Symbol(Some(kind)) => write!(f, "symbol.{kind}"),
            Self::Commit => f.write_str("commit"),
        }
    }
}
