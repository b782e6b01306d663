//! Query abstract syntax tree.
//!
//! A query is a flat, ordered sequence of nodes. Nodes that sit next to each other at the
//! top level are implicitly conjoined; explicit `and`/`or` and parenthesised groups appear
//! as [`Operator`] nodes.

use std::{
    fmt,
    ops::{BitOr, BitOrAssign, Deref},
    slice, vec,
};

use serde::Serialize;

use crate::lexer::{Token, tokenize};

/// Field restricting results to repositories.
pub const FIELD_REPO: &str = "repo";
/// Field restricting results to file paths.
pub const FIELD_FILE: &str = "file";
/// Field matching file contents.
pub const FIELD_CONTENT: &str = "content";
/// Field choosing the result projection.
pub const FIELD_SELECT: &str = "select";

/// Label bits attached to a node by the parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Labels(u8);

impl Labels {
    /// No labels.
    pub const NONE: Self = Self(0);
    /// Value is matched literally.
    pub const LITERAL: Self = Self(1);
    /// Value is a regular expression.
    pub const REGEXP: Self = Self(1 << 1);
    /// Value was quoted in the source text.
    pub const QUOTED: Self = Self(1 << 2);
    /// Value has predicate syntax, e.g. `contains(file:a)`.
    pub const IS_PREDICATE: Self = Self(1 << 3);

    /// Returns true if every bit in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if no bits are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Labels {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Labels {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Byte range of a node in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a span covering `start..end`.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Parser metadata carried alongside a node.
///
/// Rewrites copy annotations verbatim so later stages still see where a node came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Annotation {
    /// Label bits.
    pub labels: Labels,
    /// Source location.
    pub span: Span,
}

/// A `field:value` filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Field name as written (aliases resolved).
    pub field: String,
    /// Field value.
    pub value: String,
    /// Whether the parameter was negated (`-field:value` or `not field:value`).
    pub negated: bool,
    /// Parser metadata.
    pub annotation: Annotation,
}

impl Parameter {
    /// Creates a non-negated parameter with an empty annotation.
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            negated: false,
            annotation: Annotation::default(),
        }
    }

    /// Sets the negation flag.
    #[must_use]
    pub fn with_negated(mut self, negated: bool) -> Self {
        self.negated = negated;
        self
    }

    /// Replaces the annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotation = annotation;
        self
    }

    /// Returns true if the field matches `name`, ignoring ASCII case.
    pub fn is_field(&self, name: &str) -> bool {
        self.field.eq_ignore_ascii_case(name)
    }
}

/// A raw search pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pattern {
    /// Pattern text.
    pub value: String,
    /// Whether the pattern was negated with `not`.
    pub negated: bool,
    /// Parser metadata.
    pub annotation: Annotation,
}

impl Pattern {
    /// Creates a non-negated pattern with an empty annotation.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            negated: false,
            annotation: Annotation::default(),
        }
    }

    /// Replaces the annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotation = annotation;
        self
    }
}

/// Boolean operator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorKind {
    /// All operands must match.
    And,
    /// At least one operand must match.
    Or,
}

impl OperatorKind {
    /// Keyword used in query text.
    const fn keyword(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// An explicit boolean combination of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operator {
    /// Operator kind.
    pub kind: OperatorKind,
    /// Operands in source order.
    pub operands: Vec<Node>,
}

/// A query AST node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    /// A `field:value` filter.
    Parameter(Parameter),
    /// A raw search pattern.
    Pattern(Pattern),
    /// A boolean combination.
    Operator(Operator),
}

impl Node {
    /// Short name of the node variant, used in diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Parameter(_) => "parameter",
            Self::Pattern(_) => "pattern",
            Self::Operator(_) => "operator",
        }
    }

    /// Returns the parameter if this node is one.
    pub const fn as_parameter(&self) -> Option<&Parameter> {
        match self {
            Self::Parameter(p) => Some(p),
            _ => None,
        }
    }
}

impl From<Parameter> for Node {
    fn from(p: Parameter) -> Self {
        Self::Parameter(p)
    }
}

impl From<Pattern> for Node {
    fn from(p: Pattern) -> Self {
        Self::Pattern(p)
    }
}

impl From<Operator> for Node {
    fn from(op: Operator) -> Self {
        Self::Operator(op)
    }
}

/// An ordered sequence of nodes, implicitly conjoined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Query(Vec<Node>);

impl Query {
    /// Creates an empty query.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a node.
    pub fn push(&mut self, node: impl Into<Node>) {
        self.0.push(node.into());
    }

    /// Returns the nodes as a slice.
    pub fn nodes(&self) -> &[Node] {
        &self.0
    }

    /// Consumes the query, returning its nodes.
    pub fn into_nodes(self) -> Vec<Node> {
        self.0
    }

    /// Calls `f` with `(value, negated, annotation)` for every parameter whose field is
    /// `field`, descending into operators, in source order.
    pub fn visit_field<F>(&self, field: &str, mut f: F)
    where
        F: FnMut(&str, bool, &Annotation),
    {
        visit_nodes(&self.0, field, &mut f);
    }
}

/// Recursive worker for [`Query::visit_field`].
fn visit_nodes<F>(nodes: &[Node], field: &str, f: &mut F)
where
    F: FnMut(&str, bool, &Annotation),
{
    for node in nodes {
        match node {
            Node::Parameter(p) if p.is_field(field) => f(&p.value, p.negated, &p.annotation),
            Node::Parameter(_) | Node::Pattern(_) => {}
            Node::Operator(op) => visit_nodes(&op.operands, field, f),
        }
    }
}

impl Deref for Query {
    type Target = [Node];

    fn deref(&self) -> &[Node] {
        &self.0
    }
}

impl From<Vec<Node>> for Query {
    fn from(nodes: Vec<Node>) -> Self {
        Self(nodes)
    }
}

impl FromIterator<Node> for Query {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Node> for Query {
    fn extend<I: IntoIterator<Item = Node>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Query {
    type Item = Node;
    type IntoIter = vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Query {
    type Item = &'a Node;
    type IntoIter = slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Writes an unquoted value in the first form that lexes back to `expected` after
/// `prefix`: verbatim, then with whitespace and quotes backslash-escaped when `escape`
/// allows it, then quoted.
fn write_value(
    f: &mut fmt::Formatter<'_>,
    value: &str,
    escape: bool,
    prefix: &str,
    expected: impl Fn(String) -> Token,
) -> fmt::Result {
    let relexes = |text: &str| {
        tokenize(&format!("{prefix}{text}")).is_ok_and(|lexemes| {
            matches!(lexemes.as_slice(), [only] if only.token == expected(value.to_string()))
        })
    };

    if !value.is_empty() && relexes(value) {
        return f.write_str(value);
    }
    if escape && !value.is_empty() {
        let escaped = escape_bare(value);
        if relexes(&escaped) {
            return f.write_str(&escaped);
        }
    }

    write_quoted(f, value)
}

/// Writes `value` double-quoted with `"` and `\\` escaped.
fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{ch}")?;
    }
    f.write_str("\"")
}

/// Backslash-escapes whitespace and quotes so `value` lexes as one bare word.
fn escape_bare(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for ch in value.chars() {
        if ch.is_whitespace() || ch == '"' || ch == '\'' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameter(p) => {
                let prefix = format!("{}{}:", if p.negated { "-" } else { "" }, p.field);
                f.write_str(&prefix)?;
                if p.annotation.labels.contains(Labels::QUOTED) {
                    return write_quoted(f, &p.value);
                }
                write_value(f, &p.value, true, &prefix, |value| Token::Parameter {
                    field: p.field.clone(),
                    value,
                    negated: p.negated,
                    quoted: false,
                })
            }
            Self::Pattern(p) => {
                if p.negated {
                    f.write_str("not ")?;
                }
                let labels = p.annotation.labels;
                if labels.contains(Labels::QUOTED) {
                    return write_quoted(f, &p.value);
                }
                write_value(f, &p.value, labels.contains(Labels::REGEXP), "", |value| {
                    Token::Pattern {
                        value,
                        quoted: false,
                    }
                })
            }
            Self::Operator(op) => {
                f.write_str("(")?;
                for (i, operand) in op.operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op.kind.keyword())?;
                    }
                    write!(f, "{operand}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Query {
    /// Formats the query back into query text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}
