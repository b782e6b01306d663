//! Query parser.
//!
//! Parses a token stream into a [`Query`] using recursive descent.
//!
//! # Grammar
//!
//! ```text
//! query    → or_expr?
//! or_expr  → and_expr ("or" and_expr)*
//! and_expr → unary (("and")? unary)*
//! unary    → "not" unary | primary
//! primary  → PATTERN | PARAMETER | "(" or_expr ")"
//! ```
//!
//! # Shape of the result
//!
//! The top-level conjunction is returned as a flat node sequence rather than an `and`
//! operator, so `a b` and `a and b` both parse to two nodes. Disjunctions and
//! parenthesised groups with more than one operand become [`Operator`] nodes.

use serde::{Deserialize, Serialize};

use crate::{
    ast::{Annotation, Labels, Node, Operator, OperatorKind, Parameter, Pattern, Query, Span},
    error::{ParseError, QueryError},
    lexer::{Lexeme, Token, tokenize},
    predicate::parse_as_predicate,
};

/// Dialect used to interpret unquoted patterns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Unquoted patterns are regular expressions.
    #[default]
    Regex,
    /// Unquoted patterns are matched literally.
    Literal,
}

/// Recursive descent parser for query expressions.
struct Parser {
    /// Token stream to parse.
    lexemes: Vec<Lexeme>,
    /// Current position in token stream.
    position: usize,
    /// Dialect for unquoted patterns.
    search_type: SearchType,
}

impl Parser {
    /// Creates a new parser from a token stream.
    fn new(lexemes: Vec<Lexeme>, search_type: SearchType) -> Self {
        Self {
            lexemes,
            position: 0,
            search_type,
        }
    }

    /// Parses the token stream into a query.
    fn parse(mut self) -> Result<Query, ParseError> {
        if self.lexemes.is_empty() {
            return Ok(Query::new());
        }

        let nodes = self.parse_or_expr()?;

        if let Some(lexeme) = self.peek() {
            let message = match lexeme.token {
                Token::RParen => "unexpected closing parenthesis".to_string(),
                ref other => format!("unexpected token: {other:?}"),
            };
            return Err(ParseError::new(message, Some(lexeme.span.start)));
        }

        Ok(Query::from(nodes))
    }

    /// Parses: or_expr → and_expr ("or" and_expr)*
    ///
    /// Returns the operands of a conjunction when no `or` is present.
    fn parse_or_expr(&mut self) -> Result<Vec<Node>, ParseError> {
        let first = self.parse_and_expr()?;
        if !self.check(&Token::Or) {
            return Ok(first);
        }

        let mut branches = vec![conjunction(first)];
        while self.check(&Token::Or) {
            self.advance(); // consume or
            branches.push(conjunction(self.parse_and_expr()?));
        }

        Ok(vec![Node::Operator(Operator {
            kind: OperatorKind::Or,
            operands: branches,
        })])
    }

    /// Parses: and_expr → unary (("and")? unary)*
    fn parse_and_expr(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut nodes = vec![self.parse_unary()?];

        loop {
            if self.check(&Token::And) {
                self.advance(); // consume and
                nodes.push(self.parse_unary()?);
            } else if self.can_start_unary() {
                nodes.push(self.parse_unary()?);
            } else {
                break;
            }
        }

        Ok(nodes)
    }

    /// Checks if the current token can start a unary expression.
    fn can_start_unary(&self) -> bool {
        matches!(
            self.peek().map(|l| &l.token),
            Some(Token::Pattern { .. } | Token::Parameter { .. } | Token::Not | Token::LParen)
        )
    }

    /// Parses: unary → "not" unary | primary
    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        let Some(lexeme) = self.peek() else {
            return Err(ParseError::new("unexpected end of query", None));
        };

        if lexeme.token == Token::Not {
            let position = lexeme.span.start;
            self.advance(); // consume not
            return match self.parse_unary()? {
                Node::Parameter(mut p) => {
                    p.negated = !p.negated;
                    Ok(Node::Parameter(p))
                }
                Node::Pattern(mut p) => {
                    p.negated = !p.negated;
                    Ok(Node::Pattern(p))
                }
                Node::Operator(_) => Err(ParseError::new(
                    "not cannot be applied to a group",
                    Some(position),
                )),
            };
        }

        self.parse_primary()
    }

    /// Parses: primary → PATTERN | PARAMETER | "(" or_expr ")"
    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let Some(Lexeme { token, span }) = self.peek().cloned() else {
            return Err(ParseError::new("unexpected end of query", None));
        };

        match token {
            Token::Pattern { value, quoted } => {
                self.advance();
                let labels = if quoted {
                    Labels::QUOTED | Labels::LITERAL
                } else {
                    match self.search_type {
                        SearchType::Regex => Labels::REGEXP,
                        SearchType::Literal => Labels::LITERAL,
                    }
                };
                Ok(Node::Pattern(
                    Pattern::new(value).with_annotation(Annotation { labels, span }),
                ))
            }

            Token::Parameter {
                field,
                value,
                negated,
                quoted,
            } => {
                self.advance();
                Ok(Node::Parameter(parameter(field, value, negated, quoted, span)))
            }

            Token::LParen => self.parse_group(span),

            Token::RParen => Err(ParseError::new(
                "unexpected closing parenthesis",
                Some(span.start),
            )),

            Token::Or => Err(ParseError::new(
                "unexpected or (needs expression before it)",
                Some(span.start),
            )),

            Token::And => Err(ParseError::new(
                "unexpected and (needs expression before it)",
                Some(span.start),
            )),

            // parse_unary consumes every leading not
            Token::Not => Err(ParseError::new("unexpected not", Some(span.start))),
        }
    }

    /// Parses a parenthesised group, consuming the surrounding parentheses.
    fn parse_group(&mut self, open: Span) -> Result<Node, ParseError> {
        self.advance(); // consume (

        if self.check(&Token::RParen) {
            return Err(ParseError::new("empty group", Some(open.start)));
        }

        let inner = self.parse_or_expr()?;

        if !self.check(&Token::RParen) {
            return Err(ParseError::new(
                "expected closing parenthesis",
                Some(open.start),
            ));
        }
        self.advance(); // consume )

        Ok(conjunction(inner))
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Lexeme> {
        self.lexemes.get(self.position)
    }

    /// Checks if the current token is exactly `token`.
    fn check(&self, token: &Token) -> bool {
        self.peek().is_some_and(|l| &l.token == token)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.lexemes.len() {
            self.position += 1;
        }
    }
}

/// Collapses a conjunction into a single node.
fn conjunction(mut nodes: Vec<Node>) -> Node {
    if nodes.len() == 1 {
        return nodes.remove(0);
    }
    Node::Operator(Operator {
        kind: OperatorKind::And,
        operands: nodes,
    })
}

/// Builds a parameter node, labelling predicate-shaped values.
fn parameter(field: String, value: String, negated: bool, quoted: bool, span: Span) -> Parameter {
    let mut labels = Labels::NONE;
    if quoted {
        labels |= Labels::QUOTED;
    } else if parse_as_predicate(&value).is_ok() {
        labels |= Labels::IS_PREDICATE;
    }

    Parameter::new(field, value)
        .with_negated(negated)
        .with_annotation(Annotation { labels, span })
}

/// Parses a query string into a [`Query`].
///
/// Returns an empty query for blank input.
pub fn parse(input: &str, search_type: SearchType) -> Result<Query, QueryError> {
    let lexemes = tokenize(input).map_err(QueryError::from)?;
    Parser::new(lexemes, search_type)
        .parse()
        .map_err(|e| QueryError::from(e).with_query(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FIELD_FILE, FIELD_REPO};

    fn parse_regex(input: &str) -> Query {
        parse(input, SearchType::Regex).unwrap()
    }

    /// Strips annotations so structural assertions stay readable.
    fn strip(nodes: &[Node]) -> Vec<Node> {
        nodes
            .iter()
            .map(|node| match node {
                Node::Parameter(p) => {
                    Node::Parameter(p.clone().with_annotation(Annotation::default()))
                }
                Node::Pattern(p) => Node::Pattern(Pattern {
                    annotation: Annotation::default(),
                    ..p.clone()
                }),
                Node::Operator(op) => Node::Operator(Operator {
                    kind: op.kind,
                    operands: strip(&op.operands),
                }),
            })
            .collect()
    }

    fn pat(value: &str) -> Node {
        Pattern::new(value).into()
    }

    fn param(field: &str, value: &str) -> Node {
        Parameter::new(field, value).into()
    }

    fn op(kind: OperatorKind, operands: Vec<Node>) -> Node {
        Operator { kind, operands }.into()
    }

    #[test]
    fn empty_query() {
        assert!(parse_regex("").is_empty());
        assert!(parse_regex("   ").is_empty());
    }

    #[test]
    fn top_level_is_flat() {
        assert_eq!(
            strip(&parse_regex("repo:x file:y foo")),
            vec![param(FIELD_REPO, "x"), param(FIELD_FILE, "y"), pat("foo")]
        );
    }

    #[test]
    fn explicit_and_is_flat() {
        assert_eq!(
            strip(&parse_regex("a and b")),
            vec![pat("a"), pat("b")]
        );
    }

    #[test]
    fn or_produces_operator() {
        assert_eq!(
            strip(&parse_regex("a b or c")),
            vec![op(
                OperatorKind::Or,
                vec![op(OperatorKind::And, vec![pat("a"), pat("b")]), pat("c")]
            )]
        );
    }

    #[test]
    fn group_produces_and_operator() {
        assert_eq!(
            strip(&parse_regex("(a b) c")),
            vec![op(OperatorKind::And, vec![pat("a"), pat("b")]), pat("c")]
        );
    }

    #[test]
    fn single_item_group_unwraps() {
        assert_eq!(strip(&parse_regex("(a)")), vec![pat("a")]);
    }

    #[test]
    fn not_negates_parameter_and_pattern() {
        let query = parse_regex("not file:x not foo");
        assert_eq!(
            strip(&query),
            vec![
                Parameter::new(FIELD_FILE, "x").with_negated(true).into(),
                Node::Pattern(Pattern {
                    negated: true,
                    ..Pattern::new("foo")
                }),
            ]
        );
    }

    #[test]
    fn not_on_group_is_error() {
        let err = parse("not (a or b)", SearchType::Regex).unwrap_err();
        assert!(err.message().contains("group"));
        assert_eq!(err.position(), Some(0));
    }

    #[test]
    fn annotations_record_labels_and_spans() {
        let query = parse_regex("repo:contains(file:a) \"x y\" z");
        let Node::Parameter(p) = &query[0] else {
            panic!("expected parameter");
        };
        assert!(p.annotation.labels.contains(Labels::IS_PREDICATE));
        assert_eq!(p.annotation.span, Span::new(0, 21));

        let Node::Pattern(quoted) = &query[1] else {
            panic!("expected pattern");
        };
        assert!(quoted.annotation.labels.contains(Labels::QUOTED));
        assert!(quoted.annotation.labels.contains(Labels::LITERAL));

        let Node::Pattern(bare) = &query[2] else {
            panic!("expected pattern");
        };
        assert_eq!(bare.annotation.labels, Labels::REGEXP);
    }

    #[test]
    fn literal_dialect_labels_patterns() {
        let query = parse("foo", SearchType::Literal).unwrap();
        let Node::Pattern(p) = &query[0] else {
            panic!("expected pattern");
        };
        assert_eq!(p.annotation.labels, Labels::LITERAL);
    }

    #[test]
    fn quoted_predicate_value_is_not_labelled() {
        let query = parse_regex("repo:\"contains(file:a)\"");
        let p = query[0].as_parameter().unwrap();
        assert!(!p.annotation.labels.contains(Labels::IS_PREDICATE));
        assert!(p.annotation.labels.contains(Labels::QUOTED));
    }

    #[test]
    fn error_unclosed_paren() {
        let err = parse("(a b", SearchType::Regex).unwrap_err();
        assert!(err.message().contains("closing parenthesis"));
        assert_eq!(err.query.as_deref(), Some("(a b"));
    }

    #[test]
    fn error_unexpected_rparen() {
        let err = parse("a)", SearchType::Regex).unwrap_err();
        assert!(err.message().contains("unexpected closing parenthesis"));
        assert_eq!(err.position(), Some(1));
    }

    #[test]
    fn error_or_at_start() {
        let err = parse("or a", SearchType::Regex).unwrap_err();
        assert!(err.message().contains("unexpected or"));
    }

    #[test]
    fn error_or_at_end() {
        let err = parse("a or", SearchType::Regex).unwrap_err();
        assert!(err.message().contains("end of query"));
    }

    #[test]
    fn error_empty_group() {
        let err = parse("()", SearchType::Regex).unwrap_err();
        assert!(err.message().contains("empty group"));
    }

    #[test]
    fn error_lex_propagates() {
        let err = parse("file:", SearchType::Regex).unwrap_err();
        assert!(err.message().contains("missing value"));
    }

    #[test]
    fn unbalanced_paren_in_word_is_error() {
        let err = parse("TODO( repo:x", SearchType::Regex).unwrap_err();
        assert!(err.message().contains("unbalanced parenthesis"));
        assert_eq!(err.position(), Some(4));
    }

    #[test]
    fn quoted_paren_inside_predicate() {
        let query = parse_regex(r#"repo:contains(content:"a)b")"#);
        let p = query[0].as_parameter().unwrap();
        assert_eq!(p.value, r#"contains(content:"a)b")"#);
        assert!(p.annotation.labels.contains(Labels::IS_PREDICATE));
    }

    /// Labels of every top-level node, for comparing re-parsed queries.
    fn labels(query: &Query) -> Vec<Labels> {
        query
            .iter()
            .map(|node| match node {
                Node::Parameter(p) => p.annotation.labels,
                Node::Pattern(p) => p.annotation.labels,
                Node::Operator(_) => Labels::NONE,
            })
            .collect()
    }

    #[test]
    fn display_reparses_to_same_query() {
        for text in [
            r#"repo:contains(content:"a b")"#,
            r#"repo:contains(content:"a)b") x"#,
            r#"file:"a b" repo:x"#,
            r"a\ b -repo:^y$",
            r#"\"x 'y z'"#,
        ] {
            let query = parse_regex(text);
            let reparsed = parse_regex(&query.to_string());
            assert_eq!(strip(&reparsed), strip(&query), "{text}");
            assert_eq!(labels(&reparsed), labels(&query), "{text}");
        }
    }

    #[test]
    fn regex_pattern_with_space_displays_escaped() {
        let query = Query::from(vec![Node::from(Pattern::new("a b").with_annotation(
            Annotation {
                labels: Labels::REGEXP,
                ..Annotation::default()
            },
        ))]);
        assert_eq!(query.to_string(), r"a\ b");

        let reparsed = parse_regex(&query.to_string());
        assert_eq!(strip(&reparsed), vec![pat("a b")]);
        assert!(labels(&reparsed)[0].contains(Labels::REGEXP));
    }

    #[test]
    fn display_round_trip() {
        let text = "select:repo -repo:^y$ repo:contains(file:a content:b) (a or b) \"x y\"";
        let query = parse_regex(text);
        assert_eq!(query.to_string(), text);
        assert_eq!(strip(&parse_regex(&query.to_string())), strip(&query));
    }
}
