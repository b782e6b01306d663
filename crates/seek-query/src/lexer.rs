//! Query lexer (tokenizer).
//!
//! Converts a query string into a stream of spanned tokens for the parser.
//!
//! Bare words and parameter values end at whitespace or an unmatched `)`. Parentheses
//! inside a word are tracked so that `repo:contains(file:a content:b)` stays a single
//! parameter token, and a backslash escapes the following character. A `(` left open at
//! the end of input is an error rather than swallowing the rest of the query.

use std::{iter::Peekable, str::Chars};

use crate::{
    ast::{FIELD_FILE, FIELD_REPO, Span},
    error::LexError,
};

/// A token in the query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A search pattern; quoted patterns have their quotes stripped.
    Pattern {
        /// Pattern text.
        value: String,
        /// Whether the pattern was quoted.
        quoted: bool,
    },

    /// A `field:value` parameter, optionally negated with a leading `-`.
    Parameter {
        /// Field name with aliases resolved.
        field: String,
        /// Field value; quoted values have their quotes stripped.
        value: String,
        /// Whether the parameter had a leading `-`.
        negated: bool,
        /// Whether the value was quoted.
        quoted: bool,
    },

    /// The `and` keyword.
    And,

    /// The `or` keyword.
    Or,

    /// The `not` keyword.
    Not,

    /// Left parenthesis.
    LParen,

    /// Right parenthesis.
    RParen,
}

/// A token with its byte span in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    /// The token.
    pub token: Token,
    /// Byte range the token covers.
    pub span: Span,
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Creates an error at a specific position.
    fn error_at(&self, message: impl Into<String>, position: usize) -> LexError {
        LexError::new(message, position, self.input)
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Lexeme>, LexError> {
        let mut lexemes = Vec::new();

        loop {
            self.skip_whitespace();
            let start = self.position;
            let Some(token) = self.next_token()? else {
                break;
            };
            lexemes.push(Lexeme {
                token,
                span: Span::new(start, self.position),
            });
        }

        Ok(lexemes)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };

        match ch {
            '(' => {
                self.advance();
                Ok(Some(Token::LParen))
            }
            ')' => {
                self.advance();
                Ok(Some(Token::RParen))
            }
            _ if is_quote(ch) => {
                let value = self.read_quoted()?;
                Ok(Some(Token::Pattern {
                    value,
                    quoted: true,
                }))
            }
            _ => self.read_word_or_parameter().map(Some),
        }
    }

    /// Reads a keyword, a bare pattern, or a `field:value` parameter.
    fn read_word_or_parameter(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let (word, is_field) = self.read_bare(true)?;

        if is_field {
            return self.read_parameter_value(start, &word);
        }

        if word.eq_ignore_ascii_case("and") {
            Ok(Token::And)
        } else if word.eq_ignore_ascii_case("or") {
            Ok(Token::Or)
        } else if word.eq_ignore_ascii_case("not") {
            Ok(Token::Not)
        } else {
            Ok(Token::Pattern {
                value: word,
                quoted: false,
            })
        }
    }

    /// Reads the value following `prefix:`; the colon is already consumed.
    fn read_parameter_value(&mut self, start: usize, prefix: &str) -> Result<Token, LexError> {
        let (negated, field) = match prefix.strip_prefix('-') {
            Some(field) => (true, field),
            None => (false, prefix),
        };
        let field = canonical_field(field);

        let (value, quoted) = match self.chars.peek() {
            Some('"' | '\'') => (self.read_quoted()?, true),
            _ => (self.read_bare(false)?.0, false),
        };

        if value.is_empty() && !quoted {
            return Err(self.error_at(format!("missing value for field '{field}'"), start));
        }

        Ok(Token::Parameter {
            field,
            value,
            negated,
            quoted,
        })
    }

    /// Reads an unquoted run of text.
    ///
    /// Stops at whitespace or `)` outside of nested parentheses. With `detect_field`, also
    /// stops after a colon that follows a valid field name, returning `true`.
    ///
    /// Inside parentheses, quoted runs are copied verbatim so their contents cannot close
    /// the group. Outside them, `\` before whitespace or a quote yields that character alone.
    fn read_bare(&mut self, detect_field: bool) -> Result<(String, bool), LexError> {
        let mut text = String::new();
        let mut open = Vec::new();

        while let Some(&ch) = self.chars.peek() {
            if open.is_empty() {
                if ch.is_whitespace() || ch == ')' {
                    break;
                }
                if detect_field && ch == ':' && is_field_name(&text) {
                    self.advance(); // consume the colon
                    return Ok((text, true));
                }
            } else if is_quote(ch) && text.ends_with([':', '(', ' ', '\t']) {
                self.copy_quoted(&mut text)?;
                continue;
            }

            let at = self.position;
            self.advance();
            match ch {
                '(' => {
                    open.push(at);
                    text.push(ch);
                }
                ')' => {
                    open.pop();
                    text.push(ch);
                }
                '\\' => match self.chars.peek().copied() {
                    Some(next) if open.is_empty() && (next.is_whitespace() || is_quote(next)) => {
                        self.advance();
                        text.push(next);
                    }
                    Some(next) => {
                        self.advance();
                        text.push(ch);
                        text.push(next);
                    }
                    None => text.push(ch),
                },
                _ => text.push(ch),
            }
        }

        match open.first() {
            Some(&at) => Err(self.error_at("unbalanced parenthesis", at)),
            None => Ok((text, false)),
        }
    }

    /// Appends a quoted run, quotes and escapes included, to `text`.
    fn copy_quoted(&mut self, text: &mut String) -> Result<(), LexError> {
        let start = self.position;
        let Some(&quote) = self.chars.peek() else {
            return Ok(());
        };
        self.advance();
        text.push(quote);

        while let Some(&ch) = self.chars.peek() {
            self.advance();
            text.push(ch);
            if ch == quote {
                return Ok(());
            }
            if ch == '\\'
                && let Some(&next) = self.chars.peek()
            {
                self.advance();
                text.push(next);
            }
        }
        Err(self.error_at("unclosed quote", start))
    }

    /// Reads a single- or double-quoted string, honouring backslash escapes.
    fn read_quoted(&mut self) -> Result<String, LexError> {
        let start_pos = self.position;
        let Some(quote) = self.chars.peek().copied() else {
            return Err(self.error_at("expected quote", start_pos));
        };
        self.advance(); // consume opening quote

        let mut content = String::new();

        loop {
            match self.chars.peek().copied() {
                Some(ch) if ch == quote => {
                    self.advance(); // consume closing quote
                    return Ok(content);
                }
                Some('\\') => {
                    self.advance();
                    match self.chars.peek().copied() {
                        Some(escaped) => {
                            content.push(escaped);
                            self.advance();
                        }
                        None => return Err(self.error_at("unclosed quote", start_pos)),
                    }
                }
                Some(ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => return Err(self.error_at("unclosed quote", start_pos)),
            }
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Returns true for `name` or `-name` where name is `[A-Za-z][A-Za-z0-9_]*`.
fn is_field_name(text: &str) -> bool {
    let name = text.strip_prefix('-').unwrap_or(text);
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Returns true for characters that open a quoted string.
const fn is_quote(ch: char) -> bool {
    matches!(ch, '"' | '\'')
}

/// Resolves single-letter field aliases.
fn canonical_field(field: &str) -> String {
    if field.eq_ignore_ascii_case("r") {
        FIELD_REPO.to_string()
    } else if field.eq_ignore_ascii_case("f") {
        FIELD_FILE.to_string()
    } else {
        field.to_string()
    }
}

/// Convenience function to tokenize a query string.
pub fn tokenize(input: &str) -> Result<Vec<Lexeme>, LexError> {
    Lexer::new(input).tokenize()
}
