//! Recursive descent CSS parser.
//!
//! Parses CSS text into a [`StyleSheet`] rule tree. Uses the logos-based
//! tokenizer from [`crate::css::tokenizer`] to find statement boundaries and
//! slices selector, condition, and value text directly from the source.
//!
//! A statement ending in `{` is a rule; one ending in `;` or `}` is a
//! declaration (or a block-less at-rule such as `@import`). This is how
//! nested rules are told apart from declarations.

use logos::Logos;

use crate::css::model::*;
use crate::css::normalize;
use crate::css::tokenizer::Token;

/// Errors from CSS parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token at position {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
    #[error("invalid token at byte {offset}: '{text}'")]
    InvalidToken { offset: usize, text: String },
}

/// A positioned token with byte-level span information.
#[derive(Debug, Clone, Copy)]
struct PToken {
    token: Token,
    /// Index in the token stream (for error reporting).
    pos: usize,
    /// Byte offset where this token starts in the source.
    byte_start: usize,
    /// Byte offset where this token ends in the source.
    byte_end: usize,
}

/// Strip CSS block comments (`/* ... */`) from the input, replacing each
/// comment with a single space. Comment markers inside quoted strings are kept.
fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    let mut segment_start = 0;
    let mut quote: Option<u8> = None;

    while i < len {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match b {
            b'"' | b'\'' => {
                quote = Some(b);
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                result.push_str(&input[segment_start..i]);
                result.push(' ');
                // Unterminated comment: consume the rest of the input.
                let end = input[i + 2..]
                    .find("*/")
                    .map_or(len, |offset| i + 2 + offset + 2);
                i = end;
                segment_start = end;
            }
            _ => i += 1,
        }
    }

    if segment_start < len {
        result.push_str(&input[segment_start..]);
    }
    result
}

/// Tokenize input using logos with span information preserved.
///
/// Text the lexer cannot match, such as a bare `@` or an unterminated string,
/// is an error.
fn tokenize_with_spans(input: &str) -> Result<Vec<PToken>, ParseError> {
    let lexer = Token::lexer(input);
    let mut tokens = Vec::new();

    for (idx, (result, span)) in lexer.spanned().enumerate() {
        let Ok(token) = result else {
            return Err(ParseError::InvalidToken {
                offset: span.start,
                text: input[span].to_owned(),
            });
        };
        tokens.push(PToken {
            token,
            pos: idx,
            byte_start: span.start,
            byte_end: span.end,
        });
    }

    Ok(tokens)
}

/// Parse a CSS string into a [`StyleSheet`].
pub fn parse_stylesheet(input: &str) -> Result<StyleSheet, ParseError> {
    let cleaned = strip_comments(input);
    let tokens = tokenize_with_spans(&cleaned)?;

    let mut parser = Parser {
        source: &cleaned,
        tokens,
        cursor: 0,
    };
    let block = parser.parse_block(false)?;

    Ok(StyleSheet { rules: block.rules })
}

/// Contents of a `{ ... }` block, or of the whole stylesheet.
#[derive(Debug, Default)]
struct Block {
    declarations: Vec<Declaration>,
    rules: Vec<Rule>,
}

/// What ended a statement prelude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    BraceOpen,
    Semicolon,
    BraceClose,
    Eof,
}

/// The text before a `{`, `;`, or `}`.
#[derive(Debug, Clone, Copy)]
struct Prelude {
    /// Token index of the first token, for errors.
    pos: usize,
    byte_start: usize,
    byte_end: usize,
    /// Byte offset just past the at-keyword, if the statement starts with one.
    at_keyword_end: Option<usize>,
    terminator: Terminator,
}

/// Recursive descent parser state.
struct Parser<'a> {
    source: &'a str,
    tokens: Vec<PToken>,
    cursor: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<PToken> {
        self.tokens.get(self.cursor).copied()
    }

    fn advance(&mut self) -> Option<PToken> {
        let tok = self.peek()?;
        self.cursor += 1;
        Some(tok)
    }

    /// Parse statements until the closing `}` (nested) or end of input (top level).
    fn parse_block(&mut self, nested: bool) -> Result<Block, ParseError> {
        let mut block = Block::default();

        loop {
            let Some(tok) = self.peek() else {
                if nested {
                    return Err(ParseError::UnexpectedEof("expected '}' to close block".into()));
                }
                return Ok(block);
            };

            match tok.token {
                Token::BraceClose if nested => {
                    self.advance();
                    return Ok(block);
                }
                Token::BraceClose => {
                    return Err(ParseError::UnexpectedToken {
                        position: tok.pos,
                        message: "unmatched '}'".into(),
                    });
                }
                Token::Semicolon => {
                    self.advance();
                }
                _ => self.parse_statement(nested, &mut block)?,
            }
        }
    }

    /// Parse one rule or declaration into `block`.
    fn parse_statement(&mut self, nested: bool, block: &mut Block) -> Result<(), ParseError> {
        let prelude = self.scan_prelude();
        let source = self.source;
        let text = &source[prelude.byte_start..prelude.byte_end];

        match prelude.terminator {
            Terminator::BraceOpen => {
                if text.trim().is_empty() {
                    return Err(ParseError::UnexpectedToken {
                        position: prelude.pos,
                        message: "expected selector or at-rule before '{'".into(),
                    });
                }
                self.advance(); // consume '{'
                let body = self.parse_block(true)?;
                block.rules.push(self.build_rule(&prelude, body));
            }
            Terminator::Semicolon | Terminator::BraceClose | Terminator::Eof => {
                if prelude.terminator == Terminator::Semicolon {
                    self.advance();
                }
                if prelude.at_keyword_end.is_some() {
                    block.rules.push(self.build_rule(&prelude, Block::default()));
                } else if !nested {
                    return Err(ParseError::UnexpectedToken {
                        position: prelude.pos,
                        message: format!("declaration outside of a rule: '{}'", text.trim()),
                    });
                } else {
                    block.declarations.push(parse_declaration(text, prelude.pos)?);
                }
            }
        }

        Ok(())
    }

    /// Consume tokens up to (not including) the next `{`, `;`, or `}` outside
    /// parentheses.
    fn scan_prelude(&mut self) -> Prelude {
        let first = self.peek();
        let byte_start = first.map_or(self.source.len(), |t| t.byte_start);
        let mut prelude = Prelude {
            pos: first.map_or(self.tokens.len(), |t| t.pos),
            byte_start,
            byte_end: byte_start,
            at_keyword_end: first
                .filter(|t| t.token == Token::AtKeyword)
                .map(|t| t.byte_end),
            terminator: Terminator::Eof,
        };

        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            match tok.token {
                Token::BraceOpen if depth == 0 => {
                    prelude.terminator = Terminator::BraceOpen;
                    break;
                }
                Token::Semicolon if depth == 0 => {
                    prelude.terminator = Terminator::Semicolon;
                    break;
                }
                Token::BraceClose if depth == 0 => {
                    prelude.terminator = Terminator::BraceClose;
                    break;
                }
                Token::ParenOpen => depth += 1,
                Token::ParenClose => depth = depth.saturating_sub(1),
                _ => {}
            }
            prelude.byte_end = tok.byte_end;
            self.cursor += 1;
        }

        prelude
    }

    /// Build a style, media, or other at-rule from its prelude and body.
    fn build_rule(&self, prelude: &Prelude, body: Block) -> Rule {
        let Some(name_end) = prelude.at_keyword_end else {
            let text = &self.source[prelude.byte_start..prelude.byte_end];
            let selectors = normalize::split_top_level(text, ',')
                .into_iter()
                .map(|s| normalize::selector(s.trim()))
                .filter(|s| !s.is_empty())
                .collect();
            return Rule::Style(StyleRule {
                selectors,
                declarations: body.declarations,
                rules: body.rules,
            });
        };

        // Skip the '@'.
        let name = self.source[prelude.byte_start + 1..name_end].to_ascii_lowercase();
        let rest = self.source[name_end..prelude.byte_end.max(name_end)].trim();

        if name == "media" {
            Rule::Media(MediaRule {
                condition: normalize::media(rest),
                declarations: body.declarations,
                rules: body.rules,
            })
        } else {
            Rule::At(AtRule {
                name,
                prelude: rest.to_owned(),
                declarations: body.declarations,
                rules: body.rules,
            })
        }
    }
}

/// Parse a single declaration: `property: value [!important]`.
fn parse_declaration(text: &str, position: usize) -> Result<Declaration, ParseError> {
    let Some((property, value)) = text.split_once(':') else {
        return Err(ParseError::UnexpectedToken {
            position,
            message: format!("expected ':' in declaration '{}'", text.trim()),
        });
    };

    let property = property.trim();
    if property.is_empty() || property.contains(char::is_whitespace) {
        return Err(ParseError::UnexpectedToken {
            position,
            message: format!("expected property name, got '{property}'"),
        });
    }

    let (value, important) = split_important(value);
    Ok(Declaration::new(property, value, important))
}

/// Lift a trailing `!important` off a value.
fn split_important(value: &str) -> (&str, bool) {
    let trimmed = value.trim_end();
    if let Some(idx) = trimmed.rfind('!') {
        if trimmed[idx + 1..].trim().eq_ignore_ascii_case("important") {
            return (&trimmed[..idx], true);
        }
    }
    (value, false)
}
