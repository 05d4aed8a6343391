//! logos-based CSS tokenizer.
//!
//! The tokenizer only finds structure: block delimiters, statement ends,
//! parentheses, strings, and at-keywords. Selector and value text is sliced
//! straight from the source by the parser, so everything else is lexed as
//! opaque [`Token::Text`] runs.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `@media` as AtKeyword)
//! 2. For equal length matches, earlier-defined variants win

use logos::Logos;

/// CSS token produced by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    /// At-rule keyword: `@media`, `@supports`, `@font-face`.
    #[regex(r"@[a-zA-Z_-][a-zA-Z0-9_-]*")]
    AtKeyword,

    /// Double-quoted string literal, backslash escapes allowed.
    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLiteral,

    /// Single-quoted string literal, backslash escapes allowed.
    #[regex(r"'([^'\\]|\\.)*'")]
    StringLiteralSingle,

    /// Any run of characters that is not whitespace or structural punctuation.
    #[regex(r#"[^{}();"'@ \t\n\r\f][^{}();"'@ \t\n\r\f]*"#)]
    Text,

    /// `{`
    #[token("{")]
    BraceOpen,

    /// `}`
    #[token("}")]
    BraceClose,

    /// `;`
    #[token(";")]
    Semicolon,

    /// `(`
    #[token("(")]
    ParenOpen,

    /// `)`
    #[token(")")]
    ParenClose,
}

/// Tokenize a CSS string into a vector of `(Token, String)` pairs.
///
/// Characters that fail to lex are skipped.
pub fn tokenize(input: &str) -> Vec<(Token, String)> {
    let lexer = Token::lexer(input);
    lexer
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, input[span].to_string())))
        .collect()
}
