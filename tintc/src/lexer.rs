//! Lexer for Tint source files.

use logos::{FilterResult, Logos};

use crate::span::Span;

/// Token kinds. Newlines are kept because they terminate attribute values;
/// other whitespace and comments are skipped.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\f]+|//[^\n]*|#[ \t][^\n]*")]
pub enum TokenKind {
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("=")]
    Eq,
    #[token("\n")]
    Newline,
    /// Never emitted: the callback skips the comment or fails.
    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r"[A-Za-z_][A-Za-z0-9_-]*")]
    Ident,
    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,
    /// A bare `#`-prefixed literal; digit validation happens at evaluation.
    #[regex(r"#[0-9A-Za-z]+")]
    Hex,

    /// Input the lexer could not match.
    Error,
    Eof,
}

impl TokenKind {
    /// Human-readable description used in syntax errors.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::Comma => "`,`",
            TokenKind::Dot => "`.`",
            TokenKind::Eq => "`=`",
            TokenKind::Newline => "end of line",
            TokenKind::BlockComment => "comment",
            TokenKind::Ident => "identifier",
            TokenKind::Number => "number",
            TokenKind::Str => "string",
            TokenKind::Hex => "hex color",
            TokenKind::Error => "invalid character",
            TokenKind::Eof => "end of file",
        }
    }
}

/// Skips a `/* ... */` comment. An unterminated comment swallows the rest
/// of the input as one error token.
fn block_comment(lex: &mut logos::Lexer<TokenKind>) -> FilterResult<(), ()> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            FilterResult::Skip
        }
        None => {
            lex.bump(lex.remainder().len());
            FilterResult::Error(())
        }
    }
}

/// A token with its source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Tokenizes `source`. The result always ends with an [`TokenKind::Eof`]
/// token; unmatched input becomes [`TokenKind::Error`] tokens.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = TokenKind::lexer(source)
        .spanned()
        .map(|(kind, range)| Token {
            kind: kind.unwrap_or(TokenKind::Error),
            span: Span::new(range.start, range.end),
        })
        .collect();
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::point(source.len()),
    });
    tokens
}
