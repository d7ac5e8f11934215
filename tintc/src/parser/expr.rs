//! Expression parsing.

use super::Parser;
use crate::ast::{Expr, ExprKind};
use crate::diagnostics::codes;
use crate::lexer::TokenKind;

impl<'src> Parser<'src> {
    /// Parse an expression. Returns `None` after recording a syntax error.
    #[must_use = "parsing has no effect if the result is not used"]
    pub(super) fn parse_expr(&mut self) -> Option<Expr> {
        let token = self.current();

        match token.kind {
            TokenKind::Str => {
                self.advance();
                let raw = self.text(token.span);
                let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("");
                Some(Expr {
                    kind: ExprKind::Str(unescape(inner)),
                    span: token.span,
                })
            }

            TokenKind::Hex => {
                self.advance();
                Some(Expr {
                    kind: ExprKind::Hex(self.text(token.span).to_string()),
                    span: token.span,
                })
            }

            TokenKind::Number => {
                self.advance();
                match self.text(token.span).parse::<f64>() {
                    Ok(value) => Some(Expr {
                        kind: ExprKind::Number(value),
                        span: token.span,
                    }),
                    Err(_) => {
                        self.error(codes::UNEXPECTED_TOKEN, "malformed number", token.span);
                        None
                    }
                }
            }

            TokenKind::Ident if self.peek_kind() == TokenKind::LParen => self.parse_call(),

            TokenKind::Ident => {
                let text = self.text(token.span);
                if matches!(text, "true" | "false") && self.peek_kind() != TokenKind::Dot {
                    self.advance();
                    return Some(Expr {
                        kind: ExprKind::Bool(text == "true"),
                        span: token.span,
                    });
                }
                self.parse_path()
            }

            _ => {
                self.unexpected("expression");
                None
            }
        }
    }

    /// Parse `ident ('.' ident)*`.
    fn parse_path(&mut self) -> Option<Expr> {
        let first = self.advance();
        let mut segments = vec![self.ident(first)];

        while self.check(TokenKind::Dot) {
            let dot = self.advance();
            if self.check(TokenKind::Ident) {
                let segment = self.advance();
                segments.push(self.ident(segment));
            } else {
                self.error(
                    codes::EXPECTED_IDENT_AFTER_DOT,
                    "invalid attribute name: expected identifier after dot",
                    dot.span,
                );
                return None;
            }
        }

        let span = first.span.merge(self.previous_span());
        Some(Expr {
            kind: ExprKind::Path(segments),
            span,
        })
    }

    /// Parse `ident '(' args ')'`. Newlines inside the parentheses are ignored.
    fn parse_call(&mut self) -> Option<Expr> {
        let name_token = self.advance();
        let name = self.ident(name_token);
        self.advance(); // `(`

        let mut args = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenKind::RParen) {
                break;
            }
            args.push(self.parse_expr()?);
            self.skip_newlines();
            if self.try_consume(TokenKind::Comma) {
                continue;
            }
            if !self.check(TokenKind::RParen) {
                self.unexpected("`,` or `)`");
                return None;
            }
        }

        let close = self.advance().span;
        Some(Expr {
            kind: ExprKind::Call { name, args },
            span: name_token.span.merge(close),
        })
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
