//! Recursive descent parser for Tint source files.
//!
//! The parser never gives up: syntax errors are recorded as diagnostics and
//! the parser resynchronizes at the next line or closing brace, so a partial
//! tree is always available for analysis and editor features.

mod expr;

use crate::ast::{Attribute, Block, Body, Ident};
use crate::diagnostics::{codes, Diagnostic};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::span::Span;

/// The output of a parse: a (possibly partial) tree plus syntax errors.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub body: Body,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses `source` into an attribute/block tree.
pub fn parse(source: &str) -> ParseResult {
    Parser::new(source).parse()
}

pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: tokenize(source),
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn parse(mut self) -> ParseResult {
        let body = self.parse_body(false);
        ParseResult {
            body,
            diagnostics: self.diagnostics,
        }
    }

    fn current(&self) -> Token {
        // `tokenize` always ends with Eof and we never advance past it.
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos + 1)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span)
            .unwrap_or_default()
    }

    fn advance(&mut self) -> Token {
        let token = self.current();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn try_consume(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn text(&self, span: Span) -> &'src str {
        span.slice(self.source).unwrap_or("")
    }

    fn ident(&self, token: Token) -> Ident {
        Ident {
            name: self.text(token.span).to_string(),
            span: token.span,
        }
    }

    fn skip_newlines(&mut self) {
        while self.try_consume(TokenKind::Newline) {}
    }

    fn error(&mut self, code: &'static str, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::syntax(code, message, span));
    }

    fn unexpected(&mut self, expected: &str) {
        let token = self.current();
        let (code, found) = match token.kind {
            TokenKind::Error if self.text(token.span).starts_with("/*") => {
                (codes::INVALID_CHARACTER, "unterminated block comment".to_string())
            }
            TokenKind::Error => (codes::INVALID_CHARACTER, format!("`{}`", self.text(token.span))),
            kind => (codes::UNEXPECTED_TOKEN, kind.describe().to_string()),
        };
        self.error(code, format!("expected {expected}, found {found}"), token.span);
    }

    /// Skips to the next newline or closing brace without consuming the brace.
    fn recover_line(&mut self) {
        while !matches!(
            self.current().kind,
            TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof
        ) {
            self.advance();
        }
    }

    /// Parses items until `}` (when `nested`) or end of file.
    fn parse_body(&mut self, nested: bool) -> Body {
        let mut body = Body::default();
        loop {
            self.skip_newlines();
            match self.current().kind {
                TokenKind::Eof => break,
                TokenKind::RBrace if nested => break,
                TokenKind::RBrace => {
                    let span = self.advance().span;
                    self.error(codes::UNMATCHED_CLOSING, "unmatched `}`", span);
                }
                TokenKind::Ident => self.parse_item(&mut body),
                _ => {
                    self.unexpected("attribute or block");
                    self.advance();
                    self.recover_line();
                }
            }
        }
        body
    }

    fn parse_item(&mut self, body: &mut Body) {
        let name_token = self.advance();
        let name = self.ident(name_token);

        match self.current().kind {
            TokenKind::Eq => {
                self.advance();
                if let Some(attribute) = self.parse_attribute_value(name) {
                    body.attributes.push(attribute);
                }
            }
            TokenKind::LBrace => {
                let block = self.parse_block(name);
                body.blocks.push(block);
            }
            _ => {
                self.unexpected(&format!("`=` or `{{` after `{}`", name.name));
                self.recover_line();
            }
        }
    }

    fn parse_attribute_value(&mut self, name: Ident) -> Option<Attribute> {
        if matches!(
            self.current().kind,
            TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof
        ) {
            let span = self.current().span;
            self.error(
                codes::EXPECTED_EXPRESSION,
                format!("expected a value for `{}`", name.name),
                span,
            );
            return None;
        }

        let Some(value) = self.parse_expr() else {
            self.recover_line();
            return None;
        };

        if !matches!(
            self.current().kind,
            TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof
        ) {
            self.unexpected("end of line after attribute value");
            self.recover_line();
        }

        let span = name.span.merge(value.span);
        Some(Attribute { name, value, span })
    }

    fn parse_block(&mut self, kind: Ident) -> Block {
        let open = self.advance().span;
        let body = self.parse_body(true);
        if self.check(TokenKind::RBrace) {
            let close = self.advance().span;
            let span = kind.span.merge(close);
            Block { kind, body, span }
        } else {
            self.error(
                codes::UNCLOSED_BLOCK,
                format!("unclosed block `{}`", kind.name),
                open,
            );
            let span = kind.span.merge(self.previous_span());
            Block { kind, body, span }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_line_block() {
        let result = parse(r##"palette { base = "#191724" }"##);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

        let palette = &result.body.blocks[0];
        assert_eq!(palette.kind.name, "palette");
        assert_eq!(palette.span, Span::new(0, 28));

        let base = &palette.body.attributes[0];
        assert_eq!(base.name.name, "base");
        assert_eq!(base.value.kind, ExprKind::Str("#191724".into()));
        assert_eq!(base.value.span, Span::new(17, 26));
    }

    #[test]
    fn test_nested_blocks_and_references() {
        let source = r##"
palette {
  base = "#191724"
  highlight {
    color = "#21202e"
    low = #403d52
  }
}
theme {
  background = palette.base
  accent = darken(palette.highlight.low, 10)
}
"##;
        let result = parse(source);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(result.body.blocks.len(), 2);

        let highlight = &result.body.blocks[0].body.blocks[0];
        assert_eq!(highlight.kind.name, "highlight");
        assert_eq!(highlight.body.attributes[1].value.kind, ExprKind::Hex("#403d52".into()));

        let theme = &result.body.blocks[1].body;
        assert_eq!(theme.attributes[0].value.path_string().as_deref(), Some("palette.base"));
        match &theme.attributes[1].value.kind {
            ExprKind::Call { name, args } => {
                assert_eq!(name.name, "darken");
                assert_eq!(args.len(), 2);
                assert_eq!(args[1].kind, ExprKind::Number(10.0));
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_dot_reports_distinct_code() {
        let result = parse("theme {\n  fg = palette.\n  bg = palette.base\n}");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, codes::EXPECTED_IDENT_AFTER_DOT);

        // The sibling after the broken line still parses.
        let theme = &result.body.blocks[0].body;
        assert_eq!(theme.attributes.len(), 1);
        assert_eq!(theme.attributes[0].name.name, "bg");
    }

    #[test]
    fn test_block_comments_inside_blocks() {
        let source = "palette {\n  /* accent */\n  base = \"#191724\"\n  /* multi\n     line */\n  text = #e0def4\n}";
        let result = parse(source);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(result.body.blocks[0].body.attributes.len(), 2);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let result = parse("palette {\n  base = \"#191724\"\n  /* open\n}");
        assert_eq!(result.diagnostics[0].code, codes::INVALID_CHARACTER);
        assert_eq!(
            result.diagnostics[0].message,
            "expected attribute or block, found unterminated block comment"
        );
    }

    #[test]
    fn test_missing_value_recovers() {
        let result = parse("palette {\n  base =\n  text = \"#e0def4\"\n}");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, codes::EXPECTED_EXPRESSION);
        assert_eq!(result.body.blocks[0].body.attributes.len(), 1);
    }

    #[test]
    fn test_unclosed_block_keeps_partial_body() {
        let result = parse("palette {\n  base = \"#191724\"\n");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, codes::UNCLOSED_BLOCK);
        assert_eq!(result.body.blocks[0].body.attributes.len(), 1);
    }

    #[test]
    fn test_unmatched_closing_brace() {
        let result = parse("}\npalette {}");
        assert_eq!(result.diagnostics[0].code, codes::UNMATCHED_CLOSING);
        assert_eq!(result.body.blocks.len(), 1);
    }

    #[test]
    fn test_string_escapes() {
        let result = parse(r#"meta { name = "Ros\"e\\Pine" }"#);
        assert_eq!(
            result.body.blocks[0].body.attributes[0].value.kind,
            ExprKind::Str("Ros\"e\\Pine".into())
        );
    }
}
