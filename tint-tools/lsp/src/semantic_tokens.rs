//! Semantic Tokens Provider
//!
//! Walks the parsed attribute/block tree and emits typed, delta-encoded
//! tokens for syntax highlighting.

use tintc::ast::{Body, Expr, ExprKind};
use tintc::eval::BUILTIN_NAMES;
use tintc::{BlockTable, LineIndex, Span};
use tower_lsp::lsp_types::*;

/// Semantic token types for Tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum TokenType {
    Namespace = 0,
    Property = 1,
    Function = 2,
    Keyword = 3,
    String = 4,
    Number = 5,
}

impl TokenType {
    /// Returns all token types, in legend order.
    pub fn all() -> Vec<SemanticTokenType> {
        vec![
            SemanticTokenType::NAMESPACE,
            SemanticTokenType::PROPERTY,
            SemanticTokenType::FUNCTION,
            SemanticTokenType::KEYWORD,
            SemanticTokenType::STRING,
            SemanticTokenType::NUMBER,
        ]
    }
}

/// Semantic token modifiers for Tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenModifier {
    Declaration = 0,
    DefaultLibrary = 1,
}

impl TokenModifier {
    /// Returns all token modifiers, in legend order.
    pub fn all() -> Vec<SemanticTokenModifier> {
        vec![
            SemanticTokenModifier::DECLARATION,
            SemanticTokenModifier::DEFAULT_LIBRARY,
        ]
    }

    /// Returns the bitmask for this modifier.
    pub fn bitmask(&self) -> u32 {
        1 << (*self as u32)
    }
}

/// Returns the semantic tokens legend.
pub fn legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: TokenType::all(),
        token_modifiers: TokenModifier::all(),
    }
}

/// A token before position conversion and delta encoding.
#[derive(Debug, Clone, Copy)]
struct RawToken {
    span: Span,
    token_type: TokenType,
    modifiers: u32,
}

/// Provider for semantic tokens.
pub struct SemanticTokensProvider {
    blocks: BlockTable,
}

impl SemanticTokensProvider {
    pub fn new() -> Self {
        Self {
            blocks: BlockTable::standard(),
        }
    }

    /// Provides semantic tokens for the whole text.
    pub fn provide(&self, text: &str) -> SemanticTokens {
        let parsed = tintc::parse(text);
        let mut raw = Vec::new();
        self.walk_body(&parsed.body, &mut raw);

        let index = LineIndex::new(text);
        let mut positioned: Vec<_> = raw
            .into_iter()
            .filter_map(|token| {
                let start = index.position(text, token.span.start);
                let length = token.span.slice(text)?.chars().count() as u32;
                Some((start.line, start.character, length, token))
            })
            .collect();
        positioned.sort_by_key(|(line, character, _, _)| (*line, *character));

        let mut tokens = Vec::with_capacity(positioned.len());
        let mut prev_line = 0u32;
        let mut prev_char = 0u32;
        for (line, character, length, token) in positioned {
            self.add_token(
                &mut tokens,
                line,
                character,
                length,
                token.token_type as u32,
                token.modifiers,
                &mut prev_line,
                &mut prev_char,
            );
        }

        SemanticTokens {
            result_id: None,
            data: tokens,
        }
    }

    fn walk_body(&self, body: &Body, out: &mut Vec<RawToken>) {
        for block in &body.blocks {
            out.push(RawToken {
                span: block.kind.span,
                token_type: TokenType::Keyword,
                modifiers: 0,
            });
            self.walk_body(&block.body, out);
        }
        for attr in &body.attributes {
            out.push(RawToken {
                span: attr.name.span,
                token_type: TokenType::Property,
                modifiers: TokenModifier::Declaration.bitmask(),
            });
            self.walk_expr(&attr.value, out);
        }
    }

    fn walk_expr(&self, expr: &Expr, out: &mut Vec<RawToken>) {
        match &expr.kind {
            ExprKind::Path(segments) => {
                let Some((root, rest)) = segments.split_first() else {
                    return;
                };
                if !self.blocks.is_known(&root.name) {
                    return;
                }
                out.push(RawToken {
                    span: root.span,
                    token_type: TokenType::Namespace,
                    modifiers: 0,
                });
                out.extend(rest.iter().map(|segment| RawToken {
                    span: segment.span,
                    token_type: TokenType::Property,
                    modifiers: 0,
                }));
            }
            ExprKind::Call { name, args } => {
                let modifiers = if BUILTIN_NAMES.contains(&name.name.as_str()) {
                    TokenModifier::DefaultLibrary.bitmask()
                } else {
                    0
                };
                out.push(RawToken {
                    span: name.span,
                    token_type: TokenType::Function,
                    modifiers,
                });
                for arg in args {
                    self.walk_expr(arg, out);
                }
            }
            ExprKind::Number(_) => out.push(RawToken {
                span: expr.span,
                token_type: TokenType::Number,
                modifiers: 0,
            }),
            // Quoted strings are left to the client's grammar.
            ExprKind::Hex(hex) if is_hex_color(hex) => out.push(RawToken {
                span: expr.span,
                token_type: TokenType::String,
                modifiers: 0,
            }),
            ExprKind::Hex(_) | ExprKind::Str(_) | ExprKind::Bool(_) => {}
        }
    }

    /// Adds a token with delta encoding.
    #[allow(clippy::too_many_arguments)]
    fn add_token(
        &self,
        tokens: &mut Vec<SemanticToken>,
        line: u32,
        char: u32,
        length: u32,
        token_type: u32,
        token_modifiers: u32,
        prev_line: &mut u32,
        prev_char: &mut u32,
    ) {
        let delta_line = line - *prev_line;
        let delta_start = if delta_line == 0 {
            char - *prev_char
        } else {
            char
        };

        tokens.push(SemanticToken {
            delta_line,
            delta_start,
            length,
            token_type,
            token_modifiers_bitset: token_modifiers,
        });

        *prev_line = line;
        *prev_char = char;
    }
}

impl Default for SemanticTokensProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// `#rrggbb`
fn is_hex_color(text: &str) -> bool {
    text.len() == 7
        && text.starts_with('#')
        && text[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Flattens tokens into the five-integer wire encoding.
pub fn encode(tokens: &SemanticTokens) -> Vec<u32> {
    tokens
        .data
        .iter()
        .flat_map(|t| {
            [
                t.delta_line,
                t.delta_start,
                t.length,
                t.token_type,
                t.token_modifiers_bitset,
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_legend_matches_enums() {
        let legend = legend();
        assert_eq!(legend.token_types.len(), 6);
        assert_eq!(legend.token_types[TokenType::Keyword as usize], SemanticTokenType::KEYWORD);
        assert_eq!(
            legend.token_modifiers[TokenModifier::DefaultLibrary as usize],
            SemanticTokenModifier::DEFAULT_LIBRARY
        );
    }

    #[test]
    fn test_hex_shape() {
        assert!(is_hex_color("#191724"));
        assert!(!is_hex_color("#19172"));
        assert!(!is_hex_color("#19172g"));
        assert!(!is_hex_color("191724"));
    }

    #[test]
    fn test_unknown_root_is_not_tagged() {
        let tokens = SemanticTokensProvider::new().provide("theme { a = other.thing }");
        // `theme` keyword and the `a` declaration only.
        assert_eq!(tokens.data.len(), 2);
    }

    #[test]
    fn test_tokens_on_later_lines_use_absolute_start() {
        let tokens = SemanticTokensProvider::new().provide("palette {\n  base = #191724\n}");
        assert_eq!(
            encode(&tokens),
            vec![
                0, 0, 7, TokenType::Keyword as u32, 0,
                1, 2, 4, TokenType::Property as u32, 1,
                0, 7, 7, TokenType::String as u32, 0,
            ]
        );
    }
}
