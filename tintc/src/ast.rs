//! Attribute/block tree produced by the parser.

use crate::span::Span;

/// An identifier with its span.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// A sequence of attributes and nested blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    pub attributes: Vec<Attribute>,
    pub blocks: Vec<Block>,
}

impl Body {
    /// All items in source order.
    pub fn items(&self) -> Vec<Item<'_>> {
        let mut items: Vec<Item<'_>> = self
            .attributes
            .iter()
            .map(Item::Attribute)
            .chain(self.blocks.iter().map(Item::Block))
            .collect();
        items.sort_by_key(|item| item.span().start);
        items
    }
}

/// A borrowed attribute or block, for walking a body in source order.
#[derive(Debug, Clone, Copy)]
pub enum Item<'a> {
    Attribute(&'a Attribute),
    Block(&'a Block),
}

impl Item<'_> {
    pub fn span(&self) -> Span {
        match self {
            Item::Attribute(attr) => attr.span,
            Item::Block(block) => block.span,
        }
    }
}

/// `name = expr`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Ident,
    pub value: Expr,
    pub span: Span,
}

/// `kind { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: Ident,
    pub body: Body,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A quoted string, unescaped.
    Str(String),
    /// A bare `#...` literal, including the `#`.
    Hex(String),
    Number(f64),
    Bool(bool),
    /// A dotted traversal such as `palette.highlight.low`.
    Path(Vec<Ident>),
    /// A function call such as `brighten(palette.base, 10)`.
    Call { name: Ident, args: Vec<Expr> },
}

impl Expr {
    /// Whether this expression is a reference into another scope, as opposed
    /// to a literal or a function call.
    pub fn is_reference(&self) -> bool {
        matches!(self.kind, ExprKind::Path(_))
    }

    /// The dotted text of a path expression.
    pub fn path_string(&self) -> Option<String> {
        match &self.kind {
            ExprKind::Path(segments) => Some(
                segments
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join("."),
            ),
            _ => None,
        }
    }
}
