//! Scope evaluation.
//!
//! Walks the parsed tree block by block in [`BlockTable`] order, resolving
//! every attribute to a color and building one [`Node`] tree per block.
//! Alongside the trees it records the symbol table and the color-location
//! index that editor features query.
//!
//! Self-referencing blocks are processed item by item in source order. Before
//! each item the evaluation context is rebuilt from the block's partially
//! built tree, so an item can see its earlier siblings and nothing else. A
//! reference to a sibling that has not been resolved yet, or to a block
//! whose body is still being walked, is reported as a circular reference and
//! the item stays unresolved.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::ast::{Attribute, Block, Body, Expr, ExprKind, Item};
use crate::blocks::{BlockTable, BlockType, META, PALETTE, STYLE_FLAGS};
use crate::color::{Color, Style};
use crate::diagnostics::{codes, Diagnostic, DiagnosticKind, Diagnostics};
use crate::eval::{to_color, EvalContext, EvalError, Value};
use crate::node::{Node, COLOR_KEY};
use crate::parser::parse;
use crate::span::Span;

/// Fully-qualified dotted path to the span of its definition.
pub type SymbolTable = FxHashMap<String, Span>;

/// A resolved color tied to the expression that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorLocation {
    pub span: Span,
    pub color: Color,
    /// The expression was a reference, not a literal or function call.
    pub is_ref: bool,
}

/// Everything analysis learned about a document.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    pub diagnostics: Vec<Diagnostic>,
    /// Resolved trees keyed by block name, in evaluation order.
    pub scopes: IndexMap<String, Node>,
    /// Style entries of style-flag blocks, keyed by path relative to the block.
    pub styles: IndexMap<String, Style>,
    /// Literal `meta` attributes.
    pub meta: IndexMap<String, String>,
    pub symbols: SymbolTable,
    pub colors: Vec<ColorLocation>,
}

impl AnalysisResult {
    /// The resolved palette tree, absent only when analysis stopped early.
    pub fn palette(&self) -> Option<&Node> {
        self.scopes.get(PALETTE)
    }

    pub fn scope(&self, name: &str) -> Option<&Node> {
        self.scopes.get(name)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// The first color location whose span contains `offset`.
    pub fn color_at(&self, offset: usize) -> Option<&ColorLocation> {
        self.colors.iter().find(|loc| loc.span.contains(offset))
    }

    /// Every resolved color keyed by its fully-qualified path.
    pub fn flat_colors(&self) -> IndexMap<String, Color> {
        self.scopes
            .iter()
            .flat_map(|(scope, node)| {
                node.flatten()
                    .into_iter()
                    .map(move |(path, color)| (format!("{scope}.{path}"), color))
            })
            .collect()
    }
}

/// Analyzes `source` with the standard block table.
pub fn analyze(source: &str) -> AnalysisResult {
    Analyzer::new(BlockTable::standard()).analyze(source)
}

/// The scope evaluator, parametrized by a block table.
pub struct Analyzer {
    table: BlockTable,
}

impl Analyzer {
    pub fn new(table: BlockTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &BlockTable {
        &self.table
    }

    /// Parses and analyzes `source`.
    pub fn analyze(&self, source: &str) -> AnalysisResult {
        let parsed = parse(source);
        let mut diagnostics = Diagnostics::new();
        // `palette.` while typing is not worth an error squiggle.
        diagnostics.extend(
            parsed
                .diagnostics
                .into_iter()
                .filter(|d| d.code != codes::EXPECTED_IDENT_AFTER_DOT),
        );
        self.analyze_body(&parsed.body, diagnostics)
    }

    /// Analyzes an already parsed tree, appending to `diagnostics`.
    pub fn analyze_body(&self, body: &Body, diagnostics: Diagnostics) -> AnalysisResult {
        let mut walker = Walker {
            diagnostics,
            symbols: SymbolTable::default(),
            defined: FxHashSet::default(),
            colors: Vec::new(),
        };

        for attr in &body.attributes {
            walker.diagnostics.push(Diagnostic::resolution(
                codes::TOP_LEVEL_ATTRIBUTE,
                format!("attribute `{}` must be inside a block", attr.name.name),
                attr.name.span,
            ));
        }

        let mut blocks: FxHashMap<&str, &Block> = FxHashMap::default();
        for block in &body.blocks {
            let name = block.kind.name.as_str();
            if !self.table.is_known(name) {
                walker.diagnostics.push(Diagnostic::resolution(
                    codes::UNKNOWN_BLOCK,
                    format!(
                        "unknown block `{name}`; expected one of: {}",
                        self.table.top_level_names().join(", ")
                    ),
                    block.kind.span,
                ));
            } else if blocks.contains_key(name) {
                walker.diagnostics.push(Diagnostic::resolution(
                    codes::DUPLICATE_BLOCK,
                    format!("duplicate `{name}` block"),
                    block.kind.span,
                ));
            } else {
                blocks.insert(name, block);
            }
        }

        let mut result = AnalysisResult::default();

        if !blocks.contains_key(PALETTE) {
            walker.diagnostics.push(Diagnostic::error(
                DiagnosticKind::MissingRequiredBlock,
                codes::MISSING_PALETTE,
                "missing required `palette` block",
                Span::point(0),
            ));
            result.diagnostics = walker.diagnostics.into_vec();
            return result;
        }

        if let Some(meta) = blocks.get(META) {
            result.meta = walker.meta_block(meta);
        }

        let mut context = EvalContext::new();
        for ty in self.table.iter() {
            let Some(block) = blocks.get(ty.name) else {
                continue;
            };
            trace!(block = ty.name, "evaluating block");
            let mut scope = BlockScope::new(ty, block);
            walker.symbols.insert(ty.name.to_string(), block.kind.span);
            walker.defined.insert(ty.name.to_string());

            let prefix = vec![ty.name.to_string()];
            walker.body(&mut scope, &block.body, &prefix, &context);

            if let Some(required) = ty.strict_names {
                walker.check_complete(ty, block, required);
            }
            if ty.style_flags {
                result.styles.extend(scope.styles());
            }

            context = context.with_scope(ty.name, &scope.root);
            result.scopes.insert(ty.name.to_string(), scope.root);
        }

        result.diagnostics = walker.diagnostics.into_vec();
        result.symbols = walker.symbols;
        result.colors = walker.colors;

        debug!(
            diagnostics = result.diagnostics.len(),
            symbols = result.symbols.len(),
            colors = result.colors.len(),
            "analysis finished"
        );
        result
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Flags {
    bold: bool,
    italic: bool,
    underline: bool,
}

/// Per-block evaluation state.
struct BlockScope<'a> {
    ty: &'a BlockType,
    /// Every path declared anywhere in the block, resolved or not.
    declared: FxHashSet<String>,
    /// Paths of the block and nested blocks whose bodies are being walked.
    open: Vec<String>,
    root: Node,
    flags: IndexMap<String, Flags>,
}

impl<'a> BlockScope<'a> {
    fn new(ty: &'a BlockType, block: &Block) -> Self {
        let mut declared = FxHashSet::default();
        collect_declared(&block.body, ty.name, &mut declared);
        Self {
            ty,
            declared,
            open: vec![ty.name.to_string()],
            root: Node::new(),
            flags: IndexMap::new(),
        }
    }

    fn styles(&self) -> IndexMap<String, Style> {
        self.root
            .flatten()
            .into_iter()
            .map(|(path, color)| {
                let flags = self.flags.get(&path).copied().unwrap_or_default();
                let style = Style {
                    color,
                    bold: flags.bold,
                    italic: flags.italic,
                    underline: flags.underline,
                };
                (path, style)
            })
            .collect()
    }
}

fn collect_declared(body: &Body, prefix: &str, out: &mut FxHashSet<String>) {
    for attr in &body.attributes {
        out.insert(format!("{prefix}.{}", attr.name.name));
    }
    for block in &body.blocks {
        let path = format!("{prefix}.{}", block.kind.name);
        collect_declared(&block.body, &path, out);
        out.insert(path);
    }
}

/// Collects the dotted text of every path expression inside `expr`.
fn referenced_paths(expr: &Expr, out: &mut Vec<String>) {
    match &expr.kind {
        ExprKind::Path(_) => out.extend(expr.path_string()),
        ExprKind::Call { args, .. } => args.iter().for_each(|arg| referenced_paths(arg, out)),
        ExprKind::Str(_) | ExprKind::Hex(_) | ExprKind::Number(_) | ExprKind::Bool(_) => {}
    }
}

struct Walker {
    diagnostics: Diagnostics,
    symbols: SymbolTable,
    /// Paths that already have a definition, resolved or not.
    defined: FxHashSet<String>,
    colors: Vec<ColorLocation>,
}

impl Walker {
    fn body(&mut self, scope: &mut BlockScope<'_>, body: &Body, prefix: &[String], base: &EvalContext) {
        for item in body.items() {
            let rebuilt;
            let context = if scope.ty.self_referencing {
                rebuilt = base.with_scope(scope.ty.name, &scope.root);
                &rebuilt
            } else {
                base
            };

            match item {
                Item::Attribute(attr) => self.attribute(scope, attr, prefix, context),
                Item::Block(block) => self.nested_block(scope, block, prefix, base),
            }
        }
    }

    fn nested_block(&mut self, scope: &mut BlockScope<'_>, block: &Block, prefix: &[String], base: &EvalContext) {
        let name = &block.kind.name;
        if !scope.ty.supports_nesting {
            self.diagnostics.push(Diagnostic::resolution(
                codes::NESTING_NOT_ALLOWED,
                format!("`{}` does not allow nested blocks", scope.ty.name),
                block.kind.span,
            ));
            return;
        }
        if name == COLOR_KEY {
            self.diagnostics.push(Diagnostic::resolution(
                codes::UNKNOWN_ATTRIBUTE,
                "`color` is reserved for a block's own color and cannot be a block",
                block.kind.span,
            ));
            return;
        }

        let mut child = prefix.to_vec();
        child.push(name.clone());
        let path = child.join(".");
        if !self.define(&path, block.kind.span) {
            return;
        }
        self.symbols.insert(path.clone(), block.kind.span);
        scope.open.push(path);
        self.body(scope, &block.body, &child, base);
        scope.open.pop();
    }

    /// Marks `path` as defined, reporting a duplicate if it already was.
    fn define(&mut self, path: &str, span: Span) -> bool {
        if self.defined.insert(path.to_string()) {
            return true;
        }
        self.diagnostics.push(Diagnostic::resolution(
            codes::DUPLICATE_DEFINITION,
            format!("`{path}` is already defined"),
            span,
        ));
        false
    }

    fn attribute(&mut self, scope: &mut BlockScope<'_>, attr: &Attribute, prefix: &[String], context: &EvalContext) {
        let name = attr.name.name.as_str();
        let ty = scope.ty;

        if let Some(allowed) = ty.strict_names {
            if !allowed.contains(&name) {
                self.diagnostics.push(Diagnostic::resolution(
                    codes::UNKNOWN_ATTRIBUTE,
                    format!("unknown `{}` color `{name}`; expected one of: {}", ty.name, allowed.join(", ")),
                    attr.name.span,
                ));
                return;
            }
        }

        let path = format!("{}.{name}", prefix.join("."));
        if !self.define(&path, attr.name.span) {
            return;
        }

        // Path of the node this attribute writes to, relative to the block root.
        let relative = &prefix[1..];

        if ty.style_flags && !relative.is_empty() && STYLE_FLAGS.contains(&name) {
            self.style_flag(scope, attr, relative, path, context);
            return;
        }

        let resolved = context.evaluate(&attr.value).and_then(|value| to_color(&value));
        let color = match resolved {
            Ok(color) => color,
            Err(err) => {
                self.report(scope, attr, err);
                return;
            }
        };

        let target = if ty.supports_nesting && name == COLOR_KEY {
            scope.root.get_or_insert(relative)
        } else {
            scope.root.get_or_insert(relative).get_or_insert(&[name])
        };
        target.color = Some(color);

        self.symbols.insert(path, attr.name.span);
        self.colors.push(ColorLocation {
            span: attr.value.span,
            color,
            is_ref: attr.value.is_reference(),
        });
    }

    fn style_flag(&mut self, scope: &mut BlockScope<'_>, attr: &Attribute, relative: &[String], path: String, context: &EvalContext) {
        let value = match context.evaluate(&attr.value) {
            Ok(Value::Bool(value)) => value,
            Ok(other) => {
                self.diagnostics.push(Diagnostic::resolution(
                    codes::TYPE_MISMATCH,
                    format!("`{}` must be true or false, found {}", attr.name.name, other.type_name()),
                    attr.value.span,
                ));
                return;
            }
            Err(err) => {
                self.report(scope, attr, err);
                return;
            }
        };

        let flags = scope.flags.entry(relative.join(".")).or_default();
        match attr.name.name.as_str() {
            "bold" => flags.bold = value,
            "italic" => flags.italic = value,
            _ => flags.underline = value,
        }
        self.symbols.insert(path, attr.name.span);
    }

    fn report(&mut self, scope: &BlockScope<'_>, attr: &Attribute, err: EvalError) {
        if scope.ty.self_referencing {
            let mut paths = Vec::new();
            referenced_paths(&attr.value, &mut paths);
            let own = format!("{}.", scope.ty.name);
            let pending = paths.into_iter().find_map(|path| {
                if scope.open.contains(&path) {
                    Some((path, "which encloses it"))
                } else if path.starts_with(&own) && scope.declared.contains(&path) && !self.symbols.contains_key(&path) {
                    Some((path, "which is not defined before it"))
                } else {
                    None
                }
            });
            if let Some((pending, reason)) = pending {
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::CircularReference,
                    codes::CIRCULAR_REFERENCE,
                    format!("circular reference: `{}` refers to `{pending}`, {reason}", attr.name.name),
                    attr.value.span,
                ));
                return;
            }
        }

        self.diagnostics
            .push(Diagnostic::resolution(err.code(), err.to_string(), attr.value.span));
    }

    fn check_complete(&mut self, ty: &BlockType, block: &Block, required: &[&str]) {
        let assigned: FxHashSet<&str> = block
            .body
            .attributes
            .iter()
            .map(|a| a.name.name.as_str())
            .collect();
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|name| !assigned.contains(name))
            .collect();
        if missing.is_empty() {
            return;
        }
        self.diagnostics.push(Diagnostic::warning(
            DiagnosticKind::Completeness,
            codes::INCOMPLETE_ANSI,
            format!(
                "`{}` is missing {} color{}: {}",
                ty.name,
                missing.len(),
                if missing.len() == 1 { "" } else { "s" },
                missing.join(", ")
            ),
            block.kind.span,
        ));
    }

    fn meta_block(&mut self, block: &Block) -> IndexMap<String, String> {
        for nested in &block.body.blocks {
            self.diagnostics.push(Diagnostic::resolution(
                codes::NESTING_NOT_ALLOWED,
                "`meta` does not allow nested blocks",
                nested.kind.span,
            ));
        }

        let mut meta = IndexMap::new();
        for attr in &block.body.attributes {
            let path = format!("{META}.{}", attr.name.name);
            if !self.define(&path, attr.name.span) {
                continue;
            }
            let value = match &attr.value.kind {
                ExprKind::Str(s) | ExprKind::Hex(s) => s.clone(),
                ExprKind::Number(n) => n.to_string(),
                ExprKind::Bool(b) => b.to_string(),
                ExprKind::Path(_) | ExprKind::Call { .. } => {
                    self.diagnostics.push(Diagnostic::resolution(
                        codes::TYPE_MISMATCH,
                        format!("`meta.{}` must be a literal value", attr.name.name),
                        attr.value.span,
                    ));
                    continue;
                }
            };
            self.symbols.insert(path, attr.name.span);
            meta.insert(attr.name.name.clone(), value);
        }
        meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn codes_of(result: &AnalysisResult) -> Vec<&'static str> {
        result.diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_palette_and_theme_end_to_end() {
        let source = "palette { base = \"#191724\" }\ntheme { background = palette.base }";
        let result = analyze(source);

        assert!(!result.has_errors(), "{:?}", result.diagnostics);
        assert!(result.symbols.contains_key("palette.base"));
        assert!(result.symbols.contains_key("theme.background"));

        let base = Color::new(0x19, 0x17, 0x24);
        assert_eq!(result.colors.len(), 2);
        assert_eq!(result.colors[0], ColorLocation { span: Span::new(17, 26), color: base, is_ref: false });
        assert_eq!(result.colors[1].color, base);
        assert!(result.colors[1].is_ref);
        assert_eq!(result.scope("theme").unwrap().lookup(&["background"]), Ok(base));
    }

    #[test]
    fn test_missing_palette_is_fatal() {
        let result = analyze("theme { background = \"#000000\" }");
        assert_eq!(codes_of(&result), vec![codes::MISSING_PALETTE]);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::MissingRequiredBlock);
        assert!(result.scopes.is_empty());
        assert!(result.colors.is_empty());
    }

    #[test]
    fn test_earlier_sibling_resolves() {
        let result = analyze("palette {\n  base = \"#191724\"\n  surface = palette.base\n}");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(
            result.palette().unwrap().lookup(&["surface"]),
            Ok(Color::new(0x19, 0x17, 0x24))
        );
    }

    #[test]
    fn test_forward_and_self_references_are_circular() {
        let source = "palette {\n  surface = palette.base\n  base = \"#191724\"\n  loop = palette.loop\n}";
        let result = analyze(source);

        let kinds: Vec<_> = result.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DiagnosticKind::CircularReference, DiagnosticKind::CircularReference]);

        let palette = result.palette().unwrap();
        assert!(palette.get(&["surface"]).is_none());
        assert!(palette.get(&["loop"]).is_none());
        assert!(palette.get(&["base"]).is_some());
        assert!(!result.symbols.contains_key("palette.surface"));
    }

    #[test]
    fn test_unknown_same_block_path_is_not_circular() {
        let result = analyze("palette {\n  surface = palette.nothing\n}");
        assert_eq!(codes_of(&result), vec![codes::UNKNOWN_REFERENCE]);
    }

    #[test]
    fn test_errors_do_not_stop_siblings() {
        let source = "palette {\n  a = \"#12345\"\n  b = nowhere.x\n  c = \"#ffffff\"\n}";
        let result = analyze(source);
        assert_eq!(codes_of(&result), vec![codes::INVALID_HEX, codes::UNKNOWN_REFERENCE]);
        assert_eq!(result.palette().unwrap().lookup(&["c"]), Ok(Color::WHITE));
    }

    #[test]
    fn test_color_attribute_sets_own_color() {
        let source = r##"
palette {
  highlight {
    color = "#21202e"
    low = "#1f1d2e"
  }
}
theme {
  selection = palette.highlight
  border = palette.highlight.low
}
"##;
        let result = analyze(source);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

        let highlight = result.palette().unwrap().get(&["highlight"]).unwrap();
        assert_eq!(highlight.color, Some(Color::new(0x21, 0x20, 0x2e)));
        assert!(!highlight.children.contains_key("color"));

        let theme = result.scope("theme").unwrap();
        assert_eq!(theme.lookup(&["selection"]), Ok(Color::new(0x21, 0x20, 0x2e)));
        assert_eq!(theme.lookup(&["border"]), Ok(Color::new(0x1f, 0x1d, 0x2e)));
        assert!(result.symbols.contains_key("palette.highlight"));
        assert!(result.symbols.contains_key("palette.highlight.low"));
    }

    #[test]
    fn test_own_color_path_resolves() {
        let source = "palette {\n  hl {\n    color = \"#21202e\"\n  }\n  edge = palette.hl.color\n}\ntheme { sel = palette.hl.color }";
        let result = analyze(source);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

        let hl = Color::new(0x21, 0x20, 0x2e);
        assert!(result.symbols.contains_key("palette.hl.color"));
        assert_eq!(result.palette().unwrap().lookup(&["edge"]), Ok(hl));
        assert_eq!(result.scope("theme").unwrap().lookup(&["sel"]), Ok(hl));
    }

    #[test]
    fn test_reference_to_enclosing_block_is_circular() {
        let source = "palette {\n  ui {\n    color = palette.ui\n    low = darken(palette.ui, 5)\n  }\n  tint = palette\n}";
        let result = analyze(source);

        let kinds: Vec<_> = result.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DiagnosticKind::CircularReference; 3]);
        assert_eq!(
            result.diagnostics[0].message,
            "circular reference: `color` refers to `palette.ui`, which encloses it"
        );
        assert!(result.palette().unwrap().get(&["ui"]).is_none());
        assert!(!result.symbols.contains_key("palette.ui.color"));
    }

    #[test]
    fn test_closed_nested_block_is_not_circular() {
        let source = "palette {\n  ui {\n    low = \"#000000\"\n  }\n  bg = palette.ui\n}";
        let result = analyze(source);
        assert_eq!(codes_of(&result), vec![codes::NO_COLOR_ATTRIBUTE]);
    }

    #[test]
    fn test_group_without_color_is_rejected() {
        let source = "palette {\n  ui {\n    low = \"#000000\"\n  }\n}\ntheme { bg = palette.ui }";
        let result = analyze(source);
        assert_eq!(codes_of(&result), vec![codes::NO_COLOR_ATTRIBUTE]);
        assert_eq!(result.diagnostics[0].message, "object has no color attribute");
    }

    #[test]
    fn test_nested_items_see_earlier_outer_items() {
        let source = "syntax {\n  comment = \"#6e6a86\"\n  doc {\n    color = syntax.comment\n    italic = true\n  }\n}\npalette {}";
        let result = analyze(source);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let doc = result.styles.get("doc").unwrap();
        assert_eq!(doc.color, Color::new(0x6e, 0x6a, 0x86));
        assert!(doc.italic);
        assert!(!doc.bold);
        assert!(!result.styles["comment"].italic);
    }

    #[test]
    fn test_style_flag_must_be_bool() {
        let source = "palette {}\nsyntax {\n  keyword {\n    color = \"#31748f\"\n    bold = \"yes\"\n  }\n}";
        let result = analyze(source);
        assert_eq!(codes_of(&result), vec![codes::TYPE_MISMATCH]);
    }

    #[test]
    fn test_ansi_rules() {
        let source = "palette {}\nansi {\n  red = \"#eb6f92\"\n  purple = \"#c4a7e7\"\n  group {\n  }\n}";
        let result = analyze(source);
        assert_eq!(
            codes_of(&result),
            vec![codes::UNKNOWN_ATTRIBUTE, codes::NESTING_NOT_ALLOWED, codes::INCOMPLETE_ANSI]
        );
        let warning = result.diagnostics.last().unwrap();
        assert!(!warning.is_error());
        assert!(!warning.message.contains(" red,"));
        assert!(warning.message.ends_with("bright_white"));
        assert!(warning.message.contains("15 colors"));

        let ansi = result.scope("ansi").unwrap();
        assert!(ansi.get(&["purple"]).is_none());
        assert_eq!(ansi.lookup(&["red"]), Ok(Color::new(0xeb, 0x6f, 0x92)));
    }

    #[test]
    fn test_ansi_is_not_self_referencing() {
        let source = "palette { red = \"#eb6f92\" }\nansi {\n  red = palette.red\n  bright_red = ansi.red\n}";
        let result = analyze(source);
        let errors: Vec<_> = result.errors().map(|d| d.message.clone()).collect();
        assert_eq!(errors, vec!["unknown variable `ansi`".to_string()]);
    }

    #[test]
    fn test_structural_errors() {
        let source = "name = \"x\"\npalette {\n  a = \"#000000\"\n  a = \"#ffffff\"\n}\npalette {}\ncolors {}";
        let result = analyze(source);
        assert_eq!(
            codes_of(&result),
            vec![
                codes::TOP_LEVEL_ATTRIBUTE,
                codes::DUPLICATE_BLOCK,
                codes::UNKNOWN_BLOCK,
                codes::DUPLICATE_DEFINITION
            ]
        );
        assert_eq!(result.palette().unwrap().lookup(&["a"]), Ok(Color::BLACK));
    }

    #[test]
    fn test_meta_values() {
        let source = "meta {\n  name = \"Rosé Pine\"\n  version = 2\n  bad = palette.base\n}\npalette { base = \"#191724\" }";
        let result = analyze(source);
        assert_eq!(codes_of(&result), vec![codes::TYPE_MISMATCH]);
        assert_eq!(result.meta.get("name").map(String::as_str), Some("Rosé Pine"));
        assert_eq!(result.meta.get("version").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_trailing_dot_noise_is_suppressed() {
        let result = analyze("palette {\n  base = \"#191724\"\n  text = palette.\n}");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn test_function_call_is_not_a_reference() {
        let result = analyze("palette {\n  base = \"#191724\"\n  lift = brighten(palette.base, 0)\n}");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(result.colors.len(), 2);
        assert!(!result.colors[1].is_ref);
        assert_eq!(result.colors[1].color, Color::new(0x19, 0x17, 0x24));
    }

    #[test]
    fn test_flat_colors() {
        let result = analyze("palette {\n  base = \"#191724\"\n  hl {\n    low = \"#21202e\"\n  }\n}");
        let keys: Vec<_> = result.flat_colors().into_keys().collect();
        assert_eq!(keys, vec!["palette.base", "palette.hl.low"]);
    }

    #[test]
    fn test_custom_table() {
        let table = BlockTable::new(vec![BlockType {
            name: PALETTE,
            supports_nesting: false,
            self_referencing: false,
            strict_names: None,
            style_flags: false,
        }]);
        let result = Analyzer::new(table).analyze("palette {\n  a = \"#000000\"\n  b = palette.a\n  g {\n  }\n}");
        assert_eq!(
            codes_of(&result),
            vec![codes::UNKNOWN_REFERENCE, codes::NESTING_NOT_ALLOWED]
        );
    }
}
