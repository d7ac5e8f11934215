//! Completion Provider
//!
//! Completion works on raw text rather than the parsed tree, because the
//! document is usually incomplete while the user is typing. Three contexts
//! are recognized, checked in order:
//!
//! 1. a `palette.` path before the cursor offers the children of the node
//!    reached so far,
//! 2. an empty attribute value (`name = `) offers the built-in functions and
//!    a `palette` reference,
//! 3. otherwise the enclosing block, found with a brace stack, decides which
//!    names are offered.

use tintc::blocks::{ANSI_NAMES, PALETTE, STYLE_FLAGS};
use tintc::node::COLOR_KEY;
use tintc::{AnalysisResult, BlockTable, Node, NodeShape};
use tower_lsp::lsp_types::*;

use crate::document::Document;

/// Client command that reopens the completion popup.
const TRIGGER_SUGGEST: &str = "editor.action.triggerSuggest";

/// Provider for completion items.
pub struct CompletionProvider {
    blocks: BlockTable,
}

impl CompletionProvider {
    pub fn new() -> Self {
        Self {
            blocks: BlockTable::standard(),
        }
    }

    /// Provides completion items at `position`.
    pub fn complete(&self, doc: &Document, result: &AnalysisResult, position: Position) -> Vec<CompletionItem> {
        let Some(line) = doc.line(position.line as usize) else {
            return Vec::new();
        };
        let split = line
            .char_indices()
            .nth(position.character as usize)
            .map(|(idx, _)| idx)
            .unwrap_or(line.len());
        let (before, after) = line.split_at(split);

        if let Some(segments) = palette_path_before(before) {
            return self.palette_children(result, &segments);
        }

        if is_empty_value(before, after) {
            return value_items();
        }

        let Some(offset) = doc.position_to_offset(position) else {
            return Vec::new();
        };
        let text = doc.text();
        let stack = block_stack(&text[..offset]);
        match stack.as_slice() {
            [] => self.top_level_items(),
            [.., parent, current] if parent.name == "syntax" => {
                let assigned = assigned_names(&text[current.body_start..]);
                let mut names = vec![COLOR_KEY];
                names.extend(STYLE_FLAGS);
                names
                    .into_iter()
                    .filter(|name| !assigned.iter().any(|a| a == name))
                    .map(|name| attribute_item(name, CompletionItemKind::PROPERTY))
                    .collect()
            }
            [.., current] if current.name == "ansi" => {
                let assigned = assigned_names(&text[current.body_start..]);
                ANSI_NAMES
                    .iter()
                    .filter(|name| !assigned.iter().any(|a| a == *name))
                    .map(|name| attribute_item(name, CompletionItemKind::COLOR))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// Children of the palette node reached by the completed `segments`.
    fn palette_children(&self, result: &AnalysisResult, segments: &[String]) -> Vec<CompletionItem> {
        let Some(node) = result.palette().and_then(|palette| palette.get(segments)) else {
            return Vec::new();
        };
        node.children
            .iter()
            .filter(|(name, _)| name.as_str() != COLOR_KEY)
            .map(|(name, child)| palette_item(name, child))
            .collect()
    }

    fn top_level_items(&self) -> Vec<CompletionItem> {
        self.blocks
            .top_level_names()
            .into_iter()
            .map(|name| CompletionItem {
                label: name.to_string(),
                kind: Some(CompletionItemKind::MODULE),
                detail: Some(format!("{name} block")),
                insert_text: Some(format!("{name} {{\n\t$0\n}}")),
                insert_text_format: Some(InsertTextFormat::SNIPPET),
                ..Default::default()
            })
            .collect()
    }
}

impl Default for CompletionProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn palette_item(name: &str, child: &Node) -> CompletionItem {
    let hex = child.color.map(|c| c.hex());
    match child.shape() {
        NodeShape::Leaf => CompletionItem {
            label: name.to_string(),
            kind: Some(CompletionItemKind::COLOR),
            detail: hex.clone(),
            // Clients render a swatch when the documentation is a color.
            documentation: hex.map(Documentation::String),
            ..Default::default()
        },
        NodeShape::Group | NodeShape::DualRole | NodeShape::Empty => CompletionItem {
            label: name.to_string(),
            kind: Some(CompletionItemKind::MODULE),
            detail: Some(match hex {
                Some(hex) => format!("group ({hex})"),
                None => "group".to_string(),
            }),
            ..Default::default()
        },
    }
}

fn attribute_item(name: &str, kind: CompletionItemKind) -> CompletionItem {
    CompletionItem {
        label: name.to_string(),
        kind: Some(kind),
        insert_text: Some(format!("{name} = ")),
        ..Default::default()
    }
}

fn value_items() -> Vec<CompletionItem> {
    let function = |name: &str, doc: &str| CompletionItem {
        label: name.to_string(),
        kind: Some(CompletionItemKind::FUNCTION),
        detail: Some(format!("{name}(color, percent)")),
        documentation: Some(Documentation::String(doc.to_string())),
        insert_text: Some(format!("{name}(${{1:{PALETTE}.}}, ${{2:10}})")),
        insert_text_format: Some(InsertTextFormat::SNIPPET),
        ..Default::default()
    };

    vec![
        function("brighten", "Raise OKLCH lightness by a percentage."),
        function("darken", "Lower OKLCH lightness by a percentage."),
        CompletionItem {
            label: PALETTE.to_string(),
            kind: Some(CompletionItemKind::MODULE),
            detail: Some("palette reference".to_string()),
            insert_text: Some(format!("{PALETTE}.")),
            command: Some(Command {
                title: "Suggest palette colors".to_string(),
                command: TRIGGER_SUGGEST.to_string(),
                arguments: None,
            }),
            ..Default::default()
        },
    ]
}

/// If `before` ends in `palette.` followed by zero or more complete segments
/// and a partial one, returns the complete segments after `palette`.
fn palette_path_before(before: &str) -> Option<Vec<String>> {
    let start = before
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_path_char(*c))
        .last()
        .map(|(idx, _)| idx)?;
    let path = &before[start..];

    let rest = path.strip_prefix(PALETTE)?.strip_prefix('.')?;
    let mut segments: Vec<String> = rest.split('.').map(String::from).collect();
    // The last segment is the one being typed.
    segments.pop();
    Some(segments)
}

/// `name = ` with nothing typed after the `=` and nothing following the cursor.
fn is_empty_value(before: &str, after: &str) -> bool {
    if !after.trim().is_empty() {
        return false;
    }
    let Some(lhs) = before.trim_end().strip_suffix('=') else {
        return false;
    };
    let name = lhs.trim();
    !name.is_empty() && name.chars().all(is_ident_char)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn is_path_char(c: char) -> bool {
    is_ident_char(c) || c == '.'
}

/// A block opened before the cursor and not yet closed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenBlock {
    name: String,
    /// Byte offset just past the `{`.
    body_start: usize,
}

/// Tracks open blocks from the start of `text`, skipping strings and
/// comments. The block name is the identifier right before each `{`.
fn block_stack(text: &str) -> Vec<OpenBlock> {
    let mut stack = Vec::new();
    let mut last_word = String::new();
    let mut word = String::new();
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => {
                let mut escaped = false;
                for (_, c) in chars.by_ref() {
                    match c {
                        '\\' if !escaped => escaped = true,
                        '"' if !escaped => break,
                        '\n' => break,
                        _ => escaped = false,
                    }
                }
                word.clear();
                last_word.clear();
                continue;
            }
            '/' if chars.peek().is_some_and(|(_, next)| *next == '/') => {
                for (_, c) in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
                word.clear();
                continue;
            }
            '{' => {
                let name = if word.is_empty() { &last_word } else { &word };
                stack.push(OpenBlock {
                    name: name.clone(),
                    body_start: idx + 1,
                });
                word.clear();
                last_word.clear();
            }
            '}' => {
                stack.pop();
                word.clear();
                last_word.clear();
            }
            c if is_ident_char(c) => word.push(c),
            _ => {
                if !word.is_empty() {
                    last_word = std::mem::take(&mut word);
                }
                if !c.is_whitespace() {
                    last_word.clear();
                }
            }
        }
    }
    stack
}

/// Names assigned with `name =` directly in the block body starting at
/// `body`, up to its closing brace.
fn assigned_names(body: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut depth = 0usize;
    for line in body.lines() {
        let trimmed = line.trim_start();
        if depth == 0 {
            if let Some((lhs, _)) = trimmed.split_once('=') {
                let name = lhs.trim();
                if !name.is_empty() && name.chars().all(is_ident_char) {
                    names.push(name.to_string());
                }
            }
        }
        for c in line.chars() {
            match c {
                '{' => depth += 1,
                '}' if depth == 0 => return names,
                '}' => depth -= 1,
                _ => {}
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_palette_path_detection() {
        assert_eq!(palette_path_before("  bg = palette."), Some(vec![]));
        assert_eq!(palette_path_before("  bg = palette.ba"), Some(vec![]));
        assert_eq!(
            palette_path_before("  bg = palette.highlight."),
            Some(vec!["highlight".to_string()])
        );
        assert_eq!(palette_path_before("  bg = theme."), None);
        assert_eq!(palette_path_before("  bg = mypalette."), None);
        assert_eq!(palette_path_before("  bg = palette"), None);
    }

    #[test]
    fn test_empty_value_detection() {
        assert!(is_empty_value("  background = ", ""));
        assert!(is_empty_value("  background =", "  "));
        assert!(!is_empty_value("  background = pal", ""));
        assert!(!is_empty_value("  background = ", "palette.base"));
        assert!(!is_empty_value("  = ", ""));
    }

    #[test]
    fn test_block_stack() {
        let text = "palette {\n  a = \"{\"\n}\nsyntax {\n  // {\n  keyword {\n    ";
        let names: Vec<_> = block_stack(text).into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["syntax", "keyword"]);
    }

    #[test]
    fn test_block_name_on_previous_line() {
        let names: Vec<_> = block_stack("ansi\n{\n").into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["ansi"]);
    }

    #[test]
    fn test_assigned_names_stop_at_closing_brace() {
        let body = "\n  red = \"#000000\"\n  nested {\n    blue = x\n  }\n  green = y\n}\nwhite = z";
        assert_eq!(assigned_names(body), vec!["red", "green"]);
    }
}
