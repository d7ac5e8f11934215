//! Semantic Features for LSP
//!
//! Hover, go-to-definition and document colors, all answered from a fresh
//! [`AnalysisResult`] of the document snapshot the request was made against.

use tintc::{AnalysisResult, BlockTable};
use tower_lsp::lsp_types::*;

use crate::document::Document;

/// Provider for hover information.
pub struct HoverProvider;

impl HoverProvider {
    pub fn new() -> Self {
        Self
    }

    /// Shows the resolved color of the value under the cursor. References
    /// are prefixed with the referenced path.
    pub fn hover(&self, doc: &Document, result: &AnalysisResult, position: Position) -> Option<Hover> {
        let offset = doc.position_to_offset(position)?;
        let location = result.color_at(offset)?;
        let range = doc.span_to_range(location.span);

        let mut content = String::new();
        if location.is_ref {
            let snippet = doc.range_text(range)?;
            content.push_str(&format!("**{snippet}**\n\n"));
        }
        content.push_str(&format!(
            "`{}` · `{}`",
            location.color.hex(),
            location.color.rgb()
        ));

        Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: content,
            }),
            range: Some(range),
        })
    }
}

impl Default for HoverProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Provider for go-to-definition functionality.
pub struct DefinitionProvider {
    blocks: BlockTable,
}

impl DefinitionProvider {
    pub fn new() -> Self {
        Self {
            blocks: BlockTable::standard(),
        }
    }

    /// Jumps from a dotted path to its definition. With the cursor in the
    /// middle of a path, the path is cut after the segment under the cursor.
    pub fn definition(&self, doc: &Document, result: &AnalysisResult, position: Position) -> Option<Location> {
        let path = doc.identifier_path_at_position(position)?;
        let root = path.segments.first()?;
        if !self.blocks.is_known(root) {
            return None;
        }

        let target = path.prefix_at_cursor();
        let span = result.symbols.get(&target)?;

        Some(Location {
            uri: doc.uri().clone(),
            range: doc.span_to_range(*span),
        })
    }
}

impl Default for DefinitionProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Provider for document colors and color presentations.
pub struct ColorProvider;

impl ColorProvider {
    pub fn new() -> Self {
        Self
    }

    /// Every resolved color in the document, for editor swatches.
    pub fn document_colors(&self, doc: &Document, result: &AnalysisResult) -> Vec<ColorInformation> {
        result
            .colors
            .iter()
            .map(|location| {
                let [red, green, blue] = location.color.to_unit();
                ColorInformation {
                    range: doc.span_to_range(location.span),
                    color: Color {
                        red,
                        green,
                        blue,
                        alpha: 1.0,
                    },
                }
            })
            .collect()
    }

    /// Rewrites a literal at `range` to the picked color, keeping its quoting.
    /// References and function calls are never replaced by a literal.
    pub fn color_presentation(&self, doc: &Document, range: Range, color: Color) -> Vec<ColorPresentation> {
        let Some(source) = doc.range_text(range) else {
            return Vec::new();
        };
        let source = source.trim_start();
        if source.starts_with("palette.") {
            return Vec::new();
        }

        let picked = tintc::Color::from_unit(color.red, color.green, color.blue);
        let label = if source.starts_with('"') {
            format!("\"{}\"", picked.hex())
        } else if source.starts_with('#') {
            picked.hex()
        } else {
            return Vec::new();
        };

        vec![ColorPresentation {
            label: label.clone(),
            text_edit: Some(TextEdit {
                range,
                new_text: label,
            }),
            additional_text_edits: None,
        }]
    }
}

impl Default for ColorProvider {
    fn default() -> Self {
        Self::new()
    }
}
