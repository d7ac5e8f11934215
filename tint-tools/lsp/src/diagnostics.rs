//! Diagnostic Engine
//!
//! Converts analysis diagnostics into LSP diagnostics for publishing.

use tintc::{AnalysisResult, Severity};
use tower_lsp::lsp_types::*;

use crate::document::Document;

/// Source name shown next to every diagnostic in the editor.
pub const SOURCE: &str = "tint";

/// The diagnostic engine that reports Tint analysis results.
pub struct DiagnosticEngine;

impl DiagnosticEngine {
    pub fn new() -> Self {
        Self
    }

    /// Converts every diagnostic of `result` into an LSP diagnostic.
    pub fn check(&self, doc: &Document, result: &AnalysisResult) -> Vec<Diagnostic> {
        result
            .diagnostics
            .iter()
            .map(|diag| self.to_lsp(doc, diag))
            .collect()
    }

    fn to_lsp(&self, doc: &Document, diag: &tintc::Diagnostic) -> Diagnostic {
        let severity = match diag.severity {
            Severity::Error => DiagnosticSeverity::ERROR,
            Severity::Warning => DiagnosticSeverity::WARNING,
        };

        Diagnostic {
            range: doc.span_to_range(diag.span),
            severity: Some(severity),
            code: Some(NumberOrString::String(diag.code.to_string())),
            source: Some(SOURCE.to_string()),
            message: diag.message.clone(),
            ..Default::default()
        }
    }
}

impl Default for DiagnosticEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_range_and_severity() {
        let source = "palette {\n  base = \"#12345\"\n}\nansi {}";
        let doc = Document::new(Url::parse("file:///t.tint").unwrap(), 1, source.to_string());
        let result = tintc::analyze(source);
        let diagnostics = DiagnosticEngine::new().check(&doc, &result);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(
            diagnostics[0].range,
            Range {
                start: Position { line: 1, character: 9 },
                end: Position { line: 1, character: 17 },
            }
        );
        assert_eq!(diagnostics[0].code, Some(NumberOrString::String("E2003".to_string())));
        assert_eq!(diagnostics[1].severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(diagnostics[1].source.as_deref(), Some(SOURCE));
    }
}
