//! Diagnostics produced by parsing and analysis.
//!
//! Diagnostics never abort processing of sibling items; callers collect them
//! into a [`Diagnostics`] sink and keep going.

use std::fmt;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

/// The category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Malformed source text.
    Syntax,
    /// No `palette` block; analysis stops.
    MissingRequiredBlock,
    /// Broken reference, invalid hex, type mismatch, unknown attribute.
    Resolution,
    /// Same-block reference to an item not yet defined.
    CircularReference,
    /// `ansi` is missing required names.
    Completeness,
}

/// A single error or warning with its source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub code: &'static str,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, code: &'static str, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            code,
            message: message.into(),
            span,
        }
    }

    pub fn warning(kind: DiagnosticKind, code: &'static str, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            code,
            message: message.into(),
            span,
        }
    }

    pub fn syntax(code: &'static str, message: impl Into<String>, span: Span) -> Self {
        Self::error(DiagnosticKind::Syntax, code, message, span)
    }

    pub fn resolution(code: &'static str, message: impl Into<String>, span: Span) -> Self {
        Self::error(DiagnosticKind::Resolution, code, message, span)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{level}[{}]: {} at {}", self.code, self.message, self.span)
    }
}

/// An ordered diagnostic collector.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(diagnostics);
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

/// Diagnostic codes.
pub mod codes {
    // Syntax errors (E0xxx)
    pub const UNEXPECTED_TOKEN: &str = "E0001";
    pub const UNMATCHED_CLOSING: &str = "E0002";
    pub const UNCLOSED_BLOCK: &str = "E0003";
    /// `palette.` with nothing after the dot, typically mid-typing.
    pub const EXPECTED_IDENT_AFTER_DOT: &str = "E0004";
    pub const EXPECTED_EXPRESSION: &str = "E0005";
    pub const INVALID_CHARACTER: &str = "E0006";

    // Structure errors (E1xxx)
    pub const MISSING_PALETTE: &str = "E1001";
    pub const UNKNOWN_BLOCK: &str = "E1002";
    pub const DUPLICATE_BLOCK: &str = "E1003";
    pub const DUPLICATE_DEFINITION: &str = "E1004";
    pub const NESTING_NOT_ALLOWED: &str = "E1005";
    pub const UNKNOWN_ATTRIBUTE: &str = "E1006";
    pub const TOP_LEVEL_ATTRIBUTE: &str = "E1007";

    // Resolution errors (E2xxx)
    pub const UNKNOWN_REFERENCE: &str = "E2001";
    pub const CIRCULAR_REFERENCE: &str = "E2002";
    pub const INVALID_HEX: &str = "E2003";
    pub const TYPE_MISMATCH: &str = "E2004";
    pub const NO_COLOR_ATTRIBUTE: &str = "E2005";
    pub const UNKNOWN_FUNCTION: &str = "E2006";
    pub const BAD_ARGUMENTS: &str = "E2007";

    // Warnings (W0xxx)
    pub const INCOMPLETE_ANSI: &str = "W0001";
}
