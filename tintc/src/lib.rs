//! Tint theme language core.
//!
//! Tint describes an editor color theme as nested blocks of named colors:
//!
//! ```text
//! palette {
//!   base = "#191724"
//!   highlight {
//!     color = "#21202e"
//!     low = "#1f1d2e"
//!   }
//! }
//! theme {
//!   background = palette.base
//!   selection = brighten(palette.highlight, 5)
//! }
//! ```
//!
//! This crate parses a document, resolves every attribute to a color and
//! reports diagnostics. Editor services and generators sit on top of
//! [`analyze`] and its [`AnalysisResult`].
//!
//! # Pipeline
//!
//! ```text
//! source ──► lexer ──► parser ──► analysis ──► AnalysisResult
//!                                   │
//!                                   └── eval (per expression)
//! ```

pub mod analysis;
pub mod ast;
pub mod blocks;
pub mod color;
pub mod diagnostics;
pub mod eval;
pub mod lexer;
pub mod node;
pub mod parser;
pub mod span;

pub use analysis::{analyze, AnalysisResult, Analyzer, ColorLocation, SymbolTable};
pub use blocks::{BlockTable, BlockType};
pub use color::{parse_hex, Color, ColorError, Style};
pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use node::{Node, NodeShape};
pub use parser::{parse, ParseResult};
pub use span::{LineCol, LineIndex, Span};
