//! Tint Language Server Protocol Implementation
//!
//! This crate provides an LSP server for Tint theme files, enabling IDE
//! features like:
//!
//! - Error diagnostics
//! - Completion of palette paths, functions and block members
//! - Hover with resolved colors
//! - Go to definition
//! - Document colors and the color picker
//! - Syntax highlighting (semantic tokens)
//!
//! # Architecture
//!
//! The LSP server uses tower-lsp for the protocol handling and integrates
//! with tintc for parsing and semantic analysis.
//!
//! ```text
//! ┌─────────┐    ┌──────────────┐    ┌─────────┐
//! │  IDE    │◄──►│   tint-lsp   │◄──►│  tintc  │
//! │ Client  │    │    Server    │    │Analyzer │
//! └─────────┘    └──────────────┘    └─────────┘
//! ```

pub mod analysis;
pub mod backend;
pub mod capabilities;
pub mod completion;
pub mod diagnostics;
pub mod document;
pub mod semantic_tokens;

use tower_lsp::{LspService, Server};
use tracing::info;

pub use backend::TintLanguageServer;

/// Runs the Tint language server.
///
/// This is the main entry point for the LSP binary.
pub async fn run_server() -> anyhow::Result<()> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(TintLanguageServer::new);

    info!("Starting Tint language server");
    Server::new(stdin, stdout, socket).serve(service).await;
    info!("Tint language server stopped");

    Ok(())
}
