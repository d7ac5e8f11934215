//! LSP Server Capabilities
//!
//! Defines what features the Tint language server supports.

use tower_lsp::lsp_types::*;

use crate::semantic_tokens;

/// Returns the server capabilities for the Tint language server.
pub fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        // Text document sync
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::INCREMENTAL),
                will_save: Some(false),
                will_save_wait_until: Some(false),
                save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                    include_text: Some(false),
                })),
            },
        )),

        hover_provider: Some(HoverProviderCapability::Simple(true)),

        completion_provider: Some(CompletionOptions {
            resolve_provider: Some(false),
            trigger_characters: Some(
                triggers::COMPLETION.iter().map(|t| t.to_string()).collect(),
            ),
            all_commit_characters: None,
            work_done_progress_options: WorkDoneProgressOptions::default(),
            completion_item: None,
        }),

        definition_provider: Some(OneOf::Left(true)),

        // Swatches and the color picker
        color_provider: Some(ColorProviderCapability::Simple(true)),

        semantic_tokens_provider: Some(
            SemanticTokensServerCapabilities::SemanticTokensOptions(SemanticTokensOptions {
                work_done_progress_options: WorkDoneProgressOptions::default(),
                legend: semantic_tokens::legend(),
                range: Some(false),
                full: Some(SemanticTokensFullOptions::Bool(true)),
            }),
        ),

        ..Default::default()
    }
}

/// Tint-specific trigger characters for completions.
pub mod triggers {
    /// `.` continues a palette path, `=` starts a value.
    pub const COMPLETION: &[&str] = &[".", "="];
}

/// File patterns the Tint LSP handles.
pub mod file_patterns {
    /// Tint source file extension.
    pub const TINT_EXT: &str = ".tint";

    /// Check if a file path is a Tint source file.
    pub fn is_tint_file(path: &str) -> bool {
        path.ends_with(TINT_EXT)
    }
}
