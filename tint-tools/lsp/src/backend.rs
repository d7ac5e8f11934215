//! LSP Backend Implementation
//!
//! The main language server that handles LSP requests and notifications.
//! Every request takes a snapshot of the document and re-analyzes it in
//! full; nothing is cached between requests.

use tintc::AnalysisResult;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, info};

use crate::analysis::{ColorProvider, DefinitionProvider, HoverProvider};
use crate::capabilities::{self, file_patterns};
use crate::completion::CompletionProvider;
use crate::diagnostics::DiagnosticEngine;
use crate::document::{Document, DocumentStore};
use crate::semantic_tokens::SemanticTokensProvider;

/// Language identifier clients use for Tint documents.
pub const LANGUAGE_ID: &str = "tint";

/// The Tint language server backend.
pub struct TintLanguageServer {
    /// The LSP client for sending notifications and requests.
    client: Client,
    /// Open documents indexed by URI.
    documents: DocumentStore,
    /// Diagnostic engine for error reporting.
    diagnostics: DiagnosticEngine,
    semantic_tokens: SemanticTokensProvider,
    hover_provider: HoverProvider,
    definition_provider: DefinitionProvider,
    color_provider: ColorProvider,
    completion_provider: CompletionProvider,
}

impl TintLanguageServer {
    /// Creates a new language server instance.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: DocumentStore::new(),
            diagnostics: DiagnosticEngine::new(),
            semantic_tokens: SemanticTokensProvider::new(),
            hover_provider: HoverProvider::new(),
            definition_provider: DefinitionProvider::new(),
            color_provider: ColorProvider::new(),
            completion_provider: CompletionProvider::new(),
        }
    }

    /// Snapshots a document and analyzes it.
    fn analyze(&self, uri: &Url) -> Option<(Document, AnalysisResult)> {
        let doc = self.documents.snapshot(uri)?;
        let result = tintc::analyze(&doc.text());
        Some((doc, result))
    }

    /// Validates a document and publishes diagnostics.
    async fn validate_document(&self, uri: &Url) {
        let Some((doc, result)) = self.analyze(uri) else {
            return;
        };

        let diagnostics = self.diagnostics.check(&doc, &result);
        debug!("Publishing {} diagnostics for {}", diagnostics.len(), uri);

        self.client
            .publish_diagnostics(uri.clone(), diagnostics, Some(doc.version()))
            .await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for TintLanguageServer {
    async fn initialize(&self, _params: InitializeParams) -> Result<InitializeResult> {
        info!("Initializing Tint language server");

        Ok(InitializeResult {
            capabilities: capabilities::server_capabilities(),
            server_info: Some(ServerInfo {
                name: "tint-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        info!("Tint language server initialized");

        self.client
            .log_message(MessageType::INFO, "Tint language server ready")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down Tint language server");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        if doc.language_id != LANGUAGE_ID && !file_patterns::is_tint_file(doc.uri.path()) {
            debug!("Ignoring non-Tint document: {}", doc.uri);
            return;
        }

        debug!("Document opened: {}", doc.uri);

        self.documents.open(doc.uri.clone(), doc.version, doc.text);
        self.validate_document(&doc.uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        debug!("Document changed: {}", uri);

        if self
            .documents
            .apply_changes(&uri, version, params.content_changes)
        {
            self.validate_document(&uri).await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        debug!("Document saved: {}", uri);

        self.validate_document(&uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        debug!("Document closed: {}", uri);

        if self.documents.close(&uri) {
            // Clear diagnostics
            self.client.publish_diagnostics(uri, vec![], None).await;
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        debug!("Hover request at {} line {} char {}", uri, position.line, position.character);

        let Some((doc, result)) = self.analyze(uri) else {
            return Ok(None);
        };

        Ok(self.hover_provider.hover(&doc, &result, position))
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        debug!("Go to definition at {} line {} char {}", uri, position.line, position.character);

        let Some((doc, result)) = self.analyze(uri) else {
            return Ok(None);
        };

        Ok(self
            .definition_provider
            .definition(&doc, &result, position)
            .map(GotoDefinitionResponse::Scalar))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        debug!("Completion request at {} line {} char {}", uri, position.line, position.character);

        let Some((doc, result)) = self.analyze(uri) else {
            return Ok(None);
        };

        let items = self.completion_provider.complete(&doc, &result, position);
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        let uri = &params.text_document.uri;

        debug!("Semantic tokens request for {}", uri);

        let Some(text) = self.documents.get(uri) else {
            return Ok(None);
        };

        let tokens = self.semantic_tokens.provide(&text);

        Ok(Some(SemanticTokensResult::Tokens(tokens)))
    }

    async fn document_color(&self, params: DocumentColorParams) -> Result<Vec<ColorInformation>> {
        let uri = &params.text_document.uri;

        debug!("Document color request for {}", uri);

        let Some((doc, result)) = self.analyze(uri) else {
            return Ok(Vec::new());
        };

        Ok(self.color_provider.document_colors(&doc, &result))
    }

    async fn color_presentation(
        &self,
        params: ColorPresentationParams,
    ) -> Result<Vec<ColorPresentation>> {
        let uri = &params.text_document.uri;

        debug!("Color presentation request for {}", uri);

        let Some(doc) = self.documents.snapshot(uri) else {
            return Ok(Vec::new());
        };

        Ok(self
            .color_provider
            .color_presentation(&doc, params.range, params.color))
    }
}
