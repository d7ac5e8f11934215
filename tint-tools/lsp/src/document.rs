//! Document Management
//!
//! Open text documents and the concurrent store that holds them.

use dashmap::DashMap;
use ropey::Rope;
use tintc::Span;
use tower_lsp::lsp_types::*;

/// An open text document in the editor.
#[derive(Debug, Clone)]
pub struct Document {
    /// The document URI.
    uri: Url,
    /// Document version (increments on each change).
    version: i32,
    /// The document content as a rope for efficient editing.
    content: Rope,
}

impl Document {
    /// Creates a new document from initial text.
    pub fn new(uri: Url, version: i32, text: String) -> Self {
        Self {
            uri,
            version,
            content: Rope::from_str(&text),
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// Returns the full document text.
    pub fn text(&self) -> String {
        self.content.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.content.len_lines()
    }

    /// Returns the text of a line without its line ending.
    pub fn line(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.content.len_lines() {
            return None;
        }
        let line = self.content.line(line_idx).to_string();
        Some(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Replaces the whole text.
    pub fn set_text(&mut self, version: i32, text: &str) {
        self.version = version;
        self.content = Rope::from_str(text);
    }

    /// Applies a text change to the document.
    pub fn apply_change(&mut self, version: i32, change: TextDocumentContentChangeEvent) {
        self.version = version;

        match change.range {
            Some(range) => {
                let start = self.position_to_char(range.start);
                let end = self.position_to_char(range.end);

                if let (Some(start), Some(end)) = (start, end) {
                    if start <= end {
                        self.content.remove(start..end);
                        self.content.insert(start, &change.text);
                    }
                }
            }
            None => {
                self.content = Rope::from_str(&change.text);
            }
        }
    }

    /// Converts an LSP position to a char index, clamping to the line end.
    fn position_to_char(&self, position: Position) -> Option<usize> {
        let line_idx = position.line as usize;
        if line_idx >= self.content.len_lines() {
            return None;
        }

        let line_start = self.content.line_to_char(line_idx);
        let line = self.content.line(line_idx);
        let mut line_len = line.len_chars();
        // Do not let the cursor land on the line terminator.
        if line_len > 0 && line.char(line_len - 1) == '\n' {
            line_len -= 1;
        }

        Some(line_start + (position.character as usize).min(line_len))
    }

    /// Converts an LSP position to a byte offset.
    pub fn position_to_offset(&self, position: Position) -> Option<usize> {
        let char_idx = self.position_to_char(position)?;
        Some(self.content.char_to_byte(char_idx))
    }

    /// Converts a byte offset to an LSP position.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let char_idx = self.content.byte_to_char(offset.min(self.content.len_bytes()));
        let line_idx = self.content.char_to_line(char_idx);
        let line_start = self.content.line_to_char(line_idx);

        Position {
            line: line_idx as u32,
            character: (char_idx - line_start) as u32,
        }
    }

    pub fn span_to_range(&self, span: Span) -> Range {
        Range {
            start: self.offset_to_position(span.start),
            end: self.offset_to_position(span.end),
        }
    }

    /// Returns the text covered by `range`.
    pub fn range_text(&self, range: Range) -> Option<String> {
        let start = self.position_to_char(range.start)?;
        let end = self.position_to_char(range.end)?;
        if start > end {
            return None;
        }
        Some(self.content.slice(start..end).to_string())
    }

    /// Returns the dotted identifier path touching the given position
    /// (e.g., "palette.highlight.low").
    pub fn identifier_path_at_position(&self, position: Position) -> Option<IdentifierPath> {
        let char_idx = self.position_to_char(position)?;

        let mut start = char_idx;
        let mut end = char_idx;

        while start > 0 && is_path_char(self.content.char(start - 1)) {
            start -= 1;
        }
        while end < self.content.len_chars() && is_path_char(self.content.char(end)) {
            end += 1;
        }

        if start == end {
            return None;
        }

        let full_path: String = self.content.slice(start..end).chars().collect();
        let segments: Vec<String> = full_path.split('.').map(String::from).collect();
        if segments.iter().all(String::is_empty) {
            return None;
        }

        Some(IdentifierPath {
            full_path,
            segments,
            cursor: char_idx - start,
        })
    }
}

/// A dotted path of identifiers under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierPath {
    /// The full path as written.
    pub full_path: String,
    /// Individual path segments, empty where dots are doubled or trailing.
    pub segments: Vec<String>,
    /// Cursor position within `full_path`, in chars.
    pub cursor: usize,
}

impl IdentifierPath {
    /// The path up to and including the segment the cursor is in or touching.
    pub fn prefix_at_cursor(&self) -> String {
        let mut end = 0;
        let mut taken = Vec::new();
        for segment in &self.segments {
            let start = if taken.is_empty() { 0 } else { end + 1 };
            end = start + segment.chars().count();
            taken.push(segment.as_str());
            if self.cursor <= end {
                break;
            }
        }
        taken.join(".")
    }
}

/// Checks if a character can be part of a dotted Tint path.
fn is_path_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

/// Open documents indexed by URI.
///
/// Every request works on a snapshot taken from the store, so later edits
/// never affect a request already in flight.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<Url, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, uri: Url, version: i32, text: String) {
        let doc = Document::new(uri.clone(), version, text);
        self.documents.insert(uri, doc);
    }

    /// Replaces the text of `uri`, opening it if it is not open yet.
    pub fn update(&self, uri: Url, version: i32, text: String) {
        if let Some(mut doc) = self.documents.get_mut(&uri) {
            doc.set_text(version, &text);
            return;
        }
        self.open(uri, version, text);
    }

    /// Applies editor change events in order. Returns false if the document
    /// is not open.
    pub fn apply_changes(
        &self,
        uri: &Url,
        version: i32,
        changes: impl IntoIterator<Item = TextDocumentContentChangeEvent>,
    ) -> bool {
        let Some(mut doc) = self.documents.get_mut(uri) else {
            return false;
        };
        for change in changes {
            doc.apply_change(version, change);
        }
        true
    }

    /// Removes `uri`. Returns whether it was open.
    pub fn close(&self, uri: &Url) -> bool {
        self.documents.remove(uri).is_some()
    }

    /// Returns a copy of the current text.
    pub fn get(&self, uri: &Url) -> Option<String> {
        self.documents.get(uri).map(|doc| doc.text())
    }

    /// Returns a copy of the whole document.
    pub fn snapshot(&self, uri: &Url) -> Option<Document> {
        self.documents.get(uri).map(|doc| doc.clone())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
