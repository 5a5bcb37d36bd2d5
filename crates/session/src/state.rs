//! Explicit owned editor state.
//!
//! All client-side mutable state lives in one container mutated through
//! named setter operations -- no ambient globals. The session shares it
//! behind a mutex with the autosave task.

use std::sync::{Arc, Mutex};

use draftpad_db::models::document::Document;
use draftpad_db::models::document_version::DocumentVersion;

/// Editor state shared between the session and the autosave task.
///
/// A blocking mutex is fine here: holders only copy fields in and out,
/// never await.
pub type SharedEditorState = Arc<Mutex<EditorState>>;

/// The editor's view of one open document.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    /// The live document as last confirmed by storage, with local edits
    /// applied on top (the in-flight window before autosave lands).
    pub document: Option<Document>,
    /// Version log, newest first.
    pub versions: Vec<DocumentVersion>,
    /// An initial load is in progress.
    pub loading: bool,
    /// A save is in flight.
    pub saving: bool,
    /// Dismissible error message from the last failed operation.
    pub error: Option<String>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_document(&mut self, document: Document) {
        self.document = Some(document);
    }

    pub fn set_versions(&mut self, versions: Vec<DocumentVersion>) {
        self.versions = versions;
    }

    /// Apply a local edit ahead of its save landing.
    pub fn apply_local_edit(&mut self, title: &str, content: &str) {
        if let Some(document) = self.document.as_mut() {
            document.title = title.to_string();
            document.content = content.to_string();
        }
    }

    pub fn set_saving(&mut self, saving: bool) {
        self.saving = saving;
    }

    /// Record a completed save: adopt the stored document and prepend the
    /// recorded version, if one was warranted. Clears any stale error.
    pub fn record_saved(&mut self, document: Document, version: Option<DocumentVersion>) {
        self.document = Some(document);
        if let Some(version) = version {
            self.versions.insert(0, version);
        }
        self.saving = false;
        self.error = None;
    }

    /// Surface a failed operation. The message stays until dismissed or a
    /// later operation succeeds.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.saving = false;
        self.loading = false;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
