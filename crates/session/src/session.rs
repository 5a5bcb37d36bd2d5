//! The editing session: one open document, its state container, and the
//! operations the editor UI invokes.

use std::sync::{Arc, Mutex};

use draftpad_core::error::CoreError;
use draftpad_core::history::{group_history, HistoryGroup};
use draftpad_core::identity::UserDirectory;
use draftpad_core::types::{DbId, Timestamp};
use draftpad_db::repositories::DocumentVersionRepo;

use crate::autosave::{Autosaver, PendingEdit, AUTOSAVE_QUIET_PERIOD};
use crate::state::{EditorState, SharedEditorState};
use crate::store::DocumentStore;

/// One open document being edited.
///
/// Owns the shared [`EditorState`] and the autosave task. All mutations of
/// client-side state flow through here.
pub struct EditorSession {
    document_id: DbId,
    store: Arc<dyn DocumentStore>,
    state: SharedEditorState,
    autosaver: Autosaver,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("document_id", &self.document_id)
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Open a document: load its live state and version log, then start
    /// the autosave loop.
    pub async fn open(
        store: Arc<dyn DocumentStore>,
        document_id: DbId,
    ) -> Result<Self, CoreError> {
        let state: SharedEditorState = Arc::new(Mutex::new(EditorState::new()));
        state.lock().unwrap().set_loading(true);

        let document = store.fetch_document(document_id).await?;
        let versions = store.list_versions(document_id).await?;

        {
            let mut state = state.lock().unwrap();
            state.set_document(document);
            state.set_versions(versions);
            state.set_loading(false);
        }

        let autosaver = Autosaver::spawn(
            Arc::clone(&store),
            Arc::clone(&state),
            document_id,
            AUTOSAVE_QUIET_PERIOD,
        );

        Ok(Self {
            document_id,
            store,
            state,
            autosaver,
        })
    }

    /// Apply a keystroke's worth of edit: update local state immediately
    /// and queue the debounced save.
    pub fn edit(&self, title: &str, content: &str) {
        self.state.lock().unwrap().apply_local_edit(title, content);
        self.autosaver.submit(PendingEdit {
            title: title.to_string(),
            content: content.to_string(),
        });
    }

    /// Restore a past version onto the live document, then refresh the
    /// version list so the new `restored` entry appears.
    pub async fn restore(&self, version_id: DbId) -> Result<(), CoreError> {
        let (document, _version) = match self
            .store
            .restore_version(self.document_id, version_id)
            .await
        {
            Ok(pair) => pair,
            Err(err) => {
                self.state.lock().unwrap().set_error(err.to_string());
                return Err(err);
            }
        };

        match self.store.list_versions(self.document_id).await {
            Ok(versions) => {
                let mut state = self.state.lock().unwrap();
                state.set_document(document);
                state.set_versions(versions);
                state.dismiss_error();
                Ok(())
            }
            Err(err) => {
                // The restore itself landed; only the refresh failed.
                let mut state = self.state.lock().unwrap();
                state.set_document(document);
                state.set_error(err.to_string());
                Err(err)
            }
        }
    }

    /// Day-grouped presenter view of the loaded version log.
    pub async fn history(
        &self,
        directory: &dyn UserDirectory,
        now: Timestamp,
    ) -> Result<Vec<HistoryGroup>, CoreError> {
        let versions = self.state.lock().unwrap().versions.clone();
        let summaries = DocumentVersionRepo::summarize(directory, versions).await?;
        Ok(group_history(summaries, now))
    }

    /// Snapshot of the current editor state.
    pub fn state(&self) -> EditorState {
        self.state.lock().unwrap().clone()
    }

    /// Dismiss the inline error message.
    pub fn dismiss_error(&self) {
        self.state.lock().unwrap().dismiss_error();
    }

    /// Flush any pending edit and stop the autosave task.
    pub async fn close(self) {
        self.autosaver.close().await;
    }
}
