//! Debounced autosave loop.
//!
//! Edits accumulate locally; a save is issued only after a fixed quiet
//! period with no further edits, so rapid keystrokes coalesce into a
//! single write and a single version-recording evaluation. Each new edit
//! restarts the timer and replaces the pending payload. An in-flight save
//! is never cancelled; a failed save is retried only when the next edit
//! starts the next debounce cycle.

use std::sync::Arc;
use std::time::Duration;

use draftpad_core::types::DbId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::state::SharedEditorState;
use crate::store::DocumentStore;

/// Quiet period after the last edit before a save fires.
pub const AUTOSAVE_QUIET_PERIOD: Duration = Duration::from_secs(1);

/// A coalesced edit payload: the full live state at the time of the last
/// keystroke.
#[derive(Debug, Clone)]
pub struct PendingEdit {
    pub title: String,
    pub content: String,
}

/// Handle to the background debounce task.
///
/// Dropping the handle (or calling [`close`](Autosaver::close)) closes the
/// edit channel; the task flushes any pending edit and exits.
pub struct Autosaver {
    tx: mpsc::UnboundedSender<PendingEdit>,
    handle: JoinHandle<()>,
}

impl Autosaver {
    /// Spawn the debounce task for one open document.
    pub fn spawn(
        store: Arc<dyn DocumentStore>,
        state: SharedEditorState,
        document_id: DbId,
        quiet_period: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(store, state, document_id, quiet_period, rx));
        Self { tx, handle }
    }

    /// Queue an edit, restarting the debounce timer.
    pub fn submit(&self, edit: PendingEdit) {
        // The receiver only goes away when the task exits; at that point
        // the session is closing and the edit has nowhere to land anyway.
        let _ = self.tx.send(edit);
    }

    /// Close the edit channel and wait for the task to flush and exit.
    pub async fn close(self) {
        drop(self.tx);
        let _ = self.handle.await;
    }
}

async fn run(
    store: Arc<dyn DocumentStore>,
    state: SharedEditorState,
    document_id: DbId,
    quiet_period: Duration,
    mut rx: mpsc::UnboundedReceiver<PendingEdit>,
) {
    let mut pending: Option<PendingEdit> = None;

    loop {
        let edit = match pending.take() {
            // Idle: wait for the first edit of the next cycle.
            None => match rx.recv().await {
                Some(edit) => {
                    pending = Some(edit);
                    continue;
                }
                None => break,
            },
            // Debouncing: a newer edit restarts the timer, quiet period
            // elapsing flushes, channel close flushes immediately.
            Some(edit) => {
                tokio::select! {
                    next = rx.recv() => match next {
                        Some(next) => {
                            pending = Some(next);
                            continue;
                        }
                        None => edit,
                    },
                    () = tokio::time::sleep(quiet_period) => edit,
                }
            }
        };

        flush(store.as_ref(), &state, document_id, edit).await;
    }
}

/// Issue the save and fold the outcome into shared state.
async fn flush(
    store: &dyn DocumentStore,
    state: &SharedEditorState,
    document_id: DbId,
    edit: PendingEdit,
) {
    state.lock().unwrap().set_saving(true);

    match store
        .save_document(document_id, &edit.title, &edit.content)
        .await
    {
        Ok(outcome) => {
            tracing::debug!(
                document_id,
                recorded = outcome.version.is_some(),
                "Autosave completed"
            );
            state
                .lock()
                .unwrap()
                .record_saved(outcome.document, outcome.version);
        }
        Err(err) => {
            tracing::warn!(document_id, error = %err, "Autosave failed");
            state.lock().unwrap().set_error(err.to_string());
        }
    }
}
