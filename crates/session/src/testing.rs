//! In-memory [`DocumentStore`] stub for session tests.
//!
//! Applies the same version-recording rule as the real backend (via
//! [`classify_change`]) so session tests observe realistic version logs
//! without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use draftpad_core::error::CoreError;
use draftpad_core::revision::{classify_change, ChangeKind};
use draftpad_core::types::DbId;
use draftpad_db::models::document::Document;
use draftpad_db::models::document_version::DocumentVersion;
use draftpad_db::repositories::SaveOutcome;

use crate::store::DocumentStore;

const TEST_USER_ID: DbId = 7;

#[derive(Default)]
struct Inner {
    documents: HashMap<DbId, Document>,
    versions: Vec<DocumentVersion>,
    next_version_id: DbId,
}

pub(crate) struct MemoryStore {
    inner: Mutex<Inner>,
    fail_next_save: AtomicBool,
    save_attempts: AtomicUsize,
}

impl MemoryStore {
    /// A store holding one document with its initial `created` version,
    /// mirroring what the backend's create operation produces.
    pub fn with_document(id: DbId, title: &str, content: &str) -> Self {
        let store = Self {
            inner: Mutex::new(Inner {
                next_version_id: 1,
                ..Inner::default()
            }),
            fail_next_save: AtomicBool::new(false),
            save_attempts: AtomicUsize::new(0),
        };
        {
            let mut inner = store.inner.lock().unwrap();
            let now = Utc::now();
            inner.documents.insert(
                id,
                Document {
                    id,
                    user_id: TEST_USER_ID,
                    title: title.to_string(),
                    content: content.to_string(),
                    created_at: now,
                    updated_at: now,
                },
            );
            push_version(&mut inner, id, title, content, ChangeKind::Created);
        }
        store
    }

    /// Make the next `save_document` call fail with a storage error.
    pub fn fail_next_save(&self) {
        self.fail_next_save.store(true, Ordering::SeqCst);
    }

    /// Number of save attempts, successful or not.
    pub fn save_count(&self) -> usize {
        self.save_attempts.load(Ordering::SeqCst)
    }

    pub fn document(&self, id: DbId) -> Document {
        self.inner.lock().unwrap().documents[&id].clone()
    }

    pub fn version_count(&self, document_id: DbId) -> usize {
        self.inner
            .lock()
            .unwrap()
            .versions
            .iter()
            .filter(|v| v.document_id == document_id)
            .count()
    }
}

fn push_version(
    inner: &mut Inner,
    document_id: DbId,
    title: &str,
    content: &str,
    kind: ChangeKind,
) -> DocumentVersion {
    let version = DocumentVersion {
        id: inner.next_version_id,
        document_id,
        title: title.to_string(),
        content: content.to_string(),
        change_type: kind.as_str().to_string(),
        user_id: TEST_USER_ID,
        created_at: Utc::now(),
    };
    inner.next_version_id += 1;
    inner.versions.push(version.clone());
    version
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch_document(&self, id: DbId) -> Result<Document, CoreError> {
        self.inner
            .lock()
            .unwrap()
            .documents
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "Document",
                id,
            })
    }

    async fn save_document(
        &self,
        id: DbId,
        title: &str,
        content: &str,
    ) -> Result<SaveOutcome, CoreError> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_save.swap(false, Ordering::SeqCst) {
            return Err(CoreError::Storage("injected save failure".to_string()));
        }

        let mut inner = self.inner.lock().unwrap();
        let previous = inner.documents.get(&id).cloned().ok_or(CoreError::NotFound {
            entity: "Document",
            id,
        })?;

        let kind = classify_change(
            Some((previous.title.as_str(), previous.content.as_str())),
            title,
            content,
        );

        let document = inner.documents.get_mut(&id).expect("checked above");
        document.title = title.to_string();
        document.content = content.to_string();
        document.updated_at = Utc::now();
        let document = document.clone();

        let version = kind.map(|kind| push_version(&mut inner, id, title, content, kind));

        Ok(SaveOutcome { document, version })
    }

    async fn list_versions(&self, document_id: DbId) -> Result<Vec<DocumentVersion>, CoreError> {
        let inner = self.inner.lock().unwrap();
        let mut versions: Vec<DocumentVersion> = inner
            .versions
            .iter()
            .filter(|v| v.document_id == document_id)
            .cloned()
            .collect();
        versions.reverse(); // insertion order -> newest first
        Ok(versions)
    }

    async fn restore_version(
        &self,
        document_id: DbId,
        version_id: DbId,
    ) -> Result<(Document, DocumentVersion), CoreError> {
        let mut inner = self.inner.lock().unwrap();
        let snapshot = inner
            .versions
            .iter()
            .find(|v| v.id == version_id && v.document_id == document_id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "DocumentVersion",
                id: version_id,
            })?;

        let document = inner
            .documents
            .get_mut(&document_id)
            .ok_or(CoreError::NotFound {
                entity: "Document",
                id: document_id,
            })?;
        document.title = snapshot.title.clone();
        document.content = snapshot.content.clone();
        document.updated_at = Utc::now();
        let document = document.clone();

        let restored = push_version(
            &mut inner,
            document_id,
            &snapshot.title,
            &snapshot.content,
            ChangeKind::Restored,
        );

        Ok((document, restored))
    }
}
