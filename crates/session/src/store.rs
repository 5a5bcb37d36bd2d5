//! Storage seam for the editing session.
//!
//! The session never talks to the database directly; it goes through
//! [`DocumentStore`] so tests can run against an in-memory stub and the
//! concrete backend stays swappable.

use async_trait::async_trait;
use draftpad_core::error::CoreError;
use draftpad_core::types::DbId;
use draftpad_db::models::document::{Document, SaveDocument};
use draftpad_db::models::document_version::DocumentVersion;
use draftpad_db::repositories::{DocumentRepo, DocumentVersionRepo, SaveOutcome};
use sqlx::PgPool;

/// Storage operations the editing session depends on.
///
/// Mutations are fire-and-forget from the editor's point of view: the
/// session awaits completion before updating its local view, but nothing
/// is rolled back on failure.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the live document.
    async fn fetch_document(&self, id: DbId) -> Result<Document, CoreError>;

    /// Persist the live state; the backend evaluates the version-recording
    /// rule as part of the write.
    async fn save_document(
        &self,
        id: DbId,
        title: &str,
        content: &str,
    ) -> Result<SaveOutcome, CoreError>;

    /// All versions for a document, newest first.
    async fn list_versions(&self, document_id: DbId) -> Result<Vec<DocumentVersion>, CoreError>;

    /// Copy a past version onto the live document and record the restore.
    async fn restore_version(
        &self,
        document_id: DbId,
        version_id: DbId,
    ) -> Result<(Document, DocumentVersion), CoreError>;
}

/// [`DocumentStore`] backed by the Postgres repositories, scoped to one
/// acting user.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    user_id: DbId,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool, user_id: DbId) -> Self {
        Self { pool, user_id }
    }
}

fn storage_error(err: sqlx::Error) -> CoreError {
    CoreError::Storage(err.to_string())
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn fetch_document(&self, id: DbId) -> Result<Document, CoreError> {
        DocumentRepo::find_by_id(&self.pool, id, self.user_id)
            .await
            .map_err(storage_error)?
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
        let input = SaveDocument {
            title: title.to_string(),
            content: content.to_string(),
        };
        DocumentRepo::save(&self.pool, id, self.user_id, &input)
            .await
            .map_err(storage_error)?
            .ok_or(CoreError::NotFound {
                entity: "Document",
                id,
            })
    }

    async fn list_versions(&self, document_id: DbId) -> Result<Vec<DocumentVersion>, CoreError> {
        DocumentVersionRepo::list_by_document(&self.pool, document_id)
            .await
            .map_err(storage_error)
    }

    async fn restore_version(
        &self,
        document_id: DbId,
        version_id: DbId,
    ) -> Result<(Document, DocumentVersion), CoreError> {
        let snapshot = DocumentVersionRepo::find_by_id(&self.pool, version_id)
            .await
            .map_err(storage_error)?
            .filter(|v| v.document_id == document_id)
            .ok_or(CoreError::NotFound {
                entity: "DocumentVersion",
                id: version_id,
            })?;

        DocumentRepo::restore_from_version(&self.pool, document_id, self.user_id, &snapshot)
            .await
            .map_err(storage_error)?
            .ok_or(CoreError::NotFound {
                entity: "Document",
                id: document_id,
            })
    }
}
