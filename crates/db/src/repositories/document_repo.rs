//! Repository for the `documents` table.
//!
//! The save path is where version recording happens: the previous state is
//! read under a row lock, the update applied, and the snapshot appended --
//! all in one transaction -- so the recording decision always sees the
//! state the save replaces.

use draftpad_core::revision::{classify_change, ChangeKind};
use draftpad_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::{CreateDocument, Document, SaveDocument};
use crate::models::document_version::DocumentVersion;

/// Column list shared across document queries.
const COLUMNS: &str = "id, user_id, title, content, created_at, updated_at";

/// Column list for version rows returned from the insert statements here.
const VERSION_COLUMNS: &str = "id, document_id, title, content, change_type, user_id, created_at";

/// Outcome of a save: the updated document plus the version snapshot the
/// recording rule appended, if any.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub document: Document,
    /// `None` when neither title nor content differed from the previous
    /// state (no snapshot recorded).
    pub version: Option<DocumentVersion>,
}

/// Provides CRUD and version-recording operations for documents.
///
/// All reads and writes are scoped by `user_id`, mirroring the storage
/// service's row-ownership policy.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert a new document together with its initial `created` version.
    ///
    /// Both rows land in one transaction so no document ever exists
    /// without a version.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateDocument,
    ) -> Result<(Document, DocumentVersion), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO documents (user_id, title, content)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let document = sqlx::query_as::<_, Document>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.content)
            .fetch_one(&mut *tx)
            .await?;

        let version = insert_version(
            &mut tx,
            document.id,
            &document.title,
            &document.content,
            ChangeKind::Created,
            user_id,
        )
        .await?;

        tx.commit().await?;
        Ok((document, version))
    }

    /// Find a document by id, scoped to its owner.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's documents, most recently updated first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE user_id = $1
             ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Save the live state, evaluating the version-recording rule inside
    /// the same transaction as the update.
    ///
    /// The previous (title, content) is read with `FOR UPDATE` so the rule
    /// never sees a state a concurrent writer is replacing. Returns `None`
    /// if the document does not exist (or belongs to another user).
    pub async fn save(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &SaveDocument,
    ) -> Result<Option<SaveOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let previous: Option<(String, String)> = sqlx::query_as(
            "SELECT title, content FROM documents
             WHERE id = $1 AND user_id = $2
             FOR UPDATE",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((prev_title, prev_content)) = previous else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE documents
             SET title = $3, content = $4, updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        let document = sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.content)
            .fetch_one(&mut *tx)
            .await?;

        let kind = classify_change(
            Some((prev_title.as_str(), prev_content.as_str())),
            &input.title,
            &input.content,
        );

        let version = match kind {
            Some(kind) => Some(
                insert_version(&mut tx, id, &input.title, &input.content, kind, user_id).await?,
            ),
            None => None,
        };

        tx.commit().await?;
        Ok(Some(SaveOutcome { document, version }))
    }

    /// Restore a document's live state from a version snapshot.
    ///
    /// Step one (overwrite the document) and step two (append the audit
    /// `restored` version) are separate storage calls, not a transaction:
    /// a failure in between leaves the overwrite visible without its audit
    /// row. The append is unconditional -- restoring the currently-live
    /// state still records a `restored` version.
    ///
    /// Returns `None` if the document does not exist for this user.
    pub async fn restore_from_version(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        snapshot: &DocumentVersion,
    ) -> Result<Option<(Document, DocumentVersion)>, sqlx::Error> {
        let query = format!(
            "UPDATE documents
             SET title = $3, content = $4, updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        let document = sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&snapshot.title)
            .bind(&snapshot.content)
            .fetch_optional(pool)
            .await?;

        let Some(document) = document else {
            return Ok(None);
        };

        let version_query = format!(
            "INSERT INTO document_versions (document_id, title, content, change_type, user_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {VERSION_COLUMNS}"
        );
        let version = sqlx::query_as::<_, DocumentVersion>(&version_query)
            .bind(id)
            .bind(&snapshot.title)
            .bind(&snapshot.content)
            .bind(ChangeKind::Restored.as_str())
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(Some((document, version)))
    }

    /// Delete a document. Its versions go with it via the cascade rule.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Append a version row inside an open transaction.
async fn insert_version(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    document_id: DbId,
    title: &str,
    content: &str,
    kind: ChangeKind,
    user_id: DbId,
) -> Result<DocumentVersion, sqlx::Error> {
    let query = format!(
        "INSERT INTO document_versions (document_id, title, content, change_type, user_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {VERSION_COLUMNS}"
    );
    sqlx::query_as::<_, DocumentVersion>(&query)
        .bind(document_id)
        .bind(title)
        .bind(content)
        .bind(kind.as_str())
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await
}
