//! Repository for the `document_versions` table.
//!
//! The log is append-only: nothing here updates or deletes version rows.
//! Removal happens only through the schema's cascade when the owning
//! document is deleted.

use std::collections::HashMap;

use draftpad_core::error::CoreError;
use draftpad_core::history::VersionSummary;
use draftpad_core::identity::{UserDirectory, UNKNOWN_AUTHOR};
use draftpad_core::types::DbId;
use sqlx::PgPool;

use crate::models::document_version::{DocumentVersion, NewDocumentVersion};

/// Column list shared across version queries.
const COLUMNS: &str = "id, document_id, title, content, change_type, user_id, created_at";

/// Query surface over the append-only version log.
pub struct DocumentVersionRepo;

impl DocumentVersionRepo {
    /// Append an immutable snapshot. Storage errors propagate to the
    /// caller; there is no silent-failure path.
    pub async fn append(
        pool: &PgPool,
        input: &NewDocumentVersion,
    ) -> Result<DocumentVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO document_versions (document_id, title, content, change_type, user_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(input.document_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.change.as_str())
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// All versions for a document, newest first. Creation-time ties break
    /// by insertion order (`id` is assigned monotonically).
    pub async fn list_by_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<DocumentVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM document_versions
             WHERE document_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }

    /// Find a version by its primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DocumentVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM document_versions WHERE id = $1");
        sqlx::query_as::<_, DocumentVersion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Join version rows with their authors' display emails.
    ///
    /// Lookups that fail get the fallback label rather than failing the
    /// list. Errors only surface for rows whose stored change type does
    /// not parse, which the schema constraint rules out in practice.
    pub async fn summarize(
        directory: &dyn UserDirectory,
        versions: Vec<DocumentVersion>,
    ) -> Result<Vec<VersionSummary>, CoreError> {
        let mut emails: HashMap<DbId, String> = HashMap::new();
        let mut summaries = Vec::with_capacity(versions.len());

        for version in versions {
            let author = match emails.get(&version.user_id) {
                Some(email) => email.clone(),
                None => {
                    let email = directory
                        .email_for(version.user_id)
                        .await
                        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
                    emails.insert(version.user_id, email.clone());
                    email
                }
            };

            summaries.push(VersionSummary {
                id: version.id,
                change: version.change_kind()?,
                title: version.title,
                author,
                created_at: version.created_at,
            });
        }

        Ok(summaries)
    }

    /// Count the versions recorded for a document.
    pub async fn count_for_document(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM document_versions WHERE document_id = $1")
                .bind(document_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
