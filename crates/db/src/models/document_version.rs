//! Document version entity model and DTOs.

use draftpad_core::error::CoreError;
use draftpad_core::revision::ChangeKind;
use draftpad_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `document_versions` table -- an immutable snapshot of a
/// document's (title, content) at one point in time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentVersion {
    pub id: DbId,
    pub document_id: DbId,
    pub title: String,
    pub content: String,
    /// Wire string of [`ChangeKind`]; parse via
    /// [`change_kind`](DocumentVersion::change_kind).
    pub change_type: String,
    /// The acting user at snapshot time.
    pub user_id: DbId,
    pub created_at: Timestamp,
}

impl DocumentVersion {
    /// Parse the stored change type. The schema's CHECK constraint keeps
    /// this infallible for rows that actually came from the database.
    pub fn change_kind(&self) -> Result<ChangeKind, CoreError> {
        self.change_type.parse()
    }
}

/// DTO for appending a version snapshot to the log.
#[derive(Debug, Clone)]
pub struct NewDocumentVersion {
    pub document_id: DbId,
    pub title: String,
    pub content: String,
    pub change: ChangeKind,
    pub user_id: DbId,
}
