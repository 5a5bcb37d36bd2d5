//! Document entity model and DTOs.

use draftpad_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `documents` table -- the live, mutable document.
///
/// Exactly one row exists per document id; saves and restores mutate it in
/// place while the version log records the history.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    /// Rich-text markup, stored and compared as an opaque string.
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new document.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocument {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// DTO for saving a document's live state (the autosave payload).
///
/// Carries the full state: the debounce loop coalesces keystrokes, so a
/// save always reflects the most recent title and content together.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveDocument {
    pub title: String,
    pub content: String,
}
