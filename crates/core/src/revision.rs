//! Version recording rule for document saves.
//!
//! Every save is classified against the state it replaces. The rule lives
//! here as a pure function so it can be unit tested without a database;
//! the persistence layer evaluates it inside the same transaction as the
//! document update so the decision always reads the state immediately
//! prior to the write.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Reason category attached to a recorded document version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// First-ever write of the document.
    Created,
    /// Only the title changed.
    TitleUpdated,
    /// The content changed (possibly alongside the title).
    ContentModified,
    /// Snapshot appended by an explicit restore.
    Restored,
}

impl ChangeKind {
    /// Stable wire string stored in `document_versions.change_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::TitleUpdated => "title_updated",
            ChangeKind::ContentModified => "content_modified",
            ChangeKind::Restored => "restored",
        }
    }

    /// Fixed human-readable description shown next to a history entry.
    pub fn description(self) -> &'static str {
        match self {
            ChangeKind::Created => "Document created",
            ChangeKind::TitleUpdated => "Title changed",
            ChangeKind::ContentModified => "Content edited",
            ChangeKind::Restored => "Restored from previous version",
        }
    }
}

impl FromStr for ChangeKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(ChangeKind::Created),
            "title_updated" => Ok(ChangeKind::TitleUpdated),
            "content_modified" => Ok(ChangeKind::ContentModified),
            "restored" => Ok(ChangeKind::Restored),
            other => Err(CoreError::Validation(format!(
                "Unknown change type '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide whether a save warrants a new version snapshot, and of what kind.
///
/// `previous` is the (title, content) pair the save replaces, or `None` for
/// the document's first-ever write. Rules are evaluated in order, first
/// match wins:
///
/// 1. first write -> [`ChangeKind::Created`]
/// 2. title and content both differ -> [`ChangeKind::ContentModified`]
///    (a content change suppresses the title-only distinction)
/// 3. only the title differs -> [`ChangeKind::TitleUpdated`]
/// 4. only the content differs -> [`ChangeKind::ContentModified`]
/// 5. nothing differs -> `None`, no snapshot
///
/// [`ChangeKind::Restored`] is never produced here; only the explicit
/// restore operation records it, unconditionally.
pub fn classify_change(
    previous: Option<(&str, &str)>,
    title: &str,
    content: &str,
) -> Option<ChangeKind> {
    let Some((prev_title, prev_content)) = previous else {
        return Some(ChangeKind::Created);
    };

    let title_changed = prev_title != title;
    let content_changed = prev_content != content;

    match (title_changed, content_changed) {
        (_, true) => Some(ChangeKind::ContentModified),
        (true, false) => Some(ChangeKind::TitleUpdated),
        (false, false) => None,
    }
}

/// Reject empty or whitespace-only titles at document creation.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        Err(CoreError::Validation(
            "Title must not be empty".to_string(),
        ))
    } else {
        Ok(())
    }
}
