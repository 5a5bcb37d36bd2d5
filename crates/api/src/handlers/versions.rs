//! Handlers for the version log, nested under documents:
//! `/documents/{document_id}/versions[/{id}]` and
//! `/documents/{document_id}/history`.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use draftpad_core::error::CoreError;
use draftpad_core::history::{group_history, HistoryEntry, HistoryGroup};
use draftpad_core::types::DbId;
use draftpad_db::models::document::Document;
use draftpad_db::models::document_version::DocumentVersion;
use draftpad_db::repositories::{DocumentRepo, DocumentVersionRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Response to a restore: the overwritten document and the new `restored`
/// version. The caller refreshes its version list with this entry on top.
#[derive(Debug, Serialize)]
pub struct RestoreResponse {
    pub document: Document,
    pub version: DocumentVersion,
}

/// Confirm the document exists and belongs to the acting user.
async fn require_document(
    state: &AppState,
    user: &AuthUser,
    document_id: DbId,
) -> AppResult<Document> {
    DocumentRepo::find_by_id(&state.pool, document_id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id: document_id,
        }))
}

/// GET /api/v1/documents/{document_id}/versions
///
/// Flat list, newest first, with authors resolved for display.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(document_id): Path<DbId>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    require_document(&state, &user, document_id).await?;

    let versions = DocumentVersionRepo::list_by_document(&state.pool, document_id).await?;
    let summaries = DocumentVersionRepo::summarize(state.directory.as_ref(), versions).await?;

    let now = Utc::now();
    let entries = summaries
        .into_iter()
        .map(|summary| HistoryEntry::from_summary(summary, now))
        .collect();
    Ok(Json(entries))
}

/// GET /api/v1/documents/{document_id}/history
///
/// The day-grouped presenter view: "Today", "Yesterday", weekday names,
/// then absolute dates, each group newest-first.
pub async fn history(
    State(state): State<AppState>,
    user: AuthUser,
    Path(document_id): Path<DbId>,
) -> AppResult<Json<Vec<HistoryGroup>>> {
    require_document(&state, &user, document_id).await?;

    let versions = DocumentVersionRepo::list_by_document(&state.pool, document_id).await?;
    let summaries = DocumentVersionRepo::summarize(state.directory.as_ref(), versions).await?;

    Ok(Json(group_history(summaries, Utc::now())))
}

/// GET /api/v1/documents/{document_id}/versions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((document_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DocumentVersion>> {
    require_document(&state, &user, document_id).await?;

    let version = DocumentVersionRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|v| v.document_id == document_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DocumentVersion",
            id,
        }))?;
    Ok(Json(version))
}

/// POST /api/v1/documents/{document_id}/versions/{id}/restore
///
/// Copies the version's (title, content) back onto the live document and
/// appends a `restored` version -- unconditionally, even when the snapshot
/// matches the live state, so every restore is auditable. The two storage
/// writes are separate calls; a failure in between is visible, not rolled
/// back.
pub async fn restore(
    State(state): State<AppState>,
    user: AuthUser,
    Path((document_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<RestoreResponse>> {
    require_document(&state, &user, document_id).await?;

    let snapshot = DocumentVersionRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|v| v.document_id == document_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DocumentVersion",
            id,
        }))?;

    let (document, version) =
        DocumentRepo::restore_from_version(&state.pool, document_id, user.user_id, &snapshot)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Document",
                id: document_id,
            }))?;

    tracing::info!(document_id, version_id = version.id, "Document restored");
    Ok(Json(RestoreResponse { document, version }))
}
