//! Handlers for the `/documents` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use draftpad_core::error::CoreError;
use draftpad_core::preview::{plain_text, DEFAULT_PREVIEW_CHARS};
use draftpad_core::revision::validate_title;
use draftpad_core::types::{DbId, Timestamp};
use draftpad_db::models::document::{CreateDocument, Document, SaveDocument};
use draftpad_db::models::document_version::DocumentVersion;
use draftpad_db::repositories::DocumentRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// One row of the document list: full content replaced by a plain-text
/// preview.
#[derive(Debug, Serialize)]
pub struct DocumentListing {
    pub id: DbId,
    pub title: String,
    pub preview: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Response to a save: the updated document plus the version the
/// recording rule appended, if any.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub document: Document,
    /// `null` when the save changed nothing and no snapshot was recorded.
    pub version: Option<DocumentVersion>,
}

/// POST /api/v1/documents
///
/// Creates the document and its initial `created` version together.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateDocument>,
) -> AppResult<(StatusCode, Json<Document>)> {
    validate_title(&input.title)?;
    let (document, _version) = DocumentRepo::create(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// GET /api/v1/documents
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<DocumentListing>>> {
    let documents = DocumentRepo::list_for_user(&state.pool, user.user_id).await?;
    let listings = documents
        .into_iter()
        .map(|d| DocumentListing {
            id: d.id,
            title: d.title,
            preview: plain_text(&d.content, DEFAULT_PREVIEW_CHARS),
            created_at: d.created_at,
            updated_at: d.updated_at,
        })
        .collect();
    Ok(Json(listings))
}

/// GET /api/v1/documents/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Document>> {
    let document = DocumentRepo::find_by_id(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }))?;
    Ok(Json(document))
}

/// PUT /api/v1/documents/{id}
///
/// The autosave endpoint. The repository evaluates the version-recording
/// rule inside the update transaction.
pub async fn save(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SaveDocument>,
) -> AppResult<Json<SaveResponse>> {
    let outcome = DocumentRepo::save(&state.pool, id, user.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }))?;
    Ok(Json(SaveResponse {
        document: outcome.document,
        version: outcome.version,
    }))
}

/// DELETE /api/v1/documents/{id}
///
/// Removes the document; its versions cascade with it.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = DocumentRepo::delete(&state.pool, id, user.user_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }))
    }
}
