//! Route definitions for documents and their version log.
//!
//! Mounted at `/documents` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{documents, versions};
use crate::state::AppState;

/// Document routes.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> save
/// DELETE /{id}                              -> delete
/// GET    /{id}/history                      -> versions::history
/// GET    /{id}/versions                     -> versions::list
/// GET    /{id}/versions/{version_id}        -> versions::get_by_id
/// POST   /{id}/versions/{version_id}/restore -> versions::restore
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(documents::list).post(documents::create))
        .route(
            "/{id}",
            get(documents::get_by_id)
                .put(documents::save)
                .delete(documents::delete),
        )
        .route("/{id}/history", get(versions::history))
        .route("/{id}/versions", get(versions::list))
        .route("/{id}/versions/{version_id}", get(versions::get_by_id))
        .route(
            "/{id}/versions/{version_id}/restore",
            post(versions::restore),
        )
}
