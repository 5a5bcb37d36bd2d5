pub mod documents;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /documents                                   list, create
/// /documents/{id}                              get, save (PUT), delete
/// /documents/{id}/history                      day-grouped version view
/// /documents/{id}/versions                     flat version list
/// /documents/{id}/versions/{id}                get one version
/// /documents/{id}/versions/{id}/restore        restore (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/documents", documents::router())
}
