use crate::types::DbId;

/// Domain error taxonomy.
///
/// Database-level failures surface as `sqlx::Error` in the persistence
/// layer; [`CoreError::Storage`] carries them across the `DocumentStore`
/// seam where the concrete error type is erased.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(String),
}
