//! Identity collaborator seam.
//!
//! The version presenter shows each snapshot's author as an email, but
//! identity itself is an external service. This trait keeps it an opaque,
//! injectable lookup so tests can stub it without a real backend.

use async_trait::async_trait;

use crate::types::DbId;

/// Fallback display label when an author's email cannot be resolved.
///
/// Resolution failure is a presentation concern, never an error.
pub const UNKNOWN_AUTHOR: &str = "unknown user";

/// Resolves an acting user's id to a display email.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// The email for `user_id`, or `None` when unresolved (missing row or
    /// lookup failure alike).
    async fn email_for(&self, user_id: DbId) -> Option<String>;
}
