//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod document_repo;
pub mod document_version_repo;
pub mod user_repo;

pub use document_repo::{DocumentRepo, SaveOutcome};
pub use document_version_repo::DocumentVersionRepo;
pub use user_repo::{PgUserDirectory, UserRepo};
