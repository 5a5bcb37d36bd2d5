//! Repository for the `users` table, plus the Postgres-backed identity
//! lookup used by the version presenter.

use async_trait::async_trait;
use draftpad_core::identity::UserDirectory;
use draftpad_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across user queries.
const COLUMNS: &str = "id, username, email, created_at, updated_at";

/// Provides lookups over the identity service's local projection.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .fetch_one(pool)
            .await
    }

    /// Find a user by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

/// [`UserDirectory`] backed by the `users` table.
///
/// Lookup failures (missing row or query error) resolve to `None`; the
/// presenter substitutes its fallback label rather than failing the
/// version list.
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn email_for(&self, user_id: DbId) -> Option<String> {
        match UserRepo::find_by_id(&self.pool, user_id).await {
            Ok(user) => user.map(|u| u.email),
            Err(err) => {
                tracing::warn!(user_id, error = %err, "Author lookup failed");
                None
            }
        }
    }
}
