//! Auth-user repository.

use sqlx::PgPool;

use promohub_core::error::{AppError, ErrorKind};
use promohub_core::result::AppResult;
use promohub_entity::auth_user::AuthUser;

/// PostgreSQL repository for the read-only authorized-user list.
#[derive(Debug, Clone)]
pub struct AuthUserRepository {
    pool: PgPool,
}

impl AuthUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all authorized users, sorted by name.
    pub async fn list(&self) -> AppResult<Vec<AuthUser>> {
        sqlx::query_as::<_, AuthUser>("SELECT * FROM auth_users ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))
    }
}
