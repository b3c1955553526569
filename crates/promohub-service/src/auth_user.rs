//! Authorized-user listing.

use std::sync::Arc;

use promohub_core::result::AppResult;
use promohub_database::repositories::AuthUserRepository;
use promohub_entity::auth_user::AuthUser;

/// Read-only access to the authorized-user reference list.
#[derive(Debug, Clone)]
pub struct AuthUserService {
    repo: Arc<AuthUserRepository>,
}

impl AuthUserService {
    pub fn new(repo: Arc<AuthUserRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_auth_users(&self) -> AppResult<Vec<AuthUser>> {
        self.repo.list().await
    }
}
