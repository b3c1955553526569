//! Auth-user entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An entry in the read-only authorized-user reference list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuthUser {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Department name.
    pub department: Option<String>,
}
