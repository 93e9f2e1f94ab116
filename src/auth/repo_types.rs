use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Access level. Stored as TEXT ('USER' / 'ADMIN') in the role column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[sqlx(rename = "password")]
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub role: Role,
    #[serde(skip_serializing)]
    pub token: Option<String>, // current session; None means logged out
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
