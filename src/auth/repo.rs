use sqlx::SqlitePool;

use crate::auth::password;
use crate::auth::repo_types::{Role, User};
use crate::error::AppError;

impl User {
    /// Create a new account. The plaintext is hashed before it goes anywhere
    /// near the database; uniqueness is left to the UNIQUE constraint so two
    /// concurrent registrations cannot both win.
    pub async fn register(
        db: &SqlitePool,
        username: &str,
        plain_password: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let hash = password::hash_password(plain_password)?;
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password, role) VALUES (?, ?, ?) \
             RETURNING id, username, password, role, token",
        )
        .bind(username)
        .bind(hash.as_str())
        .bind(role)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_username(
        db: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, role, token FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Resolve "who is calling" for every protected operation.
    pub async fn find_by_token(db: &SqlitePool, token: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, role, token FROM users WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Admin capability; the caller layer decides who may ask.
    pub async fn list_all(db: &SqlitePool) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, password, role, token FROM users ORDER BY id",
        )
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    /// True iff a row was deleted. Users that still own donations are kept
    /// alive by ON DELETE RESTRICT and surface as ForeignKeyViolation.
    pub async fn remove(db: &SqlitePool, username: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Unconditionally overwrite the session slot. A single UPDATE, so a
    /// concurrent login can lose the race but never corrupt the row.
    pub async fn set_token(
        db: &SqlitePool,
        username: &str,
        token: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET token = ? WHERE username = ?")
            .bind(token)
            .bind(username)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Logout path: clear the slot of whichever user holds this token.
    /// One statement, so revocation is atomic and idempotent.
    pub async fn clear_token(db: &SqlitePool, token: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET token = NULL WHERE token = ?")
            .bind(token)
            .execute(db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn register_assigns_id_and_hashes_password() {
        let db = db::test_pool().await;
        let user = User::register(&db, "alice", "s3cret", Role::User)
            .await
            .expect("register");
        assert!(user.id > 0);
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "s3cret");
        assert_eq!(user.role, Role::User);
        assert!(user.token.is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let db = db::test_pool().await;
        User::register(&db, "alice", "x", Role::User)
            .await
            .expect("first register");
        let err = User::register(&db, "alice", "y", Role::User)
            .await
            .expect_err("second register must fail");
        assert!(matches!(err, AppError::DuplicateUsername));

        // Exactly one alice row survives.
        let users = User::list_all(&db).await.expect("list");
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "alice");
    }

    #[tokio::test]
    async fn roles_round_trip_through_the_store() {
        let db = db::test_pool().await;
        User::register(&db, "root", "pw", Role::Admin)
            .await
            .expect("register");
        let stored = User::find_by_username(&db, "root")
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(stored.role, Role::Admin);
        assert!(stored.is_admin());
    }

    #[tokio::test]
    async fn set_token_and_find_by_token() {
        let db = db::test_pool().await;
        User::register(&db, "bob", "pw", Role::User)
            .await
            .expect("register");

        User::set_token(&db, "bob", Some("tok-123"))
            .await
            .expect("set token");
        let found = User::find_by_token(&db, "tok-123")
            .await
            .expect("lookup")
            .expect("token resolves");
        assert_eq!(found.username, "bob");
        assert_eq!(found.token.as_deref(), Some("tok-123"));

        User::set_token(&db, "bob", None).await.expect("clear token");
        assert!(User::find_by_token(&db, "tok-123")
            .await
            .expect("lookup")
            .is_none());
    }

    #[tokio::test]
    async fn remove_reports_whether_a_row_was_deleted() {
        let db = db::test_pool().await;
        User::register(&db, "gone", "pw", Role::User)
            .await
            .expect("register");
        assert!(User::remove(&db, "gone").await.expect("remove"));
        assert!(!User::remove(&db, "gone").await.expect("second remove"));
        assert!(!User::remove(&db, "never-existed").await.expect("unknown remove"));
    }

    #[tokio::test]
    async fn find_by_username_is_none_for_unknown() {
        let db = db::test_pool().await;
        assert!(User::find_by_username(&db, "ghost")
            .await
            .expect("lookup")
            .is_none());
    }
}
