use sqlx::SqlitePool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::password;
use crate::auth::repo_types::User;
use crate::error::AppError;

/// Verify credentials and issue a fresh opaque token. The two failure
/// causes are logged apart but collapse into the same InvalidCredentials
/// for the caller, so usernames cannot be probed through the login route.
pub async fn login(
    db: &SqlitePool,
    username: &str,
    plain_password: &str,
) -> Result<(User, String), AppError> {
    let Some(mut user) = User::find_by_username(db, username).await? else {
        warn!(%username, "login attempt for unknown username");
        return Err(AppError::InvalidCredentials);
    };

    if !password::verify_password(plain_password, &user.password_hash) {
        warn!(%username, user_id = user.id, "login attempt with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    // A fresh login always mints a new token; whatever session the user had
    // before is revoked by the overwrite.
    let token = Uuid::new_v4().to_string();
    User::set_token(db, username, Some(&token)).await?;
    user.token = Some(token.clone());

    debug!(user_id = user.id, "session issued");
    Ok((user, token))
}

/// Resolve a presented token back to its user. Empty tokens never reach the
/// store: a logged-out row holds SQL NULL, which no bound value matches.
pub async fn authenticate(db: &SqlitePool, token: &str) -> Result<User, AppError> {
    if token.is_empty() {
        return Err(AppError::InvalidSession);
    }
    User::find_by_token(db, token)
        .await?
        .ok_or(AppError::InvalidSession)
}

/// Revoke a session. Idempotent: unknown or already-cleared tokens update
/// zero rows and that is fine.
pub async fn logout(db: &SqlitePool, token: &str) -> Result<(), AppError> {
    User::clear_token(db, token).await?;
    debug!("session cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::Role;
    use crate::db;

    #[tokio::test]
    async fn login_yields_a_token_that_authenticates() {
        let db = db::test_pool().await;
        User::register(&db, "bob", "pw123", Role::User)
            .await
            .expect("register");

        let (user, token) = login(&db, "bob", "pw123").await.expect("login");
        assert!(!token.is_empty());
        assert_eq!(user.token.as_deref(), Some(token.as_str()));

        let resolved = authenticate(&db, &token).await.expect("authenticate");
        assert_eq!(resolved.id, user.id);
        assert_eq!(resolved.username, "bob");
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let db = db::test_pool().await;
        User::register(&db, "bob", "pw123", Role::User)
            .await
            .expect("register");

        let unknown_user = login(&db, "ghost", "pw123").await.expect_err("must fail");
        let wrong_password = login(&db, "bob", "nope").await.expect_err("must fail");

        assert!(matches!(unknown_user, AppError::InvalidCredentials));
        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert_eq!(unknown_user.to_string(), wrong_password.to_string());
    }

    #[tokio::test]
    async fn logout_invalidates_and_is_idempotent() {
        let db = db::test_pool().await;
        User::register(&db, "bob", "pw123", Role::User)
            .await
            .expect("register");
        let (_, token) = login(&db, "bob", "pw123").await.expect("login");

        logout(&db, &token).await.expect("logout");
        let err = authenticate(&db, &token).await.expect_err("token is dead");
        assert!(matches!(err, AppError::InvalidSession));

        // Logging out twice, or an arbitrary unknown token, is a no-op.
        logout(&db, &token).await.expect("second logout");
        logout(&db, "never-issued").await.expect("unknown token logout");
    }

    #[tokio::test]
    async fn a_new_login_revokes_the_previous_token() {
        let db = db::test_pool().await;
        User::register(&db, "bob", "pw123", Role::User)
            .await
            .expect("register");

        let (_, first) = login(&db, "bob", "pw123").await.expect("first login");
        let (_, second) = login(&db, "bob", "pw123").await.expect("second login");
        assert_ne!(first, second);

        let err = authenticate(&db, &first).await.expect_err("old token dead");
        assert!(matches!(err, AppError::InvalidSession));
        assert_eq!(
            authenticate(&db, &second).await.expect("new token lives").username,
            "bob"
        );
    }

    #[tokio::test]
    async fn authenticate_rejects_empty_and_unknown_tokens() {
        let db = db::test_pool().await;
        assert!(matches!(
            authenticate(&db, "").await.expect_err("empty token"),
            AppError::InvalidSession
        ));
        assert!(matches!(
            authenticate(&db, "not-a-session").await.expect_err("unknown token"),
            AppError::InvalidSession
        ));
    }
}
