use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Application error taxonomy, shared by the repositories, the session
/// layer and the HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("username already exists")]
    DuplicateUsername,
    /// Covers both "no such user" and "wrong password"; callers must not be
    /// able to tell them apart.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Covers missing, empty and unknown tokens alike.
    #[error("invalid session")]
    InvalidSession,
    #[error("operation violates a foreign key constraint")]
    ForeignKeyViolation,
    #[error("not found")]
    NotFound,
    #[error("admin privileges required")]
    Forbidden,
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("database unreachable")]
    Connectivity(#[source] sqlx::Error),
    #[error("database error")]
    Database(#[source] sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Single classification point for storage errors. The schema carries
/// exactly one UNIQUE constraint (users.username) and one foreign key
/// (doacoes.userId), so every constraint failure maps to one variant.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(db) => match db.kind() {
                sqlx::error::ErrorKind::UniqueViolation => AppError::DuplicateUsername,
                sqlx::error::ErrorKind::ForeignKeyViolation => AppError::ForeignKeyViolation,
                // A delete blocked by ON DELETE RESTRICT runs through
                // SQLite's internal foreign-key triggers and reports
                // SQLITE_CONSTRAINT_TRIGGER, which kind() leaves as Other;
                // the message still names the failed constraint.
                _ if db.message().contains("FOREIGN KEY constraint failed") => {
                    AppError::ForeignKeyViolation
                }
                _ => AppError::Database(sqlx::Error::Database(db)),
            },
            e @ (sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed) => AppError::Connectivity(e),
            other => AppError::Database(other),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DuplicateUsername => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::InvalidSession => StatusCode::UNAUTHORIZED,
            AppError::ForeignKeyViolation => StatusCode::CONFLICT,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Infrastructure failures are surfaced verbatim in the log; the
        // response body stays generic.
        if status.is_server_error() {
            error!(error = ?self, "storage failure");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_mapping() {
        assert_eq!(AppError::DuplicateUsername.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidSession.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::ForeignKeyViolation.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::InvalidInput("descricao is required").status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::NotFound));
    }

    #[test]
    fn credential_and_session_errors_share_a_generic_display() {
        // No hint about which half of the check failed.
        assert_eq!(AppError::InvalidCredentials.to_string(), "invalid credentials");
        assert_eq!(AppError::InvalidSession.to_string(), "invalid session");
    }

    #[tokio::test]
    async fn both_foreign_key_failure_shapes_classify_alike() {
        let db = crate::db::test_pool().await;
        sqlx::query("INSERT INTO users (username, password) VALUES ('bob', 'h')")
            .execute(&db)
            .await
            .expect("seed user");
        sqlx::query("INSERT INTO doacoes (descricao, userId) VALUES ('arroz', 1)")
            .execute(&db)
            .await
            .expect("seed donation");

        // Child side: an insert referencing an absent owner.
        let child = sqlx::query("INSERT INTO doacoes (descricao, userId) VALUES ('leite', 999)")
            .execute(&db)
            .await
            .expect_err("owner 999 does not exist");
        assert!(matches!(AppError::from(child), AppError::ForeignKeyViolation));

        // Parent side: a delete blocked by RESTRICT arrives as a trigger
        // constraint and must classify the same way.
        let parent = sqlx::query("DELETE FROM users WHERE id = 1")
            .execute(&db)
            .await
            .expect_err("bob still owns a donation");
        assert!(matches!(AppError::from(parent), AppError::ForeignKeyViolation));
    }
}
