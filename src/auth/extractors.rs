use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::auth::repo_types::User;
use crate::auth::sessions;
use crate::error::AppError;
use crate::state::AppState;

/// Pulls the bearer token out of the Authorization header. Anything other
/// than a well-formed `Bearer <token>` header is an invalid session.
pub struct BearerToken(pub String);

#[async_trait]
impl FromRequestParts<AppState> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::InvalidSession)?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or(AppError::InvalidSession)?;

        Ok(BearerToken(token.to_owned()))
    }
}

/// Resolves the bearer token against the user directory, so handlers get
/// the full authenticated user row.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let user = sessions::authenticate(&state.db, &token).await?;
        Ok(CurrentUser(user))
    }
}
