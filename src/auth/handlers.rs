use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
        extractors::{BearerToken, CurrentUser},
        repo_types::{Role, User},
        sessions,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/users", get(list_users))
        .route("/users/:username", delete(delete_user))
}

pub(crate) fn require_admin(user: &User) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        warn!(user_id = user.id, "admin route denied");
        Err(AppError::Forbidden)
    }
}

/// Self-service signup. Always lands on the volunteer role; admin rows are
/// provisioned out of band. Duplicates are caught by the unique constraint,
/// not a lookup, so two racing signups cannot both get through.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    payload.username = payload.username.trim().to_owned();

    if payload.username.is_empty() {
        warn!("registration with blank username");
        return Err(AppError::InvalidInput("username must not be empty"));
    }
    if payload.password.is_empty() {
        warn!(username = %payload.username, "registration with blank password");
        return Err(AppError::InvalidInput("password must not be empty"));
    }

    let user = User::register(&state.db, &payload.username, &payload.password, Role::User).await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (user, token) = sessions::login(&state.db, payload.username.trim(), &payload.password).await?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state, token))]
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<StatusCode, AppError> {
    sessions::logout(&state.db, &token).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(user))]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<PublicUser> {
    Json(user.into())
}

#[instrument(skip(state, caller))]
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    require_admin(&caller)?;

    let users = User::list_all(&state.db).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

/// Admin-only removal. A user still holding donations cannot be deleted;
/// the foreign key rejects it and the client sees a conflict.
#[instrument(skip(state, caller))]
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(username): Path<String>,
) -> Result<StatusCode, AppError> {
    require_admin(&caller)?;

    if !User::remove(&state.db, &username).await? {
        return Err(AppError::NotFound);
    }

    info!(%username, "user removed");
    Ok(StatusCode::NO_CONTENT)
}
