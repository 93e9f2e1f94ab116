use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{extractors::CurrentUser, handlers::require_admin},
    donations::dto::{CreateDonationRequest, UpdateDonationRequest},
    donations::repo_types::Donation,
    error::AppError,
    state::AppState,
};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/donations", get(list_mine))
        .route("/donations/all", get(list_all))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/donations", post(create_donation))
        .route("/donations/:id", put(update_donation).delete(delete_donation))
}

// --- handlers ---

#[instrument(skip(state, caller, payload))]
pub async fn create_donation(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(mut payload): Json<CreateDonationRequest>,
) -> Result<(StatusCode, Json<Donation>), AppError> {
    payload.descricao = payload.descricao.trim().to_owned();
    if payload.descricao.is_empty() {
        warn!(user_id = caller.id, "donation with blank description");
        return Err(AppError::InvalidInput("descricao must not be empty"));
    }

    let donation = Donation::add(
        &state.db,
        &payload.descricao,
        payload.quantidade.as_deref(),
        payload.destino.as_deref(),
        payload.recebido,
        caller.id,
    )
    .await?;

    info!(donation_id = donation.id, user_id = caller.id, "donation registered");
    Ok((StatusCode::CREATED, Json(donation)))
}

/// A volunteer's own donations. Admins get the same scoped view here; the
/// unscoped listing lives under /donations/all.
#[instrument(skip(state, caller))]
pub async fn list_mine(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<Vec<Donation>>, AppError> {
    let donations = Donation::find_by_owner(&state.db, caller.id).await?;
    Ok(Json(donations))
}

#[instrument(skip(state, caller))]
pub async fn list_all(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<Vec<Donation>>, AppError> {
    require_admin(&caller)?;

    let donations = Donation::find_all(&state.db).await?;
    Ok(Json(donations))
}

/// Full update of one donation. Volunteers can only touch their own rows;
/// a row owned by someone else answers not-found, so donation ids cannot
/// be probed across accounts.
#[instrument(skip(state, caller, payload))]
pub async fn update_donation(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i64>,
    Json(mut payload): Json<UpdateDonationRequest>,
) -> Result<Json<Donation>, AppError> {
    payload.descricao = payload.descricao.trim().to_owned();
    if payload.descricao.is_empty() {
        return Err(AppError::InvalidInput("descricao must not be empty"));
    }

    let existing = Donation::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    if !caller.is_admin() && existing.user_id != caller.id {
        warn!(donation_id = id, user_id = caller.id, "update of foreign donation");
        return Err(AppError::NotFound);
    }

    let donation = Donation {
        id,
        descricao: payload.descricao,
        quantidade: payload.quantidade,
        destino: payload.destino,
        recebido: payload.recebido,
        user_id: existing.user_id,
    };
    if !donation.update(&state.db).await? {
        return Err(AppError::NotFound);
    }

    info!(donation_id = id, user_id = caller.id, "donation updated");
    Ok(Json(donation))
}

#[instrument(skip(state, caller))]
pub async fn delete_donation(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let existing = Donation::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    if !caller.is_admin() && existing.user_id != caller.id {
        warn!(donation_id = id, user_id = caller.id, "delete of foreign donation");
        return Err(AppError::NotFound);
    }

    if !Donation::delete(&state.db, id).await? {
        return Err(AppError::NotFound);
    }

    info!(donation_id = id, user_id = caller.id, "donation deleted");
    Ok(StatusCode::NO_CONTENT)
}
