//! Bet record handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use wagerbook_ledger::Bet;

use crate::error::ApiResult;
use crate::extractors::{CanDelete, CanRead, CanWrite};
use crate::state::AppState;

/// List all bets
///
/// GET /api/v1/bets
pub async fn list_bets(_auth: CanRead, State(state): State<Arc<AppState>>) -> Json<Vec<Bet>> {
    let bets = state.bets.list();
    tracing::debug!(count = bets.len(), "Listed bets");
    Json(bets)
}

/// Record a new bet
///
/// POST /api/v1/bets
pub async fn create_bet(
    _auth: CanWrite,
    State(state): State<Arc<AppState>>,
    Json(bet): Json<Bet>,
) -> ApiResult<(StatusCode, Json<Bet>)> {
    let bet = state.bets.create(bet)?;
    Ok((StatusCode::CREATED, Json(bet)))
}

/// GET /api/v1/bets/:id
pub async fn get_bet(
    _auth: CanRead,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Bet>> {
    Ok(Json(state.bets.get(&id)?))
}

/// Replace a bet; the path id wins over any id in the body
///
/// PUT /api/v1/bets/:id
pub async fn update_bet(
    _auth: CanWrite,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(bet): Json<Bet>,
) -> ApiResult<Json<Bet>> {
    Ok(Json(state.bets.update(&id, bet)?))
}

/// DELETE /api/v1/bets/:id
pub async fn delete_bet(
    _auth: CanDelete,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.bets.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
