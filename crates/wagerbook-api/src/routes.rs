//! API Routes
//!
//! Route definitions for all API endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::state::AppState;

/// Create API v1 routes
pub fn api_v1_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Token issuance (public)
        .route("/token", post(handlers::auth::issue_token))
        .nest("/bets", bet_routes())
        .nest("/wallet", wallet_routes())
}

/// Bet record routes
fn bet_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::bets::list_bets).post(handlers::bets::create_bet),
        )
        .route(
            "/:id",
            get(handlers::bets::get_bet)
                .put(handlers::bets::update_bet)
                .delete(handlers::bets::delete_bet),
        )
}

/// Wallet routes
fn wallet_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::wallet::get_wallet))
        .route(
            "/transactions",
            get(handlers::wallet::list_transactions).post(handlers::wallet::create_transaction),
        )
        .route(
            "/transactions/:id",
            get(handlers::wallet::get_transaction).delete(handlers::wallet::delete_transaction),
        )
}
