//! Wallet handlers
//!
//! Every mutation goes through the ledger guard, so the balance always equals
//! the net effect of the recorded transactions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use wagerbook_ledger::{WalletSnapshot, WalletTransaction};

use crate::dto::CreateTransactionRequest;
use crate::error::ApiResult;
use crate::extractors::{CanDelete, CanRead, CanWrite};
use crate::state::AppState;

fn record_ledger_operation(operation: &'static str, outcome: &'static str) {
    metrics::counter!(
        "wagerbook_ledger_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Wallet balance and transactions
///
/// GET /api/v1/wallet
pub async fn get_wallet(_auth: CanRead, State(state): State<Arc<AppState>>) -> Json<WalletSnapshot> {
    Json(state.ledger.wallet().await)
}

/// GET /api/v1/wallet/transactions
pub async fn list_transactions(
    _auth: CanRead,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<WalletTransaction>> {
    let transactions = state.ledger.list().await;
    tracing::debug!(count = transactions.len(), "Listed wallet transactions");
    Json(transactions)
}

/// GET /api/v1/wallet/transactions/:id
pub async fn get_transaction(
    _auth: CanRead,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<WalletTransaction>> {
    Ok(Json(state.ledger.get(&id).await?))
}

/// Apply a new transaction to the wallet
///
/// POST /api/v1/wallet/transactions
pub async fn create_transaction(
    _auth: CanWrite,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<WalletTransaction>)> {
    let result = match request.into_transaction() {
        Ok(transaction) => state.ledger.apply(transaction).await.map_err(Into::into),
        Err(e) => Err(e),
    };

    match result {
        Ok(transaction) => {
            record_ledger_operation("apply", "committed");
            Ok((StatusCode::CREATED, Json(transaction)))
        }
        Err(e) => {
            record_ledger_operation("apply", "rejected");
            Err(e)
        }
    }
}

/// Reverse a transaction, undoing its effect on the balance
///
/// DELETE /api/v1/wallet/transactions/:id
pub async fn delete_transaction(
    _auth: CanDelete,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    match state.ledger.reverse(&id).await {
        Ok(_) => {
            record_ledger_operation("reverse", "committed");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            record_ledger_operation("reverse", "rejected");
            Err(e.into())
        }
    }
}
