//! API error handling
//!
//! Wraps the auth and ledger error taxonomies and maps each kind to a
//! transport status and a stable machine-readable code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wagerbook_auth::AuthError;
use wagerbook_ledger::LedgerError;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ApiError {
    /// Get the machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Auth(err) => err.error_code(),
            Self::Ledger(LedgerError::DuplicateId { .. }) => "DUPLICATE_ID",
            Self::Ledger(LedgerError::NotFound { .. }) => "NOT_FOUND",
            Self::Ledger(LedgerError::InvalidTransactionType { .. }) => "INVALID_TRANSACTION_TYPE",
            Self::Ledger(LedgerError::InvalidAmount { .. }) => "INVALID_AMOUNT",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),

            // 400 Bad Request
            Self::Ledger(LedgerError::InvalidTransactionType { .. })
            | Self::Ledger(LedgerError::InvalidAmount { .. }) => StatusCode::BAD_REQUEST,

            // 404 Not Found
            Self::Ledger(LedgerError::NotFound { .. }) => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::Ledger(LedgerError::DuplicateId { .. }) => StatusCode::CONFLICT,
        }
    }

    /// Get safe message for client (doesn't leak internal details)
    pub fn client_message(&self) -> String {
        match self {
            Self::Auth(err) => err.client_message(),
            Self::Ledger(err) => err.to_string(),
        }
    }
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.client_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        match &self {
            Self::Auth(err) => wagerbook_auth::auth_error_response(err),
            _ => (status, Json(ErrorResponse::from(&self))).into_response(),
        }
    }
}
