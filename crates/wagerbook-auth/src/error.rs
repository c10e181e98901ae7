//! Authentication error types
//!
//! Errors are designed to be:
//! - Informative for logging/debugging
//! - Safe for external exposure (no key material or internals leak)
//! - Convertible to HTTP status codes
//!
//! Authentication failures (401) are kept distinct from authorization
//! failures (403) so the transport layer can tell them apart.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication and authorization error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // =========================================================================
    // Issuance Errors
    // =========================================================================
    /// Requested role is not in the role table
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Permission override names an unknown permission, is empty, or widens the role
    #[error("Invalid permission: {0}")]
    InvalidPermission(String),

    // =========================================================================
    // Token Errors
    // =========================================================================
    /// No bearer credential was presented
    #[error("Authentication required")]
    Unauthenticated,

    /// Signature mismatch or unparseable token
    #[error("Invalid token signature")]
    BadSignature,

    /// Token expiry is at or before the verification time
    #[error("Token has expired")]
    Expired,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    /// Token carries none of the required permissions
    #[error("Insufficient permissions")]
    InsufficientPermission,

    /// Token role is not among the required roles
    #[error("Insufficient role")]
    InsufficientRole,

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Configuration error (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not be exposed to clients)
    #[error("Internal error")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidRole(_) | Self::InvalidPermission(_) => 400,

            // 401 Unauthorized
            Self::Unauthenticated | Self::BadSignature | Self::Expired => 401,

            // 403 Forbidden
            Self::InsufficientPermission | Self::InsufficientRole => 403,

            // 500 Internal Server Error
            Self::Config(_) | Self::Internal(_) => 500,
        }
    }

    /// Get an error code for the client (safe to expose)
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRole(_) => "INVALID_ROLE",
            Self::InvalidPermission(_) => "INVALID_PERMISSION",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::BadSignature => "BAD_SIGNATURE",
            Self::Expired => "TOKEN_EXPIRED",
            Self::InsufficientPermission => "INSUFFICIENT_PERMISSION",
            Self::InsufficientRole => "INSUFFICIENT_ROLE",
            Self::Config(_) => "INTERNAL_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller failed to prove who they are (as opposed to lacking rights)
    pub fn is_authentication_failure(&self) -> bool {
        self.status_code() == 401
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Get safe message for client (doesn't leak internal details)
    pub fn client_message(&self) -> String {
        match self {
            Self::Config(_) | Self::Internal(_) => "An internal error occurred".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Error response for API clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (machine-readable)
    pub code: String,
    /// Error message (human-readable)
    pub message: String,
}

impl From<&AuthError> for ErrorResponse {
    fn from(error: &AuthError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.client_message(),
        }
    }
}

// Expiry is never reported by the library: `Validation::validate_exp` is off
// and the authority does its own check, so every decode failure is a trust failure.
impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!(error = %err, "Token decode failed");
        Self::BadSignature
    }
}
