//! Permission-gated extractors
//!
//! Each extractor pulls the bearer token from the request, verifies it with
//! the shared [`TokenAuthority`](wagerbook_auth::TokenAuthority) and checks
//! one required permission. Rejections are rendered through [`ApiError`].

use axum::response::{IntoResponse, Response};
use wagerbook_auth::AuthError;

use crate::error::ApiError;

pub use wagerbook_auth::{Permission, Role};

/// Render an auth failure and count it
#[doc(hidden)]
pub fn reject(error: AuthError, permission: Permission) -> Response {
    tracing::warn!(
        error = %error,
        required = %permission,
        "Rejected request at permission gate"
    );
    metrics::counter!(
        "wagerbook_auth_rejections_total",
        "reason" => error.error_code()
    )
    .increment(1);
    ApiError::from(error).into_response()
}

/// Build an extractor that requires a verified token carrying `$permission`
///
/// Usage:
/// ```ignore
/// require_permission!(CanRead, Permission::Read);
///
/// async fn handler(CanRead(claims): CanRead) { ... }
/// ```
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $permission:expr) => {
        pub struct $name(pub wagerbook_auth::Claims);

        #[async_trait::async_trait]
        impl axum::extract::FromRequestParts<std::sync::Arc<$crate::state::AppState>> for $name {
            type Rejection = axum::response::Response;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &std::sync::Arc<$crate::state::AppState>,
            ) -> Result<Self, Self::Rejection> {
                let token = wagerbook_auth::bearer_token(&parts.headers)
                    .map_err(|e| $crate::extractors::reject(e, $permission))?;

                let claims = state
                    .auth
                    .authenticate(token, &[$permission], &[])
                    .map_err(|e| $crate::extractors::reject(e, $permission))?;

                Ok($name(claims))
            }
        }
    };
}

require_permission!(CanRead, Permission::Read);
require_permission!(CanWrite, Permission::Write);
require_permission!(CanDelete, Permission::Delete);
