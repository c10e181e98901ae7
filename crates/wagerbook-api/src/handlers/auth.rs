//! Token issuance handler

use axum::{extract::State, Json};
use std::sync::Arc;
use wagerbook_auth::IssuedToken;

use crate::dto::TokenRequest;
use crate::error::ApiResult;
use crate::state::AppState;

/// Issue a bearer token for the requested role
///
/// POST /api/v1/token
///
/// No identity check is performed; any caller may request any role.
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TokenRequest>,
) -> ApiResult<Json<IssuedToken>> {
    let (role, permissions) = request.parse()?;
    let issued = state.auth.issue(role, permissions.as_deref())?;

    metrics::counter!("wagerbook_tokens_issued_total", "role" => role.as_str()).increment(1);

    Ok(Json(issued))
}
