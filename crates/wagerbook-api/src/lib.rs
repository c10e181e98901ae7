//! Wagerbook REST API
//!
//! HTTP surface for the Wagerbook record-keeping service: token issuance,
//! bet records and the wallet ledger.
//!
//! # API Structure
//!
//! ```text
//! /health                         - Liveness
//! /api/v1/
//! ├── /token                      - Issue a bearer token for a role
//! ├── /bets                       - Bet records (CRUD)
//! └── /wallet                     - Wallet snapshot
//!     └── /transactions           - Apply and reverse wallet transactions
//! ```
//!
//! # Authentication
//!
//! Every `/api/v1` route except `/token` requires an `Authorization: Bearer`
//! header. Reads need `READ`, creates and updates need `WRITE`, deletes and
//! reversals need `DELETE`.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::http::HeaderName;
use axum::Router;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Enable CORS for browser clients
    pub enable_cors: bool,
    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
    /// Enable request tracing
    pub enable_tracing: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
            enable_tracing: true,
        }
    }
}

/// Create the main API router with all middleware
pub fn create_router(state: Arc<AppState>, config: ApiConfig) -> Router {
    with_layers(create_test_router(state), &config)
}

/// Wrap a router in the request-id, tracing and CORS layers
///
/// Each `.layer` call wraps everything added before it, so the layers are
/// added inside-out: the request id is set outermost, the trace span sits
/// inside it and sees the id, and the id is copied onto the response last.
fn with_layers(router: Router, config: &ApiConfig) -> Router {
    let x_request_id = HeaderName::from_static("x-request-id");
    let mut router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));

    if config.enable_tracing {
        router = router.layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");

                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            },
        ));
    }

    router = router.layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid));

    if config.enable_cors {
        let cors = if config.cors_origins.iter().any(|o| o == "*") {
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
                .allow_origin(
                    config
                        .cors_origins
                        .iter()
                        .filter_map(|o| o.parse().ok())
                        .collect::<Vec<_>>(),
                )
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers(Any)
        };
        router = router.layer(cors);
    }

    router
}

/// Create the bare router without middleware layers
pub fn create_test_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_v1_routes())
        .route("/health", axum::routing::get(handlers::health::health_check))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{HeaderMap, Request};
    use tower::ServiceExt;

    /// Echoes the request id the handler saw, i.e. what the trace span saw
    async fn echo_request_id(headers: HeaderMap) -> String {
        headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string()
    }

    fn echo_router() -> Router {
        with_layers(
            Router::new().route("/echo", axum::routing::get(echo_request_id)),
            &ApiConfig::default(),
        )
    }

    async fn echo(request: Request<Body>) -> (Option<String>, String) {
        let response = echo_router().oneshot(request).await.unwrap();
        let header = response
            .headers()
            .get("x-request-id")
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (header, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_request_id_generated_before_tracing() {
        let (header, seen) = echo(Request::builder().uri("/echo").body(Body::empty()).unwrap()).await;

        assert_ne!(seen, "unknown");
        assert_eq!(header.as_deref(), Some(seen.as_str()));
    }

    #[tokio::test]
    async fn test_incoming_request_id_kept() {
        let request = Request::builder()
            .uri("/echo")
            .header("x-request-id", "caller-chosen-id")
            .body(Body::empty())
            .unwrap();
        let (header, seen) = echo(request).await;

        assert_eq!(seen, "caller-chosen-id");
        assert_eq!(header.as_deref(), Some("caller-chosen-id"));
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.enable_cors);
        assert!(config.enable_tracing);
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
    }
}
