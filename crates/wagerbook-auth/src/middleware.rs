//! Bearer token transport for Axum
//!
//! Pulls the raw token out of the `Authorization` header and renders auth
//! errors as JSON responses. Verification itself stays in
//! [`TokenAuthority`](crate::TokenAuthority).

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Response,
};

use crate::error::{AuthError, AuthResult, ErrorResponse};

/// Extract the bearer token from request headers
///
/// A missing header or a non-Bearer scheme is [`AuthError::Unauthenticated`];
/// a header that is not valid ASCII is [`AuthError::BadSignature`].
pub fn bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    let header = headers.get(AUTHORIZATION).ok_or(AuthError::Unauthenticated)?;
    let value = header.to_str().map_err(|_| AuthError::BadSignature)?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or(AuthError::Unauthenticated)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::Unauthenticated);
    }
    Ok(token)
}

/// Create error response for authentication errors
pub fn auth_error_response(error: &AuthError) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse::from(error);

    let mut res = Response::builder()
        .status(status)
        .header("Content-Type", "application/json");
    if error.is_authentication_failure() {
        res = res.header("WWW-Authenticate", "Bearer");
    }

    res.body(Body::from(serde_json::to_string(&body).unwrap_or_default()))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header_is_unauthenticated() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Err(AuthError::Unauthenticated));
    }

    #[test]
    fn test_wrong_scheme_is_unauthenticated() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert_eq!(bearer_token(&headers), Err(AuthError::Unauthenticated));

        headers.insert(AUTHORIZATION, "Bearer   ".parse().unwrap());
        assert_eq!(bearer_token(&headers), Err(AuthError::Unauthenticated));
    }

    #[test]
    fn test_auth_error_response() {
        let response = auth_error_response(&AuthError::BadSignature);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key("WWW-Authenticate"));

        let response = auth_error_response(&AuthError::InsufficientPermission);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(!response.headers().contains_key("WWW-Authenticate"));

        let response = auth_error_response(&AuthError::InvalidRole("X".to_string()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
