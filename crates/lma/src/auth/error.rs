//! Authentication errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing authorization header.
    #[error("missing authorization header")]
    MissingAuthHeader,

    /// Invalid authorization header format.
    #[error("invalid authorization header format")]
    InvalidAuthHeader,

    /// Invalid session token.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Session token expired.
    #[error("token expired")]
    TokenExpired,

    /// The token or proxy request names a shop with no stored session.
    #[error("no session for shop {0}")]
    UnknownShop(String),

    /// App proxy request without a signature.
    #[error("Missing signature")]
    MissingSignature,

    /// App proxy signature does not match.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Internal error.
    #[error("internal auth error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AuthError::MissingAuthHeader => (StatusCode::UNAUTHORIZED, "MISSING_AUTH_HEADER"),
            AuthError::InvalidAuthHeader => (StatusCode::UNAUTHORIZED, "INVALID_AUTH_HEADER"),
            AuthError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            AuthError::UnknownShop(_) => (StatusCode::UNAUTHORIZED, "UNKNOWN_SHOP"),
            AuthError::MissingSignature => (StatusCode::FORBIDDEN, "MISSING_SIGNATURE"),
            AuthError::InvalidSignature => (StatusCode::FORBIDDEN, "INVALID_SIGNATURE"),
            AuthError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        debug!(%status, "Request rejected: {}", self);

        let body = Json(AuthErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = AuthError::MissingAuthHeader;
        assert_eq!(err.to_string(), "missing authorization header");

        let err = AuthError::InvalidToken("bad".to_string());
        assert_eq!(err.to_string(), "invalid token: bad");

        assert_eq!(AuthError::MissingSignature.to_string(), "Missing signature");
    }

    #[test]
    fn test_auth_error_status() {
        assert_eq!(
            AuthError::MissingAuthHeader.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::UnknownShop("x.myshopify.com".into())
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidSignature.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
