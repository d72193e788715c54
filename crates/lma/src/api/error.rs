//! Unified API error handling with structured responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use crate::catalog::CatalogError;
use crate::onboarding::OnboardingError;
use crate::progress::ProgressError;
use crate::shopify::ShopifyError;
use crate::student::StudentError;

/// Client-facing message for upstream failures; details are only logged.
const UPSTREAM_FAILURE: &str = "Failed to fetch data from Shopify";

/// API error type with structured responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// Some side effects happened; `details` describes which.
    #[error("{message}")]
    PartialFailure {
        message: String,
        details: serde_json::Value,
    },
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) | Self::PartialFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::PartialFailure { .. } => "PARTIAL_FAILURE",
        }
    }
}

/// Structured error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.to_string();

        match &self {
            ApiError::Internal(msg) => {
                error!(error_code = code, message = %msg, "API error");
            }
            ApiError::PartialFailure { details, .. } => {
                error!(error_code = code, message = %message, %details, "API error");
            }
            _ => {
                debug!(error_code = code, message = %message, "Client error");
            }
        }

        let details = match self {
            ApiError::PartialFailure { details, .. } => Some(details),
            _ => None,
        };

        let body = ErrorResponse {
            error: message,
            code,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Upstream failures are logged in full and reported generically.
impl From<ShopifyError> for ApiError {
    fn from(err: ShopifyError) -> Self {
        if err.is_unauthorized() {
            debug!(error = %err, "Upstream rejected the shop session");
            return ApiError::unauthorized("Shop session is not authorized");
        }
        error!(error = %err, "Upstream request failed");
        ApiError::internal(UPSTREAM_FAILURE)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Upstream(err) => err.into(),
            other => {
                error!(error = %other, "Malformed course data");
                ApiError::internal(UPSTREAM_FAILURE)
            }
        }
    }
}

impl From<ProgressError> for ApiError {
    fn from(err: ProgressError) -> Self {
        match err {
            ProgressError::Upstream(err) => err.into(),
            ProgressError::Catalog(err) => err.into(),
            ProgressError::MissingCourse(handle) => {
                ApiError::internal(format!("Registered course not found: {}", handle))
            }
        }
    }
}

impl From<StudentError> for ApiError {
    fn from(err: StudentError) -> Self {
        match err {
            StudentError::Upstream(err) => err.into(),
            StudentError::Persistence(err) => {
                error!(error = %format!("{err:#}"), "Failed to load onboarding submissions");
                ApiError::internal("Failed to load onboarding submissions")
            }
        }
    }
}

impl From<OnboardingError> for ApiError {
    fn from(err: OnboardingError) -> Self {
        match err {
            OnboardingError::MissingCustomerId => ApiError::bad_request("customerId is required"),
            OnboardingError::Persistence(err) => {
                error!(error = %format!("{err:#}"), "Failed to store onboarding submission");
                ApiError::internal("Failed to store onboarding submission")
            }
            OnboardingError::FlagUpdate {
                submission_id,
                source,
            } => {
                error!(submission_id, error = %source, "Onboarded flag update failed");
                ApiError::PartialFailure {
                    message: "Submission stored but the onboarded flag could not be set"
                        .to_string(),
                    details: json!({
                        "submissionId": submission_id,
                        "submissionStored": true,
                        "onboardedFlagSet": false,
                    }),
                }
            }
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status_codes() {
        assert_eq!(ApiError::not_found("").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::bad_request("").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized("").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::internal("").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_message_is_not_leaked() {
        let err: ApiError = ShopifyError::Http {
            status: 500,
            body: "secret internals".into(),
        }
        .into();
        assert!(matches!(err, ApiError::Internal(ref msg) if msg == UPSTREAM_FAILURE));
        assert!(!err.to_string().contains("secret internals"));
    }

    #[test]
    fn test_upstream_unauthorized_maps_to_401() {
        let err: ApiError = ShopifyError::Unauthorized {
            shop: "academy.myshopify.com".into(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_flag_failure_is_partial() {
        let err: ApiError = OnboardingError::FlagUpdate {
            submission_id: 7,
            source: ShopifyError::UserErrors(vec!["nope".into()]),
        }
        .into();

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "PARTIAL_FAILURE");
        let ApiError::PartialFailure { details, .. } = err else {
            panic!("expected partial failure");
        };
        assert_eq!(details["submissionId"], 7);
        assert_eq!(details["submissionStored"], true);
        assert_eq!(details["onboardedFlagSet"], false);
    }

    #[test]
    fn test_missing_customer_id_is_bad_request() {
        let err: ApiError = OnboardingError::MissingCustomerId.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
