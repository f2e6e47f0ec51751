//! HTTP error responses.
//!
//! Handler failures become `{"detail": "..."}` bodies with an appropriate
//! status code. Internal errors are logged but never leak their message to
//! the client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::KaisangError;

/// An error that renders as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

/// Result alias for request handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn bad_request<S: Into<String>>(detail: S) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub fn unauthorized<S: Into<String>>(detail: S) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            detail: detail.into(),
        }
    }

    pub fn not_found<S: Into<String>>(detail: S) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: detail.into(),
        }
    }

    pub fn internal<S: Into<String>>(detail: S) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<KaisangError> for ApiError {
    fn from(e: KaisangError) -> Self {
        tracing::error!(error = %e, "request failed");
        ApiError::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::bad_request("x").status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized("x").status, StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::not_found("x").status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let api: ApiError = KaisangError::storage("table is on fire").into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.detail.contains("fire"));
    }
}
