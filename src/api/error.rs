//! API error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use super::request::ValidationError;
use crate::orders::OrderError;
use crate::types::StoreError;

/// Errors surfaced to HTTP clients as `{"detail": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Package not found")]
    PackageNotFound,

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::PackageNotFound(_) | OrderError::OrderNotFound(_) => {
                ApiError::PackageNotFound
            }
            OrderError::Store(e) => ApiError::StoreUnavailable(e),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PackageNotFound => StatusCode::NOT_FOUND,
            ApiError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::StoreUnavailable(StoreError::NotConnected) => {
                "Database not connected".to_string()
            }
            // Driver errors can carry hostnames; keep them in the logs.
            ApiError::StoreUnavailable(_) => "Database error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::StoreUnavailable(e) = &self {
            error!("store failure: {}", e);
        }
        (self.status(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}
