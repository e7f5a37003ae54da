// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! API error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Error surface of the HTTP layer. Every variant renders as a JSON body
/// with a human-readable `status` field and the documented status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request, failed validation or resolution (400).
    #[error("{0}")]
    BadRequest(String),

    /// Credential missing or rejected (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Job id, file id, or artifact unknown (404).
    #[error("{0}")]
    NotFound(String),

    /// Upload with an extension outside the allowlist (415).
    #[error("{0}")]
    UnsupportedMediaType(String),

    /// Adapter or store failure (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.status_code();
        if code.is_server_error() {
            tracing::error!(status = %code, error = %self, "request failed");
        }
        (code, Json(json!({ "status": self.to_string() }))).into_response()
    }
}

impl From<sfrest_store::StoreError> for ApiError {
    fn from(e: sfrest_store::StoreError) -> Self {
        ApiError::Internal(format!("persistence error: {}", e))
    }
}

impl From<sfrest_sched::SchedulerError> for ApiError {
    fn from(e: sfrest_sched::SchedulerError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<sfrest_apps::ValidationError> for ApiError {
    fn from(e: sfrest_apps::ValidationError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
