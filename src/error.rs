use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::lifecycle::LifecycleViolation;

/// Client-facing messages shared between validation sites.
pub mod msg {
    pub const NAME_EMPTY: &str = "Name is required";
    pub const BRAND_EMPTY: &str = "Brand is required";
    pub const NAME_NULL: &str = "Name cannot be null";
    pub const BRAND_NULL: &str = "Brand cannot be null";
    pub const STATE_NULL: &str = "State cannot be null";

    pub fn device_not_found(id: i64) -> String {
        format!("Device not found with id: {}", id)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid operation: {0}")]
    Lifecycle(#[from] LifecycleViolation),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Invalid query parameters: {0}")]
    InvalidQuery(#[from] QueryRejection),

    #[error("Invalid path parameter: {0}")]
    InvalidPath(#[from] PathRejection),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", Some(msg.clone())),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone())),
            AppError::Lifecycle(violation) => (
                StatusCode::BAD_REQUEST,
                "Invalid operation",
                Some(violation.to_string()),
            ),
            AppError::InvalidBody(rejection) => (
                StatusCode::BAD_REQUEST,
                "Invalid request body",
                Some(rejection.body_text()),
            ),
            AppError::InvalidQuery(rejection) => (
                StatusCode::BAD_REQUEST,
                "Invalid query parameters",
                Some(rejection.body_text()),
            ),
            AppError::InvalidPath(rejection) => (
                StatusCode::BAD_REQUEST,
                "Invalid path parameter",
                Some(rejection.body_text()),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
            AppError::Pool(e) => {
                tracing::error!("Pool error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
