//! HTTP response types and utilities
//!
//! Standardized response envelope and error mapping for the web layer,
//! so every endpoint answers in the same shape.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult, CacheError, SearchError};

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Request timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create an error response
    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Helper function to convert AppResult to HTTP response
pub fn handle_result<T>(result: AppResult<T>) -> Response
where
    T: Serialize,
{
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::success(data))).into_response(),
        Err(error) => handle_error(error),
    }
}

/// Convert AppError to appropriate HTTP response
pub fn handle_error(error: AppError) -> Response {
    let (status, message) = match &error {
        AppError::Search(SearchError::EmptyKeyword) => {
            (StatusCode::BAD_REQUEST, error.to_string())
        }
        AppError::Validation { message } => (StatusCode::BAD_REQUEST, message.clone()),
        AppError::Cache(CacheError::Empty) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Catalog not ready - cache has not been populated yet".to_string(),
        ),
        AppError::OperationInProgress { operation } => (
            StatusCode::CONFLICT,
            format!("{operation} is already in progress"),
        ),
        AppError::Source(_) | AppError::Http(_) => (
            StatusCode::BAD_GATEWAY,
            "Source operation failed".to_string(),
        ),
        AppError::Configuration { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Configuration error: {message}"),
        ),
        AppError::Cache(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Cache operation failed".to_string(),
        ),
        AppError::Internal { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {message}"),
        ),
    };

    (status, Json(ApiResponse::<()>::error(message))).into_response()
}

/// Success response helper
pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// Service health report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: i64,
    pub cache: CacheHealth,
}

/// Cache freshness as reported by the health endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheHealth {
    pub populated: bool,
    pub records: usize,
    pub fetched_at: Option<chrono::DateTime<chrono::Utc>>,
}
