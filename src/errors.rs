// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Only failures that reach a caller live here.
/// Decode problems (coordinates, cache entries) never become errors,
/// they degrade to "absent" inside the parser and the cache.
#[derive(Error, Debug)]
pub enum ExploraError {
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Location not found with id: {0}")]
    LocationNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden access")]
    Forbidden,

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl ExploraError {
    fn code(&self) -> &'static str {
        match self {
            ExploraError::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            ExploraError::LocationNotFound(_) => "LOCATION_NOT_FOUND",
            ExploraError::InvalidInput(_) => "INVALID_INPUT",
            ExploraError::ValidationError(_) => "VALIDATION_ERROR",
            ExploraError::Unauthorized => "UNAUTHORIZED",
            ExploraError::Forbidden => "FORBIDDEN",
            ExploraError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            ExploraError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
        }
    }
}

/// Convert ExploraError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for ExploraError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ExploraError::CategoryNotFound(_) => StatusCode::NOT_FOUND,
            ExploraError::LocationNotFound(_) => StatusCode::NOT_FOUND,
            ExploraError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ExploraError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ExploraError::Unauthorized => StatusCode::UNAUTHORIZED,
            ExploraError::Forbidden => StatusCode::FORBIDDEN,
            ExploraError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            ExploraError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}
