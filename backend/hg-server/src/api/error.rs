//! REST API error types
//!
//! These errors are designed to produce consistent JSON responses
//! with appropriate HTTP status codes.

use hg_auth::AuthError;
use hg_db::DbError;

use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// Inner error body with code, message, timestamp, and optional context
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code (e.g., "INVALID_CREDENTIALS")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// RFC3339 timestamp of the failure
    pub timestamp: String,
    /// Per-field validation details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Seconds until a throttled or locked client may retry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

/// API errors with associated HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    /// Validation error (400)
    #[error("Validation failed: {message} {location}")]
    Validation {
        message: String,
        details: Option<serde_json::Value>,
        location: ErrorLocation,
    },

    /// Authentication failure (401) with a specific code
    #[error("Unauthorized ({code}): {message} {location}")]
    Unauthorized {
        code: String,
        message: String,
        location: ErrorLocation,
    },

    /// Account lockout (423)
    #[error("Account locked: {message} {location}")]
    Locked {
        message: String,
        retry_after: u64,
        location: ErrorLocation,
    },

    /// Rate limited (429)
    #[error("Rate limited, retry in {retry_after}s {location}")]
    RateLimited {
        retry_after: u64,
        location: ErrorLocation,
    },

    /// Internal server error (500)
    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            details: None,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn validation_with_details<S: Into<String>>(message: S, details: serde_json::Value) -> Self {
        Self::Validation {
            message: message.into(),
            details: Some(details),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unauthorized<C: Into<String>, S: Into<String>>(code: C, message: S) -> Self {
        Self::Unauthorized {
            code: code.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn locked<S: Into<String>>(message: S, retry_after: u64) -> Self {
        Self::Locked {
            message: message.into(),
            retry_after,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log the error with location for debugging
        log::error!("{}", self);

        let timestamp = chrono::Utc::now().to_rfc3339();

        let (status, body) = match self {
            ApiError::NotFound { message, .. } => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".into(),
                    message,
                    timestamp,
                    details: None,
                    retry_after: None,
                },
            ),
            ApiError::Validation {
                message, details, ..
            } => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "VALIDATION_ERROR".into(),
                    message,
                    timestamp,
                    details,
                    retry_after: None,
                },
            ),
            ApiError::Unauthorized { code, message, .. } => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code,
                    message,
                    timestamp,
                    details: None,
                    retry_after: None,
                },
            ),
            ApiError::Locked {
                message,
                retry_after,
                ..
            } => (
                StatusCode::LOCKED,
                ApiErrorBody {
                    code: "ACCOUNT_LOCKED".into(),
                    message,
                    timestamp,
                    details: None,
                    retry_after: Some(retry_after),
                },
            ),
            ApiError::RateLimited { retry_after, .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                ApiErrorBody {
                    code: "RATE_LIMITED".into(),
                    message: format!("Too many requests. Try again in {} seconds.", retry_after),
                    timestamp,
                    details: None,
                    retry_after: Some(retry_after),
                },
            ),
            ApiError::Internal { .. } => (
                // Never leak internals to clients
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "INTERNAL_ERROR".into(),
                    message: "An internal error occurred.".into(),
                    timestamp,
                    details: None,
                    retry_after: None,
                },
            ),
        };

        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Database errors never surface their details to clients
impl From<DbError> for ApiError {
    #[track_caller]
    fn from(e: DbError) -> Self {
        log::error!("Database error: {}", e);
        ApiError::Internal {
            message: "Database operation failed".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<AuthError> for ApiError {
    #[track_caller]
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::JwtEncode { .. } | AuthError::PasswordHash { .. } => ApiError::Internal {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
            _ => ApiError::Unauthorized {
                code: e.error_code().to_string(),
                message: "Authentication failed.".to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}

/// Convert UUID parse errors to API errors
impl From<uuid::Error> for ApiError {
    #[track_caller]
    fn from(e: uuid::Error) -> Self {
        ApiError::Validation {
            message: format!("Invalid UUID format: {}", e),
            details: None,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
