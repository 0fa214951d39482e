//! Error handling for the Folio HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use folio_authz::AuthError;
use folio_db::StoreError;
use folio_media::MediaError;

/// Standard error response format for all HTTP errors
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub details: Vec<serde_json::Value>,
    /// Correlates the response with the server log line
    pub trace_id: String,
    pub timestamp: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation {
        details: Vec<serde_json::Value>,
        code: String,
        message: String,
    },

    #[error("not found: {message}")]
    NotFound { message: String, code: String },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String, code: String },

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("bad request: {message}")]
    BadRequest { message: String, code: String },

    /// A collaborator (store, media host) failed; the message is safe to show.
    #[error("upstream error: {message}")]
    Upstream { message: String, code: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(details: Vec<serde_json::Value>, message: impl Into<String>) -> Self {
        Self::Validation {
            details,
            code: "validation_error".to_string(),
            message: message.into(),
        }
    }

    /// Validation error naming the offending field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::validation(
            vec![json!({ "field": field, "error": message.clone() })],
            message,
        )
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code: "not_found".to_string(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized() -> Self {
        Self::Unauthorized {
            message: "unauthorized".to_string(),
            code: "unauthorized".to_string(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            code: "bad_request".to_string(),
        }
    }

    pub fn upstream(code: &str, message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            code: code.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable => {
                Self::upstream("store_unavailable", "document store is not configured")
            }
            StoreError::Duplicate { field } => {
                Self::invalid_field(&field, format!("{} already exists", field))
            }
            other => Self::Internal(anyhow::Error::new(other)),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::NotConfigured => Self::unauthorized(),
            AuthError::Signing(e) => Self::Internal(anyhow::Error::new(e)),
        }
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::NotConfigured => {
                Self::upstream("upload_not_configured", "media host is not configured")
            }
            MediaError::Rejected { message, .. } => Self::upstream("upload_failed", message),
            other => Self::upstream("upload_failed", other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let timestamp = OffsetDateTime::now_utc().to_string();

        let (status, error_code, message, details) = match self {
            AppError::Validation {
                details,
                code,
                message,
            } => (StatusCode::BAD_REQUEST, code, message, Some(details)),
            AppError::NotFound { message, code } => (StatusCode::NOT_FOUND, code, message, None),
            AppError::Unauthorized { message, code } => {
                (StatusCode::UNAUTHORIZED, code, message, None)
            }
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "method_not_allowed".to_string(),
                "method not allowed".to_string(),
                None,
            ),
            AppError::BadRequest { message, code } => {
                (StatusCode::BAD_REQUEST, code, message, None)
            }
            AppError::Upstream { message, code } => {
                (StatusCode::INTERNAL_SERVER_ERROR, code, message, None)
            }
            AppError::Internal(e) => {
                tracing::error!(error_id = %error_id, error = %e, "internal error");
                // Hidden outside debug builds.
                let message = if cfg!(debug_assertions) {
                    e.to_string()
                } else {
                    "An internal server error occurred".to_string()
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error".to_string(),
                    message,
                    None,
                )
            }
        };

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                "Request error"
            );
        } else {
            tracing::debug!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                "Request error"
            );
        }

        let error_response = ErrorResponse {
            error: ErrorBody {
                code: error_code,
                message,
                details: details.unwrap_or_default(),
                trace_id: error_id.to_string(),
                timestamp,
            },
        };

        (status, Json(error_response)).into_response()
    }
}
