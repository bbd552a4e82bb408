//! Error types for mmo-api
//!
//! Every error renders as `{ "error": message, "details"?: value }`:
//! - configuration (missing credentials or API keys) → 500
//! - validation (missing or invalid parameters, malformed JSON or query) → 400
//! - authorization (missing, expired or unrefreshable session) → 401
//! - upstream vendor failures → vendor status, raw body as `details`

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing OAuth credentials or API keys (500)
    #[error("{0}")]
    Config(String),

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Body or query string that could not be parsed (400)
    #[error("{message}")]
    Malformed { message: String, details: Value },

    /// No usable session (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Authorization code exchange rejected by the provider (500)
    #[error("{message}")]
    TokenExchange { message: String, details: Value },

    /// Vendor API returned a failure status (passed through)
    #[error("{message}")]
    Upstream {
        status: u16,
        message: String,
        details: Value,
    },

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),

    /// mmo-common error
    #[error(transparent)]
    Common(#[from] mmo_common::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Config(_) | ApiError::TokenExchange { .. } | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::BadRequest(_) | ApiError::Malformed { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Common(err) => match err {
                mmo_common::Error::NotFound(_) => StatusCode::NOT_FOUND,
                mmo_common::Error::InvalidInput(_) | mmo_common::Error::Json(_) => {
                    StatusCode::BAD_REQUEST
                }
                mmo_common::Error::PathCollision { .. } => StatusCode::CONFLICT,
                mmo_common::Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    StatusCode::NOT_FOUND
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", self);
        } else {
            tracing::debug!(status = status.as_u16(), "{}", self);
        }

        let body = match self {
            ApiError::TokenExchange { message, details }
            | ApiError::Malformed { message, details }
            | ApiError::Upstream {
                message, details, ..
            } => json!({ "error": message, "details": details }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Malformed {
            message: "Invalid JSON request body".to_string(),
            details: Value::String(rejection.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Malformed {
            message: "Invalid query string".to_string(),
            details: Value::String(rejection.body_text()),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
