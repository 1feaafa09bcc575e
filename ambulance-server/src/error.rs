//! API error type with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use ambulance_core::{ErrorKind, WaitingListError};

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Body could not be decoded (400)
    BadRequest { message: String },

    /// Outcome of a core operation
    Operation(WaitingListError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Operation(e) => match e.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
                ErrorKind::Transport => StatusCode::BAD_GATEWAY,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => ErrorKind::Validation.as_str(),
            Self::Operation(e) => e.kind().as_str(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::BadRequest { message } => message.clone(),
            Self::Operation(e) if status.is_server_error() => {
                // Log the actual error, return its message
                tracing::error!(status = status.as_u16(), "request failed: {}", e);
                e.to_string()
            }
            Self::Operation(e) => e.to_string(),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.kind(),
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<WaitingListError> for ApiError {
    fn from(e: WaitingListError) -> Self {
        Self::Operation(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            message: format!("Invalid request body: {}", rejection.body_text()),
        }
    }
}
