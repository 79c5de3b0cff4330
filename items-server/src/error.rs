//! Application error type and its translation to HTTP responses.
//!
//! # Design
//! Handlers return `Result<_, AppError>`; nothing below the router knows
//! about status codes. Every variant maps to exactly one status, and the
//! response body is the message encoded as a JSON string so clients always
//! receive valid JSON, error or not.

use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{debug, error};

/// Errors surfaced by the items router.
#[derive(Debug, Error)]
pub enum AppError {
    /// The request body violates a required constraint.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// No session was attached to the request by the host.
    #[error("authentication required")]
    Unauthorized,

    /// Any failure that already knows its HTTP status.
    #[error("{message}")]
    Status { code: StatusCode, message: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn item_not_found(key: &str) -> Self {
        Self::NotFound(format!("item {key} not found"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Status { code, .. } => *code,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Status {
            code: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, %status, "request failed");
        } else {
            debug!(error = %self, %status, "request rejected");
        }
        (status, Json(self.public_message())).into_response()
    }
}

/// Response for a handler that panicked; plugs into `CatchPanicLayer::custom`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else {
        "handler panicked".to_string()
    };
    AppError::Internal(detail).into_response()
}
