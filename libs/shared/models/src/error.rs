use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{message}: {error}")]
    Internal { message: String, error: String },
}

impl AppError {
    pub fn internal(message: impl Into<String>, error: impl ToString) -> Self {
        AppError::Internal {
            message: message.into(),
            error: error.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (message, error) = match &self {
            AppError::Internal { message, error } => (message.clone(), error.clone()),
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::ValidationError(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::Conflict(msg) => (msg.clone(), self.to_string()),
        };

        if status.is_server_error() {
            tracing::error!("Error: {}: {}", status, error);
        } else {
            tracing::warn!("Rejected: {}: {}", status, error);
        }

        let body = Json(json!({
            "success": false,
            "message": message,
            "error": error
        }));

        (status, body).into_response()
    }
}
