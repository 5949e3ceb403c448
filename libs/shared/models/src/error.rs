use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::validation::FieldErrors;

pub const INVALID_DATA: &str = "Invalid data provided";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),

    /// Request body could not be read as a JSON object.
    #[error("Bad Request: {0}")]
    BadRequest(String),

    /// Field errors returned as the bare map.
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    /// Field errors wrapped as `{"error": "Invalid data provided", "details": ...}`.
    #[error("Invalid data provided: {0}")]
    InvalidData(FieldErrors),

    /// Store failure after validation passed. Reported to the caller as a 400.
    #[error("{error}: {details}")]
    OperationFailed { error: String, details: String },
}

impl AppError {
    pub fn operation_failed(error: &str, details: impl ToString) -> Self {
        AppError::OperationFailed {
            error: error.to_string(),
            details: details.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_)
            | AppError::Validation(_)
            | AppError::InvalidData(_)
            | AppError::OperationFailed { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn body(&self) -> Value {
        match self {
            AppError::NotFound(msg) => json!({ "error": msg }),
            AppError::BadRequest(msg) => json!({ "detail": msg }),
            AppError::Validation(errors) => json!(errors),
            AppError::InvalidData(errors) => json!({
                "error": INVALID_DATA,
                "details": errors
            }),
            AppError::OperationFailed { error, details } => json!({
                "error": error,
                "details": details
            }),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::OperationFailed { .. } => tracing::error!("Error: {}: {}", status, self),
            _ => tracing::warn!("Rejected request: {}: {}", status, self),
        }

        (status, Json(self.body())).into_response()
    }
}
