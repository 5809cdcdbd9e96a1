//! Error types for modelpick.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::catalog::TaskType;

/// Result type alias for modelpick operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for modelpick.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("No eligible model for task '{task_type}'{}", ceiling_suffix(.max_cost_per_1k))]
    NoEligibleModel {
        task_type: TaskType,
        max_cost_per_1k: Option<f64>,
    },

    #[error("Unknown model '{name}'")]
    UnknownModel { name: String },

    #[error("Unknown agent '{name}'")]
    UnknownAgent { name: String },

    #[error("Unknown pipeline '{name}'")]
    UnknownPipeline { name: String },

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

fn ceiling_suffix(max_cost_per_1k: &Option<f64>) -> String {
    match max_cost_per_1k {
        Some(max) => format!(" under cost ceiling ${} per 1k tokens", max),
        None => String::new(),
    }
}

impl Error {
    /// HTTP status used when this error is returned from the API.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::NoEligibleModel { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::UnknownModel { .. } => StatusCode::NOT_FOUND,
            Error::UnknownAgent { .. } => StatusCode::NOT_FOUND,
            Error::UnknownPipeline { .. } => StatusCode::NOT_FOUND,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = serde_json::json!({
            "error": {
                "message": self.to_string(),
                "type": "modelpick_error",
                "code": status.as_u16()
            }
        });

        (status, axum::Json(body)).into_response()
    }
}
