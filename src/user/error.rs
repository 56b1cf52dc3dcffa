use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::dto::{ErrorBody, ErrorMessage};

/// Outcome of a failed registration.
///
/// Only `Conflict` and `Validation` carry caller-actionable detail; every other
/// failure collapses into `Internal`, whose source is logged but never sent.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Email already exists")]
    Conflict,

    #[error("Failed to register user")]
    Internal(#[source] anyhow::Error),
}

impl RegisterError {
    pub fn status(&self) -> StatusCode {
        match self {
            RegisterError::Validation(_) => StatusCode::BAD_REQUEST,
            RegisterError::Conflict => StatusCode::CONFLICT,
            RegisterError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            RegisterError::Validation(msgs) => ErrorMessage::Many(msgs),
            other => ErrorMessage::One(other.to_string()),
        };
        let body = ErrorBody {
            status_code: status.as_u16(),
            message,
            error: status.canonical_reason().unwrap_or("Error").to_string(),
        };
        (status, Json(body)).into_response()
    }
}
