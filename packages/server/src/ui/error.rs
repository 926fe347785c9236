//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::domain::RepositoryError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Missing, invalid or expired bearer credential.
    #[error("unauthorized")]
    Unauthorized,
    /// Malformed request; the message is sent as the body.
    #[error("{0}")]
    Validation(String),
    /// Admission refused. No diagnostic is sent to the client.
    #[error("capacity")]
    Capacity,
    #[error("persistence failure: {0}")]
    Persistence(#[from] RepositoryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::Capacity => StatusCode::FORBIDDEN.into_response(),
            ApiError::Persistence(e) => {
                tracing::error!("Request failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error").into_response()
            }
        }
    }
}
