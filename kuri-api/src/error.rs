use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use kuri_core::CoreError;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    AdmissionError {
        reason: String,
        available_spots: i32,
    },
    AuthError(String),
    ConflictError(String),
    InternalServerError(String),
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => AppError::ValidationError(msg),
            CoreError::NotFoundError(msg) => AppError::NotFoundError(msg),
            CoreError::AdmissionError {
                reason,
                available_spots,
            } => AppError::AdmissionError {
                reason,
                available_spots,
            },
            CoreError::AuthError(msg) => AppError::AuthError(msg),
            CoreError::PersistenceError(msg) => AppError::InternalServerError(msg),
            CoreError::InvalidTransition { from, to } => AppError::ConflictError(format!(
                "Invalid status transition from {} to {}",
                from, to
            )),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            // The rejection carries the real remaining count so the client
            // can offer a smaller party size without a second round trip.
            AppError::AdmissionError {
                reason,
                available_spots,
            } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": reason, "availableSpots": available_spots }),
            ),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
