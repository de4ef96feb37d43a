use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use embarque_core::ReservationError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Conflict(String),
    BadRequest(String),
    Internal(ReservationError),
}

impl From<ReservationError> for ApiError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::FlightNotFound(_) | ReservationError::ReservationNotFound => {
                ApiError::NotFound(err.to_string())
            }
            ReservationError::DuplicateReservation { .. }
            | ReservationError::AlreadyCheckedIn
            | ReservationError::SeatOccupied(_) => ApiError::Conflict(err.to_string()),
            ReservationError::SeatOutOfRange { .. } => ApiError::BadRequest(err.to_string()),
            // CodeTaken is consumed by the service's retry loop; if it
            // ever escapes, it is as internal as a storage failure.
            ReservationError::CodeTaken(_)
            | ReservationError::CodeSpaceExhausted(_)
            | ReservationError::Store(_) => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "Internal Server Error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
