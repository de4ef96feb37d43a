use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use embarque_core::{Reservation, ReservationKey, ReservationStatus};

use crate::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

// Wire field names keep the legacy Portuguese contract consumed by
// existing clients.

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub voo_id: Uuid,
    pub documento: String,
}

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub voo_id: Uuid,
    pub documento: String,
    pub codigo_reserva: String,
    pub status: ReservationStatus,
    pub num_poltrona: Option<i32>,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id,
            voo_id: reservation.flight_id,
            documento: reservation.document,
            codigo_reserva: reservation.code,
            status: reservation.status,
            num_poltrona: reservation.seat,
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reservas", post(create_reservation))
        .route("/reservas/{voo_id}", get(list_reservations))
        .route(
            "/reservas/{selector}/checkin/{num_poltrona}",
            post(check_in_by_code).patch(check_in_by_id),
        )
}

/// GET /reservas/:voo_id
/// List the reservations of a flight
async fn list_reservations(
    State(state): State<AppState>,
    Path(voo_id): Path<Uuid>,
) -> Result<Json<Vec<ReservationResponse>>, ApiError> {
    let reservations = state.reservations.list_for_flight(voo_id).await?;

    Ok(Json(
        reservations.into_iter().map(ReservationResponse::from).collect(),
    ))
}

/// POST /reservas
/// Create a pending reservation for a document on a flight
async fn create_reservation(
    State(state): State<AppState>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), ApiError> {
    let reservation = state.reservations.create(req.voo_id, &req.documento).await?;

    Ok((StatusCode::CREATED, Json(reservation.into())))
}

/// POST /reservas/:codigo_reserva/checkin/:num_poltrona
/// Check in with the code printed on the reservation
async fn check_in_by_code(
    State(state): State<AppState>,
    Path((codigo_reserva, num_poltrona)): Path<(String, i32)>,
) -> Result<Json<ReservationResponse>, ApiError> {
    let reservation = state
        .reservations
        .check_in(&ReservationKey::Code(codigo_reserva), num_poltrona)
        .await?;

    Ok(Json(reservation.into()))
}

/// PATCH /reservas/:reserva_id/checkin/:num_poltrona
/// Check in by the reservation's own id
async fn check_in_by_id(
    State(state): State<AppState>,
    Path((reserva_id, num_poltrona)): Path<(Uuid, i32)>,
) -> Result<Json<ReservationResponse>, ApiError> {
    let reservation = state
        .reservations
        .check_in(&ReservationKey::Id(reserva_id), num_poltrona)
        .await?;

    Ok(Json(reservation.into()))
}
