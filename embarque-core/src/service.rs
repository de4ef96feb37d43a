use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::code::CodeGenerator;
use crate::error::ReservationError;
use crate::repository::{FlightRepository, ReservationKey, ReservationRepository};
use crate::reservation::Reservation;

/// Attempts before giving up on finding an unused reservation code.
const MAX_CODE_ATTEMPTS: u32 = 5;

/// Validates and mutates reservation state.
///
/// The service owns operation-level orchestration; atomicity of the
/// individual store operations is the repositories' contract.
pub struct ReservationService {
    flights: Arc<dyn FlightRepository>,
    reservations: Arc<dyn ReservationRepository>,
    codes: Arc<dyn CodeGenerator>,
}

impl ReservationService {
    pub fn new(
        flights: Arc<dyn FlightRepository>,
        reservations: Arc<dyn ReservationRepository>,
        codes: Arc<dyn CodeGenerator>,
    ) -> Self {
        Self {
            flights,
            reservations,
            codes,
        }
    }

    /// Lists the reservations of a flight. Unknown flights yield an
    /// empty list.
    pub async fn list_for_flight(
        &self,
        flight_id: Uuid,
    ) -> Result<Vec<Reservation>, ReservationError> {
        self.reservations.list_for_flight(flight_id).await
    }

    /// Creates a pending reservation for `document` on `flight_id`.
    pub async fn create(
        &self,
        flight_id: Uuid,
        document: &str,
    ) -> Result<Reservation, ReservationError> {
        // 1. Flight must exist
        self.flights
            .find_flight(flight_id)
            .await?
            .ok_or(ReservationError::FlightNotFound(flight_id))?;

        // 2. One reservation per document per flight. The unique index
        // on (flight_id, document) backstops this check under
        // concurrent creates.
        if self
            .reservations
            .find_for_document(flight_id, document)
            .await?
            .is_some()
        {
            return Err(ReservationError::DuplicateReservation {
                flight_id,
                document: document.to_string(),
            });
        }

        // 3. Generate a code and persist, regenerating while the code
        // collides with an existing reservation.
        let mut attempts = 0;
        loop {
            attempts += 1;
            let reservation = Reservation::new(flight_id, document, self.codes.generate());

            match self.reservations.insert(&reservation).await {
                Ok(()) => {
                    info!(
                        reservation_id = %reservation.id,
                        flight_id = %flight_id,
                        code = %reservation.code,
                        "reservation created"
                    );
                    return Ok(reservation);
                }
                Err(ReservationError::CodeTaken(code)) => {
                    if attempts >= MAX_CODE_ATTEMPTS {
                        return Err(ReservationError::CodeSpaceExhausted(attempts));
                    }
                    tracing::debug!(%code, attempts, "reservation code collision, regenerating");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Confirms a reservation and binds it to `seat`.
    pub async fn check_in(
        &self,
        key: &ReservationKey,
        seat: i32,
    ) -> Result<Reservation, ReservationError> {
        let reservation = self.reservations.check_in(key, seat).await?;
        info!(
            reservation_id = %reservation.id,
            flight_id = %reservation.flight_id,
            seat,
            "reservation checked in"
        );
        Ok(reservation)
    }
}
