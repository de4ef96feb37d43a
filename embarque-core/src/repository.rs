use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ReservationError;
use crate::flight::Flight;
use crate::reservation::Reservation;

/// Selector accepted by the check-in operation.
///
/// Passengers check in with the code printed on their reservation;
/// internal callers use the reservation's own id.
#[derive(Debug, Clone)]
pub enum ReservationKey {
    Id(Uuid),
    Code(String),
}

impl std::fmt::Display for ReservationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationKey::Id(id) => write!(f, "id={id}"),
            ReservationKey::Code(code) => write!(f, "code={code}"),
        }
    }
}

/// Read access to flight data.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn find_flight(&self, flight_id: Uuid) -> Result<Option<Flight>, ReservationError>;
}

/// Persistence for reservations.
///
/// `insert` and `check_in` must be atomic: a failed call leaves the
/// store exactly as it was. `check_in` performs the whole
/// validate-and-confirm sequence inside one store transaction so the
/// seat-occupancy check is read-consistent with the write.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// All reservations of a flight, in store-native order. An unknown
    /// flight yields an empty list, not an error.
    async fn list_for_flight(&self, flight_id: Uuid)
        -> Result<Vec<Reservation>, ReservationError>;

    /// The reservation held by `document` on `flight_id`, if any.
    async fn find_for_document(
        &self,
        flight_id: Uuid,
        document: &str,
    ) -> Result<Option<Reservation>, ReservationError>;

    /// Persists a new pending reservation.
    ///
    /// Fails with [`ReservationError::DuplicateReservation`] when the
    /// (flight, document) pair already has a row, and with
    /// [`ReservationError::CodeTaken`] when the code is in use.
    async fn insert(&self, reservation: &Reservation) -> Result<(), ReservationError>;

    /// Confirms the reservation and assigns the seat, validating in
    /// order: existence, not yet confirmed, seat in range, seat free
    /// among the flight's confirmed reservations.
    async fn check_in(
        &self,
        key: &ReservationKey,
        seat: i32,
    ) -> Result<Reservation, ReservationError>;
}
