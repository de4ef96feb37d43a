use uuid::Uuid;

/// Domain errors for the reservation workflow.
///
/// Every validation failure is detected before any write; operations
/// either fully succeed or leave the store untouched.
#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("flight {0} not found")]
    FlightNotFound(Uuid),

    #[error("reservation not found")]
    ReservationNotFound,

    #[error("a reservation already exists for document {document} on flight {flight_id}")]
    DuplicateReservation { flight_id: Uuid, document: String },

    #[error("reservation already checked in")]
    AlreadyCheckedIn,

    #[error("seat {seat} is out of range for this flight (1..={seat_count})")]
    SeatOutOfRange { seat: i32, seat_count: i32 },

    #[error("seat {0} already occupied")]
    SeatOccupied(i32),

    /// The generated reservation code is already taken. The service
    /// retries generation; callers outside it never see this variant.
    #[error("reservation code {0} already taken")]
    CodeTaken(String),

    #[error("could not generate a unique reservation code after {0} attempts")]
    CodeSpaceExhausted(u32),

    #[error("storage failure")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ReservationError {
    /// Wraps a backend failure. The source is logged server-side but
    /// never surfaced in API responses.
    pub fn store<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        ReservationError::Store(err.into())
    }
}
