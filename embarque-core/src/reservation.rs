use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a reservation.
///
/// The only transition is Pending -> Confirmed, triggered by check-in.
/// A confirmed reservation never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReservationStatus::Pending),
            "confirmed" => Some(ReservationStatus::Confirmed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booking record linking a passenger document to a flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub flight_id: Uuid,
    pub document: String,
    /// Short code shown to the passenger, distinct from `id`.
    pub code: String,
    pub status: ReservationStatus,
    /// Assigned at check-in; None while pending.
    pub seat: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Builds a fresh pending reservation with a generated id.
    pub fn new(flight_id: Uuid, document: &str, code: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            flight_id,
            document: document.to_string(),
            code,
            status: ReservationStatus::Pending,
            seat: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the reservation confirmed on the given seat.
    ///
    /// Callers must have validated the transition first; this only
    /// applies it.
    pub fn confirm(&mut self, seat: i32) {
        self.status = ReservationStatus::Confirmed;
        self.seat = Some(seat);
        self.updated_at = Utc::now();
    }
}
