use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled flight with a fixed seat capacity.
///
/// Flights are created and retired by an external flight-management
/// process; this service only reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: Uuid,
    pub seat_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Flight {
    pub fn new(id: Uuid, seat_count: i32) -> Self {
        Self {
            id,
            seat_count,
            created_at: Utc::now(),
        }
    }

    /// Seats are numbered 1..=seat_count.
    pub fn seat_in_range(&self, seat: i32) -> bool {
        seat >= 1 && seat <= self.seat_count
    }
}
