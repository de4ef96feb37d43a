//! In-memory store for tests and local development.
//!
//! Implements the core repository traits with the same semantics as the
//! Postgres implementation, behind a single `RwLock`. Not durable and
//! single-process only.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use embarque_core::repository::{FlightRepository, ReservationKey, ReservationRepository};
use embarque_core::{Flight, Reservation, ReservationError, ReservationStatus};

#[derive(Default)]
struct Inner {
    flights: HashMap<Uuid, Flight>,
    // Vec keeps insertion order, the store-native order for listings.
    reservations: Vec<Reservation>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

fn poison_err<T>(_: PoisonError<T>) -> ReservationError {
    ReservationError::store("lock poisoned")
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a flight. Flight management is external to the service, so
    /// tests and dev setups register flights directly.
    pub fn insert_flight(&self, flight: Flight) -> Result<(), ReservationError> {
        let mut inner = self.inner.write().map_err(poison_err)?;
        inner.flights.insert(flight.id, flight);
        Ok(())
    }

    pub fn reservation_count(&self) -> Result<usize, ReservationError> {
        let inner = self.inner.read().map_err(poison_err)?;
        Ok(inner.reservations.len())
    }
}

fn find_by_key<'a>(
    reservations: &'a mut [Reservation],
    key: &ReservationKey,
) -> Option<&'a mut Reservation> {
    reservations.iter_mut().find(|r| match key {
        ReservationKey::Id(id) => r.id == *id,
        ReservationKey::Code(code) => r.code == *code,
    })
}

#[async_trait]
impl FlightRepository for MemoryStore {
    async fn find_flight(&self, flight_id: Uuid) -> Result<Option<Flight>, ReservationError> {
        let inner = self.inner.read().map_err(poison_err)?;
        Ok(inner.flights.get(&flight_id).cloned())
    }
}

#[async_trait]
impl ReservationRepository for MemoryStore {
    async fn list_for_flight(
        &self,
        flight_id: Uuid,
    ) -> Result<Vec<Reservation>, ReservationError> {
        let inner = self.inner.read().map_err(poison_err)?;
        Ok(inner
            .reservations
            .iter()
            .filter(|r| r.flight_id == flight_id)
            .cloned()
            .collect())
    }

    async fn find_for_document(
        &self,
        flight_id: Uuid,
        document: &str,
    ) -> Result<Option<Reservation>, ReservationError> {
        let inner = self.inner.read().map_err(poison_err)?;
        Ok(inner
            .reservations
            .iter()
            .find(|r| r.flight_id == flight_id && r.document == document)
            .cloned())
    }

    async fn insert(&self, reservation: &Reservation) -> Result<(), ReservationError> {
        let mut inner = self.inner.write().map_err(poison_err)?;

        if inner
            .reservations
            .iter()
            .any(|r| r.flight_id == reservation.flight_id && r.document == reservation.document)
        {
            return Err(ReservationError::DuplicateReservation {
                flight_id: reservation.flight_id,
                document: reservation.document.clone(),
            });
        }

        if inner.reservations.iter().any(|r| r.code == reservation.code) {
            return Err(ReservationError::CodeTaken(reservation.code.clone()));
        }

        inner.reservations.push(reservation.clone());
        Ok(())
    }

    async fn check_in(
        &self,
        key: &ReservationKey,
        seat: i32,
    ) -> Result<Reservation, ReservationError> {
        // The single write lock makes the whole validate-and-confirm
        // sequence atomic, like the Postgres transaction.
        let mut inner = self.inner.write().map_err(poison_err)?;
        let Inner {
            flights,
            reservations,
        } = &mut *inner;

        // 1. Reservation must exist for the selector.
        let (flight_id, reservation_id, status) = {
            let reservation =
                find_by_key(reservations, key).ok_or(ReservationError::ReservationNotFound)?;
            (reservation.flight_id, reservation.id, reservation.status)
        };

        // 2. Only pending reservations can check in.
        if status == ReservationStatus::Confirmed {
            return Err(ReservationError::AlreadyCheckedIn);
        }

        // 3. Seat must exist on the flight.
        let flight = flights
            .get(&flight_id)
            .ok_or_else(|| ReservationError::store("reservation references a missing flight"))?;
        if !flight.seat_in_range(seat) {
            return Err(ReservationError::SeatOutOfRange {
                seat,
                seat_count: flight.seat_count,
            });
        }

        // 4. Seat must be free among the flight's confirmed reservations.
        if reservations.iter().any(|r| {
            r.flight_id == flight_id
                && r.status == ReservationStatus::Confirmed
                && r.seat == Some(seat)
        }) {
            return Err(ReservationError::SeatOccupied(seat));
        }

        // 5. Confirm.
        let reservation = reservations
            .iter_mut()
            .find(|r| r.id == reservation_id)
            .ok_or(ReservationError::ReservationNotFound)?;
        reservation.confirm(seat);
        Ok(reservation.clone())
    }
}
