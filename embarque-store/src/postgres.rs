use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::error::ErrorKind;
use sqlx::PgPool;
use uuid::Uuid;

use embarque_core::repository::{FlightRepository, ReservationKey, ReservationRepository};
use embarque_core::{Flight, Reservation, ReservationError, ReservationStatus};

pub struct PostgresFlightRepository {
    pool: PgPool,
}

impl PostgresFlightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub struct PostgresReservationRepository {
    pool: PgPool,
}

impl PostgresReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct FlightRow {
    id: Uuid,
    seat_count: i32,
    created_at: DateTime<Utc>,
}

impl From<FlightRow> for Flight {
    fn from(row: FlightRow) -> Self {
        Flight {
            id: row.id,
            seat_count: row.seat_count,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: Uuid,
    flight_id: Uuid,
    document: String,
    code: String,
    status: String,
    seat: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ReservationRow {
    fn into_reservation(self) -> Result<Reservation, ReservationError> {
        let status = ReservationStatus::parse(&self.status).ok_or_else(|| {
            ReservationError::store(format!(
                "reservation {} has unknown status {:?}",
                self.id, self.status
            ))
        })?;

        Ok(Reservation {
            id: self.id,
            flight_id: self.flight_id,
            document: self.document,
            code: self.code,
            status,
            seat: self.seat,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const RESERVATION_COLUMNS: &str =
    "id, flight_id, document, code, status, seat, created_at, updated_at";

/// Translates a unique violation raised by the insert into the domain
/// error for the constraint that fired.
fn map_insert_error(err: sqlx::Error, reservation: &Reservation) -> ReservationError {
    if let sqlx::Error::Database(ref db) = err {
        if matches!(db.kind(), ErrorKind::UniqueViolation) {
            match db.constraint() {
                Some("reservations_flight_document_key") => {
                    return ReservationError::DuplicateReservation {
                        flight_id: reservation.flight_id,
                        document: reservation.document.clone(),
                    };
                }
                Some("reservations_code_key") => {
                    return ReservationError::CodeTaken(reservation.code.clone());
                }
                _ => {}
            }
        }
    }
    ReservationError::store(err)
}

#[async_trait]
impl FlightRepository for PostgresFlightRepository {
    async fn find_flight(&self, flight_id: Uuid) -> Result<Option<Flight>, ReservationError> {
        let row = sqlx::query_as::<_, FlightRow>(
            "SELECT id, seat_count, created_at FROM flights WHERE id = $1",
        )
        .bind(flight_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(ReservationError::store)?;

        Ok(row.map(Flight::from))
    }
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepository {
    async fn list_for_flight(
        &self,
        flight_id: Uuid,
    ) -> Result<Vec<Reservation>, ReservationError> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE flight_id = $1"
        ))
        .bind(flight_id)
        .fetch_all(&self.pool)
        .await
        .map_err(ReservationError::store)?;

        rows.into_iter().map(ReservationRow::into_reservation).collect()
    }

    async fn find_for_document(
        &self,
        flight_id: Uuid,
        document: &str,
    ) -> Result<Option<Reservation>, ReservationError> {
        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations \
             WHERE flight_id = $1 AND document = $2"
        ))
        .bind(flight_id)
        .bind(document)
        .fetch_optional(&self.pool)
        .await
        .map_err(ReservationError::store)?;

        row.map(ReservationRow::into_reservation).transpose()
    }

    async fn insert(&self, reservation: &Reservation) -> Result<(), ReservationError> {
        sqlx::query(
            "INSERT INTO reservations \
             (id, flight_id, document, code, status, seat, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(reservation.id)
        .bind(reservation.flight_id)
        .bind(&reservation.document)
        .bind(&reservation.code)
        .bind(reservation.status.as_str())
        .bind(reservation.seat)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, reservation))?;

        Ok(())
    }

    async fn check_in(
        &self,
        key: &ReservationKey,
        seat: i32,
    ) -> Result<Reservation, ReservationError> {
        let mut tx = self.pool.begin().await.map_err(ReservationError::store)?;

        // 1. Lock the reservation row for the rest of the transaction.
        let select = match key {
            ReservationKey::Id(_) => format!(
                "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1 FOR UPDATE"
            ),
            ReservationKey::Code(_) => format!(
                "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE code = $1 FOR UPDATE"
            ),
        };
        let query = sqlx::query_as::<_, ReservationRow>(&select);
        let row = match key {
            ReservationKey::Id(id) => query.bind(*id),
            ReservationKey::Code(code) => query.bind(code.clone()),
        }
        .fetch_optional(&mut *tx)
        .await
        .map_err(ReservationError::store)?
        .ok_or(ReservationError::ReservationNotFound)?;

        let mut reservation = row.into_reservation()?;

        // 2. Only pending reservations can check in.
        if reservation.status == ReservationStatus::Confirmed {
            return Err(ReservationError::AlreadyCheckedIn);
        }

        // 3. Seat must exist on the flight.
        let flight: Flight = sqlx::query_as::<_, FlightRow>(
            "SELECT id, seat_count, created_at FROM flights WHERE id = $1",
        )
        .bind(reservation.flight_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(ReservationError::store)?
        .into();

        if !flight.seat_in_range(seat) {
            return Err(ReservationError::SeatOutOfRange {
                seat,
                seat_count: flight.seat_count,
            });
        }

        // 4. Seat must be free among the flight's confirmed reservations.
        let occupant: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM reservations \
             WHERE flight_id = $1 AND seat = $2 AND status = 'confirmed'",
        )
        .bind(reservation.flight_id)
        .bind(seat)
        .fetch_optional(&mut *tx)
        .await
        .map_err(ReservationError::store)?;

        if occupant.is_some() {
            return Err(ReservationError::SeatOccupied(seat));
        }

        // 5. Confirm. The partial unique index on (flight_id, seat)
        // catches the concurrent check-in this transaction's occupancy
        // check could not see.
        let updated_at = Utc::now();
        sqlx::query(
            "UPDATE reservations SET status = $1, seat = $2, updated_at = $3 WHERE id = $4",
        )
        .bind(ReservationStatus::Confirmed.as_str())
        .bind(seat)
        .bind(updated_at)
        .bind(reservation.id)
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(ref db) = err {
                if matches!(db.kind(), ErrorKind::UniqueViolation)
                    && db.constraint() == Some("reservations_confirmed_seat_key")
                {
                    return ReservationError::SeatOccupied(seat);
                }
            }
            ReservationError::store(err)
        })?;

        tx.commit().await.map_err(ReservationError::store)?;

        reservation.status = ReservationStatus::Confirmed;
        reservation.seat = Some(seat);
        reservation.updated_at = updated_at;
        Ok(reservation)
    }
}
