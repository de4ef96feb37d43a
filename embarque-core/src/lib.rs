pub mod code;
pub mod error;
pub mod flight;
pub mod repository;
pub mod reservation;
pub mod service;

pub use code::{CodeGenerator, RandomCodeGenerator, SequenceCodeGenerator};
pub use error::ReservationError;
pub use flight::Flight;
pub use repository::{FlightRepository, ReservationKey, ReservationRepository};
pub use reservation::{Reservation, ReservationStatus};
pub use service::ReservationService;
