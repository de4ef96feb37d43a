use std::sync::Arc;

use embarque_core::ReservationService;

#[derive(Clone)]
pub struct AppState {
    pub reservations: Arc<ReservationService>,
}
