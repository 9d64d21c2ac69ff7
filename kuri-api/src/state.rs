use std::sync::Arc;

use kuri_booking::BookingService;
use kuri_core::repository::{AdminDirectory, CoffeeCatalog};

#[derive(Clone)]
pub struct AuthSettings {
    pub secret: String,
    pub session_ttl_seconds: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub booking: Arc<BookingService>,
    pub catalog: Arc<dyn CoffeeCatalog>,
    pub admins: Arc<dyn AdminDirectory>,
    pub auth: AuthSettings,
}
