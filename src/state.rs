use std::sync::Arc;
use std::time::Duration;

use crate::booking::WizardSessions;
use crate::catalog::{HotelCatalog, InMemoryCatalog, SqliteCatalog};
use crate::store::{BookingStore, InMemoryBookingStore, SqliteBookingStore};

/// Shared handles every handler works through. Built once at startup with
/// exactly one storage backend.
pub struct AppState {
    pub catalog: Arc<dyn HotelCatalog>,
    pub bookings: Arc<dyn BookingStore>,
    pub wizards: WizardSessions,
}

impl AppState {
    pub fn new(catalog: Arc<dyn HotelCatalog>, bookings: Arc<dyn BookingStore>) -> Self {
        Self {
            catalog,
            bookings,
            wizards: WizardSessions::new(),
        }
    }

    /// Demo dataset and in-memory bookings.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryCatalog::demo()),
            Arc::new(InMemoryBookingStore::new()),
        )
    }

    pub fn with_wizard_idle_timeout(mut self, timeout: Duration) -> Self {
        self.wizards = WizardSessions::with_idle_timeout(timeout);
        self
    }

    pub fn sqlite(pool: sqlx::SqlitePool) -> Self {
        Self::new(
            Arc::new(SqliteCatalog::new(pool.clone())),
            Arc::new(SqliteBookingStore::new(pool)),
        )
    }
}
