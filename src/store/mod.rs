//! Booking persistence.
//!
//! [`BookingStore`] is the only shared mutable resource in the service. Two
//! implementations exist, an in-memory one for demos and tests and a SQLite
//! one backed by the `bookings` table. Exactly one is built at startup.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::booking::{
    BookingConfirmation, BookingStats, BookingUpdate, ConfirmedBooking, NewBooking,
};

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryBookingStore;
pub use sqlite::SqliteBookingStore;

/// Attempts at drawing an unused confirmation number before giving up.
pub const MAX_CONFIRMATION_ATTEMPTS: usize = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Booking not found")]
    NotFound,
    #[error("Booking {0} is already cancelled")]
    AlreadyCancelled(String),
    #[error("Booking {0} is cancelled and can no longer be changed")]
    Cancelled(String),
    #[error("Could not allocate a unique confirmation number")]
    ConfirmationExhausted,
    #[error("Booking store unavailable: {0}")]
    Unavailable(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Corrupt booking record: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Persists a booking under a freshly generated, unique confirmation number.
    async fn create(&self, booking: NewBooking) -> Result<BookingConfirmation, StoreError>;

    async fn find_by_confirmation(
        &self,
        confirmation_number: &str,
    ) -> Result<ConfirmedBooking, StoreError>;

    /// Guest email match is case-insensitive.
    async fn find_by_email(&self, email: &str) -> Result<Vec<ConfirmedBooking>, StoreError>;

    /// Moves a confirmed booking to `cancelled`. A second cancel is rejected
    /// and leaves the record untouched.
    async fn cancel(&self, confirmation_number: &str) -> Result<ConfirmedBooking, StoreError>;

    async fn update(
        &self,
        confirmation_number: &str,
        update: BookingUpdate,
    ) -> Result<ConfirmedBooking, StoreError>;

    async fn list(&self) -> Result<Vec<ConfirmedBooking>, StoreError>;

    async fn stats(&self) -> Result<BookingStats, StoreError> {
        let bookings = self.list().await?;
        Ok(BookingStats::from_bookings(&bookings))
    }
}

pub(crate) fn apply_update(booking: &mut ConfirmedBooking, update: BookingUpdate) {
    let BookingUpdate {
        guest,
        special_requests,
    } = update;
    if let Some(guest) = guest {
        booking.guest = guest;
    }
    if let Some(requests) = special_requests {
        booking.guest.special_requests = requests;
    }
    booking.updated_at = Some(chrono::Utc::now());
}
