use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::{apply_update, BookingStore, StoreError, MAX_CONFIRMATION_ATTEMPTS};
use crate::booking::confirmation::generate_confirmation_number;
use crate::models::booking::{
    BookingConfirmation, BookingStatus, BookingUpdate, ConfirmedBooking, NewBooking,
};

const FIRST_BOOKING_ID: i64 = 1000;

type Generator = Box<dyn Fn() -> String + Send + Sync>;

struct Inner {
    next_id: i64,
    bookings: Vec<ConfirmedBooking>,
    by_confirmation: HashMap<String, usize>,
}

impl Inner {
    fn get(&self, confirmation_number: &str) -> Result<&ConfirmedBooking, StoreError> {
        let index = *self
            .by_confirmation
            .get(confirmation_number)
            .ok_or(StoreError::NotFound)?;
        Ok(&self.bookings[index])
    }

    fn get_mut(&mut self, confirmation_number: &str) -> Result<&mut ConfirmedBooking, StoreError> {
        let index = *self
            .by_confirmation
            .get(confirmation_number)
            .ok_or(StoreError::NotFound)?;
        Ok(&mut self.bookings[index])
    }
}

pub struct InMemoryBookingStore {
    inner: Mutex<Inner>,
    generator: Generator,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::with_generator(generate_confirmation_number)
    }

    pub fn with_generator<F>(generator: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self {
            inner: Mutex::new(Inner {
                next_id: FIRST_BOOKING_ID,
                bookings: Vec::new(),
                by_confirmation: HashMap::new(),
            }),
            generator: Box::new(generator),
        }
    }
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryBookingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBookingStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn create(&self, booking: NewBooking) -> Result<BookingConfirmation, StoreError> {
        let mut inner = self.inner.lock().await;

        let confirmation_number = (0..MAX_CONFIRMATION_ATTEMPTS)
            .map(|_| (self.generator)())
            .find(|candidate| !inner.by_confirmation.contains_key(candidate))
            .ok_or(StoreError::ConfirmationExhausted)?;

        let id = inner.next_id;
        inner.next_id += 1;

        let record = ConfirmedBooking {
            id,
            confirmation_number: confirmation_number.clone(),
            hotel: booking.hotel,
            stay: booking.stay,
            guest: booking.guest,
            price: booking.price,
            status: BookingStatus::Confirmed,
            booking_date: chrono::Utc::now(),
            cancelled_at: None,
            updated_at: None,
        };
        let confirmation = record.confirmation();

        let index = inner.bookings.len();
        inner.bookings.push(record);
        inner.by_confirmation.insert(confirmation_number, index);

        Ok(confirmation)
    }

    async fn find_by_confirmation(
        &self,
        confirmation_number: &str,
    ) -> Result<ConfirmedBooking, StoreError> {
        let inner = self.inner.lock().await;
        inner.get(confirmation_number).cloned()
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<ConfirmedBooking>, StoreError> {
        let email = email.to_lowercase();
        let inner = self.inner.lock().await;
        Ok(inner
            .bookings
            .iter()
            .filter(|b| b.guest.email.to_lowercase() == email)
            .cloned()
            .collect())
    }

    async fn cancel(&self, confirmation_number: &str) -> Result<ConfirmedBooking, StoreError> {
        let mut inner = self.inner.lock().await;
        let booking = inner.get_mut(confirmation_number)?;
        if booking.status == BookingStatus::Cancelled {
            return Err(StoreError::AlreadyCancelled(confirmation_number.to_string()));
        }
        booking.status = BookingStatus::Cancelled;
        booking.cancelled_at = Some(chrono::Utc::now());
        Ok(booking.clone())
    }

    async fn update(
        &self,
        confirmation_number: &str,
        update: BookingUpdate,
    ) -> Result<ConfirmedBooking, StoreError> {
        let mut inner = self.inner.lock().await;
        let booking = inner.get_mut(confirmation_number)?;
        if booking.status == BookingStatus::Cancelled {
            return Err(StoreError::Cancelled(confirmation_number.to_string()));
        }
        apply_update(booking, update);
        Ok(booking.clone())
    }

    async fn list(&self) -> Result<Vec<ConfirmedBooking>, StoreError> {
        Ok(self.inner.lock().await.bookings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_new_booking;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn created_booking_round_trips_by_confirmation() {
        let store = InMemoryBookingStore::new();
        let new_booking = sample_new_booking();

        let confirmation = store.create(new_booking.clone()).await.unwrap();
        assert_eq!(confirmation.status, BookingStatus::Confirmed);
        assert_eq!(confirmation.booking_id, FIRST_BOOKING_ID);

        let stored = store
            .find_by_confirmation(&confirmation.confirmation_number)
            .await
            .unwrap();
        assert_eq!(stored.confirmation_number, confirmation.confirmation_number);
        assert_eq!(stored.hotel, new_booking.hotel);
        assert_eq!(stored.stay, new_booking.stay);
        assert_eq!(stored.guest, new_booking.guest);
        assert_eq!(stored.price, new_booking.price);
        assert_eq!(stored.booking_date, confirmation.booking_date);
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let store = InMemoryBookingStore::new();
        let first = store.create(sample_new_booking()).await.unwrap();
        let second = store.create(sample_new_booking()).await.unwrap();
        assert_eq!(second.booking_id, first.booking_id + 1);
        assert_ne!(first.confirmation_number, second.confirmation_number);
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() {
        let store = InMemoryBookingStore::with_generator(|| "BK000001ABCD".to_string());
        store.create(sample_new_booking()).await.unwrap();
        assert!(matches!(
            store.find_by_confirmation("bk000001abcd").await,
            Err(StoreError::NotFound)
        ));
        assert!(store.find_by_confirmation("BK000001ABCD").await.is_ok());
    }

    #[tokio::test]
    async fn colliding_numbers_are_regenerated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let store = InMemoryBookingStore::with_generator(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n < 3 {
                "BK000001AAAA".to_string()
            } else {
                "BK000002BBBB".to_string()
            }
        });

        let first = store.create(sample_new_booking()).await.unwrap();
        let second = store.create(sample_new_booking()).await.unwrap();
        assert_eq!(first.confirmation_number, "BK000001AAAA");
        assert_eq!(second.confirmation_number, "BK000002BBBB");
    }

    #[tokio::test]
    async fn gives_up_when_every_candidate_collides() {
        let store = InMemoryBookingStore::with_generator(|| "BK000001AAAA".to_string());
        store.create(sample_new_booking()).await.unwrap();
        assert!(matches!(
            store.create(sample_new_booking()).await,
            Err(StoreError::ConfirmationExhausted)
        ));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancel_twice_is_rejected_without_corrupting_status() {
        let store = InMemoryBookingStore::new();
        let confirmation = store.create(sample_new_booking()).await.unwrap();
        let number = confirmation.confirmation_number;

        let cancelled = store.cancel(&number).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        let cancelled_at = cancelled.cancelled_at.unwrap();

        assert!(matches!(
            store.cancel(&number).await,
            Err(StoreError::AlreadyCancelled(_))
        ));
        let stored = store.find_by_confirmation(&number).await.unwrap();
        assert_eq!(stored.status, BookingStatus::Cancelled);
        assert_eq!(stored.cancelled_at, Some(cancelled_at));
    }

    #[tokio::test]
    async fn cancel_unknown_booking_is_not_found() {
        let store = InMemoryBookingStore::new();
        assert!(matches!(
            store.cancel("BK999999ZZZZ").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn update_overwrites_requests_and_stamps_time() {
        let store = InMemoryBookingStore::new();
        let number = store
            .create(sample_new_booking())
            .await
            .unwrap()
            .confirmation_number;

        let updated = store
            .update(
                &number,
                BookingUpdate {
                    guest: None,
                    special_requests: Some("Late check-in".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.guest.special_requests, "Late check-in");
        assert!(updated.updated_at.is_some());

        store.cancel(&number).await.unwrap();
        assert!(matches!(
            store.update(&number, BookingUpdate::default()).await,
            Err(StoreError::Cancelled(_))
        ));
    }

    #[tokio::test]
    async fn email_lookup_and_stats() {
        let store = InMemoryBookingStore::new();
        let mut other = sample_new_booking();
        other.guest.email = "someone@else.org".into();

        let kept = store.create(sample_new_booking()).await.unwrap();
        let dropped = store.create(sample_new_booking()).await.unwrap();
        store.create(other).await.unwrap();
        store.cancel(&dropped.confirmation_number).await.unwrap();

        let mine = store.find_by_email("ADA@example.com").await.unwrap();
        assert_eq!(mine.len(), 2);

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.confirmed, 2);
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.revenue, 2.0 * 492.0);
        assert!(store
            .find_by_confirmation(&kept.confirmation_number)
            .await
            .is_ok());
    }
}
