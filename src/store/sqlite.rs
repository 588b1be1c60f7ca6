use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{Row, SqlitePool};

use super::{apply_update, BookingStore, StoreError, MAX_CONFIRMATION_ATTEMPTS};
use crate::booking::confirmation::generate_confirmation_number;
use crate::booking::pricing::PriceBreakdown;
use crate::models::booking::{
    BookingConfirmation, BookingStatus, BookingUpdate, ConfirmedBooking, GuestInfo, NewBooking,
    StayDetails,
};
use crate::models::hotel::{HotelSnapshot, RoomType};

#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: i64,
    confirmation_number: String,
    hotel_id: i64,
    hotel_name: String,
    hotel_location: String,
    hotel_city: String,
    hotel_star_rating: i64,
    hotel_image_url: String,
    check_in: NaiveDate,
    check_out: NaiveDate,
    rooms: i64,
    guests: i64,
    room_name: String,
    room_description: String,
    room_price_per_night: f64,
    room_features: Json<Vec<String>>,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    special_requests: String,
    nights: i64,
    base_price: f64,
    taxes: f64,
    total_price: f64,
    status: String,
    booking_date: DateTime<Utc>,
    cancelled_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

fn narrow<T: TryFrom<i64>>(value: i64, column: &str) -> Result<T, StoreError> {
    T::try_from(value).map_err(|_| StoreError::Corrupt(format!("{column} out of range: {value}")))
}

impl TryFrom<BookingRow> for ConfirmedBooking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(ConfirmedBooking {
            id: row.id,
            hotel: HotelSnapshot {
                id: row.hotel_id,
                name: row.hotel_name,
                location: row.hotel_location,
                city: row.hotel_city,
                star_rating: narrow(row.hotel_star_rating, "hotel_star_rating")?,
                image_url: row.hotel_image_url,
            },
            stay: StayDetails {
                check_in: row.check_in,
                check_out: row.check_out,
                rooms: narrow(row.rooms, "rooms")?,
                guests: narrow(row.guests, "guests")?,
                room: RoomType {
                    name: row.room_name,
                    description: row.room_description,
                    price_per_night: row.room_price_per_night,
                    features: row.room_features.0,
                },
            },
            guest: GuestInfo {
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                phone: row.phone,
                special_requests: row.special_requests,
            },
            price: PriceBreakdown {
                nights: row.nights,
                base_price: row.base_price,
                taxes: row.taxes,
                total_price: row.total_price,
            },
            status: row.status.parse().map_err(StoreError::Corrupt)?,
            confirmation_number: row.confirmation_number,
            booking_date: row.booking_date,
            cancelled_at: row.cancelled_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct SqliteBookingStore {
    pool: SqlitePool,
    generator: Box<dyn Fn() -> String + Send + Sync>,
}

impl SqliteBookingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_generator(pool, generate_confirmation_number)
    }

    pub fn with_generator<F>(pool: SqlitePool, generator: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self {
            pool,
            generator: Box::new(generator),
        }
    }

    async fn fetch<'e, E>(
        &self,
        executor: E,
        confirmation_number: &str,
    ) -> Result<ConfirmedBooking, StoreError>
    where
        E: sqlx::SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, BookingRow>("SELECT * FROM bookings WHERE confirmation_number = ?")
            .bind(confirmation_number)
            .fetch_optional(executor)
            .await?
            .ok_or(StoreError::NotFound)?
            .try_into()
    }

    async fn insert(
        &self,
        confirmation_number: &str,
        booking: &NewBooking,
        booking_date: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let NewBooking {
            hotel,
            stay,
            guest,
            price,
        } = booking;

        let row = sqlx::query(
            r#"
            INSERT INTO bookings (
                confirmation_number,
                hotel_id, hotel_name, hotel_location, hotel_city, hotel_star_rating, hotel_image_url,
                check_in, check_out, rooms, guests,
                room_name, room_description, room_price_per_night, room_features,
                first_name, last_name, email, phone, special_requests,
                nights, base_price, taxes, total_price,
                status, booking_date
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'confirmed', ?)
            RETURNING id
            "#,
        )
        .bind(confirmation_number)
        .bind(hotel.id)
        .bind(&hotel.name)
        .bind(&hotel.location)
        .bind(&hotel.city)
        .bind(i64::from(hotel.star_rating))
        .bind(&hotel.image_url)
        .bind(stay.check_in)
        .bind(stay.check_out)
        .bind(i64::from(stay.rooms))
        .bind(i64::from(stay.guests))
        .bind(&stay.room.name)
        .bind(&stay.room.description)
        .bind(stay.room.price_per_night)
        .bind(Json(&stay.room.features))
        .bind(&guest.first_name)
        .bind(&guest.last_name)
        .bind(&guest.email)
        .bind(&guest.phone)
        .bind(&guest.special_requests)
        .bind(price.nights)
        .bind(price.base_price)
        .bind(price.taxes)
        .bind(price.total_price)
        .bind(booking_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get::<i64, _>("id"))
    }
}

impl std::fmt::Debug for SqliteBookingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBookingStore")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl BookingStore for SqliteBookingStore {
    async fn create(&self, booking: NewBooking) -> Result<BookingConfirmation, StoreError> {
        let booking_date = Utc::now();

        for _ in 0..MAX_CONFIRMATION_ATTEMPTS {
            let confirmation_number = (self.generator)();
            match self.insert(&confirmation_number, &booking, booking_date).await {
                Ok(booking_id) => {
                    return Ok(BookingConfirmation {
                        confirmation_number,
                        booking_id,
                        status: BookingStatus::Confirmed,
                        booking_date,
                    })
                }
                Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                    log::warn!("Confirmation number {confirmation_number} already taken, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(StoreError::ConfirmationExhausted)
    }

    async fn find_by_confirmation(
        &self,
        confirmation_number: &str,
    ) -> Result<ConfirmedBooking, StoreError> {
        self.fetch(&self.pool, confirmation_number).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<ConfirmedBooking>, StoreError> {
        sqlx::query_as::<_, BookingRow>(
            "SELECT * FROM bookings WHERE email = ? COLLATE NOCASE ORDER BY id",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(ConfirmedBooking::try_from)
        .collect()
    }

    async fn cancel(&self, confirmation_number: &str) -> Result<ConfirmedBooking, StoreError> {
        let mut tx = self.pool.begin().await?;

        let booking = self.fetch(&mut *tx, confirmation_number).await?;
        if booking.status == BookingStatus::Cancelled {
            return Err(StoreError::AlreadyCancelled(confirmation_number.to_string()));
        }

        sqlx::query(
            "UPDATE bookings SET status = 'cancelled', cancelled_at = ? WHERE confirmation_number = ? AND status = 'confirmed'",
        )
        .bind(Utc::now())
        .bind(confirmation_number)
        .execute(&mut *tx)
        .await?;

        let cancelled = self.fetch(&mut *tx, confirmation_number).await?;
        tx.commit().await?;
        Ok(cancelled)
    }

    async fn update(
        &self,
        confirmation_number: &str,
        update: BookingUpdate,
    ) -> Result<ConfirmedBooking, StoreError> {
        let mut tx = self.pool.begin().await?;

        let mut booking = self.fetch(&mut *tx, confirmation_number).await?;
        if booking.status == BookingStatus::Cancelled {
            return Err(StoreError::Cancelled(confirmation_number.to_string()));
        }
        apply_update(&mut booking, update);

        sqlx::query(
            r#"
            UPDATE bookings
            SET first_name = ?, last_name = ?, email = ?, phone = ?, special_requests = ?, updated_at = ?
            WHERE confirmation_number = ?
            "#,
        )
        .bind(&booking.guest.first_name)
        .bind(&booking.guest.last_name)
        .bind(&booking.guest.email)
        .bind(&booking.guest.phone)
        .bind(&booking.guest.special_requests)
        .bind(booking.updated_at)
        .bind(confirmation_number)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(booking)
    }

    async fn list(&self) -> Result<Vec<ConfirmedBooking>, StoreError> {
        sqlx::query_as::<_, BookingRow>("SELECT * FROM bookings ORDER BY id")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(ConfirmedBooking::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::test_support::sample_new_booking;

    #[tokio::test]
    async fn create_then_lookup_returns_the_same_snapshot() {
        let store = SqliteBookingStore::new(test_pool().await);
        let new_booking = sample_new_booking();

        let confirmation = store.create(new_booking.clone()).await.unwrap();
        assert_eq!(confirmation.booking_id, 1000);

        let stored = store
            .find_by_confirmation(&confirmation.confirmation_number)
            .await
            .unwrap();
        assert_eq!(stored.confirmation_number, confirmation.confirmation_number);
        assert_eq!(stored.id, confirmation.booking_id);
        assert_eq!(stored.hotel, new_booking.hotel);
        assert_eq!(stored.stay, new_booking.stay);
        assert_eq!(stored.guest, new_booking.guest);
        assert_eq!(stored.price, new_booking.price);
        assert_eq!(stored.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn unique_constraint_forces_regeneration() {
        let pool = test_pool().await;
        let seq = std::sync::atomic::AtomicUsize::new(0);
        let store = SqliteBookingStore::with_generator(pool, move || {
            match seq.fetch_add(1, std::sync::atomic::Ordering::SeqCst) {
                0 | 1 => "BK111111AAAA".to_string(),
                _ => "BK222222BBBB".to_string(),
            }
        });

        store.create(sample_new_booking()).await.unwrap();
        let second = store.create(sample_new_booking()).await.unwrap();
        assert_eq!(second.confirmation_number, "BK222222BBBB");
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn cancel_is_one_way() {
        let store = SqliteBookingStore::new(test_pool().await);
        let number = store
            .create(sample_new_booking())
            .await
            .unwrap()
            .confirmation_number;

        let cancelled = store.cancel(&number).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert!(cancelled.cancelled_at.is_some());

        assert!(matches!(
            store.cancel(&number).await,
            Err(StoreError::AlreadyCancelled(_))
        ));
        assert!(matches!(
            store.cancel("BK000000NONE").await,
            Err(StoreError::NotFound)
        ));

        let stats = store.stats().await.unwrap();
        assert_eq!((stats.confirmed, stats.cancelled), (0, 1));
        assert_eq!(stats.revenue, 0.0);
    }

    #[tokio::test]
    async fn update_and_email_lookup() {
        let store = SqliteBookingStore::new(test_pool().await);
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
                    special_requests: Some("High floor".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.guest.special_requests, "High floor");

        let found = store.find_by_email("ADA@EXAMPLE.COM").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].guest.special_requests, "High floor");
        assert!(found[0].updated_at.is_some());
    }
}
