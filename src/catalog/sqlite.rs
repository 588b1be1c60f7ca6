use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::SqlitePool;
use std::collections::HashMap;

use super::{filter_hotels, prepare_review, with_default_rooms, CatalogError, HotelCatalog, HotelQuery};
use crate::models::hotel::{
    Coordinates, Hotel, HotelUpdate, NewHotel, NewReview, Review, ReviewAdded, RoomType,
};

/// Destination, price and stars are matched in SQL ahead of the limit.
/// Amenities are substring matches over a JSON list and are checked after
/// loading, in which case the limit is applied afterwards too.
const FIND_HOTELS: &str = r#"
    SELECT * FROM hotels
    WHERE (?1 IS NULL OR instr(lower(location), lower(?1)) > 0)
      AND (?2 IS NULL OR price_per_night >= ?2)
      AND (?3 IS NULL OR price_per_night <= ?3)
      AND (?4 IS NULL OR star_rating IN (SELECT value FROM json_each(?4)))
    ORDER BY star_rating DESC, id
    LIMIT ?5
"#;

#[derive(Debug, sqlx::FromRow)]
struct HotelRow {
    id: i64,
    name: String,
    location: String,
    city: String,
    country: String,
    star_rating: i64,
    price_per_night: f64,
    currency: String,
    image_url: String,
    images: Json<Vec<String>>,
    amenities: Json<Vec<String>>,
    description: String,
    lat: f64,
    lng: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct RoomTypeRow {
    hotel_id: i64,
    name: String,
    description: String,
    price_per_night: f64,
    features: Json<Vec<String>>,
}

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    hotel_id: i64,
    name: String,
    rating: i64,
    comment: String,
    date: NaiveDate,
}

impl HotelRow {
    fn into_hotel(self, room_types: Vec<RoomType>, reviews: Vec<Review>) -> Result<Hotel, CatalogError> {
        let star_rating = u8::try_from(self.star_rating)
            .map_err(|_| CatalogError::Corrupt(format!("star rating {}", self.star_rating)))?;
        let images = if self.images.0.is_empty() {
            vec![self.image_url.clone()]
        } else {
            self.images.0
        };

        Ok(Hotel {
            id: self.id,
            name: self.name,
            location: self.location,
            city: self.city,
            country: self.country,
            star_rating,
            price_per_night: self.price_per_night,
            currency: self.currency,
            image_url: self.image_url,
            images,
            amenities: self.amenities.0,
            description: self.description,
            coordinates: Coordinates {
                lat: self.lat,
                lng: self.lng,
            },
            room_types,
            reviews,
        })
    }
}

impl From<RoomTypeRow> for RoomType {
    fn from(row: RoomTypeRow) -> Self {
        RoomType {
            name: row.name,
            description: row.description,
            price_per_night: row.price_per_night,
            features: row.features.0,
        }
    }
}

impl TryFrom<ReviewRow> for Review {
    type Error = CatalogError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        Ok(Review {
            name: row.name,
            rating: u8::try_from(row.rating)
                .map_err(|_| CatalogError::Corrupt(format!("review rating {}", row.rating)))?,
            comment: row.comment,
            date: row.date,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Loads `hotels` when the table is empty. Returns whether anything was written.
    pub async fn seed_if_empty(&self, hotels: &[Hotel]) -> Result<bool, CatalogError> {
        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hotels")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            return Ok(false);
        }

        for hotel in hotels {
            insert_hotel(&mut tx, hotel, Some(hotel.id)).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn room_types(&self, hotel_id: Option<i64>) -> Result<HashMap<i64, Vec<RoomType>>, CatalogError> {
        let rows = sqlx::query_as::<_, RoomTypeRow>(
            "SELECT hotel_id, name, description, price_per_night, features FROM room_types WHERE ?1 IS NULL OR hotel_id = ?1 ORDER BY hotel_id, position",
        )
        .bind(hotel_id)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<RoomType>> = HashMap::new();
        for row in rows {
            grouped.entry(row.hotel_id).or_default().push(row.into());
        }
        Ok(grouped)
    }

    async fn reviews(&self, hotel_id: Option<i64>) -> Result<HashMap<i64, Vec<Review>>, CatalogError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT hotel_id, name, rating, comment, date FROM reviews WHERE ?1 IS NULL OR hotel_id = ?1 ORDER BY hotel_id, id DESC",
        )
        .bind(hotel_id)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<Review>> = HashMap::new();
        for row in rows {
            let hotel_id = row.hotel_id;
            grouped.entry(hotel_id).or_default().push(row.try_into()?);
        }
        Ok(grouped)
    }
}

/// Writes a hotel with its room types and reviews. Without `id` the
/// database assigns one.
async fn insert_hotel(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    hotel: &Hotel,
    id: Option<i64>,
) -> Result<i64, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO hotels (id, name, location, city, country, star_rating, price_per_night,
                            currency, image_url, images, amenities, description, lat, lng)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(id)
    .bind(&hotel.name)
    .bind(&hotel.location)
    .bind(&hotel.city)
    .bind(&hotel.country)
    .bind(i64::from(hotel.star_rating))
    .bind(hotel.price_per_night)
    .bind(&hotel.currency)
    .bind(&hotel.image_url)
    .bind(Json(&hotel.images))
    .bind(Json(&hotel.amenities))
    .bind(&hotel.description)
    .bind(hotel.coordinates.lat)
    .bind(hotel.coordinates.lng)
    .fetch_one(&mut **tx)
    .await?;

    for (position, room) in hotel.room_types.iter().enumerate() {
        sqlx::query(
            "INSERT INTO room_types (hotel_id, position, name, description, price_per_night, features) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(position as i64)
        .bind(&room.name)
        .bind(&room.description)
        .bind(room.price_per_night)
        .bind(Json(&room.features))
        .execute(&mut **tx)
        .await?;
    }

    // Stored oldest first; reads come back newest first.
    for review in hotel.reviews.iter().rev() {
        insert_review(tx, id, review).await?;
    }

    Ok(id)
}

async fn insert_review(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    hotel_id: i64,
    review: &Review,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO reviews (hotel_id, name, rating, comment, date) VALUES (?, ?, ?, ?, ?)")
        .bind(hotel_id)
        .bind(&review.name)
        .bind(i64::from(review.rating))
        .bind(&review.comment)
        .bind(review.date)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[async_trait]
impl HotelCatalog for SqliteCatalog {
    async fn find(&self, query: &HotelQuery) -> Result<Vec<Hotel>, CatalogError> {
        let filters = &query.filters;
        let (min_price, max_price) = filters.price_range.unzip();
        let stars = (!filters.star_ratings.is_empty()).then(|| Json(&filters.star_ratings));
        // SQLite reads a negative limit as "no limit".
        let sql_limit = if filters.amenities.is_empty() {
            i64::try_from(query.limit).unwrap_or(i64::MAX)
        } else {
            -1
        };

        let rows = sqlx::query_as::<_, HotelRow>(FIND_HOTELS)
            .bind(query.destination())
            .bind(min_price)
            .bind(max_price)
            .bind(stars)
            .bind(sql_limit)
            .fetch_all(&self.pool)
            .await?;

        let mut room_types = self.room_types(None).await?;
        let mut reviews = self.reviews(None).await?;

        let hotels = rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                row.into_hotel(
                    room_types.remove(&id).unwrap_or_default(),
                    reviews.remove(&id).unwrap_or_default(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut hotels = filter_hotels(hotels, filters);
        hotels.truncate(query.limit);
        Ok(hotels)
    }

    async fn get(&self, id: i64) -> Result<Hotel, CatalogError> {
        let row = sqlx::query_as::<_, HotelRow>("SELECT * FROM hotels WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(CatalogError::NotFound)?;

        let room_types = self.room_types(Some(id)).await?.remove(&id).unwrap_or_default();
        let reviews = self.reviews(Some(id)).await?.remove(&id).unwrap_or_default();
        row.into_hotel(room_types, reviews).map(with_default_rooms)
    }

    async fn add_review(&self, hotel_id: i64, review: NewReview) -> Result<ReviewAdded, CatalogError> {
        let review = prepare_review(review)?;
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM hotels WHERE id = ?")
            .bind(hotel_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(CatalogError::NotFound);
        }

        insert_review(&mut tx, hotel_id, &review).await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE hotel_id = ?")
            .bind(hotel_id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(ReviewAdded {
            review,
            total_reviews: usize::try_from(total).unwrap_or_default(),
        })
    }

    async fn create(&self, hotel: NewHotel) -> Result<Hotel, CatalogError> {
        let mut tx = self.pool.begin().await?;
        let id = insert_hotel(&mut tx, &hotel.into_hotel(0), None).await?;
        tx.commit().await?;

        log::info!("Hotel {id} created");
        self.get(id).await
    }

    async fn update(&self, id: i64, update: HotelUpdate) -> Result<Hotel, CatalogError> {
        let mut tx = self.pool.begin().await?;

        let mut hotel = sqlx::query_as::<_, HotelRow>("SELECT * FROM hotels WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CatalogError::NotFound)?
            .into_hotel(Vec::new(), Vec::new())?;
        update.apply(&mut hotel);

        sqlx::query(
            r#"
            UPDATE hotels
            SET name = ?, location = ?, city = ?, country = ?, star_rating = ?, price_per_night = ?,
                currency = ?, image_url = ?, images = ?, amenities = ?, description = ?, lat = ?, lng = ?
            WHERE id = ?
            "#,
        )
        .bind(&hotel.name)
        .bind(&hotel.location)
        .bind(&hotel.city)
        .bind(&hotel.country)
        .bind(i64::from(hotel.star_rating))
        .bind(hotel.price_per_night)
        .bind(&hotel.currency)
        .bind(&hotel.image_url)
        .bind(Json(&hotel.images))
        .bind(Json(&hotel.amenities))
        .bind(&hotel.description)
        .bind(hotel.coordinates.lat)
        .bind(hotel.coordinates.lng)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), CatalogError> {
        let result = sqlx::query("DELETE FROM hotels WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound);
        }
        log::info!("Hotel {id} deleted");
        Ok(())
    }
}
