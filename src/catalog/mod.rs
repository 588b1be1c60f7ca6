//! Hotel catalog: the read-mostly side of the service.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::hotel::{
    Hotel, HotelFilters, HotelUpdate, NewHotel, NewReview, Review, ReviewAdded, RoomType,
};

pub mod memory;
pub mod seed;
pub mod sqlite;

pub use memory::InMemoryCatalog;
pub use sqlite::SqliteCatalog;

/// Upper bound on list and search results.
pub const PAGE_LIMIT: usize = 50;
pub const DEFAULT_FEATURED: usize = 6;

const FALLBACK_RATE: f64 = 150.0;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Hotel not found")]
    NotFound,
    #[error("{0}")]
    InvalidReview(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Corrupt hotel record: {0}")]
    Corrupt(String),
}

/// One catalog read. Destination and filters narrow the whole catalog
/// before the result is ranked and cut to `limit`.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelQuery {
    pub destination: Option<String>,
    pub filters: HotelFilters,
    pub limit: usize,
}

impl Default for HotelQuery {
    fn default() -> Self {
        Self {
            destination: None,
            filters: HotelFilters::default(),
            limit: PAGE_LIMIT,
        }
    }
}

impl HotelQuery {
    pub fn destination(&self) -> Option<&str> {
        self.destination
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Case-insensitive substring match on the hotel location.
    pub fn matches_location(&self, hotel: &Hotel) -> bool {
        match self.destination() {
            Some(needle) => hotel
                .location
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        }
    }
}

#[async_trait]
pub trait HotelCatalog: Send + Sync {
    /// Matching hotels, best rated first, at most `query.limit`.
    async fn find(&self, query: &HotelQuery) -> Result<Vec<Hotel>, CatalogError>;

    async fn list(&self) -> Result<Vec<Hotel>, CatalogError> {
        self.find(&HotelQuery::default()).await
    }

    async fn featured(&self, limit: usize) -> Result<Vec<Hotel>, CatalogError> {
        self.find(&HotelQuery {
            limit,
            ..Default::default()
        })
        .await
    }

    async fn search(&self, destination: Option<&str>) -> Result<Vec<Hotel>, CatalogError> {
        self.find(&HotelQuery {
            destination: destination.map(String::from),
            ..Default::default()
        })
        .await
    }

    async fn get(&self, id: i64) -> Result<Hotel, CatalogError>;

    async fn add_review(&self, hotel_id: i64, review: NewReview) -> Result<ReviewAdded, CatalogError>;

    async fn create(&self, hotel: NewHotel) -> Result<Hotel, CatalogError>;

    async fn update(&self, id: i64, update: HotelUpdate) -> Result<Hotel, CatalogError>;

    /// Existing bookings keep their hotel snapshot.
    async fn delete(&self, id: i64) -> Result<(), CatalogError>;
}

pub fn sort_by_rating(hotels: &mut [Hotel]) {
    hotels.sort_by(|a, b| b.star_rating.cmp(&a.star_rating).then(a.id.cmp(&b.id)));
}

/// Applies a whole query to an unranked set of hotels.
pub fn run_query(hotels: Vec<Hotel>, query: &HotelQuery) -> Vec<Hotel> {
    let mut hotels = filter_hotels(
        hotels
            .into_iter()
            .filter(|hotel| query.matches_location(hotel))
            .collect(),
        &query.filters,
    );
    sort_by_rating(&mut hotels);
    hotels.truncate(query.limit);
    hotels
}

/// Price range is inclusive. Every requested amenity must match one of the
/// hotel's amenities by case-insensitive substring.
pub fn filter_hotels(hotels: Vec<Hotel>, filters: &HotelFilters) -> Vec<Hotel> {
    if filters.is_empty() {
        return hotels;
    }

    let wanted: Vec<String> = filters.amenities.iter().map(|a| a.to_lowercase()).collect();

    hotels
        .into_iter()
        .filter(|hotel| match filters.price_range {
            Some((min, max)) => hotel.price_per_night >= min && hotel.price_per_night <= max,
            None => true,
        })
        .filter(|hotel| {
            filters.star_ratings.is_empty() || filters.star_ratings.contains(&hotel.star_rating)
        })
        .filter(|hotel| {
            let have: Vec<String> = hotel.amenities.iter().map(|a| a.to_lowercase()).collect();
            wanted
                .iter()
                .all(|amenity| have.iter().any(|h| h.contains(amenity.as_str())))
        })
        .collect()
}

/// Hotels without configured room types get a standard and a deluxe room
/// derived from the nightly rate.
pub fn with_default_rooms(mut hotel: Hotel) -> Hotel {
    if hotel.room_types.is_empty() {
        let base = if hotel.price_per_night > 0.0 {
            hotel.price_per_night
        } else {
            FALLBACK_RATE
        };
        hotel.room_types = vec![
            RoomType {
                name: "Standard Room".into(),
                description: "Comfortable room with modern amenities and city views".into(),
                price_per_night: base,
                features: to_strings(&["Queen Bed", "City View", "Free WiFi", "Air Conditioning"]),
            },
            RoomType {
                name: "Deluxe Room".into(),
                description: "Spacious room with premium furnishing and enhanced amenities".into(),
                price_per_night: (base * 1.3).floor(),
                features: to_strings(&["King Bed", "Ocean View", "Balcony", "Mini Bar", "Bathrobes"]),
            },
        ];
    }
    hotel
}

pub fn prepare_review(review: NewReview) -> Result<Review, CatalogError> {
    if !(1..=5).contains(&review.rating) {
        return Err(CatalogError::InvalidReview("Rating must be between 1 and 5 stars"));
    }
    let comment = review.comment.trim();
    if comment.chars().count() < 10 {
        return Err(CatalogError::InvalidReview(
            "Comment must be at least 10 characters long",
        ));
    }
    let name = review.guest_name.trim();
    if name.chars().count() < 2 {
        return Err(CatalogError::InvalidReview("Guest name is required"));
    }

    Ok(Review {
        name: name.to_string(),
        rating: review.rating,
        comment: comment.to_string(),
        date: chrono::Utc::now().date_naive(),
    })
}

pub(crate) fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed::demo_hotels;

    fn ids(hotels: &[Hotel]) -> Vec<i64> {
        hotels.iter().map(|h| h.id).collect()
    }

    #[test]
    fn empty_filters_keep_everything() {
        let hotels = demo_hotels();
        let count = hotels.len();
        assert_eq!(filter_hotels(hotels, &HotelFilters::default()).len(), count);
    }

    #[test]
    fn price_range_is_inclusive() {
        let filters = HotelFilters {
            price_range: Some((95.0, 180.0)),
            ..Default::default()
        };
        let filtered = filter_hotels(demo_hotels(), &filters);
        assert!(!filtered.is_empty());
        assert!(filtered
            .iter()
            .all(|h| h.price_per_night >= 95.0 && h.price_per_night <= 180.0));
        assert!(filtered.iter().any(|h| h.price_per_night == 95.0));
    }

    #[test]
    fn stars_and_amenities_combine() {
        let filters = HotelFilters {
            star_ratings: vec![5],
            amenities: vec!["SPA".into(), "pool".into()],
            ..Default::default()
        };
        let filtered = filter_hotels(demo_hotels(), &filters);
        assert!(!filtered.is_empty());
        for hotel in &filtered {
            assert_eq!(hotel.star_rating, 5);
            let amenities = hotel.amenities.join(" ").to_lowercase();
            assert!(amenities.contains("spa") && amenities.contains("pool"));
        }
    }

    #[test]
    fn ordering_prefers_higher_ratings() {
        let mut hotels = demo_hotels();
        sort_by_rating(&mut hotels);
        assert!(hotels
            .windows(2)
            .all(|w| w[0].star_rating >= w[1].star_rating));
        assert_eq!(ids(&hotels).len(), demo_hotels().len());
    }

    fn numbered(count: i64) -> Vec<Hotel> {
        let template = demo_hotels().remove(0);
        (1..=count)
            .map(|id| Hotel {
                id,
                location: "Rue de Rivoli, Paris".into(),
                star_rating: 5,
                ..template.clone()
            })
            .collect()
    }

    #[test]
    fn query_narrows_before_it_truncates() {
        let mut hotels = numbered(59);
        hotels.push(Hotel {
            id: 60,
            location: "Lost City, Atlantis".into(),
            star_rating: 1,
            price_per_night: 40.0,
            ..demo_hotels().remove(0)
        });

        let everything = run_query(hotels.clone(), &HotelQuery::default());
        assert_eq!(everything.len(), PAGE_LIMIT);
        assert!(!ids(&everything).contains(&60));

        let by_destination = HotelQuery {
            destination: Some("atlantis".into()),
            ..Default::default()
        };
        assert_eq!(ids(&run_query(hotels.clone(), &by_destination)), vec![60]);

        let by_stars = HotelQuery {
            filters: HotelFilters {
                star_ratings: vec![1],
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(ids(&run_query(hotels, &by_stars)), vec![60]);
    }

    #[test]
    fn limit_is_not_capped_by_the_page_size() {
        let query = HotelQuery {
            limit: 70,
            ..Default::default()
        };
        assert_eq!(run_query(numbered(60), &query).len(), 60);
    }

    #[test]
    fn default_rooms_derive_from_the_nightly_rate() {
        let mut hotel = demo_hotels().remove(0);
        hotel.room_types.clear();
        hotel.price_per_night = 200.0;
        let hotel = with_default_rooms(hotel);
        assert_eq!(hotel.room_types.len(), 2);
        assert_eq!(hotel.room_types[0].price_per_night, 200.0);
        assert_eq!(hotel.room_types[1].price_per_night, 260.0);

        let mut free = demo_hotels().remove(0);
        free.room_types.clear();
        free.price_per_night = 0.0;
        assert_eq!(with_default_rooms(free).room_types[0].price_per_night, 150.0);
    }

    #[test]
    fn review_rules() {
        let ok = prepare_review(NewReview {
            guest_name: "  Jo ".into(),
            rating: 4,
            comment: "  Lovely stay, great staff.  ".into(),
        })
        .unwrap();
        assert_eq!(ok.name, "Jo");
        assert_eq!(ok.comment, "Lovely stay, great staff.");

        let short = prepare_review(NewReview {
            guest_name: "Jo".into(),
            rating: 4,
            comment: "   nice    ".into(),
        });
        assert!(matches!(short, Err(CatalogError::InvalidReview(_))));

        let rating = prepare_review(NewReview {
            guest_name: "Jo".into(),
            rating: 0,
            comment: "Lovely stay, great staff.".into(),
        });
        assert!(matches!(rating, Err(CatalogError::InvalidReview(_))));
    }
}
