use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub city: String,
    pub country: String,
    pub star_rating: u8,
    pub price_per_night: f64,
    pub currency: String,
    pub image_url: String,
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    pub description: String,
    pub coordinates: Coordinates,
    pub room_types: Vec<RoomType>,
    pub reviews: Vec<Review>,
}

impl Hotel {
    pub fn snapshot(&self) -> HotelSnapshot {
        HotelSnapshot {
            id: self.id,
            name: self.name.clone(),
            location: self.location.clone(),
            city: self.city.clone(),
            star_rating: self.star_rating,
            image_url: self.image_url.clone(),
        }
    }

    /// Exact, case-sensitive match on the room type name.
    pub fn room_type(&self, name: &str) -> Option<&RoomType> {
        self.room_types.iter().find(|room| room.name == name)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomType {
    pub name: String,
    pub description: String,
    pub price_per_night: f64,
    pub features: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub name: String,
    pub rating: u8,
    pub comment: String,
    pub date: chrono::NaiveDate,
}

/// Read-only copy of the hotel fields a booking carries with it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HotelSnapshot {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub city: String,
    pub star_rating: u8,
    pub image_url: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct HotelFilters {
    pub price_range: Option<(f64, f64)>,
    pub star_ratings: Vec<u8>,
    pub amenities: Vec<String>,
}

impl HotelFilters {
    pub fn is_empty(&self) -> bool {
        self.price_range.is_none() && self.star_ratings.is_empty() && self.amenities.is_empty()
    }
}

fn default_star_rating() -> u8 {
    3
}

fn default_currency() -> String {
    "USD".into()
}

/// Body of a hotel create. Everything but the name and location has a default.
#[derive(Debug, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewHotel {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default = "default_star_rating")]
    #[validate(range(min = 1, max = 5))]
    pub star_rating: u8,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub price_per_night: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub room_types: Vec<RoomType>,
}

impl NewHotel {
    pub fn into_hotel(self, id: i64) -> Hotel {
        let images = if self.images.is_empty() {
            vec![self.image_url.clone()]
        } else {
            self.images
        };

        Hotel {
            id,
            name: self.name,
            location: self.location,
            city: self.city,
            country: self.country,
            star_rating: self.star_rating,
            price_per_night: self.price_per_night,
            currency: self.currency,
            image_url: self.image_url,
            images,
            amenities: self.amenities,
            description: self.description,
            coordinates: self.coordinates,
            room_types: self.room_types,
            reviews: Vec::new(),
        }
    }
}

/// Partial hotel edit. Absent fields keep their value; room types and
/// reviews are never touched.
#[derive(Debug, Deserialize, Validate, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct HotelUpdate {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub star_rating: Option<u8>,
    #[validate(range(min = 0.0))]
    pub price_per_night: Option<f64>,
    pub currency: Option<String>,
    pub image_url: Option<String>,
    pub images: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
    pub description: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl HotelUpdate {
    pub fn apply(self, hotel: &mut Hotel) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut hotel.name, self.name);
        set(&mut hotel.location, self.location);
        set(&mut hotel.city, self.city);
        set(&mut hotel.country, self.country);
        set(&mut hotel.star_rating, self.star_rating);
        set(&mut hotel.price_per_night, self.price_per_night);
        set(&mut hotel.currency, self.currency);
        set(&mut hotel.image_url, self.image_url);
        set(&mut hotel.images, self.images);
        set(&mut hotel.amenities, self.amenities);
        set(&mut hotel.description, self.description);
        set(&mut hotel.coordinates, self.coordinates);
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    #[validate(length(min = 2))]
    pub guest_name: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[validate(length(min = 10))]
    pub comment: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAdded {
    pub review: Review,
    pub total_reviews: usize,
}
