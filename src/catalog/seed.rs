use chrono::NaiveDate;

use super::to_strings;
use crate::models::hotel::{Coordinates, Hotel, Review, RoomType};

fn room(name: &str, description: &str, price_per_night: f64, features: &[&str]) -> RoomType {
    RoomType {
        name: name.into(),
        description: description.into(),
        price_per_night,
        features: to_strings(features),
    }
}

fn review(name: &str, rating: u8, comment: &str, (y, m, d): (i32, u32, u32)) -> Review {
    Review {
        name: name.into(),
        rating,
        comment: comment.into(),
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
    }
}

/// Demo dataset served by the in-memory catalog and used to seed an empty
/// SQLite database.
pub fn demo_hotels() -> Vec<Hotel> {
    vec![
        Hotel {
            id: 1,
            name: "Grand Harbour Hotel".into(),
            location: "Marina District, San Francisco".into(),
            city: "San Francisco".into(),
            country: "United States".into(),
            star_rating: 5,
            price_per_night: 320.0,
            currency: "USD".into(),
            image_url: "https://images.example.com/hotels/grand-harbour.jpg".into(),
            images: to_strings(&[
                "https://images.example.com/hotels/grand-harbour.jpg",
                "https://images.example.com/hotels/grand-harbour-lobby.jpg",
            ]),
            amenities: to_strings(&[
                "Free WiFi",
                "Swimming Pool",
                "Spa & Wellness",
                "Restaurant",
                "Valet Parking",
            ]),
            description: "Waterfront luxury with bay views and a rooftop pool.".into(),
            coordinates: Coordinates {
                lat: 37.8037,
                lng: -122.4368,
            },
            room_types: vec![
                room(
                    "Harbour King",
                    "King room facing the bay",
                    320.0,
                    &["King Bed", "Bay View", "Rain Shower"],
                ),
                room(
                    "Penthouse Suite",
                    "Top floor suite with private terrace",
                    780.0,
                    &["King Bed", "Terrace", "Butler Service", "Mini Bar"],
                ),
            ],
            reviews: vec![review(
                "Maya R.",
                5,
                "Impeccable service and the pool deck is stunning.",
                (2024, 2, 11),
            )],
        },
        Hotel {
            id: 2,
            name: "Alpine Lodge Retreat".into(),
            location: "Old Town, Zermatt".into(),
            city: "Zermatt".into(),
            country: "Switzerland".into(),
            star_rating: 4,
            price_per_night: 240.0,
            currency: "USD".into(),
            image_url: "https://images.example.com/hotels/alpine-lodge.jpg".into(),
            images: to_strings(&["https://images.example.com/hotels/alpine-lodge.jpg"]),
            amenities: to_strings(&["Free WiFi", "Spa & Wellness", "Ski Storage", "Bar"]),
            description: "Timber chalet rooms a short walk from the lifts.".into(),
            coordinates: Coordinates {
                lat: 46.0207,
                lng: 7.7491,
            },
            room_types: Vec::new(),
            reviews: Vec::new(),
        },
        Hotel {
            id: 3,
            name: "Riverside Budget Inn".into(),
            location: "South Bank, London".into(),
            city: "London".into(),
            country: "United Kingdom".into(),
            star_rating: 3,
            price_per_night: 95.0,
            currency: "USD".into(),
            image_url: "https://images.example.com/hotels/riverside-inn.jpg".into(),
            images: to_strings(&["https://images.example.com/hotels/riverside-inn.jpg"]),
            amenities: to_strings(&["Free WiFi", "Air Conditioning", "Laundry Service"]),
            description: "Simple, clean rooms near the river.".into(),
            coordinates: Coordinates {
                lat: 51.5055,
                lng: -0.1160,
            },
            room_types: vec![room(
                "Double Room",
                "Compact double with river glimpses",
                95.0,
                &["Double Bed", "Free WiFi"],
            )],
            reviews: vec![review(
                "Tom K.",
                4,
                "Great value for the location, rooms are small.",
                (2023, 11, 3),
            )],
        },
        Hotel {
            id: 4,
            name: "Palm Bay Resort & Spa".into(),
            location: "Seminyak Beach, Bali".into(),
            city: "Bali".into(),
            country: "Indonesia".into(),
            star_rating: 5,
            price_per_night: 180.0,
            currency: "USD".into(),
            image_url: "https://images.example.com/hotels/palm-bay.jpg".into(),
            images: to_strings(&["https://images.example.com/hotels/palm-bay.jpg"]),
            amenities: to_strings(&[
                "Infinity Pool",
                "Spa & Wellness",
                "Fitness Center",
                "Room Service",
            ]),
            description: "Beachfront villas with private plunge pools.".into(),
            coordinates: Coordinates {
                lat: -8.6913,
                lng: 115.1571,
            },
            room_types: vec![
                room(
                    "Garden Villa",
                    "Villa set in tropical gardens",
                    180.0,
                    &["King Bed", "Plunge Pool", "Outdoor Shower"],
                ),
                room(
                    "Ocean Villa",
                    "Villa with direct beach access",
                    260.0,
                    &["King Bed", "Ocean View", "Plunge Pool"],
                ),
            ],
            reviews: Vec::new(),
        },
        Hotel {
            id: 5,
            name: "Downtown Business Hotel".into(),
            location: "Midtown, New York".into(),
            city: "New York".into(),
            country: "United States".into(),
            star_rating: 4,
            price_per_night: 150.0,
            currency: "USD".into(),
            image_url: "https://images.example.com/hotels/downtown-business.jpg".into(),
            images: to_strings(&["https://images.example.com/hotels/downtown-business.jpg"]),
            amenities: to_strings(&["Free WiFi", "Business Center", "Fitness Center", "Restaurant"]),
            description: "Practical rooms steps from the subway.".into(),
            coordinates: Coordinates {
                lat: 40.7549,
                lng: -73.9840,
            },
            room_types: vec![room(
                "Standard Room",
                "Queen room with work desk",
                150.0,
                &["Queen Bed", "Work Desk", "Free WiFi"],
            )],
            reviews: Vec::new(),
        },
    ]
}
