use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    prepare_review, run_query, seed, with_default_rooms, CatalogError, HotelCatalog, HotelQuery,
};
use crate::models::hotel::{Hotel, HotelUpdate, NewHotel, NewReview, ReviewAdded};

#[derive(Debug)]
pub struct InMemoryCatalog {
    hotels: RwLock<Vec<Hotel>>,
}

impl InMemoryCatalog {
    pub fn new(hotels: Vec<Hotel>) -> Self {
        Self {
            hotels: RwLock::new(hotels),
        }
    }

    pub fn demo() -> Self {
        Self::new(seed::demo_hotels())
    }
}

#[async_trait]
impl HotelCatalog for InMemoryCatalog {
    async fn find(&self, query: &HotelQuery) -> Result<Vec<Hotel>, CatalogError> {
        let hotels = self.hotels.read().await.clone();
        Ok(run_query(hotels, query))
    }

    async fn get(&self, id: i64) -> Result<Hotel, CatalogError> {
        self.hotels
            .read()
            .await
            .iter()
            .find(|h| h.id == id)
            .cloned()
            .map(with_default_rooms)
            .ok_or(CatalogError::NotFound)
    }

    async fn add_review(&self, hotel_id: i64, review: NewReview) -> Result<ReviewAdded, CatalogError> {
        let review = prepare_review(review)?;
        let mut hotels = self.hotels.write().await;
        let hotel = hotels
            .iter_mut()
            .find(|h| h.id == hotel_id)
            .ok_or(CatalogError::NotFound)?;

        hotel.reviews.insert(0, review.clone());
        Ok(ReviewAdded {
            review,
            total_reviews: hotel.reviews.len(),
        })
    }

    async fn create(&self, hotel: NewHotel) -> Result<Hotel, CatalogError> {
        let mut hotels = self.hotels.write().await;
        let id = hotels.iter().map(|h| h.id).max().unwrap_or(0) + 1;
        let hotel = hotel.into_hotel(id);
        hotels.push(hotel.clone());
        Ok(with_default_rooms(hotel))
    }

    async fn update(&self, id: i64, update: HotelUpdate) -> Result<Hotel, CatalogError> {
        let mut hotels = self.hotels.write().await;
        let hotel = hotels
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or(CatalogError::NotFound)?;
        update.apply(hotel);
        Ok(with_default_rooms(hotel.clone()))
    }

    async fn delete(&self, id: i64) -> Result<(), CatalogError> {
        let mut hotels = self.hotels.write().await;
        let before = hotels.len();
        hotels.retain(|h| h.id != id);
        if hotels.len() == before {
            return Err(CatalogError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_matches_location_case_insensitively() {
        let catalog = InMemoryCatalog::demo();
        let found = catalog.search(Some("  london ")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].city, "London");

        let all = catalog.search(None).await.unwrap();
        assert_eq!(all.len(), seed::demo_hotels().len());
        assert!(catalog.search(Some("Atlantis")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn featured_is_best_rated_first() {
        let catalog = InMemoryCatalog::demo();
        let featured = catalog.featured(2).await.unwrap();
        assert_eq!(featured.len(), 2);
        assert!(featured.iter().all(|h| h.star_rating == 5));
    }

    #[tokio::test]
    async fn get_fills_in_room_types() {
        let catalog = InMemoryCatalog::demo();
        let lodge = catalog.get(2).await.unwrap();
        assert_eq!(lodge.room_types.len(), 2);
        assert!(lodge.room_type("Deluxe Room").is_some());
        assert!(matches!(catalog.get(404).await, Err(CatalogError::NotFound)));
    }

    #[tokio::test]
    async fn reviews_are_prepended() {
        let catalog = InMemoryCatalog::demo();
        let added = catalog
            .add_review(
                1,
                NewReview {
                    guest_name: "Lee".into(),
                    rating: 3,
                    comment: "Decent but pricey for what it is.".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(added.total_reviews, 2);

        let hotel = catalog.get(1).await.unwrap();
        assert_eq!(hotel.reviews[0].name, "Lee");
    }

    fn new_hotel(name: &str, location: &str) -> NewHotel {
        serde_json::from_value(serde_json::json!({ "name": name, "location": location })).unwrap()
    }

    #[tokio::test]
    async fn search_reaches_past_the_first_page() {
        let mut hotels: Vec<Hotel> = (1..=59)
            .map(|id| Hotel {
                id,
                location: "Rue de Rivoli, Paris".into(),
                star_rating: 5,
                ..seed::demo_hotels().remove(0)
            })
            .collect();
        hotels.push(Hotel {
            id: 60,
            location: "Lost City, Atlantis".into(),
            star_rating: 1,
            ..seed::demo_hotels().remove(0)
        });
        let catalog = InMemoryCatalog::new(hotels);

        assert_eq!(catalog.list().await.unwrap().len(), 50);
        let found = catalog.search(Some("atlantis")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 60);
        assert_eq!(catalog.featured(55).await.unwrap().len(), 55);
    }

    #[tokio::test]
    async fn create_update_delete() {
        let catalog = InMemoryCatalog::demo();

        let created = catalog
            .create(new_hotel("Fjord View", "Bryggen, Bergen"))
            .await
            .unwrap();
        assert_eq!(created.id, 6);
        assert_eq!(created.star_rating, 3);
        assert_eq!(created.currency, "USD");
        assert_eq!(created.room_types.len(), 2);
        assert_eq!(catalog.search(Some("bergen")).await.unwrap().len(), 1);

        let updated = catalog
            .update(
                6,
                HotelUpdate {
                    star_rating: Some(4),
                    price_per_night: Some(210.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Fjord View");
        assert_eq!(updated.star_rating, 4);
        assert_eq!(updated.room_types[0].price_per_night, 210.0);

        catalog.delete(6).await.unwrap();
        assert!(matches!(catalog.get(6).await, Err(CatalogError::NotFound)));
        assert!(matches!(catalog.delete(6).await, Err(CatalogError::NotFound)));
        assert!(matches!(
            catalog.update(6, HotelUpdate::default()).await,
            Err(CatalogError::NotFound)
        ));
    }
}
