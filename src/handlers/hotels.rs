use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::catalog::{HotelQuery, DEFAULT_FEATURED, PAGE_LIMIT};
use crate::error::AppError;
use crate::models::hotel::{HotelFilters, HotelUpdate, NewHotel, NewReview};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct HotelSearch {
    pub destination: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Comma separated, e.g. `4,5`.
    pub stars: Option<String>,
    /// Comma separated, e.g. `pool,spa`.
    pub amenities: Option<String>,
}

impl HotelSearch {
    fn filters(&self) -> Result<HotelFilters, AppError> {
        let price_range = match (self.min_price, self.max_price) {
            (None, None) => None,
            (min, max) => Some((min.unwrap_or(0.0), max.unwrap_or(f64::MAX))),
        };

        let star_ratings = split_list(self.stars.as_deref())
            .map(|s| {
                s.parse::<u8>()
                    .map_err(|_| AppError::BadRequest(format!("Invalid star rating '{s}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HotelFilters {
            price_range,
            star_ratings,
            amenities: split_list(self.amenities.as_deref()).map(String::from).collect(),
        })
    }
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[derive(Deserialize)]
pub struct FeaturedQuery {
    pub limit: Option<usize>,
}

pub async fn get_hotels(
    state: web::Data<AppState>,
    params: web::Query<HotelSearch>,
) -> Result<HttpResponse, AppError> {
    let query = HotelQuery {
        destination: params.destination.clone(),
        filters: params.filters()?,
        limit: PAGE_LIMIT,
    };
    Ok(HttpResponse::Ok().json(state.catalog.find(&query).await?))
}

pub async fn get_featured(
    state: web::Data<AppState>,
    params: web::Query<FeaturedQuery>,
) -> Result<HttpResponse, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_FEATURED);
    Ok(HttpResponse::Ok().json(state.catalog.featured(limit).await?))
}

pub async fn get_hotel_by_id(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let hotel = state.catalog.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(hotel))
}

pub async fn add_review(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<NewReview>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;
    let added = state
        .catalog
        .add_review(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(added))
}

pub async fn create_hotel(
    state: web::Data<AppState>,
    body: web::Json<NewHotel>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;
    let hotel = state.catalog.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(hotel))
}

pub async fn update_hotel(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<HotelUpdate>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;
    let hotel = state
        .catalog
        .update(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(hotel))
}

pub async fn delete_hotel(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    state.catalog.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
