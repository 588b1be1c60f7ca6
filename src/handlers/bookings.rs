use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::booking::pricing::{compute_stay, PriceBreakdown};
use crate::booking::receipt::{format_receipt, receipt_filename};
use crate::booking::validation::validate_guest_info;
use crate::booking::WizardError;
use crate::error::AppError;
use crate::models::booking::{BookingUpdate, BookingsByEmail, CreateBooking, NewBooking, StayDetails};
use crate::state::AppState;

pub async fn create_booking(
    state: web::Data<AppState>,
    body: web::Json<CreateBooking>,
) -> Result<HttpResponse, AppError> {
    // 1. Request shape
    body.validate()?;
    let body = body.into_inner();

    let validation = validate_guest_info(&body.guest);
    if !validation.valid {
        return Err(WizardError::InvalidGuestInfo(validation.errors).into());
    }

    // 2. Hotel and room
    let hotel = state.catalog.get(body.hotel_id).await?;
    let room = hotel
        .room_type(&body.room_type)
        .cloned()
        .ok_or_else(|| WizardError::UnknownRoomType(body.room_type.clone()))?;

    // 3. Price
    let quote = compute_stay(room.price_per_night, body.check_in, body.check_out, body.rooms)
        .map_err(WizardError::from)?;

    // 4. Persist
    let confirmation = state
        .bookings
        .create(NewBooking {
            hotel: hotel.snapshot(),
            stay: StayDetails {
                check_in: body.check_in,
                check_out: body.check_out,
                rooms: body.rooms,
                guests: body.guests,
                room,
            },
            guest: body.guest,
            price: PriceBreakdown::from(quote),
        })
        .await
        .map_err(WizardError::Store)?;

    log::info!(
        "Booking {} created for hotel {}",
        confirmation.confirmation_number,
        body.hotel_id
    );
    Ok(HttpResponse::Created().json(confirmation))
}

pub async fn list_bookings(
    state: web::Data<AppState>,
    params: web::Query<BookingsByEmail>,
) -> Result<HttpResponse, AppError> {
    let bookings = match params.email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => state.bookings.find_by_email(email).await?,
        _ => state.bookings.list().await?,
    };
    Ok(HttpResponse::Ok().json(bookings))
}

pub async fn booking_stats(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.bookings.stats().await?))
}

pub async fn get_booking(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let booking = state.bookings.find_by_confirmation(&path).await?;
    Ok(HttpResponse::Ok().json(booking))
}

pub async fn cancel_booking(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let booking = state.bookings.cancel(&path).await?;
    log::info!("Booking {} cancelled", booking.confirmation_number);
    Ok(HttpResponse::Ok().json(booking))
}

pub async fn update_booking(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<BookingUpdate>,
) -> Result<HttpResponse, AppError> {
    let update = body.into_inner();
    if let Some(guest) = &update.guest {
        let validation = validate_guest_info(guest);
        if !validation.valid {
            return Err(WizardError::InvalidGuestInfo(validation.errors).into());
        }
    }

    let booking = state.bookings.update(&path, update).await?;
    Ok(HttpResponse::Ok().json(booking))
}

pub async fn download_receipt(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let booking = state.bookings.find_by_confirmation(&path).await?;
    let text = format_receipt(&booking)?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(receipt_filename(&booking))],
        })
        .body(text))
}
