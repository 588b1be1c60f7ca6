use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::booking::validation::GuestField;
use crate::booking::{BookingWizard, StayUpdate, WizardExit};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenWizard {
    pub hotel_id: i64,
    #[serde(flatten)]
    pub stay: StayUpdate,
}

#[derive(Deserialize)]
pub struct GuestFieldChange {
    pub field: GuestField,
    pub value: String,
}

pub async fn open_wizard(
    state: web::Data<AppState>,
    body: web::Json<OpenWizard>,
) -> Result<HttpResponse, AppError> {
    let OpenWizard { hotel_id, stay } = body.into_inner();
    let hotel = state.catalog.get(hotel_id).await?;
    let wizard = BookingWizard::open(&hotel, stay)?;
    Ok(HttpResponse::Created().json(state.wizards.insert(wizard).await))
}

pub async fn get_wizard(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.wizards.view(*path).await?))
}

pub async fn update_stay(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<StayUpdate>,
) -> Result<HttpResponse, AppError> {
    let update = body.into_inner();
    let view = state
        .wizards
        .update(*path, |wizard| wizard.update_stay(update))
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

pub async fn proceed(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let view = state
        .wizards
        .update(*path, |wizard| wizard.proceed())
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

pub async fn back(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let view = state.wizards.update(*path, |wizard| wizard.back()).await?;
    Ok(HttpResponse::Ok().json(view))
}

pub async fn set_guest_field(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<GuestFieldChange>,
) -> Result<HttpResponse, AppError> {
    let GuestFieldChange { field, value } = body.into_inner();
    let view = state
        .wizards
        .update(*path, |wizard| wizard.set_guest_field(field, value))
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

pub async fn submit(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let view = state
        .wizards
        .submit(*path, state.bookings.as_ref())
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

pub async fn close(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let body = match state.wizards.close(*path).await? {
        WizardExit::Cancelled => serde_json::json!({ "status": "cancelled" }),
        WizardExit::Confirmed {
            confirmation_number,
        } => {
            let booking_url = format!("/bookings/{confirmation_number}");
            serde_json::json!({
                "status": "confirmed",
                "confirmationNumber": confirmation_number,
                "bookingUrl": booking_url,
            })
        }
    };
    Ok(HttpResponse::Ok().json(body))
}
