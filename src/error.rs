use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::booking::WizardError;
use crate::catalog::CatalogError;
use crate::store::StoreError;

#[derive(Serialize)]
struct ErrorResponse<F: Serialize> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<F>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request")]
    Validation(#[from] validator::ValidationErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error("Failed to produce receipt")]
    Receipt(#[from] std::fmt::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Catalog(e) => match e {
                CatalogError::NotFound => StatusCode::NOT_FOUND,
                CatalogError::InvalidReview(_) => StatusCode::BAD_REQUEST,
                CatalogError::Database(_) | CatalogError::Corrupt(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::Store(e) => store_status(e),
            AppError::Wizard(e) => match e {
                WizardError::NoRoomSelected
                | WizardError::MissingDates
                | WizardError::UnknownRoomType(_)
                | WizardError::InvalidOccupancy
                | WizardError::Pricing(_)
                | WizardError::InvalidGuestInfo(_) => StatusCode::UNPROCESSABLE_ENTITY,
                WizardError::WrongStep { .. } | WizardError::SubmissionInProgress => {
                    StatusCode::CONFLICT
                }
                WizardError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
                WizardError::Closed => StatusCode::NOT_FOUND,
            },
            AppError::Receipt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{self}");
        }

        match self {
            AppError::Validation(errors) => HttpResponse::build(status).json(ErrorResponse {
                error: self.to_string(),
                fields: Some(errors),
            }),
            AppError::Wizard(WizardError::InvalidGuestInfo(fields)) => {
                HttpResponse::build(status).json(ErrorResponse {
                    error: self.to_string(),
                    fields: Some(fields),
                })
            }
            _ => HttpResponse::build(status).json(ErrorResponse::<()> {
                error: self.to_string(),
                fields: None,
            }),
        }
    }
}

fn store_status(error: &StoreError) -> StatusCode {
    match error {
        StoreError::NotFound => StatusCode::NOT_FOUND,
        StoreError::AlreadyCancelled(_) | StoreError::Cancelled(_) => StatusCode::CONFLICT,
        StoreError::Unavailable(_) | StoreError::ConfirmationExhausted => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        StoreError::Database(_) | StoreError::Corrupt(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
