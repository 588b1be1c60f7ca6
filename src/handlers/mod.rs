use actix_web::{web, HttpRequest};

use crate::error::AppError;

pub mod bookings;
pub mod hotels;
pub mod wizard;

fn bad_request(err: impl std::fmt::Display, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Extractor rejections answer in the same JSON shape as handler errors.
    cfg.app_data(web::JsonConfig::default().error_handler(|err, req| bad_request(err, req)))
        .app_data(web::PathConfig::default().error_handler(|err, req| bad_request(err, req)))
        .app_data(web::QueryConfig::default().error_handler(|err, req| bad_request(err, req)));

    cfg.service(
        web::scope("/hotels")
            .route("", web::get().to(hotels::get_hotels))
            .route("", web::post().to(hotels::create_hotel))
            .route("/featured", web::get().to(hotels::get_featured))
            .route("/{id}", web::get().to(hotels::get_hotel_by_id))
            .route("/{id}", web::patch().to(hotels::update_hotel))
            .route("/{id}", web::delete().to(hotels::delete_hotel))
            .route("/{id}/reviews", web::post().to(hotels::add_review)),
    )
    .service(
        web::scope("/bookings")
            .route("", web::post().to(bookings::create_booking))
            .route("", web::get().to(bookings::list_bookings))
            .route("/stats", web::get().to(bookings::booking_stats))
            .route("/{confirmation}", web::get().to(bookings::get_booking))
            .route("/{confirmation}", web::delete().to(bookings::cancel_booking))
            .route("/{confirmation}", web::patch().to(bookings::update_booking))
            .route(
                "/{confirmation}/receipt",
                web::get().to(bookings::download_receipt),
            ),
    )
    .service(
        web::scope("/wizards")
            .route("", web::post().to(wizard::open_wizard))
            .route("/{id}", web::get().to(wizard::get_wizard))
            .route("/{id}", web::delete().to(wizard::close))
            .route("/{id}/stay", web::put().to(wizard::update_stay))
            .route("/{id}/proceed", web::post().to(wizard::proceed))
            .route("/{id}/back", web::post().to(wizard::back))
            .route("/{id}/guest", web::patch().to(wizard::set_guest_field))
            .route("/{id}/submit", web::post().to(wizard::submit)),
    );
}
