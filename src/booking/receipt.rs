use std::fmt::Write;

use crate::models::booking::ConfirmedBooking;

pub fn receipt_filename(booking: &ConfirmedBooking) -> String {
    format!("booking-confirmation-{}.txt", booking.confirmation_number)
}

/// Plain-text receipt for download.
pub fn format_receipt(booking: &ConfirmedBooking) -> Result<String, std::fmt::Error> {
    let ConfirmedBooking {
        hotel,
        stay,
        guest,
        price,
        ..
    } = booking;
    let requests = match guest.special_requests.trim() {
        "" => "None",
        text => text,
    };

    let mut out = String::new();
    writeln!(out, "BOOKING CONFIRMATION")?;
    writeln!(out, "====================")?;
    writeln!(out)?;
    writeln!(out, "Confirmation Number: {}", booking.confirmation_number)?;
    writeln!(out, "Booking Date: {}", booking.booking_date.format("%Y-%m-%d"))?;
    writeln!(out, "Status: {}", booking.status)?;
    if let Some(cancelled_at) = booking.cancelled_at {
        writeln!(out, "Cancelled On: {}", cancelled_at.format("%Y-%m-%d"))?;
    }
    writeln!(out)?;
    writeln!(out, "HOTEL DETAILS")?;
    writeln!(out, "-------------")?;
    writeln!(out, "Hotel: {}", hotel.name)?;
    writeln!(out, "Location: {}, {}", hotel.location, hotel.city)?;
    writeln!(out)?;
    writeln!(out, "GUEST DETAILS")?;
    writeln!(out, "-------------")?;
    writeln!(out, "Name: {}", guest.full_name())?;
    writeln!(out, "Email: {}", guest.email)?;
    writeln!(out, "Phone: {}", guest.phone)?;
    writeln!(out)?;
    writeln!(out, "BOOKING DETAILS")?;
    writeln!(out, "---------------")?;
    writeln!(out, "Check-in: {}", stay.check_in)?;
    writeln!(out, "Check-out: {}", stay.check_out)?;
    writeln!(out, "Nights: {}", price.nights)?;
    writeln!(out, "Room Type: {}", stay.room.name)?;
    writeln!(out, "Rooms: {}", stay.rooms)?;
    writeln!(out, "Guests: {}", stay.guests)?;
    writeln!(out)?;
    writeln!(out, "PRICE BREAKDOWN")?;
    writeln!(out, "---------------")?;
    writeln!(out, "Room Cost: ${}", price.base_price)?;
    writeln!(out, "Taxes & Fees: ${}", price.taxes)?;
    writeln!(out, "Total: ${}", price.total_price)?;
    writeln!(out)?;
    writeln!(out, "Special Requests: {requests}")?;
    writeln!(out)?;
    writeln!(out, "Thank you for choosing our service!")?;
    Ok(out)
}
