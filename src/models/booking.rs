use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::booking::pricing::PriceBreakdown;
use crate::models::hotel::{HotelSnapshot, RoomType};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown booking status '{other}'")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GuestInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub special_requests: String,
}

impl GuestInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StayDetails {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub rooms: u32,
    pub guests: u32,
    pub room: RoomType,
}

/// Everything the store needs to persist a booking. Built from a finished draft.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub hotel: HotelSnapshot,
    pub stay: StayDetails,
    pub guest: GuestInfo,
    pub price: PriceBreakdown,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedBooking {
    pub id: i64,
    pub confirmation_number: String,
    pub hotel: HotelSnapshot,
    pub stay: StayDetails,
    pub guest: GuestInfo,
    pub price: PriceBreakdown,
    pub status: BookingStatus,
    pub booking_date: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ConfirmedBooking {
    pub fn confirmation(&self) -> BookingConfirmation {
        BookingConfirmation {
            confirmation_number: self.confirmation_number.clone(),
            booking_id: self.id,
            status: self.status,
            booking_date: self.booking_date,
        }
    }
}

/// What the store hands back from a create.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub confirmation_number: String,
    pub booking_id: i64,
    pub status: BookingStatus,
    pub booking_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdate {
    pub guest: Option<GuestInfo>,
    pub special_requests: Option<String>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Default)]
pub struct BookingStats {
    pub total: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    pub revenue: f64,
}

impl BookingStats {
    pub fn from_bookings<'a>(bookings: impl IntoIterator<Item = &'a ConfirmedBooking>) -> Self {
        bookings
            .into_iter()
            .fold(BookingStats::default(), |mut stats, booking| {
                stats.total += 1;
                match booking.status {
                    BookingStatus::Confirmed => {
                        stats.confirmed += 1;
                        stats.revenue += booking.price.total_price;
                    }
                    BookingStatus::Cancelled => stats.cancelled += 1,
                }
                stats
            })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    pub hotel_id: i64,
    #[validate(length(min = 1))]
    pub room_type: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1))]
    pub rooms: u32,
    #[validate(range(min = 1))]
    pub guests: u32,
    pub guest: GuestInfo,
}

#[derive(Debug, Deserialize)]
pub struct BookingsByEmail {
    pub email: Option<String>,
}
