use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Flat taxes and fees added to every booking.
pub const TAXES: f64 = 42.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PricingError {
    #[error("Check-out must be after check-in ({nights} nights)")]
    NonPositiveNights { nights: i64 },
    #[error("At least one room is required")]
    NoRooms,
    #[error("Nightly rate cannot be negative")]
    NegativeRate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StayQuote {
    pub nights: i64,
    pub base_price: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub nights: i64,
    pub base_price: f64,
    pub taxes: f64,
    pub total_price: f64,
}

impl From<StayQuote> for PriceBreakdown {
    fn from(quote: StayQuote) -> Self {
        PriceBreakdown {
            nights: quote.nights,
            base_price: quote.base_price,
            taxes: TAXES,
            total_price: quote.base_price + TAXES,
        }
    }
}

/// Whole calendar days between the two dates. Negative or zero when the
/// range is empty or inverted.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days()
}

pub fn compute_stay(
    nightly_rate: f64,
    check_in: NaiveDate,
    check_out: NaiveDate,
    rooms: u32,
) -> Result<StayQuote, PricingError> {
    if rooms == 0 {
        return Err(PricingError::NoRooms);
    }
    if nightly_rate < 0.0 {
        return Err(PricingError::NegativeRate);
    }

    let nights = nights_between(check_in, check_out);
    if nights <= 0 {
        return Err(PricingError::NonPositiveNights { nights });
    }

    Ok(StayQuote {
        nights,
        base_price: nightly_rate * nights as f64 * f64::from(rooms),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn three_night_stay_totals_with_taxes() {
        let quote = compute_stay(150.0, date(2024, 3, 1), date(2024, 3, 4), 1).unwrap();
        assert_eq!(quote.nights, 3);
        assert_eq!(quote.base_price, 450.0);

        let price = PriceBreakdown::from(quote);
        assert_eq!(price.taxes, 42.0);
        assert_eq!(price.total_price, 492.0);
    }

    #[test]
    fn price_scales_with_rooms() {
        let quote = compute_stay(120.0, date(2024, 2, 27), date(2024, 3, 2), 3).unwrap();
        assert_eq!(quote.nights, 4);
        assert_eq!(quote.base_price, 1440.0);
    }

    #[test]
    fn same_day_and_inverted_ranges_are_rejected() {
        assert_eq!(
            compute_stay(100.0, date(2024, 5, 10), date(2024, 5, 10), 1),
            Err(PricingError::NonPositiveNights { nights: 0 })
        );
        assert_eq!(
            compute_stay(100.0, date(2024, 5, 10), date(2024, 5, 8), 1),
            Err(PricingError::NonPositiveNights { nights: -2 })
        );
    }

    #[test]
    fn preconditions_are_checked() {
        let (a, b) = (date(2024, 1, 1), date(2024, 1, 2));
        assert_eq!(compute_stay(100.0, a, b, 0), Err(PricingError::NoRooms));
        assert_eq!(compute_stay(-1.0, a, b, 1), Err(PricingError::NegativeRate));
        assert_eq!(compute_stay(0.0, a, b, 1).unwrap().base_price, 0.0);
    }

    #[test]
    fn quotes_are_deterministic() {
        let first = compute_stay(199.0, date(2024, 12, 30), date(2025, 1, 2), 2);
        let second = compute_stay(199.0, date(2024, 12, 30), date(2025, 1, 2), 2);
        assert_eq!(first, second);
        assert_eq!(first.unwrap().nights, 3);
    }
}
