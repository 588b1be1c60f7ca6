pub mod booking;
pub mod hotel;
