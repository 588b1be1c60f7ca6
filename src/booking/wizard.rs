//! Three-step booking flow: review the stay, collect guest details, confirm.
//!
//! A [`BookingWizard`] owns its draft exclusively. Transitions that are not
//! allowed from the current step fail with [`WizardError`] and leave the
//! wizard untouched, so every failure can be retried from the same step.
//!
//! Submitting is split in two halves so callers can release any lock on the
//! wizard while the store round trip is in flight: [`BookingWizard::begin_submit`]
//! validates and snapshots the draft, [`BookingWizard::finish_submit`] applies
//! the store's answer. While a submission is outstanding a second one is refused.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::booking::pricing::{compute_stay, PriceBreakdown, PricingError};
use crate::booking::validation::{validate_guest_info, GuestField, GuestInfoErrors};
use crate::models::booking::{BookingConfirmation, GuestInfo, NewBooking, StayDetails};
use crate::models::hotel::{Hotel, HotelSnapshot, RoomType};
use crate::store::{BookingStore, StoreError};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    Details,
    GuestInfo,
    Success,
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Please select a room type")]
    NoRoomSelected,
    #[error("Please select check-in and check-out dates")]
    MissingDates,
    #[error("Room type '{0}' is not offered by this hotel")]
    UnknownRoomType(String),
    #[error("Rooms and guests must both be at least 1")]
    InvalidOccupancy,
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error("Please fill in all required fields correctly")]
    InvalidGuestInfo(GuestInfoErrors),
    #[error("Cannot {action} while on the {step:?} step")]
    WrongStep {
        action: &'static str,
        step: WizardStep,
    },
    #[error("A booking submission is already in progress")]
    SubmissionInProgress,
    #[error("Failed to process booking. Please try again.")]
    Store(#[source] StoreError),
    #[error("Booking session not found or already closed")]
    Closed,
}

/// Partial change to the stay parameters. Absent fields are left alone.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StayUpdate {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub rooms: Option<u32>,
    pub guests: Option<u32>,
    pub room_type: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StaySelection {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub rooms: u32,
    pub guests: u32,
    pub room: Option<RoomType>,
}

impl Default for StaySelection {
    fn default() -> Self {
        Self {
            check_in: None,
            check_out: None,
            rooms: 1,
            guests: 1,
            room: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardExit {
    Cancelled,
    /// Caller should send the guest on to the receipt for this booking.
    Confirmed { confirmation_number: String },
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookingWizard {
    step: WizardStep,
    hotel: HotelSnapshot,
    room_types: Vec<RoomType>,
    stay: StaySelection,
    guest: GuestInfo,
    errors: GuestInfoErrors,
    submitting: bool,
    confirmation: Option<BookingConfirmation>,
}

impl BookingWizard {
    pub fn open(hotel: &Hotel, initial: StayUpdate) -> Result<Self, WizardError> {
        let mut wizard = Self {
            step: WizardStep::Details,
            hotel: hotel.snapshot(),
            room_types: hotel.room_types.clone(),
            stay: StaySelection::default(),
            guest: GuestInfo::default(),
            errors: GuestInfoErrors::new(),
            submitting: false,
            confirmation: None,
        };
        wizard.update_stay(initial)?;
        Ok(wizard)
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn hotel(&self) -> &HotelSnapshot {
        &self.hotel
    }

    pub fn stay(&self) -> &StaySelection {
        &self.stay
    }

    pub fn guest(&self) -> &GuestInfo {
        &self.guest
    }

    pub fn errors(&self) -> &GuestInfoErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn confirmation(&self) -> Option<&BookingConfirmation> {
        self.confirmation.as_ref()
    }

    fn require(&self, step: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.step == step {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                action,
                step: self.step,
            })
        }
    }

    /// Applied atomically: on error nothing changes.
    pub fn update_stay(&mut self, update: StayUpdate) -> Result<(), WizardError> {
        self.require(WizardStep::Details, "change the stay")?;

        let mut next = self.stay.clone();
        if let Some(name) = update.room_type {
            let room = self
                .room_types
                .iter()
                .find(|room| room.name == name)
                .ok_or(WizardError::UnknownRoomType(name))?;
            next.room = Some(room.clone());
        }
        if let Some(check_in) = update.check_in {
            next.check_in = Some(check_in);
        }
        if let Some(check_out) = update.check_out {
            next.check_out = Some(check_out);
        }
        if let Some(rooms) = update.rooms {
            next.rooms = rooms;
        }
        if let Some(guests) = update.guests {
            next.guests = guests;
        }
        if next.rooms == 0 || next.guests == 0 {
            return Err(WizardError::InvalidOccupancy);
        }

        self.stay = next;
        Ok(())
    }

    /// Current price for the selected room and dates.
    pub fn quote(&self) -> Result<PriceBreakdown, WizardError> {
        let room = self.stay.room.as_ref().ok_or(WizardError::NoRoomSelected)?;
        let (Some(check_in), Some(check_out)) = (self.stay.check_in, self.stay.check_out) else {
            return Err(WizardError::MissingDates);
        };
        let quote = compute_stay(room.price_per_night, check_in, check_out, self.stay.rooms)?;
        Ok(quote.into())
    }

    pub fn proceed(&mut self) -> Result<(), WizardError> {
        self.require(WizardStep::Details, "continue to guest details")?;
        self.quote()?;
        self.step = WizardStep::GuestInfo;
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), WizardError> {
        self.require(WizardStep::GuestInfo, "go back")?;
        if self.submitting {
            return Err(WizardError::SubmissionInProgress);
        }
        self.step = WizardStep::Details;
        Ok(())
    }

    /// Editing a field clears the error shown next to it.
    pub fn set_guest_field(&mut self, field: GuestField, value: String) -> Result<(), WizardError> {
        self.require(WizardStep::GuestInfo, "edit guest details")?;
        if self.submitting {
            return Err(WizardError::SubmissionInProgress);
        }
        *field.value_mut(&mut self.guest) = value;
        self.errors.remove(&field);
        Ok(())
    }

    pub fn begin_submit(&mut self) -> Result<NewBooking, WizardError> {
        self.require(WizardStep::GuestInfo, "submit")?;
        if self.submitting {
            return Err(WizardError::SubmissionInProgress);
        }

        let validation = validate_guest_info(&self.guest);
        self.errors = validation.errors.clone();
        if !validation.valid {
            return Err(WizardError::InvalidGuestInfo(validation.errors));
        }

        let price = self.quote()?;
        let (Some(room), Some(check_in), Some(check_out)) =
            (self.stay.room.clone(), self.stay.check_in, self.stay.check_out)
        else {
            return Err(WizardError::MissingDates);
        };

        self.submitting = true;
        Ok(NewBooking {
            hotel: self.hotel.clone(),
            stay: StayDetails {
                check_in,
                check_out,
                rooms: self.stay.rooms,
                guests: self.stay.guests,
                room,
            },
            guest: self.guest.clone(),
            price,
        })
    }

    pub fn finish_submit(
        &mut self,
        outcome: Result<BookingConfirmation, StoreError>,
    ) -> Result<&BookingConfirmation, WizardError> {
        self.submitting = false;
        let confirmation = outcome.map_err(WizardError::Store)?;
        self.step = WizardStep::Success;
        Ok(self.confirmation.insert(confirmation))
    }

    pub async fn submit(
        &mut self,
        store: &dyn BookingStore,
    ) -> Result<&BookingConfirmation, WizardError> {
        let draft = self.begin_submit()?;
        let outcome = store.create(draft).await;
        if let Err(e) = &outcome {
            log::error!("Booking error for hotel {}: {e}", self.hotel.id);
        }
        self.finish_submit(outcome)
    }

    pub fn close(self) -> WizardExit {
        match (self.step, self.confirmation) {
            (WizardStep::Success, Some(confirmation)) => WizardExit::Confirmed {
                confirmation_number: confirmation.confirmation_number,
            },
            _ => WizardExit::Cancelled,
        }
    }
}
