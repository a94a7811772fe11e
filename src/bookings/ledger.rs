use chrono::{DateTime, Local, SecondsFormat};
use thiserror::Error;
use uuid::Uuid;

use crate::berths::Filter;

use super::dates::{nights_between, parse_timestamp};
use super::request::{validate_booking_request, CreateBookingRequest};
use super::types::{Booking, BookingStatus, BookingStatusUpdate, PaymentStatus};

/// Nightly berth price in DKK
pub const DEFAULT_NIGHTLY_RATE: f64 = 350.0;

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("{0}")]
    Invalid(String),

    #[error("Booking overlaps with existing reservation {booking_id} on berth {spot_id}")]
    Overlap { spot_id: String, booking_id: String },

    #[error("Booking not found: {0}")]
    NotFound(String),
}

/// Narrows the booking list by status and berth
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    pub status: Filter<BookingStatus>,
    pub spot_id: Filter<String>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        self.status.matches(&booking.status) && self.spot_id.matches(&booking.spot_id)
    }
}

/// The full list of bookings, in creation order
#[derive(Debug, Clone, Default)]
pub struct BookingLedger {
    bookings: Vec<Booking>,
    nightly_rate: f64,
}

impl BookingLedger {
    pub fn new(bookings: Vec<Booking>, nightly_rate: f64) -> Self {
        BookingLedger { bookings, nightly_rate }
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Bookings passing `filter`, in creation order
    pub fn find(&self, filter: &BookingFilter) -> Vec<&Booking> {
        self.bookings.iter().filter(|b| filter.matches(b)).collect()
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    /// First active booking on the same berth whose period overlaps the
    /// requested one (both ends inclusive)
    pub fn find_overlap(&self, spot_id: &str, start_at: &str, end_at: &str) -> Option<&Booking> {
        let start = parse_timestamp(start_at)?;
        let end = parse_timestamp(end_at)?;

        self.bookings.iter().find(|b| {
            if b.spot_id != spot_id || !b.status.is_active() {
                return false;
            }
            match (parse_timestamp(&b.start_at), parse_timestamp(&b.end_at)) {
                (Some(existing_start), Some(existing_end)) => {
                    existing_start <= end && existing_end >= start
                }
                _ => false,
            }
        })
    }

    /// Creates a reserved, unpaid booking priced per night
    pub fn create(&mut self, req: CreateBookingRequest, now: DateTime<Local>) -> Result<Booking, LedgerError> {
        validate_booking_request(&req).map_err(LedgerError::Invalid)?;

        if let Some(existing) = self.find_overlap(&req.spot_id, &req.start_at, &req.end_at) {
            return Err(LedgerError::Overlap {
                spot_id: req.spot_id,
                booking_id: existing.id.clone(),
            });
        }

        let nights = nights_between(&req.start_at, &req.end_at).unwrap_or(1);
        let stamp = now.to_rfc3339_opts(SecondsFormat::Secs, true);

        let booking = Booking {
            id: format!("booking-{}", Uuid::new_v4().simple()),
            spot_id: req.spot_id,
            guest_name: req.guest_name,
            guest_phone: req.guest_phone,
            start_at: req.start_at,
            end_at: req.end_at,
            status: BookingStatus::Reserved,
            payment_status: PaymentStatus::Pending,
            amount: nights as f64 * self.nightly_rate,
            boat_name: req.boat_name,
            boat_length: req.boat_length,
            boat_width: req.boat_width,
            created_at: stamp.clone(),
            updated_at: stamp,
        };

        self.bookings.push(booking.clone());
        Ok(booking)
    }

    /// Moves a booking to checked in, checked out or cancelled.
    /// Cancelled bookings stay in the ledger.
    pub fn update_status(
        &mut self,
        id: &str,
        update: BookingStatusUpdate,
        now: DateTime<Local>,
    ) -> Result<&Booking, LedgerError> {
        let booking = self
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;

        booking.status = update.into();
        booking.updated_at = now.to_rfc3339_opts(SecondsFormat::Secs, true);
        Ok(booking)
    }
}
