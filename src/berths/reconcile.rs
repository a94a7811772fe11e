use chrono::NaiveDate;

use crate::bookings::dates::{covers_day, today};
use crate::bookings::Booking;
use super::types::{Berth, BerthStatus};

/// Recomputes berth status from the booking list for the given day.
///
/// Berths without any booking keep their status and end date. Otherwise the
/// first reserved/booked booking (in input order) whose days cover `today`
/// marks the berth booked until that booking's raw `end_at`; if there is none
/// the berth becomes available. Checked-in and checked-out bookings never
/// mark a berth booked.
///
/// Only `status` and `end_date` are recomputed; the inputs are not mutated.
pub fn reconcile(berths: &[Berth], bookings: &[Booking], today: NaiveDate) -> Vec<Berth> {
    berths
        .iter()
        .map(|berth| {
            let mut berth_bookings = bookings.iter().filter(|b| b.spot_id == berth.id).peekable();

            if berth_bookings.peek().is_none() {
                return berth.clone();
            }

            let active = berth_bookings.find(|b| {
                b.status.marks_berth_booked() && covers_day(&b.start_at, &b.end_at, today)
            });

            let mut reconciled = berth.clone();
            match active {
                Some(booking) => {
                    reconciled.status = BerthStatus::Booked;
                    reconciled.end_date = Some(booking.end_at.clone());
                }
                None => reconciled.status = BerthStatus::Available,
            }
            reconciled
        })
        .collect()
}

/// `reconcile` against the current local date
pub fn reconcile_now(berths: &[Berth], bookings: &[Booking]) -> Vec<Berth> {
    reconcile(berths, bookings, today())
}
