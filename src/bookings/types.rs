use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Reserved,
    CheckedIn,
    CheckedOut,
    Cancelled,
    Booked,
}

impl BookingStatus {
    /// Statuses that hold on to the berth for the booked period
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            BookingStatus::Reserved | BookingStatus::CheckedIn | BookingStatus::Booked
        )
    }

    /// Statuses that mark a berth as booked on the map
    pub fn marks_berth_booked(&self) -> bool {
        matches!(self, BookingStatus::Reserved | BookingStatus::Booked)
    }

    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Reserved,
        BookingStatus::CheckedIn,
        BookingStatus::CheckedOut,
        BookingStatus::Cancelled,
        BookingStatus::Booked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Reserved => "reserved",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::CheckedOut => "checked_out",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Booked => "booked",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .iter()
            .find(|status| status.as_str() == s.trim())
            .copied()
            .ok_or_else(|| format!("Unknown booking status: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

/// A guest's reservation of a berth. Timestamps are kept exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub spot_id: String,
    pub guest_name: String,
    pub guest_phone: String,
    pub start_at: String,
    pub end_at: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boat_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boat_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boat_width: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Status changes an operator can request for an existing booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatusUpdate {
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl From<BookingStatusUpdate> for BookingStatus {
    fn from(update: BookingStatusUpdate) -> Self {
        match update {
            BookingStatusUpdate::CheckedIn => BookingStatus::CheckedIn,
            BookingStatusUpdate::CheckedOut => BookingStatus::CheckedOut,
            BookingStatusUpdate::Cancelled => BookingStatus::Cancelled,
        }
    }
}
