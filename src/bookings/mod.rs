pub mod types;
pub mod dates;
pub mod request;
pub mod ledger;
pub mod storage;
pub mod seed;

pub use types::{Booking, BookingStatus, BookingStatusUpdate, PaymentStatus};
pub use request::CreateBookingRequest;
pub use ledger::{BookingFilter, BookingLedger, LedgerError, DEFAULT_NIGHTLY_RATE};
pub use storage::{BookingStorage, StorageError};
