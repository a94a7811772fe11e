pub mod types;
pub mod layout;
pub mod reconcile;
pub mod store;

pub use types::{Berth, BerthStatus, Filter, Pier};
pub use layout::{generate_all_berths, generate_legacy_layout};
pub use store::{BerthFilters, BerthStore};
