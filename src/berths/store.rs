use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::bookings::dates::today;
use crate::bookings::seed::reference_bookings;
use crate::bookings::Booking;
use super::layout::generate_all_berths;
use super::reconcile::reconcile;
use super::types::{Berth, BerthStatus, Filter, Pier, StatusOverride};

/// Filters applied to the berth list on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BerthFilters {
    #[serde(default)]
    pub selected_pier: Filter<Pier>,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub status_filter: Filter<BerthStatus>,
}

impl BerthFilters {
    pub fn matches(&self, berth: &Berth) -> bool {
        berth.is_on_map()
            && self.selected_pier.matches(&berth.pier)
            && self.status_filter.matches(&berth.effective_status())
            && self.matches_search(&berth.id)
    }

    fn matches_search(&self, id: &str) -> bool {
        if self.search_query.trim().is_empty() {
            return true;
        }
        id.to_lowercase().contains(&self.search_query.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BerthState {
    pub berths: Vec<Berth>,
    pub filters: BerthFilters,
    /// Day the booking-derived statuses were last computed for
    pub reconciled_on: NaiveDate,
}

impl BerthState {
    /// Fresh layout reconciled against `bookings`, no overrides, no filters
    pub fn initial(bookings: &[Booking], today: NaiveDate) -> Self {
        BerthState {
            berths: reconcile(&generate_all_berths(), bookings, today),
            filters: BerthFilters::default(),
            reconciled_on: today,
        }
    }

    /// Whether the booking-derived statuses belong to an earlier (or later) day
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.reconciled_on != today
    }

    /// Berths passing the current filters, in stored order
    pub fn visible_berths(&self) -> Vec<&Berth> {
        self.berths.iter().filter(|b| self.filters.matches(b)).collect()
    }

    pub fn berth_by_id(&self, id: &str) -> Option<&Berth> {
        self.berths.iter().find(|b| b.id == id)
    }
}

/// Every way the berth state can change
#[derive(Debug, Clone)]
pub enum BerthAction<'a> {
    SetBerthStatus {
        id: &'a str,
        status: BerthStatus,
        end_date: Option<String>,
    },
    ClearOverride {
        id: &'a str,
    },
    SetPierStatus {
        pier: Pier,
        status: BerthStatus,
    },
    SetAllVisibleStatus {
        status: BerthStatus,
    },
    SetSelectedPier(Filter<Pier>),
    SetSearchQuery(String),
    SetStatusFilter(Filter<BerthStatus>),
    Reset {
        today: NaiveDate,
    },
    ApplyBookings {
        bookings: &'a [Booking],
        today: NaiveDate,
    },
}

/// Applies one action to the state and returns the new state
pub fn reduce(mut state: BerthState, action: BerthAction<'_>) -> BerthState {
    match action {
        BerthAction::SetBerthStatus { id, status, end_date } => {
            if let Some(berth) = state.berths.iter_mut().find(|b| b.id == id) {
                berth.manual_override = Some(StatusOverride { status, end_date });
            }
        }
        BerthAction::ClearOverride { id } => {
            if let Some(berth) = state.berths.iter_mut().find(|b| b.id == id) {
                berth.manual_override = None;
            }
        }
        BerthAction::SetPierStatus { pier, status } => {
            for berth in state.berths.iter_mut().filter(|b| b.pier == pier) {
                override_keeping_end_date(berth, status);
            }
        }
        BerthAction::SetAllVisibleStatus { status } => {
            // Resolve the visible set once, before anything is written
            let visible: HashSet<String> = state
                .visible_berths()
                .into_iter()
                .map(|b| b.id.clone())
                .collect();

            for berth in state.berths.iter_mut().filter(|b| visible.contains(&b.id)) {
                override_keeping_end_date(berth, status);
            }
        }
        BerthAction::SetSelectedPier(pier) => state.filters.selected_pier = pier,
        BerthAction::SetSearchQuery(query) => state.filters.search_query = query,
        BerthAction::SetStatusFilter(status) => state.filters.status_filter = status,
        BerthAction::Reset { today } => {
            state = BerthState::initial(&reference_bookings(), today);
        }
        BerthAction::ApplyBookings { bookings, today } => {
            let overrides: HashMap<String, StatusOverride> = state
                .berths
                .drain(..)
                .filter_map(|b| b.manual_override.map(|o| (b.id, o)))
                .collect();

            // Manual overrides survive reconciliation until cleared
            let mut fresh = generate_all_berths();
            for berth in fresh.iter_mut() {
                berth.manual_override = overrides.get(&berth.id).cloned();
            }
            state.berths = reconcile(&fresh, bookings, today);
            state.reconciled_on = today;
        }
    }
    state
}

fn override_keeping_end_date(berth: &mut Berth, status: BerthStatus) {
    let end_date = berth.effective_end_date().map(str::to_string);
    berth.manual_override = Some(StatusOverride { status, end_date });
}

/// Owner of the berth state; each method dispatches one action through `reduce`
#[derive(Debug, Clone)]
pub struct BerthStore {
    state: BerthState,
}

impl Default for BerthStore {
    fn default() -> Self {
        BerthStore::new(&reference_bookings())
    }
}

impl BerthStore {
    pub fn new(bookings: &[Booking]) -> Self {
        BerthStore::new_on(bookings, today())
    }

    pub fn new_on(bookings: &[Booking], day: NaiveDate) -> Self {
        BerthStore {
            state: BerthState::initial(bookings, day),
        }
    }

    pub fn state(&self) -> &BerthState {
        &self.state
    }

    pub fn dispatch(&mut self, action: BerthAction<'_>) {
        let placeholder = BerthState {
            berths: Vec::new(),
            filters: BerthFilters::default(),
            reconciled_on: self.state.reconciled_on,
        };
        let state = std::mem::replace(&mut self.state, placeholder);
        self.state = reduce(state, action);
    }

    pub fn set_berth_status(&mut self, id: &str, status: BerthStatus, end_date: Option<String>) {
        self.dispatch(BerthAction::SetBerthStatus { id, status, end_date });
    }

    pub fn clear_override(&mut self, id: &str) {
        self.dispatch(BerthAction::ClearOverride { id });
    }

    pub fn set_pier_status(&mut self, pier: Pier, status: BerthStatus) {
        self.dispatch(BerthAction::SetPierStatus { pier, status });
    }

    pub fn set_all_visible_status(&mut self, status: BerthStatus) {
        self.dispatch(BerthAction::SetAllVisibleStatus { status });
    }

    pub fn set_selected_pier(&mut self, pier: Filter<Pier>) {
        self.dispatch(BerthAction::SetSelectedPier(pier));
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.dispatch(BerthAction::SetSearchQuery(query.into()));
    }

    pub fn set_status_filter(&mut self, status: Filter<BerthStatus>) {
        self.dispatch(BerthAction::SetStatusFilter(status));
    }

    pub fn reset_berths(&mut self) {
        self.dispatch(BerthAction::Reset { today: today() });
    }

    pub fn update_berths_with_bookings(&mut self, bookings: &[Booking]) {
        self.dispatch(BerthAction::ApplyBookings {
            bookings,
            today: today(),
        });
    }

    /// Re-applies `bookings` when the statuses were computed for another day.
    /// Returns whether anything was recomputed.
    pub fn refresh_for_day(&mut self, bookings: &[Booking], day: NaiveDate) -> bool {
        if !self.state.is_stale(day) {
            return false;
        }
        tracing::debug!(from = %self.state.reconciled_on, to = %day, "day changed, reconciling berths");
        self.dispatch(BerthAction::ApplyBookings { bookings, today: day });
        true
    }

    pub fn visible_berths(&self) -> Vec<&Berth> {
        self.state.visible_berths()
    }

    pub fn berth_by_id(&self, id: &str) -> Option<&Berth> {
        self.state.berth_by_id(id)
    }

    pub fn filters(&self) -> &BerthFilters {
        &self.state.filters
    }
}
