use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::berths::{Berth, BerthStatus, Filter};
use crate::bookings::dates::{local_day, parse_timestamp};
use crate::bookings::{Booking, BookingStatus, PaymentStatus};

/// Headline numbers for the harbor dashboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarborKpis {
    pub available_spots: u32,
    pub guests_in_harbor: u32,
    pub bookings_today: u32,
    pub revenue_today: f64,
}

/// Computes the KPIs from the currently visible berths and all bookings
pub fn harbor_kpis(visible: &[&Berth], bookings: &[Booking], now: DateTime<Local>) -> HarborKpis {
    let available_spots = visible
        .iter()
        .filter(|b| b.effective_status() == BerthStatus::Available)
        .count() as u32;

    // Checked in and inside the booked period right now
    let guests_in_harbor = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::CheckedIn)
        .filter(|b| {
            match (parse_timestamp(&b.start_at), parse_timestamp(&b.end_at)) {
                (Some(start), Some(end)) => start <= now && now <= end,
                _ => false,
            }
        })
        .count() as u32;

    let today = now.date_naive();
    let created_today: Vec<&Booking> = bookings
        .iter()
        .filter(|b| local_day(&b.created_at) == Some(today))
        .collect();

    let revenue_today = created_today
        .iter()
        .filter(|b| b.status != BookingStatus::Cancelled && b.payment_status != PaymentStatus::Refunded)
        .map(|b| b.amount)
        .sum();

    HarborKpis {
        available_spots,
        guests_in_harbor,
        bookings_today: created_today.len() as u32,
        revenue_today,
    }
}

/// Reporting period for booking statistics, counted by creation date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsWindow {
    Day,
    #[default]
    Month,
    Year,
}

impl StatsWindow {
    /// First calendar day inside the window
    pub fn start(&self, today: NaiveDate) -> NaiveDate {
        match self {
            StatsWindow::Day => today,
            StatsWindow::Month => today.with_day(1).unwrap_or(today),
            StatsWindow::Year => today.with_ordinal(1).unwrap_or(today),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BerthPerformance {
    pub berth_id: String,
    pub bookings: u32,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingStats {
    pub window: StatsWindow,
    pub total_bookings: u32,
    pub total_revenue: f64,
    pub average_revenue: f64,
    /// Best earning berth first
    pub berths: Vec<BerthPerformance>,
}

fn by_berth_number(a: &str, b: &str) -> Ordering {
    match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// Booking count and revenue for bookings created inside `window`,
/// optionally for a single berth
pub fn booking_stats(
    bookings: &[Booking],
    window: StatsWindow,
    berth: &Filter<String>,
    now: DateTime<Local>,
) -> BookingStats {
    let start = window.start(now.date_naive());

    let in_window: Vec<&Booking> = bookings
        .iter()
        .filter(|b| berth.matches(&b.spot_id))
        .filter(|b| matches!(local_day(&b.created_at), Some(day) if day >= start))
        .collect();

    let mut per_berth: BTreeMap<&str, BerthPerformance> = BTreeMap::new();
    for booking in &in_window {
        let entry = per_berth
            .entry(booking.spot_id.as_str())
            .or_insert_with(|| BerthPerformance {
                berth_id: booking.spot_id.clone(),
                bookings: 0,
                revenue: 0.0,
            });
        entry.bookings += 1;
        entry.revenue += booking.amount;
    }

    let mut berths: Vec<BerthPerformance> = per_berth.into_values().collect();
    berths.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| by_berth_number(&a.berth_id, &b.berth_id))
    });

    let total_bookings = in_window.len() as u32;
    let total_revenue: f64 = in_window.iter().map(|b| b.amount).sum();
    let average_revenue = if total_bookings > 0 {
        total_revenue / total_bookings as f64
    } else {
        0.0
    };

    BookingStats {
        window,
        total_bookings,
        total_revenue,
        average_revenue,
        berths,
    }
}

/// Every berth that has at least one booking, in berth number order
pub fn booked_berth_ids(bookings: &[Booking]) -> Vec<String> {
    let mut ids: Vec<String> = bookings.iter().map(|b| b.spot_id.clone()).collect();
    ids.sort_by(|a, b| by_berth_number(a, b));
    ids.dedup();
    ids
}
