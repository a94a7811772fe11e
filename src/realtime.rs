//! Simulated live activity for the mock dashboard.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::overview::HarborKpis;

/// Chance per tick that the activity timestamp is refreshed
pub const TOUCH_PROBABILITY: f64 = 0.1;
/// Chance per tick that the available counter moves by one
pub const NUDGE_PROBABILITY: f64 = 0.2;

#[derive(Debug, Clone, Serialize)]
pub struct LiveFeed {
    pub kpis: HarborKpis,
    pub last_activity: Option<DateTime<Local>>,
    pub ticks: u64,
}

impl Default for LiveFeed {
    fn default() -> Self {
        LiveFeed {
            kpis: HarborKpis {
                available_spots: 4,
                guests_in_harbor: 2,
                bookings_today: 1,
                revenue_today: 2500.0,
            },
            last_activity: None,
            ticks: 0,
        }
    }
}

/// Advances the simulation by one tick
pub fn tick<R: Rng>(feed: &mut LiveFeed, rng: &mut R, now: DateTime<Local>) {
    feed.ticks += 1;

    if rng.gen_bool(TOUCH_PROBABILITY) {
        feed.last_activity = Some(now);
    }

    if rng.gen_bool(NUDGE_PROBABILITY) {
        let spots = &mut feed.kpis.available_spots;
        *spots = if rng.gen_bool(0.5) {
            spots.saturating_add(1)
        } else {
            spots.saturating_sub(1)
        };
    }
}

/// Drives `tick` on a fixed interval until the returned handle is aborted
pub fn spawn_ticker(feed: Arc<Mutex<LiveFeed>>, every: Duration, seed: Option<u64>) -> JoinHandle<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            let mut feed = feed.lock();
            tick(&mut feed, &mut rng, Local::now());
            tracing::trace!(ticks = feed.ticks, available = feed.kpis.available_spots, "realtime tick");
        }
    })
}
