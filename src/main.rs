mod berths;
mod bookings;
mod display;
mod error;
mod logger;
mod overview;
mod realtime;
mod settings;
mod web;

use berths::layout::expected_berth_count;
use berths::reconcile::reconcile_now;
use berths::{generate_all_berths, generate_legacy_layout};
use bookings::BookingStorage;
use display::{print_berth_layout, write_layout_to_csv};
use settings::Settings;

const DEFAULT_LEGACY_SEED: u64 = 42;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Settings::new()?;
    logger::init_logger(&settings.log_level);

    settings.fall_back_to_mock();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("web") => {
            if let Some(port) = args.get(2).and_then(|p| p.parse::<u16>().ok()) {
                settings.api.port = port;
            }
            println!("Access the dashboard API at http://localhost:{}/api/admin/berths", settings.api.port);

            web::start_server(settings).await?;
        }
        Some("legacy") => {
            let seed = args
                .get(2)
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_LEGACY_SEED);
            let berths = generate_legacy_layout(seed);
            print_berth_layout(&format!("Legacy layout (seed {})", seed), &berths);
        }
        _ => {
            let storage = BookingStorage::new(&settings.storage.bookings_path);
            let bookings = storage.load();
            println!("Loaded {} bookings from {}", bookings.len(), storage.path().display());

            let berths = reconcile_now(&generate_all_berths(), &bookings);
            tracing::debug!(berths = berths.len(), expected = expected_berth_count(), "layout generated");
            print_berth_layout("Rungsted Havn", &berths);

            println!("\n=== Writing Layout ===");
            write_layout_to_csv(&berths, "berths.csv")?;
            println!("Layout saved to berths.csv");
        }
    }

    Ok(())
}
