use std::path::Path;

use serde::Serialize;

use crate::berths::{Berth, BerthStatus, Pier};

/// One row of the exported layout
#[derive(Debug, Serialize)]
struct LayoutRow<'a> {
    id: &'a str,
    pier: Pier,
    lat: f64,
    lng: f64,
    status: BerthStatus,
    end_date: &'a str,
}

/// Short status marker used in the console layout
fn status_marker(status: BerthStatus) -> &'static str {
    match status {
        BerthStatus::Available => "ledig",
        BerthStatus::Occupied => "optaget",
        BerthStatus::Booked => "booket",
    }
}

/// Prints every pier with its berths in numbering order
pub fn print_berth_layout(title: &str, berths: &[Berth]) {
    println!("\n=== {} ===", title);
    println!("Total berths: {}", berths.len());

    for pier in Pier::ALL {
        let mut on_pier: Vec<&Berth> = berths.iter().filter(|b| b.pier == pier).collect();
        if on_pier.is_empty() {
            continue;
        }
        on_pier.sort_by_key(|b| b.number().unwrap_or(u32::MAX));

        let available = on_pier
            .iter()
            .filter(|b| b.effective_status() == BerthStatus::Available)
            .count();
        println!("\n{} ({} berths, {} available):", pier, on_pier.len(), available);

        for berth in on_pier {
            let pos = berth.position();
            match berth.effective_end_date() {
                Some(end) => println!(
                    "  {:>8} ({:.6}, {:.6}) -> {} until {}",
                    berth.id, pos.lat, pos.lng, status_marker(berth.effective_status()), end
                ),
                None => println!(
                    "  {:>8} ({:.6}, {:.6}) -> {}",
                    berth.id, pos.lat, pos.lng, status_marker(berth.effective_status())
                ),
            }
        }
    }
}

/// Writes the layout as CSV: id, pier, lat, lng, status, end_date
pub fn write_layout_to_csv<P: AsRef<Path>>(berths: &[Berth], path: P) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_path(path)?;

    for berth in berths {
        let pos = berth.position();
        writer.serialize(LayoutRow {
            id: &berth.id,
            pier: berth.pier,
            lat: pos.lat,
            lng: pos.lng,
            status: berth.effective_status(),
            end_date: berth.effective_end_date().unwrap_or(""),
        })?;
    }

    writer.flush()?;
    Ok(())
}
