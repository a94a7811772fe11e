use super::types::{Booking, BookingStatus, PaymentStatus};

/// Reference bookings the dashboard starts from and resets to
pub fn reference_bookings() -> Vec<Booking> {
    // (id, berth, guest, phone, start, end, amount, boat, length, width, created)
    let rows = [
        ("booking-1", "12", "Erik Sørensen", "+45 23456789", "2025-10-10T10:00:00Z", "2025-10-12T16:00:00Z", 700.0, "Nordlys", 12.5, 3.8, "2025-10-03T10:00:00Z"),
        ("booking-2", "18", "Camilla Nielsen", "+45 34567890", "2025-10-11T14:00:00Z", "2025-10-14T12:00:00Z", 1050.0, "Seahawk", 15.2, 4.1, "2025-10-04T14:00:00Z"),
        ("booking-3", "25", "Mads Andersen", "+45 45678901", "2025-10-12T09:00:00Z", "2025-10-13T18:00:00Z", 350.0, "Viking Spirit", 8.5, 2.9, "2025-10-05T09:00:00Z"),
        ("booking-4", "42", "Louise Hansen", "+45 56789012", "2025-10-13T16:00:00Z", "2025-10-17T10:00:00Z", 1400.0, "Ocean Dream", 18.0, 5.2, "2025-10-06T16:00:00Z"),
        ("booking-5", "67", "Thomas Larsen", "+45 67890123", "2025-10-14T08:00:00Z", "2025-10-16T16:00:00Z", 700.0, "Stormwind", 11.0, 3.5, "2025-10-07T08:00:00Z"),
    ];

    rows.iter()
        .map(|&(id, spot, guest, phone, start, end, amount, boat, length, width, created)| Booking {
            id: id.to_string(),
            spot_id: spot.to_string(),
            guest_name: guest.to_string(),
            guest_phone: phone.to_string(),
            start_at: start.to_string(),
            end_at: end.to_string(),
            status: BookingStatus::Booked,
            payment_status: PaymentStatus::Paid,
            amount,
            boat_name: Some(boat.to_string()),
            boat_length: Some(length),
            boat_width: Some(width),
            created_at: created.to_string(),
            updated_at: created.to_string(),
        })
        .collect()
}
