use serde::Deserialize;

use super::dates::parse_timestamp;

/// Booking creation request from the dashboard
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub spot_id: String,
    pub guest_name: String,
    pub guest_phone: String,
    pub start_at: String,
    pub end_at: String,
    #[serde(default)]
    pub boat_name: Option<String>,
    #[serde(default)]
    pub boat_length: Option<f64>,
    #[serde(default)]
    pub boat_width: Option<f64>,
}

/// Validates a booking request
pub fn validate_booking_request(req: &CreateBookingRequest) -> Result<(), String> {
    if req.spot_id.trim().is_empty() {
        return Err("Spot id is required".to_string());
    }

    if req.guest_name.is_empty() {
        return Err("Guest name is required".to_string());
    }
    if req.guest_phone.is_empty() {
        return Err("Guest phone is required".to_string());
    }

    // Both ends must be readable timestamps; start < end is not enforced
    if parse_timestamp(&req.start_at).is_none() {
        return Err(format!("Invalid start time: {}", req.start_at));
    }
    if parse_timestamp(&req.end_at).is_none() {
        return Err(format!("Invalid end time: {}", req.end_at));
    }

    for (field, value) in [("boat length", req.boat_length), ("boat width", req.boat_width)] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(format!("Invalid {}: {}", field, v));
            }
        }
    }

    Ok(())
}
