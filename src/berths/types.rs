use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Highest berth number shown on the harbor map
pub const MAX_MAP_BERTH: u32 = 125;

/// The eight piers of Rungsted Havn, in dashboard order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pier {
    #[serde(rename = "Bro 3")]
    Bro3,
    #[serde(rename = "Bro 5")]
    Bro5,
    #[serde(rename = "Bro 7")]
    Bro7,
    #[serde(rename = "Bro 9")]
    Bro9,
    #[serde(rename = "Bro 11")]
    Bro11,
    #[serde(rename = "Bro 4")]
    Bro4,
    #[serde(rename = "Bro 6")]
    Bro6,
    #[serde(rename = "Bro 8")]
    Bro8,
}

impl Pier {
    pub const ALL: [Pier; 8] = [
        Pier::Bro3,
        Pier::Bro5,
        Pier::Bro7,
        Pier::Bro9,
        Pier::Bro11,
        Pier::Bro4,
        Pier::Bro6,
        Pier::Bro8,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Pier::Bro3 => "Bro 3",
            Pier::Bro5 => "Bro 5",
            Pier::Bro7 => "Bro 7",
            Pier::Bro9 => "Bro 9",
            Pier::Bro11 => "Bro 11",
            Pier::Bro4 => "Bro 4",
            Pier::Bro6 => "Bro 6",
            Pier::Bro8 => "Bro 8",
        }
    }
}

impl fmt::Display for Pier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Pier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pier::ALL
            .iter()
            .find(|p| p.label() == s.trim())
            .copied()
            .ok_or_else(|| format!("Unknown pier: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BerthStatus {
    Available,
    Booked,
    Occupied,
}

impl BerthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BerthStatus::Available => "available",
            BerthStatus::Booked => "booked",
            BerthStatus::Occupied => "occupied",
        }
    }
}

impl fmt::Display for BerthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BerthStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "available" => Ok(BerthStatus::Available),
            "booked" => Ok(BerthStatus::Booked),
            "occupied" => Ok(BerthStatus::Occupied),
            other => Err(format!("Unknown berth status: {}", other)),
        }
    }
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }
}

/// Status set by an operator; wins over the booking-derived status until cleared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOverride {
    pub status: BerthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// A single mooring position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Berth {
    pub id: String,
    pub pier: Pier,
    pub lat: f64,
    pub lng: f64,
    pub status: BerthStatus, // booking-derived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_override: Option<StatusOverride>,
}

impl Berth {
    pub fn new(id: impl Into<String>, pier: Pier, position: GeoPoint) -> Self {
        Berth {
            id: id.into(),
            pier,
            lat: position.lat,
            lng: position.lng,
            status: BerthStatus::Available,
            end_date: None,
            manual_override: None,
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    pub fn effective_status(&self) -> BerthStatus {
        self.manual_override
            .as_ref()
            .map(|o| o.status)
            .unwrap_or(self.status)
    }

    pub fn effective_end_date(&self) -> Option<&str> {
        match &self.manual_override {
            Some(o) => o.end_date.as_deref(),
            None => self.end_date.as_deref(),
        }
    }

    /// Berth number when the id is purely numeric ("42" -> 42, "GAMMA" -> None)
    pub fn number(&self) -> Option<u32> {
        self.id.parse().ok()
    }

    /// Whether the berth is drawn on the harbor map (numbers 1..=125)
    pub fn is_on_map(&self) -> bool {
        matches!(self.number(), Some(n) if (1..=MAX_MAP_BERTH).contains(&n))
    }
}

/// Either "all" or a single selected value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::All
    }
}

impl<T: PartialEq> Filter<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(selected) => selected == value,
        }
    }
}

impl<T: FromStr> FromStr for Filter<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "all" {
            Ok(Filter::All)
        } else {
            s.parse().map(Filter::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str("all"),
            Filter::Only(value) => value.fmt(f),
        }
    }
}

impl<T: fmt::Display> Serialize for Filter<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T> Deserialize<'de> for Filter<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
