use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{Berth, BerthStatus, GeoPoint, Pier};

/// Hard-coded berths surveyed on site. The named ones double as the
/// waypoints the berth lines are drawn between.
pub const SPECIAL_BERTHS: [(&str, f64, f64); 34] = [
    ("9", 55.884361, 12.545028),
    ("1", 55.884333, 12.544833),
    ("GAMMA", 55.884278, 12.545083),
    ("DELTA", 55.884250, 12.544889),
    ("EPSILON", 55.883278, 12.545472),
    ("ZETA", 55.883306, 12.545667),
    ("ETA", 55.884444, 12.545528),
    ("THETA", 55.883417, 12.546167),
    ("IOTA", 55.884500, 12.545778),
    ("KAPPA", 55.883472, 12.546417),
    ("LAMBDA", 55.883583, 12.546917),
    ("MU", 55.884667, 12.546194),
    ("NU", 55.884722, 12.546444),
    ("XI", 55.883633, 12.547140),
    ("OMICRON", 55.883710, 12.547644),
    ("PI", 55.884808, 12.546966),
    ("RHO", 55.883748, 12.547869),
    ("SIGMA", 55.884846, 12.547185),
    ("TAU", 55.884161, 12.548340),
    ("UPSILON", 55.884197, 12.548555),
    ("PHI", 55.885042, 12.547743),
    ("CHI", 55.885088, 12.548009),
    ("PSI", 55.886164, 12.545059),
    ("OMEGA", 55.886162, 12.545248),
    ("ALPHA2", 55.886735, 12.545032),
    ("BETA2", 55.886737, 12.545273),
    ("GAMMA2", 55.886156, 12.545774),
    ("DELTA2", 55.886151, 12.545965),
    ("EPSILON2", 55.886730, 12.545758),
    ("ZETA2", 55.886728, 12.545963),
    ("ETA2", 55.886158, 12.546477),
    ("THETA2", 55.886389, 12.546692),
    ("IOTA2", 55.886594, 12.546483),
    ("KAPPA2", 55.886595, 12.546692),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Numbering {
    Forward,
    Reverse,
}

/// A straight run of evenly spaced berths between two waypoints
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub from: &'static str,
    pub to: &'static str,
    pub count: usize,
    pub first_number: u32,
    pub numbering: Numbering,
    pub pier: Pier,
}

const fn segment(
    from: &'static str,
    to: &'static str,
    count: usize,
    first_number: u32,
    numbering: Numbering,
    pier: Pier,
) -> Segment {
    Segment { from, to, count, first_number, numbering, pier }
}

pub const SEGMENTS: [Segment; 16] = [
    segment("DELTA", "EPSILON", 7, 2, Numbering::Forward, Pier::Bro3),
    segment("GAMMA", "ZETA", 8, 10, Numbering::Forward, Pier::Bro3),
    segment("ETA", "THETA", 8, 18, Numbering::Forward, Pier::Bro5),
    segment("IOTA", "KAPPA", 8, 26, Numbering::Forward, Pier::Bro5),
    segment("MU", "LAMBDA", 8, 34, Numbering::Forward, Pier::Bro7),
    segment("NU", "XI", 8, 42, Numbering::Forward, Pier::Bro7),
    segment("PI", "OMICRON", 8, 50, Numbering::Forward, Pier::Bro9),
    segment("SIGMA", "RHO", 8, 58, Numbering::Forward, Pier::Bro9),
    // 73 down to 66
    segment("TAU", "PHI", 8, 73, Numbering::Reverse, Pier::Bro11),
    segment("CHI", "UPSILON", 8, 74, Numbering::Forward, Pier::Bro11),
    segment("PSI", "ALPHA2", 8, 82, Numbering::Forward, Pier::Bro4),
    segment("OMEGA", "BETA2", 8, 90, Numbering::Forward, Pier::Bro4),
    // 105 down to 98
    segment("EPSILON2", "GAMMA2", 8, 105, Numbering::Reverse, Pier::Bro6),
    segment("DELTA2", "ZETA2", 8, 106, Numbering::Forward, Pier::Bro6),
    segment("ETA2", "IOTA2", 8, 114, Numbering::Forward, Pier::Bro8),
    segment("THETA2", "KAPPA2", 4, 122, Numbering::Forward, Pier::Bro8),
];

/// Looks up a waypoint position by its special berth id
pub fn waypoint(name: &str) -> Option<GeoPoint> {
    SPECIAL_BERTHS
        .iter()
        .find(|(id, _, _)| *id == name)
        .map(|&(_, lat, lng)| GeoPoint::new(lat, lng))
}

/// Linear interpolation between two points. Ratio 0 and 1 return the
/// endpoints exactly.
pub fn interpolate(start: GeoPoint, end: GeoPoint, ratio: f64) -> GeoPoint {
    GeoPoint::new(
        start.lat * (1.0 - ratio) + end.lat * ratio,
        start.lng * (1.0 - ratio) + end.lng * ratio,
    )
}

/// Generates `count` evenly spaced berths from `start` to `end`, numbered
/// from `first_number` up or down
pub fn line_berths(
    start: GeoPoint,
    end: GeoPoint,
    count: usize,
    first_number: u32,
    numbering: Numbering,
    pier: Pier,
) -> Vec<Berth> {
    let last_index = count.saturating_sub(1).max(1) as f64;

    (0..count)
        .map(|i| {
            let ratio = i as f64 / last_index;
            let number = match numbering {
                Numbering::Forward => first_number + i as u32,
                Numbering::Reverse => first_number - i as u32,
            };
            Berth::new(number.to_string(), pier, interpolate(start, end, ratio))
        })
        .collect()
}

fn segment_berths(segment: &Segment) -> Vec<Berth> {
    // Segment endpoints always name entries of SPECIAL_BERTHS
    let (Some(start), Some(end)) = (waypoint(segment.from), waypoint(segment.to)) else {
        return Vec::new();
    };
    line_berths(
        start,
        end,
        segment.count,
        segment.first_number,
        segment.numbering,
        segment.pier,
    )
}

/// Produces the full berth set: special berths first, then every segment in
/// configuration order. Deterministic; every berth starts out available.
pub fn generate_all_berths() -> Vec<Berth> {
    let mut berths: Vec<Berth> = SPECIAL_BERTHS
        .iter()
        .map(|&(id, lat, lng)| Berth::new(id, Pier::Bro3, GeoPoint::new(lat, lng)))
        .collect();

    for segment in &SEGMENTS {
        berths.extend(segment_berths(segment));
    }

    berths
}

/// Number of berths `generate_all_berths` yields
pub fn expected_berth_count() -> usize {
    SPECIAL_BERTHS.len() + SEGMENTS.iter().map(|s| s.count).sum::<usize>()
}

/// Straight pier line used by the legacy generator
#[derive(Debug, Clone, Copy)]
pub struct PierLine {
    pub start: GeoPoint,
    pub end: GeoPoint,
    pub berth_count: usize,
}

pub fn pier_line(pier: Pier) -> PierLine {
    let (start, end, berth_count) = match pier {
        Pier::Bro3 => ((55.8845, 12.5445), (55.8845, 12.5465), 10),
        Pier::Bro5 => ((55.8848, 12.5442), (55.8848, 12.5468), 12),
        Pier::Bro7 => ((55.8851, 12.5440), (55.8851, 12.5470), 12),
        Pier::Bro9 => ((55.8854, 12.5438), (55.8854, 12.5472), 10),
        Pier::Bro11 => ((55.8857, 12.5435), (55.8857, 12.5475), 8),
        Pier::Bro4 => ((55.8842, 12.5450), (55.8842, 12.5460), 8),
        Pier::Bro6 => ((55.8845, 12.5448), (55.8845, 12.5462), 10),
        Pier::Bro8 => ((55.8848, 12.5445), (55.8848, 12.5465), 9),
    };
    PierLine {
        start: GeoPoint::new(start.0, start.1),
        end: GeoPoint::new(end.0, end.1),
        berth_count,
    }
}

/// Maximum positional jitter of the legacy generator, in degrees either way
pub const LEGACY_JITTER: f64 = 0.00005;

/// Legacy per-pier generator: berths spread along the pier line with a small
/// random offset, 70% available and the rest occupied
pub fn generate_pier_berths<R: Rng>(pier: Pier, rng: &mut R) -> Vec<Berth> {
    let line = pier_line(pier);
    let last_index = line.berth_count.saturating_sub(1).max(1) as f64;

    (0..line.berth_count)
        .map(|i| {
            let base = interpolate(line.start, line.end, i as f64 / last_index);
            let lat = base.lat + rng.gen_range(-LEGACY_JITTER..LEGACY_JITTER);
            let lng = base.lng + rng.gen_range(-LEGACY_JITTER..LEGACY_JITTER);

            let mut berth = Berth::new(format!("{}-{}", pier, i + 1), pier, GeoPoint::new(lat, lng));
            berth.status = if rng.gen_bool(0.7) {
                BerthStatus::Available
            } else {
                BerthStatus::Occupied
            };
            berth
        })
        .collect()
}

/// Legacy layout for every pier, reproducible for a given seed
pub fn generate_legacy_layout(seed: u64) -> Vec<Berth> {
    let mut rng = StdRng::seed_from_u64(seed);
    Pier::ALL
        .iter()
        .flat_map(|&pier| generate_pier_berths(pier, &mut rng))
        .collect()
}
