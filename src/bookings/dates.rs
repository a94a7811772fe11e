use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Parses a booking timestamp into harbor-local time.
/// Accepts RFC 3339 ("2025-10-10T10:00:00Z"), a zone-less local date-time
/// ("2025-10-10T10:00" or with seconds) and a bare date ("2025-10-10",
/// taken as local midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    Local.from_local_datetime(&naive).earliest()
}

/// Calendar day of a timestamp in harbor-local time
pub fn local_day(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|dt| dt.date_naive())
}

/// Whether `day` lies within the booked days, both ends inclusive.
/// The start is floored and the end ceiled to whole days.
pub fn covers_day(start_at: &str, end_at: &str, day: NaiveDate) -> bool {
    match (local_day(start_at), local_day(end_at)) {
        (Some(start), Some(end)) => start <= day && day <= end,
        _ => false,
    }
}

/// Number of nights charged for a stay, never less than one
pub fn nights_between(start_at: &str, end_at: &str) -> Option<i64> {
    let start = local_day(start_at)?;
    let end = local_day(end_at)?;
    Some((end - start).num_days().max(1))
}

/// Today's calendar date in harbor-local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_formats() {
        assert!(parse_timestamp("2025-10-10T10:00:00Z").is_some());
        assert!(parse_timestamp("2025-10-10T10:00:00+02:00").is_some());
        assert!(parse_timestamp("2025-10-10T10:00").is_some());
        assert!(parse_timestamp("2025-10-10T10:00:30").is_some());
        assert_eq!(
            local_day("2025-10-10"),
            NaiveDate::from_ymd_opt(2025, 10, 10)
        );
        assert!(parse_timestamp("tomorrow").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn coverage_is_inclusive_of_whole_days() {
        let day = |d| NaiveDate::from_ymd_opt(2025, 10, d).unwrap();
        assert!(covers_day("2025-10-10T23:00", "2025-10-12T01:00", day(10)));
        assert!(covers_day("2025-10-10T23:00", "2025-10-12T01:00", day(12)));
        assert!(!covers_day("2025-10-10T23:00", "2025-10-12T01:00", day(13)));
        assert!(!covers_day("2025-10-10T23:00", "2025-10-12T01:00", day(9)));
        assert!(!covers_day("garbage", "2025-10-12T01:00", day(10)));
    }

    #[test]
    fn nights_are_calendar_days_with_a_minimum_of_one() {
        assert_eq!(nights_between("2025-10-10T10:00", "2025-10-12T16:00"), Some(2));
        assert_eq!(nights_between("2025-10-13T16:00", "2025-10-17T10:00"), Some(4));
        assert_eq!(nights_between("2025-10-13T08:00", "2025-10-13T18:00"), Some(1));
        assert_eq!(nights_between("2025-10-13", "nope"), None);
    }
}
