//! Timestamp parsing and the display/calendar formats built on it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a details-document timestamp.
///
/// Timestamps carrying an offset (RFC 3339) are taken as-is. Naive
/// date-times and bare dates are read as wall-clock time in `tz`.
pub fn parse_timestamp(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    // Wall-clock times skipped by a DST gap have no mapping
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Long human format, e.g. "Wed, Dec 10, 2025, 06:30 PM".
pub fn format_local(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%a, %b %d, %Y, %I:%M %p").to_string()
}

/// Time of day only, e.g. "09:00 PM".
pub fn format_clock(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%I:%M %p").to_string()
}

/// `YYYYMMDDTHHMMSSZ`, shared by DTSTAMP and the add-to-calendar links.
pub fn utc_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

/// `YYYYMMDDTHHMMSS` wall-clock time in `tz`, for TZID-qualified properties.
pub fn local_stamp(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%Y%m%dT%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Kolkata;

    #[test]
    fn rfc3339_keeps_its_offset() {
        let at = parse_timestamp("2025-12-10T18:30:00+05:30", Kolkata).unwrap();
        assert_eq!(utc_stamp(at), "20251210T130000Z");
    }

    #[test]
    fn naive_times_use_event_zone() {
        let at = parse_timestamp("2025-12-10T18:30", Kolkata).unwrap();
        assert_eq!(utc_stamp(at), "20251210T130000Z");
        assert_eq!(local_stamp(at, Kolkata), "20251210T183000");
    }

    #[test]
    fn bare_date_is_local_midnight() {
        let at = parse_timestamp("2025-12-10", Kolkata).unwrap();
        assert_eq!(local_stamp(at, Kolkata), "20251210T000000");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_timestamp("next tuesday", Kolkata).is_none());
        assert!(parse_timestamp("", Kolkata).is_none());
    }

    #[test]
    fn display_formats() {
        let at = parse_timestamp("2025-12-10T18:30:00+05:30", Kolkata).unwrap();
        assert_eq!(format_local(at, Kolkata), "Wed, Dec 10, 2025, 06:30 PM");
        assert_eq!(format_clock(at, Kolkata), "06:30 PM");
    }
}
