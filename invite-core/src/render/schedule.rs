//! Schedule cards with map and add-to-calendar links.

use chrono_tz::Tz;
use serde::Serialize;

use crate::details::{Details, ScheduleEntry, non_empty};
use crate::time::{format_clock, format_local, parse_timestamp, utc_stamp};

const GOOGLE_CALENDAR_RENDER: &str = "https://calendar.google.com/calendar/render";
/// Where the add link points when an entry's times cannot be read.
pub const GOOGLE_CALENDAR_HOME: &str = "https://calendar.google.com/calendar/";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleCard {
    pub title: String,
    /// "Wed, Dec 10, 2025, 06:30 PM to 10:00 PM"
    pub time: String,
    /// "Location, Address", empty when neither is known
    pub place: String,
    pub notes: Option<String>,
    /// Entry map link, else the venue's
    pub map_url: Option<String>,
    pub calendar_link: String,
}

/// One card per entry that has a title, start and end, in document order.
pub fn resolve_schedule(details: &Details, tz: Tz) -> Vec<ScheduleCard> {
    let venue_map = details.venue_map_url();

    details
        .schedule
        .iter()
        .filter(|entry| entry.is_complete())
        .map(|entry| ScheduleCard {
            title: entry.title().to_string(),
            time: time_range(entry, tz),
            place: entry.place(),
            notes: non_empty(&entry.notes).map(str::to_string),
            map_url: non_empty(&entry.map_url)
                .or(venue_map)
                .map(str::to_string),
            calendar_link: google_calendar_link(entry, tz),
        })
        .collect()
}

fn time_range(entry: &ScheduleEntry, tz: Tz) -> String {
    let start = entry.start.as_deref().unwrap_or_default();
    let end = entry.end.as_deref().unwrap_or_default();

    match (parse_timestamp(start, tz), parse_timestamp(end, tz)) {
        (Some(s), Some(e)) => format!("{} to {}", format_local(s, tz), format_clock(e, tz)),
        _ => format!("{start} to {end}"),
    }
}

/// Google Calendar "create event" link with percent-encoded fields and UTC
/// `YYYYMMDDTHHMMSSZ/YYYYMMDDTHHMMSSZ` dates.
pub fn google_calendar_link(entry: &ScheduleEntry, tz: Tz) -> String {
    let start = entry.start.as_deref().and_then(|s| parse_timestamp(s, tz));
    let end = entry.end.as_deref().and_then(|s| parse_timestamp(s, tz));
    let (Some(start), Some(end)) = (start, end) else {
        return GOOGLE_CALENDAR_HOME.to_string();
    };

    let title = non_empty(&entry.title).unwrap_or("Event");
    let notes = non_empty(&entry.notes).unwrap_or_default();

    format!(
        "{GOOGLE_CALENDAR_RENDER}?action=TEMPLATE&text={}&dates={}/{}&details={}&location={}",
        urlencoding::encode(title),
        utc_stamp(start),
        utc_stamp(end),
        urlencoding::encode(notes),
        urlencoding::encode(&entry.place()),
    )
}
