//! Reading generated calendars back.

use chrono::NaiveDateTime;
use icalendar::parser::{Property, read_calendar, unfold};
use serde::Serialize;

use crate::error::{InviteError, InviteResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEventInfo {
    pub uid: String,
    pub summary: String,
    /// Wall-clock start in `tzid`
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub tzid: Option<String>,
    pub location: Option<String>,
}

/// List the events of a calendar document in file order.
pub fn inspect(ics: &str) -> InviteResult<Vec<CalendarEventInfo>> {
    let unfolded = unfold(ics);
    let calendar = read_calendar(&unfolded).map_err(|e| InviteError::IcsParse(e.to_string()))?;

    calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .map(|vevent| {
            let uid = vevent
                .find_prop("UID")
                .map(|p| unescape_text(p.val.as_ref()))
                .ok_or_else(|| InviteError::IcsParse("VEVENT without UID".into()))?;
            let start = vevent.find_prop("DTSTART");

            Ok(CalendarEventInfo {
                uid,
                summary: vevent
                    .find_prop("SUMMARY")
                    .map(|p| unescape_text(p.val.as_ref()))
                    .unwrap_or_default(),
                start: start.and_then(local_time),
                end: vevent.find_prop("DTEND").and_then(local_time),
                tzid: start.and_then(tzid),
                location: vevent
                    .find_prop("LOCATION")
                    .map(|p| unescape_text(p.val.as_ref())),
            })
        })
        .collect()
}

fn local_time(prop: &Property) -> Option<NaiveDateTime> {
    let raw = prop.val.as_ref().trim_end_matches('Z');
    NaiveDateTime::parse_from_str(raw, "%Y%m%dT%H%M%S").ok()
}

fn tzid(prop: &Property) -> Option<String> {
    prop.params
        .iter()
        .find(|p| p.key == "TZID")
        .and_then(|p| p.val.as_ref().map(|v| v.to_string()))
}

fn unescape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
