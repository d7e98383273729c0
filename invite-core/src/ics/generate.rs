//! Calendar document generation.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, EventLike, Property};
use tracing::warn;

use crate::details::{Details, Scalar, ScheduleEntry, non_empty};
use crate::time::{local_stamp, parse_timestamp, utc_stamp};

#[derive(Debug, Clone)]
pub struct CalendarSettings {
    /// Used in PRODID and as the UID suffix
    pub domain: String,
    /// Every event is written in this zone
    pub timezone: Tz,
}

/// Escape TEXT values: backslash first so the escapes added for newline,
/// comma and semicolon are not themselves doubled. The builder only
/// rewrites raw line breaks, so values are escaped before they reach it.
pub fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

/// The schedule as exported: the document's entries in order, followed by
/// a ceremony built from the primary event unless one is already listed.
/// The document itself is left untouched.
pub fn calendar_entries(details: &Details) -> Vec<ScheduleEntry> {
    let mut entries = details.schedule.clone();

    let Some(primary) = details.primary_event.as_ref() else {
        return entries;
    };
    let (Some(start), Some(end)) = (non_empty(&primary.start), non_empty(&primary.end)) else {
        return entries;
    };
    if entries.iter().any(ScheduleEntry::is_ceremony) {
        return entries;
    }

    let venue = details.primary_venue.clone().unwrap_or_default();
    entries.push(ScheduleEntry {
        id: Some(Scalar::Text("ceremony".to_string())),
        title: Some(
            non_empty(&primary.title)
                .unwrap_or("Wedding Ceremony")
                .to_string(),
        ),
        start: Some(start.to_string()),
        end: Some(end.to_string()),
        location_name: venue.name,
        address: venue.address,
        notes: None,
        map_url: venue.map_url,
    });

    entries
}

/// `<slug>-<entry id>@<domain>`; stable across regenerations so
/// subscribers see updates rather than duplicates.
pub fn event_uid(slug: &str, entry: &ScheduleEntry, domain: &str) -> String {
    format!("{slug}-{}@{domain}", entry.entry_id())
}

/// Generate the calendar for `slug`, stamped with the current time.
pub fn generate(details: &Details, slug: &str, settings: &CalendarSettings) -> String {
    build_calendar(slug, details, settings, Utc::now())
}

/// Generate the calendar for `slug` with an explicit DTSTAMP. Output is
/// CRLF-terminated, including the last line.
pub fn build_calendar(
    slug: &str,
    details: &Details,
    settings: &CalendarSettings,
    dtstamp: DateTime<Utc>,
) -> String {
    let tz = settings.timezone;
    let tzid = tz.name();
    let stamp = utc_stamp(dtstamp);

    let cal_name = match non_empty(&details.couple_names) {
        Some(names) => format!("{names} Wedding"),
        None => format!("{slug} Wedding"),
    };

    let mut events = Vec::new();
    for entry in calendar_entries(details) {
        if !entry.is_complete() {
            continue;
        }

        let start = entry.start.as_deref().and_then(|s| parse_timestamp(s, tz));
        let end = entry.end.as_deref().and_then(|s| parse_timestamp(s, tz));
        let (Some(start), Some(end)) = (start, end) else {
            warn!(slug, entry = %entry.entry_id(), "skipping entry with unreadable times");
            continue;
        };
        events.push((entry, start, end));
    }

    let mut cal = Calendar::new();
    cal.append_property(Property::new("METHOD", "PUBLISH"));
    cal.append_property(Property::new("X-WR-CALNAME", escape_text(&cal_name)));
    cal.append_property(Property::new("X-WR-TIMEZONE", tzid));

    for (entry, start, end) in &events {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&event_uid(slug, entry, &settings.domain));
        ics_event.add_property("DTSTAMP", &stamp);
        add_zoned_property(&mut ics_event, "DTSTART", *start, tz);
        add_zoned_property(&mut ics_event, "DTEND", *end, tz);
        ics_event.summary(&escape_text(entry.title()));

        let location = entry.place();
        if !location.is_empty() {
            ics_event.location(&escape_text(&location));
        }

        let description = description(entry);
        if !description.is_empty() {
            ics_event.description(&escape_text(&description));
        }

        cal.push(ics_event.done());
    }
    let cal = cal.done();

    // The zone block covers every year an event touches
    let reference = details
        .primary_event
        .as_ref()
        .and_then(|e| e.start.as_deref())
        .and_then(|s| parse_timestamp(s, tz))
        .unwrap_or(dtstamp);
    let instants: Vec<DateTime<Utc>> = events
        .iter()
        .flat_map(|(_, start, end)| [*start, *end])
        .chain(std::iter::once(reference))
        .collect();

    finish_output(
        &cal.to_string(),
        &settings.domain,
        &timezone_block(tz, &instants),
    )
}

/// Rewrite the builder's output:
/// - Replace PRODID with one naming the site
/// - Emit CALSCALE right after PRODID
/// - Insert the VTIMEZONE block ahead of the first event
fn finish_output(ics: &str, domain: &str, zone: &[String]) -> String {
    let mut result = String::with_capacity(ics.len() + 512);
    let mut zone_written = false;

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str(&format!("PRODID:-//{domain}//Wedding Invite//EN\r\n"));
            result.push_str("CALSCALE:GREGORIAN\r\n");
            continue;
        }

        if line.starts_with("CALSCALE:") {
            continue;
        }

        if !zone_written && (line == "BEGIN:VEVENT" || line == "END:VCALENDAR") {
            for zone_line in zone {
                result.push_str(zone_line);
                result.push_str("\r\n");
            }
            zone_written = true;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

/// Wall-clock time in `tz` with a TZID parameter.
fn add_zoned_property(ics_event: &mut icalendar::Event, name: &str, at: DateTime<Utc>, tz: Tz) {
    let mut prop = Property::new(name, local_stamp(at, tz));
    prop.add_parameter("TZID", tz.name());
    ics_event.append_property(prop);
}

fn description(entry: &ScheduleEntry) -> String {
    let mut parts = Vec::new();
    if let Some(notes) = non_empty(&entry.notes) {
        parts.push(notes.to_string());
    }
    if let Some(map_url) = non_empty(&entry.map_url) {
        parts.push(format!("Map: {map_url}"));
    }
    parts.join("\n")
}

/// An offset change: the first instant on the new offset, and the offsets
/// (seconds east of UTC) either side of it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    at: DateTime<Utc>,
    from: i32,
    to: i32,
}

fn offset_at(tz: Tz, at: DateTime<Utc>) -> i32 {
    tz.offset_from_utc_datetime(&at.naive_utc())
        .fix()
        .local_minus_utc()
}

/// Offset changes of `tz` during `year` (UTC), found day by day and then
/// narrowed to the second.
fn transitions(tz: Tz, year: i32) -> Vec<Transition> {
    let Some(mut at) = year_start(year) else {
        return Vec::new();
    };

    let mut found = Vec::new();
    let mut offset = offset_at(tz, at);
    while at.year() == year {
        let next = at + Duration::days(1);
        let next_offset = offset_at(tz, next);
        if next_offset != offset {
            found.push(Transition {
                at: first_change(tz, at, next, offset),
                from: offset,
                to: next_offset,
            });
            offset = next_offset;
        }
        at = next;
    }

    found
}

/// Binary search for the first second in `(lo, hi]` whose offset is no
/// longer `before`.
fn first_change(tz: Tz, lo: DateTime<Utc>, hi: DateTime<Utc>, before: i32) -> DateTime<Utc> {
    let (mut lo_s, mut hi_s) = (lo.timestamp(), hi.timestamp());
    while hi_s - lo_s > 1 {
        let mid_s = lo_s + (hi_s - lo_s) / 2;
        let Some(mid) = DateTime::from_timestamp(mid_s, 0) else {
            break;
        };
        if offset_at(tz, mid) == before {
            lo_s = mid_s;
        } else {
            hi_s = mid_s;
        }
    }
    DateTime::from_timestamp(hi_s, 0).unwrap_or(hi)
}

fn year_start(year: i32) -> Option<DateTime<Utc>> {
    let midnight = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}

fn format_offset(seconds: i32) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    format!("{sign}{:02}{:02}", minutes / 60, minutes % 60)
}

fn observance(kind: &str, start: &str, from: i32, to: i32, name: &str) -> [String; 6] {
    [
        format!("BEGIN:{kind}"),
        format!("TZOFFSETFROM:{}", format_offset(from)),
        format!("TZOFFSETTO:{}", format_offset(to)),
        format!("TZNAME:{name}"),
        format!("DTSTART:{start}"),
        format!("END:{kind}"),
    ]
}

/// One VTIMEZONE for `tz` covering the years of `instants`. A zone with
/// no offset change in those years gets a single STANDARD observance;
/// otherwise each change becomes its own STANDARD or DAYLIGHT observance.
fn timezone_block(tz: Tz, instants: &[DateTime<Utc>]) -> Vec<String> {
    let (Some(first), Some(last)) = (instants.iter().min(), instants.iter().max()) else {
        return Vec::new();
    };
    let Some(start) = year_start(first.year()) else {
        return Vec::new();
    };

    let changes: Vec<Transition> = (first.year()..=last.year())
        .flat_map(|year| transitions(tz, year))
        .collect();
    let abbreviation = |at: DateTime<Utc>| at.with_timezone(&tz).format("%Z").to_string();

    let mut lines = vec!["BEGIN:VTIMEZONE".to_string(), format!("TZID:{}", tz.name())];

    // The offset in force before the first change
    let initial = offset_at(tz, start);
    let initial_kind = match changes.first() {
        Some(change) if change.to < change.from => "DAYLIGHT",
        _ => "STANDARD",
    };
    lines.extend(observance(
        initial_kind,
        "19700101T000000",
        initial,
        initial,
        &abbreviation(start),
    ));

    for change in &changes {
        let kind = if change.to > change.from {
            "DAYLIGHT"
        } else {
            "STANDARD"
        };
        // Observance starts are written in the offset being left
        let local = (change.at + Duration::seconds(i64::from(change.from)))
            .format("%Y%m%dT%H%M%S")
            .to_string();
        lines.extend(observance(
            kind,
            &local,
            change.from,
            change.to,
            &abbreviation(change.at),
        ));
    }

    lines.push("END:VTIMEZONE".to_string());
    lines
}
