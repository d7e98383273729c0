//! Turning a details document into the regions of an invite page.
//!
//! [`render`] is pure: the same document, calendar URL and options always
//! produce the same [`InvitePage`]. Each sub-renderer owns its own regions
//! and tolerates missing optional data. The few required fields (couple
//! names, primary event start, last-updated) fail the render instead.

pub mod countdown;
pub mod decor;
pub mod lists;
pub mod photo;
pub mod rsvp;
pub mod schedule;
pub mod theme;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::InviteConfig;
use crate::details::{Details, non_empty};
use crate::error::{InviteError, InviteResult};
use crate::time::{format_local, parse_timestamp};

pub use countdown::{Countdown, CountdownTicker, CountdownView};
pub use decor::{Corner, CornerView, DecorView, ThemeMode, resolve_decor, watch_decor};
pub use lists::{ContactRow, UpdateRow};
pub use photo::{CouplePhotoView, PhotoShape};
pub use rsvp::{Embed, Link, RsvpClick, RsvpMode, RsvpWidget};
pub use schedule::{ScheduleCard, google_calendar_link};
pub use theme::ThemeView;

const DEFAULT_COUNTDOWN_LABEL: &str = "The big day";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Zone naive document times are read in and displayed in
    pub timezone: Tz,
    /// Base URL a relative calendar URL is resolved against
    pub site_url: String,
    pub theme_mode: ThemeMode,
    /// Instant the first countdown frame is computed for
    pub now: DateTime<Utc>,
}

impl RenderOptions {
    pub fn from_config(config: &InviteConfig) -> InviteResult<Self> {
        Ok(RenderOptions {
            timezone: config.tz()?,
            site_url: config.site_url.clone(),
            theme_mode: ThemeMode::default(),
            now: Utc::now(),
        })
    }
}

/// Every display region of an unlocked invite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvitePage {
    pub couple_names: String,
    pub tagline: String,
    /// Hidden when `None`
    pub city_line: Option<String>,
    pub wedding_date: String,
    pub last_updated: String,
    pub map_url: Option<String>,
    pub calendar_url: String,
    /// `webcal:` link for calendar apps
    pub subscribe_url: Option<String>,
    pub countdown: CountdownView,
    pub schedule: Vec<ScheduleCard>,
    pub updates: Vec<UpdateRow>,
    pub contacts: Vec<ContactRow>,
    pub theme: ThemeView,
    pub decor: DecorView,
    pub couple_photo: Option<CouplePhotoView>,
    pub rsvp: Option<RsvpWidget>,
}

pub fn render(
    details: &Details,
    calendar_url: &str,
    options: &RenderOptions,
) -> InviteResult<InvitePage> {
    let tz = options.timezone;

    let couple_names = non_empty(&details.couple_names)
        .ok_or(InviteError::MissingField("coupleNames"))?
        .to_string();

    let primary = details.primary_event.as_ref();
    let start_raw = primary
        .and_then(|e| non_empty(&e.start))
        .ok_or(InviteError::MissingField("primaryEvent.start"))?;
    let start = parse_timestamp(start_raw, tz).ok_or_else(|| InviteError::InvalidField {
        field: "primaryEvent.start",
        value: start_raw.to_string(),
    })?;

    let updated_raw =
        non_empty(&details.last_updated).ok_or(InviteError::MissingField("lastUpdated"))?;
    let last_updated = parse_timestamp(updated_raw, tz).ok_or_else(|| InviteError::InvalidField {
        field: "lastUpdated",
        value: updated_raw.to_string(),
    })?;

    let label = primary
        .and_then(|e| non_empty(&e.title))
        .unwrap_or(DEFAULT_COUNTDOWN_LABEL)
        .to_string();

    debug!(couple = %couple_names, "rendering invite");

    Ok(InvitePage {
        couple_names,
        tagline: details.tagline.clone().unwrap_or_default(),
        city_line: non_empty(&details.city_line).map(str::to_string),
        wedding_date: format_local(start, tz),
        last_updated: format_local(last_updated, tz),
        map_url: details.venue_map_url().map(str::to_string),
        calendar_url: calendar_url.to_string(),
        subscribe_url: subscription_url(calendar_url, &options.site_url),
        countdown: CountdownView::new(start, label, options.now),
        schedule: schedule::resolve_schedule(details, tz),
        updates: lists::resolve_updates(&details.updates, tz),
        contacts: lists::resolve_contacts(&details.contacts),
        theme: theme::resolve_theme(details.theme.as_ref()),
        decor: resolve_decor(details.decor(), options.theme_mode),
        couple_photo: photo::resolve_photo(details.media.as_ref()),
        rsvp: rsvp::resolve_rsvp(details.rsvp.as_ref(), tz),
    })
}

/// Resolve `calendar_url` against `site_url` and swap `https:` for
/// `webcal:` so calendar apps subscribe instead of importing once.
pub fn subscription_url(calendar_url: &str, site_url: &str) -> Option<String> {
    let absolute = Url::parse(site_url)
        .and_then(|base| base.join(calendar_url))
        .or_else(|_| Url::parse(calendar_url))
        .ok()?
        .to_string();

    Some(match absolute.strip_prefix("https:") {
        Some(rest) => format!("webcal:{rest}"),
        None => absolute,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Kolkata;

    const FULL: &str = r#"{
        "coupleNames": "Asha & Rohan",
        "tagline": "Together with their families",
        "cityLine": "Udaipur, Rajasthan",
        "lastUpdated": "2025-11-01T10:00:00+05:30",
        "password": "mango",
        "primaryEvent": {"title": "Wedding Ceremony", "start": "2025-12-10T18:30", "end": "2025-12-10T21:00"},
        "primaryVenue": {"name": "Lake Palace", "address": "Pichola", "mapUrl": "https://maps.example/palace"},
        "schedule": [
            {"id": "brunch", "title": "Farewell Brunch", "start": "2025-12-11T10:00", "end": "2025-12-11T12:00"}
        ],
        "updates": [{"when": "2025-11-01T10:00", "text": "Hotel block is open"}],
        "contacts": [{"name": "Priya", "role": "Coordinator", "phone": "+91 90000 00000"}],
        "theme": {"background": "gradient", "gradient": "from-rose-50 to-amber-50"},
        "decor": {"enabled": true, "imageUrl": "/decor.png"},
        "media": {"couplePhoto": {"enabled": true, "src": "/us.jpg"}},
        "rsvp": {"enabled": true, "formUrl": "https://forms.example/x"}
    }"#;

    fn options() -> RenderOptions {
        RenderOptions {
            timezone: Kolkata,
            site_url: "https://invites.example".into(),
            theme_mode: ThemeMode::Light,
            now: Utc.with_ymd_and_hms(2025, 12, 9, 13, 0, 0).unwrap(),
        }
    }

    #[test]
    fn renders_every_region() {
        let details = Details::from_json(FULL).unwrap();
        let page = render(&details, "/weddings/calendars/asha-rohan.ics", &options()).unwrap();

        assert_eq!(page.couple_names, "Asha & Rohan");
        assert_eq!(page.city_line.as_deref(), Some("Udaipur, Rajasthan"));
        assert_eq!(page.wedding_date, "Wed, Dec 10, 2025, 06:30 PM");
        assert_eq!(page.last_updated, "Sat, Nov 01, 2025, 10:00 AM");
        assert_eq!(page.map_url.as_deref(), Some("https://maps.example/palace"));
        assert_eq!(
            page.subscribe_url.as_deref(),
            Some("webcal://invites.example/weddings/calendars/asha-rohan.ics")
        );
        // 18:30 IST on the 10th is 13:00 UTC, one day after `now`
        assert_eq!(page.countdown.text, "1d 00h 00m 00s");
        assert_eq!(page.countdown.label, "Wedding Ceremony");
        assert_eq!(page.schedule.len(), 1);
        assert_eq!(page.updates.len(), 1);
        assert_eq!(page.contacts.len(), 1);
        assert!(matches!(page.theme, ThemeView::Gradient { .. }));
        assert_eq!(page.decor.corners.len(), 4);
        assert!(page.couple_photo.is_some());
        assert!(page.rsvp.is_some());
    }

    #[test]
    fn optional_regions_degrade_by_omission() {
        let details = Details::from_json(
            r#"{"coupleNames": "A & B", "lastUpdated": "2025-11-01", "primaryEvent": {"start": "2025-12-10"}}"#,
        )
        .unwrap();
        let page = render(&details, "/c.ics", &options()).unwrap();

        assert_eq!(page.tagline, "");
        assert!(page.city_line.is_none());
        assert!(page.map_url.is_none());
        assert!(page.schedule.is_empty());
        assert_eq!(page.theme, ThemeView::Plain);
        assert!(!page.decor.is_visible());
        assert!(page.couple_photo.is_none());
        assert!(page.rsvp.is_none());
        assert_eq!(page.countdown.label, "The big day");
    }

    #[test]
    fn missing_couple_names_is_an_error() {
        let details = Details::from_json(
            r#"{"lastUpdated": "2025-11-01", "primaryEvent": {"start": "2025-12-10"}}"#,
        )
        .unwrap();
        let err = render(&details, "/c.ics", &options()).unwrap_err();
        assert!(matches!(err, InviteError::MissingField("coupleNames")));
    }

    #[test]
    fn wrongly_typed_couple_names_reads_as_missing() {
        let details = Details::from_json(
            r#"{"coupleNames": {"first": "A"}, "lastUpdated": "2025-11-01", "primaryEvent": {"start": "2025-12-10"}}"#,
        )
        .unwrap();
        assert!(matches!(
            render(&details, "/c.ics", &options()),
            Err(InviteError::MissingField("coupleNames"))
        ));
    }

    #[test]
    fn missing_start_or_bad_last_updated_is_an_error() {
        let no_start =
            Details::from_json(r#"{"coupleNames": "A & B", "lastUpdated": "2025-11-01"}"#).unwrap();
        assert!(matches!(
            render(&no_start, "/c.ics", &options()),
            Err(InviteError::MissingField("primaryEvent.start"))
        ));

        let bad_updated = Details::from_json(
            r#"{"coupleNames": "A & B", "lastUpdated": "yesterday", "primaryEvent": {"start": "2025-12-10"}}"#,
        )
        .unwrap();
        assert!(matches!(
            render(&bad_updated, "/c.ics", &options()),
            Err(InviteError::InvalidField { field: "lastUpdated", .. })
        ));
    }

    #[test]
    fn rendering_is_deterministic() {
        let details = Details::from_json(FULL).unwrap();
        let first = render(&details, "/c.ics", &options()).unwrap();
        let second = render(&details, "/c.ics", &options()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn subscription_keeps_plain_http() {
        assert_eq!(
            subscription_url("/c.ics", "http://localhost:4096").as_deref(),
            Some("http://localhost:4096/c.ics")
        );
        assert_eq!(
            subscription_url("https://cdn.example/c.ics", "not a url").as_deref(),
            Some("webcal://cdn.example/c.ics")
        );
    }
}
