//! The per-event details document.
//!
//! One JSON file per slug is the single source of truth for both the page
//! and the calendar feed. Parsing is deliberately forgiving: a list entry
//! or optional section that does not match its shape is dropped (and
//! logged) instead of failing the whole document. Required fields are
//! modelled as `Option` here and enforced by the renderer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InviteResult;

/// A JSON value that may be written as a string or a number
/// (`"password": 1234` and `"password": "1234"` are the same secret).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    #[serde(default, deserialize_with = "lenient::text")]
    pub couple_names: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tagline: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub city_line: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub last_updated: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub password: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub password_hint: Option<String>,

    #[serde(default, deserialize_with = "lenient::option")]
    pub primary_event: Option<PrimaryEvent>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub primary_venue: Option<Venue>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub schedule: Vec<ScheduleEntry>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub updates: Vec<Update>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub contacts: Vec<Contact>,

    #[serde(default, deserialize_with = "lenient::option")]
    pub theme: Option<Theme>,
    /// Older documents keep decor at the top level; see [`Details::decor`]
    #[serde(default, deserialize_with = "lenient::option")]
    pub decor: Option<DecorConfig>,

    #[serde(default, deserialize_with = "lenient::option")]
    pub media: Option<Media>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub rsvp: Option<Rsvp>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryEvent {
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub name: Option<String>,
    pub address: Option<String>,
    pub map_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: Option<Scalar>,
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub location_name: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub map_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Update {
    pub when: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    Gradient,
    Image,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub background: Option<Background>,
    /// Space-separated gradient stop classes, e.g. "from-rose-50 via-white to-amber-50"
    pub gradient: Option<String>,
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub decor: Option<DecorConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecorMode {
    Corners,
    Tile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorConfig {
    pub enabled: Option<bool>,
    pub mode: Option<DecorMode>,
    pub image_url: Option<String>,
    pub opacity_dark: Option<f64>,
    pub opacity_light: Option<f64>,
    pub size: Option<f64>,
    /// Per-corner automatic rotation; on unless explicitly `false`
    pub rotate: Option<bool>,
    /// Degrees added to every corner
    pub base_rotation: Option<f64>,
    #[serde(default)]
    pub corners: DecorCorners,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecorCorners {
    pub tl: Option<CornerOverride>,
    pub tr: Option<CornerOverride>,
    pub bl: Option<CornerOverride>,
    pub br: Option<CornerOverride>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerOverride {
    pub image_url: Option<String>,
    pub rotation: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    #[serde(default, deserialize_with = "lenient::option")]
    pub couple_photo: Option<CouplePhoto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouplePhoto {
    pub enabled: Option<bool>,
    pub src: Option<String>,
    pub alt: Option<String>,
    /// "circle" (default) or "rounded"
    pub shape: Option<String>,
    pub size: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    pub enabled: Option<bool>,
    pub title: Option<String>,
    pub deadline: Option<String>,
    /// "button" (default) or "embed"
    pub mode: Option<String>,
    /// Embed mode only: show a button first, reveal the form on click
    pub show_button: Option<bool>,
    pub form_url: Option<String>,
    pub embed_url: Option<String>,
    pub button_text: Option<String>,
    pub open_in_new_tab_text: Option<String>,
}

impl Details {
    pub fn from_json(raw: &str) -> InviteResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Decor settings, preferring `theme.decor` over the top-level `decor`.
    pub fn decor(&self) -> Option<&DecorConfig> {
        self.theme
            .as_ref()
            .and_then(|t| t.decor.as_ref())
            .or(self.decor.as_ref())
    }

    pub fn has_password(&self) -> bool {
        self.password
            .as_ref()
            .is_some_and(|p| !p.to_string().is_empty())
    }

    pub fn venue_map_url(&self) -> Option<&str> {
        self.primary_venue.as_ref().and_then(|v| non_empty(&v.map_url))
    }

    /// Hygiene problems worth reporting before publishing a document.
    pub fn audit(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if non_empty(&self.couple_names).is_none() {
            issues.push("missing \"coupleNames\"".to_string());
        }
        if non_empty(&self.last_updated).is_none() {
            issues.push("missing \"lastUpdated\"".to_string());
        }
        if !self.has_password() {
            issues.push("missing \"password\"".to_string());
        }
        if self
            .primary_event
            .as_ref()
            .and_then(|e| non_empty(&e.start))
            .is_none()
        {
            issues.push("missing \"primaryEvent.start\"".to_string());
        }
        for (i, entry) in self.schedule.iter().enumerate() {
            if !entry.is_complete() {
                issues.push(format!(
                    "schedule[{i}] needs title, start and end; it will be skipped"
                ));
            }
        }

        issues
    }
}

impl ScheduleEntry {
    /// Whether the entry has the fields every card and calendar event needs.
    pub fn is_complete(&self) -> bool {
        non_empty(&self.title).is_some()
            && non_empty(&self.start).is_some()
            && non_empty(&self.end).is_some()
    }

    pub fn title(&self) -> &str {
        non_empty(&self.title).unwrap_or_default()
    }

    /// "Location, Address" with absent parts left out.
    pub fn place(&self) -> String {
        [&self.location_name, &self.address]
            .into_iter()
            .filter_map(non_empty)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Stable identifier: the explicit `id`, or a slug of the title.
    pub fn entry_id(&self) -> String {
        match &self.id {
            Some(id) if !id.to_string().is_empty() => id.to_string(),
            _ => slugify(self.title()),
        }
    }

    pub fn is_ceremony(&self) -> bool {
        self.id
            .as_ref()
            .is_some_and(|id| id.to_string().eq_ignore_ascii_case("ceremony"))
    }
}

/// Lowercase, with every run of characters outside `[a-z0-9]` collapsed to
/// one hyphen and no hyphen at either end.
pub fn slugify(s: &str) -> String {
    s.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Treat empty strings like missing ones.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::warn;

    /// Keep the entries that match `T`, drop the rest.
    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let items = match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(other) => {
                warn!(found = %type_name(&other), "expected a list; ignoring it");
                return Ok(Vec::new());
            }
        };

        Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(index, error = %e, "dropping malformed entry");
                    None
                }
            })
            .collect())
    }

    /// An optional section that does not match `T` counts as absent.
    pub fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => match serde_json::from_value(value) {
                Ok(section) => Ok(Some(section)),
                Err(e) => {
                    warn!(error = %e, "ignoring malformed section");
                    Ok(None)
                }
            },
        }
    }

    /// A top-level text field. Numbers keep their JSON spelling; any other
    /// type counts as absent.
    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => {
                warn!(found = %type_name(&other), "expected text; ignoring it");
                Ok(None)
            }
        }
    }

    fn type_name(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_password_displays_like_text() {
        let details = Details::from_json(r#"{"password": 1234}"#).unwrap();
        assert_eq!(details.password.unwrap().to_string(), "1234");
    }

    #[test]
    fn malformed_entries_are_dropped() {
        let details = Details::from_json(
            r#"{
                "schedule": [
                    {"id": "haldi", "title": "Haldi", "start": "2025-12-09T10:00", "end": "2025-12-09T12:00"},
                    "not an entry",
                    {"title": 42}
                ],
                "contacts": {"name": "not a list"}
            }"#,
        )
        .unwrap();

        assert_eq!(details.schedule.len(), 1);
        assert_eq!(details.schedule[0].title(), "Haldi");
        assert!(details.contacts.is_empty());
    }

    #[test]
    fn malformed_section_counts_as_absent() {
        let details =
            Details::from_json(r#"{"theme": {"background": "neon"}, "rsvp": {"enabled": true}}"#)
                .unwrap();
        assert!(details.theme.is_none());
        assert!(details.rsvp.is_some());
    }

    #[test]
    fn mistyped_text_fields_do_not_fail_the_document() {
        let details = Details::from_json(
            r#"{
                "coupleNames": "Asha & Rohan",
                "lastUpdated": "2025-11-01",
                "primaryEvent": {"start": "2025-12-10"},
                "tagline": 42,
                "passwordHint": 2512,
                "cityLine": ["Udaipur"],
                "password": true
            }"#,
        )
        .unwrap();

        assert_eq!(details.couple_names.as_deref(), Some("Asha & Rohan"));
        assert_eq!(details.tagline.as_deref(), Some("42"));
        assert_eq!(details.password_hint.as_deref(), Some("2512"));
        assert!(details.city_line.is_none());
        assert!(details.password.is_none());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(Details::from_json("{ nope").is_err());
        assert!(Details::from_json("42").is_err());
    }

    #[test]
    fn nested_decor_wins_over_top_level() {
        let details = Details::from_json(
            r#"{
                "theme": {"decor": {"imageUrl": "/nested.png"}},
                "decor": {"imageUrl": "/top.png"}
            }"#,
        )
        .unwrap();
        assert_eq!(details.decor().unwrap().image_url.as_deref(), Some("/nested.png"));

        let top_only = Details::from_json(r#"{"decor": {"imageUrl": "/top.png"}}"#).unwrap();
        assert_eq!(top_only.decor().unwrap().image_url.as_deref(), Some("/top.png"));
    }

    #[test]
    fn entry_id_prefers_explicit_id() {
        let entry = ScheduleEntry {
            id: Some(Scalar::Text("brunch".into())),
            title: Some("Farewell Brunch".into()),
            ..Default::default()
        };
        assert_eq!(entry.entry_id(), "brunch");

        let numbered = ScheduleEntry {
            id: Some(Scalar::Number(7.into())),
            ..Default::default()
        };
        assert_eq!(numbered.entry_id(), "7");
    }

    #[test]
    fn entry_id_falls_back_to_title_slug() {
        let entry = ScheduleEntry {
            title: Some("  Sangeet & Cocktails!! ".into()),
            ..Default::default()
        };
        assert_eq!(entry.entry_id(), "sangeet-cocktails");
    }

    #[test]
    fn place_skips_missing_parts() {
        let entry = ScheduleEntry {
            location_name: Some("Lake Palace".into()),
            address: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(entry.place(), "Lake Palace");
    }

    #[test]
    fn ceremony_match_ignores_case() {
        let entry = ScheduleEntry {
            id: Some(Scalar::Text("Ceremony".into())),
            ..Default::default()
        };
        assert!(entry.is_ceremony());
    }

    #[test]
    fn audit_reports_missing_fields() {
        let details = Details::from_json(
            r#"{"coupleNames": "A & B", "schedule": [{"title": "Dinner"}]}"#,
        )
        .unwrap();
        let issues = details.audit();

        assert!(issues.iter().any(|i| i.contains("password")));
        assert!(issues.iter().any(|i| i.contains("lastUpdated")));
        assert!(issues.iter().any(|i| i.contains("schedule[0]")));
        assert!(!issues.iter().any(|i| i.contains("coupleNames")));
    }
}
