//! Generating calendars for every details document in a directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::generate::{CalendarSettings, build_calendar};
use crate::details::Details;
use crate::error::InviteResult;

#[derive(Debug)]
pub enum BatchOutcome {
    Written {
        output: PathBuf,
        /// Document has no password and will never unlock
        missing_password: bool,
    },
    /// Read, parse or write failed; the rest of the batch still ran
    Failed(String),
}

#[derive(Debug)]
pub struct BatchItem {
    pub slug: String,
    pub source: PathBuf,
    pub outcome: BatchOutcome,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn written(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, BatchOutcome::Written { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.written()
    }
}

/// Write `<slug>.ics` into `out_dir` for every `<slug>.json` in `data_dir`,
/// in file name order. `reserved_slug` (the template) is never generated.
/// When `only` is set, just that slug is processed.
pub fn generate_dir(
    data_dir: &Path,
    out_dir: &Path,
    reserved_slug: &str,
    only: Option<&str>,
    settings: &CalendarSettings,
) -> InviteResult<BatchReport> {
    generate_dir_at(data_dir, out_dir, reserved_slug, only, settings, Utc::now())
}

pub(crate) fn generate_dir_at(
    data_dir: &Path,
    out_dir: &Path,
    reserved_slug: &str,
    only: Option<&str>,
    settings: &CalendarSettings,
    dtstamp: DateTime<Utc>,
) -> InviteResult<BatchReport> {
    std::fs::create_dir_all(out_dir)?;

    let mut sources: Vec<(String, PathBuf)> = std::fs::read_dir(data_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .filter_map(|path| {
            let slug = path.file_stem()?.to_str()?.to_string();
            Some((slug, path))
        })
        .filter(|(slug, _)| slug != reserved_slug)
        .filter(|(slug, _)| only.is_none_or(|wanted| wanted == slug))
        .collect();
    sources.sort();

    let mut report = BatchReport::default();

    for (slug, source) in sources {
        let outcome = match generate_one(&slug, &source, out_dir, settings, dtstamp) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(slug = %slug, error = %e, "skipping calendar");
                BatchOutcome::Failed(e.to_string())
            }
        };
        report.items.push(BatchItem {
            slug,
            source,
            outcome,
        });
    }

    Ok(report)
}

fn generate_one(
    slug: &str,
    source: &Path,
    out_dir: &Path,
    settings: &CalendarSettings,
    dtstamp: DateTime<Utc>,
) -> InviteResult<BatchOutcome> {
    let raw = std::fs::read_to_string(source)?;
    let details = Details::from_json(&raw)?;

    let missing_password = !details.has_password();
    if missing_password {
        warn!(slug, "details have no password; the invite can never be unlocked");
    }

    let output = out_dir.join(format!("{slug}.ics"));
    std::fs::write(&output, build_calendar(slug, &details, settings, dtstamp))?;
    info!(slug, path = %output.display(), "wrote calendar");

    Ok(BatchOutcome::Written {
        output,
        missing_password,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn settings() -> CalendarSettings {
        CalendarSettings {
            domain: "invites.example".into(),
            timezone: chrono_tz::Asia::Kolkata,
        }
    }

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    const GOOD: &str = r#"{"coupleNames": "A & B", "password": "x",
        "schedule": [{"id": "brunch", "title": "Brunch", "start": "2025-12-11T10:00", "end": "2025-12-11T12:00"}]}"#;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn bad_file_is_skipped_and_the_rest_continue() {
        let data = TempDir::new().unwrap();
        let out = data.path().join("calendars");
        write(data.path(), "alpha.json", GOOD);
        write(data.path(), "broken.json", "{ not json");
        write(data.path(), "zeta.json", r#"{"coupleNames": "Y & Z"}"#);
        write(data.path(), "template.json", GOOD);
        write(data.path(), "notes.txt", "ignored");

        let report =
            generate_dir_at(data.path(), &out, "template", None, &settings(), stamp()).unwrap();

        let slugs: Vec<&str> = report.items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, ["alpha", "broken", "zeta"]);
        assert_eq!(report.written(), 2);
        assert_eq!(report.failed(), 1);
        assert!(matches!(report.items[1].outcome, BatchOutcome::Failed(_)));
        assert!(matches!(
            report.items[2].outcome,
            BatchOutcome::Written {
                missing_password: true,
                ..
            }
        ));

        assert!(out.join("alpha.ics").exists());
        assert!(out.join("zeta.ics").exists());
        assert!(!out.join("broken.ics").exists());
        assert!(!out.join("template.ics").exists());

        let alpha = std::fs::read_to_string(out.join("alpha.ics")).unwrap();
        assert!(alpha.contains("UID:alpha-brunch@invites.example"));
    }

    #[test]
    fn single_slug_filter() {
        let data = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write(data.path(), "alpha.json", GOOD);
        write(data.path(), "beta.json", GOOD);

        let report =
            generate_dir_at(data.path(), out.path(), "template", Some("beta"), &settings(), stamp())
                .unwrap();

        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].slug, "beta");
        assert!(!out.path().join("alpha.ics").exists());
    }

    #[test]
    fn missing_data_dir_is_an_error() {
        let out = TempDir::new().unwrap();
        let missing = out.path().join("nope");
        assert!(generate_dir(&missing, out.path(), "template", None, &settings()).is_err());
    }
}
