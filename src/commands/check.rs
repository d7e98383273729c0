use anyhow::Result;
use invite_core::InviteConfig;
use invite_core::details::Details;
use invite_core::render::{RenderOptions, render};
use owo_colors::OwoColorize;

use super::details_files;
use crate::utils::tui;

pub fn run(config: &InviteConfig, slug: Option<&str>) -> Result<()> {
    let files = details_files(&config.data_path(), &config.reserved_slug, slug)?;
    let options = RenderOptions::from_config(config)?;

    let mut errors = 0;
    for (slug, path) in &files {
        let details = match std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|raw| Details::from_json(&raw).map_err(anyhow::Error::from))
        {
            Ok(details) => details,
            Err(e) => {
                tui::error(format!("{slug}: {e}"));
                errors += 1;
                continue;
            }
        };

        if let Err(e) = render(&details, &config.calendar_url(slug), &options) {
            tui::error(format!("{slug}: {e}"));
            errors += 1;
            continue;
        }

        let issues = details.audit();
        if issues.is_empty() {
            tui::ok(slug);
        }
        for issue in issues {
            tui::warn(format!("{slug}: {issue}"));
        }
    }

    if files.is_empty() {
        println!("{}", "No details documents found.".dimmed());
    }

    if errors > 0 {
        anyhow::bail!("{} document(s) cannot be rendered", errors);
    }

    Ok(())
}
