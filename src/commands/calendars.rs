use anyhow::{Context, Result};
use invite_core::InviteConfig;
use invite_core::ics::{self, BatchOutcome};
use owo_colors::OwoColorize;

use crate::utils::tui;

pub fn run(config: &InviteConfig, slug: Option<&str>) -> Result<()> {
    let settings = config.calendar_settings()?;
    let data_dir = config.data_path();
    let out_dir = config.calendars_path();

    let report = ics::generate_dir(&data_dir, &out_dir, &config.reserved_slug, slug, &settings)
        .with_context(|| format!("Could not generate calendars from {}", data_dir.display()))?;

    if report.items.is_empty() {
        match slug {
            Some(slug) => anyhow::bail!("No details found for '{}' in {}", slug, data_dir.display()),
            None => {
                println!("{}", "No details documents found.".dimmed());
                return Ok(());
            }
        }
    }

    for item in &report.items {
        match &item.outcome {
            BatchOutcome::Written {
                output,
                missing_password,
            } => {
                if *missing_password {
                    tui::warn(format!("{} has no password", item.slug));
                }
                tui::ok(format!("{} -> {}", item.slug, output.display()));
            }
            BatchOutcome::Failed(e) => tui::error(format!("{}: {}", item.source.display(), e)),
        }
    }

    println!();
    println!(
        "Generated {} calendar(s) in {}",
        report.written(),
        out_dir.display()
    );

    if report.failed() > 0 {
        anyhow::bail!("{} details file(s) could not be processed", report.failed());
    }

    Ok(())
}
