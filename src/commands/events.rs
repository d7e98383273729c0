use anyhow::{Context, Result};
use invite_core::InviteConfig;
use invite_core::ics;
use owo_colors::OwoColorize;

pub fn run(config: &InviteConfig, slug: &str) -> Result<()> {
    let path = config.calendar_path(slug);
    let content = std::fs::read_to_string(&path).with_context(|| {
        format!(
            "No calendar at {}. Generate it with:\n  invite calendars --slug {}",
            path.display(),
            slug
        )
    })?;

    let events = ics::inspect(&content)?;
    if events.is_empty() {
        println!("{}", "No events.".dimmed());
        return Ok(());
    }

    for event in events {
        let when = match (event.start, event.end) {
            (Some(start), Some(end)) => format!(
                "{} - {}",
                start.format("%a %b %d %H:%M"),
                end.format("%H:%M")
            ),
            _ => "time unknown".to_string(),
        };
        println!("{}  {}", when.dimmed(), event.summary.bold());
        if let Some(location) = event.location {
            println!("   {}", location);
        }
        println!("   {}", event.uid.dimmed());
    }

    Ok(())
}
