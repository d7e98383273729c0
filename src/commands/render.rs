use std::path::PathBuf;

use anyhow::{Context, Result};
use invite_core::InviteConfig;
use invite_core::html;
use invite_core::loader;
use invite_core::render::{RenderOptions, ThemeMode, render};
use invite_core::time::parse_timestamp;

pub fn run(
    config: &InviteConfig,
    slug: &str,
    out: Option<PathBuf>,
    dark: bool,
    now: Option<&str>,
) -> Result<()> {
    let details = loader::load_slug(config, slug)?;

    let mut options = RenderOptions::from_config(config)?;
    if dark {
        options.theme_mode = ThemeMode::Dark;
    }
    if let Some(raw) = now {
        options.now = parse_timestamp(raw, options.timezone)
            .with_context(|| format!("Could not parse --now '{}'", raw))?;
    }

    let page = render(&details, &config.calendar_url(slug), &options)
        .with_context(|| format!("Could not render '{}'", slug))?;
    let document = html::page(&page, options.theme_mode);

    match out {
        Some(path) => {
            std::fs::write(&path, document)
                .with_context(|| format!("Could not write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{document}"),
    }

    Ok(())
}
