use std::sync::Arc;

use anyhow::{Context, Result};
use invite_core::clock::SystemClock;
use invite_core::html::{MISSING_MESSAGE, WRONG_PASSWORD};
use invite_core::loader;
use invite_core::render::{InvitePage, RenderOptions, ThemeMode};
use invite_core::{Details, FileUnlockStore, Gate, GateState, InviteConfig, InviteSession};
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

use crate::utils::tui::create_spinner;

pub async fn run(config: &InviteConfig, target: &str, password: Option<String>) -> Result<()> {
    let (slug, details) = match load(config, target).await {
        Ok(loaded) => loaded,
        Err(e) => {
            println!("{}", MISSING_MESSAGE.red());
            return Err(e);
        }
    };

    let store = FileUnlockStore::open(config.unlock_store_path()?);
    let mut gate = Gate::new(slug.clone(), details, store);
    unlock(&mut gate, password)?;

    let options = RenderOptions::from_config(config)?;
    let mut session = InviteSession::start(
        gate.into_details(),
        config.calendar_url(&slug),
        options,
        Arc::new(SystemClock),
    )?;

    print_page(session.page());
    println!();
    println!("{}", "Commands: dark, light, rsvp, quit".dimmed());

    preview(&mut session).await
}

/// Resolve the target to a slug and its details.
async fn load(config: &InviteConfig, target: &str) -> Result<(String, Details)> {
    if !loader::is_remote(target) {
        let details = loader::load_slug(config, target)?;
        return Ok((target.to_string(), details));
    }

    let url = Url::parse(target).with_context(|| format!("Invalid URL '{}'", target))?;
    let slug = url
        .path_segments()
        .and_then(|segments| segments.last())
        .map(|file| file.trim_end_matches(".json").to_string())
        .filter(|s| !s.is_empty())
        .with_context(|| format!("Could not find a slug in '{}'", target))?;

    let spinner = create_spinner(format!("Fetching {}", slug));
    let result = loader::load(target).await;
    spinner.finish_and_clear();

    Ok((slug, result?))
}

fn unlock(gate: &mut Gate<FileUnlockStore>, password: Option<String>) -> Result<()> {
    let hint = match gate.state() {
        GateState::Unlocked => return Ok(()),
        GateState::Locked { hint } => hint,
    };

    if !gate.details().has_password() {
        anyhow::bail!("'{}' has no password and cannot be unlocked", gate.slug());
    }

    if let Some(password) = password {
        if gate.attempt_unlock(&password)? {
            return Ok(());
        }
        anyhow::bail!(WRONG_PASSWORD);
    }

    if let Some(hint) = hint {
        println!("{} {}", "Hint:".dimmed(), hint);
    }

    loop {
        let candidate = rpassword::prompt_password("Password: ")?;
        if gate.attempt_unlock(&candidate)? {
            return Ok(());
        }
        println!("{}", WRONG_PASSWORD.red());
    }
}

fn print_page(page: &InvitePage) {
    println!();
    println!("{}", page.couple_names.bold());
    if !page.tagline.is_empty() {
        println!("{}", page.tagline);
    }
    if let Some(city) = &page.city_line {
        println!("{}", city.dimmed());
    }
    println!("{}", page.wedding_date);
    if let Some(map) = &page.map_url {
        println!("   Map: {}", map);
    }

    if !page.schedule.is_empty() {
        println!();
        println!("{}", "Schedule".bold());
        for card in &page.schedule {
            println!("  {}  {}", card.title.bold(), card.time.dimmed());
            if !card.place.is_empty() {
                println!("     {}", card.place);
            }
            if let Some(notes) = &card.notes {
                println!("     {}", notes);
            }
            println!("     {}", card.calendar_link.dimmed());
        }
    }

    if !page.updates.is_empty() {
        println!();
        println!("{}", "Updates".bold());
        for update in &page.updates {
            println!("  {}  {}", update.when.dimmed(), update.text);
        }
    }

    if !page.contacts.is_empty() {
        println!();
        println!("{}", "Contacts".bold());
        for contact in &page.contacts {
            println!("  {}{}", contact.name, contact.detail);
        }
    }

    if let Some(rsvp) = &page.rsvp {
        println!();
        println!("{}", rsvp.title.bold());
        if let Some(deadline) = &rsvp.deadline {
            println!("  {}", deadline);
        }
        if let Some(button) = &rsvp.button {
            if button.new_tab {
                println!("  {}: {}", button.text, button.href);
            } else {
                println!("  {} (type 'rsvp')", button.text);
            }
        }
        if let Some(link) = &rsvp.open_in_new_tab {
            println!("  {}: {}", link.text, link.href);
        }
        if let Some(src) = rsvp.embed_src() {
            println!("  Form: {}", src);
        }
    }

    println!();
    println!(
        "Calendar: {}",
        page.subscribe_url.as_deref().unwrap_or(&page.calendar_url)
    );
    println!("{}", format!("Last updated {}", page.last_updated).dimmed());
}

/// Live countdown plus a few stdin commands, until `quit` or end of input.
async fn preview(session: &mut InviteSession) -> Result<()> {
    let mut countdown = session.countdown();
    let mut decor = session.decor();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", session.countdown_text());

    loop {
        tokio::select! {
            Ok(()) = countdown.changed() => {
                let text = countdown.borrow_and_update().clone();
                println!("{}", text);
            }
            Ok(()) = decor.changed() => {
                let view = decor.borrow_and_update().clone();
                if let Some(corner) = view.corners.first() {
                    println!("{}", format!("decor opacity {}", corner.opacity).dimmed());
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    return Ok(());
                };
                match line.trim() {
                    "dark" => session.set_theme_mode(ThemeMode::Dark),
                    "light" => session.set_theme_mode(ThemeMode::Light),
                    "rsvp" => match session.click_rsvp() {
                        Some(click) => {
                            if let Some(src) = click.load {
                                println!("Loading form: {}", src);
                            }
                        }
                        None => println!("{}", "Nothing to open here.".dimmed()),
                    },
                    "quit" | "q" | "exit" => return Ok(()),
                    "" => {}
                    other => println!("{}", format!("Unknown command '{}'", other).dimmed()),
                }
            }
        }
    }
}
