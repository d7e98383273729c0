//! HTML documents for the lock screen and the unlocked invite.
//!
//! Element ids follow the page regions so stylesheets and scripts can hook
//! into them. Every piece of document text passes through [`escape`].

use crate::render::{
    Corner, Embed, InvitePage, Link, RsvpWidget, ScheduleCard, ThemeMode,
};

/// What the gate shows before the invite is unlocked.
#[derive(Debug, Clone, Default)]
pub struct LockScreen {
    pub slug: String,
    pub hint: Option<String>,
    /// Inline error after a wrong password
    pub error: Option<String>,
    /// The details could not be loaded; no form is offered
    pub missing: bool,
}

pub const WRONG_PASSWORD: &str = "That password didn't match. Please try again.";
pub const MISSING_MESSAGE: &str = "We couldn't find this invite. Please check the link.";

pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn lock_screen(lock: &LockScreen) -> String {
    let body = if lock.missing {
        format!(r#"<p id="missingMsg" class="missing">{}</p>"#, MISSING_MESSAGE)
    } else {
        let hint = lock
            .hint
            .as_deref()
            .map(|h| format!(r#"<p id="lockHint" class="hint">{}</p>"#, escape(h)))
            .unwrap_or_default();
        let error = lock
            .error
            .as_deref()
            .map(|e| format!(r#"<p id="errorMsg" class="error" role="alert">{}</p>"#, escape(e)))
            .unwrap_or_default();

        format!(
            r#"<form method="post" action="/weddings/{slug}/unlock">
        <label for="passwordInput">Password</label>
        <input id="passwordInput" name="password" type="password" autocomplete="off" autofocus>
        <button id="unlockBtn" type="submit">Unlock</button>
    </form>
    {hint}
    {error}"#,
            slug = escape(&lock.slug),
        )
    };

    document(
        "You're invited",
        "",
        &format!(
            r#"<main id="lockScreen" class="lock">
    <h1>You're invited</h1>
    {body}
</main>"#
        ),
    )
}

/// The unlocked invite as a standalone document.
pub fn page(page: &InvitePage, mode: ThemeMode) -> String {
    let theme_style = page
        .theme
        .style()
        .map(|s| format!(r#" style="{}""#, escape(&s)))
        .unwrap_or_default();

    let body = format!(
        r#"<div id="themeWrapper" class="{theme_class}"{theme_style}>
{decor}
<main id="protectedContent">
    <header>
        <h1 id="coupleNames">{names}</h1>
        {photo}
        <p id="tagline">{tagline}</p>
        {city}
        <p id="weddingDate">{date}</p>
        {map}
        <a id="subscribeBtn" href="{subscribe}">Add all events to your calendar</a>
    </header>
    <section id="countdown" data-target="{target}" data-label="{label}">{countdown}</section>
    <section id="schedule">
{schedule}
    </section>
    <section id="updates">
{updates}
    </section>
    <section id="contacts">
{contacts}
    </section>
{rsvp}
    <footer>Last updated <span id="lastUpdated">{updated}</span></footer>
</main>
</div>"#,
        theme_class = escape(&page.theme.class_list()),
        decor = decor(page),
        names = escape(&page.couple_names),
        photo = photo(page),
        tagline = escape(&page.tagline),
        city = page
            .city_line
            .as_deref()
            .map(|c| format!(r#"<p id="cityLine">{}</p>"#, escape(c)))
            .unwrap_or_default(),
        date = escape(&page.wedding_date),
        map = page
            .map_url
            .as_deref()
            .map(|u| format!(
                r#"<a id="mapBtn" href="{}" target="_blank" rel="noopener">Open map</a>"#,
                escape(u)
            ))
            .unwrap_or_default(),
        subscribe = escape(page.subscribe_url.as_deref().unwrap_or(&page.calendar_url)),
        target = page.countdown.target.to_rfc3339(),
        label = escape(&page.countdown.label),
        countdown = escape(&page.countdown.text),
        schedule = page.schedule.iter().map(schedule_card).collect::<String>(),
        updates = page
            .updates
            .iter()
            .map(|u| format!(
                "        <div class=\"update\"><time>{}</time> {}</div>\n",
                escape(&u.when),
                escape(&u.text)
            ))
            .collect::<String>(),
        contacts = page
            .contacts
            .iter()
            .map(|c| format!(
                "        <div class=\"contact\"><strong>{}</strong>{}</div>\n",
                escape(&c.name),
                escape(&c.detail)
            ))
            .collect::<String>(),
        rsvp = page.rsvp.as_ref().map(|w| rsvp(w, mode)).unwrap_or_default(),
        updated = escape(&page.last_updated),
    );

    let html_class = match mode {
        ThemeMode::Dark => "dark",
        ThemeMode::Light => "",
    };

    document(&page.couple_names, html_class, &body)
}

fn document(title: &str, html_class: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en" class="{html_class}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="robots" content="noindex">
    <title>{title}</title>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

fn decor(page: &InvitePage) -> String {
    if !page.decor.is_visible() {
        return r#"<div id="decorCorners" class="decor hidden"></div>"#.to_string();
    }

    let corners: String = Corner::ALL
        .into_iter()
        .map(|corner| {
            let id = format!("decor{}", corner.key().to_uppercase());
            match page.decor.corner(corner) {
                Some(view) => format!(
                    r#"    <img id="{id}" class="decor-corner" src="{src}" alt="" aria-hidden="true" style="width: {size}px; height: {size}px; opacity: {opacity}; transform: rotate({rotation}deg)">
"#,
                    src = escape(&view.image_url),
                    size = view.size,
                    opacity = view.opacity,
                    rotation = view.rotation,
                ),
                None => format!("    <img id=\"{id}\" class=\"decor-corner hidden\" alt=\"\">\n"),
            }
        })
        .collect();

    format!("<div id=\"decorCorners\" class=\"decor\">\n{corners}</div>")
}

fn photo(page: &InvitePage) -> String {
    let Some(photo) = &page.couple_photo else {
        return String::new();
    };
    format!(
        r#"<div id="couplePhotoWrap"><img id="couplePhoto" class="{class}" src="{src}" alt="{alt}" width="{size}" height="{size}"></div>"#,
        class = photo.shape.class(),
        src = escape(&photo.src),
        alt = escape(&photo.alt),
        size = photo.size,
    )
}

fn schedule_card(card: &ScheduleCard) -> String {
    let place = if card.place.is_empty() {
        String::new()
    } else {
        format!("\n            <p class=\"place\">{}</p>", escape(&card.place))
    };
    let notes = card
        .notes
        .as_deref()
        .map(|n| format!("\n            <p class=\"notes\">{}</p>", escape(n)))
        .unwrap_or_default();
    let map = card
        .map_url
        .as_deref()
        .map(|u| {
            format!(
                "\n            <a href=\"{}\" target=\"_blank\" rel=\"noopener\">Map</a>",
                escape(u)
            )
        })
        .unwrap_or_default();

    format!(
        r#"        <article class="card">
            <h3>{title}</h3>
            <p class="time">{time}</p>{place}{notes}{map}
            <a href="{calendar}" target="_blank" rel="noopener">Add to Google Calendar</a>
        </article>
"#,
        title = escape(&card.title),
        time = escape(&card.time),
        calendar = escape(&card.calendar_link),
    )
}

fn link(id: &str, link: &Link, mode: ThemeMode) -> String {
    // In-page links reveal the embedded form on the server round trip
    let (href, target) = if link.new_tab {
        (escape(&link.href), r#" target="_blank" rel="noopener""#)
    } else {
        let query = match mode {
            ThemeMode::Dark => "?mode=dark&amp;rsvp=open",
            ThemeMode::Light => "?rsvp=open",
        };
        (format!("{query}{}", escape(&link.href)), "")
    };
    format!(r#"<a id="{id}" href="{href}"{target}>{}</a>"#, escape(&link.text))
}

fn rsvp(widget: &RsvpWidget, mode: ThemeMode) -> String {
    let deadline = widget
        .deadline
        .as_deref()
        .map(|d| format!(r#"<p id="rsvpDeadlineText">{}</p>"#, escape(d)))
        .unwrap_or_default();
    let button = widget
        .button
        .as_ref()
        .map(|b| format!(r#"<div id="rsvpButtonWrap">{}</div>"#, link("rsvpButton", b, mode)))
        .unwrap_or_default();
    let new_tab = widget
        .open_in_new_tab
        .as_ref()
        .map(|l| link("rsvpOpenInNewTab", l, mode))
        .unwrap_or_default();

    let embed = match (&widget.embed, widget.embed_src()) {
        (Embed::None, _) => String::new(),
        (_, Some(src)) => format!(
            r#"<div id="rsvpEmbedWrap"><iframe id="rsvpIframe" src="{}" loading="lazy">Loading…</iframe></div>"#,
            escape(src)
        ),
        (_, None) => r#"<div id="rsvpEmbedWrap" class="hidden"></div>"#.to_string(),
    };

    format!(
        r#"    <section id="rsvpSection">
        <h2 id="rsvpTitle">{title}</h2>
        {deadline}
        {button}
        {new_tab}
        {embed}
    </section>
"#,
        title = escape(&widget.title),
    )
}
