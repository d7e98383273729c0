//! RSVP widget.
//!
//! Two independent settings shape it: `mode` (`button` links out to a form,
//! `embed` shows the form in the page) and, for `embed`, `showButton`
//! (reveal the form on demand instead of loading it straight away).

use chrono_tz::Tz;
use serde::Serialize;

use crate::details::{Rsvp, non_empty};
use crate::time::{format_local, parse_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpMode {
    Button,
    Embed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub text: String,
    pub new_tab: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Embed {
    /// Nothing to embed (button mode, or no embed URL)
    None,
    /// Loaded as soon as the widget renders
    Immediate { src: String },
    /// Waiting behind the button until the first click
    Deferred { src: String, loaded: bool },
}

/// What a click on the in-page RSVP button asks the host to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsvpClick {
    /// Set only on the click that loads the form
    pub load: Option<String>,
    pub scroll_into_view: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsvpWidget {
    pub title: String,
    /// "RSVP deadline: …"
    pub deadline: Option<String>,
    pub mode: RsvpMode,
    pub button: Option<Link>,
    pub open_in_new_tab: Option<Link>,
    pub embed: Embed,
    #[serde(skip)]
    loads: u32,
}

impl RsvpWidget {
    /// Whether the embedded form is on screen.
    pub fn embed_visible(&self) -> bool {
        match &self.embed {
            Embed::None => false,
            Embed::Immediate { .. } => true,
            Embed::Deferred { loaded, .. } => *loaded,
        }
    }

    /// The form source once it has been requested.
    pub fn embed_src(&self) -> Option<&str> {
        match &self.embed {
            Embed::Immediate { src } => Some(src.as_str()),
            Embed::Deferred { src, loaded: true } => Some(src.as_str()),
            _ => None,
        }
    }

    /// How many times the embedded form has been requested.
    pub fn load_count(&self) -> u32 {
        self.loads
    }

    /// Handle a click on the in-page button. The first click loads the
    /// form; every click scrolls to it. Returns `None` when the button is
    /// a plain outbound link (or there is no button).
    pub fn click(&mut self) -> Option<RsvpClick> {
        let Embed::Deferred { src, loaded } = &mut self.embed else {
            return None;
        };

        let load = if *loaded {
            None
        } else {
            *loaded = true;
            self.loads += 1;
            Some(src.clone())
        };

        Some(RsvpClick {
            load,
            scroll_into_view: true,
        })
    }
}

/// `None` hides the whole RSVP section.
pub fn resolve_rsvp(rsvp: Option<&Rsvp>, tz: Tz) -> Option<RsvpWidget> {
    let rsvp = rsvp?;
    if rsvp.enabled != Some(true) {
        return None;
    }

    let deadline = non_empty(&rsvp.deadline).map(|raw| {
        let when = parse_timestamp(raw, tz)
            .map(|at| format_local(at, tz))
            .unwrap_or_else(|| raw.to_string());
        format!("RSVP deadline: {when}")
    });

    let form_url = non_empty(&rsvp.form_url);
    let open_in_new_tab = form_url.map(|href| Link {
        href: href.to_string(),
        text: non_empty(&rsvp.open_in_new_tab_text)
            .unwrap_or("Open in Google Forms")
            .to_string(),
        new_tab: true,
    });

    let mode = match rsvp.mode.as_deref().map(str::to_lowercase).as_deref() {
        None | Some("button") => RsvpMode::Button,
        Some(_) => RsvpMode::Embed,
    };

    let mut widget = RsvpWidget {
        title: non_empty(&rsvp.title).unwrap_or("RSVP").to_string(),
        deadline,
        mode,
        button: None,
        open_in_new_tab,
        embed: Embed::None,
        loads: 0,
    };

    match mode {
        RsvpMode::Button => {
            widget.button = form_url.map(|href| Link {
                href: href.to_string(),
                text: non_empty(&rsvp.button_text).unwrap_or("RSVP Now").to_string(),
                new_tab: true,
            });
        }
        RsvpMode::Embed => {
            let Some(src) = non_empty(&rsvp.embed_url).map(str::to_string) else {
                return Some(widget);
            };

            if rsvp.show_button == Some(false) {
                widget.embed = Embed::Immediate { src };
                widget.loads = 1;
            } else {
                widget.button = Some(Link {
                    href: "#rsvpEmbedWrap".to_string(),
                    text: non_empty(&rsvp.button_text)
                        .unwrap_or("RSVP (open form here)")
                        .to_string(),
                    new_tab: false,
                });
                widget.embed = Embed::Deferred { src, loaded: false };
            }
        }
    }

    Some(widget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Kolkata;

    fn rsvp(json: &str) -> Option<RsvpWidget> {
        let config: Rsvp = serde_json::from_str(json).unwrap();
        resolve_rsvp(Some(&config), Kolkata)
    }

    #[test]
    fn disabled_rsvp_is_hidden() {
        assert!(rsvp(r#"{"formUrl": "https://forms.example/x"}"#).is_none());
        assert!(resolve_rsvp(None, Kolkata).is_none());
    }

    #[test]
    fn button_mode_links_out() {
        let widget = rsvp(
            r#"{"enabled": true, "formUrl": "https://forms.example/x", "deadline": "2025-11-20"}"#,
        )
        .unwrap();

        assert_eq!(widget.mode, RsvpMode::Button);
        let button = widget.button.as_ref().unwrap();
        assert_eq!(button.text, "RSVP Now");
        assert!(button.new_tab);
        assert_eq!(
            widget.open_in_new_tab.as_ref().unwrap().text,
            "Open in Google Forms"
        );
        assert_eq!(
            widget.deadline.as_deref(),
            Some("RSVP deadline: Thu, Nov 20, 2025, 12:00 AM")
        );
        assert!(!widget.embed_visible());
    }

    #[test]
    fn button_mode_without_form_keeps_only_title() {
        let mut widget = rsvp(r#"{"enabled": true, "title": "Let us know"}"#).unwrap();

        assert_eq!(widget.title, "Let us know");
        assert!(widget.button.is_none());
        assert!(widget.open_in_new_tab.is_none());
        assert!(widget.click().is_none());
    }

    #[test]
    fn embed_without_button_loads_immediately() {
        let widget = rsvp(
            r#"{"enabled": true, "mode": "embed", "showButton": false, "embedUrl": "https://forms.example/embed"}"#,
        )
        .unwrap();

        assert!(widget.embed_visible());
        assert_eq!(widget.embed_src(), Some("https://forms.example/embed"));
        assert_eq!(widget.load_count(), 1);
        assert!(widget.button.is_none());
    }

    #[test]
    fn embed_behind_button_loads_once_on_first_click() {
        let mut widget = rsvp(
            r#"{"enabled": true, "mode": "EMBED", "embedUrl": "https://forms.example/embed"}"#,
        )
        .unwrap();

        assert_eq!(widget.load_count(), 0);
        assert!(widget.embed_src().is_none());
        assert!(!widget.embed_visible());
        assert_eq!(widget.button.as_ref().unwrap().text, "RSVP (open form here)");

        let first = widget.click().unwrap();
        assert_eq!(first.load.as_deref(), Some("https://forms.example/embed"));
        assert!(first.scroll_into_view);

        for _ in 0..3 {
            let again = widget.click().unwrap();
            assert!(again.load.is_none());
            assert!(again.scroll_into_view);
        }

        assert_eq!(widget.load_count(), 1);
        assert!(widget.embed_visible());
    }

    #[test]
    fn embed_mode_without_embed_url_shows_nothing_to_click() {
        let widget = rsvp(r#"{"enabled": true, "mode": "embed", "formUrl": "https://forms.example/x"}"#)
            .unwrap();

        assert!(widget.button.is_none());
        assert!(widget.open_in_new_tab.is_some());
        assert_eq!(widget.embed, Embed::None);
    }
}
