//! Page background.

use serde::Serialize;

use crate::details::{Background, Theme};

const GRADIENT_DIRECTION: &str = "bg-gradient-to-br";

/// What the theme wrapper shows behind the page. Built from scratch on
/// every application, so nothing from a previous theme can leak through.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ThemeView {
    #[default]
    Plain,
    /// Utility classes for the wrapper, direction class first
    Gradient { classes: Vec<String> },
    /// Cover-sized, centred, non-repeating background image
    Image { url: String },
}

impl ThemeView {
    /// Inline style for the wrapper element, if any.
    pub fn style(&self) -> Option<String> {
        match self {
            ThemeView::Image { url } => Some(format!(
                "background-image: url('{url}'); background-size: cover; \
                 background-position: center; background-repeat: no-repeat"
            )),
            _ => None,
        }
    }

    pub fn class_list(&self) -> String {
        match self {
            ThemeView::Gradient { classes } => classes.join(" "),
            _ => String::new(),
        }
    }
}

pub fn resolve_theme(theme: Option<&Theme>) -> ThemeView {
    let Some(theme) = theme else {
        return ThemeView::Plain;
    };

    match theme.background {
        Some(Background::Gradient) => match theme.gradient.as_deref() {
            Some(gradient) if !gradient.trim().is_empty() => {
                let classes = std::iter::once(GRADIENT_DIRECTION)
                    .chain(gradient.split_whitespace())
                    .map(str::to_string)
                    .collect();
                ThemeView::Gradient { classes }
            }
            _ => ThemeView::Plain,
        },
        Some(Background::Image) => match theme.image_url.as_deref() {
            Some(url) if !url.is_empty() => ThemeView::Image {
                url: url.to_string(),
            },
            _ => ThemeView::Plain,
        },
        None => ThemeView::Plain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme(json: &str) -> Theme {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn gradient_classes_follow_direction() {
        let view = resolve_theme(Some(&theme(
            r#"{"background": "gradient", "gradient": "from-rose-50  via-white to-amber-50"}"#,
        )));
        assert_eq!(
            view.class_list(),
            "bg-gradient-to-br from-rose-50 via-white to-amber-50"
        );
        assert!(view.style().is_none());
    }

    #[test]
    fn image_background_is_cover() {
        let view = resolve_theme(Some(&theme(
            r#"{"background": "image", "imageUrl": "/bg.jpg", "gradient": "from-rose-50"}"#,
        )));
        assert_eq!(view, ThemeView::Image { url: "/bg.jpg".into() });
        assert!(view.style().unwrap().contains("background-size: cover"));
        assert_eq!(view.class_list(), "");
    }

    #[test]
    fn incomplete_theme_is_plain() {
        assert_eq!(
            resolve_theme(Some(&theme(r#"{"background": "image"}"#))),
            ThemeView::Plain
        );
        assert_eq!(resolve_theme(None), ThemeView::Plain);
    }

    #[test]
    fn reapplying_replaces_previous_state() {
        let gradient = theme(r#"{"background": "gradient", "gradient": "from-rose-50"}"#);
        let image = theme(r#"{"background": "image", "imageUrl": "/bg.jpg"}"#);

        let first = resolve_theme(Some(&gradient));
        let second = resolve_theme(Some(&image));
        assert_eq!(second.class_list(), "");
        assert_ne!(first, second);

        let third = resolve_theme(Some(&gradient));
        assert_eq!(first, third);
        assert!(third.style().is_none());
    }
}
