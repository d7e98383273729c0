//! Decorative corner ornaments.
//!
//! Four images anchored to the page corners, each rotated by
//! `baseRotation + auto(corner) + override(corner)` degrees. Their opacity
//! depends on the light/dark theme mode, so the resolved view is
//! recomputed whenever the mode changes (see [`watch_decor`]).

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::details::{CornerOverride, DecorConfig, DecorMode, Details};

const DEFAULT_OPACITY_DARK: f64 = 0.16;
const DEFAULT_OPACITY_LIGHT: f64 = 0.28;
const DEFAULT_SIZE: f64 = 360.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Corner {
    #[serde(rename = "tl")]
    TopLeft,
    #[serde(rename = "tr")]
    TopRight,
    #[serde(rename = "bl")]
    BottomLeft,
    #[serde(rename = "br")]
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Corner::TopLeft => "tl",
            Corner::TopRight => "tr",
            Corner::BottomLeft => "bl",
            Corner::BottomRight => "br",
        }
    }

    /// Rotation that makes one image face inwards from every corner.
    pub fn auto_rotation(self) -> f64 {
        match self {
            Corner::TopLeft => 0.0,
            Corner::TopRight => 90.0,
            Corner::BottomLeft => -90.0,
            Corner::BottomRight => 180.0,
        }
    }

    fn settings(self, config: &DecorConfig) -> Option<&CornerOverride> {
        let corners = &config.corners;
        match self {
            Corner::TopLeft => corners.tl.as_ref(),
            Corner::TopRight => corners.tr.as_ref(),
            Corner::BottomLeft => corners.bl.as_ref(),
            Corner::BottomRight => corners.br.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CornerView {
    pub corner: Corner,
    pub image_url: String,
    /// Degrees
    pub rotation: f64,
    pub opacity: f64,
    /// Pixels, used for both width and height
    pub size: f64,
}

/// Resolved decor. `corners` only holds corners that have an image; the
/// group is hidden when it is empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DecorView {
    pub corners: Vec<CornerView>,
}

impl DecorView {
    pub fn is_visible(&self) -> bool {
        !self.corners.is_empty()
    }

    pub fn corner(&self, corner: Corner) -> Option<&CornerView> {
        self.corners.iter().find(|c| c.corner == corner)
    }
}

/// Resolve the corner ornaments for the given theme mode.
pub fn resolve_decor(config: Option<&DecorConfig>, mode: ThemeMode) -> DecorView {
    let Some(config) = config else {
        return DecorView::default();
    };
    if config.enabled != Some(true) || config.mode.unwrap_or(DecorMode::Corners) != DecorMode::Corners {
        return DecorView::default();
    }

    let opacity = match mode {
        ThemeMode::Dark => config.opacity_dark.unwrap_or(DEFAULT_OPACITY_DARK),
        ThemeMode::Light => config.opacity_light.unwrap_or(DEFAULT_OPACITY_LIGHT),
    };
    let size = config.size.filter(|s| s.is_finite()).unwrap_or(DEFAULT_SIZE);
    let base = config.base_rotation.filter(|r| r.is_finite()).unwrap_or(0.0);
    let auto_rotate = config.rotate != Some(false);

    let corners = Corner::ALL
        .into_iter()
        .filter_map(|corner| {
            let settings = corner.settings(config);
            let image_url = settings
                .and_then(|s| s.image_url.clone())
                .filter(|u| !u.is_empty())
                .or_else(|| config.image_url.clone().filter(|u| !u.is_empty()))?;

            let auto = if auto_rotate { corner.auto_rotation() } else { 0.0 };
            let extra = settings
                .and_then(|s| s.rotation)
                .filter(|r| r.is_finite())
                .unwrap_or(0.0);

            Some(CornerView {
                corner,
                image_url,
                rotation: base + auto + extra,
                opacity,
                size,
            })
        })
        .collect();

    DecorView { corners }
}

/// Keep a decor view in sync with theme-mode changes.
///
/// The spawned task owns its own handle on the active document, so it can
/// never observe a document other than the one it was started for. It ends
/// when the mode sender is dropped; abort the handle to stop it earlier.
pub fn watch_decor(
    details: Arc<Details>,
    mut modes: watch::Receiver<ThemeMode>,
) -> (watch::Receiver<DecorView>, JoinHandle<()>) {
    let initial = resolve_decor(details.decor(), *modes.borrow_and_update());
    let (tx, rx) = watch::channel(initial);

    let task = tokio::spawn(async move {
        while modes.changed().await.is_ok() {
            let mode = *modes.borrow_and_update();
            if tx.send(resolve_decor(details.decor(), mode)).is_err() {
                break;
            }
        }
    });

    (rx, task)
}
