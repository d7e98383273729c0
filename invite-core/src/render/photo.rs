//! Couple photo under the names.

use serde::Serialize;

use crate::details::Media;

const DEFAULT_SIZE: f64 = 112.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoShape {
    Circle,
    Rounded,
}

impl PhotoShape {
    pub fn class(self) -> &'static str {
        match self {
            PhotoShape::Circle => "rounded-full",
            PhotoShape::Rounded => "rounded-2xl",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CouplePhotoView {
    pub src: String,
    pub alt: String,
    pub shape: PhotoShape,
    /// Pixels, used for both width and height
    pub size: f64,
}

/// `None` hides the photo; there is no placeholder.
pub fn resolve_photo(media: Option<&Media>) -> Option<CouplePhotoView> {
    let photo = media?.couple_photo.as_ref()?;
    if photo.enabled != Some(true) {
        return None;
    }
    let src = photo.src.clone().filter(|s| !s.is_empty())?;

    let shape = match photo.shape.as_deref().map(str::to_lowercase).as_deref() {
        Some("rounded") => PhotoShape::Rounded,
        _ => PhotoShape::Circle,
    };

    Some(CouplePhotoView {
        src,
        alt: photo.alt.clone().unwrap_or_default(),
        shape,
        size: photo
            .size
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(DEFAULT_SIZE),
    })
}
