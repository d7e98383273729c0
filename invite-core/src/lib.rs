//! Core library for password-gated wedding invites.
//!
//! - `details` parses the per-slug JSON document
//! - `gate` decides whether an invite is unlocked
//! - `render` turns a document into page regions, `html` writes them out
//! - `session` keeps the countdown and decor live
//! - `ics` generates and reads calendar documents

pub mod clock;
pub mod config;
pub mod details;
pub mod error;
pub mod gate;
pub mod html;
pub mod ics;
pub mod loader;
pub mod render;
pub mod session;
pub mod time;

pub use config::InviteConfig;
pub use details::Details;
pub use error::{InviteError, InviteResult};
pub use gate::{FileUnlockStore, Gate, GateState, UnlockStore};
pub use session::InviteSession;
