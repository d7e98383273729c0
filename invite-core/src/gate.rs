//! The password gate in front of an invite.
//!
//! This is a courtesy lock meant to keep casual visitors out, not access
//! control: the secret lives in the details document and is compared as
//! plain text. Wrong guesses are never rate limited.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::details::Details;
use crate::error::InviteResult;

/// Storage key remembering that `slug` was unlocked.
pub fn unlock_key(slug: &str) -> String {
    format!("weddings-{slug}-unlocked")
}

/// Compare a candidate with the document's password after coercing both to
/// strings. A document without a password, or with an empty one, never
/// unlocks.
pub fn check_password(candidate: &str, details: &Details) -> bool {
    details.has_password()
        && details
            .password
            .as_ref()
            .is_some_and(|secret| secret.to_string() == candidate)
}

/// Where unlock flags persist between visits.
pub trait UnlockStore {
    fn is_unlocked(&self, slug: &str) -> bool;
    fn set_unlocked(&mut self, slug: &str) -> InviteResult<()>;
    fn clear(&mut self, slug: &str) -> InviteResult<()>;
}

/// Unlock flags kept in a small JSON object on disk, one
/// `"weddings-<slug>-unlocked": "true"` entry per slug.
#[derive(Debug)]
pub struct FileUnlockStore {
    path: PathBuf,
    flags: BTreeMap<String, String>,
}

impl FileUnlockStore {
    /// Open the store; a missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let flags = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        FileUnlockStore { path, flags }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> InviteResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.flags)?)?;
        Ok(())
    }
}

impl UnlockStore for FileUnlockStore {
    fn is_unlocked(&self, slug: &str) -> bool {
        self.flags.get(&unlock_key(slug)).map(String::as_str) == Some("true")
    }

    fn set_unlocked(&mut self, slug: &str) -> InviteResult<()> {
        self.flags.insert(unlock_key(slug), "true".to_string());
        self.save()
    }

    fn clear(&mut self, slug: &str) -> InviteResult<()> {
        if self.flags.remove(&unlock_key(slug)).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Locked { hint: Option<String> },
    Unlocked,
}

/// A loaded document behind its password.
pub struct Gate<S: UnlockStore> {
    slug: String,
    details: Details,
    store: S,
}

impl<S: UnlockStore> Gate<S> {
    pub fn new(slug: impl Into<String>, details: Details, store: S) -> Self {
        Gate {
            slug: slug.into(),
            details,
            store,
        }
    }

    pub fn state(&self) -> GateState {
        if self.store.is_unlocked(&self.slug) {
            GateState::Unlocked
        } else {
            GateState::Locked {
                hint: self
                    .details
                    .password_hint
                    .clone()
                    .filter(|h| !h.is_empty()),
            }
        }
    }

    /// Try a password. On a match the unlock flag is persisted so later
    /// visits skip the gate.
    pub fn attempt_unlock(&mut self, candidate: &str) -> InviteResult<bool> {
        if !check_password(candidate, &self.details) {
            debug!(slug = %self.slug, "password mismatch");
            return Ok(false);
        }

        if !self.store.is_unlocked(&self.slug) {
            self.store.set_unlocked(&self.slug)?;
        }
        Ok(true)
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give up the gate once unlocked, keeping the document.
    pub fn into_details(self) -> Details {
        self.details
    }
}
