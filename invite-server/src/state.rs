use std::sync::Arc;

use anyhow::Result;
use invite_core::error::InviteResult;
use invite_core::render::RenderOptions;
use invite_core::{Details, InviteConfig, loader};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    // Details are read on every request so edits show up without a restart
    config: Arc<InviteConfig>,
}

impl AppState {
    pub fn new(config: InviteConfig) -> Result<Self> {
        // Fail at startup rather than on the first request
        config.tz()?;
        Ok(AppState {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &InviteConfig {
        &self.config
    }

    /// Whether `slug` names a publishable invite.
    pub fn is_valid_slug(&self, slug: &str) -> bool {
        !slug.is_empty()
            && slug != self.config.reserved_slug
            && slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    pub fn load(&self, slug: &str) -> InviteResult<Details> {
        loader::load_slug(&self.config, slug)
    }

    pub fn render_options(&self) -> InviteResult<RenderOptions> {
        RenderOptions::from_config(&self.config)
    }
}
