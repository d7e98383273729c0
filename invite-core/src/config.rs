//! Global invite configuration.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{InviteError, InviteResult};
use crate::ics::CalendarSettings;

static DEFAULT_DATA_DIR: &str = "public/weddings/data";
static DEFAULT_CALENDARS_DIR: &str = "public/weddings/calendars";
static DEFAULT_ASSETS_DIR: &str = "public/weddings/assets";
static DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_calendars_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CALENDARS_DIR)
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ASSETS_DIR)
}

fn default_site_domain() -> String {
    "localhost".to_string()
}

fn default_site_url() -> String {
    "http://localhost:4096".to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_reserved_slug() -> String {
    "template".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:4096".to_string()
}

/// Configuration shared by the CLI and the server.
///
/// Read from ~/.config/invite/config.toml, then ./invite.toml, then
/// `INVITE_*` environment variables (later sources win).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InviteConfig {
    /// Directory holding one `<slug>.json` details document per event
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory receiving the generated `<slug>.ics` files
    #[serde(default = "default_calendars_dir")]
    pub calendars_dir: PathBuf,

    /// Static files (decor images, photos) served by invite-server
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Domain used in calendar PRODID and event UIDs
    #[serde(default = "default_site_domain")]
    pub site_domain: String,

    /// Public base URL; relative calendar links are resolved against it
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// IANA zone the event times are expressed in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Slug skipped by batch calendar generation
    #[serde(default = "default_reserved_slug")]
    pub reserved_slug: String,

    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_store: Option<PathBuf>,
}

impl Default for InviteConfig {
    fn default() -> Self {
        InviteConfig {
            data_dir: default_data_dir(),
            calendars_dir: default_calendars_dir(),
            assets_dir: default_assets_dir(),
            site_domain: default_site_domain(),
            site_url: default_site_url(),
            timezone: default_timezone(),
            reserved_slug: default_reserved_slug(),
            bind: default_bind(),
            unlock_store: None,
        }
    }
}

impl InviteConfig {
    pub fn config_path() -> InviteResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| InviteError::Config("Could not determine config directory".into()))?
            .join("invite");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user config (creating a commented default on first run),
    /// overlaid by ./invite.toml and the environment.
    pub fn load() -> InviteResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&[config_path, PathBuf::from("invite.toml")])
    }

    /// Load from explicit files (missing files are ignored) plus the environment.
    pub fn load_from(paths: &[PathBuf]) -> InviteResult<Self> {
        let mut builder = Config::builder();
        for path in paths {
            builder = builder.add_source(File::from(path.clone()).required(false));
        }

        builder
            .add_source(Environment::with_prefix("INVITE"))
            .build()
            .map_err(|e| InviteError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| InviteError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> InviteResult<()> {
        let contents = format!(
            "\
# invite configuration

# Where the <slug>.json details documents live:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# Where generated <slug>.ics calendars are written:
# calendars_dir = \"{DEFAULT_CALENDARS_DIR}\"

# Domain used for calendar UIDs:
# site_domain = \"example.com\"

# Time zone of the event times:
# timezone = \"{DEFAULT_TIMEZONE}\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                InviteError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| InviteError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn data_path(&self) -> PathBuf {
        expand(&self.data_dir)
    }

    pub fn calendars_path(&self) -> PathBuf {
        expand(&self.calendars_dir)
    }

    pub fn assets_path(&self) -> PathBuf {
        expand(&self.assets_dir)
    }

    /// Location of the details document for `slug`.
    pub fn details_path(&self, slug: &str) -> PathBuf {
        self.data_path().join(format!("{slug}.json"))
    }

    /// Location of the generated calendar for `slug`.
    pub fn calendar_path(&self, slug: &str) -> PathBuf {
        self.calendars_path().join(format!("{slug}.ics"))
    }

    /// Site-relative URL the calendar for `slug` is served from.
    pub fn calendar_url(&self, slug: &str) -> String {
        format!("/weddings/calendars/{slug}.ics")
    }

    pub fn unlock_store_path(&self) -> InviteResult<PathBuf> {
        if let Some(ref path) = self.unlock_store {
            return Ok(expand(path));
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| InviteError::Config("Could not determine data directory".into()))?;

        Ok(data_dir.join("invite").join("unlocked.json"))
    }

    pub fn tz(&self) -> InviteResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| InviteError::Config(format!("Unknown time zone '{}'", self.timezone)))
    }

    pub fn calendar_settings(&self) -> InviteResult<CalendarSettings> {
        Ok(CalendarSettings {
            domain: self.site_domain.clone(),
            timezone: self.tz()?,
        })
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
