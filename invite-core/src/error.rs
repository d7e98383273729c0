//! Error types for the invite crates.

use thiserror::Error;

/// Errors that can occur while loading, rendering or exporting an invite.
#[derive(Error, Debug)]
pub enum InviteError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invite details not found: {0}")]
    NotFound(String),

    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid value for '{field}': {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("Invalid invite details: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for invite operations.
pub type InviteResult<T> = Result<T, InviteError>;
