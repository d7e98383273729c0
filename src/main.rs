mod commands;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use invite_core::InviteConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "invite")]
#[command(about = "Generate wedding invite calendars and preview password-gated invites")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a .ics calendar for every details document
    Calendars {
        /// Only generate the calendar for this slug
        #[arg(short, long)]
        slug: Option<String>,
    },
    /// Validate details documents before publishing them
    Check {
        /// Only check this slug
        #[arg(short, long)]
        slug: Option<String>,
    },
    /// Write the unlocked invite page as HTML
    Render {
        slug: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Use dark-mode decor
        #[arg(long)]
        dark: bool,

        /// Render as of this time (e.g. "2025-12-09T18:00"), for a stable countdown
        #[arg(long)]
        now: Option<String>,
    },
    /// Unlock an invite and preview it in the terminal
    Open {
        /// Slug in the data directory, or an http(s) URL of a details document
        target: String,

        /// Password (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget that an invite was unlocked
    Lock { slug: String },
    /// List the events in a generated calendar
    Events { slug: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = InviteConfig::load()?;

    match cli.command {
        Commands::Calendars { slug } => commands::calendars::run(&config, slug.as_deref()),
        Commands::Check { slug } => commands::check::run(&config, slug.as_deref()),
        Commands::Render {
            slug,
            out,
            dark,
            now,
        } => commands::render::run(&config, &slug, out, dark, now.as_deref()),
        Commands::Open { target, password } => {
            commands::open::run(&config, &target, password).await
        }
        Commands::Lock { slug } => commands::lock::run(&config, &slug),
        Commands::Events { slug } => commands::events::run(&config, &slug),
    }
}
