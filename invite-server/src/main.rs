mod cookies;
mod routes;
mod state;

use anyhow::{Context, Result};
use invite_core::InviteConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = InviteConfig::load()?;
    let bind = config.bind.clone();
    let state = AppState::new(config)?;

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Could not bind {}", bind))?;
    info!("invite-server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
