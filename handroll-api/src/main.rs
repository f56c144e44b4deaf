use std::net::SocketAddr;

use anyhow::Context;
use handroll_api::{app, app_config::Config, AppState};
use handroll_catalog::Catalog;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "handroll_api=debug,handroll_order=debug,handroll_catalog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    let catalog = Catalog::menu().context("Built-in menu is invalid")?;
    tracing::info!(
        "Starting {} with {} products on port {}",
        config.shop.business_name,
        catalog.len(),
        config.server.port
    );

    let app = app(AppState::new(catalog, config.shop));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
