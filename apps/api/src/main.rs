mod config;
mod errors;
mod geometry;
mod layout;
mod packing;
mod pricing;
mod quote;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Configurator API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Cushion widths: valise {} cm, p {} cm, g {} cm (auto tolerance {} cm)",
        config.cushion_width_valise_cm,
        config.cushion_width_small_cm,
        config.cushion_width_large_cm,
        config.auto_cushion_tolerance_cm
    );

    // Build app state: layout and pricing engines are constructed once and shared
    let state = AppState::from_config(&config);
    info!("Corner offset: {} cm", config.corner_offset_cm);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the configurator front-end origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
