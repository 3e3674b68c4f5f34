mod closures;
mod error;
mod polyline;
mod route;
mod router;
mod state;

use std::sync::Arc;

use axum::serve;
use detour_planner::{config::PlannerConfig, planner::RoutePlanner};
use tracing::{Level, info};

use crate::router::app_router;
use crate::state::AppState;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = PlannerConfig::from_env()?;

    info!(
        "Using closures API {} and Valhalla {}",
        config.closures_api_url, config.valhalla_url
    );

    let state = Arc::new(AppState::new(RoutePlanner::new(
        config.closures_client(),
        config.valhalla_client(),
    )));

    let listener = tokio::net::TcpListener::bind(config.api_addr).await?;
    info!("Listening on {}", config.api_addr);

    serve(listener, app_router(state)).await?;

    Ok(())
}
