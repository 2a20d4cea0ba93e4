use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transit_planner::schedule::{SnapshotStore, load_snapshot};
use transit_planner::service::{PlanCache, PlanningService};
use transit_planner::web::{AppState, ServerConfig, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(message) = run().await {
        error!("{message}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let config = ServerConfig::from_env().map_err(|e| e.to_string())?;

    // A schedule that fails validation never becomes active
    let snapshot = load_snapshot(
        &config.snapshot_path,
        config.planner.proximity_transfer_radius_m,
    )
    .map_err(|e| e.to_string())?;
    info!(
        stops = snapshot.stop_count(),
        trips = snapshot.trip_count(),
        patterns = snapshot.patterns().len(),
        "schedule loaded"
    );

    let cache = PlanCache::new(&config.cache);
    let service = PlanningService::new(SnapshotStore::new(snapshot), cache, config.planner.clone());
    let state = AppState::new(service, config.snapshot_path.clone());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| format!("cannot bind {}: {e}", config.addr))?;
    info!(addr = %config.addr, "transit planner listening");
    info!("endpoints: GET /health, POST /journey/plan, POST /admin/reload");

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("server error: {e}"))
}
