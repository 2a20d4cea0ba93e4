//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::schedule::{LoadError, load_snapshot};
use crate::service::{PlanRequest, PlanStatus};

use super::dto::{ErrorResponse, ReloadResponse};
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/journey/plan", post(plan_journey))
        .route("/admin/reload", post(reload_snapshot))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Plan journeys.
///
/// The search is CPU-bound, so it runs on the blocking pool.
async fn plan_journey(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Response, AppError> {
    let service = state.service.clone();
    let response = tokio::task::spawn_blocking(move || service.plan(&request))
        .await
        .map_err(|e| AppError::Internal {
            message: format!("planning task failed: {e}"),
        })?;

    let status = match response.status {
        PlanStatus::Found | PlanStatus::NoJourney => StatusCode::OK,
        PlanStatus::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    Ok((status, Json(response)).into_response())
}

/// Re-read the schedule document and make it the live snapshot.
async fn reload_snapshot(State(state): State<AppState>) -> Result<Json<ReloadResponse>, AppError> {
    let path = state.snapshot_path.clone();
    let radius = state.service.config().proximity_transfer_radius_m;
    let snapshot = tokio::task::spawn_blocking(move || load_snapshot(path.as_path(), radius))
        .await
        .map_err(|e| AppError::Internal {
            message: format!("reload task failed: {e}"),
        })??;

    let (stops, trips, patterns) = (
        snapshot.stop_count(),
        snapshot.trip_count(),
        snapshot.patterns().len(),
    );
    let version = state.service.store().replace(snapshot);
    state.service.cache().invalidate_all();
    info!(version, stops, trips, patterns, "snapshot reloaded");

    Ok(Json(ReloadResponse {
        version,
        stops,
        trips,
        patterns,
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<LoadError> for AppError {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::Io { .. } => AppError::Internal {
                message: e.to_string(),
            },
            LoadError::Json { .. } | LoadError::Snapshot(_) => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => {
                warn!(%message, "bad request");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Internal { message } => {
                error!(%message, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
