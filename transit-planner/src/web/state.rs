//! Application state for the web layer.

use std::path::PathBuf;
use std::sync::Arc;

use crate::service::PlanningService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Planning service over the live snapshot
    pub service: Arc<PlanningService>,

    /// Schedule document re-read on reload
    pub snapshot_path: Arc<PathBuf>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(service: PlanningService, snapshot_path: PathBuf) -> Self {
        Self {
            service: Arc::new(service),
            snapshot_path: Arc::new(snapshot_path),
        }
    }
}
