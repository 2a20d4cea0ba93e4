//! Web layer for the transit journey planner.
//!
//! A thin JSON surface over the planning service, plus a reload endpoint
//! that swaps in a freshly built snapshot.

mod config;
mod dto;
mod routes;
mod state;

pub use config::{ConfigError, ServerConfig};
pub use dto::{ErrorResponse, ReloadResponse};
pub use routes::{AppError, create_router};
pub use state::AppState;
