//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::planner::PlannerConfig;
use crate::service::CacheConfig;

/// Error reading the server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Everything the binary needs to start serving.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path of the schedule document
    pub snapshot_path: PathBuf,
    pub addr: SocketAddr,
    pub cache: CacheConfig,
    pub planner: PlannerConfig,
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    ///
    /// - `TRANSIT_SNAPSHOT`: schedule document path (required)
    /// - `TRANSIT_ADDR`: listen address, default `127.0.0.1:3000`
    /// - `TRANSIT_CACHE_TTL_SECS`: response cache TTL, default 60
    /// - `TRANSIT_PROXIMITY_RADIUS_M`: radius for derived walking transfers,
    ///   default 0 (off)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let snapshot_path = lookup("TRANSIT_SNAPSHOT")
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("TRANSIT_SNAPSHOT"))?;

        let addr = parse_or(&lookup, "TRANSIT_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000)))?;
        let ttl_secs = parse_or(&lookup, "TRANSIT_CACHE_TTL_SECS", 60u64)?;
        let radius = parse_or(&lookup, "TRANSIT_PROXIMITY_RADIUS_M", 0.0f64)?;
        if !radius.is_finite() || radius < 0.0 {
            return Err(ConfigError::Invalid {
                var: "TRANSIT_PROXIMITY_RADIUS_M",
                value: radius.to_string(),
            });
        }

        Ok(Self {
            snapshot_path,
            addr,
            cache: CacheConfig {
                ttl: Duration::from_secs(ttl_secs),
                ..CacheConfig::default()
            },
            planner: PlannerConfig {
                proximity_transfer_radius_m: radius,
                ..PlannerConfig::default()
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
