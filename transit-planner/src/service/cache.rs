//! Caching layer for planning responses.
//!
//! Entries are keyed by the snapshot version plus the request with every
//! default filled in, so a reloaded snapshot never serves stale answers
//! even before `invalidate_all` runs.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::sync::Cache as MokaCache;

use crate::domain::{ServiceTime, StopId};
use crate::planner::Strategy;

use super::response::PlanResponse;

/// A fully resolved request against one snapshot version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct PlanKey {
    pub version: u64,
    pub origins: Vec<StopId>,
    pub destinations: Vec<StopId>,
    pub departure_time: ServiceTime,
    pub travel_date: NaiveDate,
    pub max_transfers: usize,
    pub max_alternatives: usize,
    pub strategy: Strategy,
    /// Also search the previous service day, whose late trips may still
    /// be running at the requested time.
    pub include_previous_day: bool,
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Cache for planning responses.
///
/// Cheap to clone; clones share entries.
#[derive(Clone)]
pub struct PlanCache {
    responses: MokaCache<PlanKey, Arc<PlanResponse>>,
}

impl PlanCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let responses = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { responses }
    }

    pub(crate) fn get(&self, key: &PlanKey) -> Option<Arc<PlanResponse>> {
        self.responses.get(key)
    }

    pub(crate) fn insert(&self, key: PlanKey, response: Arc<PlanResponse>) {
        self.responses.insert(key, response);
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.responses.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.responses.invalidate_all();
    }
}
