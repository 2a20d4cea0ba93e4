//! Planning queries and their errors.

use chrono::NaiveDate;

use crate::domain::{ServiceTime, StopId};
use crate::schedule::{ScheduleSnapshot, StopIdx};

/// Error from journey planning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// An origin or destination id is not in the snapshot
    #[error("unknown stop: {0}")]
    UnknownStop(StopId),

    /// No origin or no destination stops were given
    #[error("origin and destination must each name at least one stop")]
    EmptyEndpoint,

    /// A label chain could not be turned into a journey
    #[error("journey reconstruction failed: {0}")]
    Reconstruction(String),
}

/// A single planning request against one snapshot.
///
/// Several origin or destination stops stand for one logical station
/// (e.g. its platforms).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanQuery {
    pub origins: Vec<StopId>,
    pub destinations: Vec<StopId>,
    pub departure_time: ServiceTime,
    pub travel_date: NaiveDate,
    pub max_transfers: usize,
}

impl PlanQuery {
    /// Create a new query.
    pub fn new(
        origins: Vec<StopId>,
        destinations: Vec<StopId>,
        departure_time: ServiceTime,
        travel_date: NaiveDate,
        max_transfers: usize,
    ) -> Self {
        Self {
            origins,
            destinations,
            departure_time,
            travel_date,
            max_transfers,
        }
    }

    /// Resolve both endpoint sets, sorted and without duplicates.
    pub(crate) fn resolve(
        &self,
        snapshot: &ScheduleSnapshot,
    ) -> Result<(Vec<StopIdx>, Vec<StopIdx>), PlanError> {
        if self.origins.is_empty() || self.destinations.is_empty() {
            return Err(PlanError::EmptyEndpoint);
        }
        Ok((
            resolve_stops(snapshot, &self.origins)?,
            resolve_stops(snapshot, &self.destinations)?,
        ))
    }
}

fn resolve_stops(snapshot: &ScheduleSnapshot, ids: &[StopId]) -> Result<Vec<StopIdx>, PlanError> {
    let mut stops = ids
        .iter()
        .map(|id| {
            snapshot
                .stop_idx(id)
                .ok_or_else(|| PlanError::UnknownStop(id.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    stops.sort_unstable();
    stops.dedup();
    Ok(stops)
}
