//! Planning requests as received from callers.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{ServiceTime, StopId};
use crate::planner::Strategy;
use crate::schedule::ScheduleSnapshot;

/// Upper bound on journeys returned for one request.
pub const MAX_ALTERNATIVES_CAP: usize = 10;

/// A journey planning request.
///
/// Each endpoint may list several stop ids; a parent station also stands
/// for all of its platforms. Omitted fields take their defaults from the
/// service configuration and clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub origin_ids: Vec<String>,
    pub destination_ids: Vec<String>,
    #[serde(default)]
    pub departure_time: Option<ServiceTime>,
    #[serde(default)]
    pub travel_date: Option<NaiveDate>,
    #[serde(default)]
    pub max_transfers: Option<usize>,
    #[serde(default)]
    pub max_alternatives: Option<usize>,
    #[serde(default)]
    pub strategy: Strategy,
}

impl PlanRequest {
    /// A request between two sets of stops, everything else defaulted.
    pub fn new<O, D>(origin_ids: O, destination_ids: D) -> Self
    where
        O: IntoIterator,
        O::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            origin_ids: origin_ids.into_iter().map(Into::into).collect(),
            destination_ids: destination_ids.into_iter().map(Into::into).collect(),
            departure_time: None,
            travel_date: None,
            max_transfers: None,
            max_alternatives: None,
            strategy: Strategy::default(),
        }
    }

    pub fn departing_at(mut self, time: ServiceTime) -> Self {
        self.departure_time = Some(time);
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.travel_date = Some(date);
        self
    }

    pub fn max_transfers(mut self, max_transfers: usize) -> Self {
        self.max_transfers = Some(max_transfers);
        self
    }

    pub fn max_alternatives(mut self, max_alternatives: usize) -> Self {
        self.max_alternatives = Some(max_alternatives);
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Resolve endpoint ids to snapshot stops.
///
/// Parent stations expand to themselves followed by their platforms.
/// Duplicates are dropped, first occurrence wins. Returns the first id that
/// does not name a stop as the error.
pub(crate) fn expand_endpoint(
    snapshot: &ScheduleSnapshot,
    ids: &[String],
) -> Result<Vec<StopId>, String> {
    let mut seen = HashSet::new();
    let mut stops = Vec::new();

    for raw in ids {
        let Some(idx) = StopId::parse(raw)
            .ok()
            .and_then(|id| snapshot.stop_idx(&id))
        else {
            return Err(raw.clone());
        };

        let expanded = std::iter::once(idx).chain(snapshot.platforms_of(idx).iter().copied());
        for stop in expanded {
            if seen.insert(stop) {
                stops.push(snapshot.stop(stop).id.clone());
            }
        }
    }

    Ok(stops)
}
