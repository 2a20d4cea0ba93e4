//! Journey planners over a schedule snapshot.
//!
//! `RaptorPlanner` is the primary planner: a round-based search returning
//! the Pareto frontier over arrival time and number of transfers.
//! `EarliestArrivalPlanner` is a single-criterion Dijkstra kept as an
//! alternative strategy. Both only read the snapshot, so any number of
//! queries may run against it in parallel.

mod config;
mod earliest;
mod query;
mod raptor;
mod rank;
mod reconstruct;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod raptor_tests;

use serde::{Deserialize, Serialize};

use crate::domain::Journey;
use crate::schedule::ScheduleSnapshot;

pub use config::{MAX_ROUNDS, PlannerConfig, TRANSFER_PENALTY_SECONDS};
pub use earliest::EarliestArrivalPlanner;
pub use query::{PlanError, PlanQuery};
pub use raptor::RaptorPlanner;
pub use rank::{deduplicate, pareto_frontier, rank_journeys, remove_dominated};

/// Anything that can answer a planning query.
pub trait JourneyPlanner {
    /// Journeys for the query, best first.
    fn plan(&self, query: &PlanQuery) -> Result<Vec<Journey>, PlanError>;
}

impl JourneyPlanner for RaptorPlanner<'_> {
    fn plan(&self, query: &PlanQuery) -> Result<Vec<Journey>, PlanError> {
        RaptorPlanner::plan(self, query)
    }
}

impl JourneyPlanner for EarliestArrivalPlanner<'_> {
    fn plan(&self, query: &PlanQuery) -> Result<Vec<Journey>, PlanError> {
        EarliestArrivalPlanner::plan(self, query)
    }
}

/// Which planner answers a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Pareto-optimal journeys over arrival time and transfers.
    #[default]
    Raptor,
    /// The single earliest arrival, ignoring transfers.
    EarliestArrival,
}

impl Strategy {
    /// Build the planner for this strategy.
    pub fn planner<'a>(
        self,
        snapshot: &'a ScheduleSnapshot,
        config: &'a PlannerConfig,
    ) -> Box<dyn JourneyPlanner + 'a> {
        match self {
            Strategy::Raptor => Box::new(RaptorPlanner::new(snapshot, config)),
            Strategy::EarliestArrival => Box::new(EarliestArrivalPlanner::new(snapshot, config)),
        }
    }
}
