//! The planning service: request defaults, endpoint expansion, caching and
//! presentation around the planners.
//!
//! Every outcome is a `PlanResponse`. Unknown stops and empty results are
//! ordinary `NoJourney` answers; only faults inside the planner surface as
//! `Internal`.

mod cache;
mod clock;
mod presentation;
mod request;
mod response;

use std::sync::Arc;

use tracing::{debug, error, info};

use chrono::NaiveDate;

use crate::domain::{Journey, SECONDS_PER_DAY, ServiceTime};
use crate::planner::{PlanError, PlanQuery, PlannerConfig, Strategy, pareto_frontier};
use crate::schedule::{ScheduleSnapshot, SnapshotStore};

pub use cache::{CacheConfig, PlanCache};
pub use clock::{Clock, FixedClock, SystemClock};
pub use presentation::{
    JourneyView, LegView, PresentationError, StopView, TransitLegView, WalkingLegView,
};
pub use request::{MAX_ALTERNATIVES_CAP, PlanRequest};
pub use response::{NO_ROUTE_FOUND, NO_STOPS_GIVEN, PlanResponse, PlanStatus};

use cache::PlanKey;
use request::expand_endpoint;

/// Answers planning requests against the store's current snapshot.
pub struct PlanningService {
    store: SnapshotStore,
    cache: PlanCache,
    config: PlannerConfig,
    clock: Arc<dyn Clock>,
}

impl PlanningService {
    /// Create a service reading "now" from the system clock.
    pub fn new(store: SnapshotStore, cache: PlanCache, config: PlannerConfig) -> Self {
        Self {
            store,
            cache,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for defaulted times and dates.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn cache(&self) -> &PlanCache {
        &self.cache
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan journeys for a request.
    pub fn plan(&self, request: &PlanRequest) -> PlanResponse {
        if request.origin_ids.is_empty() || request.destination_ids.is_empty() {
            return PlanResponse::no_journey(NO_STOPS_GIVEN);
        }

        let (snapshot, version) = self.store.current_versioned();

        let origins = match expand_endpoint(&snapshot, &request.origin_ids) {
            Ok(stops) => stops,
            Err(id) => return PlanResponse::unknown_stop(&id),
        };
        let destinations = match expand_endpoint(&snapshot, &request.destination_ids) {
            Ok(stops) => stops,
            Err(id) => return PlanResponse::unknown_stop(&id),
        };

        let now = self.clock.now();
        let key = PlanKey {
            version,
            origins,
            destinations,
            departure_time: request
                .departure_time
                .unwrap_or_else(|| ServiceTime::from_naive_time(now.time())),
            travel_date: request.travel_date.unwrap_or_else(|| now.date()),
            max_transfers: request.max_transfers.unwrap_or(self.config.max_transfers),
            max_alternatives: alternatives(request.max_alternatives, self.config.max_alternatives),
            strategy: request.strategy,
            include_previous_day: request.departure_time.is_none()
                && request.travel_date.is_none(),
        };

        if let Some(cached) = self.cache.get(&key) {
            debug!(version, "plan cache hit");
            return PlanResponse::clone(&cached);
        }

        let response = self.search(&snapshot, &key);
        if response.status != PlanStatus::Internal {
            self.cache.insert(key, Arc::new(response.clone()));
        }
        response
    }

    fn search(&self, snapshot: &ScheduleSnapshot, key: &PlanKey) -> PlanResponse {
        let config = PlannerConfig {
            max_alternatives: key.max_alternatives,
            ..self.config.clone()
        };

        let mut journeys =
            match run(snapshot, &config, key, key.travel_date, key.departure_time) {
                Ok(journeys) => journeys,
                Err(response) => return response,
            };

        // Trips of the previous service day run past midnight with times
        // beyond 24:00:00; search them at the equivalent time and move the
        // results onto the requested day.
        if key.include_previous_day {
            if let Some(previous) = key.travel_date.pred_opt() {
                let departure = key.departure_time.plus_seconds(SECONDS_PER_DAY);
                let carried = match run(snapshot, &config, key, previous, departure) {
                    Ok(journeys) => journeys,
                    Err(response) => return response,
                };
                if !carried.is_empty() {
                    debug!(journeys = carried.len(), %previous, "previous service day journeys");
                    journeys.extend(
                        carried
                            .iter()
                            .filter_map(|journey| journey.shifted_earlier(SECONDS_PER_DAY)),
                    );
                    journeys = pareto_frontier(journeys);
                    if key.strategy == Strategy::EarliestArrival {
                        journeys.truncate(1);
                    }
                }
            }
        }

        if journeys.is_empty() {
            info!(
                origins = key.origins.len(),
                destinations = key.destinations.len(),
                departure = %key.departure_time,
                "no journey found"
            );
            return PlanResponse::no_journey(NO_ROUTE_FOUND);
        }

        let views = journeys
            .iter()
            .take(key.max_alternatives)
            .map(|journey| JourneyView::from_journey(journey, snapshot, key.travel_date))
            .collect::<Result<Vec<_>, _>>();
        match views {
            Ok(views) => {
                info!(journeys = views.len(), strategy = ?key.strategy, "journeys planned");
                PlanResponse::found(views)
            }
            Err(err) => {
                error!(error = %err, "journey presentation failed");
                PlanResponse::internal(err.to_string())
            }
        }
    }
}

/// Run the requested planner for one service day, mapping planner errors to
/// their responses.
fn run(
    snapshot: &ScheduleSnapshot,
    config: &PlannerConfig,
    key: &PlanKey,
    travel_date: NaiveDate,
    departure_time: ServiceTime,
) -> Result<Vec<Journey>, PlanResponse> {
    let query = PlanQuery::new(
        key.origins.clone(),
        key.destinations.clone(),
        departure_time,
        travel_date,
        key.max_transfers,
    );
    key.strategy
        .planner(snapshot, config)
        .plan(&query)
        .map_err(|err| match err {
            PlanError::UnknownStop(id) => PlanResponse::unknown_stop(id.as_str()),
            PlanError::EmptyEndpoint => PlanResponse::no_journey(NO_STOPS_GIVEN),
            err @ PlanError::Reconstruction(_) => {
                error!(error = %err, "planner fault");
                PlanResponse::internal(err.to_string())
            }
        })
}

/// Requested alternatives, defaulted and clamped to `1..=MAX_ALTERNATIVES_CAP`.
fn alternatives(requested: Option<usize>, default: usize) -> usize {
    requested.unwrap_or(default).clamp(1, MAX_ALTERNATIVES_CAP)
}
