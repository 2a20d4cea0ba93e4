//! Round-based multi-criteria search (RAPTOR).
//!
//! Round `k` computes, for every stop, the earliest arrival using at most `k`
//! vehicles. Each round scans every route pattern touched by a stop improved
//! in the previous round exactly once, left to right, then relaxes walking
//! transfers from the stops the scan improved. The journeys reaching a
//! destination in any round form the candidate set for the Pareto frontier
//! over arrival time and number of transfers.

use std::collections::BTreeMap;

use tracing::{debug, error, trace};

use crate::domain::{Journey, ServiceTime};
use crate::schedule::{PatternIdx, ScheduleSnapshot, ServiceDay, StopIdx, TripIdx};

use super::config::PlannerConfig;
use super::query::{PlanError, PlanQuery};
use super::rank::pareto_frontier;
use super::reconstruct::reconstruct;

/// How a stop was reached in a given round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LabelKind {
    /// The stop is one of the query's origins.
    Origin,
    /// Alighted from `trip`, boarded at `boarding_stop` in an earlier round.
    Transit {
        trip: TripIdx,
        boarding_stop: StopIdx,
        boarding_position: usize,
        alight_position: usize,
    },
    /// Walked from a stop reached by transit in the same round
    /// (or from an origin in round 0).
    Walk { from: StopIdx, walk_seconds: u32 },
}

/// Best known arrival at a stop in one round, and how it was achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Label {
    pub arrival: ServiceTime,
    pub kind: LabelKind,
}

/// Labels of every round of one search.
///
/// `transit` holds the transit-only labels, so a walk label always refers to
/// the vehicle arrival it continues from even if the walk later improved the
/// same stop.
#[derive(Debug, Default)]
pub(super) struct RoundLabels {
    labels: Vec<Vec<Option<Label>>>,
    transit: Vec<Vec<Option<Label>>>,
}

impl RoundLabels {
    fn push_round(&mut self, stop_count: usize) {
        self.labels.push(vec![None; stop_count]);
        self.transit.push(vec![None; stop_count]);
    }

    pub(super) fn rounds(&self) -> usize {
        self.labels.len()
    }

    pub(super) fn get(&self, round: usize, stop: StopIdx) -> Option<Label> {
        self.labels.get(round)?.get(stop.index()).copied().flatten()
    }

    pub(super) fn transit(&self, round: usize, stop: StopIdx) -> Option<Label> {
        self.transit.get(round)?.get(stop.index()).copied().flatten()
    }

    /// The most recent label at `stop` from a round before `round`.
    pub(super) fn latest_before(&self, round: usize, stop: StopIdx) -> Option<(usize, Label)> {
        (0..round)
            .rev()
            .find_map(|r| self.get(r, stop).map(|label| (r, label)))
    }
}

/// Whether `time` is strictly earlier than an optional bound.
fn earlier(time: ServiceTime, bound: Option<ServiceTime>) -> bool {
    bound.is_none_or(|b| time < b)
}

/// Trip currently held during a pattern scan.
#[derive(Debug, Clone, Copy)]
struct Boarding {
    trip: TripIdx,
    stop: StopIdx,
    position: usize,
}

/// Per-query search state. Nothing here outlives one `plan` call.
struct Search<'a> {
    snapshot: &'a ScheduleSnapshot,
    day: &'a ServiceDay,
    penalty: u32,
    is_destination: Vec<bool>,
    /// Best arrival per stop over all rounds so far.
    best: Vec<Option<ServiceTime>>,
    /// Best arrival per stop by vehicle; only these arrivals may walk on.
    best_transit: Vec<Option<ServiceTime>>,
    /// Best arrival at any destination using at least one vehicle.
    target_best: Option<ServiceTime>,
    labels: RoundLabels,
    labels_written: usize,
}

impl<'a> Search<'a> {
    fn new(
        snapshot: &'a ScheduleSnapshot,
        day: &'a ServiceDay,
        destinations: &[StopIdx],
        penalty: u32,
    ) -> Self {
        let stop_count = snapshot.stop_count();
        let mut is_destination = vec![false; stop_count];
        for stop in destinations {
            is_destination[stop.index()] = true;
        }

        Self {
            snapshot,
            day,
            penalty,
            is_destination,
            best: vec![None; stop_count],
            best_transit: vec![None; stop_count],
            target_best: None,
            labels: RoundLabels::default(),
            labels_written: 0,
        }
    }

    /// Run up to `rounds` rounds; returns how many actually ran.
    fn run(&mut self, origins: &[StopIdx], departure: ServiceTime, rounds: usize) -> usize {
        let stop_count = self.snapshot.stop_count();
        self.labels.push_round(stop_count);

        let mut marked = Vec::with_capacity(origins.len());
        for &origin in origins {
            let label = Label {
                arrival: departure,
                kind: LabelKind::Origin,
            };
            self.write(0, origin, label);
            marked.push(origin);
        }
        marked.extend(self.relax_origin_transfers(origins, departure));
        marked.sort_unstable();
        marked.dedup();

        let mut rounds_run = 0;
        for round in 1..=rounds {
            if marked.is_empty() {
                break;
            }

            let prev = self.best.clone();
            self.labels.push_round(stop_count);

            let improved = self.scan_patterns(round, &marked, &prev);
            let walked = self.relax_transfers(round, &improved);

            trace!(
                round,
                marked = marked.len(),
                improved = improved.len(),
                walked = walked.len(),
                "round complete"
            );

            marked = improved;
            marked.extend(walked);
            marked.sort_unstable();
            marked.dedup();
            rounds_run = round;
        }
        rounds_run
    }

    /// Whether arriving at `stop` at `arrival` beats both the stop's best
    /// and the best known arrival at the destination.
    fn improves(&self, stop: StopIdx, arrival: ServiceTime) -> bool {
        earlier(arrival, self.best[stop.index()]) && earlier(arrival, self.target_best)
    }

    fn write(&mut self, round: usize, stop: StopIdx, label: Label) {
        let i = stop.index();
        self.labels.labels[round][i] = Some(label);
        self.best[i] = Some(label.arrival);
        if round > 0 && self.is_destination[i] {
            self.target_best = Some(
                self.target_best
                    .map_or(label.arrival, |best| best.min(label.arrival)),
            );
        }
        self.labels_written += 1;
    }

    /// Walk from the origins before the first boarding.
    ///
    /// Destinations are skipped: a journey must use at least one vehicle.
    fn relax_origin_transfers(&mut self, origins: &[StopIdx], departure: ServiceTime) -> Vec<StopIdx> {
        let snapshot = self.snapshot;
        let mut walked = Vec::new();
        for &origin in origins {
            for edge in snapshot.transfers_from(origin) {
                if self.is_destination[edge.to.index()] {
                    continue;
                }
                let arrival = departure + edge.walk_seconds + self.penalty;
                if earlier(arrival, self.best[edge.to.index()]) {
                    let label = Label {
                        arrival,
                        kind: LabelKind::Walk {
                            from: origin,
                            walk_seconds: edge.walk_seconds,
                        },
                    };
                    self.write(0, edge.to, label);
                    walked.push(edge.to);
                }
            }
        }
        walked
    }

    /// Scan every pattern serving a marked stop, from its earliest marked
    /// position. Returns the stops whose best vehicle arrival improved.
    fn scan_patterns(
        &mut self,
        round: usize,
        marked: &[StopIdx],
        prev: &[Option<ServiceTime>],
    ) -> Vec<StopIdx> {
        let mut queue: BTreeMap<PatternIdx, usize> = BTreeMap::new();
        for &stop in marked {
            for at in self.snapshot.route_patterns_at_stop(stop) {
                queue
                    .entry(at.pattern)
                    .and_modify(|position| *position = (*position).min(at.position))
                    .or_insert(at.position);
            }
        }

        let mut improved = Vec::new();
        for (pattern, start) in queue {
            self.scan_pattern(round, pattern, start, prev, &mut improved);
        }
        improved.sort_unstable();
        improved.dedup();
        improved
    }

    fn scan_pattern(
        &mut self,
        round: usize,
        pattern: PatternIdx,
        start: usize,
        prev: &[Option<ServiceTime>],
        improved: &mut Vec<StopIdx>,
    ) {
        let snapshot = self.snapshot;
        let stops = snapshot.pattern_stop_sequence(pattern);
        let mut boarded: Option<Boarding> = None;

        for (position, &stop) in stops.iter().enumerate().skip(start) {
            if let Some(boarding) = boarded {
                let arrival = snapshot.arrival(boarding.trip, position);
                let i = stop.index();
                // A walk may have reached the stop earlier, but only a vehicle
                // arrival can continue on foot
                if earlier(arrival, self.best_transit[i]) && earlier(arrival, self.target_best) {
                    let label = Label {
                        arrival,
                        kind: LabelKind::Transit {
                            trip: boarding.trip,
                            boarding_stop: boarding.stop,
                            boarding_position: boarding.position,
                            alight_position: position,
                        },
                    };
                    self.labels.transit[round][i] = Some(label);
                    self.best_transit[i] = Some(arrival);
                    if self.improves(stop, arrival) {
                        self.write(round, stop, label);
                    }
                    improved.push(stop);
                }
            }

            if position + 1 == stops.len() {
                break;
            }

            // Only arrivals from earlier rounds may board here
            let Some(ready) = prev[stop.index()] else {
                continue;
            };
            let catchable = boarded
                .is_none_or(|held| ready <= snapshot.departure(held.trip, position));
            if !catchable {
                continue;
            }
            if let Some(trip) = snapshot.earliest_trip(pattern, position, ready, self.day) {
                let switch = boarded.is_none_or(|held| {
                    snapshot.departure(trip, position) < snapshot.departure(held.trip, position)
                });
                if switch {
                    boarded = Some(Boarding {
                        trip,
                        stop,
                        position,
                    });
                }
            }
        }
    }

    /// Walk from stops improved by transit this round. Walks never chain.
    fn relax_transfers(&mut self, round: usize, improved: &[StopIdx]) -> Vec<StopIdx> {
        let snapshot = self.snapshot;
        let mut walked = Vec::new();
        for &from in improved {
            let Some(source) = self.labels.transit(round, from) else {
                continue;
            };
            for edge in snapshot.transfers_from(from) {
                let arrival = source.arrival + edge.walk_seconds + self.penalty;
                if self.improves(edge.to, arrival) {
                    let label = Label {
                        arrival,
                        kind: LabelKind::Walk {
                            from,
                            walk_seconds: edge.walk_seconds,
                        },
                    };
                    self.write(round, edge.to, label);
                    walked.push(edge.to);
                }
            }
        }
        walked.sort_unstable();
        walked.dedup();
        walked
    }
}

/// Multi-criteria journey planner over one snapshot.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use transit_planner::domain::{RouteId, RouteType, ServiceId, ServiceTime, StopId, TripId};
/// use transit_planner::planner::{PlanQuery, PlannerConfig, RaptorPlanner};
/// use transit_planner::schedule::{Route, ServiceCalendar, SnapshotBuilder, Stop, StopTime, TripRecord};
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let stop = |id: &str| Stop {
///     id: StopId::parse(id).unwrap(),
///     name: id.into(),
///     lat: 0.0,
///     lon: 0.0,
///     parent_station: None,
/// };
/// let call = |stop: &str, seq: u32, t: &str| StopTime {
///     trip_id: TripId::parse("T1").unwrap(),
///     stop_id: StopId::parse(stop).unwrap(),
///     stop_sequence: seq,
///     arrival_time: ServiceTime::parse(t).unwrap(),
///     departure_time: ServiceTime::parse(t).unwrap(),
/// };
///
/// let snapshot = SnapshotBuilder::new()
///     .stop(stop("A"))
///     .stop(stop("C"))
///     .route(Route {
///         id: RouteId::parse("L1").unwrap(),
///         short_name: "1".into(),
///         long_name: String::new(),
///         route_type: RouteType::Metro,
///         agency: None,
///     })
///     .calendar(ServiceCalendar::daily(ServiceId::parse("ALL").unwrap(), day, day))
///     .trip(TripRecord {
///         id: TripId::parse("T1").unwrap(),
///         route_id: RouteId::parse("L1").unwrap(),
///         service_id: ServiceId::parse("ALL").unwrap(),
///         headsign: None,
///     })
///     .stop_time(call("A", 1, "08:00:00"))
///     .stop_time(call("C", 2, "08:20:00"))
///     .build()
///     .unwrap();
///
/// let config = PlannerConfig::default();
/// let query = PlanQuery::new(
///     vec![StopId::parse("A").unwrap()],
///     vec![StopId::parse("C").unwrap()],
///     ServiceTime::parse("08:00:00").unwrap(),
///     day,
///     2,
/// );
///
/// let journeys = RaptorPlanner::new(&snapshot, &config).plan(&query).unwrap();
/// assert_eq!(journeys.len(), 1);
/// assert_eq!(journeys[0].transfers(), 0);
/// assert_eq!(journeys[0].duration_minutes(), 20);
/// ```
pub struct RaptorPlanner<'a> {
    snapshot: &'a ScheduleSnapshot,
    config: &'a PlannerConfig,
}

impl<'a> RaptorPlanner<'a> {
    /// Create a new planner.
    pub fn new(snapshot: &'a ScheduleSnapshot, config: &'a PlannerConfig) -> Self {
        Self { snapshot, config }
    }

    /// Pareto-optimal journeys over (arrival time, transfers), earliest
    /// arrival first.
    ///
    /// An unreachable destination yields an empty list, not an error.
    pub fn plan(&self, query: &PlanQuery) -> Result<Vec<Journey>, PlanError> {
        let (origins, destinations) = query.resolve(self.snapshot)?;
        let day = self.snapshot.service_day(query.travel_date);
        let rounds = PlannerConfig::rounds_for(query.max_transfers);

        let mut search = Search::new(
            self.snapshot,
            &day,
            &destinations,
            self.config.transfer_penalty_seconds,
        );
        let rounds_run = search.run(&origins, query.departure_time, rounds);

        let labels = &search.labels;
        let mut candidates = Vec::new();
        for round in 1..labels.rounds() {
            for &destination in &destinations {
                if labels.get(round, destination).is_none() {
                    continue;
                }
                let journey = match reconstruct(
                    self.snapshot,
                    labels,
                    round,
                    destination,
                    self.config.transfer_penalty_seconds,
                ) {
                    Ok(journey) => journey,
                    Err(err) => {
                        error!(%err, round, "label chain is broken");
                        debug_assert!(false, "{err}");
                        return Err(err);
                    }
                };
                candidates.push(journey);
            }
        }

        let found = candidates.len();
        let mut journeys = pareto_frontier(candidates);
        debug_assert!(
            journeys
                .iter()
                .all(|journey| journey.transfers() <= query.max_transfers)
        );
        journeys.truncate(self.config.max_alternatives);

        debug!(
            origins = origins.len(),
            destinations = destinations.len(),
            rounds = rounds_run,
            labels = search.labels_written,
            candidates = found,
            journeys = journeys.len(),
            "raptor search finished"
        );

        Ok(journeys)
    }
}
