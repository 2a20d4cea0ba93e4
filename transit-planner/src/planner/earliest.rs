//! Single-criterion earliest-arrival planner.
//!
//! A time-dependent Dijkstra over stop states: a stop reached on foot and
//! the same stop reached by vehicle are distinct nodes, since only the latter
//! may walk on. A settled node boards the earliest catchable trip of every
//! pattern serving its stop and relaxes each later stop of that trip, plus
//! its walking transfers. It ignores the number of transfers and returns at
//! most one journey.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::domain::{Journey, JourneyLeg, ServiceTime, TransitLeg, WalkingLeg};
use crate::schedule::{PatternStop, ScheduleSnapshot, StopIdx, TripIdx};

use super::config::PlannerConfig;
use super::query::{PlanError, PlanQuery};

/// How a stop was last entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Mode {
    /// At an origin or after a walk.
    Foot,
    /// Just alighted from a vehicle.
    Vehicle,
}

/// A stop together with how it was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Node {
    stop: StopIdx,
    mode: Mode,
}

impl Node {
    fn index(self) -> usize {
        self.stop.index() * 2 + self.mode as usize
    }

    fn other(self) -> Node {
        let mode = match self.mode {
            Mode::Foot => Mode::Vehicle,
            Mode::Vehicle => Mode::Foot,
        };
        Node { mode, ..self }
    }
}

/// How the best arrival at a node was reached.
#[derive(Debug, Clone, Copy)]
enum Step {
    Origin,
    Ride {
        trip: TripIdx,
        from: Node,
        boarding_position: usize,
        alight_position: usize,
    },
    Walk {
        from: Node,
        walk_seconds: u32,
    },
}

/// Earliest-arrival planner using a priority queue.
pub struct EarliestArrivalPlanner<'a> {
    snapshot: &'a ScheduleSnapshot,
    config: &'a PlannerConfig,
}

impl<'a> EarliestArrivalPlanner<'a> {
    /// Create a new planner.
    pub fn new(snapshot: &'a ScheduleSnapshot, config: &'a PlannerConfig) -> Self {
        Self { snapshot, config }
    }

    /// The single earliest-arriving journey, if any.
    pub fn plan(&self, query: &PlanQuery) -> Result<Vec<Journey>, PlanError> {
        let snapshot = self.snapshot;
        let (origins, destinations) = query.resolve(snapshot)?;
        let day = snapshot.service_day(query.travel_date);
        let penalty = self.config.transfer_penalty_seconds;

        let stop_count = snapshot.stop_count();
        let mut is_destination = vec![false; stop_count];
        for stop in &destinations {
            is_destination[stop.index()] = true;
        }

        let node_count = stop_count * 2;
        let mut arrival: Vec<Option<ServiceTime>> = vec![None; node_count];
        let mut via: Vec<Option<Step>> = vec![None; node_count];
        // Whether the path to a node uses at least one vehicle
        let mut rode = vec![false; node_count];
        let mut settled = vec![false; node_count];
        let mut heap = BinaryHeap::new();

        for &stop in &origins {
            let node = Node {
                stop,
                mode: Mode::Foot,
            };
            arrival[node.index()] = Some(query.departure_time);
            via[node.index()] = Some(Step::Origin);
            heap.push(Reverse((query.departure_time, node)));
        }

        let mut settled_count = 0usize;
        while let Some(Reverse((time, node))) = heap.pop() {
            let i = node.index();
            if settled[i] {
                continue;
            }
            settled[i] = true;
            settled_count += 1;

            if is_destination[node.stop.index()] && rode[i] {
                debug!(settled = settled_count, arrival = %time, "earliest arrival found");
                let journey = self.reconstruct(node, &arrival, &via)?;
                return Ok(vec![journey]);
            }

            // The other state of this stop, if settled, already boarded earlier
            let patterns: &[PatternStop] = if settled[node.other().index()] {
                &[]
            } else {
                snapshot.route_patterns_at_stop(node.stop)
            };
            for at in patterns {
                let stops = snapshot.pattern_stop_sequence(at.pattern);
                if at.position + 1 >= stops.len() {
                    continue;
                }
                let Some(trip) = snapshot.earliest_trip(at.pattern, at.position, time, &day)
                else {
                    continue;
                };
                for (position, &next) in stops.iter().enumerate().skip(at.position + 1) {
                    let target = Node {
                        stop: next,
                        mode: Mode::Vehicle,
                    };
                    let n = target.index();
                    let reached = snapshot.arrival(trip, position);
                    if settled[n] || arrival[n].is_some_and(|best| best <= reached) {
                        continue;
                    }
                    arrival[n] = Some(reached);
                    rode[n] = true;
                    via[n] = Some(Step::Ride {
                        trip,
                        from: node,
                        boarding_position: at.position,
                        alight_position: position,
                    });
                    heap.push(Reverse((reached, target)));
                }
            }

            // Walks never chain, and never end a journey without a vehicle
            if matches!(via[i], Some(Step::Walk { .. })) {
                continue;
            }
            for edge in snapshot.transfers_from(node.stop) {
                if !rode[i] && is_destination[edge.to.index()] {
                    continue;
                }
                let target = Node {
                    stop: edge.to,
                    mode: Mode::Foot,
                };
                let n = target.index();
                let reached = time + edge.walk_seconds + penalty;
                if settled[n] || arrival[n].is_some_and(|best| best <= reached) {
                    continue;
                }
                arrival[n] = Some(reached);
                rode[n] = rode[i];
                via[n] = Some(Step::Walk {
                    from: node,
                    walk_seconds: edge.walk_seconds,
                });
                heap.push(Reverse((reached, target)));
            }
        }

        debug!(settled = settled_count, "no earliest-arrival journey");
        Ok(Vec::new())
    }

    fn reconstruct(
        &self,
        target: Node,
        arrival: &[Option<ServiceTime>],
        via: &[Option<Step>],
    ) -> Result<Journey, PlanError> {
        let snapshot = self.snapshot;
        let broken = |what: String| PlanError::Reconstruction(what);
        let time_at = |node: Node| {
            arrival[node.index()].ok_or_else(|| {
                broken(format!("stop {} has no arrival", snapshot.stop(node.stop).id))
            })
        };

        let mut legs = Vec::new();
        let mut node = target;
        for _ in 0..=arrival.len() {
            match via[node.index()] {
                Some(Step::Origin) => {
                    legs.reverse();
                    return Journey::new(legs).map_err(|err| broken(err.to_string()));
                }
                Some(Step::Ride {
                    trip,
                    from,
                    boarding_position,
                    alight_position,
                }) => {
                    let record = snapshot.trip(trip);
                    let times = snapshot.stop_times_of(trip);
                    let stop_id = |position: usize| snapshot.stop(times[position].stop).id.clone();
                    legs.push(JourneyLeg::Transit(TransitLeg {
                        route_id: snapshot.route(record.route).id.clone(),
                        trip_id: record.id.clone(),
                        from_stop: stop_id(boarding_position),
                        to_stop: stop_id(alight_position),
                        departure_time: times[boarding_position].departure,
                        arrival_time: times[alight_position].arrival,
                        intermediate_stops: (boarding_position + 1..alight_position)
                            .map(stop_id)
                            .collect(),
                    }));
                    node = from;
                }
                Some(Step::Walk { from, walk_seconds }) => {
                    legs.push(JourneyLeg::Walking(WalkingLeg {
                        from_stop: snapshot.stop(from.stop).id.clone(),
                        to_stop: snapshot.stop(node.stop).id.clone(),
                        departure_time: time_at(from)?,
                        arrival_time: time_at(node)?,
                        walk_seconds,
                    }));
                    node = from;
                }
                None => {
                    return Err(broken(format!(
                        "stop {} has no predecessor",
                        snapshot.stop(node.stop).id
                    )));
                }
            }
        }

        Err(broken("predecessor chain has a cycle".to_string()))
    }
}
