//! Route pattern index.
//!
//! Trips of a route that call at exactly the same stops in the same order
//! share a pattern, so the search scans each pattern once per round instead
//! of every trip. Within a pattern trips must never overtake each other;
//! a group containing overtaking trips is split into several patterns, each
//! of which is FIFO at every stop.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::error::SnapshotError;
use super::model::Route;
use super::snapshot::{PatternIdx, RouteIdx, StopIdx, StopTimeEntry, Trip, TripIdx};

/// Trips sharing one ordered stop sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    /// Stable identifier: the route id plus a per-route counter.
    pub id: String,
    pub route: RouteIdx,
    pub stops: Vec<StopIdx>,
    /// Trips sorted by departure at the first stop (and at every other stop).
    pub trips: Vec<TripIdx>,
}

/// Group trips into FIFO route patterns.
///
/// Returns the patterns and, for every trip, the pattern it was placed in.
pub(crate) fn build_patterns(
    routes: &[Route],
    trips: &[Trip],
    stop_times: &[StopTimeEntry],
) -> Result<(Vec<RoutePattern>, Vec<PatternIdx>), SnapshotError> {
    let times_of = |trip: TripIdx| trip_times(trips, stop_times, trip);

    let mut groups: BTreeMap<(RouteIdx, Vec<StopIdx>), Vec<TripIdx>> = BTreeMap::new();
    for (i, trip) in trips.iter().enumerate() {
        let idx = TripIdx::from_index(i);
        let stops = times_of(idx).iter().map(|st| st.stop).collect();
        groups.entry((trip.route, stops)).or_default().push(idx);
    }

    let mut patterns = Vec::new();
    let mut trip_pattern = vec![PatternIdx(0); trips.len()];
    let mut per_route: HashMap<RouteIdx, usize> = HashMap::new();

    for ((route, stops), mut members) in groups {
        members.sort_by(|&a, &b| {
            times_of(a)[0]
                .departure
                .cmp(&times_of(b)[0].departure)
                .then_with(|| trips[a.index()].id.cmp(&trips[b.index()].id))
        });

        // Greedily place each trip behind the first lane it cannot overtake.
        let mut lanes: Vec<Vec<TripIdx>> = Vec::new();
        for trip in members {
            let lane = lanes.iter_mut().find(|lane| {
                lane.last()
                    .is_some_and(|&last| follows(times_of(last), times_of(trip)))
            });
            match lane {
                Some(lane) => lane.push(trip),
                None => lanes.push(vec![trip]),
            }
        }

        if lanes.len() > 1 {
            debug!(
                route = %routes[route.index()].id,
                lanes = lanes.len(),
                "split overtaking trips into separate patterns"
            );
        }

        for lane in lanes {
            let counter = per_route.entry(route).or_insert(0);
            let id = format!("{}#{}", routes[route.index()].id, counter);
            *counter += 1;

            let pattern_idx = PatternIdx::from_index(patterns.len());
            for &trip in &lane {
                trip_pattern[trip.index()] = pattern_idx;
            }
            patterns.push(RoutePattern {
                id,
                route,
                stops: stops.clone(),
                trips: lane,
            });
        }
    }

    for pattern in &patterns {
        for &trip in &pattern.trips {
            let same_sequence = times_of(trip)
                .iter()
                .map(|st| st.stop)
                .eq(pattern.stops.iter().copied());
            if !same_sequence {
                return Err(SnapshotError::PatternMismatch {
                    pattern: pattern.id.clone(),
                    trip: trips[trip.index()].id.clone(),
                });
            }
        }
    }

    Ok((patterns, trip_pattern))
}

fn trip_times<'a>(trips: &[Trip], stop_times: &'a [StopTimeEntry], trip: TripIdx) -> &'a [StopTimeEntry] {
    let t = &trips[trip.index()];
    let start = t.first_stop_time as usize;
    &stop_times[start..start + t.stop_count as usize]
}

/// Whether `later` never runs ahead of `earlier` at any stop.
fn follows(earlier: &[StopTimeEntry], later: &[StopTimeEntry]) -> bool {
    earlier
        .iter()
        .zip(later)
        .all(|(e, l)| l.arrival >= e.arrival && l.departure >= e.departure)
}
