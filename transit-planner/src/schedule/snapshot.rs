//! The immutable, pre-indexed schedule snapshot.
//!
//! Everything lives in flat arenas addressed by `u32` index newtypes, so the
//! search walks contiguous memory and never touches a hash map in its inner
//! loops. A snapshot is built once by `SnapshotBuilder` and only read after.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{ServiceId, ServiceTime, StopId, TripId};

use super::calendar::ServiceCalendars;
use super::model::{Route, Stop};
use super::pattern::RoutePattern;

macro_rules! arena_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Position in the owning arena.
            pub fn index(self) -> usize {
                self.0 as usize
            }

            pub(crate) fn from_index(index: usize) -> Self {
                Self(index as u32)
            }
        }
    };
}

arena_index!(
    /// Index of a stop in the snapshot.
    StopIdx
);
arena_index!(
    /// Index of a route in the snapshot.
    RouteIdx
);
arena_index!(
    /// Index of a trip in the snapshot.
    TripIdx
);
arena_index!(
    /// Index of a route pattern in the snapshot.
    PatternIdx
);
arena_index!(
    /// Index of a service calendar id in the snapshot.
    ServiceIdx
);

/// A trip with its stop times stored in the snapshot's flat arena.
#[derive(Debug, Clone)]
pub struct Trip {
    pub id: TripId,
    pub route: RouteIdx,
    pub service: ServiceIdx,
    pub headsign: Option<String>,
    pub pattern: PatternIdx,
    pub(crate) first_stop_time: u32,
    pub(crate) stop_count: u32,
}

/// A stop time resolved to arena indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopTimeEntry {
    pub stop: StopIdx,
    pub stop_sequence: u32,
    pub arrival: ServiceTime,
    pub departure: ServiceTime,
}

/// Occurrence of a stop in a route pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternStop {
    pub pattern: PatternIdx,
    /// Position of the stop in the pattern's stop sequence.
    pub position: usize,
}

/// An outgoing walking edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferEdge {
    pub to: StopIdx,
    pub walk_seconds: u32,
}

/// Service validity for one travel date.
///
/// Computed once per query so trip filtering is an array lookup.
#[derive(Debug, Clone)]
pub struct ServiceDay {
    date: NaiveDate,
    active: Vec<bool>,
}

impl ServiceDay {
    /// The travel date this mask was computed for.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Whether a trip runs on this date.
    pub fn runs(&self, trip: &Trip) -> bool {
        self.active
            .get(trip.service.index())
            .copied()
            .unwrap_or(false)
    }
}

/// Immutable, indexed view of the static schedule.
#[derive(Debug)]
pub struct ScheduleSnapshot {
    pub(crate) stops: Vec<Stop>,
    pub(crate) stop_index: HashMap<StopId, StopIdx>,
    pub(crate) routes: Vec<Route>,
    pub(crate) trips: Vec<Trip>,
    pub(crate) trip_index: HashMap<TripId, TripIdx>,
    pub(crate) stop_times: Vec<StopTimeEntry>,
    pub(crate) patterns: Vec<RoutePattern>,
    pub(crate) patterns_at_stop: Vec<Vec<PatternStop>>,
    pub(crate) transfers: Vec<Vec<TransferEdge>>,
    pub(crate) platforms: Vec<Vec<StopIdx>>,
    pub(crate) services: Vec<ServiceId>,
    pub(crate) calendars: ServiceCalendars,
}

impl ScheduleSnapshot {
    /// Whether a stop id resolves in this snapshot.
    pub fn stop_exists(&self, stop_id: &StopId) -> bool {
        self.stop_index.contains_key(stop_id)
    }

    /// Resolve a stop id to its arena index.
    pub fn stop_idx(&self, stop_id: &StopId) -> Option<StopIdx> {
        self.stop_index.get(stop_id).copied()
    }

    pub fn stop(&self, stop: StopIdx) -> &Stop {
        &self.stops[stop.index()]
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn route(&self, route: RouteIdx) -> &Route {
        &self.routes[route.index()]
    }

    pub fn trip(&self, trip: TripIdx) -> &Trip {
        &self.trips[trip.index()]
    }

    /// Resolve a trip id to its arena index.
    pub fn trip_idx(&self, trip_id: &TripId) -> Option<TripIdx> {
        self.trip_index.get(trip_id).copied()
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    /// Stop times of a trip, in travel order.
    pub fn stop_times_of(&self, trip: TripIdx) -> &[StopTimeEntry] {
        let trip = &self.trips[trip.index()];
        let start = trip.first_stop_time as usize;
        &self.stop_times[start..start + trip.stop_count as usize]
    }

    /// Departure time of a trip at a position of its pattern.
    pub fn departure(&self, trip: TripIdx, position: usize) -> ServiceTime {
        self.stop_times_of(trip)[position].departure
    }

    /// Arrival time of a trip at a position of its pattern.
    pub fn arrival(&self, trip: TripIdx, position: usize) -> ServiceTime {
        self.stop_times_of(trip)[position].arrival
    }

    pub fn pattern(&self, pattern: PatternIdx) -> &RoutePattern {
        &self.patterns[pattern.index()]
    }

    pub fn patterns(&self) -> &[RoutePattern] {
        &self.patterns
    }

    /// Route patterns serving a stop, with the stop's position in each.
    pub fn route_patterns_at_stop(&self, stop: StopIdx) -> &[PatternStop] {
        &self.patterns_at_stop[stop.index()]
    }

    /// Ordered stop sequence of a route pattern.
    pub fn pattern_stop_sequence(&self, pattern: PatternIdx) -> &[StopIdx] {
        &self.patterns[pattern.index()].stops
    }

    /// Trips of a pattern running on `date`, by departure from the first stop.
    pub fn pattern_trips_sorted_by_departure(
        &self,
        pattern: PatternIdx,
        date: NaiveDate,
    ) -> Vec<TripIdx> {
        let day = self.service_day(date);
        self.patterns[pattern.index()]
            .trips
            .iter()
            .copied()
            .filter(|&trip| day.runs(self.trip(trip)))
            .collect()
    }

    /// Earliest trip of a pattern departing `position` at or after `after`.
    ///
    /// Pattern trips never overtake each other, so departures are sorted at
    /// every position and a binary search finds the first candidate.
    pub fn earliest_trip(
        &self,
        pattern: PatternIdx,
        position: usize,
        after: ServiceTime,
        day: &ServiceDay,
    ) -> Option<TripIdx> {
        let trips = &self.patterns[pattern.index()].trips;
        let first = trips.partition_point(|&trip| self.departure(trip, position) < after);
        trips[first..]
            .iter()
            .copied()
            .find(|&trip| day.runs(self.trip(trip)))
    }

    /// Walking transfers leaving a stop.
    pub fn transfers_from(&self, stop: StopIdx) -> &[TransferEdge] {
        &self.transfers[stop.index()]
    }

    /// Platforms (child stops) of a parent station.
    pub fn platforms_of(&self, station: StopIdx) -> &[StopIdx] {
        &self.platforms[station.index()]
    }

    /// Compute which services run on a date.
    pub fn service_day(&self, date: NaiveDate) -> ServiceDay {
        ServiceDay {
            date,
            active: self
                .services
                .iter()
                .map(|service| self.calendars.is_active(service, date))
                .collect(),
        }
    }

    pub fn calendars(&self) -> &ServiceCalendars {
        &self.calendars
    }
}
