//! Snapshot construction and validation.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::{RouteId, ServiceId, StopId, TripId, WALKING_SPEED_KMH};

use super::calendar::{CalendarException, ExceptionType, ServiceCalendar, ServiceCalendars};
use super::distance::haversine_m;
use super::error::SnapshotError;
use super::model::{Route, Stop, StopTime, Transfer, TripRecord};
use super::pattern::build_patterns;
use super::snapshot::{
    PatternIdx, PatternStop, RouteIdx, ScheduleSnapshot, ServiceIdx, StopIdx, StopTimeEntry,
    TransferEdge, Trip, TripIdx,
};

/// Collects schedule records and builds a validated `ScheduleSnapshot`.
///
/// Stop times of a trip must be supplied in travel order.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use transit_planner::domain::{RouteId, RouteType, ServiceId, ServiceTime, StopId, TripId};
/// use transit_planner::schedule::{Route, ServiceCalendar, SnapshotBuilder, Stop, StopTime, TripRecord};
///
/// let stop = |id: &str| Stop {
///     id: StopId::parse(id).unwrap(),
///     name: id.to_string(),
///     lat: 48.85,
///     lon: 2.35,
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
/// let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
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
/// assert_eq!(snapshot.patterns().len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct SnapshotBuilder {
    stops: Vec<Stop>,
    routes: Vec<Route>,
    trips: Vec<TripRecord>,
    stop_times: Vec<StopTime>,
    transfers: Vec<Transfer>,
    calendars: Vec<ServiceCalendar>,
    exceptions: Vec<CalendarException>,
    proximity_radius_m: Option<f64>,
}

impl SnapshotBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(mut self, stop: Stop) -> Self {
        self.stops.push(stop);
        self
    }

    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn trip(mut self, trip: TripRecord) -> Self {
        self.trips.push(trip);
        self
    }

    pub fn stop_time(mut self, stop_time: StopTime) -> Self {
        self.stop_times.push(stop_time);
        self
    }

    pub fn transfer(mut self, transfer: Transfer) -> Self {
        self.transfers.push(transfer);
        self
    }

    pub fn calendar(mut self, calendar: ServiceCalendar) -> Self {
        self.calendars.push(calendar);
        self
    }

    pub fn exception(mut self, exception: CalendarException) -> Self {
        self.exceptions.push(exception);
        self
    }

    /// Derive walking transfers between stops closer than `radius_m`.
    ///
    /// Explicit transfers always take precedence over derived ones.
    pub fn generate_proximity_transfers(mut self, radius_m: f64) -> Self {
        self.proximity_radius_m = (radius_m > 0.0).then_some(radius_m);
        self
    }

    /// Validate all records and build the indexed snapshot.
    pub fn build(self) -> Result<ScheduleSnapshot, SnapshotError> {
        let stop_index = index_stops(&self.stops)?;
        let platforms = index_platforms(&self.stops, &stop_index)?;
        let route_index = index_routes(&self.routes)?;
        let calendars = index_calendars(self.calendars, self.exceptions)?;

        let mut trip_index: HashMap<TripId, TripIdx> = HashMap::with_capacity(self.trips.len());
        let mut service_index: HashMap<ServiceId, ServiceIdx> = HashMap::new();
        let mut services: Vec<ServiceId> = Vec::new();
        let mut trip_routes = Vec::with_capacity(self.trips.len());
        let mut trip_services = Vec::with_capacity(self.trips.len());

        for (i, record) in self.trips.iter().enumerate() {
            if trip_index
                .insert(record.id.clone(), TripIdx::from_index(i))
                .is_some()
            {
                return Err(SnapshotError::DuplicateTrip(record.id.clone()));
            }

            let route = *route_index.get(&record.route_id).ok_or_else(|| {
                SnapshotError::UnknownRoute {
                    trip: record.id.clone(),
                    route: record.route_id.clone(),
                }
            })?;
            trip_routes.push(route);

            let service = *service_index
                .entry(record.service_id.clone())
                .or_insert_with(|| {
                    services.push(record.service_id.clone());
                    ServiceIdx::from_index(services.len() - 1)
                });
            trip_services.push(service);
        }

        for service in &services {
            if !calendars.knows(service) {
                warn!(service = %service, "service has no calendar or exceptions; its trips never run");
            }
        }

        let mut per_trip: Vec<Vec<&StopTime>> = vec![Vec::new(); self.trips.len()];
        for stop_time in &self.stop_times {
            let trip = trip_index
                .get(&stop_time.trip_id)
                .ok_or_else(|| SnapshotError::UnknownTrip(stop_time.trip_id.clone()))?;
            per_trip[trip.index()].push(stop_time);
        }

        let mut trips = Vec::with_capacity(self.trips.len());
        let mut stop_times = Vec::with_capacity(self.stop_times.len());

        for (i, (record, calls)) in self.trips.into_iter().zip(per_trip).enumerate() {
            validate_calls(&record.id, &calls)?;

            let first_stop_time = stop_times.len() as u32;
            for call in &calls {
                let stop = *stop_index
                    .get(&call.stop_id)
                    .ok_or_else(|| SnapshotError::UnknownStop {
                        trip: record.id.clone(),
                        stop: call.stop_id.clone(),
                    })?;
                stop_times.push(StopTimeEntry {
                    stop,
                    stop_sequence: call.stop_sequence,
                    arrival: call.arrival_time,
                    departure: call.departure_time,
                });
            }

            trips.push(Trip {
                id: record.id,
                route: trip_routes[i],
                service: trip_services[i],
                headsign: record.headsign,
                pattern: PatternIdx(0),
                first_stop_time,
                stop_count: calls.len() as u32,
            });
        }

        let (patterns, trip_pattern) = build_patterns(&self.routes, &trips, &stop_times)?;
        for (trip, pattern) in trips.iter_mut().zip(trip_pattern) {
            trip.pattern = pattern;
        }

        let mut patterns_at_stop: Vec<Vec<PatternStop>> = vec![Vec::new(); self.stops.len()];
        for (i, pattern) in patterns.iter().enumerate() {
            for (position, stop) in pattern.stops.iter().enumerate() {
                patterns_at_stop[stop.index()].push(PatternStop {
                    pattern: PatternIdx::from_index(i),
                    position,
                });
            }
        }

        let transfers = index_transfers(
            &self.stops,
            &stop_index,
            &platforms,
            &self.transfers,
            self.proximity_radius_m,
        )?;

        info!(
            stops = self.stops.len(),
            routes = self.routes.len(),
            trips = trips.len(),
            patterns = patterns.len(),
            transfers = transfers.iter().map(Vec::len).sum::<usize>(),
            "schedule snapshot built"
        );

        Ok(ScheduleSnapshot {
            stops: self.stops,
            stop_index,
            routes: self.routes,
            trips,
            trip_index,
            stop_times,
            patterns,
            patterns_at_stop,
            transfers,
            platforms,
            services,
            calendars,
        })
    }
}

fn index_stops(stops: &[Stop]) -> Result<HashMap<StopId, StopIdx>, SnapshotError> {
    let mut index = HashMap::with_capacity(stops.len());
    for (i, stop) in stops.iter().enumerate() {
        let valid_coordinates = (-90.0..=90.0).contains(&stop.lat)
            && (-180.0..=180.0).contains(&stop.lon);
        if !valid_coordinates {
            return Err(SnapshotError::InvalidCoordinates(stop.id.clone()));
        }
        if index
            .insert(stop.id.clone(), StopIdx::from_index(i))
            .is_some()
        {
            return Err(SnapshotError::DuplicateStop(stop.id.clone()));
        }
    }
    Ok(index)
}

fn index_platforms(
    stops: &[Stop],
    stop_index: &HashMap<StopId, StopIdx>,
) -> Result<Vec<Vec<StopIdx>>, SnapshotError> {
    let mut platforms = vec![Vec::new(); stops.len()];
    for (i, stop) in stops.iter().enumerate() {
        if let Some(parent) = &stop.parent_station {
            let parent_idx =
                stop_index
                    .get(parent)
                    .ok_or_else(|| SnapshotError::UnknownParentStation {
                        stop: stop.id.clone(),
                        parent: parent.clone(),
                    })?;
            platforms[parent_idx.index()].push(StopIdx::from_index(i));
        }
    }
    Ok(platforms)
}

fn index_routes(routes: &[Route]) -> Result<HashMap<RouteId, RouteIdx>, SnapshotError> {
    let mut index = HashMap::with_capacity(routes.len());
    for (i, route) in routes.iter().enumerate() {
        if index
            .insert(route.id.clone(), RouteIdx::from_index(i))
            .is_some()
        {
            return Err(SnapshotError::DuplicateRoute(route.id.clone()));
        }
    }
    Ok(index)
}

fn index_calendars(
    calendars: Vec<ServiceCalendar>,
    exceptions: Vec<CalendarException>,
) -> Result<ServiceCalendars, SnapshotError> {
    let mut weekly = HashMap::with_capacity(calendars.len());
    for calendar in calendars {
        if calendar.end_date < calendar.start_date {
            return Err(SnapshotError::InvalidCalendarRange(calendar.service_id));
        }
        let service_id = calendar.service_id.clone();
        if weekly.insert(service_id.clone(), calendar).is_some() {
            return Err(SnapshotError::DuplicateCalendar(service_id));
        }
    }

    let exceptions: HashMap<(ServiceId, NaiveDate), ExceptionType> = exceptions
        .into_iter()
        .map(|e| ((e.service_id, e.date), e.exception_type))
        .collect();

    Ok(ServiceCalendars::new(weekly, exceptions))
}

/// Check the stop time invariants of one trip.
fn validate_calls(trip: &TripId, calls: &[&StopTime]) -> Result<(), SnapshotError> {
    if calls.len() < 2 {
        return Err(SnapshotError::TooFewStopTimes(trip.clone()));
    }

    for call in calls {
        if call.arrival_time > call.departure_time {
            return Err(SnapshotError::ArrivalAfterDeparture {
                trip: trip.clone(),
                sequence: call.stop_sequence,
            });
        }
    }

    for pair in calls.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if next.stop_sequence <= prev.stop_sequence {
            return Err(SnapshotError::NonIncreasingSequence {
                trip: trip.clone(),
                sequence: next.stop_sequence,
            });
        }
        if prev.departure_time > next.arrival_time {
            return Err(SnapshotError::DepartureAfterNextArrival {
                trip: trip.clone(),
                sequence: prev.stop_sequence,
            });
        }
    }

    Ok(())
}

fn index_transfers(
    stops: &[Stop],
    stop_index: &HashMap<StopId, StopIdx>,
    platforms: &[Vec<StopIdx>],
    transfers: &[Transfer],
    proximity_radius_m: Option<f64>,
) -> Result<Vec<Vec<TransferEdge>>, SnapshotError> {
    let resolve = |stop: &StopId| {
        stop_index
            .get(stop)
            .copied()
            .ok_or_else(|| SnapshotError::UnknownTransferStop(stop.clone()))
    };

    // Explicit transfers; the fastest wins when a pair is listed twice.
    let mut edges: HashMap<(StopIdx, StopIdx), u32> = HashMap::new();
    for transfer in transfers {
        let from = resolve(&transfer.from_stop)?;
        let to = resolve(&transfer.to_stop)?;
        if from == to {
            continue;
        }
        edges
            .entry((from, to))
            .and_modify(|secs| *secs = (*secs).min(transfer.walk_seconds))
            .or_insert(transfer.walk_seconds);
    }

    if let Some(radius_m) = proximity_radius_m {
        let explicit: HashSet<(StopIdx, StopIdx)> = edges.keys().copied().collect();
        let derived = proximity_edges(stops, platforms, radius_m);
        let mut added = 0usize;
        for ((from, to), secs) in derived {
            if !explicit.contains(&(from, to)) {
                edges.insert((from, to), secs);
                added += 1;
            }
        }
        info!(radius_m, added, "derived proximity transfers");
    }

    let mut by_stop: Vec<Vec<TransferEdge>> = vec![Vec::new(); stops.len()];
    for ((from, to), walk_seconds) in edges {
        by_stop[from.index()].push(TransferEdge { to, walk_seconds });
    }
    for list in &mut by_stop {
        list.sort_by_key(|edge| (edge.to, edge.walk_seconds));
    }
    Ok(by_stop)
}

/// Walking edges between boardable stops closer than `radius_m`.
///
/// Stops are swept in latitude order so only pairs inside the latitude band
/// of the radius are measured.
fn proximity_edges(
    stops: &[Stop],
    platforms: &[Vec<StopIdx>],
    radius_m: f64,
) -> Vec<((StopIdx, StopIdx), u32)> {
    const METRES_PER_DEGREE_LAT: f64 = 111_320.0;
    let speed_mps = WALKING_SPEED_KMH / 3.6;
    let band = radius_m / METRES_PER_DEGREE_LAT;

    // Parent stations are not boarded directly
    let mut order: Vec<usize> = (0..stops.len())
        .filter(|&i| platforms[i].is_empty())
        .collect();
    order.sort_by(|&a, &b| stops[a].lat.total_cmp(&stops[b].lat));

    let mut edges = Vec::new();
    for (n, &a) in order.iter().enumerate() {
        for &b in &order[n + 1..] {
            if stops[b].lat - stops[a].lat > band {
                break;
            }
            let distance = haversine_m(&stops[a], &stops[b]);
            if distance <= radius_m {
                let secs = (distance / speed_mps).ceil() as u32;
                edges.push(((StopIdx::from_index(a), StopIdx::from_index(b)), secs));
                edges.push(((StopIdx::from_index(b), StopIdx::from_index(a)), secs));
            }
        }
    }
    edges
}
