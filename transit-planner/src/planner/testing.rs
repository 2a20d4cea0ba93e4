//! Small-network fixtures shared by planner and service tests.

use chrono::NaiveDate;

use crate::domain::{RouteId, RouteType, ServiceId, ServiceTime, StopId, TripId};
use crate::schedule::{
    CalendarException, ExceptionType, Route, ScheduleSnapshot, ServiceCalendar, SnapshotBuilder,
    Stop, StopTime, Transfer, TripRecord,
};

/// Friday 2024-03-15.
pub(crate) fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

pub(crate) fn time(s: &str) -> ServiceTime {
    ServiceTime::parse(s).unwrap()
}

pub(crate) fn stop(s: &str) -> StopId {
    StopId::parse(s).unwrap()
}

/// Builds a snapshot from trips described by stop names and times.
///
/// Stops and routes are created on first mention. Trips run on service
/// `ALL` (every day around `date()`) unless given another service.
#[derive(Default)]
pub(crate) struct Network {
    stops: Vec<(String, Option<String>)>,
    routes: Vec<String>,
    trips: Vec<TripRecord>,
    stop_times: Vec<StopTime>,
    transfers: Vec<Transfer>,
    calendars: Vec<ServiceCalendar>,
    exceptions: Vec<CalendarException>,
}

impl Network {
    pub(crate) fn new() -> Self {
        let all = ServiceCalendar::daily(
            ServiceId::parse("ALL").unwrap(),
            date() - chrono::Duration::days(365),
            date() + chrono::Duration::days(365),
        );
        Self {
            calendars: vec![all],
            ..Self::default()
        }
    }

    fn ensure_stop(&mut self, id: &str) {
        if !self.stops.iter().any(|(s, _)| s == id) {
            self.stops.push((id.to_string(), None));
        }
    }

    /// A trip on service `ALL` with equal arrival and departure at each stop.
    pub(crate) fn trip(self, route: &str, trip: &str, calls: &[(&str, &str)]) -> Self {
        self.trip_on("ALL", route, trip, calls)
    }

    pub(crate) fn trip_on(
        self,
        service: &str,
        route: &str,
        trip: &str,
        calls: &[(&str, &str)],
    ) -> Self {
        let calls: Vec<(&str, &str, &str)> = calls.iter().map(|&(s, t)| (s, t, t)).collect();
        self.trip_with_dwell(service, route, trip, &calls)
    }

    /// A trip with explicit (stop, arrival, departure) calls.
    pub(crate) fn trip_with_dwell(
        mut self,
        service: &str,
        route: &str,
        trip: &str,
        calls: &[(&str, &str, &str)],
    ) -> Self {
        if !self.routes.iter().any(|r| r == route) {
            self.routes.push(route.to_string());
        }
        self.trips.push(TripRecord {
            id: TripId::parse(trip).unwrap(),
            route_id: RouteId::parse(route).unwrap(),
            service_id: ServiceId::parse(service).unwrap(),
            headsign: None,
        });
        for (seq, &(stop_id, arr, dep)) in calls.iter().enumerate() {
            self.ensure_stop(stop_id);
            self.stop_times.push(StopTime {
                trip_id: TripId::parse(trip).unwrap(),
                stop_id: stop(stop_id),
                stop_sequence: seq as u32 + 1,
                arrival_time: time(arr),
                departure_time: time(dep),
            });
        }
        self
    }

    pub(crate) fn transfer(mut self, from: &str, to: &str, walk_seconds: u32) -> Self {
        self.ensure_stop(from);
        self.ensure_stop(to);
        self.transfers
            .push(Transfer::new(stop(from), stop(to), walk_seconds));
        self
    }

    /// Make `child` a platform of `parent`.
    pub(crate) fn platform(mut self, child: &str, parent: &str) -> Self {
        self.ensure_stop(parent);
        self.ensure_stop(child);
        for (id, p) in &mut self.stops {
            if id == child {
                *p = Some(parent.to_string());
            }
        }
        self
    }

    pub(crate) fn calendar(mut self, calendar: ServiceCalendar) -> Self {
        self.calendars.push(calendar);
        self
    }

    pub(crate) fn exception(mut self, service: &str, date: NaiveDate, kind: ExceptionType) -> Self {
        self.exceptions.push(CalendarException {
            service_id: ServiceId::parse(service).unwrap(),
            date,
            exception_type: kind,
        });
        self
    }

    pub(crate) fn build(self) -> ScheduleSnapshot {
        let mut builder = SnapshotBuilder::new();
        for (n, (id, parent)) in self.stops.iter().enumerate() {
            builder = builder.stop(Stop {
                id: stop(id),
                name: format!("Stop {id}"),
                lat: 48.85 + n as f64 * 0.01,
                lon: 2.35,
                parent_station: parent.as_deref().map(stop),
            });
        }
        for route in &self.routes {
            builder = builder.route(Route {
                id: RouteId::parse(route).unwrap(),
                short_name: route.clone(),
                long_name: format!("Line {route}"),
                route_type: RouteType::Bus,
                agency: None,
            });
        }
        let builder = self.trips.into_iter().fold(builder, SnapshotBuilder::trip);
        let builder = self.stop_times.into_iter().fold(builder, SnapshotBuilder::stop_time);
        let builder = self.transfers.into_iter().fold(builder, SnapshotBuilder::transfer);
        let builder = self.calendars.into_iter().fold(builder, SnapshotBuilder::calendar);
        let builder = self.exceptions.into_iter().fold(builder, SnapshotBuilder::exception);
        builder.build().unwrap()
    }
}
