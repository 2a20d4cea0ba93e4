//! Schedule snapshot error types.

use crate::domain::{RouteId, ServiceId, StopId, TripId};

/// Structural errors found while building a snapshot.
///
/// Any of these prevents the snapshot from becoming active.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("duplicate stop id: {0}")]
    DuplicateStop(StopId),

    #[error("duplicate route id: {0}")]
    DuplicateRoute(RouteId),

    #[error("duplicate trip id: {0}")]
    DuplicateTrip(TripId),

    #[error("duplicate calendar for service {0}")]
    DuplicateCalendar(ServiceId),

    #[error("stop {0} has coordinates outside the valid range")]
    InvalidCoordinates(StopId),

    #[error("stop {stop} references unknown parent station {parent}")]
    UnknownParentStation { stop: StopId, parent: StopId },

    #[error("trip {trip} references unknown route {route}")]
    UnknownRoute { trip: TripId, route: RouteId },

    #[error("trip {trip} references unknown stop {stop}")]
    UnknownStop { trip: TripId, stop: StopId },

    #[error("stop time references unknown trip {0}")]
    UnknownTrip(TripId),

    #[error("trip {0} has fewer than two stop times")]
    TooFewStopTimes(TripId),

    #[error("trip {trip} has non-increasing stop_sequence at {sequence}")]
    NonIncreasingSequence { trip: TripId, sequence: u32 },

    #[error("trip {trip} arrives after it departs at stop_sequence {sequence}")]
    ArrivalAfterDeparture { trip: TripId, sequence: u32 },

    #[error("trip {trip} departs stop_sequence {sequence} after arriving at the next stop")]
    DepartureAfterNextArrival { trip: TripId, sequence: u32 },

    #[error("transfer references unknown stop {0}")]
    UnknownTransferStop(StopId),

    #[error("calendar for service {0} ends before it starts")]
    InvalidCalendarRange(ServiceId),

    #[error("trip {trip} does not follow the stop sequence of its pattern {pattern}")]
    PatternMismatch { pattern: String, trip: TripId },
}
