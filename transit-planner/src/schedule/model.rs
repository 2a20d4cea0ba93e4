//! Input records for building a schedule snapshot.
//!
//! These mirror the static feed tables the snapshot is built from. They are
//! plain data; validation happens in `SnapshotBuilder::build`.

use serde::{Deserialize, Serialize};

use crate::domain::{RouteId, RouteType, ServiceId, ServiceTime, StopId, TripId};

/// A stop, platform or parent station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// The station this platform belongs to, if any.
    #[serde(default)]
    pub parent_station: Option<StopId>,
}

/// A route (line) operated by one agency with one vehicle type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub long_name: String,
    pub route_type: RouteType,
    #[serde(default)]
    pub agency: Option<String>,
}

/// A trip header; its stop times are supplied separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: TripId,
    pub route_id: RouteId,
    pub service_id: ServiceId,
    #[serde(default)]
    pub headsign: Option<String>,
}

/// One scheduled call of a trip at a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopTime {
    pub trip_id: TripId,
    pub stop_id: StopId,
    pub stop_sequence: u32,
    pub arrival_time: ServiceTime,
    pub departure_time: ServiceTime,
}

/// A directed walking connection between two stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from_stop: StopId,
    pub to_stop: StopId,
    pub walk_seconds: u32,
}

impl Transfer {
    /// Create a transfer edge.
    pub fn new(from_stop: StopId, to_stop: StopId, walk_seconds: u32) -> Self {
        Self {
            from_stop,
            to_stop,
            walk_seconds,
        }
    }
}
