//! The static schedule: input records, validation and the indexed snapshot.
//!
//! A `ScheduleSnapshot` is built once from a `ScheduleDocument` (or directly
//! through `SnapshotBuilder`) and then only read. Reloading builds a fresh
//! snapshot and swaps it into the `SnapshotStore`.

mod builder;
mod calendar;
mod distance;
mod error;
mod loader;
mod model;
mod pattern;
mod snapshot;
mod store;

pub use builder::SnapshotBuilder;
pub use calendar::{CalendarException, ExceptionType, ServiceCalendar, ServiceCalendars};
pub use distance::{bearing_deg, haversine_m};
pub use error::SnapshotError;
pub use loader::{LoadError, ScheduleDocument, load_snapshot};
pub use model::{Route, Stop, StopTime, Transfer, TripRecord};
pub use pattern::RoutePattern;
pub use snapshot::{
    PatternIdx, PatternStop, RouteIdx, ScheduleSnapshot, ServiceDay, ServiceIdx, StopIdx,
    StopTimeEntry, TransferEdge, Trip, TripIdx,
};
pub use store::SnapshotStore;
