//! Loading a schedule snapshot from a JSON document on disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::builder::SnapshotBuilder;
use super::calendar::{CalendarException, ServiceCalendar};
use super::error::SnapshotError;
use super::model::{Route, Stop, StopTime, Transfer, TripRecord};
use super::snapshot::ScheduleSnapshot;

/// Errors that can occur while loading a schedule file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON, or a field that failed to parse (ids, times, dates)
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid schedule: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// The on-disk schedule format.
///
/// Stop times use `HH:MM:SS` strings (hours may exceed 23), dates use
/// `YYYY-MM-DD` and route types use GTFS integer codes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleDocument {
    pub stops: Vec<Stop>,
    pub routes: Vec<Route>,
    pub trips: Vec<TripRecord>,
    pub stop_times: Vec<StopTime>,
    #[serde(default)]
    pub calendars: Vec<ServiceCalendar>,
    #[serde(default)]
    pub calendar_dates: Vec<CalendarException>,
    #[serde(default)]
    pub transfers: Vec<Transfer>,
}

impl ScheduleDocument {
    /// Feed every record into a fresh builder.
    pub fn into_builder(self) -> SnapshotBuilder {
        let builder = self.stops.into_iter().fold(SnapshotBuilder::new(), SnapshotBuilder::stop);
        let builder = self.routes.into_iter().fold(builder, SnapshotBuilder::route);
        let builder = self.trips.into_iter().fold(builder, SnapshotBuilder::trip);
        let builder = self.stop_times.into_iter().fold(builder, SnapshotBuilder::stop_time);
        let builder = self.calendars.into_iter().fold(builder, SnapshotBuilder::calendar);
        let builder = self
            .calendar_dates
            .into_iter()
            .fold(builder, SnapshotBuilder::exception);
        self.transfers.into_iter().fold(builder, SnapshotBuilder::transfer)
    }
}

/// Read a schedule document and build a snapshot from it.
///
/// A positive `proximity_radius_m` also derives walking transfers between
/// nearby stops.
pub fn load_snapshot(
    path: impl AsRef<Path>,
    proximity_radius_m: f64,
) -> Result<ScheduleSnapshot, LoadError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document: ScheduleDocument =
        serde_json::from_str(&contents).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), "loading schedule");
    let snapshot = document
        .into_builder()
        .generate_proximity_transfers(proximity_radius_m)
        .build()?;
    Ok(snapshot)
}
