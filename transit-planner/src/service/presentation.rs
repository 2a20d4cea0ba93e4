//! Journey views for callers.
//!
//! Resolves service times onto calendar date-times and decorates legs with
//! stop names, coordinates, route display data and walking geometry. None
//! of this feeds back into the search.

use chrono::NaiveDate;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{Journey, JourneyLeg, RouteId, StopId, TransitLeg, TripId, WalkingLeg};
use crate::schedule::{ScheduleSnapshot, Stop, bearing_deg, haversine_m};

/// A journey leg refers to something the snapshot does not hold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresentationError {
    #[error("stop {0} is not in the snapshot")]
    MissingStop(StopId),

    #[error("trip {0} is not in the snapshot")]
    MissingTrip(TripId),
}

/// A stop as shown in a journey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopView {
    pub id: StopId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl StopView {
    fn from_stop(stop: &Stop) -> Self {
        Self {
            id: stop.id.clone(),
            name: stop.name.clone(),
            lat: stop.lat,
            lon: stop.lon,
        }
    }
}

/// A vehicle leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitLegView {
    pub route_id: RouteId,
    pub route_short_name: String,
    /// Display name of the vehicle type, e.g. "Metro"
    pub mode: &'static str,
    pub trip_id: TripId,
    pub headsign: Option<String>,
    pub from: StopView,
    pub to: StopView,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub intermediate_stops: Vec<StopView>,
    /// Initial bearing from boarding to alighting stop, degrees from north
    pub bearing_deg: f64,
    /// `[lon, lat]` of every stop called at, in order
    pub shape: Vec<[f64; 2]>,
}

/// A walk between stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkingLegView {
    pub from: StopView,
    pub to: StopView,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub walk_seconds: u32,
    /// Great-circle distance between the two stops
    pub distance_m: f64,
    pub bearing_deg: f64,
    pub shape: Vec<[f64; 2]>,
}

/// One leg of a journey view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LegView {
    Transit(TransitLegView),
    Walking(WalkingLegView),
}

/// A journey ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JourneyView {
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub duration_minutes: i64,
    pub transfers: usize,
    pub walk_seconds: u32,
    pub legs: Vec<LegView>,
}

impl JourneyView {
    /// Build the view of a journey planned for `travel_date`.
    pub fn from_journey(
        journey: &Journey,
        snapshot: &ScheduleSnapshot,
        travel_date: NaiveDate,
    ) -> Result<Self, PresentationError> {
        let legs = journey
            .legs()
            .iter()
            .map(|leg| match leg {
                JourneyLeg::Transit(leg) => {
                    transit_view(leg, snapshot, travel_date).map(LegView::Transit)
                }
                JourneyLeg::Walking(leg) => {
                    walking_view(leg, snapshot, travel_date).map(LegView::Walking)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            departure: journey.departure_time().on_date(travel_date),
            arrival: journey.arrival_time().on_date(travel_date),
            duration_minutes: journey.duration_minutes(),
            transfers: journey.transfers(),
            walk_seconds: journey.total_walk_seconds(),
            legs,
        })
    }
}

fn lookup_stop<'a>(
    snapshot: &'a ScheduleSnapshot,
    id: &StopId,
) -> Result<&'a Stop, PresentationError> {
    snapshot
        .stop_idx(id)
        .map(|idx| snapshot.stop(idx))
        .ok_or_else(|| PresentationError::MissingStop(id.clone()))
}

fn transit_view(
    leg: &TransitLeg,
    snapshot: &ScheduleSnapshot,
    travel_date: NaiveDate,
) -> Result<TransitLegView, PresentationError> {
    let trip = snapshot
        .trip_idx(&leg.trip_id)
        .map(|idx| snapshot.trip(idx))
        .ok_or_else(|| PresentationError::MissingTrip(leg.trip_id.clone()))?;
    let route = snapshot.route(trip.route);

    let from = lookup_stop(snapshot, &leg.from_stop)?;
    let to = lookup_stop(snapshot, &leg.to_stop)?;
    let intermediate = leg
        .intermediate_stops
        .iter()
        .map(|id| lookup_stop(snapshot, id))
        .collect::<Result<Vec<_>, _>>()?;

    let shape = std::iter::once(from)
        .chain(intermediate.iter().copied())
        .chain(std::iter::once(to))
        .map(|stop| [stop.lon, stop.lat])
        .collect();

    Ok(TransitLegView {
        route_id: route.id.clone(),
        route_short_name: route.short_name.clone(),
        mode: route.route_type.mode_name(),
        trip_id: trip.id.clone(),
        headsign: trip.headsign.clone(),
        from: StopView::from_stop(from),
        to: StopView::from_stop(to),
        departure: leg.departure_time.on_date(travel_date),
        arrival: leg.arrival_time.on_date(travel_date),
        intermediate_stops: intermediate.into_iter().map(StopView::from_stop).collect(),
        bearing_deg: bearing_deg(from, to),
        shape,
    })
}

fn walking_view(
    leg: &WalkingLeg,
    snapshot: &ScheduleSnapshot,
    travel_date: NaiveDate,
) -> Result<WalkingLegView, PresentationError> {
    let from = lookup_stop(snapshot, &leg.from_stop)?;
    let to = lookup_stop(snapshot, &leg.to_stop)?;

    Ok(WalkingLegView {
        from: StopView::from_stop(from),
        to: StopView::from_stop(to),
        departure: leg.departure_time.on_date(travel_date),
        arrival: leg.arrival_time.on_date(travel_date),
        walk_seconds: leg.walk_seconds,
        distance_m: haversine_m(from, to),
        bearing_deg: bearing_deg(from, to),
        shape: vec![[from.lon, from.lat], [to.lon, to.lat]],
    })
}
