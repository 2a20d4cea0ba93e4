//! Journey types.
//!
//! A `Journey` is a complete trip from an origin stop to a destination stop,
//! made of transit legs (one vehicle each) and walking legs between stops
//! of the same interchange.

use chrono::Duration;

use super::{DomainError, RouteId, ServiceTime, StopId, TripId};

/// Average walking speed used to turn walk times into distances.
pub const WALKING_SPEED_KMH: f64 = 5.0;

/// A ride on one vehicle from boarding to alighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitLeg {
    pub route_id: RouteId,
    pub trip_id: TripId,
    pub from_stop: StopId,
    pub to_stop: StopId,
    pub departure_time: ServiceTime,
    pub arrival_time: ServiceTime,
    /// Stops passed between boarding and alighting, in travel order.
    pub intermediate_stops: Vec<StopId>,
}

/// A walk between two stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkingLeg {
    pub from_stop: StopId,
    pub to_stop: StopId,
    pub departure_time: ServiceTime,
    pub arrival_time: ServiceTime,
    /// Scheduled walking time, excluding any transfer buffer.
    pub walk_seconds: u32,
}

impl WalkingLeg {
    /// Distance implied by the walking time at `WALKING_SPEED_KMH`.
    pub fn implied_distance_m(&self) -> f64 {
        f64::from(self.walk_seconds) * WALKING_SPEED_KMH / 3.6
    }
}

/// One leg of a journey: either a transit ride or a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyLeg {
    Transit(TransitLeg),
    Walking(WalkingLeg),
}

impl JourneyLeg {
    /// Returns the stop this leg starts from.
    pub fn from_stop(&self) -> &StopId {
        match self {
            JourneyLeg::Transit(leg) => &leg.from_stop,
            JourneyLeg::Walking(leg) => &leg.from_stop,
        }
    }

    /// Returns the stop this leg ends at.
    pub fn to_stop(&self) -> &StopId {
        match self {
            JourneyLeg::Transit(leg) => &leg.to_stop,
            JourneyLeg::Walking(leg) => &leg.to_stop,
        }
    }

    pub fn departure_time(&self) -> ServiceTime {
        match self {
            JourneyLeg::Transit(leg) => leg.departure_time,
            JourneyLeg::Walking(leg) => leg.departure_time,
        }
    }

    pub fn arrival_time(&self) -> ServiceTime {
        match self {
            JourneyLeg::Transit(leg) => leg.arrival_time,
            JourneyLeg::Walking(leg) => leg.arrival_time,
        }
    }

    /// Returns true if this is a transit leg.
    pub fn is_transit(&self) -> bool {
        matches!(self, JourneyLeg::Transit(_))
    }

    /// Returns the transit leg, if this is one.
    pub fn as_transit(&self) -> Option<&TransitLeg> {
        match self {
            JourneyLeg::Transit(leg) => Some(leg),
            JourneyLeg::Walking(_) => None,
        }
    }

    /// Returns the walking leg, if this is one.
    pub fn as_walking(&self) -> Option<&WalkingLeg> {
        match self {
            JourneyLeg::Transit(_) => None,
            JourneyLeg::Walking(leg) => Some(leg),
        }
    }
}

/// A complete journey from origin to destination.
///
/// # Invariants
///
/// - At least one leg, and at least one of them is a transit leg
/// - Consecutive legs connect (destination of one = origin of next)
/// - Every leg arrives no earlier than it departs, and no leg departs
///   before the previous one arrives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    legs: Vec<JourneyLeg>,
}

impl Journey {
    /// Constructs a journey, validating its invariants.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_planner::domain::{Journey, JourneyLeg, TransitLeg, RouteId, ServiceTime, StopId, TripId};
    ///
    /// let leg = TransitLeg {
    ///     route_id: RouteId::parse("L1").unwrap(),
    ///     trip_id: TripId::parse("T1").unwrap(),
    ///     from_stop: StopId::parse("A").unwrap(),
    ///     to_stop: StopId::parse("C").unwrap(),
    ///     departure_time: ServiceTime::parse("08:00:00").unwrap(),
    ///     arrival_time: ServiceTime::parse("08:20:00").unwrap(),
    ///     intermediate_stops: vec![StopId::parse("B").unwrap()],
    /// };
    ///
    /// let journey = Journey::new(vec![JourneyLeg::Transit(leg)]).unwrap();
    /// assert_eq!(journey.transfers(), 0);
    /// assert_eq!(journey.duration_minutes(), 20);
    /// ```
    pub fn new(legs: Vec<JourneyLeg>) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyJourney);
        }

        if !legs.iter().any(JourneyLeg::is_transit) {
            return Err(DomainError::NoTransitLeg);
        }

        for leg in &legs {
            if leg.arrival_time() < leg.departure_time() {
                return Err(DomainError::InvalidLeg("arrives before it departs"));
            }
        }

        for window in legs.windows(2) {
            let (prev, next) = (&window[0], &window[1]);
            if prev.to_stop() != next.from_stop() {
                return Err(DomainError::LegsNotConnected(
                    prev.to_stop().clone(),
                    next.from_stop().clone(),
                ));
            }
            if next.departure_time() < prev.arrival_time() {
                return Err(DomainError::LegsOverlap(next.from_stop().clone()));
            }
        }

        Ok(Journey { legs })
    }

    /// Returns all legs in order.
    pub fn legs(&self) -> &[JourneyLeg] {
        &self.legs
    }

    /// Returns the transit legs in order.
    pub fn transit_legs(&self) -> impl Iterator<Item = &TransitLeg> {
        self.legs.iter().filter_map(JourneyLeg::as_transit)
    }

    /// Returns the walking legs in order.
    pub fn walking_legs(&self) -> impl Iterator<Item = &WalkingLeg> {
        self.legs.iter().filter_map(JourneyLeg::as_walking)
    }

    /// Number of vehicle changes, not counting the initial boarding.
    pub fn transfers(&self) -> usize {
        self.transit_legs().count().saturating_sub(1)
    }

    /// Returns the origin stop.
    pub fn origin(&self) -> &StopId {
        // Safe: validated non-empty at construction
        self.legs[0].from_stop()
    }

    /// Returns the destination stop.
    pub fn destination(&self) -> &StopId {
        self.legs[self.legs.len() - 1].to_stop()
    }

    /// Time the journey leaves its origin.
    pub fn departure_time(&self) -> ServiceTime {
        self.legs[0].departure_time()
    }

    /// Time the journey reaches its destination.
    pub fn arrival_time(&self) -> ServiceTime {
        self.legs[self.legs.len() - 1].arrival_time()
    }

    /// Returns the total journey duration.
    pub fn duration(&self) -> Duration {
        self.arrival_time()
            .signed_duration_since(self.departure_time())
    }

    /// Total journey duration in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Returns the total walking time in seconds.
    pub fn total_walk_seconds(&self) -> u32 {
        self.walking_legs().map(|w| w.walk_seconds).sum()
    }

    /// Returns true if this is a direct journey (one vehicle).
    pub fn is_direct(&self) -> bool {
        self.transit_legs().count() == 1
    }

    /// The same journey with every time moved `seconds` earlier.
    ///
    /// Used to re-express a journey on the following service day. Returns
    /// `None` if any time would fall before that day's midnight.
    pub fn shifted_earlier(&self, seconds: u32) -> Option<Journey> {
        let legs = self
            .legs
            .iter()
            .map(|leg| {
                Some(match leg {
                    JourneyLeg::Transit(t) => JourneyLeg::Transit(TransitLeg {
                        departure_time: t.departure_time.minus_seconds(seconds)?,
                        arrival_time: t.arrival_time.minus_seconds(seconds)?,
                        ..t.clone()
                    }),
                    JourneyLeg::Walking(w) => JourneyLeg::Walking(WalkingLeg {
                        departure_time: w.departure_time.minus_seconds(seconds)?,
                        arrival_time: w.arrival_time.minus_seconds(seconds)?,
                        ..w.clone()
                    }),
                })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Journey { legs })
    }
}
