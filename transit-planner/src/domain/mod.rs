//! Domain types for the transit journey planner.
//!
//! This module contains the value types shared by the schedule snapshot,
//! the search and the planning service. All types enforce their invariants
//! at construction time, so code that receives these types can trust their
//! validity.

mod error;
mod ids;
mod journey;
mod route_type;
mod time;

pub use error::DomainError;
pub use ids::{InvalidId, RouteId, ServiceId, StopId, TripId};
pub use journey::{Journey, JourneyLeg, TransitLeg, WALKING_SPEED_KMH, WalkingLeg};
pub use route_type::{RouteType, UnknownRouteType};
pub use time::{SECONDS_PER_DAY, ServiceTime, TimeError};
