//! Domain error types.
//!
//! These errors represent validation failures when assembling journeys.
//! They are distinct from schedule loading and search errors.

use super::StopId;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Invalid leg construction (e.g., arrives before it departs)
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// Consecutive legs don't meet at the same stop
    #[error("legs do not connect: {0} is not {1}")]
    LegsNotConnected(StopId, StopId),

    /// A leg departs before the previous one arrives
    #[error("leg from {0} departs before the previous leg arrives")]
    LegsOverlap(StopId),

    /// Journey has no legs
    #[error("journey must have at least one leg")]
    EmptyJourney,

    /// Journey has only walking legs
    #[error("journey must have at least one transit leg")]
    NoTransitLeg,
}
