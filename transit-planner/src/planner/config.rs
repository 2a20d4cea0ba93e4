//! Search configuration for the journey planner.

/// Hard cap on search rounds; a round is one more vehicle boarded.
pub const MAX_ROUNDS: usize = 8;

/// Buffer added to every walking transfer on top of the walk itself.
pub const TRANSFER_PENALTY_SECONDS: u32 = 60;

/// Configuration parameters for journey search.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Default maximum number of vehicle changes.
    pub max_transfers: usize,

    /// Maximum number of journeys to return.
    pub max_alternatives: usize,

    /// Seconds added to each walking transfer.
    pub transfer_penalty_seconds: u32,

    /// Radius for deriving walking transfers between nearby stops when a
    /// snapshot is loaded. Zero disables derivation.
    pub proximity_transfer_radius_m: f64,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        max_transfers: usize,
        max_alternatives: usize,
        transfer_penalty_seconds: u32,
        proximity_transfer_radius_m: f64,
    ) -> Self {
        Self {
            max_transfers,
            max_alternatives,
            transfer_penalty_seconds,
            proximity_transfer_radius_m,
        }
    }

    /// Number of rounds needed for `max_transfers`, bounded by `MAX_ROUNDS`.
    pub fn rounds_for(max_transfers: usize) -> usize {
        max_transfers.saturating_add(1).min(MAX_ROUNDS)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_transfers: 3,
            max_alternatives: 5,
            transfer_penalty_seconds: TRANSFER_PENALTY_SECONDS,
            proximity_transfer_radius_m: 0.0,
        }
    }
}
