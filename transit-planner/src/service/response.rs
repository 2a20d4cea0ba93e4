//! Planning responses.

use serde::Serialize;

use super::presentation::JourneyView;

/// Reason given when an endpoint list is empty.
pub const NO_STOPS_GIVEN: &str = "no stops given";

/// Reason given when the search finds nothing.
pub const NO_ROUTE_FOUND: &str = "no route found";

/// Outcome of a planning request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// At least one journey was found.
    Found,
    /// The request was understood but no journey answers it.
    NoJourney,
    /// The planner hit an internal fault.
    Internal,
}

/// Response to a `PlanRequest`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResponse {
    pub status: PlanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Journey options, best first
    pub journeys: Vec<JourneyView>,
}

impl PlanResponse {
    pub fn found(journeys: Vec<JourneyView>) -> Self {
        Self {
            status: PlanStatus::Found,
            reason: None,
            journeys,
        }
    }

    pub fn no_journey(reason: impl Into<String>) -> Self {
        Self {
            status: PlanStatus::NoJourney,
            reason: Some(reason.into()),
            journeys: Vec::new(),
        }
    }

    pub fn unknown_stop(id: &str) -> Self {
        Self::no_journey(format!("unknown stop: {id}"))
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self {
            status: PlanStatus::Internal,
            reason: Some(reason.into()),
            journeys: Vec::new(),
        }
    }

    pub fn is_found(&self) -> bool {
        self.status == PlanStatus::Found
    }
}
