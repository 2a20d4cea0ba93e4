//! Turning round labels back into journeys.

use crate::domain::{Journey, JourneyLeg, ServiceTime, StopId, TransitLeg, WalkingLeg};
use crate::schedule::{ScheduleSnapshot, StopIdx, TripIdx};

use super::query::PlanError;
use super::raptor::{LabelKind, RoundLabels};

/// Backtrack from the label of `target` in `round` to an origin.
///
/// A transit label in round `k` continues from the latest label at its
/// boarding stop in a round before `k`; a walk label continues from the
/// transit label it extends in the same round. Each step therefore either
/// lowers the round or follows a walk, so the chain is finite.
pub(super) fn reconstruct(
    snapshot: &ScheduleSnapshot,
    labels: &RoundLabels,
    round: usize,
    target: StopIdx,
    penalty: u32,
) -> Result<Journey, PlanError> {
    let stop_id = |stop: StopIdx| snapshot.stop(stop).id.clone();
    let broken = |what: String| PlanError::Reconstruction(what);

    let mut round = round;
    let mut stop = target;
    let mut label = labels
        .get(round, stop)
        .ok_or_else(|| broken(format!("no label at {} in round {round}", stop_id(stop))))?;

    // One transit leg per round plus at most one walk after each
    let max_steps = 2 * (round + 1);
    let mut legs: Vec<JourneyLeg> = Vec::with_capacity(max_steps);

    for _ in 0..=max_steps {
        match label.kind {
            LabelKind::Origin => {
                legs.reverse();
                return Journey::new(legs).map_err(|err| broken(err.to_string()));
            }
            LabelKind::Transit {
                trip,
                boarding_stop,
                boarding_position,
                alight_position,
            } => {
                legs.push(JourneyLeg::Transit(transit_leg(
                    snapshot,
                    trip,
                    boarding_position,
                    alight_position,
                )));
                let (prior_round, prior) =
                    labels.latest_before(round, boarding_stop).ok_or_else(|| {
                        broken(format!(
                            "no label at boarding stop {} before round {round}",
                            stop_id(boarding_stop)
                        ))
                    })?;
                round = prior_round;
                stop = boarding_stop;
                label = prior;
            }
            LabelKind::Walk { from, walk_seconds } => {
                let source = if round == 0 {
                    labels.get(0, from)
                } else {
                    labels.transit(round, from)
                }
                .ok_or_else(|| {
                    broken(format!(
                        "walk to {} has no source label at {}",
                        stop_id(stop),
                        stop_id(from)
                    ))
                })?;

                let buffer = walk_seconds + penalty;
                let departure_time = if round == 0 {
                    // Leave the origin as late as the next boarding allows
                    legs.last()
                        .and_then(|next| next.departure_time().seconds().checked_sub(buffer))
                        .map(ServiceTime::from_seconds)
                        .map_or(source.arrival, |latest| latest.max(source.arrival))
                } else {
                    source.arrival
                };

                legs.push(JourneyLeg::Walking(WalkingLeg {
                    from_stop: stop_id(from),
                    to_stop: stop_id(stop),
                    departure_time,
                    arrival_time: departure_time + buffer,
                    walk_seconds,
                }));
                stop = from;
                label = source;
            }
        }
    }

    Err(broken(format!(
        "label chain from {} did not reach an origin",
        stop_id(target)
    )))
}

fn transit_leg(
    snapshot: &ScheduleSnapshot,
    trip: TripIdx,
    boarding_position: usize,
    alight_position: usize,
) -> TransitLeg {
    let record = snapshot.trip(trip);
    let times = snapshot.stop_times_of(trip);
    let stop_id = |position: usize| -> StopId { snapshot.stop(times[position].stop).id.clone() };

    TransitLeg {
        route_id: snapshot.route(record.route).id.clone(),
        trip_id: record.id.clone(),
        from_stop: stop_id(boarding_position),
        to_stop: stop_id(alight_position),
        departure_time: times[boarding_position].departure,
        arrival_time: times[alight_position].arrival,
        intermediate_stops: (boarding_position + 1..alight_position)
            .map(stop_id)
            .collect(),
    }
}
