//! Journey ranking for search results.
//!
//! Candidates from all rounds are reduced to the Pareto frontier over
//! arrival time and number of transfers, then ordered for presentation.

use std::cmp::Ordering;

use crate::domain::Journey;

/// Reduce candidates to the ranked Pareto frontier.
///
/// Removes dominated journeys, then duplicates, then ranks the survivors.
pub fn pareto_frontier(journeys: Vec<Journey>) -> Vec<Journey> {
    rank_journeys(deduplicate(remove_dominated(journeys)))
}

/// Rank journeys by preference.
///
/// Journeys are ranked by:
/// 1. Arrival time (earlier is better)
/// 2. Number of transfers (fewer is better)
/// 3. Departure time (later is better: less waiting)
///
/// Returns journeys sorted best-first. The sort is stable.
pub fn rank_journeys(mut journeys: Vec<Journey>) -> Vec<Journey> {
    journeys.sort_by(compare);
    journeys
}

fn compare(a: &Journey, b: &Journey) -> Ordering {
    a.arrival_time()
        .cmp(&b.arrival_time())
        .then_with(|| a.transfers().cmp(&b.transfers()))
        .then_with(|| b.departure_time().cmp(&a.departure_time()))
}

/// Whether `a` is at least as good as `b` in both criteria and strictly
/// better in one.
fn dominates(a: &Journey, b: &Journey) -> bool {
    a.arrival_time() <= b.arrival_time()
        && a.transfers() <= b.transfers()
        && (a.arrival_time() < b.arrival_time() || a.transfers() < b.transfers())
}

/// Remove dominated journeys.
///
/// A journey is dominated if another journey arrives no later with no more
/// transfers, and is strictly better in at least one of the two.
pub fn remove_dominated(journeys: Vec<Journey>) -> Vec<Journey> {
    if journeys.len() <= 1 {
        return journeys;
    }

    let mut result: Vec<Journey> = Vec::with_capacity(journeys.len());

    for journey in journeys {
        if result.iter().any(|existing| dominates(existing, &journey)) {
            continue;
        }
        // Also remove any existing journeys dominated by this one
        result.retain(|existing| !dominates(&journey, existing));
        result.push(journey);
    }

    result
}

/// Deduplicate journeys that are effectively identical.
///
/// Two journeys are duplicates if they depart and arrive at the same times
/// with the same number of transfers. The first one in ranking order is kept.
pub fn deduplicate(journeys: Vec<Journey>) -> Vec<Journey> {
    if journeys.len() <= 1 {
        return journeys;
    }

    let mut journeys = rank_journeys(journeys);
    journeys.dedup_by_key(|j| (j.departure_time(), j.arrival_time(), j.transfers()));
    journeys
}
