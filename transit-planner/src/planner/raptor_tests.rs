//! Scenario tests for the RAPTOR planner.

use chrono::{Duration, NaiveDate, NaiveTime};

use super::testing::{Network, date, stop, time};
use super::*;
use crate::domain::{JourneyLeg, ServiceId, ServiceTime};
use crate::schedule::{ExceptionType, ScheduleSnapshot, ServiceCalendar};

fn plan_with(
    snapshot: &ScheduleSnapshot,
    config: &PlannerConfig,
    origins: &[&str],
    destinations: &[&str],
    departure: &str,
    max_transfers: usize,
) -> Result<Vec<Journey>, PlanError> {
    let query = PlanQuery::new(
        origins.iter().map(|s| stop(s)).collect(),
        destinations.iter().map(|s| stop(s)).collect(),
        time(departure),
        date(),
        max_transfers,
    );
    RaptorPlanner::new(snapshot, config).plan(&query)
}

fn plan(
    snapshot: &ScheduleSnapshot,
    origins: &[&str],
    destinations: &[&str],
    departure: &str,
    max_transfers: usize,
) -> Vec<Journey> {
    plan_with(
        snapshot,
        &PlannerConfig::default(),
        origins,
        destinations,
        departure,
        max_transfers,
    )
    .unwrap()
}

#[test]
fn direct_trip() {
    let snapshot = Network::new()
        .trip("L1", "T1", &[("A", "08:00:00"), ("C", "08:20:00")])
        .build();

    let journeys = plan(&snapshot, &["A"], &["C"], "08:00:00", 2);

    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].transfers(), 0);
    assert_eq!(journeys[0].duration_minutes(), 20);
    assert_eq!(journeys[0].departure_time(), time("08:00:00"));
    assert_eq!(journeys[0].arrival_time(), time("08:20:00"));
}

#[test]
fn one_transfer_via_walk() {
    let snapshot = Network::new()
        .trip("L1", "T1", &[("A", "08:00:00"), ("B", "08:10:00")])
        .transfer("B", "B2", 120)
        .trip("L2", "T2", &[("B2", "08:14:00"), ("D", "08:30:00")])
        .build();

    let journeys = plan(&snapshot, &["A"], &["D"], "08:00:00", 2);

    assert_eq!(journeys.len(), 1);
    let journey = &journeys[0];
    assert_eq!(journey.transfers(), 1);
    assert_eq!(journey.arrival_time(), time("08:30:00"));

    let legs = journey.legs();
    assert_eq!(legs.len(), 3);
    let walk = legs[1].as_walking().unwrap();
    assert_eq!(walk.from_stop, stop("B"));
    assert_eq!(walk.to_stop, stop("B2"));
    assert_eq!(walk.walk_seconds, 120);
    assert_eq!(walk.departure_time, time("08:10:00"));
    // Walk plus the transfer buffer
    assert_eq!(walk.arrival_time, time("08:13:00"));
    assert_eq!(journey.total_walk_seconds(), 120);
}

#[test]
fn transfer_penalty_can_make_connection_impossible() {
    // 120 s walk + 60 s buffer lands at 08:13, after the 08:12 departure
    let snapshot = Network::new()
        .trip("L1", "T1", &[("A", "08:00:00"), ("B", "08:10:00")])
        .transfer("B", "B2", 120)
        .trip("L2", "T2", &[("B2", "08:12:00"), ("D", "08:30:00")])
        .build();

    assert!(plan(&snapshot, &["A"], &["D"], "08:00:00", 2).is_empty());
}

#[test]
fn same_stop_change_needs_no_buffer() {
    let snapshot = Network::new()
        .trip("L1", "T1", &[("A", "08:00:00"), ("B", "08:10:00")])
        .trip("L2", "T2", &[("B", "08:10:00"), ("D", "08:30:00")])
        .build();

    let journeys = plan(&snapshot, &["A"], &["D"], "08:00:00", 2);

    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].transfers(), 1);
    assert_eq!(journeys[0].legs().len(), 2);
}

#[test]
fn disconnected_network_is_empty() {
    let snapshot = Network::new()
        .trip("L1", "T1", &[("X", "08:00:00"), ("P", "08:10:00")])
        .trip("L2", "T2", &[("Q", "08:00:00"), ("Y", "08:10:00")])
        .build();

    assert!(plan(&snapshot, &["X"], &["Y"], "07:00:00", 3).is_empty());
}

#[test]
fn multi_platform_origin() {
    let snapshot = Network::new()
        .platform("A1", "A")
        .platform("A2", "A")
        .trip("L1", "T1", &[("A2", "08:05:00"), ("C", "08:25:00")])
        .build();

    let journeys = plan(&snapshot, &["A1", "A2"], &["C"], "08:00:00", 2);

    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].origin(), &stop("A2"));
}

#[test]
fn multi_platform_destination_picks_earliest() {
    let snapshot = Network::new()
        .trip("L1", "T1", &[("A", "08:00:00"), ("D1", "08:30:00")])
        .trip("L2", "T2", &[("A", "08:00:00"), ("D2", "08:20:00")])
        .build();

    let journeys = plan(&snapshot, &["A"], &["D1", "D2"], "08:00:00", 2);

    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].destination(), &stop("D2"));
}

#[test]
fn faster_later_trip_wins_over_earlier_slower_one() {
    // SLOW leaves first but FAST overtakes it
    let snapshot = Network::new()
        .trip("L1", "SLOW", &[("S", "08:00:00"), ("T", "08:40:00")])
        .trip("L1", "FAST", &[("S", "08:05:00"), ("T", "08:20:00")])
        .build();
    assert_eq!(snapshot.patterns().len(), 2);

    for departure in ["07:30:00", "08:00:00", "08:05:00"] {
        let journeys = plan(&snapshot, &["S"], &["T"], departure, 0);
        assert_eq!(journeys.len(), 1, "departing {departure}");
        assert_eq!(journeys[0].arrival_time(), time("08:20:00"));
        let leg = journeys[0].legs()[0].as_transit().unwrap();
        assert_eq!(leg.trip_id.as_str(), "FAST");
    }
}

#[test]
fn overnight_arrival_lands_on_next_day() {
    let snapshot = Network::new()
        .trip("N1", "OWL", &[("A", "23:50:00"), ("B", "25:00:00")])
        .build();

    let journeys = plan(&snapshot, &["A"], &["B"], "23:45:00", 0);

    assert_eq!(journeys.len(), 1);
    let arrival = journeys[0].arrival_time();
    assert_eq!(arrival.seconds(), 90_000);
    assert_eq!(
        arrival.on_date(date()),
        (date() + Duration::days(1)).and_time(NaiveTime::from_hms_opt(1, 0, 0).unwrap())
    );
    assert_eq!(journeys[0].duration_minutes(), 70);
}

#[test]
fn identical_queries_give_identical_results() {
    let snapshot = pareto_network();
    let first = plan(&snapshot, &["A"], &["D"], "08:00:00", 3);
    let second = plan(&snapshot, &["A"], &["D"], "08:00:00", 3);
    assert_eq!(first, second);
}

/// A slow direct line and a faster route with one change.
fn pareto_network() -> ScheduleSnapshot {
    Network::new()
        .trip("L1", "DIRECT", &[("A", "08:00:00"), ("D", "09:00:00")])
        .trip("L2", "FIRST", &[("A", "08:00:00"), ("B", "08:10:00")])
        .trip("L3", "SECOND", &[("B", "08:15:00"), ("D", "08:40:00")])
        .build()
}

#[test]
fn pareto_frontier_keeps_both_tradeoffs() {
    let journeys = plan(&pareto_network(), &["A"], &["D"], "08:00:00", 3);

    assert_eq!(journeys.len(), 2);
    assert_eq!(journeys[0].arrival_time(), time("08:40:00"));
    assert_eq!(journeys[0].transfers(), 1);
    assert_eq!(journeys[1].arrival_time(), time("09:00:00"));
    assert_eq!(journeys[1].transfers(), 0);
}

#[test]
fn transfer_budget_is_respected() {
    let snapshot = pareto_network();

    let journeys = plan(&snapshot, &["A"], &["D"], "08:00:00", 0);
    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].transfers(), 0);
    assert_eq!(journeys[0].arrival_time(), time("09:00:00"));
}

#[test]
fn two_changes_need_budget_of_two() {
    let snapshot = Network::new()
        .trip("L1", "T1", &[("A", "08:00:00"), ("B", "08:10:00")])
        .trip("L2", "T2", &[("B", "08:15:00"), ("C", "08:25:00")])
        .trip("L3", "T3", &[("C", "08:30:00"), ("D", "08:40:00")])
        .build();

    assert!(plan(&snapshot, &["A"], &["D"], "08:00:00", 1).is_empty());

    let journeys = plan(&snapshot, &["A"], &["D"], "08:00:00", 2);
    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].transfers(), 2);
}

#[test]
fn max_alternatives_truncates() {
    let config = PlannerConfig {
        max_alternatives: 1,
        ..PlannerConfig::default()
    };
    let journeys = plan_with(&pareto_network(), &config, &["A"], &["D"], "08:00:00", 3).unwrap();

    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].arrival_time(), time("08:40:00"));
}

#[test]
fn missed_trip_is_not_boarded() {
    let snapshot = Network::new()
        .trip("L1", "T1", &[("A", "07:50:00"), ("C", "08:20:00")])
        .build();

    assert!(plan(&snapshot, &["A"], &["C"], "08:00:00", 2).is_empty());
}

#[test]
fn boards_next_trip_after_departure_time() {
    let snapshot = Network::new()
        .trip("L1", "EARLY", &[("A", "07:50:00"), ("C", "08:10:00")])
        .trip("L1", "LATE", &[("A", "08:10:00"), ("C", "08:30:00")])
        .build();

    let journeys = plan(&snapshot, &["A"], &["C"], "08:00:00", 0);
    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].departure_time(), time("08:10:00"));
}

#[test]
fn intermediate_stops_are_recorded() {
    let snapshot = Network::new()
        .trip(
            "L1",
            "T1",
            &[("A", "08:00:00"), ("B", "08:05:00"), ("C", "08:10:00"), ("D", "08:15:00")],
        )
        .build();

    let journeys = plan(&snapshot, &["A"], &["D"], "08:00:00", 0);
    let leg = journeys[0].legs()[0].as_transit().unwrap();
    assert_eq!(leg.intermediate_stops, vec![stop("B"), stop("C")]);
}

#[test]
fn boarding_mid_pattern() {
    let snapshot = Network::new()
        .trip(
            "L1",
            "T1",
            &[("A", "08:00:00"), ("B", "08:05:00"), ("C", "08:10:00")],
        )
        .build();

    let journeys = plan(&snapshot, &["B"], &["C"], "08:00:00", 0);
    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].departure_time(), time("08:05:00"));
    assert!(journeys[0].legs()[0].as_transit().unwrap().intermediate_stops.is_empty());
}

#[test]
fn dwell_time_uses_departure_for_boarding() {
    let snapshot = Network::new()
        .trip_with_dwell(
            "ALL",
            "L1",
            "T1",
            &[
                ("A", "08:00:00", "08:00:00"),
                ("B", "08:05:00", "08:09:00"),
                ("C", "08:15:00", "08:15:00"),
            ],
        )
        .build();

    // Arriving at B at 08:07 still catches the 08:09 departure
    let journeys = plan(&snapshot, &["B"], &["C"], "08:07:00", 0);
    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].departure_time(), time("08:09:00"));
}

#[test]
fn walk_from_origin_before_boarding() {
    let snapshot = Network::new()
        .transfer("A", "A2", 60)
        .trip("L1", "T1", &[("A2", "08:05:00"), ("D", "08:25:00")])
        .build();

    let journeys = plan(&snapshot, &["A"], &["D"], "08:00:00", 1);

    assert_eq!(journeys.len(), 1);
    let legs = journeys[0].legs();
    assert_eq!(legs.len(), 2);
    let walk = legs[0].as_walking().unwrap();
    // Leaves as late as possible: 60 s walk + 60 s buffer before 08:05
    assert_eq!(walk.departure_time, time("08:03:00"));
    assert_eq!(walk.arrival_time, time("08:05:00"));
    assert_eq!(journeys[0].transfers(), 0);
}

#[test]
fn walk_to_destination_after_last_vehicle() {
    let snapshot = Network::new()
        .trip("L1", "T1", &[("A", "08:00:00"), ("B", "08:10:00")])
        .transfer("B", "D", 120)
        .build();

    let journeys = plan(&snapshot, &["A"], &["D"], "08:00:00", 0);

    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].transfers(), 0);
    assert_eq!(journeys[0].arrival_time(), time("08:13:00"));
    assert!(matches!(journeys[0].legs()[1], JourneyLeg::Walking(_)));
}

#[test]
fn walk_only_journeys_are_not_reported() {
    let snapshot = Network::new()
        .transfer("A", "D", 120)
        .trip("L1", "T1", &[("A", "08:00:00"), ("D", "08:30:00")])
        .build();

    let journeys = plan(&snapshot, &["A"], &["D"], "08:00:00", 2);

    assert_eq!(journeys.len(), 1);
    assert!(journeys[0].legs()[0].is_transit());
}

#[test]
fn walks_do_not_chain() {
    let snapshot = Network::new()
        .trip("L1", "T1", &[("A", "08:00:00"), ("B", "08:10:00")])
        .transfer("B", "B2", 60)
        .transfer("B2", "B3", 60)
        .trip("L2", "T2", &[("B3", "08:30:00"), ("D", "08:40:00")])
        .build();

    assert!(plan(&snapshot, &["A"], &["D"], "08:00:00", 3).is_empty());
}

/// X is reached on foot from A before T1 gets there, but only T1's arrival
/// may walk on to Y.
fn walk_shadowed_network(with_origin_walk: bool) -> ScheduleSnapshot {
    let network = Network::new()
        .trip("L1", "T1", &[("A", "08:00:00"), ("X", "08:05:00")])
        .transfer("X", "Y", 60)
        .trip("L2", "T2", &[("Y", "08:10:00"), ("D", "08:20:00")]);
    if with_origin_walk {
        network.transfer("A", "X", 60).build()
    } else {
        network.build()
    }
}

#[test]
fn vehicle_arrival_walks_on_after_earlier_walk_arrival() {
    for with_origin_walk in [false, true] {
        let journeys = plan(
            &walk_shadowed_network(with_origin_walk),
            &["A"],
            &["D"],
            "08:00:00",
            3,
        );

        assert_eq!(journeys.len(), 1, "origin walk: {with_origin_walk}");
        let journey = &journeys[0];
        assert_eq!(journey.arrival_time(), time("08:20:00"));
        assert_eq!(journey.transfers(), 1);
        let walk = journey.legs()[1].as_walking().unwrap();
        assert_eq!(walk.from_stop, stop("X"));
        assert_eq!(walk.departure_time, time("08:05:00"));
        assert_eq!(walk.arrival_time, time("08:07:00"));
    }
}

#[test]
fn dijkstra_vehicle_arrival_walks_on_after_earlier_walk_arrival() {
    let snapshot = walk_shadowed_network(true);
    let config = PlannerConfig::default();
    let query = PlanQuery::new(vec![stop("A")], vec![stop("D")], time("08:00:00"), date(), 3);

    let journeys = EarliestArrivalPlanner::new(&snapshot, &config)
        .plan(&query)
        .unwrap();

    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].arrival_time(), time("08:20:00"));
    assert_eq!(journeys[0].legs().len(), 3);
}

#[test]
fn origin_equal_to_destination_is_empty() {
    let snapshot = pareto_network();
    assert!(plan(&snapshot, &["A"], &["A"], "08:00:00", 3).is_empty());
}

#[test]
fn unknown_stop_is_an_error() {
    let snapshot = pareto_network();
    let config = PlannerConfig::default();

    let result = plan_with(&snapshot, &config, &["A"], &["NOPE"], "08:00:00", 3);
    assert_eq!(result, Err(PlanError::UnknownStop(stop("NOPE"))));

    let result = plan_with(&snapshot, &config, &["NOPE"], &["D"], "08:00:00", 3);
    assert_eq!(result, Err(PlanError::UnknownStop(stop("NOPE"))));
}

#[test]
fn empty_endpoint_is_an_error() {
    let snapshot = pareto_network();
    let result = plan_with(&snapshot, &PlannerConfig::default(), &[], &["D"], "08:00:00", 3);
    assert_eq!(result, Err(PlanError::EmptyEndpoint));
}

fn weekday_network() -> Network {
    Network::new()
        .calendar(ServiceCalendar {
            saturday: false,
            sunday: false,
            ..ServiceCalendar::daily(
                ServiceId::parse("WK").unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            )
        })
        .trip_on("WK", "L1", "T1", &[("A", "08:00:00"), ("C", "08:20:00")])
}

fn plan_on(snapshot: &ScheduleSnapshot, day: NaiveDate) -> Vec<Journey> {
    let query = PlanQuery::new(vec![stop("A")], vec![stop("C")], time("07:00:00"), day, 0);
    RaptorPlanner::new(snapshot, &PlannerConfig::default())
        .plan(&query)
        .unwrap()
}

#[test]
fn weekly_calendar_filters_trips() {
    let snapshot = weekday_network().build();
    let saturday = date() + Duration::days(1);

    assert_eq!(plan_on(&snapshot, date()).len(), 1);
    assert!(plan_on(&snapshot, saturday).is_empty());
}

#[test]
fn removed_exception_cancels_service() {
    let snapshot = weekday_network()
        .exception("WK", date(), ExceptionType::Removed)
        .build();

    assert!(plan_on(&snapshot, date()).is_empty());
    assert_eq!(plan_on(&snapshot, date() - Duration::days(1)).len(), 1);
}

#[test]
fn added_exception_runs_on_weekend() {
    let saturday = date() + Duration::days(1);
    let snapshot = weekday_network()
        .exception("WK", saturday, ExceptionType::Added)
        .build();

    assert_eq!(plan_on(&snapshot, saturday).len(), 1);
    assert!(plan_on(&snapshot, saturday + Duration::days(1)).is_empty());
}

#[test]
fn skips_non_running_trip_for_next_running_one() {
    let snapshot = weekday_network()
        .calendar(ServiceCalendar {
            monday: false,
            tuesday: false,
            wednesday: false,
            thursday: false,
            friday: false,
            ..ServiceCalendar::daily(
                ServiceId::parse("WE").unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            )
        })
        .trip_on("WE", "L1", "T0", &[("A", "07:30:00"), ("C", "07:50:00")])
        .build();

    let journeys = plan_on(&snapshot, date());
    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].departure_time(), time("08:00:00"));
}

#[test]
fn raptor_and_dijkstra_agree_on_simple_network() {
    let snapshot = pareto_network();
    let config = PlannerConfig::default();
    let query = PlanQuery::new(vec![stop("A")], vec![stop("D")], time("08:00:00"), date(), 3);

    let raptor = RaptorPlanner::new(&snapshot, &config).plan(&query).unwrap();
    let dijkstra = EarliestArrivalPlanner::new(&snapshot, &config)
        .plan(&query)
        .unwrap();

    assert_eq!(raptor[0].arrival_time(), dijkstra[0].arrival_time());
}

#[test]
fn strategy_selects_planner() {
    let snapshot = pareto_network();
    let config = PlannerConfig::default();
    let query = PlanQuery::new(vec![stop("A")], vec![stop("D")], time("08:00:00"), date(), 3);

    let raptor = Strategy::Raptor.planner(&snapshot, &config).plan(&query).unwrap();
    let earliest = Strategy::EarliestArrival
        .planner(&snapshot, &config)
        .plan(&query)
        .unwrap();

    assert_eq!(raptor.len(), 2);
    assert_eq!(earliest.len(), 1);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;
    use proptest::prelude::Strategy;

    const STOPS: [&str; 6] = ["S0", "S1", "S2", "S3", "S4", "S5"];

    /// (stop sequence, trips as (start minute, [(ride, dwell)]))
    type RouteSpec = (Vec<usize>, Vec<(u32, Vec<(u32, u32)>)>);

    /// (from stop, to stop, walk seconds)
    type TransferSpec = (usize, usize, u32);

    #[derive(Debug, Clone)]
    struct NetworkSpec {
        routes: Vec<RouteSpec>,
        transfers: Vec<TransferSpec>,
    }

    fn route_strategy() -> impl Strategy<Value = RouteSpec> {
        prop::sample::subsequence((0..STOPS.len()).collect::<Vec<_>>(), 2..=4)
            .prop_shuffle()
            .prop_flat_map(|stops| {
                let hops = stops.len();
                let trip = (
                    0u32..120,
                    prop::collection::vec((1u32..30, 0u32..3), hops),
                );
                (Just(stops), prop::collection::vec(trip, 1..=3))
            })
    }

    fn transfer_strategy() -> impl Strategy<Value = TransferSpec> {
        (0..STOPS.len(), 0..STOPS.len(), 30u32..600)
    }

    fn network_strategy() -> impl Strategy<Value = NetworkSpec> {
        (
            prop::collection::vec(route_strategy(), 1..=3),
            prop::collection::vec(transfer_strategy(), 0..8),
        )
            .prop_map(|(routes, transfers)| NetworkSpec { routes, transfers })
    }

    fn hhmmss(minutes: u32) -> String {
        ServiceTime::from_seconds(minutes * 60).to_string()
    }

    fn build(spec: &NetworkSpec) -> ScheduleSnapshot {
        let mut network = Network::new();
        for (r, (stops, trips)) in spec.routes.iter().enumerate() {
            for (t, (start, hops)) in trips.iter().enumerate() {
                // Service starts at 08:00; times are minutes after midnight
                let mut clock = 8 * 60 + start;
                let mut calls = Vec::with_capacity(stops.len());
                for (n, &s) in stops.iter().enumerate() {
                    let (ride, dwell) = hops[n];
                    let arrival = clock;
                    let departure = arrival + dwell;
                    calls.push((STOPS[s], hhmmss(arrival), hhmmss(departure)));
                    clock = departure + ride;
                }
                let calls: Vec<(&str, &str, &str)> = calls
                    .iter()
                    .map(|(s, a, d)| (*s, a.as_str(), d.as_str()))
                    .collect();
                network = network.trip_with_dwell(
                    "ALL",
                    &format!("R{r}"),
                    &format!("R{r}T{t}"),
                    &calls,
                );
            }
        }
        for &(from, to, walk_seconds) in &spec.transfers {
            network = network.transfer(STOPS[from], STOPS[to], walk_seconds);
        }
        network.build()
    }

    fn earliest(
        snapshot: &ScheduleSnapshot,
        origin: &str,
        destination: &str,
    ) -> Option<ServiceTime> {
        RaptorPlanner::new(snapshot, &wide_config())
            .plan(&query(origin, destination, 7))
            .unwrap()
            .first()
            .map(Journey::arrival_time)
    }

    fn query(origin: &str, destination: &str, max_transfers: usize) -> PlanQuery {
        PlanQuery::new(
            vec![stop(origin)],
            vec![stop(destination)],
            time("08:00:00"),
            date(),
            max_transfers,
        )
    }

    fn wide_config() -> PlannerConfig {
        PlannerConfig {
            max_alternatives: 50,
            ..PlannerConfig::default()
        }
    }

    /// Pick an origin and a different destination that both exist.
    fn endpoints(snapshot: &ScheduleSnapshot, a: usize, b: usize) -> Option<(&'static str, &'static str)> {
        let (o, d) = (STOPS[a], STOPS[b]);
        (a != b && snapshot.stop_exists(&stop(o)) && snapshot.stop_exists(&stop(d)))
            .then_some((o, d))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        /// RAPTOR's earliest journey matches the Dijkstra planner.
        #[test]
        fn earliest_arrival_matches_dijkstra(
            spec in network_strategy(),
            a in 0..STOPS.len(),
            b in 0..STOPS.len(),
        ) {
            let snapshot = build(&spec);
            let Some((o, d)) = endpoints(&snapshot, a, b) else { return Ok(()); };
            let config = wide_config();
            let q = query(o, d, 7);

            let raptor = RaptorPlanner::new(&snapshot, &config).plan(&q).unwrap();
            let dijkstra = EarliestArrivalPlanner::new(&snapshot, &config).plan(&q).unwrap();

            prop_assert_eq!(
                raptor.first().map(Journey::arrival_time),
                dijkstra.first().map(Journey::arrival_time)
            );
        }

        /// Results respect the budget, are non-dominated and sorted.
        #[test]
        fn results_are_a_bounded_frontier(
            spec in network_strategy(),
            a in 0..STOPS.len(),
            b in 0..STOPS.len(),
            max_transfers in 0usize..4,
        ) {
            let snapshot = build(&spec);
            let Some((o, d)) = endpoints(&snapshot, a, b) else { return Ok(()); };
            let journeys = RaptorPlanner::new(&snapshot, &wide_config())
                .plan(&query(o, d, max_transfers))
                .unwrap();

            for j in &journeys {
                prop_assert!(j.transfers() <= max_transfers);
                prop_assert_eq!(j.origin(), &stop(o));
                prop_assert_eq!(j.destination(), &stop(d));
                prop_assert!(j.departure_time() >= time("08:00:00"));
            }
            for x in &journeys {
                for y in &journeys {
                    let dominated = x.arrival_time() <= y.arrival_time()
                        && x.transfers() <= y.transfers()
                        && (x.arrival_time() < y.arrival_time() || x.transfers() < y.transfers());
                    prop_assert!(!dominated);
                }
            }
            for pair in journeys.windows(2) {
                prop_assert!(pair[0].arrival_time() <= pair[1].arrival_time());
            }
        }

        /// A larger budget never makes the best arrival worse.
        #[test]
        fn budget_is_monotonic(
            spec in network_strategy(),
            a in 0..STOPS.len(),
            b in 0..STOPS.len(),
        ) {
            let snapshot = build(&spec);
            let Some((o, d)) = endpoints(&snapshot, a, b) else { return Ok(()); };
            let config = wide_config();
            let best = |k: usize| {
                RaptorPlanner::new(&snapshot, &config)
                    .plan(&query(o, d, k))
                    .unwrap()
                    .first()
                    .map(Journey::arrival_time)
            };

            let mut previous = best(0);
            for k in 1..5 {
                let current = best(k);
                if let Some(p) = previous {
                    prop_assert!(current.is_some_and(|c| c <= p));
                }
                previous = current;
            }
        }

        /// Any direct pattern connection yields a journey without transfers.
        #[test]
        fn direct_connection_is_found(
            spec in network_strategy(),
            pick in any::<prop::sample::Index>(),
            max_transfers in 0usize..3,
        ) {
            let snapshot = build(&spec);
            let (stops, _) = &spec.routes[pick.index(spec.routes.len())];
            let (o, d) = (STOPS[stops[0]], STOPS[stops[stops.len() - 1]]);

            let journeys = RaptorPlanner::new(&snapshot, &wide_config())
                .plan(&query(o, d, max_transfers))
                .unwrap();
            prop_assert!(journeys.iter().any(|j| j.transfers() == 0));
        }

        /// Same inputs, same output.
        #[test]
        fn planning_is_deterministic(
            spec in network_strategy(),
            a in 0..STOPS.len(),
            b in 0..STOPS.len(),
        ) {
            let snapshot = build(&spec);
            let Some((o, d)) = endpoints(&snapshot, a, b) else { return Ok(()); };
            let config = wide_config();
            let q = query(o, d, 3);

            let first = RaptorPlanner::new(&snapshot, &config).plan(&q).unwrap();
            let second = RaptorPlanner::new(&snapshot, &config).plan(&q).unwrap();
            prop_assert_eq!(first, second);
        }

        /// An extra walking transfer only adds options.
        #[test]
        fn extra_transfer_never_hurts(
            spec in network_strategy(),
            a in 0..STOPS.len(),
            b in 0..STOPS.len(),
            extra in transfer_strategy(),
            from_origin in any::<bool>(),
        ) {
            let base = build(&spec);
            let Some((o, d)) = endpoints(&base, a, b) else { return Ok(()); };
            let mut extended = spec.clone();
            let (from, to, walk_seconds) = extra;
            extended
                .transfers
                .push((if from_origin { a } else { from }, to, walk_seconds));
            let extended = build(&extended);

            if let Some(before) = earliest(&base, o, d) {
                let after = earliest(&extended, o, d);
                prop_assert!(after.is_some_and(|t| t <= before));
            }

            let config = wide_config();
            let dijkstra = |snapshot: &ScheduleSnapshot| {
                EarliestArrivalPlanner::new(snapshot, &config)
                    .plan(&query(o, d, 7))
                    .unwrap()
                    .first()
                    .map(Journey::arrival_time)
            };
            if let Some(before) = dijkstra(&base) {
                prop_assert!(dijkstra(&extended).is_some_and(|t| t <= before));
            }
        }
    }
}
