//! Transit journey planner.
//!
//! Answers "how do I get from these stops to those stops, leaving at this
//! time?" over a static timetable, returning the Pareto-optimal journeys
//! over arrival time and number of transfers.
//!
//! - `domain`: identifiers, service times and journeys
//! - `schedule`: the immutable, indexed timetable snapshot
//! - `planner`: the RAPTOR search and the earliest-arrival alternative
//! - `service`: request defaults, caching and presentation
//! - `web`: the HTTP surface

pub mod domain;
pub mod planner;
pub mod schedule;
pub mod service;
pub mod web;
