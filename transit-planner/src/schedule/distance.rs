//! Great-circle helpers over stop coordinates.

use geo::{Bearing, Distance, Haversine, Point};

use super::model::Stop;

/// Metres between two stops along the great circle.
pub fn haversine_m(from: &Stop, to: &Stop) -> f64 {
    Haversine.distance(point(from), point(to))
}

/// Initial compass bearing from one stop towards another, in `[0, 360)`.
pub fn bearing_deg(from: &Stop, to: &Stop) -> f64 {
    Haversine.bearing(point(from), point(to)).rem_euclid(360.0)
}

fn point(stop: &Stop) -> Point<f64> {
    Point::new(stop.lon, stop.lat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StopId;

    fn stop(lat: f64, lon: f64) -> Stop {
        Stop {
            id: StopId::parse("S").unwrap(),
            name: "S".into(),
            lat,
            lon,
            parent_station: None,
        }
    }

    #[test]
    fn distance_of_one_millidegree_latitude() {
        let d = haversine_m(&stop(48.0, 2.0), &stop(48.001, 2.0));
        assert!((d - 111.2).abs() < 1.0, "got {d}");
    }

    #[test]
    fn bearing_points_north_and_east() {
        let origin = stop(48.0, 2.0);
        let north = bearing_deg(&origin, &stop(48.01, 2.0));
        let east = bearing_deg(&origin, &stop(48.0, 2.01));
        assert!(north < 1.0 || north > 359.0, "got {north}");
        assert!((east - 90.0).abs() < 1.0, "got {east}");
    }

    #[test]
    fn bearing_is_normalised() {
        let west = bearing_deg(&stop(48.0, 2.0), &stop(48.0, 1.99));
        assert!((west - 270.0).abs() < 1.0, "got {west}");
    }
}
