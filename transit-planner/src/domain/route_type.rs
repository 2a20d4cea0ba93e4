//! Transit mode of a route.

use std::fmt;

/// Error returned for a route type code outside the known GTFS ranges.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown route type code: {0}")]
pub struct UnknownRouteType(pub u16);

/// The vehicle type serving a route.
///
/// Covers the basic GTFS codes plus the extended (HVT) ranges that map onto
/// them.
///
/// # Examples
///
/// ```
/// use transit_planner::domain::RouteType;
///
/// assert_eq!(RouteType::from_gtfs_code(1).unwrap(), RouteType::Metro);
/// assert_eq!(RouteType::from_gtfs_code(109).unwrap(), RouteType::Rail);
/// assert!(RouteType::from_gtfs_code(42).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum RouteType {
    Tram,
    Metro,
    Rail,
    Bus,
    Ferry,
    CableCar,
    Gondola,
    Funicular,
    Trolleybus,
    Monorail,
}

impl RouteType {
    /// Map a GTFS `route_type` code to a route type.
    pub fn from_gtfs_code(code: u16) -> Result<Self, UnknownRouteType> {
        let route_type = match code {
            0 => RouteType::Tram,
            1 => RouteType::Metro,
            2 => RouteType::Rail,
            3 => RouteType::Bus,
            4 => RouteType::Ferry,
            5 => RouteType::CableCar,
            6 => RouteType::Gondola,
            7 => RouteType::Funicular,
            11 => RouteType::Trolleybus,
            12 => RouteType::Monorail,
            100..=199 => RouteType::Rail,
            400..=499 => RouteType::Metro,
            700..=799 => RouteType::Bus,
            800..=899 => RouteType::Trolleybus,
            900..=999 => RouteType::Tram,
            1000..=1099 => RouteType::Ferry,
            1300..=1399 => RouteType::Gondola,
            1400..=1499 => RouteType::Funicular,
            other => return Err(UnknownRouteType(other)),
        };
        Ok(route_type)
    }

    /// The basic GTFS code for this route type.
    pub fn gtfs_code(&self) -> u16 {
        match self {
            RouteType::Tram => 0,
            RouteType::Metro => 1,
            RouteType::Rail => 2,
            RouteType::Bus => 3,
            RouteType::Ferry => 4,
            RouteType::CableCar => 5,
            RouteType::Gondola => 6,
            RouteType::Funicular => 7,
            RouteType::Trolleybus => 11,
            RouteType::Monorail => 12,
        }
    }

    /// Human-readable mode name for display.
    pub fn mode_name(&self) -> &'static str {
        match self {
            RouteType::Tram => "Tram",
            RouteType::Metro => "Metro",
            RouteType::Rail => "Train",
            RouteType::Bus => "Bus",
            RouteType::Ferry => "Ferry",
            RouteType::CableCar => "Cable car",
            RouteType::Gondola => "Gondola",
            RouteType::Funicular => "Funicular",
            RouteType::Trolleybus => "Trolleybus",
            RouteType::Monorail => "Monorail",
        }
    }
}

impl TryFrom<u16> for RouteType {
    type Error = UnknownRouteType;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        RouteType::from_gtfs_code(code)
    }
}

impl From<RouteType> for u16 {
    fn from(route_type: RouteType) -> Self {
        route_type.gtfs_code()
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mode_name())
    }
}
