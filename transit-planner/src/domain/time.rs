//! Service-day time handling.
//!
//! Schedules express times as offsets from midnight of the service day, in
//! "HH:MM:SS" notation. Trips that run past midnight keep counting, so
//! "25:10:00" is ten past one on the following calendar day. This module
//! keeps times in that form for the search and resolves them onto real
//! dates only at the presentation boundary.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;
use std::ops::Add;

/// Seconds in one calendar day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of the service day, in seconds since service-day midnight.
///
/// Values may exceed 24 hours for trips running past midnight.
///
/// # Examples
///
/// ```
/// use transit_planner::domain::ServiceTime;
///
/// let t = ServiceTime::parse("25:00:00").unwrap();
/// assert_eq!(t.seconds(), 90_000);
/// assert_eq!(t.to_string(), "25:00:00");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ServiceTime(u32);

impl ServiceTime {
    /// Service-day midnight.
    pub const MIDNIGHT: ServiceTime = ServiceTime(0);

    /// Create a time from seconds since service-day midnight.
    pub const fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Create a time from hours, minutes and seconds.
    ///
    /// Hours may be 24 or more.
    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Option<Self> {
        if minutes > 59 || seconds > 59 {
            return None;
        }
        hours
            .checked_mul(3600)
            .and_then(|h| h.checked_add(minutes * 60 + seconds))
            .map(Self)
    }

    /// Parse a time from "HH:MM:SS" (or "H:MM:SS") notation.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_planner::domain::ServiceTime;
    ///
    /// assert!(ServiceTime::parse("08:00:00").is_ok());
    /// assert!(ServiceTime::parse("7:45:30").is_ok());
    /// assert!(ServiceTime::parse("26:15:00").is_ok());
    ///
    /// assert!(ServiceTime::parse("08:00").is_err());
    /// assert!(ServiceTime::parse("08:60:00").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.split(':');
        let (Some(h), Some(m), Some(sec), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TimeError::new("expected HH:MM:SS format"));
        };

        if h.is_empty() || h.len() > 3 {
            return Err(TimeError::new("hour must have one to three digits"));
        }
        let hours = parse_digits(h).ok_or_else(|| TimeError::new("invalid hour digits"))?;

        let minutes = parse_two_digits(m).ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minutes > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        let seconds = parse_two_digits(sec).ok_or_else(|| TimeError::new("invalid second digits"))?;
        if seconds > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }

        Self::from_hms(hours, minutes, seconds).ok_or_else(|| TimeError::new("time overflow"))
    }

    /// Returns the number of seconds since service-day midnight.
    pub fn seconds(&self) -> u32 {
        self.0
    }

    /// Returns the hour component, which may be 24 or more.
    pub fn hours(&self) -> u32 {
        self.0 / 3600
    }

    /// Returns the minute component (0-59).
    pub fn minutes(&self) -> u32 {
        (self.0 / 60) % 60
    }

    /// Returns the second component (0-59).
    pub fn secs(&self) -> u32 {
        self.0 % 60
    }

    /// Number of whole days past the service day this time falls on.
    pub fn day_offset(&self) -> u32 {
        self.0 / SECONDS_PER_DAY
    }

    /// Add seconds, saturating at the maximum representable time.
    pub fn plus_seconds(self, seconds: u32) -> Self {
        Self(self.0.saturating_add(seconds))
    }

    /// Move the time `seconds` earlier, or `None` if that would go
    /// before midnight of the service day.
    pub fn minus_seconds(self, seconds: u32) -> Option<Self> {
        self.0.checked_sub(seconds).map(Self)
    }

    /// Subtract a time, returning `None` if `other` is later.
    pub fn checked_sub(self, other: ServiceTime) -> Option<u32> {
        self.0.checked_sub(other.0)
    }

    /// Returns the duration between two times.
    ///
    /// Returns a negative duration if `other` is after `self`.
    pub fn signed_duration_since(&self, other: Self) -> Duration {
        Duration::seconds(i64::from(self.0) - i64::from(other.0))
    }

    /// Resolve this service time onto the calendar.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_planner::domain::ServiceTime;
    /// use chrono::NaiveDate;
    ///
    /// let service_day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    /// let t = ServiceTime::from_seconds(90_000);
    /// let resolved = t.on_date(service_day);
    ///
    /// assert_eq!(resolved.date(), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
    /// assert_eq!(resolved.time().to_string(), "01:00:00");
    /// ```
    pub fn on_date(&self, service_day: NaiveDate) -> NaiveDateTime {
        service_day.and_time(NaiveTime::MIN) + Duration::seconds(i64::from(self.0))
    }

    /// Build a service time from a wall-clock time of the service day.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self(time.num_seconds_from_midnight())
    }
}

impl Add<u32> for ServiceTime {
    type Output = Self;

    fn add(self, rhs: u32) -> Self::Output {
        self.plus_seconds(rhs)
    }
}

impl fmt::Debug for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceTime({self})")
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.secs()
        )
    }
}

impl serde::Serialize for ServiceTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ServiceTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ServiceTime::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse ASCII digits into a u32.
fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse exactly two ASCII digits into a u32.
fn parse_two_digits(s: &str) -> Option<u32> {
    if s.len() != 2 {
        return None;
    }
    parse_digits(s)
}
