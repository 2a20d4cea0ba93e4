//! Service calendars.
//!
//! A service runs on a weekly pattern between two dates, adjusted by
//! per-date exceptions. Exceptions always win over the weekly pattern, and
//! a service may be defined by exceptions alone.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::ServiceId;

/// Weekly operating pattern of a service between two dates (inclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCalendar {
    pub service_id: ServiceId,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ServiceCalendar {
    /// A calendar running every day of the week in the given range.
    pub fn daily(service_id: ServiceId, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            service_id,
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: true,
            sunday: true,
            start_date,
            end_date,
        }
    }

    /// Whether the weekly pattern runs on a date (ignoring exceptions).
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        if date < self.start_date || date > self.end_date {
            return false;
        }
        match date.weekday() {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

/// Whether an exception adds or removes service on its date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExceptionType {
    Added,
    Removed,
}

/// A single-date override of a service's weekly pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarException {
    pub service_id: ServiceId,
    pub date: NaiveDate,
    pub exception_type: ExceptionType,
}

/// All service calendars of a snapshot, with their exceptions.
#[derive(Debug, Clone, Default)]
pub struct ServiceCalendars {
    weekly: HashMap<ServiceId, ServiceCalendar>,
    exceptions: HashMap<(ServiceId, NaiveDate), ExceptionType>,
}

impl ServiceCalendars {
    pub(crate) fn new(
        weekly: HashMap<ServiceId, ServiceCalendar>,
        exceptions: HashMap<(ServiceId, NaiveDate), ExceptionType>,
    ) -> Self {
        Self { weekly, exceptions }
    }

    /// Whether a service operates on a date.
    ///
    /// A matching exception decides; otherwise the weekly pattern does.
    /// Unknown services never operate.
    pub fn is_active(&self, service_id: &ServiceId, date: NaiveDate) -> bool {
        // Clone of an Arc-backed id; cheap
        match self.exceptions.get(&(service_id.clone(), date)) {
            Some(ExceptionType::Added) => true,
            Some(ExceptionType::Removed) => false,
            None => self
                .weekly
                .get(service_id)
                .is_some_and(|calendar| calendar.runs_on(date)),
        }
    }

    /// Whether the service appears in any calendar or exception.
    pub fn knows(&self, service_id: &ServiceId) -> bool {
        self.weekly.contains_key(service_id)
            || self.exceptions.keys().any(|(id, _)| id == service_id)
    }
}
