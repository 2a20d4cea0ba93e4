//! Identifier types for schedule entities.

use std::fmt;
use std::sync::Arc;

/// Error returned when parsing an invalid identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} id: {reason}")]
pub struct InvalidId {
    kind: &'static str,
    reason: &'static str,
}

fn validate(kind: &'static str, s: &str) -> Result<(), InvalidId> {
    if s.is_empty() {
        return Err(InvalidId {
            kind,
            reason: "must not be empty",
        });
    }

    if s.trim() != s {
        return Err(InvalidId {
            kind,
            reason: "must not have surrounding whitespace",
        });
    }

    if s.chars().any(char::is_control) {
        return Err(InvalidId {
            kind,
            reason: "must not contain control characters",
        });
    }

    Ok(())
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Arc<str>);

        impl $name {
            /// Parse an identifier, rejecting empty or padded strings.
            pub fn parse(s: &str) -> Result<Self, InvalidId> {
                validate($kind, s)?;
                Ok(Self(Arc::from(s)))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidId;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                validate($kind, &s)?;
                Ok(Self(Arc::from(s)))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0.to_string()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_id!(
    /// Identifier of a stop, platform or parent station.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_planner::domain::StopId;
    ///
    /// let stop = StopId::parse("PAR-RER-A").unwrap();
    /// assert_eq!(stop.as_str(), "PAR-RER-A");
    ///
    /// assert!(StopId::parse("").is_err());
    /// assert!(StopId::parse(" A1").is_err());
    /// ```
    StopId,
    "stop"
);

string_id!(
    /// Identifier of a scheduled trip.
    TripId,
    "trip"
);

string_id!(
    /// Identifier of a route (a line as marketed to riders).
    RouteId,
    "route"
);

string_id!(
    /// Identifier of a service calendar entry.
    ServiceId,
    "service"
);
