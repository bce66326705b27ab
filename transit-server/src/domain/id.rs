//! Identifier newtypes for GTFS entities.
//!
//! GTFS identifiers are opaque feed-defined strings. Wrapping them keeps the
//! different ID spaces from being mixed up at compile time; ordering is
//! lexicographic, which the planner relies on for deterministic tie-breaks.

use std::fmt;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw feed identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the identifier is the empty string.
            ///
            /// Empty primary keys are rejected at feed load; this exists so
            /// the loader can check before constructing entities.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

id_type! {
    /// A stop identifier from `stops.txt`.
    StopId
}

id_type! {
    /// A route identifier from `routes.txt`.
    RouteId
}

id_type! {
    /// A trip identifier from `trips.txt`.
    TripId
}

id_type! {
    /// A service identifier from `calendar.txt`.
    ServiceId
}
