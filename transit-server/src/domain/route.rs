//! Route and route-type types.

use std::fmt;

use super::RouteId;

/// GTFS route type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteType {
    Tram,
    Metro,
    Rail,
    Bus,
    Ferry,
    CableCar,
    Gondola,
    Funicular,
}

impl RouteType {
    /// Map a GTFS integer code (0-7) to a route type.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Tram),
            1 => Some(Self::Metro),
            2 => Some(Self::Rail),
            3 => Some(Self::Bus),
            4 => Some(Self::Ferry),
            5 => Some(Self::CableCar),
            6 => Some(Self::Gondola),
            7 => Some(Self::Funicular),
            _ => None,
        }
    }

    /// The GTFS integer code for this route type.
    pub fn code(&self) -> u8 {
        match self {
            Self::Tram => 0,
            Self::Metro => 1,
            Self::Rail => 2,
            Self::Bus => 3,
            Self::Ferry => 4,
            Self::CableCar => 5,
            Self::Gondola => 6,
            Self::Funicular => 7,
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tram => "tram",
            Self::Metro => "metro",
            Self::Rail => "rail",
            Self::Bus => "bus",
            Self::Ferry => "ferry",
            Self::CableCar => "cable car",
            Self::Gondola => "gondola",
            Self::Funicular => "funicular",
        };
        f.write_str(name)
    }
}

/// A transit route from `routes.txt`.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: RouteId,
    pub route_type: RouteType,
    /// Short name, e.g. "M4" (may be empty).
    pub short_name: String,
    /// Long name, e.g. "Airport - Harbour" (may be empty).
    pub long_name: String,
}

impl Route {
    /// Create a route.
    pub fn new(
        id: RouteId,
        route_type: RouteType,
        short_name: impl Into<String>,
        long_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            route_type,
            short_name: short_name.into(),
            long_name: long_name.into(),
        }
    }

    /// A display name: the short name if present, else the long name.
    pub fn display_name(&self) -> &str {
        if self.short_name.is_empty() {
            &self.long_name
        } else {
            &self.short_name
        }
    }
}
