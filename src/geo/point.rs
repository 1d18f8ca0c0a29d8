use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest severity a report may carry
pub const MIN_SEVERITY: u8 = 1;

/// Highest severity a report may carry
pub const MAX_SEVERITY: u8 = 10;

/// Coordinate is a WGS-84 position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Checks that both components are finite and inside the WGS-84 ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Great-circle distance to `other` in meters
    #[inline]
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        super::distance::haversine(self, other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Point is a single geotagged severity report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub severity: u8,
    pub timestamp: DateTime<Utc>,
}

/// Why a point was excluded from a clustering run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Latitude or longitude is not finite or lies outside its range
    Coordinate,
    /// Severity lies outside `[MIN_SEVERITY, MAX_SEVERITY]`
    Severity,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Coordinate => f.write_str("coordinate out of range"),
            Rejection::Severity => f.write_str("severity out of range"),
        }
    }
}

impl Point {
    pub fn new(
        id: impl Into<String>,
        lat: f64,
        lng: f64,
        severity: u8,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            lat,
            lng,
            severity,
            timestamp,
        }
    }

    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    /// Checks the point against the ranges the core accepts
    ///
    /// Out-of-range values are reported, never clamped.
    pub fn validate(&self) -> Result<(), Rejection> {
        if !self.coordinate().is_valid() {
            return Err(Rejection::Coordinate);
        }
        if !(MIN_SEVERITY..=MAX_SEVERITY).contains(&self.severity) {
            return Err(Rejection::Severity);
        }
        Ok(())
    }
}
