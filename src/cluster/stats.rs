//! Per-cluster aggregate statistics
//!
//! [`recompute_stats`] is the one place statistics are derived from a member
//! list. The engine calls it for every cluster it builds, and a storage layer
//! can call it directly after editing a cluster's members.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::{PriorityThresholds, SeverityWeighting};
use crate::geo::{Coordinate, MAX_SEVERITY, MIN_SEVERITY, Point};

/// Urgency bucket derived from a cluster's aggregate severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn from_severity(severity: u8, thresholds: &PriorityThresholds) -> Self {
        if severity >= thresholds.critical {
            Priority::Critical
        } else if severity >= thresholds.high {
            Priority::High
        } else if severity >= thresholds.medium {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregates computed from a cluster's members
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterStats {
    /// Weighted mean of member coordinates
    pub centroid: Coordinate,
    /// Weighted, rounded and clamped member severity
    pub severity: u8,
    pub max_severity: u8,
    /// Plain mean severity rounded to one decimal
    pub mean_severity: f64,
    pub count: usize,
    /// Largest member distance to the centroid, in meters
    pub radius_m: f64,
    pub priority: Priority,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

/// Weighted mean of coordinates
///
/// Longitudes are averaged relative to the first coordinate, so members on
/// both sides of the antimeridian average to a point between them. Falls back
/// to the plain mean when every weight is zero. Returns `None` for an empty
/// slice.
pub fn weighted_centroid(coords: &[Coordinate], weights: &[f64]) -> Option<Coordinate> {
    let first = *coords.first()?;
    // keep coincident members exactly on their coordinate, radius 0
    if coords.iter().all(|c| *c == first) {
        return Some(first);
    }

    let uniform = weights.iter().sum::<f64>() <= 0.0;
    let mut lat = 0.0;
    let mut lng = 0.0;
    let mut total = 0.0;
    for (i, c) in coords.iter().enumerate() {
        let w = if uniform { 1.0 } else { weights.get(i).copied().unwrap_or(0.0) };
        lat += c.lat * w;
        lng += unwrap_lng(c.lng, first.lng) * w;
        total += w;
    }
    Some(Coordinate::new(lat / total, wrap_lng(lng / total)))
}

/// Shifts `lng` by a full turn so it lies within 180 degrees of `reference`
fn unwrap_lng(lng: f64, reference: f64) -> f64 {
    let d = lng - reference;
    if d > 180.0 {
        lng - 360.0
    } else if d < -180.0 {
        lng + 360.0
    } else {
        lng
    }
}

fn wrap_lng(lng: f64) -> f64 {
    if lng > 180.0 {
        lng - 360.0
    } else if lng < -180.0 {
        lng + 360.0
    } else {
        lng
    }
}

/// Weighted mean severity, rounded half away from zero and clamped to `[1, 10]`
pub fn aggregate_severity(severities: &[u8], weighting: SeverityWeighting) -> u8 {
    let mut num = 0.0;
    let mut den = 0.0;
    for &s in severities {
        let w = weighting.weight(s);
        num += s as f64 * w;
        den += w;
    }
    if den <= 0.0 {
        return MIN_SEVERITY;
    }
    let rounded = (num / den).round();
    rounded.clamp(MIN_SEVERITY as f64, MAX_SEVERITY as f64) as u8
}

/// Recomputes every aggregate of a cluster from its member list
///
/// Returns `None` for an empty member list.
pub fn recompute_stats(
    members: &[Point],
    weighting: SeverityWeighting,
    thresholds: &PriorityThresholds,
) -> Option<ClusterStats> {
    let first = members.first()?;

    let coords: Vec<Coordinate> = members.iter().map(Point::coordinate).collect();
    let weights: Vec<f64> = members.iter().map(|p| weighting.weight(p.severity)).collect();
    let severities: Vec<u8> = members.iter().map(|p| p.severity).collect();

    let centroid = weighted_centroid(&coords, &weights)?;
    let radius_m = coords
        .iter()
        .map(|c| centroid.distance_m(c))
        .fold(0.0, f64::max);

    let severity = aggregate_severity(&severities, weighting);
    let max_severity = severities.iter().copied().max().unwrap_or(severity);
    let mean = severities.iter().map(|&s| s as f64).sum::<f64>() / severities.len() as f64;

    let mut first_seen = first.timestamp;
    let mut last_seen = first.timestamp;
    for p in members {
        first_seen = first_seen.min(p.timestamp);
        last_seen = last_seen.max(p.timestamp);
    }

    Some(ClusterStats {
        centroid,
        severity,
        max_severity,
        mean_severity: (mean * 10.0).round() / 10.0,
        count: members.len(),
        radius_m,
        priority: Priority::from_severity(severity, thresholds),
        first_seen,
        last_seen,
    })
}
