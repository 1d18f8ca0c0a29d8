//! Error types for the cluster engine and the route optimizer.
//!
//! Only caller mistakes are errors. Malformed points are reported as skipped
//! entries alongside the clustering result instead.

use thiserror::Error;

/// Invalid clustering configuration, raised before any work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("eps_m must be a finite, non-negative distance in meters (got {0})")]
    Eps(f64),

    #[error("min_points must be at least 1")]
    MinPoints,

    #[error("k_hint must be at least 1")]
    KHint,

    #[error("max_iterations must be at least 1")]
    MaxIterations,

    #[error("priority thresholds must satisfy 1 <= medium <= high <= critical <= 10 (got {medium}/{high}/{critical})")]
    PriorityThresholds { medium: u8, high: u8, critical: u8 },
}

/// Route request the optimizer cannot honour.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("cluster {0} not found in the supplied cluster set")]
    UnknownCluster(String),

    #[error("node {0} appears more than once")]
    DuplicateNode(String),

    #[error("invalid coordinate for {id}: ({lat}, {lng})")]
    InvalidCoordinate { id: String, lat: f64, lng: f64 },

    #[error("vehicle speed must be a positive number of km/h (got {0})")]
    Speed(f64),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type RouteResult<T> = Result<T, RouteError>;
