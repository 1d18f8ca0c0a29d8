use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::geo::{MAX_SEVERITY, MIN_SEVERITY};

/// Default neighbourhood radius for the density pass, in meters
pub const DEFAULT_EPS_M: f64 = 200.0;

/// Default density threshold, the point itself included
pub const DEFAULT_MIN_POINTS: usize = 3;

/// Default iteration cap for the centroid method
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Default seed for centroid initialisation
pub const DEFAULT_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Clustering strategy, selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterMethod {
    /// DBSCAN with noise promoted to singletons, centroid fallback when degenerate
    #[default]
    Density,
    /// Seeded k-means over haversine distance
    Centroid,
}

/// How much each member counts toward its cluster's centroid and severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityWeighting {
    /// `weight = severity`: severe reports pull the aggregate toward them
    #[default]
    BySeverity,
    /// Every member weighs the same
    Uniform,
}

impl SeverityWeighting {
    #[inline]
    pub fn weight(&self, severity: u8) -> f64 {
        match self {
            SeverityWeighting::BySeverity => severity as f64,
            SeverityWeighting::Uniform => 1.0,
        }
    }
}

/// Lower bounds (inclusive) of the medium, high and critical priority buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityThresholds {
    pub medium: u8,
    pub high: u8,
    pub critical: u8,
}

impl Default for PriorityThresholds {
    fn default() -> Self {
        Self {
            medium: 5,
            high: 7,
            critical: 9,
        }
    }
}

impl PriorityThresholds {
    fn validate(&self) -> ConfigResult<()> {
        let ordered = MIN_SEVERITY <= self.medium
            && self.medium <= self.high
            && self.high <= self.critical
            && self.critical <= MAX_SEVERITY;
        if !ordered {
            return Err(ConfigError::PriorityThresholds {
                medium: self.medium,
                high: self.high,
                critical: self.critical,
            });
        }
        Ok(())
    }
}

/// Configuration of one clustering invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    pub method: ClusterMethod,
    /// Neighbourhood radius for the density pass, in meters
    pub eps_m: f64,
    /// Density threshold; inputs smaller than this become singletons
    pub min_points: usize,
    /// Overrides the derived `k` of the centroid method
    pub k_hint: Option<usize>,
    pub max_iterations: usize,
    pub seed: u64,
    pub weighting: SeverityWeighting,
    pub priority: PriorityThresholds,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            method: ClusterMethod::default(),
            eps_m: DEFAULT_EPS_M,
            min_points: DEFAULT_MIN_POINTS,
            k_hint: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: DEFAULT_SEED,
            weighting: SeverityWeighting::default(),
            priority: PriorityThresholds::default(),
        }
    }
}

impl ClusterConfig {
    /// Fails fast on values that indicate a caller mistake
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.eps_m.is_finite() || self.eps_m < 0.0 {
            return Err(ConfigError::Eps(self.eps_m));
        }
        if self.min_points < 1 {
            return Err(ConfigError::MinPoints);
        }
        if self.k_hint == Some(0) {
            return Err(ConfigError::KHint);
        }
        if self.max_iterations < 1 {
            return Err(ConfigError::MaxIterations);
        }
        self.priority.validate()
    }
}
