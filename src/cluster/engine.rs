use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use super::config::{ClusterConfig, ClusterMethod};
use super::dbscan::{Group, db_scan};
use super::kmeans::{choose_k, k_means};
use super::stats::{ClusterStats, Priority, recompute_stats};
use crate::error::ConfigResult;
use crate::geo::{Coordinate, Point, Rejection};

/// Cluster is a group of reports with its aggregate statistics
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Identifier, stable within one clustering result
    pub id: String,
    pub centroid: Coordinate,
    /// Aggregate severity in `[1, 10]`
    pub severity: u8,
    pub max_severity: u8,
    pub mean_severity: f64,
    pub count: usize,
    pub members: Vec<Point>,
    pub radius_m: f64,
    pub priority: Priority,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Cluster {
    fn from_stats(members: Vec<Point>, stats: ClusterStats) -> Self {
        Cluster {
            id: String::new(),
            centroid: stats.centroid,
            severity: stats.severity,
            max_severity: stats.max_severity,
            mean_severity: stats.mean_severity,
            count: stats.count,
            members,
            radius_m: stats.radius_m,
            priority: stats.priority,
            first_seen: stats.first_seen,
            last_seen: stats.last_seen,
        }
    }

    pub fn is_singleton(&self) -> bool {
        self.count == 1
    }
}

/// A point left out of clustering and why
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPoint {
    pub id: String,
    pub reason: Rejection,
}

/// Result of one clustering invocation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Clustering {
    /// Clusters by descending count, then descending severity, then ascending latitude
    pub clusters: Vec<Cluster>,
    /// Inputs that failed validation, in input order
    pub skipped: Vec<SkippedPoint>,
}

/// Groups points into hotspot clusters
///
/// Every valid point ends up in exactly one cluster. Invalid points are listed
/// in [`Clustering::skipped`]; only an invalid `config` is an error.
///
/// # Examples
///
/// ```
/// use hotspot_planner::cluster::{ClusterConfig, cluster};
///
/// let result = cluster(&[], &ClusterConfig::default()).unwrap();
/// assert!(result.clusters.is_empty());
/// ```
pub fn cluster(points: &[Point], config: &ClusterConfig) -> ConfigResult<Clustering> {
    config.validate()?;

    let mut valid = Vec::with_capacity(points.len());
    let mut skipped = Vec::new();
    for p in points {
        match p.validate() {
            Ok(()) => valid.push(p),
            Err(reason) => {
                tracing::warn!(id = %p.id, %reason, "skipping point");
                skipped.push(SkippedPoint {
                    id: p.id.clone(),
                    reason,
                });
            }
        }
    }

    let groups = partition(&valid, config);
    tracing::debug!(
        points = valid.len(),
        skipped = skipped.len(),
        clusters = groups.len(),
        "clustering pass finished"
    );

    let mut clusters: Vec<Cluster> = groups
        .into_iter()
        .filter_map(|g| {
            let members: Vec<Point> = g.members.iter().map(|&i| valid[i].clone()).collect();
            let stats = recompute_stats(&members, config.weighting, &config.priority)?;
            Some(Cluster::from_stats(members, stats))
        })
        .collect();

    clusters.sort_by(compare_clusters);
    for (i, c) in clusters.iter_mut().enumerate() {
        c.id = format!("cluster-{i}");
    }

    Ok(Clustering { clusters, skipped })
}

/// Index-level grouping of already validated points
fn partition(points: &[&Point], config: &ClusterConfig) -> Vec<Group> {
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }
    if n < config.min_points {
        return singletons(0..n).collect();
    }

    let coords: Vec<Coordinate> = points.iter().map(|p| p.coordinate()).collect();
    match config.method {
        ClusterMethod::Centroid => centroid_groups(points, &coords, config),
        ClusterMethod::Density => {
            let (mut groups, noise) = db_scan(&coords, config.eps_m, config.min_points);
            if !groups.iter().any(|g| g.members.len() > 1) {
                tracing::debug!(n, "density pass degenerate, falling back to centroid method");
                return centroid_groups(points, &coords, config);
            }
            // noise surfaces as singleton hotspots instead of being dropped
            let offset = groups.len();
            groups.extend(singletons(noise).map(|mut g| {
                g.label += offset;
                g
            }));
            groups
        }
    }
}

fn centroid_groups(points: &[&Point], coords: &[Coordinate], config: &ClusterConfig) -> Vec<Group> {
    let k = config.k_hint.unwrap_or_else(|| choose_k(points.len()));
    let weights: Vec<f64> = points.iter().map(|p| config.weighting.weight(p.severity)).collect();
    k_means(coords, &weights, k, config.max_iterations, config.seed)
}

fn singletons(indices: impl IntoIterator<Item = usize>) -> impl Iterator<Item = Group> {
    indices.into_iter().enumerate().map(|(label, i)| Group {
        label,
        members: vec![i],
    })
}

/// Count desc, severity desc, latitude asc, longitude asc, first member id asc
fn compare_clusters(a: &Cluster, b: &Cluster) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| b.severity.cmp(&a.severity))
        .then_with(|| a.centroid.lat.total_cmp(&b.centroid.lat))
        .then_with(|| a.centroid.lng.total_cmp(&b.centroid.lng))
        .then_with(|| {
            let a_id = a.members.first().map(|p| p.id.as_str());
            let b_id = b.members.first().map(|p| p.id.as_str());
            a_id.cmp(&b_id)
        })
}
