//! Cluster engine: groups severity reports into hotspots
//!
//! The density method runs DBSCAN over a K-D tree and promotes noise to
//! singleton clusters. When it forms no multi-member cluster it falls back to
//! seeded k-means. Both paths share the statistics in [`stats`].
pub mod config;
pub mod dbscan;
pub mod engine;
pub mod kdtree;
pub mod kmeans;
pub mod stats;
pub mod summary;

#[cfg(test)]
mod kmeans_test;
#[cfg(test)]
mod summary_test;

pub use config::{
    ClusterConfig, ClusterMethod, DEFAULT_EPS_M, DEFAULT_MAX_ITERATIONS, DEFAULT_MIN_POINTS,
    DEFAULT_SEED, PriorityThresholds, SeverityWeighting,
};
pub use dbscan::{Group, db_scan};
pub use engine::{Cluster, Clustering, SkippedPoint, cluster};
pub use kdtree::{KDTree, new_kd_tree};
pub use kmeans::{choose_k, k_means};
pub use stats::{ClusterStats, Priority, aggregate_severity, recompute_stats, weighted_centroid};
pub use summary::{ClusterSummary, DEFAULT_ALERT_THRESHOLD, alert_candidates, summarize};
