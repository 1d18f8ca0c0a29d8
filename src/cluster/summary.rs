use super::engine::Cluster;
use super::stats::Priority;

/// Aggregate severity at which a cluster is worth notifying about
pub const DEFAULT_ALERT_THRESHOLD: u8 = 5;

/// Overview of a clustering result for dashboards
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClusterSummary {
    pub total_clusters: usize,
    pub total_points: usize,
    /// Mean members per cluster, one decimal
    pub avg_cluster_size: f64,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
    /// First cluster with the most members
    pub largest_cluster: Option<String>,
    /// First cluster with the highest single report severity
    pub most_severe_cluster: Option<String>,
}

impl ClusterSummary {
    /// Number of clusters in a priority bucket
    pub fn count(&self, priority: Priority) -> usize {
        match priority {
            Priority::Low => self.low,
            Priority::Medium => self.medium,
            Priority::High => self.high,
            Priority::Critical => self.critical,
        }
    }
}

/// Builds the dashboard overview of `clusters`
pub fn summarize(clusters: &[Cluster]) -> ClusterSummary {
    let mut summary = ClusterSummary {
        total_clusters: clusters.len(),
        ..Default::default()
    };
    if clusters.is_empty() {
        return summary;
    }

    let mut largest: Option<&Cluster> = None;
    let mut most_severe: Option<&Cluster> = None;
    for c in clusters {
        summary.total_points += c.count;
        match c.priority {
            Priority::Low => summary.low += 1,
            Priority::Medium => summary.medium += 1,
            Priority::High => summary.high += 1,
            Priority::Critical => summary.critical += 1,
        }
        if largest.is_none_or(|l| c.count > l.count) {
            largest = Some(c);
        }
        if most_severe.is_none_or(|m| c.max_severity > m.max_severity) {
            most_severe = Some(c);
        }
    }

    let avg = summary.total_points as f64 / clusters.len() as f64;
    summary.avg_cluster_size = (avg * 10.0).round() / 10.0;
    summary.largest_cluster = largest.map(|c| c.id.clone());
    summary.most_severe_cluster = most_severe.map(|c| c.id.clone());
    summary
}

/// Clusters whose aggregate severity reaches `threshold`, in input order
pub fn alert_candidates(clusters: &[Cluster], threshold: u8) -> Vec<&Cluster> {
    clusters.iter().filter(|c| c.severity >= threshold).collect()
}
