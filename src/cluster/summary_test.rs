#[cfg(test)]
mod tests {
    use crate::cluster::{
        ClusterConfig, DEFAULT_ALERT_THRESHOLD, Priority, alert_candidates, cluster, summarize,
    };
    use crate::geo::Point;
    use chrono::{TimeZone, Utc};

    fn report(id: &str, lat: f64, lng: f64, severity: u8) -> Point {
        let ts = Utc.with_ymd_and_hms(2025, 8, 30, 12, 0, 0).unwrap();
        Point::new(id, lat, lng, severity, ts)
    }

    fn points() -> Vec<Point> {
        vec![
            report("a1", 37.7749, -122.4194, 10),
            report("a2", 37.7750, -122.4195, 9),
            report("a3", 37.7751, -122.4193, 9),
            report("b1", 37.7609, -122.4350, 2),
            report("c1", 37.8006, -122.4103, 6),
        ]
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_clusters, 0);
        assert_eq!(summary.total_points, 0);
        assert_eq!(summary.avg_cluster_size, 0.0);
        assert!(summary.largest_cluster.is_none());
        assert!(summary.most_severe_cluster.is_none());
    }

    #[test]
    fn test_summarize() {
        let clusters = cluster(&points(), &ClusterConfig::default()).unwrap().clusters;
        let summary = summarize(&clusters);

        assert_eq!(summary.total_clusters, 3);
        assert_eq!(summary.total_points, 5);
        assert_eq!(summary.avg_cluster_size, 1.7);
        assert_eq!(summary.count(Priority::Critical), 1);
        assert_eq!(summary.count(Priority::Medium), 1);
        assert_eq!(summary.count(Priority::Low), 1);
        assert_eq!(summary.count(Priority::High), 0);
        assert_eq!(summary.largest_cluster.as_deref(), Some("cluster-0"));
        assert_eq!(summary.most_severe_cluster.as_deref(), Some("cluster-0"));
    }

    #[test]
    fn test_alert_candidates() {
        let clusters = cluster(&points(), &ClusterConfig::default()).unwrap().clusters;

        let alerts = alert_candidates(&clusters, DEFAULT_ALERT_THRESHOLD);
        let ids: Vec<&str> = alerts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["cluster-0", "cluster-1"]);

        assert!(alert_candidates(&clusters, 11).is_empty());
        assert_eq!(alert_candidates(&clusters, 1).len(), 3);
    }
}
