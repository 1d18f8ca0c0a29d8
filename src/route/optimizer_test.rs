#[cfg(test)]
mod tests {
    use crate::cluster::{ClusterConfig, cluster};
    use crate::error::RouteError;
    use crate::geo::{Coordinate, Point, haversine, path_length};
    use crate::route::{
        RouteConfig, RouteNode, optimize_route, optimize_route_with, route_for_clusters,
        select_stops,
    };
    use chrono::{TimeZone, Utc};
    use quickcheck::{QuickCheck, TestResult};
    use std::collections::HashSet;

    fn ids(route: &crate::route::Route) -> Vec<&str> {
        route.nodes.iter().map(|s| s.id.as_str()).collect()
    }

    /// Corners of a ~2 km square centred on (37.77, -122.42)
    fn square() -> (Vec<RouteNode>, Coordinate) {
        let center = Coordinate::new(37.77, -122.42);
        let d_lat = 0.009;
        let d_lng = 0.0114;
        let nodes = vec![
            RouteNode::new("ne", center.lat + d_lat, center.lng + d_lng),
            RouteNode::new("sw", center.lat - d_lat, center.lng - d_lng),
            RouteNode::new("nw", center.lat + d_lat, center.lng - d_lng),
            RouteNode::new("se", center.lat - d_lat, center.lng + d_lng),
        ];
        (nodes, center)
    }

    fn permutations(items: Vec<usize>) -> Vec<Vec<usize>> {
        if items.len() <= 1 {
            return vec![items];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.clone();
            let head = rest.remove(i);
            for mut tail in permutations(rest) {
                tail.insert(0, head);
                out.push(tail);
            }
        }
        out
    }

    #[test]
    fn test_empty_route() {
        let route = optimize_route(&[], None).unwrap();
        assert!(route.nodes.is_empty());
        assert_eq!(route.total_distance_m, 0.0);

        let route = optimize_route(&[], Some(Coordinate::new(37.77, -122.42))).unwrap();
        assert!(route.nodes.is_empty());
        assert_eq!(route.total_distance_m, 0.0);
    }

    #[test]
    fn test_single_node() {
        let nodes = vec![RouteNode::new("a", 37.7749, -122.4194)];
        let route = optimize_route(&nodes, None).unwrap();
        assert_eq!(ids(&route), vec!["a"]);
        assert_eq!(route.nodes[0].order, 0);
        assert_eq!(route.total_distance_m, 0.0);

        let start = Coordinate::new(37.7849, -122.4094);
        let route = optimize_route(&nodes, Some(start)).unwrap();
        let expected = haversine(&start, &nodes[0].coordinate());
        assert!((route.total_distance_m - expected).abs() < 1e-9);
        assert_eq!(route.start, Some(start));
    }

    #[test]
    fn test_square_from_center_is_near_optimal() {
        let (nodes, center) = square();
        let route = optimize_route(&nodes, Some(center)).unwrap();

        let visited: HashSet<&str> = ids(&route).into_iter().collect();
        assert_eq!(visited.len(), 4);
        assert_eq!(route.nodes.len(), 4);

        let best = permutations((0..4).collect())
            .into_iter()
            .map(|p| {
                let mut path = vec![center];
                path.extend(p.iter().map(|&i| nodes[i].coordinate()));
                path_length(&path)
            })
            .fold(f64::INFINITY, f64::min);
        assert!(route.total_distance_m <= best * 1.05, "{} vs {}", route.total_distance_m, best);
    }

    #[test]
    fn test_without_start_begins_at_first_node() {
        let (nodes, _) = square();
        let route = optimize_route(&nodes, None).unwrap();
        assert_eq!(route.nodes[0].id, "ne");
        let orders: Vec<usize> = route.nodes.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);

        let path: Vec<Coordinate> = route.nodes.iter().map(|s| s.coordinate()).collect();
        assert!((path_length(&path) - route.total_distance_m).abs() < 1e-6);
    }

    #[test]
    fn test_total_includes_start_leg() {
        let (nodes, center) = square();
        let route = optimize_route(&nodes, Some(center)).unwrap();

        let mut path = vec![center];
        path.extend(route.nodes.iter().map(|s| s.coordinate()));
        assert!((path_length(&path) - route.total_distance_m).abs() < 1e-6);
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let nodes = vec![
            RouteNode::new("a", 37.7749, -122.4194),
            RouteNode::new("a", 37.7849, -122.4094),
        ];
        assert_eq!(
            optimize_route(&nodes, None),
            Err(RouteError::DuplicateNode("a".to_string()))
        );
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        let nodes = vec![RouteNode::new("a", 95.0, -122.4194)];
        assert!(matches!(
            optimize_route(&nodes, None),
            Err(RouteError::InvalidCoordinate { ref id, .. }) if id == "a"
        ));

        let nodes = vec![RouteNode::new("a", 37.7749, -122.4194)];
        let start = Some(Coordinate::new(f64::NAN, 0.0));
        assert!(matches!(
            optimize_route(&nodes, start),
            Err(RouteError::InvalidCoordinate { ref id, .. }) if id == "start"
        ));
    }

    fn sample_clusters() -> Vec<crate::cluster::Cluster> {
        let ts = Utc.with_ymd_and_hms(2025, 8, 30, 10, 0, 0).unwrap();
        let points = vec![
            Point::new("h1", 37.7749, -122.4194, 8, ts),
            Point::new("h2", 37.7599, -122.4148, 9, ts),
            Point::new("h3", 37.7609, -122.4350, 3, ts),
            Point::new("h4", 37.8006, -122.4103, 6, ts),
        ];
        // min_points above the input size: every report stands alone
        let config = ClusterConfig {
            min_points: 5,
            ..Default::default()
        };
        cluster(&points, &config).unwrap().clusters
    }

    #[test]
    fn test_route_for_clusters() {
        let clusters = sample_clusters();
        let requested = vec!["cluster-0", "cluster-2", "cluster-3", "cluster-0"];
        let route = route_for_clusters(&clusters, &requested, None, &RouteConfig::default()).unwrap();

        let mut visited = ids(&route);
        visited.sort();
        assert_eq!(visited, vec!["cluster-0", "cluster-2", "cluster-3"]);
        assert_eq!(route.nodes[0].id, "cluster-0");
        assert_eq!(route.nodes[0].coordinate(), clusters[0].centroid);
    }

    #[test]
    fn test_route_for_unknown_cluster() {
        let clusters = sample_clusters();
        let requested = vec!["cluster-1", "cluster-42"];
        assert_eq!(
            route_for_clusters(&clusters, &requested, None, &RouteConfig::default()),
            Err(RouteError::UnknownCluster("cluster-42".to_string()))
        );
    }

    #[test]
    fn test_select_stops() {
        let clusters = sample_clusters();
        let stops = select_stops(&clusters, 2);
        let severities: Vec<u8> = stops.iter().map(|c| c.max_severity).collect();
        assert_eq!(severities, vec![9, 8]);
        assert_eq!(select_stops(&clusters, 10).len(), 4);
        assert!(select_stops(&clusters, 0).is_empty());
    }

    fn random_nodes(raw: &[(u16, u16)]) -> Vec<RouteNode> {
        raw.iter()
            .enumerate()
            .map(|(i, &(a, b))| {
                RouteNode::new(
                    format!("n{i}"),
                    37.70 + (a % 1000) as f64 * 1e-4,
                    -122.50 + (b % 1000) as f64 * 1e-4,
                )
            })
            .collect()
    }

    #[test]
    fn test_route_visits_every_node_once() {
        fn prop(raw: Vec<(u16, u16)>, start: Option<(u16, u16)>) -> TestResult {
            let nodes = random_nodes(&raw);
            let start = start.map(|(a, b)| {
                Coordinate::new(37.70 + (a % 1000) as f64 * 1e-4, -122.50 + (b % 1000) as f64 * 1e-4)
            });
            let route = match optimize_route(&nodes, start) {
                Ok(r) => r,
                Err(_) => return TestResult::failed(),
            };

            let visited: HashSet<&str> = route.nodes.iter().map(|s| s.id.as_str()).collect();
            let ordered = route.nodes.iter().enumerate().all(|(i, s)| s.order == i);
            TestResult::from_bool(
                route.nodes.len() == nodes.len()
                    && visited.len() == nodes.len()
                    && ordered
                    && route.total_distance_m >= 0.0,
            )
        }
        QuickCheck::new()
            .tests(200)
            .quickcheck(prop as fn(Vec<(u16, u16)>, Option<(u16, u16)>) -> TestResult);
    }

    #[test]
    fn test_two_opt_never_worse_than_nearest_neighbor() {
        fn prop(raw: Vec<(u16, u16)>, start: Option<(u16, u16)>) -> bool {
            let nodes = random_nodes(&raw);
            let start = start.map(|(a, b)| {
                Coordinate::new(37.70 + (a % 1000) as f64 * 1e-4, -122.50 + (b % 1000) as f64 * 1e-4)
            });
            let greedy = RouteConfig { two_opt: false };
            let (Ok(baseline), Ok(optimized)) = (
                optimize_route_with(&nodes, start, &greedy),
                optimize_route(&nodes, start),
            ) else {
                return false;
            };
            optimized.total_distance_m <= baseline.total_distance_m
        }
        QuickCheck::new()
            .tests(200)
            .quickcheck(prop as fn(Vec<(u16, u16)>, Option<(u16, u16)>) -> bool);
    }
}
