#[cfg(test)]
mod tests {
    use crate::cluster::{DEFAULT_SEED, choose_k, k_means};
    use crate::geo::Coordinate;

    fn two_blobs() -> Vec<Coordinate> {
        let mut coords = Vec::new();
        for i in 0..5 {
            let d = i as f64 * 1e-4;
            coords.push(Coordinate::new(37.7749 + d, -122.4194 + d));
            coords.push(Coordinate::new(37.8049 + d, -122.3894 - d));
        }
        coords
    }

    #[test]
    fn test_choose_k() {
        assert_eq!(choose_k(0), 0);
        assert_eq!(choose_k(1), 1);
        assert_eq!(choose_k(2), 2);
        assert_eq!(choose_k(8), 2);
        assert_eq!(choose_k(18), 3);
        assert_eq!(choose_k(32), 4);
        assert_eq!(choose_k(50), 5);
        assert_eq!(choose_k(10_000), 5);
    }

    #[test]
    fn test_k_means_separates_blobs() {
        let coords = two_blobs();
        let weights = vec![1.0; coords.len()];

        for seed in [DEFAULT_SEED, 1, 42, 7_777] {
            let groups = k_means(&coords, &weights, 2, 100, seed);
            assert_eq!(groups.len(), 2, "seed {seed}");
            for g in &groups {
                assert_eq!(g.members.len(), 5);
                let parity = g.members[0] % 2;
                assert!(g.members.iter().all(|&i| i % 2 == parity));
            }
        }
    }

    #[test]
    fn test_k_means_is_deterministic() {
        let coords = two_blobs();
        let weights: Vec<f64> = (0..coords.len()).map(|i| (i % 10 + 1) as f64).collect();
        let a = k_means(&coords, &weights, 3, 100, 9);
        let b = k_means(&coords, &weights, 3, 100, 9);
        assert_eq!(a, b);
    }

    #[test]
    fn test_k_means_drops_empty_groups() {
        let coords = vec![Coordinate::new(37.7749, -122.4194); 6];
        let weights = vec![2.0; 6];
        let groups = k_means(&coords, &weights, 3, 100, DEFAULT_SEED);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_k_means_caps_k_at_n() {
        let coords = vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)];
        let groups = k_means(&coords, &[1.0, 1.0], 5, 100, DEFAULT_SEED);
        assert_eq!(groups.len(), 2);
        assert!(k_means(&[], &[], 3, 100, DEFAULT_SEED).is_empty());
    }
}
