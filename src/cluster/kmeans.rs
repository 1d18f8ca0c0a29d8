//! Centroid clustering (k-means over haversine distance)
//!
//! Initialisation is k-means++ driven by a seeded `SmallRng`, so identical
//! inputs and seeds always produce identical groups.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::dbscan::Group;
use super::stats::weighted_centroid;
use crate::geo::{Coordinate, haversine};

/// Smallest and largest `k` derived from the input size
pub const MIN_K: usize = 2;
pub const MAX_K: usize = 5;

/// Picks `k = clamp(round(sqrt(n / 2)), 2, 5)`, never more than `n`
pub fn choose_k(n: usize) -> usize {
    let k = ((n as f64) / 2.0).sqrt().round() as usize;
    k.clamp(MIN_K, MAX_K).min(n)
}

/// Clusters coordinates into at most `k` groups
///
/// # Arguments
///
/// * `coords` - Coordinates to cluster
/// * `weights` - Per-point weight used when recomputing centroids
/// * `k` - Requested number of centroids, reduced to `coords.len()` if larger
/// * `max_iterations` - Cap on assign/update rounds
/// * `seed` - Seed for the k-means++ initialisation
///
/// Groups left without members are dropped, so fewer than `k` groups may come
/// back. Members within a group are in ascending index order.
pub fn k_means(
    coords: &[Coordinate],
    weights: &[f64],
    k: usize,
    max_iterations: usize,
    seed: u64,
) -> Vec<Group> {
    let n = coords.len();
    let k = k.min(n);
    if k == 0 {
        return Vec::new();
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut centroids = plus_plus_init(coords, k, &mut rng);
    let mut assignment = vec![usize::MAX; n];

    for iteration in 0..max_iterations {
        let mut changed = false;
        for (i, c) in coords.iter().enumerate() {
            let nearest = nearest_centroid(c, &centroids);
            if assignment[i] != nearest {
                assignment[i] = nearest;
                changed = true;
            }
        }
        if !changed {
            tracing::debug!(iteration, "k-means converged");
            break;
        }

        for (ci, centroid) in centroids.iter_mut().enumerate() {
            let mut members = Vec::new();
            let mut member_weights = Vec::new();
            for i in (0..n).filter(|&i| assignment[i] == ci) {
                members.push(coords[i]);
                member_weights.push(weights[i]);
            }
            // an emptied centroid stays put; it is dropped below if still empty
            if let Some(updated) = weighted_centroid(&members, &member_weights) {
                *centroid = updated;
            }
        }
    }

    let mut groups: Vec<Group> = (0..k)
        .map(|label| Group {
            label,
            members: Vec::new(),
        })
        .collect();
    for (i, &ci) in assignment.iter().enumerate() {
        groups[ci].members.push(i);
    }
    groups.retain(|g| !g.members.is_empty());
    groups
}

/// Index of the closest centroid, ties going to the lower index
fn nearest_centroid(c: &Coordinate, centroids: &[Coordinate]) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let d = haversine(c, centroid);
        if d < best_d {
            best = i;
            best_d = d;
        }
    }
    best
}

/// k-means++ seeding: each new centroid is drawn with probability
/// proportional to its squared distance from the nearest chosen one
fn plus_plus_init(coords: &[Coordinate], k: usize, rng: &mut SmallRng) -> Vec<Coordinate> {
    let n = coords.len();
    let mut chosen = vec![rng.gen_range(0..n)];
    let mut d2: Vec<f64> = coords
        .iter()
        .map(|c| haversine(c, &coords[chosen[0]]).powi(2))
        .collect();

    while chosen.len() < k {
        let total: f64 = d2.iter().sum();
        let next = if total > 0.0 {
            let target = rng.gen_range(0.0..total);
            let mut acc = 0.0;
            let mut pick = n - 1;
            for (i, &d) in d2.iter().enumerate() {
                acc += d;
                if acc > target {
                    pick = i;
                    break;
                }
            }
            pick
        } else {
            // every point sits on a chosen centroid; take the first unused index
            (0..n).find(|i| !chosen.contains(i)).unwrap_or(0)
        };

        chosen.push(next);
        for (i, c) in coords.iter().enumerate() {
            let d = haversine(c, &coords[next]).powi(2);
            if d < d2[i] {
                d2[i] = d;
            }
        }
    }

    chosen.iter().map(|&i| coords[i]).collect()
}
