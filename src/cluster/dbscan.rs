use super::kdtree::new_kd_tree;
use crate::geo::Coordinate;
use bitvec::prelude::*;

// DBSCAN algorithm pseudocode (from <http://en.wikipedia.org/wiki/DBSCAN>):
//
// DBSCAN(D, eps, MinPts)
//    C = 0
//    for each unvisited point P in dataset D
//       mark P as visited
//       NeighborPts = regionQuery(P, eps)
//       if sizeof(NeighborPts) < MinPts
//          mark P as NOISE
//       else
//          C = next cluster
//          expandCluster(P, NeighborPts, C, eps, MinPts)
//
// expandCluster(P, NeighborPts, C, eps, MinPts)
//    add P to cluster C
//    for each point P' in NeighborPts
//       if P' is not visited
//          mark P' as visited
//          NeighborPts' = regionQuery(P', eps)
//          if sizeof(NeighborPts') >= MinPts
//             NeighborPts = NeighborPts joined with NeighborPts'
//       if P' is not yet member of any cluster
//          add P' to cluster C
//
// regionQuery(P, eps)
//    return all points within P's eps-neighborhood (including P)

/// Group is an index-level clustering result: which inputs belong together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Label assigned by the pass that produced the group
    pub label: usize,
    /// Indices of the input points, in discovery order
    pub members: Vec<usize>,
}

/// Clusters coordinates using DBSCAN over a K-D tree
///
/// # Arguments
///
/// * `coords` - Coordinates to cluster
/// * `eps_m` - Neighbourhood radius in meters (inclusive)
/// * `min_points` - Minimum number of points in the eps-neighbourhood, the point itself included
///
/// # Returns
///
/// A tuple `(groups, noise)` where:
/// - `groups` are the density-connected groups found
/// - `noise` are indices of points reachable from no core point
///
/// Every index appears exactly once across `groups` and `noise`.
pub fn db_scan(coords: &[Coordinate], eps_m: f64, min_points: usize) -> (Vec<Group>, Vec<usize>) {
    let n = coords.len();
    let mut visited = bitvec![0; n];
    let mut members = bitvec![0; n];
    let mut groups = Vec::new();
    let mut noise = Vec::new();
    let kd_tree = new_kd_tree(coords);

    let mut neighbor_unique = bitvec![0; n];

    for i in 0..n {
        if visited[i] {
            continue;
        }
        visited.set(i, true);

        let neighbor_pts = kd_tree.in_range(&coords[i], eps_m, Vec::new());
        if neighbor_pts.len() < min_points {
            noise.push(i);
            continue;
        }

        let mut group = Group {
            label: groups.len(),
            members: vec![i],
        };
        members.set(i, true);

        // expandCluster goes here inline
        neighbor_unique.fill(false);
        for &j in &neighbor_pts {
            neighbor_unique.set(j, true);
        }

        let mut neighbor_pts = neighbor_pts;
        let mut j = 0;
        // neighbor_pts grows while we walk it
        while j < neighbor_pts.len() {
            let k = neighbor_pts[j];
            if !visited[k] {
                visited.set(k, true);
                let more_neighbors = kd_tree.in_range(&coords[k], eps_m, Vec::new());
                if more_neighbors.len() >= min_points {
                    for &p in &more_neighbors {
                        if !neighbor_unique[p] {
                            neighbor_pts.push(p);
                            neighbor_unique.set(p, true);
                        }
                    }
                }
            }

            if !members[k] {
                group.members.push(k);
                members.set(k, true);
            }
            j += 1;
        }
        groups.push(group);
    }

    // A point marked noise early can still be claimed as a border point of a
    // group discovered later.
    noise.retain(|&i| !members[i]);

    (groups, noise)
}
