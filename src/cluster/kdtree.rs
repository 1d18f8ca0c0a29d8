//! K-D tree over geographic coordinates for "everything within N meters" queries
//!
//! Points are separated from nodes. Nodes hold only indices into the points slice.
//! Coordinates are stored as `[lng, lat]` so split dimension 0 is longitude.
//!
//! This code is heavily based on <https://godoc.org/code.google.com/p/eaburns/kdtree>
//!
//! Original code is under New BSD License.
//! Author: Ethan Burns <burns.ethan@gmail.com>

use crate::geo::{Coordinate, degree_window, haversine};

const LNG: usize = 0;
const LAT: usize = 1;

/// KD-Tree implementation for efficient spatial queries
pub struct KDTree {
    /// All points in the tree as `[lng, lat]`
    pub points: Vec<[f64; 2]>,
    /// Root node of the tree
    pub root: Option<Box<KDTreeNode>>,
}

/// A node in the K-D tree
pub struct KDTreeNode {
    /// Index of the point associated with this node
    pub point_id: usize,

    split: usize,
    left: Option<Box<KDTreeNode>>,
    right: Option<Box<KDTreeNode>>,
}

/// Axis-aligned degree box, indexed like the stored points
#[derive(Debug, Clone, Copy)]
struct Window {
    min: [f64; 2],
    max: [f64; 2],
}

impl Window {
    fn contains(&self, p: &[f64; 2]) -> bool {
        (0..2).all(|d| self.min[d] <= p[d] && p[d] <= self.max[d])
    }
}

impl KDTree {
    /// Finds all points within `radius_m` meters (inclusive) of `center`
    ///
    /// Candidates are pruned with a conservative degree box and then confirmed
    /// with the haversine distance. A window crossing the antimeridian is
    /// split in two, so results never contain duplicates.
    ///
    /// To avoid allocation, the `nodes` vector can be pre-allocated with a larger
    /// capacity and re-used across multiple calls.
    pub fn in_range(&self, center: &Coordinate, radius_m: f64, mut nodes: Vec<usize>) -> Vec<usize> {
        if radius_m < 0.0 || !radius_m.is_finite() {
            return nodes;
        }
        for window in query_windows(center, radius_m) {
            self.in_range_recursive(self.root.as_deref(), &window, center, radius_m, &mut nodes);
        }
        nodes
    }

    fn in_range_recursive(
        &self,
        t: Option<&KDTreeNode>,
        window: &Window,
        center: &Coordinate,
        r: f64,
        nodes: &mut Vec<usize>,
    ) {
        let t = match t {
            None => return,
            Some(t) => t,
        };

        let pt = &self.points[t.point_id];
        let pivot = pt[t.split];

        // median split: left holds values <= pivot, right holds values >= pivot
        if window.min[t.split] <= pivot {
            self.in_range_recursive(t.left.as_deref(), window, center, r, nodes);
        }
        if window.contains(pt) && haversine(center, &Coordinate::new(pt[LAT], pt[LNG])) <= r {
            nodes.push(t.point_id);
        }
        if window.max[t.split] >= pivot {
            self.in_range_recursive(t.right.as_deref(), window, center, r, nodes);
        }
    }

    /// Returns the height of the K-D tree
    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, |r| r.height())
    }
}

impl KDTreeNode {
    fn height(&self) -> usize {
        let ht = self.left.as_ref().map_or(0, |l| l.height());
        let rht = self.right.as_ref().map_or(0, |r| r.height());
        ht.max(rht) + 1
    }
}

/// Creates a new K-D tree built from the given coordinates
///
/// Construction splits on the median of alternating dimensions, so the tree
/// stays balanced even when many points share a coordinate.
pub fn new_kd_tree(coords: &[Coordinate]) -> KDTree {
    let points: Vec<[f64; 2]> = coords.iter().map(|c| [c.lng, c.lat]).collect();
    let mut ids: Vec<usize> = (0..points.len()).collect();
    let root = build_tree(&points, &mut ids, 0);
    KDTree { points, root }
}

/// Builds a tree node from the median point and recursively builds left and right subtrees
fn build_tree(points: &[[f64; 2]], ids: &mut [usize], depth: usize) -> Option<Box<KDTreeNode>> {
    if ids.is_empty() {
        return None;
    }

    let split = depth % 2;
    let m = ids.len() / 2;
    ids.select_nth_unstable_by(m, |&a, &b| {
        points[a][split]
            .total_cmp(&points[b][split])
            .then_with(|| points[a][1 - split].total_cmp(&points[b][1 - split]))
            .then_with(|| a.cmp(&b))
    });

    let point_id = ids[m];
    let (left, rest) = ids.split_at_mut(m);
    let right = &mut rest[1..];

    Some(Box::new(KDTreeNode {
        point_id,
        split,
        left: build_tree(points, left, depth + 1),
        right: build_tree(points, right, depth + 1),
    }))
}

/// Degree boxes covering the `radius_m` circle around `center`
fn query_windows(center: &Coordinate, radius_m: f64) -> Vec<Window> {
    let (d_lat, d_lng) = degree_window(center, radius_m);
    let lat_lo = center.lat - d_lat;
    let lat_hi = center.lat + d_lat;

    if d_lng >= 180.0 {
        return vec![Window {
            min: [-180.0, lat_lo],
            max: [180.0, lat_hi],
        }];
    }

    let lo = center.lng - d_lng;
    let hi = center.lng + d_lng;
    let mut windows = vec![Window {
        min: [lo.max(-180.0), lat_lo],
        max: [hi.min(180.0), lat_hi],
    }];
    if lo < -180.0 {
        windows.push(Window {
            min: [lo + 360.0, lat_lo],
            max: [180.0, lat_hi],
        });
    }
    if hi > 180.0 {
        windows.push(Window {
            min: [-180.0, lat_lo],
            max: [hi - 360.0, lat_hi],
        });
    }
    windows
}
