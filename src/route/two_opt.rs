//! Route construction heuristics over a [`DistanceMatrix`]
//!
//! Sequences are open paths of matrix indices. The first entry is the anchor
//! (the start location, or the first node when there is none) and never moves.

use super::matrix::DistanceMatrix;

/// Smallest gain, in meters, for which a 2-opt move is applied
///
/// Filters out float noise so the pass never trades a route for an equal one.
pub const MIN_GAIN_M: f64 = 1e-6;

/// Visits every node greedily, always moving to the closest unvisited one
///
/// # Arguments
///
/// * `matrix` - Distances between nodes `0..nodes`, plus the start location when there is one
/// * `nodes` - Number of route nodes; they occupy matrix indices `0..nodes`
/// * `start` - Matrix index of the start location, if any
///
/// # Returns
///
/// The sequence of matrix indices, beginning with `start` when given and with
/// node 0 otherwise. Ties go to the lower node index.
pub fn nearest_neighbor(matrix: &DistanceMatrix, nodes: usize, start: Option<usize>) -> Vec<usize> {
    let mut sequence = Vec::with_capacity(nodes + 1);
    if nodes == 0 {
        return sequence;
    }

    let mut visited = vec![false; nodes];
    let mut current = match start {
        Some(s) => {
            sequence.push(s);
            s
        }
        None => {
            visited[0] = true;
            sequence.push(0);
            0
        }
    };

    while sequence.len() < nodes + usize::from(start.is_some()) {
        let mut best = None;
        let mut best_d = f64::INFINITY;
        for (j, &seen) in visited.iter().enumerate() {
            if seen {
                continue;
            }
            let d = matrix.get(current, j);
            if d < best_d {
                best = Some(j);
                best_d = d;
            }
        }
        // every node has a finite distance, so an unvisited one is always found
        let Some(next) = best else { break };
        visited[next] = true;
        sequence.push(next);
        current = next;
    }

    sequence
}

/// Single first-improvement 2-opt pass over an open path
///
/// For every pair of non-adjacent edges `(i, i+1)` and `(j, j+1)` the segment
/// `i+1..=j` is reversed when that shortens the path by more than
/// [`MIN_GAIN_M`]. Scanning continues from the next pair on the updated
/// sequence; the pass is not repeated to convergence.
///
/// # Returns
///
/// The number of reversals applied.
pub fn two_opt_pass(matrix: &DistanceMatrix, sequence: &mut [usize]) -> usize {
    let m = sequence.len();
    let mut improvements = 0;
    if m < 4 {
        return improvements;
    }

    for i in 0..m - 3 {
        for j in i + 2..m - 1 {
            let a = sequence[i];
            let b = sequence[i + 1];
            let c = sequence[j];
            let d = sequence[j + 1];

            let before = matrix.get(a, b) + matrix.get(c, d);
            let after = matrix.get(a, c) + matrix.get(b, d);
            if after + MIN_GAIN_M < before {
                sequence[i + 1..=j].reverse();
                improvements += 1;
            }
        }
    }

    improvements
}
