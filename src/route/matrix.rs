use crate::geo::{Coordinate, haversine};

/// Symmetric haversine distances between every pair of locations
pub struct DistanceMatrix {
    n: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    pub fn new(locations: &[Coordinate]) -> Self {
        let n = locations.len();
        let mut cells = vec![0.0; n * n];
        for i in 0..n {
            for j in i + 1..n {
                let d = haversine(&locations[i], &locations[j]);
                cells[i * n + j] = d;
                cells[j * n + i] = d;
            }
        }
        DistanceMatrix { n, cells }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.n + j]
    }

    /// Sum of consecutive legs along `sequence`
    pub fn sequence_length(&self, sequence: &[usize]) -> f64 {
        sequence.windows(2).map(|w| self.get(w[0], w[1])).sum()
    }
}
