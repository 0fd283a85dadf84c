// File: geometry.rs
// Created: 2026-10-16
// Description: Parcel positions of one subject and the ground distances between them

use std::path::Path;

use ndarray::{Array2, ArrayView1};

use crate::error::Result;
use crate::io::{into_matrix, npz::read_npz_first};

/// Position of every parcel of one subject, `n_parcels x n_dims`, with the
/// pairwise Euclidean distances precomputed.
///
/// Distances are in the unit of the stored positions. Pairwise distances can
/// be retrieved with `pairwise_dist[i * n + j]`.
#[derive(Debug, Clone)]
pub struct ParcelGeometry {
    pub positions: Array2<f64>,
    pairwise_dist: Vec<f64>,
    n: usize,
}

#[inline(always)]
fn dist(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

impl ParcelGeometry {
    pub fn new(positions: Array2<f64>) -> Self {
        let n = positions.nrows();
        let mut pairwise_dist = Vec::with_capacity(n * n);
        for a in positions.outer_iter() {
            for b in positions.outer_iter() {
                pairwise_dist.push(dist(a, b));
            }
        }
        Self {
            positions,
            pairwise_dist,
            n,
        }
    }

    /// Load the first array of a `<subject>_labels.npz` archive. A 1-D array is
    /// read as positions on a line.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let positions = into_matrix(read_npz_first(path)?)?;
        Ok(Self::new(positions))
    }

    pub fn n_parcels(&self) -> usize {
        self.n
    }

    #[inline(always)]
    pub fn get_distance(&self, i: usize, j: usize) -> f64 {
        self.pairwise_dist[i * self.n + j]
    }
}
