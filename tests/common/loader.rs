// File: loader.rs
// Created: 2026-10-16
// Description: On-disk fixtures: parcel geometries and label matrices

use std::path::Path;

use ndarray::{Array2, ArrayView2};
use parcelscore::io::npz::write_npz;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Write `<dir>/<subject>_labels.npz` holding the parcel positions
pub fn write_labels(dir: &Path, subject: &str, positions: ArrayView2<f64>) {
    let path = dir.join(format!("{}_labels.npz", subject));
    write_npz(&path, &[("arr_0", positions.into_dyn())]).expect("Failed to write label file");
}

/// Parcels evenly spaced on a line, `spacing` apart
pub fn line_positions(n_parcels: usize, spacing: f64) -> Array2<f64> {
    Array2::from_shape_fn((n_parcels, 3), |(i, d)| if d == 0 { i as f64 * spacing } else { 0.0 })
}

/// Random non-negative activations with at least one active parcel per row
pub fn random_activations(rng: &mut StdRng, n_rows: usize, n_parcels: usize) -> Array2<f64> {
    let mut activations = Array2::from_shape_fn((n_rows, n_parcels), |_| {
        if rng.gen_bool(0.3) { rng.gen_range(0.1..2.0) } else { 0.0 }
    });
    for mut row in activations.rows_mut() {
        let i = rng.gen_range(0..n_parcels);
        row[i] += 1.0;
    }
    activations
}

/// Random 0/1 labels with both classes present and matching raw scores
pub fn random_labels_and_scores(seed: u64, n_rows: usize, n_sources: usize) -> (Array2<f64>, Array2<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut y_true = Array2::from_shape_fn((n_rows, n_sources), |_| if rng.gen_bool(0.2) { 1.0 } else { 0.0 });
    y_true[[0, 0]] = 1.0;
    y_true[[n_rows - 1, n_sources - 1]] = 0.0;
    let y_score = Array2::from_shape_fn((n_rows, n_sources), |_| (rng.gen_range(0..20) as f64) / 10.0 - 1.0);
    (y_true, y_score)
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
