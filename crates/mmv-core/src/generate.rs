//! Local fallback datasets, for running the compute half without the service.

use crate::api::Dataset;
use crate::matrix::Matrix;

/// `A[i][j] = i + j`, `B[i][j] = i - j` (wrapping). Deterministic for a given
/// dimension so local digests are reproducible.
pub fn dataset(dataset: Dataset, dimension: usize) -> Matrix {
    Matrix::from_fn(dimension, |i, j| {
        let (i, j) = (i as i32, j as i32);
        match dataset {
            Dataset::A => i.wrapping_add(j),
            Dataset::B => i.wrapping_sub(j),
        }
    })
}
