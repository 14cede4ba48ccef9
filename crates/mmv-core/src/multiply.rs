//! Square matrix product, parallel across output rows.
//!
//! Arithmetic wraps on overflow (two's-complement `i32`), the same result a
//! native 32-bit multiply-accumulate produces. Since wrapping addition is
//! associative, the accumulation order inside a row does not change the
//! result.

use std::num::NonZeroUsize;

use crate::error::MultiplyError;
use crate::matrix::Matrix;

/// Worker threads used when none are configured.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// `a × b` using [`default_workers`] threads.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, MultiplyError> {
    multiply_with_workers(a, b, default_workers())
}

/// `a × b` with output rows split into contiguous blocks, one block per
/// worker. Each worker owns its block exclusively; the inputs are shared
/// read-only.
pub fn multiply_with_workers(a: &Matrix, b: &Matrix, workers: usize) -> Result<Matrix, MultiplyError> {
    if a.dimension() != b.dimension() {
        return Err(MultiplyError::ShapeMismatch {
            left: a.dimension(),
            right: b.dimension(),
        });
    }
    let n = a.dimension();
    let mut product = Matrix::zeros(n);
    if n == 0 {
        return Ok(product);
    }

    let workers = workers.clamp(1, n);
    let rows_per_worker = n.div_ceil(workers);
    let mut jobs: Vec<(&mut [i32], &[i32])> = product.rows_mut().zip(a.rows()).collect();

    std::thread::scope(|s| {
        for block in jobs.chunks_mut(rows_per_worker) {
            s.spawn(move || {
                for (out, a_row) in block.iter_mut() {
                    multiply_row(a_row, b, out);
                }
            });
        }
    });

    Ok(product)
}

/// `out = a_row × b`, where `out` starts zeroed.
fn multiply_row(a_row: &[i32], b: &Matrix, out: &mut [i32]) {
    for (&a_ik, b_row) in a_row.iter().zip(b.rows()) {
        if a_ik == 0 {
            continue;
        }
        for (o, &b_kj) in out.iter_mut().zip(b_row) {
            *o = o.wrapping_add(a_ik.wrapping_mul(b_kj));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: Vec<Vec<i32>>) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    fn identity(n: usize) -> Matrix {
        Matrix::from_fn(n, |i, j| i32::from(i == j))
    }

    /// Deterministic pseudo-random fill (LCG), including negative values.
    fn scrambled(n: usize, seed: u32) -> Matrix {
        let mut state = seed;
        Matrix::from_fn(n, |_, _| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 8) as i32 - (1 << 23)
        })
    }

    fn reference(a: &Matrix, b: &Matrix) -> Matrix {
        let n = a.dimension();
        Matrix::from_fn(n, |i, j| {
            let mut sum = 0i32;
            for k in 0..n {
                sum = sum.wrapping_add(a.get(i, k).unwrap().wrapping_mul(b.get(k, j).unwrap()));
            }
            sum
        })
    }

    #[test]
    fn two_by_two_product() {
        let a = m(vec![vec![1, 2], vec![3, 4]]);
        let b = m(vec![vec![5, 6], vec![7, 8]]);
        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.to_rows(), vec![vec![19, 22], vec![43, 50]]);
    }

    #[test]
    fn identity_is_neutral() {
        let x = scrambled(7, 42);
        assert_eq!(multiply(&identity(7), &x).unwrap(), x);
        assert_eq!(multiply(&x, &identity(7)).unwrap(), x);
    }

    #[test]
    fn zero_matrix_annihilates() {
        let x = scrambled(5, 7);
        let z = Matrix::zeros(5);
        assert_eq!(multiply(&z, &x).unwrap(), z);
        assert_eq!(multiply(&x, &z).unwrap(), z);
    }

    #[test]
    fn matches_triple_loop_for_any_worker_count() {
        let a = scrambled(9, 1);
        let b = scrambled(9, 2);
        let expected = reference(&a, &b);
        for workers in [1, 2, 3, 4, 9, 32] {
            assert_eq!(multiply_with_workers(&a, &b, workers).unwrap(), expected, "workers {workers}");
        }
    }

    #[test]
    fn overflow_wraps() {
        let a = m(vec![vec![i32::MAX, 1], vec![0, 0]]);
        let b = m(vec![vec![2, 0], vec![1, 0]]);
        let c = multiply(&a, &b).unwrap();
        // MAX * 2 wraps to -2, then + 1.
        assert_eq!(c.get(0, 0), Some(-1));
        assert_eq!(c.get(0, 0), Some(i32::MAX.wrapping_mul(2).wrapping_add(1)));
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let a = Matrix::zeros(3);
        let b = Matrix::zeros(2);
        assert_eq!(
            multiply(&a, &b),
            Err(MultiplyError::ShapeMismatch { left: 3, right: 2 })
        );
    }

    #[test]
    fn empty_product_for_dimension_zero() {
        let c = multiply(&Matrix::zeros(0), &Matrix::zeros(0)).unwrap();
        assert!(c.is_empty());
    }
}
