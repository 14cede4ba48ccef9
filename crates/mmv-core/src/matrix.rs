//! Square row-major matrix of `i32` values.
//!
//! Storage is a single flat buffer; rows are exposed as slices so callers can
//! hand disjoint `&mut` rows to different workers without locking.

use std::fmt;

/// An N×N matrix of signed 32-bit integers, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Matrix {
    dimension: usize,
    data: Vec<i32>,
}

impl Matrix {
    /// Allocates a zero-filled `dimension`×`dimension` matrix.
    pub fn zeros(dimension: usize) -> Self {
        Self {
            dimension,
            data: vec![0; dimension * dimension],
        }
    }

    /// Builds a matrix from nested rows. Returns `None` unless every row has
    /// exactly `rows.len()` elements.
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Option<Self> {
        let dimension = rows.len();
        if rows.iter().any(|r| r.len() != dimension) {
            return None;
        }
        Some(Self {
            dimension,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Builds a matrix where element `(i, j)` is `f(i, j)`.
    pub fn from_fn(dimension: usize, mut f: impl FnMut(usize, usize) -> i32) -> Self {
        let mut m = Self::zeros(dimension);
        for (i, row) in m.rows_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = f(i, j);
            }
        }
        m
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.dimension == 0
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        if row >= self.dimension || col >= self.dimension {
            return None;
        }
        Some(self.data[row * self.dimension + col])
    }

    pub fn row(&self, index: usize) -> Option<&[i32]> {
        if index >= self.dimension {
            return None;
        }
        let start = index * self.dimension;
        Some(&self.data[start..start + self.dimension])
    }

    /// Iterates rows in index order. Yields nothing for a 0×0 matrix.
    pub fn rows(&self) -> std::slice::Chunks<'_, i32> {
        self.data.chunks(self.dimension.max(1))
    }

    /// Mutable rows in index order; each yielded slice is disjoint.
    pub fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, i32> {
        self.data.chunks_mut(self.dimension.max(1))
    }

    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        self.rows().map(<[i32]>::to_vec).collect()
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("dimension", &self.dimension)
            .field("rows", &self.to_rows())
            .finish()
    }
}
