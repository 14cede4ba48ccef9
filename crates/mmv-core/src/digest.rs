//! Deterministic fingerprint of a matrix, as checked by the remote validator.
//!
//! Serialization: rows in index order, each element's decimal form, nothing
//! between them. The MD5 of those ASCII bytes is rendered as uppercase hex.
//! Any other formatting produces a digest the service will reject.

use md5::{Digest, Md5};
use std::fmt::Write;

use crate::matrix::Matrix;

pub fn serialize(matrix: &Matrix) -> String {
    // Rough guess: up to ~6 chars per element for typical products.
    let mut out = String::with_capacity(matrix.dimension() * matrix.dimension() * 6);
    for row in matrix.rows() {
        for v in row {
            // Writing into a String cannot fail.
            let _ = write!(out, "{v}");
        }
    }
    out
}

/// MD5 of `input`'s bytes as uppercase hex.
pub fn digest_str(input: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    hex::encode_upper(hasher.finalize())
}

pub fn digest(matrix: &Matrix) -> String {
    digest_str(&serialize(matrix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: Vec<Vec<i32>>) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn serialize_concatenates_rows_without_separators() {
        let c = m(vec![vec![19, 22], vec![43, 50]]);
        assert_eq!(serialize(&c), "19224350");
    }

    #[test]
    fn serialize_keeps_sign_and_no_padding() {
        let c = m(vec![vec![-1, 0], vec![7, -120]]);
        assert_eq!(serialize(&c), "-107-120");
        assert_eq!(serialize(&Matrix::zeros(0)), "");
    }

    #[test]
    fn known_digest_of_two_by_two_product() {
        let c = m(vec![vec![19, 22], vec![43, 50]]);
        assert_eq!(digest(&c), "DB9F9CFCBC010308B224DFB339D3BD96");
    }

    #[test]
    fn known_digest_of_empty_input() {
        assert_eq!(digest_str(""), "D41D8CD98F00B204E9800998ECF8427E");
        assert_eq!(digest(&Matrix::zeros(0)), "D41D8CD98F00B204E9800998ECF8427E");
    }

    #[test]
    fn digest_is_deterministic_and_uppercase_hex() {
        let c = Matrix::from_fn(6, |i, j| (i * 31 + j * 17) as i32 - 50);
        let d1 = digest(&c);
        let d2 = digest(&c.clone());
        assert_eq!(d1, d2);
        assert_eq!(d1.len(), 32);
        assert!(d1.chars().all(|ch| ch.is_ascii_digit() || ('A'..='F').contains(&ch)));
    }

    #[test]
    fn any_single_change_alters_digest() {
        let base = Matrix::from_fn(5, |i, j| (i * 5 + j) as i32);
        let original = digest(&base);
        for (i, j, delta) in [(0, 0, 1), (2, 3, -1), (4, 4, 1000), (1, 0, i32::MIN)] {
            let mut rows = base.to_rows();
            rows[i][j] = rows[i][j].wrapping_add(delta);
            assert_ne!(digest(&m(rows)), original, "change at ({i},{j})");
        }
    }
}
