//! Square, symmetric similarity matrix over one fact collection

use crate::{ReducerError, Result};

/// Pairwise similarities for one run, values in `[0, 1]`, diagonal `1.0`
///
/// Only the upper triangle is ever computed; every write is mirrored, so
/// `get(i, j) == get(j, i)` holds bit for bit.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Identity matrix of size `n` (every fact similar only to itself)
    pub fn identity(n: usize) -> Self {
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            values[i * n + i] = 1.0;
        }
        Self { n, values }
    }

    /// Build a matrix by evaluating `f(i, j)` for every `i < j`
    ///
    /// Results are clamped into `[0, 1]`; NaN is treated as `0.0`.
    pub fn from_fn<F>(n: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> Result<f64>,
    {
        let mut matrix = Self::identity(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let value = f(i, j)?;
                matrix.set(i, j, value);
            }
        }
        Ok(matrix)
    }

    /// Build a matrix from explicit rows, checking shape, symmetry and bounds
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if rows.iter().any(|row| row.len() != n) {
            return Err(ReducerError::Configuration(
                "similarity matrix must be square".to_string(),
            ));
        }

        for i in 0..n {
            for j in 0..n {
                let value = rows[i][j];
                if !(0.0..=1.0).contains(&value) {
                    return Err(ReducerError::Configuration(format!(
                        "similarity ({}, {}) = {} is outside [0, 1]",
                        i, j, value
                    )));
                }
                if value != rows[j][i] {
                    return Err(ReducerError::Configuration(format!(
                        "similarity matrix is not symmetric at ({}, {})",
                        i, j
                    )));
                }
            }
        }

        Self::from_fn(n, |i, j| Ok(rows[i][j]))
    }

    fn set(&mut self, i: usize, j: usize, value: f64) {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        self.values[i * self.n + j] = value;
        self.values[j * self.n + i] = value;
    }

    /// Similarity between facts `i` and `j`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    /// Distance between facts `i` and `j` (`1 - similarity`)
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        1.0 - self.get(i, j)
    }

    /// Number of facts covered
    pub fn len(&self) -> usize {
        self.n
    }

    /// True for a matrix over zero facts
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Similarities of fact `i` to every fact, itself included
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let m = SimilarityMatrix::identity(3);
        assert_eq!(m.len(), 3);
        assert_eq!(m.get(1, 1), 1.0);
        assert_eq!(m.get(0, 2), 0.0);
        assert_eq!(m.distance(0, 2), 1.0);
    }

    #[test]
    fn test_from_fn_mirrors_and_clamps() {
        let m = SimilarityMatrix::from_fn(3, |i, j| Ok(if i == 0 && j == 1 { 1.7 } else { -0.2 })).unwrap();
        assert_eq!(m.get(0, 1), 1.0);
        assert_eq!(m.get(1, 0), 1.0);
        assert_eq!(m.get(2, 1), 0.0);
        assert_eq!(m.get(2, 2), 1.0);
    }

    #[test]
    fn test_from_fn_propagates_errors() {
        let result = SimilarityMatrix::from_fn(2, |_, _| Err(ReducerError::Dependency("down".into())));
        assert!(matches!(result, Err(ReducerError::Dependency(_))));
    }

    #[test]
    fn test_from_rows_validation() {
        assert!(SimilarityMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.5, 1.0]]).is_ok());
        assert!(SimilarityMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.4, 1.0]]).is_err());
        assert!(SimilarityMatrix::from_rows(vec![vec![1.0, 1.5], vec![1.5, 1.0]]).is_err());
        assert!(SimilarityMatrix::from_rows(vec![vec![1.0, 0.5]]).is_err());
    }

    #[test]
    fn test_empty() {
        let m = SimilarityMatrix::identity(0);
        assert!(m.is_empty());
    }

    #[test]
    fn test_row() {
        let m = SimilarityMatrix::from_rows(vec![vec![1.0, 0.25], vec![0.25, 1.0]]).unwrap();
        assert_eq!(m.row(1), &[0.25, 1.0]);
    }
}
