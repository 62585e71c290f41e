//! Square sparse similarity matrix in compressed sparse row (CSR) layout.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Precomputed pairwise similarity between catalog positions.
///
/// Row `i` stores the non-zero scores of item `i` against every other
/// item; absent entries read as `0.0`. All stored values are finite and
/// non-negative, column indices are strictly increasing within a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CsrParts")]
pub struct SimilarityMatrix {
    dim: usize,
    indptr: Vec<usize>,
    indices: Vec<u32>,
    data: Vec<f32>,
}

/// Unvalidated CSR arrays, as found on disk
#[derive(Debug, Clone, Deserialize)]
pub struct CsrParts {
    pub dim: usize,
    pub indptr: Vec<usize>,
    pub indices: Vec<u32>,
    pub data: Vec<f32>,
}

impl TryFrom<CsrParts> for SimilarityMatrix {
    type Error = Error;

    fn try_from(parts: CsrParts) -> Result<Self> {
        SimilarityMatrix::from_csr(parts.dim, parts.indptr, parts.indices, parts.data)
    }
}

impl SimilarityMatrix {
    /// An empty `0x0` matrix
    pub fn empty() -> Self {
        Self {
            dim: 0,
            indptr: vec![0],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    pub fn from_csr(
        dim: usize,
        indptr: Vec<usize>,
        indices: Vec<u32>,
        data: Vec<f32>,
    ) -> Result<Self> {
        let matrix = Self { dim, indptr, indices, data };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Build from `(row, col, score)` triplets. Duplicate coordinates are
    /// summed, explicit zeros are dropped.
    pub fn from_triplets<I>(dim: usize, triplets: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, f32)>,
    {
        let mut entries: Vec<(usize, usize, f32)> = Vec::new();
        for (row, col, score) in triplets {
            if row >= dim || col >= dim {
                return Err(Error::InvalidMatrix(format!(
                    "entry ({}, {}) outside {}x{} matrix",
                    row, col, dim, dim
                )));
            }
            entries.push((row, col, score));
        }
        entries.sort_by_key(|&(row, col, _)| (row, col));

        let mut indptr = vec![0usize; dim + 1];
        let mut indices = Vec::with_capacity(entries.len());
        let mut data: Vec<f32> = Vec::with_capacity(entries.len());
        let mut last: Option<(usize, usize)> = None;

        for (row, col, score) in entries {
            if last == Some((row, col)) {
                if let Some(value) = data.last_mut() {
                    *value += score;
                }
                continue;
            }
            indptr[row + 1] += 1;
            indices.push(col_index(col)?);
            data.push(score);
            last = Some((row, col));
        }

        for row in 0..dim {
            indptr[row + 1] += indptr[row];
        }

        let matrix = Self { dim, indptr, indices, data };
        matrix.validate()?;
        Ok(matrix.without_zeros())
    }

    /// Build from a dense row-major square matrix
    pub fn from_dense(rows: &[Vec<f32>]) -> Result<Self> {
        let dim = rows.len();
        let mut triplets = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(Error::InvalidMatrix(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    dim
                )));
            }
            for (j, &score) in row.iter().enumerate() {
                if score != 0.0 {
                    triplets.push((i, j, score));
                }
            }
        }
        Self::from_triplets(dim, triplets)
    }

    /// Check every CSR invariant
    pub fn validate(&self) -> Result<()> {
        let expected = self.dim.checked_add(1).ok_or_else(|| {
            Error::InvalidMatrix(format!("dimension {} is too large", self.dim))
        })?;
        if self.indptr.len() != expected {
            return Err(Error::InvalidMatrix(format!(
                "indptr has {} entries, expected {}",
                self.indptr.len(),
                expected
            )));
        }
        if self.indptr[0] != 0 {
            return Err(Error::InvalidMatrix("indptr must start at 0".to_string()));
        }
        if self.indices.len() != self.data.len() {
            return Err(Error::InvalidMatrix(format!(
                "{} column indices but {} values",
                self.indices.len(),
                self.data.len()
            )));
        }
        if self.indptr[self.dim] != self.data.len() {
            return Err(Error::InvalidMatrix(format!(
                "indptr ends at {}, but {} values are stored",
                self.indptr[self.dim],
                self.data.len()
            )));
        }

        // Every row range must lie inside the stored values before slicing
        for (row, bounds) in self.indptr.windows(2).enumerate() {
            if bounds[0] > bounds[1] {
                return Err(Error::InvalidMatrix(format!("indptr decreases at row {}", row)));
            }
            if bounds[1] > self.data.len() {
                return Err(Error::InvalidMatrix(format!(
                    "row {} ends at {}, past the {} stored values",
                    row,
                    bounds[1],
                    self.data.len()
                )));
            }
        }

        for row in 0..self.dim {
            let (start, end) = (self.indptr[row], self.indptr[row + 1]);
            let cols = &self.indices[start..end];
            for (k, &col) in cols.iter().enumerate() {
                if col as usize >= self.dim {
                    return Err(Error::InvalidMatrix(format!(
                        "column {} out of range in row {}",
                        col, row
                    )));
                }
                if k > 0 && cols[k - 1] >= col {
                    return Err(Error::InvalidMatrix(format!(
                        "columns not strictly increasing in row {}",
                        row
                    )));
                }
            }
        }

        if let Some(bad) = self.data.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(Error::InvalidMatrix(format!(
                "scores must be finite and non-negative, found {}",
                bad
            )));
        }

        Ok(())
    }

    /// Number of rows (and columns)
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of explicitly stored entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Sparse view of a row as `(column, score)` pairs
    pub fn row(&self, row: usize) -> Result<impl Iterator<Item = (usize, f32)> + '_> {
        let (start, end) = self.row_bounds(row)?;
        Ok(self.indices[start..end]
            .iter()
            .zip(&self.data[start..end])
            .map(|(&col, &score)| (col as usize, score)))
    }

    /// Row expanded to a dense vector of length `dim`
    pub fn row_dense(&self, row: usize) -> Result<Vec<f32>> {
        let mut dense = vec![0.0f32; self.dim];
        for (col, score) in self.row(row)? {
            dense[col] = score;
        }
        Ok(dense)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f32> {
        if col >= self.dim {
            return Err(Error::PositionOutOfRange { position: col, len: self.dim });
        }
        let (start, end) = self.row_bounds(row)?;
        let cols = &self.indices[start..end];
        Ok(match cols.binary_search(&(col as u32)) {
            Ok(k) => self.data[start + k],
            Err(_) => 0.0,
        })
    }

    fn row_bounds(&self, row: usize) -> Result<(usize, usize)> {
        if row >= self.dim {
            return Err(Error::PositionOutOfRange { position: row, len: self.dim });
        }
        Ok((self.indptr[row], self.indptr[row + 1]))
    }

    fn without_zeros(self) -> Self {
        if self.data.iter().all(|v| *v != 0.0) {
            return self;
        }

        let mut indptr = Vec::with_capacity(self.dim + 1);
        let mut indices = Vec::with_capacity(self.indices.len());
        let mut data = Vec::with_capacity(self.data.len());
        indptr.push(0);
        for row in 0..self.dim {
            for k in self.indptr[row]..self.indptr[row + 1] {
                if self.data[k] != 0.0 {
                    indices.push(self.indices[k]);
                    data.push(self.data[k]);
                }
            }
            indptr.push(data.len());
        }

        Self { dim: self.dim, indptr, indices, data }
    }
}

impl Default for SimilarityMatrix {
    fn default() -> Self {
        Self::empty()
    }
}

fn col_index(col: usize) -> Result<u32> {
    u32::try_from(col)
        .map_err(|_| Error::InvalidMatrix(format!("column {} exceeds u32 range", col)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SimilarityMatrix {
        SimilarityMatrix::from_dense(&[
            vec![1.0, 0.7, 0.2],
            vec![0.7, 1.0, 0.0],
            vec![0.2, 0.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_from_dense_skips_zeros() {
        let m = sample();
        assert_eq!(m.dim(), 3);
        assert_eq!(m.nnz(), 7);
        assert_eq!(m.get(1, 2).unwrap(), 0.0);
        assert_eq!(m.get(0, 1).unwrap(), 0.7);
    }

    #[test]
    fn test_row_dense() {
        let m = sample();
        assert_eq!(m.row_dense(0).unwrap(), vec![1.0, 0.7, 0.2]);
        assert_eq!(m.row_dense(2).unwrap(), vec![0.2, 0.0, 1.0]);
        assert!(matches!(
            m.row_dense(3),
            Err(Error::PositionOutOfRange { position: 3, len: 3 })
        ));
    }

    #[test]
    fn test_triplets_sum_duplicates() {
        let m = SimilarityMatrix::from_triplets(
            2,
            vec![(0, 1, 0.25), (1, 1, 1.0), (0, 1, 0.25), (0, 0, 1.0)],
        )
        .unwrap();
        assert_eq!(m.get(0, 1).unwrap(), 0.5);
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.row(0).unwrap().collect::<Vec<_>>(), vec![(0, 1.0), (1, 0.5)]);
    }

    #[test]
    fn test_triplets_out_of_range() {
        let err = SimilarityMatrix::from_triplets(2, vec![(0, 2, 1.0)]).unwrap_err();
        assert!(matches!(err, Error::InvalidMatrix(_)));
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        assert!(SimilarityMatrix::from_dense(&[vec![1.0, -0.1], vec![0.0, 1.0]]).is_err());
        assert!(SimilarityMatrix::from_dense(&[vec![f32::NAN, 0.0], vec![0.0, 1.0]]).is_err());
    }

    #[test]
    fn test_rejects_non_square() {
        assert!(SimilarityMatrix::from_dense(&[vec![1.0, 0.0], vec![1.0]]).is_err());
    }

    #[test]
    fn test_from_csr_validation() {
        // indptr too short
        assert!(SimilarityMatrix::from_csr(2, vec![0, 1], vec![0], vec![1.0]).is_err());
        // unsorted columns
        assert!(SimilarityMatrix::from_csr(2, vec![0, 2, 2], vec![1, 0], vec![1.0, 1.0]).is_err());
        // length mismatch
        assert!(SimilarityMatrix::from_csr(2, vec![0, 1, 1], vec![0], vec![]).is_err());

        let ok = SimilarityMatrix::from_csr(2, vec![0, 1, 2], vec![0, 1], vec![1.0, 1.0]);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_indptr_overshoot_is_rejected() {
        let err = SimilarityMatrix::from_csr(2, vec![0, 5, 2], vec![0, 1], vec![1.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMatrix(_)));

        let json = r#"{"dim":2,"indptr":[0,5,2],"indices":[0,1],"data":[1.0,1.0]}"#;
        assert!(serde_json::from_str::<SimilarityMatrix>(json).is_err());
    }

    #[test]
    fn test_huge_dimension_is_rejected() {
        let err = SimilarityMatrix::from_csr(usize::MAX, vec![0], vec![], vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidMatrix(_)));
    }

    #[test]
    fn test_deserialize_validates() {
        let good = r#"{"dim":2,"indptr":[0,1,2],"indices":[0,1],"data":[1.0,1.0]}"#;
        let m: SimilarityMatrix = serde_json::from_str(good).unwrap();
        assert_eq!(m.dim(), 2);

        let bad = r#"{"dim":2,"indptr":[0,1,2],"indices":[0,5],"data":[1.0,1.0]}"#;
        assert!(serde_json::from_str::<SimilarityMatrix>(bad).is_err());
    }

    #[test]
    fn test_empty() {
        let m = SimilarityMatrix::empty();
        assert_eq!(m.dim(), 0);
        assert_eq!(m.nnz(), 0);
        assert!(m.validate().is_ok());
        assert!(m.row_dense(0).is_err());
    }
}
