//! transform::population — rank-occurrence (population) matrix.
//!
//! Purpose
//! -------
//! Aggregate the rank matrix into `P[r, k]`: how many repetitions assigned
//! rank `r + 1` to sampling location `k`.
//!
//! Key behaviors
//! -------------
//! - One pass over the rank matrix, O(n_r · n_s) element visits; unranked
//!   cells (rank 0) are skipped.
//! - Exposes integer counts plus an `f64` view for the Q engine.
//! - Carries the number of contributing repetitions, used by the Q engine
//!   as `n_r`.
//!
//! Invariants
//! ----------
//! - Column `k` sums to the number of contributing rows that observed
//!   location `k`.
//! - Row `r` sums to the number of contributing rows with `m_i > r`.
//!   Without missing data this is exactly `n_r` for every row and column.
use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::transform::ranking::RankMatrix;

/// PopulationMatrix — counts of rank occurrences per sampling location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationMatrix {
    counts: Array2<u64>,
    repetitions: usize,
}

impl PopulationMatrix {
    /// Build `P` from a rank matrix.
    ///
    /// Rank `r` (1-based) of location `k` increments `P[r - 1, k]`.
    pub fn from_ranks(ranks: &RankMatrix) -> Self {
        let n_s = ranks.n_locations();
        let mut counts = Array2::<u64>::zeros((n_s, n_s));
        for ((_, k), &r) in ranks.ranks().indexed_iter() {
            if r > 0 {
                counts[[r - 1, k]] += 1;
            }
        }
        Self { counts, repetitions: ranks.contributing_rows() }
    }

    /// Raw counts, shape `(n_s, n_s)`, indexed `[rank - 1, location]`.
    pub fn counts(&self) -> ArrayView2<'_, u64> {
        self.counts.view()
    }

    /// Counts as `f64`, the input type of the Q engine.
    pub fn to_f64(&self) -> Array2<f64> {
        self.counts.mapv(|c| c as f64)
    }

    /// Number of sampling locations.
    pub fn n_locations(&self) -> usize {
        self.counts.nrows()
    }

    /// Number of contributing repetitions.
    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    /// Per-location totals (sum over ranks).
    pub fn column_sums(&self) -> Array1<u64> {
        self.counts.sum_axis(Axis(0))
    }

    /// Per-rank totals (sum over locations).
    pub fn row_sums(&self) -> Array1<u64> {
        self.counts.sum_axis(Axis(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{mask::MissingMask, options::TransformOptions};
    use ndarray::array;

    fn population_of(data: &Array2<f64>) -> PopulationMatrix {
        let opts = TransformOptions::default();
        let mask = MissingMask::from_matrix(data.view(), opts.min_valid_per_row);
        PopulationMatrix::from_ranks(&RankMatrix::from_data(data.view(), &mask, &opts))
    }

    #[test]
    // Purpose
    // -------
    // Fully observed data gives row and column sums equal to n_r.
    //
    // Given
    // -----
    // - A 3 x 4 matrix without ties or missing values.
    //
    // Expect
    // ------
    // - Every column and every row of P sums to 3; the total is 12.
    fn complete_data_sums_to_repetitions() {
        // Arrange
        let data = array![
            [0.4, -0.1, 0.9, 0.2],
            [1.5, 0.3, -0.7, 0.0],
            [-0.2, 0.8, 0.1, 0.6]
        ];

        // Act
        let p = population_of(&data);

        // Assert
        assert_eq!(p.n_locations(), 4);
        assert_eq!(p.repetitions(), 3);
        assert!(p.column_sums().iter().all(|&s| s == 3));
        assert!(p.row_sums().iter().all(|&s| s == 3));
        assert_eq!(p.counts().sum(), 12);
    }

    #[test]
    // Purpose
    // -------
    // Missing entries reduce the affected column sum and the top rank row.
    //
    // Given
    // -----
    // - Two rows over three locations; row 1 misses location 2.
    //
    // Expect
    // ------
    // - Column sums [2, 2, 1]; row sums [2, 2, 1] (rank 3 only from row 0).
    fn missing_entries_shrink_sums() {
        let data = array![[0.3, 0.1, 0.2], [0.5, 0.9, f64::NAN]];
        let p = population_of(&data);
        assert_eq!(p.column_sums(), array![2, 2, 1]);
        assert_eq!(p.row_sums(), array![2, 2, 1]);
        assert_eq!(p.counts(), array![[1, 1, 0], [0, 1, 1], [1, 0, 0]]);
    }

    #[test]
    fn to_f64_preserves_counts() {
        let data = array![[0.3, 0.1], [0.5, 0.9]];
        let p = population_of(&data);
        assert_eq!(p.to_f64(), array![[1.0, 1.0], [1.0, 1.0]]);
    }
}
