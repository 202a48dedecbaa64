//! transform::ranking — row-wise ranking with configurable tie policy.
//!
//! Purpose
//! -------
//! Convert each repetition of a residual matrix into ranks 1..m_i ascending
//! with value, independently per row.
//!
//! Key behaviors
//! -------------
//! - [`rank_row`] ranks one slice of valid values. The result is always a
//!   permutation of 1..m, including when every value is equal.
//! - `TiePolicy::Ordinal` keeps equal values in column order (stable sort).
//! - `TiePolicy::Random` shuffles the visiting order once, then stable-sorts,
//!   so equal values end up in a uniformly random order.
//! - [`RankMatrix::from_data`] ranks all contributing rows in parallel.
//!   Each row owns a generator seeded from the master generator in row
//!   order, so results do not depend on thread scheduling.
//!
//! Conventions
//! -----------
//! - Ranks are 1-based. Cells that were missing, or that belong to a dropped
//!   row, hold rank 0.
//! - Comparisons use `partial_cmp`; inputs are finite after masking.
use std::cmp::Ordering;

use ndarray::{Array2, ArrayView2};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use rayon::prelude::*;

use crate::transform::{
    mask::MissingMask,
    options::{TiePolicy, TransformOptions},
};

/// Rank `values` ascending, returning 1-based ranks in input order.
///
/// Parameters
/// ----------
/// - `values`: `&[f64]`
///   Finite values of one row (missing entries already removed).
/// - `policy`: [`TiePolicy`]
///   Tie resolution. `Ordinal` never touches `rng`.
/// - `rng`: `&mut R`
///   Source for the tie permutation under `Random`.
///
/// Returns
/// -------
/// `Vec<usize>` of the same length as `values`, a permutation of `1..=m`.
///
/// Examples
/// --------
/// ```rust
/// # use rand::{SeedableRng, rngs::StdRng};
/// # use rank_order::transform::{ranking::rank_row, options::TiePolicy};
/// let mut rng = StdRng::seed_from_u64(0);
/// let ranks = rank_row(&[0.3, -1.0, 0.3, 2.0], TiePolicy::Ordinal, &mut rng);
/// assert_eq!(ranks, vec![2, 1, 3, 4]);
/// ```
pub fn rank_row<R: Rng + ?Sized>(values: &[f64], policy: TiePolicy, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    if policy == TiePolicy::Random {
        order.shuffle(rng);
    }
    // Stable: entries comparing equal keep the (possibly shuffled) visiting order.
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0; values.len()];
    for (position, &index) in order.iter().enumerate() {
        ranks[index] = position + 1;
    }
    ranks
}

/// RankMatrix — ranks of every repetition, same shape as the data.
///
/// Fields
/// ------
/// - `ranks`: `Array2<usize>` of shape `(n_r, n_s)`; 0 marks an unranked cell.
/// - `counts`: `m_i` per row, the number of ranked cells (0 for dropped rows).
///
/// Invariants
/// ----------
/// - For each contributing row `i`, the non-zero entries of `ranks.row(i)`
///   are exactly a permutation of `1..=counts[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankMatrix {
    ranks: Array2<usize>,
    counts: Vec<usize>,
}

impl RankMatrix {
    /// Rank every contributing row of `data` under `opts.tie_policy`.
    ///
    /// Parameters
    /// ----------
    /// - `data`: residual matrix `(n_r, n_s)`, already validated.
    /// - `mask`: missing-data mask built from the same `data`.
    /// - `opts`: transform options (tie policy and seed).
    ///
    /// Notes
    /// -----
    /// - Per-row seeds are drawn for every row, dropped or not. Row `i`
    ///   therefore gets the same stream no matter which other rows are
    ///   masked.
    pub fn from_data(data: ArrayView2<f64>, mask: &MissingMask, opts: &TransformOptions) -> Self {
        let (n_r, n_s) = data.dim();
        let row_seeds: Vec<u64> = match opts.tie_policy {
            TiePolicy::Ordinal => vec![0; n_r],
            TiePolicy::Random => {
                let mut master = opts.master_rng();
                (0..n_r).map(|_| master.r#gen()).collect()
            }
        };

        let row_ranks: Vec<Option<Vec<usize>>> = (0..n_r)
            .into_par_iter()
            .map(|i| {
                if !mask.is_contributing(i) {
                    return None;
                }
                let row_mask = &mask.rows()[i];
                let values = row_mask.gather(data.row(i));
                let mut rng = StdRng::seed_from_u64(row_seeds[i]);
                Some(rank_row(&values, opts.tie_policy, &mut rng))
            })
            .collect();

        let mut ranks = Array2::<usize>::zeros((n_r, n_s));
        let mut counts = vec![0; n_r];
        for (i, row) in row_ranks.into_iter().enumerate() {
            if let Some(row) = row {
                for (&k, &r) in mask.rows()[i].valid_cols().iter().zip(&row) {
                    ranks[[i, k]] = r;
                }
                counts[i] = row.len();
            }
        }
        Self { ranks, counts }
    }

    /// Rank matrix view; 0 marks an unranked cell.
    pub fn ranks(&self) -> ArrayView2<'_, usize> {
        self.ranks.view()
    }

    /// Number of ranked cells per row.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of sampling locations, `n_s`.
    pub fn n_locations(&self) -> usize {
        self.ranks.ncols()
    }

    /// Number of rows that carry a ranking.
    pub fn contributing_rows(&self) -> usize {
        self.counts.iter().filter(|&&m| m > 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Permutation property under both tie policies, including all-equal rows.
    // - Ordinal tie resolution by column position.
    // - Reproducibility of the random policy for a fixed seed.
    // - Unranked cells for missing entries and dropped rows.
    // -------------------------------------------------------------------------

    fn is_permutation(ranks: &[usize]) -> bool {
        let mut sorted = ranks.to_vec();
        sorted.sort_unstable();
        sorted.iter().enumerate().all(|(pos, &r)| r == pos + 1)
    }

    #[test]
    // Purpose
    // -------
    // Two equal minima are ranked by column under the ordinal policy.
    //
    // Given
    // -----
    // - Row [0.5, -2.0, 1.0, -2.0].
    //
    // Expect
    // ------
    // - Column 1 gets rank 1, column 3 rank 2.
    fn ordinal_breaks_ties_by_column() {
        let mut rng = StdRng::seed_from_u64(1);
        let ranks = rank_row(&[0.5, -2.0, 1.0, -2.0], TiePolicy::Ordinal, &mut rng);
        assert_eq!(ranks, vec![3, 1, 4, 2]);
    }

    #[test]
    // Purpose
    // -------
    // All-equal rows still produce a valid permutation under both policies.
    //
    // Given
    // -----
    // - Six identical values.
    //
    // Expect
    // ------
    // - Ordinal yields 1..=6 in column order; Random yields some permutation.
    fn all_equal_row_is_still_a_permutation() {
        let values = [4.2; 6];
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(rank_row(&values, TiePolicy::Ordinal, &mut rng), vec![1, 2, 3, 4, 5, 6]);
        let random = rank_row(&values, TiePolicy::Random, &mut rng);
        assert!(is_permutation(&random), "not a permutation: {random:?}");
    }

    #[test]
    // Purpose
    // -------
    // Random tie-breaking only reorders tied entries.
    //
    // Given
    // -----
    // - Row [3.0, 1.0, 1.0, 0.0] under many seeds.
    //
    // Expect
    // ------
    // - Columns 0 and 3 always get ranks 4 and 1; columns 1 and 2 share {2, 3}.
    // - Both orders of the tied pair appear across seeds.
    fn random_policy_only_permutes_ties() {
        let values = [3.0, 1.0, 1.0, 0.0];
        let mut seen_swapped = false;
        let mut seen_straight = false;
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let ranks = rank_row(&values, TiePolicy::Random, &mut rng);
            assert_eq!(ranks[0], 4);
            assert_eq!(ranks[3], 1);
            match (ranks[1], ranks[2]) {
                (2, 3) => seen_straight = true,
                (3, 2) => seen_swapped = true,
                other => panic!("tied pair got ranks {other:?}"),
            }
        }
        assert!(seen_swapped && seen_straight);
    }

    #[test]
    // Purpose
    // -------
    // The rank matrix leaves missing cells and dropped rows at rank 0.
    //
    // Given
    // -----
    // - A 3 x 3 matrix whose row 1 is fully missing and row 2 misses one cell.
    //
    // Expect
    // ------
    // - Row 0 is [1, 3, 2]; row 1 is zeros; row 2 is [2, 0, 1].
    // - Counts are [3, 0, 2].
    fn rank_matrix_marks_unranked_cells_with_zero() {
        // Arrange
        let data = array![
            [0.1, 0.9, 0.5],
            [f64::NAN, f64::NAN, f64::NAN],
            [0.7, f64::NAN, -0.3]
        ];
        let opts = TransformOptions::default();
        let mask = MissingMask::from_matrix(data.view(), opts.min_valid_per_row);

        // Act
        let ranks = RankMatrix::from_data(data.view(), &mask, &opts);

        // Assert
        assert_eq!(ranks.ranks(), array![[1, 3, 2], [0, 0, 0], [2, 0, 1]]);
        assert_eq!(ranks.counts(), &[3, 0, 2]);
        assert_eq!(ranks.contributing_rows(), 2);
        assert_eq!(ranks.n_locations(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Random ranking of a whole matrix is reproducible for a fixed seed.
    //
    // Given
    // -----
    // - An 8 x 5 matrix made of ties, ranked twice with seed 123.
    //
    // Expect
    // ------
    // - Identical rank matrices.
    fn random_rank_matrix_is_reproducible_with_seed() {
        let data = Array2::from_shape_fn((8, 5), |(i, k)| ((i + k) % 2) as f64);
        let opts = TransformOptions::random(Some(123));
        let mask = MissingMask::from_matrix(data.view(), opts.min_valid_per_row);
        let first = RankMatrix::from_data(data.view(), &mask, &opts);
        let second = RankMatrix::from_data(data.view(), &mask, &opts);
        assert_eq!(first, second);
    }
}
