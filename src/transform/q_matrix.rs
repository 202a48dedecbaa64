//! transform::q_matrix — partition statistic Q of a population matrix.
//!
//! Purpose
//! -------
//! Compute `Q[j, k]` for every partition point of a population matrix `P`,
//! the quantity whose root-mean-square is the rank-order signal content
//! (Ierley & Kostinski, Phys. Rev. X 9, 031039).
//!
//! Key behaviors
//! -------------
//! - A partition point `(j, k)`, with `0 ≤ j, k ≤ n_s − 2`, cuts `P` after
//!   rank row `j` and location column `k` into four blocks:
//!
//!   ```text
//!   S2 = P[..=j, ..=k]    S1 = P[..=j, k+1..]     (low ranks)
//!   S3 = P[j+1.., ..=k]   S4 = P[j+1.., k+1..]    (high ranks)
//!   ```
//!
//!   and
//!
//!   ```text
//!   Q[j, k] = (n_s / n_r) · [ (ΣS2 + ΣS4) / (|S2| + |S4|)
//!                           − (ΣS1 + ΣS3) / (|S1| + |S3|) ]
//!   ```
//!
//!   where `|S|` is the number of cells of a block. Under the null model
//!   (ranks spread uniformly and independently over locations) the two
//!   diagonal and off-diagonal block means coincide and `Q` vanishes.
//! - [`q_matrix`] is the fast route: one (n_s + 1) × (n_s + 1) prefix table
//!   built by a row pass followed by a column pass, then every block sum in
//!   O(1) by inclusion–exclusion. Total O(n_s²) time and space.
//! - [`q_matrix_direct`] is the reference route: every block is summed
//!   cell by cell, O(n_s⁴) in total. It exists to test the fast route.
//!
//! Invariants & assumptions
//! ------------------------
//! - Both routes share [`partition_statistic`], so they differ only in how
//!   block sums are obtained. On integer populations (< 2⁵³ total) every
//!   block sum is exact and the routes agree bit-for-bit; on real-valued
//!   inputs they agree up to rounding.
//! - For 0 ≤ j, k ≤ n_s − 2 no block pair is empty. A zero cell count
//!   still yields a block mean of 0 rather than NaN.
//!
//! Testing notes
//! -------------
//! - Unit tests check a hand-computed 3 × 3 case, the uniform (null) case
//!   and fast/direct agreement on seeded random matrices with empty rows
//!   and columns. Property tests in `tests/` widen the equivalence check.
use ndarray::{Array2, ArrayView2, s};

use crate::transform::{errors::TransformResult, validation::validate_population};

/// Two-dimensional prefix table, `table[a, b] = Σ P[..a, ..b]`.
#[derive(Debug, Clone)]
struct PrefixTable {
    table: Array2<f64>,
    n: usize,
}

impl PrefixTable {
    fn new(population: ArrayView2<f64>) -> Self {
        let n = population.nrows();
        let mut table = Array2::<f64>::zeros((n + 1, n + 1));

        // Row pass: running sums along each rank row.
        for a in 0..n {
            let mut running = 0.0;
            for b in 0..n {
                running += population[[a, b]];
                table[[a + 1, b + 1]] = running;
            }
        }
        // Column pass: accumulate the row sums downwards.
        for b in 1..=n {
            for a in 1..=n {
                table[[a, b]] += table[[a - 1, b]];
            }
        }
        Self { table, n }
    }

    /// Block sums at a cut with `top` rank rows and `left` location columns.
    #[inline]
    fn block_sums(&self, top: usize, left: usize) -> BlockSums {
        let n = self.n;
        let t = &self.table;
        let s2 = t[[top, left]];
        let s1 = t[[top, n]] - s2;
        let s3 = t[[n, left]] - s2;
        let s4 = t[[n, n]] - t[[top, n]] - t[[n, left]] + s2;
        BlockSums { s1, s2, s3, s4 }
    }
}

/// Sums of the four blocks of a partition.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BlockSums {
    s1: f64,
    s2: f64,
    s3: f64,
    s4: f64,
}

/// Mean of a block union; an empty union has mean 0.
#[inline]
fn block_mean(sum: f64, cells: usize) -> f64 {
    if cells == 0 { 0.0 } else { sum / cells as f64 }
}

/// Combine the four block sums of the cut `(top, left)` into `Q`.
///
/// `top` and `left` are the row and column counts of the low-rank, left
/// block `S2`; `scale` is `n_s / n_r`.
#[inline]
fn partition_statistic(sums: BlockSums, n: usize, top: usize, left: usize, scale: f64) -> f64 {
    let bottom = n - top;
    let right = n - left;
    let diagonal = block_mean(sums.s2 + sums.s4, top * left + bottom * right);
    let off_diagonal = block_mean(sums.s1 + sums.s3, top * right + bottom * left);
    scale * (diagonal - off_diagonal)
}

/// Compute the Q matrix of `population` with the prefix-sum algorithm.
///
/// Parameters
/// ----------
/// - `population`: `ArrayView2<f64>`
///   Square `n_s × n_s` population matrix indexed `[rank - 1, location]`.
///   Real-valued inputs are accepted; counts are the usual case.
/// - `n_r`: `usize`
///   Number of contributing repetitions; normalizes Q.
///
/// Returns
/// -------
/// `TransformResult<Array2<f64>>`
///   Q of shape `(n_s − 1, n_s − 1)`; every entry is finite.
///
/// Errors
/// ------
/// - Propagates `validate_population` failures: non-square, smaller than
///   2 × 2, non-finite entries, or `n_r == 0`.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::Array2;
/// # use rank_order::transform::q_matrix::q_matrix;
/// // A perfectly dispersed population carries no signal.
/// let p = Array2::<f64>::ones((4, 4));
/// let q = q_matrix(p.view(), 4).unwrap();
/// assert!(q.iter().all(|&v| v == 0.0));
/// ```
pub fn q_matrix(population: ArrayView2<f64>, n_r: usize) -> TransformResult<Array2<f64>> {
    validate_population(population, n_r)?;
    let n = population.nrows();
    let scale = n as f64 / n_r as f64;
    let prefix = PrefixTable::new(population);

    let mut q = Array2::<f64>::zeros((n - 1, n - 1));
    for j in 0..n - 1 {
        for k in 0..n - 1 {
            let sums = prefix.block_sums(j + 1, k + 1);
            q[[j, k]] = partition_statistic(sums, n, j + 1, k + 1, scale);
        }
    }
    Ok(q)
}

/// Compute the Q matrix by summing every block directly.
///
/// Same contract and errors as [`q_matrix`], at O(n_s⁴) cost. Intended as
/// the reference for testing the fast route.
pub fn q_matrix_direct(population: ArrayView2<f64>, n_r: usize) -> TransformResult<Array2<f64>> {
    validate_population(population, n_r)?;
    let n = population.nrows();
    let scale = n as f64 / n_r as f64;

    let mut q = Array2::<f64>::zeros((n - 1, n - 1));
    for j in 0..n - 1 {
        for k in 0..n - 1 {
            let (top, left) = (j + 1, k + 1);
            let sums = BlockSums {
                s1: population.slice(s![..top, left..]).iter().sum(),
                s2: population.slice(s![..top, ..left]).iter().sum(),
                s3: population.slice(s![top.., ..left]).iter().sum(),
                s4: population.slice(s![top.., left..]).iter().sum(),
            };
            q[[j, k]] = partition_statistic(sums, n, top, left, scale);
        }
    }
    Ok(q)
}
