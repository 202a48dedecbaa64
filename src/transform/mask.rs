//! transform::mask — missing-data mask for residual matrices.
//!
//! Purpose
//! -------
//! Identify the observed entries of each repetition so that missing values
//! (`NaN`) never reach the ranker or the population counts.
//!
//! Key behaviors
//! -------------
//! - [`RowMask`] lists the valid column indices of one row, in column order.
//! - [`MissingMask`] holds one `RowMask` per repetition and decides which
//!   rows contribute: a row contributes when it has at least
//!   `min_valid_per_row` valid entries. Non-contributing rows are dropped,
//!   which is not an error.
//!
//! Invariants & assumptions
//! ------------------------
//! - Input has passed `validate_data_matrix`, so every entry is finite or
//!   `NaN`.
//! - `RowMask::valid_cols` is strictly increasing.
use ndarray::{ArrayView1, ArrayView2};

/// Valid (non-missing) column indices of a single row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowMask {
    valid_cols: Vec<usize>,
}

impl RowMask {
    /// Collect the indices of non-`NaN` entries of `row`.
    pub fn from_row(row: ArrayView1<f64>) -> Self {
        let valid_cols =
            row.iter().enumerate().filter(|(_, v)| !v.is_nan()).map(|(k, _)| k).collect();
        Self { valid_cols }
    }

    /// Valid column indices in ascending order.
    pub fn valid_cols(&self) -> &[usize] {
        &self.valid_cols
    }

    /// Number of valid entries, `m_i`.
    pub fn count(&self) -> usize {
        self.valid_cols.len()
    }

    /// Gather the valid values of `row` in column order.
    pub fn gather(&self, row: ArrayView1<f64>) -> Vec<f64> {
        self.valid_cols.iter().map(|&k| row[k]).collect()
    }
}

/// MissingMask — per-row validity metadata for a residual matrix.
///
/// Fields
/// ------
/// - `rows`: one [`RowMask`] per repetition.
/// - `contributing`: `contributing[i]` is `true` when row `i` has at least
///   `min_valid_per_row` valid entries.
///
/// Notes
/// -----
/// - Built once per transform invocation and consumed by the ranker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingMask {
    rows: Vec<RowMask>,
    contributing: Vec<bool>,
}

impl MissingMask {
    /// Build the mask of `data`, dropping rows with fewer than `min_valid`
    /// valid entries.
    pub fn from_matrix(data: ArrayView2<f64>, min_valid: usize) -> Self {
        let rows: Vec<RowMask> = data.outer_iter().map(RowMask::from_row).collect();
        let contributing = rows.iter().map(|m| m.count() >= min_valid).collect();
        Self { rows, contributing }
    }

    /// Per-row masks, one per repetition.
    pub fn rows(&self) -> &[RowMask] {
        &self.rows
    }

    /// Whether row `i` contributes to ranking and population counts.
    pub fn is_contributing(&self, i: usize) -> bool {
        self.contributing.get(i).copied().unwrap_or(false)
    }

    /// Number of rows that contribute.
    pub fn contributing_rows(&self) -> usize {
        self.contributing.iter().filter(|&&c| c).count()
    }

    /// Number of rows dropped for having too few valid entries.
    pub fn dropped_rows(&self) -> usize {
        self.rows.len() - self.contributing_rows()
    }

    /// Total number of repetitions, contributing or not.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }
}
