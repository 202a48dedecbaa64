//! transform::pipeline — the rank-order transform end to end.
//!
//! Purpose
//! -------
//! Compose validation, masking, ranking, population counting, the fast Q
//! engine and the rms reduction into single calls over a data or residual
//! matrix.
//!
//! Key behaviors
//! -------------
//! - [`data_to_q_matrix`] returns a full [`TransformOutcome`] (ranks,
//!   population, Q, Qrms, row bookkeeping) for inspection.
//! - [`residual_signal`] returns only `Qrms`, the scalar used as a fit cost.
//! - [`rank_matrix`] stops after ranking, for callers that want the
//!   intermediate matrices one at a time.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every call recomputes everything from its arguments; nothing is
//!   cached or shared between calls.
//! - Rows with fewer than `min_valid_per_row` observed entries are dropped
//!   and reported through `dropped_rows` and a `debug!` record. Fewer than
//!   two contributing rows is an error, because Q is undefined.
//! - Q is normalized by the number of *contributing* rows.
//!
//! Downstream usage
//! ----------------
//! - `fitting::QrmsCost` feeds model residuals through [`data_to_q_matrix`]
//!   once per optimizer evaluation.
//! - The universal transform of raw data (no model) is the same call on the
//!   data matrix itself.
use log::debug;
use ndarray::{Array2, ArrayView2};

use crate::transform::{
    errors::{TransformError, TransformResult},
    mask::MissingMask,
    options::TransformOptions,
    population::PopulationMatrix,
    q_matrix::q_matrix,
    qrms::q_rms,
    ranking::RankMatrix,
    validation::validate_data_matrix,
};

/// TransformOutcome — every intermediate of one transform run.
///
/// Fields
/// ------
/// - `ranks`: [`RankMatrix`], shape `(n_r, n_s)`.
/// - `population`: [`PopulationMatrix`], shape `(n_s, n_s)`.
/// - `q`: Q matrix, shape `(n_s − 1, n_s − 1)`.
/// - `q_rms`: root-mean-square of `q`, finite and non-negative.
/// - `dropped_rows`: rows excluded by the mask.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutcome {
    ranks: RankMatrix,
    population: PopulationMatrix,
    q: Array2<f64>,
    q_rms: f64,
    dropped_rows: usize,
}

impl TransformOutcome {
    pub fn ranks(&self) -> &RankMatrix {
        &self.ranks
    }

    pub fn population(&self) -> &PopulationMatrix {
        &self.population
    }

    pub fn q(&self) -> ArrayView2<'_, f64> {
        self.q.view()
    }

    /// Consume the outcome, keeping only Q.
    pub fn into_q(self) -> Array2<f64> {
        self.q
    }

    pub fn q_rms(&self) -> f64 {
        self.q_rms
    }

    /// Rows that produced a ranking.
    pub fn contributing_rows(&self) -> usize {
        self.population.repetitions()
    }

    /// Rows excluded for having too few observed entries.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }
}

/// Validate, mask and rank `data`.
///
/// # Errors
/// - `TooFewLocations` / `NonFiniteValue` from validation.
/// - `TooFewContributingRows` when fewer than two rows survive the mask.
pub fn rank_matrix(data: ArrayView2<f64>, opts: &TransformOptions) -> TransformResult<RankMatrix> {
    validate_data_matrix(data)?;
    let mask = MissingMask::from_matrix(data, opts.min_valid_per_row);
    let contributing = mask.contributing_rows();
    if mask.dropped_rows() > 0 {
        debug!(
            "rank-order mask dropped {} of {} rows (fewer than {} observed entries); {} contribute",
            mask.dropped_rows(),
            mask.n_rows(),
            opts.min_valid_per_row,
            contributing
        );
    }
    if contributing < 2 {
        return Err(TransformError::TooFewContributingRows { found: contributing });
    }
    Ok(RankMatrix::from_data(data, &mask, opts))
}

/// Run the full rank-order transform on a data or residual matrix.
///
/// Parameters
/// ----------
/// - `data`: `ArrayView2<f64>`
///   Shape `(n_r, n_s)`: repetitions × sampling locations, in location
///   order. `NaN` marks a missing entry.
/// - `opts`: [`TransformOptions`]
///   Tie policy, seed and row-dropping threshold.
///
/// Returns
/// -------
/// `TransformResult<TransformOutcome>` with all intermediate matrices.
///
/// Errors
/// ------
/// - `TransformError::TooFewLocations` if `n_s < 2`.
/// - `TransformError::NonFiniteValue` for ±∞ entries.
/// - `TransformError::TooFewContributingRows` if fewer than two rows have
///   at least `min_valid_per_row` observed entries.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rank_order::transform::{pipeline::data_to_q_matrix, options::TransformOptions};
/// let residuals = array![
///     [0.4, -0.1, 0.9, 0.2],
///     [1.5, 0.3, -0.7, 0.0],
///     [-0.2, 0.8, 0.1, 0.6],
/// ];
/// let out = data_to_q_matrix(residuals.view(), &TransformOptions::default()).unwrap();
/// assert_eq!(out.q().dim(), (3, 3));
/// assert!(out.q_rms().is_finite() && out.q_rms() >= 0.0);
/// ```
pub fn data_to_q_matrix(
    data: ArrayView2<f64>, opts: &TransformOptions,
) -> TransformResult<TransformOutcome> {
    let ranks = rank_matrix(data, opts)?;
    let dropped_rows = data.nrows() - ranks.contributing_rows();
    let population = PopulationMatrix::from_ranks(&ranks);
    let q = q_matrix(population.to_f64().view(), population.repetitions())?;
    let q_rms = q_rms(q.view());
    Ok(TransformOutcome { ranks, population, q, q_rms, dropped_rows })
}

/// Qrms of a residual matrix: the scalar signal content.
///
/// Same contract and errors as [`data_to_q_matrix`].
pub fn residual_signal(residuals: ArrayView2<f64>, opts: &TransformOptions) -> TransformResult<f64> {
    data_to_q_matrix(residuals, opts).map(|out| out.q_rms())
}
