//! transform::validation — shared input guards for the rank-order pipeline.
//!
//! Purpose
//! -------
//! Centralize the cheap preconditions of the transform so they are checked
//! once, before any ranking or prefix-sum work, with consistent errors.
//!
//! Key behaviors
//! -------------
//! - [`validate_data_matrix`] guards the residual / data matrix: at least two
//!   sampling locations and no ±∞ entries (`NaN` marks a missing entry and
//!   is accepted).
//! - [`validate_population`] guards a population matrix handed directly to
//!   the Q engine: square, at least 2 × 2, finite, and a positive repetition
//!   count.
//!
//! Conventions
//! -----------
//! - Validation never allocates beyond error construction and never panics.
//! - The "fewer than two contributing rows" check depends on the mask and
//!   lives in the pipeline, not here.
use ndarray::ArrayView2;

use crate::transform::errors::{TransformError, TransformResult};

/// Validate a data or residual matrix of shape `(n_r, n_s)`.
///
/// Parameters
/// ----------
/// - `data`: `ArrayView2<f64>`
///   Rows are repetitions, columns are sampling locations. `NaN` entries are
///   treated as missing.
///
/// Errors
/// ------
/// - `TransformError::TooFewLocations` when `n_s < 2`.
/// - `TransformError::NonFiniteValue` for the first ±∞ entry in row-major
///   order.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rank_order::transform::validation::validate_data_matrix;
/// let data = array![[0.1, f64::NAN, 0.3], [0.2, 0.1, 0.0]];
/// assert!(validate_data_matrix(data.view()).is_ok());
///
/// let bad = array![[0.1, f64::INFINITY]];
/// assert!(validate_data_matrix(bad.view()).is_err());
/// ```
pub fn validate_data_matrix(data: ArrayView2<f64>) -> TransformResult<()> {
    let n_s = data.ncols();
    if n_s < 2 {
        return Err(TransformError::TooFewLocations { n_s });
    }
    for ((row, col), &value) in data.indexed_iter() {
        if value.is_infinite() {
            return Err(TransformError::NonFiniteValue { row, col, value });
        }
    }
    Ok(())
}

/// Validate a population matrix and its repetition count for the Q engine.
///
/// # Errors
/// - [`TransformError::NonSquarePopulation`] if `rows != cols`.
/// - [`TransformError::TooFewLocations`] if the matrix is smaller than 2 × 2.
/// - [`TransformError::NonFiniteValue`] for any `NaN` or ±∞ entry.
/// - [`TransformError::InvalidRepetitions`] if `n_r == 0`.
pub fn validate_population(population: ArrayView2<f64>, n_r: usize) -> TransformResult<()> {
    let (rows, cols) = population.dim();
    if rows != cols {
        return Err(TransformError::NonSquarePopulation { rows, cols });
    }
    if rows < 2 {
        return Err(TransformError::TooFewLocations { n_s: rows });
    }
    for ((row, col), &value) in population.indexed_iter() {
        if !value.is_finite() {
            return Err(TransformError::NonFiniteValue { row, col, value });
        }
    }
    if n_r == 0 {
        return Err(TransformError::InvalidRepetitions);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover every branch of both validators plus a success path.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Missing entries (NaN) pass validation; ±∞ does not.
    //
    // Given
    // -----
    // - A 2 x 3 matrix with one NaN, and the same matrix with one -∞.
    //
    // Expect
    // ------
    // - The NaN matrix is accepted.
    // - The -∞ matrix fails with its position.
    fn validate_data_matrix_accepts_nan_rejects_infinity() {
        // Arrange
        let ok = array![[1.0, f64::NAN, 3.0], [0.5, 0.2, 0.1]];
        let mut bad = ok.clone();
        bad[[1, 2]] = f64::NEG_INFINITY;

        // Act & Assert
        assert!(validate_data_matrix(ok.view()).is_ok());
        assert_eq!(
            validate_data_matrix(bad.view()),
            Err(TransformError::NonFiniteValue { row: 1, col: 2, value: f64::NEG_INFINITY })
        );
    }

    #[test]
    // Purpose
    // -------
    // A single sampling location has no partition point.
    //
    // Given
    // -----
    // - A 4 x 1 matrix.
    //
    // Expect
    // ------
    // - `TooFewLocations { n_s: 1 }`.
    fn validate_data_matrix_rejects_single_location() {
        let data = Array2::<f64>::zeros((4, 1));
        assert_eq!(
            validate_data_matrix(data.view()),
            Err(TransformError::TooFewLocations { n_s: 1 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Each population guard fires on its own violation.
    //
    // Given
    // -----
    // - A 2 x 3 matrix, a 1 x 1 matrix, a matrix holding NaN, and a valid
    //   matrix with `n_r = 0`.
    //
    // Expect
    // ------
    // - `NonSquarePopulation`, `TooFewLocations`, `NonFiniteValue` and
    //   `InvalidRepetitions` respectively.
    fn validate_population_covers_all_branches() {
        let non_square = Array2::<f64>::zeros((2, 3));
        assert_eq!(
            validate_population(non_square.view(), 1),
            Err(TransformError::NonSquarePopulation { rows: 2, cols: 3 })
        );

        let tiny = Array2::<f64>::zeros((1, 1));
        assert_eq!(
            validate_population(tiny.view(), 1),
            Err(TransformError::TooFewLocations { n_s: 1 })
        );

        let nan = array![[1.0, f64::NAN], [0.0, 1.0]];
        assert!(matches!(
            validate_population(nan.view(), 1),
            Err(TransformError::NonFiniteValue { row: 0, col: 1, .. })
        ));

        let fine = Array2::<f64>::eye(3);
        assert_eq!(validate_population(fine.view(), 0), Err(TransformError::InvalidRepetitions));
        assert!(validate_population(fine.view(), 1).is_ok());
    }
}
