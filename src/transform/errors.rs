//! transform::errors — error surface of the rank-order transform.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by every stage of the
//! rank-order pipeline (mask, ranking, population matrix, Q engine), together
//! with a conversion layer to Python exceptions for PyO3-based bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`TransformResult`] and [`TransformError`] as the canonical result
//!   and error types for the transform.
//! - Attach human-readable `Display` messages to each variant, phrased in
//!   terms of the violated domain constraint.
//! - Implement `From<TransformError> for PyErr` so Python callers receive a
//!   `ValueError` carrying the Rust message.
//!
//! Invariants & assumptions
//! ------------------------
//! - Missing observations (`NaN`) in a data matrix are *not* errors; they
//!   are handled by the mask. There, only ±∞ entries are reported as
//!   [`TransformError::NonFiniteValue`]. A population matrix has no missing
//!   marker, so `NaN` in it is reported as well.
//! - Rows dropped for having too few valid entries are not errors either;
//!   only a matrix with fewer than two contributing rows overall is.
//! - `TransformError` values are small, `Clone` and `PartialEq`, so tests can
//!   match on them directly.
//!
//! Testing notes
//! -------------
//! - Unit tests below check that each variant's `Display` message embeds
//!   its payload.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// TransformError — failure modes of the rank-order transform.
///
/// Variants
/// --------
/// - `TooFewLocations { n_s }`
///   Fewer than two sampling locations; no partition point exists.
/// - `NonFiniteValue { row, col, value }`
///   A data entry is ±∞ (`NaN` there means "missing"), or a population
///   entry is `NaN` or ±∞.
/// - `TooFewContributingRows { found }`
///   After masking, fewer than two repetitions carry a usable ranking.
/// - `NonSquarePopulation { rows, cols }`
///   A population matrix handed to the Q engine is not square.
/// - `InvalidRepetitions`
///   The repetition count used to normalize Q is zero.
/// - `InvalidMinValid { value }`
///   `min_valid_per_row` is below two.
/// - `InvalidTiePolicy { name }`
///   An unknown tie policy name was parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    // ---- Shape ----
    TooFewLocations { n_s: usize },

    // ---- Values ----
    NonFiniteValue { row: usize, col: usize, value: f64 },

    // ---- Degenerate inputs ----
    TooFewContributingRows { found: usize },
    NonSquarePopulation { rows: usize, cols: usize },
    InvalidRepetitions,

    // ---- Options ----
    InvalidMinValid { value: usize },
    InvalidTiePolicy { name: String },
}

impl std::error::Error for TransformError {}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformError::TooFewLocations { n_s } => write!(
                f,
                "Rank-order transform is undefined for {n_s} sampling location(s); need at least 2."
            ),
            TransformError::NonFiniteValue { row, col, value } => write!(
                f,
                "Non-finite value {value} at ({row}, {col}). Use NaN to mark missing entries."
            ),
            TransformError::TooFewContributingRows { found } => write!(
                f,
                "Rank-order transform is undefined with {found} contributing repetition(s); need at least 2."
            ),
            TransformError::NonSquarePopulation { rows, cols } => {
                write!(f, "Population matrix must be square, found {rows} x {cols}")
            }
            TransformError::InvalidRepetitions => {
                write!(f, "Number of repetitions must be positive.")
            }
            TransformError::InvalidMinValid { value } => {
                write!(f, "Invalid min_valid_per_row {value}: must be at least 2.")
            }
            TransformError::InvalidTiePolicy { name } => write!(
                f,
                "Invalid tie policy '{name}': valid options are case insensitive 'ordinal' or 'random'."
            ),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<TransformError> for PyErr {
    fn from(err: TransformError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` messages embedding their payloads.
    //
    // They intentionally DO NOT cover:
    // - The PyO3 conversion, which needs the Python C API at link time.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The degenerate-size error names the offending location count.
    //
    // Given
    // -----
    // - `TooFewLocations { n_s: 1 }`.
    //
    // Expect
    // ------
    // - The message mentions "1" and "at least 2".
    fn too_few_locations_reports_count() {
        // Arrange
        let err = TransformError::TooFewLocations { n_s: 1 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains('1') && msg.contains("at least 2"), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Non-finite errors carry both the position and the value.
    //
    // Given
    // -----
    // - `NonFiniteValue` at (3, 7) holding +∞.
    //
    // Expect
    // ------
    // - The message contains "(3, 7)" and "inf".
    fn non_finite_value_reports_position_and_value() {
        // Arrange
        let err = TransformError::NonFiniteValue { row: 3, col: 7, value: f64::INFINITY };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("(3, 7)"), "Got: {msg}");
        assert!(msg.contains("inf"), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Unknown tie policy names are echoed back to the caller.
    //
    // Given
    // -----
    // - `InvalidTiePolicy { name: "dense" }`.
    //
    // Expect
    // ------
    // - The message contains "dense".
    fn invalid_tie_policy_echoes_name() {
        let err = TransformError::InvalidTiePolicy { name: "dense".to_string() };
        assert!(err.to_string().contains("dense"));
    }
}
