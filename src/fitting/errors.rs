//! fitting::errors — error surface of Qrms model fitting.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for everything above the
//! transform: fit data, model evaluation, optimizer options and the argmin
//! backend.
//!
//! Key behaviors
//! -------------
//! - [`FitError`] groups failures by layer: data, model output, options,
//!   optimizer outcome and argmin runtime.
//! - Transform failures are wrapped unchanged as [`FitError::Transform`].
//! - `From<argmin::core::Error>` first recovers a `FitError` raised inside a
//!   cost evaluation, then maps argmin's own error kinds variant by variant,
//!   and falls back to [`FitError::BackendError`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `NaN` observations are missing data, never errors. Non-finite *model
//!   output* is only an error where an observation exists to compare with.
//! - Finite residuals always give a finite cost. A non-finite residual is a
//!   modelling error and is reported, not masked.
//!
//! Conventions
//! -----------
//! - Messages name the violated constraint ("must be finite and > 0").
//! - At the Python boundary every variant becomes `ValueError`.

use argmin::core::{ArgminError, Error};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::transform::errors::TransformError;

/// Result alias for fitting operations.
pub type FitResult<T> = Result<T, FitError>;

#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    // ---- Fit data ----
    /// Number of sampling locations differs from the observation columns.
    DataShapeMismatch { x_len: usize, y_cols: usize },

    /// Sampling locations must be finite.
    NonFiniteLocation { index: usize, value: f64 },

    /// Observations may be NaN (missing) but not ±∞.
    NonFiniteObservation { row: usize, col: usize, value: f64 },

    /// Per-location weights have the wrong length.
    WeightLengthMismatch { expected: usize, found: usize },

    /// Per-entry weights have the wrong shape.
    WeightShapeMismatch { expected: (usize, usize), found: (usize, usize) },

    /// Weights must be finite and strictly positive.
    InvalidWeight { index: usize, value: f64, reason: &'static str },

    // ---- Model evaluation ----
    /// Model returned a prediction vector of the wrong length.
    ModelOutputLengthMismatch { expected: usize, found: usize },

    /// Model output is non-finite at an observed location.
    NonFiniteModelOutput { index: usize, value: f64 },

    /// Residual overflowed to a non-finite value.
    NonFiniteResidual { row: usize, col: usize, value: f64 },

    /// Parameter vector length does not match the model.
    ParamLengthMismatch { expected: usize, found: usize },

    /// Parameter vector is empty.
    EmptyTheta,

    /// Parameter entries must be finite.
    InvalidTheta { index: usize, value: f64, reason: &'static str },

    // ---- FitOptions ----
    /// Simplex standard-deviation tolerance must be finite and > 0.
    InvalidSdTol { tol: f64, reason: &'static str },

    /// Maximum iterations must be positive.
    InvalidMaxIter { max_iter: usize, reason: &'static str },

    /// At least one stopping rule must be provided.
    NoTolerancesProvided,

    /// Relative initial simplex step must be finite and > 0.
    InvalidInitialStep { step: f64, reason: &'static str },

    // ---- Cost function ----
    /// Objective returned a non-finite value.
    NonFiniteCost { value: f64 },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    /// Theta hat is missing.
    MissingThetaHat,

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter { text: String },
    /// Wrapper for argmin::NotImplemented
    NotImplemented { text: String },
    /// Wrapper for argmin::NotInitialized
    NotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated { text: String },
    /// Wrapper for argmin::CheckpointNotFound
    CheckPointNotFound { text: String },
    /// Wrapper for argmin::PotentialBug
    PotentialBug { text: String },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError { text: String },
    /// Wrapper for other argmin::Error types
    BackendError { text: String },

    // ---- Transform ----
    Transform(TransformError),
}

impl std::error::Error for FitError {}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Fit data ----
            FitError::DataShapeMismatch { x_len, y_cols } => write!(
                f,
                "Data shape mismatch: {x_len} sampling locations but observations have {y_cols} columns"
            ),
            FitError::NonFiniteLocation { index, value } => {
                write!(f, "Non-finite sampling location at index {index}: {value}")
            }
            FitError::NonFiniteObservation { row, col, value } => write!(
                f,
                "Non-finite observation {value} at ({row}, {col}). Use NaN to mark missing entries."
            ),
            FitError::WeightLengthMismatch { expected, found } => {
                write!(f, "Weight length mismatch: expected {expected}, found {found}")
            }
            FitError::WeightShapeMismatch { expected, found } => {
                write!(f, "Weight shape mismatch: expected {expected:?}, found {found:?}")
            }
            FitError::InvalidWeight { index, value, reason } => {
                write!(f, "Invalid weight at index {index}: {value}: {reason}")
            }

            // ---- Model evaluation ----
            FitError::ModelOutputLengthMismatch { expected, found } => {
                write!(f, "Model output length mismatch: expected {expected}, found {found}")
            }
            FitError::NonFiniteModelOutput { index, value } => {
                write!(f, "Non-finite model output at location {index}: {value}")
            }
            FitError::NonFiniteResidual { row, col, value } => {
                write!(f, "Non-finite residual {value} at ({row}, {col})")
            }
            FitError::ParamLengthMismatch { expected, found } => {
                write!(f, "Parameter length mismatch: expected {expected}, found {found}")
            }
            FitError::EmptyTheta => write!(f, "Parameter vector must not be empty"),
            FitError::InvalidTheta { index, value, reason } => {
                write!(f, "Invalid parameter at index {index}: {value}: {reason}")
            }

            // ---- FitOptions ----
            FitError::InvalidSdTol { tol, reason } => {
                write!(f, "Invalid simplex tolerance {tol}: {reason}")
            }
            FitError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            FitError::NoTolerancesProvided => write!(f, "No tolerances provided"),
            FitError::InvalidInitialStep { step, reason } => {
                write!(f, "Invalid initial simplex step {step}: {reason}")
            }

            // ---- Cost function ----
            FitError::NonFiniteCost { value } => write!(f, "Non-finite cost value: {value}"),

            // ---- Optimizer outcome ----
            FitError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            FitError::MissingThetaHat => write!(f, "Missing estimated parameters (theta hat)"),

            // ---- Argmin ----
            FitError::InvalidParameter { text } => write!(f, "Invalid parameter: {text}"),
            FitError::NotImplemented { text } => write!(f, "Not implemented: {text}"),
            FitError::NotInitialized { text } => write!(f, "Not initialized: {text}"),
            FitError::ConditionViolated { text } => write!(f, "Condition violated: {text}"),
            FitError::CheckPointNotFound { text } => write!(f, "Checkpoint not found: {text}"),
            FitError::PotentialBug { text } => write!(f, "Potential bug: {text}"),
            FitError::ImpossibleError { text } => write!(f, "Impossible error: {text}"),
            FitError::BackendError { text } => write!(f, "Backend error: {text}"),

            // ---- Transform ----
            FitError::Transform(err) => write!(f, "Transform error: {err}"),
        }
    }
}

impl From<Error> for FitError {
    fn from(original_err: Error) -> Self {
        // Errors raised by our own objective travel through argmin boxed.
        let original_err = match original_err.downcast::<FitError>() {
            Ok(fit_err) => return fit_err,
            Err(err) => err,
        };
        match original_err.downcast::<ArgminError>() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => FitError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => FitError::NotImplemented { text },
                ArgminError::NotInitialized { text } => FitError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => FitError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => FitError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => FitError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => FitError::ImpossibleError { text },
                other => FitError::BackendError { text: other.to_string() },
            },
            Err(err) => FitError::BackendError { text: err.to_string() },
        }
    }
}

impl From<TransformError> for FitError {
    fn from(err: TransformError) -> Self {
        FitError::Transform(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<FitError> for PyErr {
    fn from(err: FitError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
