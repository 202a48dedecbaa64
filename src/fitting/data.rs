//! fitting::data — observations and optional weights of a Qrms fit.
//!
//! Purpose
//! -------
//! Hold the fixed inputs of a fit, namely the sampling locations `x_k`, the
//! observation matrix `y_ik` (repetitions × locations) and optional residual
//! weights. Then turn a model prediction into the residual matrix the
//! rank-order transform consumes.
//!
//! Key behaviors
//! -------------
//! - [`FitData::new`] validates shapes and values once, before any
//!   optimization starts.
//! - [`FitData::residuals`] forms `(y_ik − f(x_k; ξ)) · w` and propagates
//!   missing observations as `NaN`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `x.len() == y.ncols() == n_s ≥ 2`, and `x` is finite. Column order is
//!   the partition axis of the transform.
//! - `y` may contain `NaN` (missing) but never ±∞.
//! - Weights are finite and strictly positive: a weighted residual keeps
//!   its sign and a non-zero residual never becomes zero.
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::{
    fitting::errors::{FitError, FitResult},
    transform::errors::TransformError,
};

/// Residual weights, e.g. `1/σ`.
///
/// - `PerLocation`: length `n_s`, broadcast across repetitions.
/// - `PerEntry`: shape `(n_r, n_s)`, one weight per observation.
#[derive(Debug, Clone, PartialEq)]
pub enum Weights {
    PerLocation(Array1<f64>),
    PerEntry(Array2<f64>),
}

impl Weights {
    /// Weight applied to entry `(i, k)`.
    #[inline]
    fn at(&self, i: usize, k: usize) -> f64 {
        match self {
            Weights::PerLocation(w) => w[k],
            Weights::PerEntry(w) => w[[i, k]],
        }
    }

    fn validate(&self, n_r: usize, n_s: usize) -> FitResult<()> {
        let values: Vec<f64> = match self {
            Weights::PerLocation(w) => {
                if w.len() != n_s {
                    return Err(FitError::WeightLengthMismatch { expected: n_s, found: w.len() });
                }
                w.to_vec()
            }
            Weights::PerEntry(w) => {
                if w.dim() != (n_r, n_s) {
                    return Err(FitError::WeightShapeMismatch {
                        expected: (n_r, n_s),
                        found: w.dim(),
                    });
                }
                w.iter().copied().collect()
            }
        };
        for (index, value) in values.into_iter().enumerate() {
            if !value.is_finite() {
                return Err(FitError::InvalidWeight {
                    index,
                    value,
                    reason: "Weights must be finite.",
                });
            }
            if value <= 0.0 {
                return Err(FitError::InvalidWeight {
                    index,
                    value,
                    reason: "Weights must be strictly positive.",
                });
            }
        }
        Ok(())
    }
}

/// FitData — sampling locations, observations and optional weights.
#[derive(Debug, Clone, PartialEq)]
pub struct FitData {
    x: Array1<f64>,
    y: Array2<f64>,
    weights: Option<Weights>,
}

impl FitData {
    /// Construct validated fit data.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `Array1<f64>`, sampling locations in partition order.
    /// - `y`: `Array2<f64>`, observations `(n_r, n_s)`; `NaN` marks missing.
    /// - `weights`: optional [`Weights`].
    ///
    /// Errors
    /// ------
    /// - `FitError::Transform(TooFewLocations)` if `n_s < 2`.
    /// - `FitError::DataShapeMismatch` if `x.len() != y.ncols()`.
    /// - `FitError::NonFiniteLocation` / `FitError::NonFiniteObservation`.
    /// - Weight length, shape and value errors.
    pub fn new(x: Array1<f64>, y: Array2<f64>, weights: Option<Weights>) -> FitResult<Self> {
        let (n_r, n_s) = y.dim();
        if x.len() != n_s {
            return Err(FitError::DataShapeMismatch { x_len: x.len(), y_cols: n_s });
        }
        if n_s < 2 {
            return Err(TransformError::TooFewLocations { n_s }.into());
        }
        if let Some((index, &value)) = x.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(FitError::NonFiniteLocation { index, value });
        }
        if let Some(((row, col), &value)) = y.indexed_iter().find(|(_, v)| v.is_infinite()) {
            return Err(FitError::NonFiniteObservation { row, col, value });
        }
        if let Some(w) = &weights {
            w.validate(n_r, n_s)?;
        }
        Ok(Self { x, y, weights })
    }

    pub fn x(&self) -> ArrayView1<'_, f64> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView2<'_, f64> {
        self.y.view()
    }

    pub fn weights(&self) -> Option<&Weights> {
        self.weights.as_ref()
    }

    /// Number of sampling locations, `n_s`.
    pub fn n_locations(&self) -> usize {
        self.x.len()
    }

    /// Number of repetitions, `n_r`.
    pub fn n_repetitions(&self) -> usize {
        self.y.nrows()
    }

    /// Weighted residuals of `prediction` against the observations.
    ///
    /// Missing observations stay `NaN`. A model value is only required to
    /// be finite at locations where at least one observation exists.
    ///
    /// Errors
    /// ------
    /// - `FitError::ModelOutputLengthMismatch` if `prediction.len() != n_s`.
    /// - `FitError::NonFiniteModelOutput` for a non-finite prediction that
    ///   meets an observation.
    /// - `FitError::NonFiniteResidual` if a residual overflows.
    pub fn residuals(&self, prediction: ArrayView1<f64>) -> FitResult<Array2<f64>> {
        let n_s = self.n_locations();
        if prediction.len() != n_s {
            return Err(FitError::ModelOutputLengthMismatch {
                expected: n_s,
                found: prediction.len(),
            });
        }
        let mut residuals = Array2::<f64>::from_elem(self.y.dim(), f64::NAN);
        for ((i, k), &y) in self.y.indexed_iter() {
            if y.is_nan() {
                continue;
            }
            let model = prediction[k];
            if !model.is_finite() {
                return Err(FitError::NonFiniteModelOutput { index: k, value: model });
            }
            let weight = self.weights.as_ref().map_or(1.0, |w| w.at(i, k));
            let r = (y - model) * weight;
            if !r.is_finite() {
                return Err(FitError::NonFiniteResidual { row: i, col: k, value: r });
            }
            residuals[[i, k]] = r;
        }
        Ok(residuals)
    }
}
