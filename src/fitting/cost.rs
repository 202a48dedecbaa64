//! fitting::cost — Qrms as the cost of a model fit.
//!
//! Purpose
//! -------
//! Bind a [`Model`], its [`FitData`] and the [`TransformOptions`] into one
//! value whose [`Objective::cost`] is `Qrms(ξ)`: the rank-order signal
//! left in the residuals of the model at parameters `ξ`.
//!
//! Key behaviors
//! -------------
//! - Every evaluation is a pure function of `(ξ, data, options)`. The
//!   model is evaluated at each `x_k`, residuals are formed, and the
//!   transform pipeline runs from scratch.
//! - Besides the scalar cost, [`QrmsCost::outcome`] and
//!   [`QrmsCost::q_matrix`] expose every intermediate at a given `ξ` for
//!   diagnostics.
//!
//! Invariants & assumptions
//! ------------------------
//! - `QrmsCost<M>` is `Send + Sync` whenever `M` is; it holds no interior
//!   mutability, so concurrent evaluations at different `ξ` never interact.
//! - With `TiePolicy::Random` and no seed the cost surface is stochastic;
//!   within one evaluation each row still draws exactly one tie permutation.
//! - The surface is piecewise constant in `ξ` (ranks change in jumps), so
//!   derivative-free minimizers are the natural drivers.
//!
//! Downstream usage
//! ----------------
//! - Pass a `QrmsCost` to [`minimize`](crate::fitting::api::minimize), or
//!   call [`Objective::cost`] from any external minimizer.
use log::trace;
use ndarray::Array2;

use crate::{
    fitting::{
        data::FitData,
        errors::{FitError, FitResult},
        traits::{Model, Objective},
        types::{Cost, Theta},
        validation::validate_theta,
    },
    transform::{
        options::TransformOptions,
        pipeline::{TransformOutcome, data_to_q_matrix},
    },
};

/// QrmsCost — rank-order fit cost of a model against fixed data.
#[derive(Debug, Clone)]
pub struct QrmsCost<M> {
    model: M,
    data: FitData,
    options: TransformOptions,
}

impl<M: Model> QrmsCost<M> {
    pub fn new(model: M, data: FitData, options: TransformOptions) -> Self {
        Self { model, data, options }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn data(&self) -> &FitData {
        &self.data
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Weighted residual matrix `(n_r, n_s)` at `theta`; missing entries are `NaN`.
    ///
    /// Errors
    /// ------
    /// - `FitError::ParamLengthMismatch` if the model declares a parameter
    ///   count that `theta` does not match.
    /// - Model-output and residual errors from [`FitData::residuals`].
    pub fn residuals(&self, theta: &Theta) -> FitResult<Array2<f64>> {
        if let Some(expected) = self.model.n_params() {
            if theta.len() != expected {
                return Err(FitError::ParamLengthMismatch { expected, found: theta.len() });
            }
        }
        let prediction = self.model.predict(self.data.x(), theta);
        self.data.residuals(prediction.view())
    }

    /// Full transform of the residuals at `theta`.
    pub fn outcome(&self, theta: &Theta) -> FitResult<TransformOutcome> {
        let residuals = self.residuals(theta)?;
        Ok(data_to_q_matrix(residuals.view(), &self.options)?)
    }

    /// Q matrix of the residuals at `theta`, shape `(n_s − 1, n_s − 1)`.
    pub fn q_matrix(&self, theta: &Theta) -> FitResult<Array2<f64>> {
        self.outcome(theta).map(TransformOutcome::into_q)
    }
}

impl<M: Model> Objective for QrmsCost<M> {
    fn cost(&self, theta: &Theta) -> FitResult<Cost> {
        let out = self.outcome(theta)?;
        trace!("Qrms = {:.6e} ({} contributing rows)", out.q_rms(), out.contributing_rows());
        Ok(out.q_rms())
    }

    fn check(&self, theta: &Theta) -> FitResult<()> {
        validate_theta(theta)?;
        if let Some(expected) = self.model.n_params() {
            if theta.len() != expected {
                return Err(FitError::ParamLengthMismatch { expected, found: theta.len() });
            }
        }
        Ok(())
    }
}
