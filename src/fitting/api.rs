//! fitting::api — `minimize` entry point.
use log::info;

use crate::fitting::{
    adapter::ArgMinAdapter,
    builders::build_nelder_mead,
    errors::FitResult,
    run::run_nelder_mead,
    traits::{FitOptions, FitOutcome, Objective},
    types::Theta,
};

/// Minimize an objective (typically Qrms) with the Nelder–Mead simplex.
///
/// # Behavior
/// - Validates the initial guess via `objective.check(&theta0)`.
/// - Builds the initial simplex around `theta0` and the solver from `opts`.
/// - Wraps the objective in an [`ArgMinAdapter`] and calls
///   [`run_nelder_mead`], which applies the iteration cap and optional
///   observers and returns a [`FitOutcome`].
///
/// # Parameters
/// - `objective`: anything implementing [`Objective`], e.g.
///   [`QrmsCost`](crate::fitting::cost::QrmsCost).
/// - `theta0`: initial parameter vector.
/// - `opts`: optimizer options (tolerances, initial step, verbosity).
///
/// # Errors
/// - Propagates any error from `objective.check`.
/// - Propagates builder errors (invalid start, step or tolerance).
/// - Propagates runtime errors from the objective, e.g. non-finite
///   residuals or a degenerate transform.
///
/// # Example
/// ```rust
/// use ndarray::{Array1, Array2};
/// use rank_order::fitting::{FitData, FitOptions, QrmsCost, Theta, minimize};
/// use rank_order::transform::TransformOptions;
///
/// // y = 3 / (x + 1) plus a trend-free wiggle.
/// let x = Array1::from_shape_fn(12, |k| k as f64);
/// let y = Array2::from_shape_fn((10, 12), |(i, k)| {
///     3.0 / (k as f64 + 1.0) + 0.01 * (((7 * i + 5 * k) % 11) as f64 - 5.0)
/// });
/// let data = FitData::new(x, y, None)?;
/// let cost = QrmsCost::new(
///     |x: f64, theta: &Theta| theta[0] / (x + 1.0),
///     data,
///     TransformOptions::default(),
/// );
///
/// let out = minimize(&cost, Theta::from(vec![2.0]), &FitOptions::default())?;
/// assert!(out.value.is_finite());
/// # Ok::<(), rank_order::fitting::FitError>(())
/// ```
pub fn minimize<O: Objective>(
    objective: &O, theta0: Theta, opts: &FitOptions,
) -> FitResult<FitOutcome> {
    objective.check(&theta0)?;
    info!(
        "Qrms minimization: {} parameter(s), sd_tol = {:?}, max_iter = {:?}",
        theta0.len(),
        opts.tols.sd_tol,
        opts.tols.max_iter
    );
    let solver = build_nelder_mead(&theta0, opts)?;
    let problem = ArgMinAdapter::new(objective);
    let outcome = run_nelder_mead(&theta0, opts, problem, solver)?;
    info!(
        "Qrms minimization finished: status {}, {} iterations, best cost {:.6e}",
        outcome.status, outcome.iterations, outcome.value
    );
    Ok(outcome)
}
