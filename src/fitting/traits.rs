//! fitting::traits — model and objective seams, options and outcome.
//!
//! Purpose
//! -------
//! Define the two collaborator interfaces of a Qrms fit, the model
//! `(x, ξ) → y` and the scalar objective `ξ → cost`, together with the
//! optimizer configuration and its normalized result.
//!
//! Key behaviors
//! -------------
//! - [`Model`] is implemented automatically for any `Fn(f64, &Theta) -> f64`,
//!   so closures work as models. Types may override [`Model::predict`] to
//!   vectorize over the sampling locations.
//! - [`Objective`] is the single-argument, single-scalar capability handed to
//!   a minimizer. [`QrmsCost`](crate::fitting::cost::QrmsCost) is the built-in
//!   implementation; any other minimizer can drive it directly.
//! - [`FitOptions`] / [`Tolerances`] are validated data carriers;
//!   [`FitOutcome`] normalizes argmin's final state.
//!
//! Invariants & assumptions
//! ------------------------
//! - `Objective::cost` takes `&self` and must not mutate shared state, so
//!   concurrent evaluations at different parameters are independent.

use argmin::core::{TerminationReason, TerminationStatus};
use ndarray::{Array1, ArrayView1};

use crate::fitting::{
    errors::{FitError, FitResult},
    types::{Cost, DEFAULT_INITIAL_STEP, DEFAULT_MAX_ITER, DEFAULT_SD_TOL, FnEvalMap, Theta},
    validation::{
        validate_theta, validate_theta_hat, validate_value, verify_initial_step, verify_max_iter,
        verify_sd_tol,
    },
};

/// User model `y = f(x; ξ)` evaluated at the sampling locations.
///
/// Required:
/// - `value(x, theta) -> f64`: model prediction at one location.
///
/// Optional:
/// - `predict(xs, theta) -> Array1<f64>`: predictions at every location.
///   Defaults to mapping `value` over `xs`.
/// - `n_params() -> Option<usize>`: expected length of `theta`, checked before
///   every evaluation when known.
pub trait Model {
    fn value(&self, x: f64, theta: &Theta) -> f64;

    fn predict(&self, xs: ArrayView1<f64>, theta: &Theta) -> Array1<f64> {
        xs.mapv(|x| self.value(x, theta))
    }

    fn n_params(&self) -> Option<usize> {
        None
    }
}

impl<F> Model for F
where
    F: Fn(f64, &Theta) -> f64,
{
    fn value(&self, x: f64, theta: &Theta) -> f64 {
        self(x, theta)
    }
}

/// Scalar objective minimized over `ξ`.
///
/// Required:
/// - `cost(&Theta) -> FitResult<Cost>`: evaluate the objective.
///
/// Optional:
/// - `check(&Theta) -> FitResult<()>`: reject an obviously invalid starting
///   point before optimization. Defaults to "non-empty and finite".
pub trait Objective {
    fn cost(&self, theta: &Theta) -> FitResult<Cost>;

    fn check(&self, theta: &Theta) -> FitResult<()> {
        validate_theta(theta)
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `sd_tol`: terminate when the standard deviation of the costs at the
///   simplex vertices falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Either field may be `None` but **at least one** must be provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub sd_tol: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`FitError::NoTolerancesProvided`] if both are `None`.
    /// - [`FitError::InvalidSdTol`] for non-finite or non-positive tolerances.
    /// - [`FitError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(sd_tol: Option<f64>, max_iter: Option<usize>) -> FitResult<Self> {
        if sd_tol.is_none() && max_iter.is_none() {
            return Err(FitError::NoTolerancesProvided);
        }
        verify_sd_tol(sd_tol)?;
        verify_max_iter(max_iter)?;
        Ok(Self { sd_tol, max_iter })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { sd_tol: Some(DEFAULT_SD_TOL), max_iter: Some(DEFAULT_MAX_ITER) }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — stopping rules.
/// - `initial_step: f64` — relative step per coordinate for the initial
///   simplex (coordinates at zero use a fixed absolute step instead).
/// - `verbose: bool` — if `true`, attaches an observer (behind the
///   `obs_slog` feature) and logs the initial cost.
///
/// Default: `sd_tol = 1e-8`, `max_iter = 2000`, `initial_step = 0.05`,
/// `verbose = false`.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub tols: Tolerances,
    pub initial_step: f64,
    pub verbose: bool,
}

impl FitOptions {
    /// Create a new set of optimizer options.
    ///
    /// # Errors
    /// - [`FitError::InvalidInitialStep`] for a non-finite or non-positive step.
    pub fn new(tols: Tolerances, initial_step: f64, verbose: bool) -> FitResult<Self> {
        verify_initial_step(initial_step)?;
        Ok(Self { tols, initial_step, verbose })
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self { tols: Tolerances::default(), initial_step: DEFAULT_INITIAL_STEP, verbose: false }
    }
}

/// Canonical result returned by [`minimize`](crate::fitting::api::minimize).
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: objective at `theta_hat` (the best Qrms).
/// - `converged`: `true` when the solver met its convergence criterion or a
///   target cost; `false` for iteration caps, interrupts and timeouts.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by argmin.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
}

impl FitOutcome {
    /// Build a validated [`FitOutcome`] from raw solver state.
    ///
    /// # Errors
    /// - Propagates validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus,
        iterations: u64, fn_evals: FnEvalMap,
    ) -> FitResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(reason) => {
                let converged = matches!(
                    reason,
                    TerminationReason::SolverConverged | TerminationReason::TargetCostReached
                );
                (converged, format!("{reason:?}"))
            }
        };
        Ok(Self { theta_hat, value, converged, status, iterations: iterations as usize, fn_evals })
    }
}
