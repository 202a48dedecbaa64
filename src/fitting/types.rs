//! fitting::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and the solver alias used by the fitting
//! driver so the rest of the code stays agnostic to `ndarray` and argmin
//! generics.
//!
//! Conventions
//! -----------
//! - `Theta` is the model parameter vector ξ, one entry per free parameter.
//! - `Cost` is the scalar Qrms, always finite and non-negative for the
//!   built-in objective.
//! - The default constants mirror the classic Nelder–Mead set-up: a 5 %
//!   relative step per coordinate, and a small absolute step where the
//!   coordinate is zero.
use argmin::solver::neldermead::NelderMead;
use ndarray::Array1;
use std::collections::HashMap;

/// Parameter vector `ξ` of the model being fitted.
pub type Theta = Array1<f64>;

/// Scalar objective value (Qrms for [`QrmsCost`](crate::fitting::cost::QrmsCost)).
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Nelder–Mead simplex solver specialized to this crate's numeric types.
pub type NelderMeadSolver = NelderMead<Theta, Cost>;

/// Default relative step used to build the initial simplex.
pub const DEFAULT_INITIAL_STEP: f64 = 0.05;

/// Absolute step for coordinates that start at exactly zero.
pub const ZERO_COORD_STEP: f64 = 0.00025;

/// Default stopping tolerance on the standard deviation of simplex costs.
pub const DEFAULT_SD_TOL: f64 = 1e-8;

/// Default cap on solver iterations.
pub const DEFAULT_MAX_ITER: usize = 2000;
