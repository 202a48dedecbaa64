//! fitting — Qrms as a regression cost and a derivative-free driver.
//!
//! Purpose
//! -------
//! Fit a model `y = f(x; ξ)` to repeated noisy observations by minimizing
//! the rank-order signal content `Qrms` of its residuals, instead of a
//! squared-error loss.
//!
//! Key behaviors
//! -------------
//! - [`FitData`] holds `x_k`, `y_ik` and optional [`Weights`], validated once.
//! - [`Model`] is the model collaborator; closures implement it directly.
//! - [`QrmsCost`] implements [`Objective`], the single-argument scalar cost
//!   any minimizer can call as a black box.
//! - [`minimize`] is one such minimizer: Nelder–Mead on argmin, returning a
//!   normalized [`FitOutcome`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Cost evaluations are pure functions of `ξ` and the fixed inputs; they
//!   may run concurrently.
//! - The Qrms surface is piecewise constant in `ξ`, so no gradient-based
//!   solver is offered.
//!
//! Conventions
//! -----------
//! - Errors surface as [`FitError`] via [`FitResult`]; transform failures
//!   are wrapped as `FitError::Transform`.
//! - Options are validated data carriers with `::new` constructors and
//!   `Default`.
//!
//! Downstream usage
//! ----------------
//! - Typical Rust code:
//!
//!   ```rust
//!   use rank_order::fitting::prelude::*;
//!   use rank_order::transform::TransformOptions;
//!   # use ndarray::{Array1, Array2};
//!   # let x = Array1::from_shape_fn(6, |k| k as f64);
//!   # let y = Array2::from_shape_fn((4, 6), |(i, k)| 2.0 * k as f64 + ((i + 2 * k) % 3) as f64);
//!
//!   let data = FitData::new(x, y, None)?;
//!   let cost = QrmsCost::new(|x: f64, t: &Theta| t[0] * x, data, TransformOptions::default());
//!   let out = minimize(&cost, Theta::from(vec![1.5]), &FitOptions::default())?;
//!   println!("slope = {}", out.theta_hat[0]);
//!   # Ok::<(), FitError>(())
//!   ```
//!
//! Testing notes
//! -------------
//! - Unit tests sit next to each module. End-to-end fits on synthetic
//!   hyperbola data live in `tests/integration_fit_pipeline.rs`.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod cost;
pub mod data;
pub mod errors;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::cost::QrmsCost;
pub use self::data::{FitData, Weights};
pub use self::errors::{FitError, FitResult};
pub use self::traits::{FitOptions, FitOutcome, Model, Objective, Tolerances};
pub use self::types::{Cost, FnEvalMap, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rank_order::fitting::prelude::*;
//
// to import the main fitting surface in a single line.

pub mod prelude {
    pub use super::api::minimize;
    pub use super::cost::QrmsCost;
    pub use super::data::{FitData, Weights};
    pub use super::errors::{FitError, FitResult};
    pub use super::traits::{FitOptions, FitOutcome, Model, Objective, Tolerances};
    pub use super::types::Theta;
}
