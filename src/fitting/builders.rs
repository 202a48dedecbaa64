//! fitting::builders — initial simplex and Nelder–Mead construction.
//!
//! Purpose
//! -------
//! Turn a starting point and [`FitOptions`] into a configured
//! [`NelderMeadSolver`], leaving iteration limits to the runner.
//!
//! Conventions
//! -----------
//! - The initial simplex holds `θ₀` plus one vertex per coordinate `i`,
//!   where coordinate `i` is scaled by `1 + initial_step`, or set to
//!   [`ZERO_COORD_STEP`] when it is exactly zero.
use crate::fitting::{
    errors::FitResult,
    traits::FitOptions,
    types::{NelderMeadSolver, Theta, ZERO_COORD_STEP},
    validation::{validate_theta, verify_initial_step},
};

/// initial_simplex — `n + 1` vertices around `theta0`.
///
/// Parameters
/// ----------
/// - `theta0`: `&Theta`
///   Starting point, non-empty and finite.
/// - `step`: `f64`
///   Relative perturbation per coordinate, finite and > 0.
///
/// Returns
/// -------
/// `FitResult<Vec<Theta>>`
///   `theta0` first, then the perturbed vertices in coordinate order.
///
/// Errors
/// ------
/// - `FitError::EmptyTheta` / `FitError::InvalidTheta` for a bad start.
/// - `FitError::InvalidInitialStep` for a bad step.
pub fn initial_simplex(theta0: &Theta, step: f64) -> FitResult<Vec<Theta>> {
    validate_theta(theta0)?;
    verify_initial_step(step)?;
    let mut simplex = Vec::with_capacity(theta0.len() + 1);
    simplex.push(theta0.clone());
    for i in 0..theta0.len() {
        let mut vertex = theta0.clone();
        vertex[i] = if vertex[i] != 0.0 { vertex[i] * (1.0 + step) } else { ZERO_COORD_STEP };
        simplex.push(vertex);
    }
    Ok(simplex)
}

/// build_nelder_mead — construct the simplex solver for a run.
///
/// Consults `opts.initial_step` for the simplex and `opts.tols.sd_tol` for
/// the stopping rule. `max_iter` is applied by the runner.
///
/// Errors
/// ------
/// - Propagates [`initial_simplex`] errors.
/// - `FitError` (via `From<argmin::core::Error>`) if argmin rejects the
///   tolerance.
pub fn build_nelder_mead(theta0: &Theta, opts: &FitOptions) -> FitResult<NelderMeadSolver> {
    let solver = NelderMeadSolver::new(initial_simplex(theta0, opts.initial_step)?);
    configure_nelder_mead(solver, opts)
}

/// Apply the optional standard-deviation tolerance. When `None`, argmin's
/// default remains in effect.
fn configure_nelder_mead(
    mut solver: NelderMeadSolver, opts: &FitOptions,
) -> FitResult<NelderMeadSolver> {
    if let Some(tol) = opts.tols.sd_tol {
        solver = solver.with_sd_tolerance(tol)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitting::{errors::FitError, traits::Tolerances};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Vertex layout of the initial simplex, including zero coordinates.
    // - Solver construction with and without a tolerance.
    // - Error propagation for invalid starting points.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Each extra vertex perturbs exactly one coordinate.
    //
    // Given
    // -----
    // - θ₀ = [2, 0, -4], step 0.05.
    //
    // Expect
    // ------
    // - Vertices θ₀, [2.1, 0, -4], [2, 0.00025, -4], [2, 0, -4.2].
    fn simplex_perturbs_one_coordinate_per_vertex() {
        // Arrange
        let theta0 = array![2.0, 0.0, -4.0];

        // Act
        let simplex = initial_simplex(&theta0, 0.05).expect("simplex");

        // Assert
        assert_eq!(simplex.len(), 4);
        assert_eq!(simplex[0], theta0);
        assert!((simplex[1][0] - 2.1).abs() < 1e-12);
        assert_eq!(simplex[2], array![2.0, ZERO_COORD_STEP, -4.0]);
        assert!((simplex[3][2] + 4.2).abs() < 1e-12);
        assert_eq!(simplex[3][0], 2.0);
    }

    #[test]
    fn build_accepts_default_and_tolerance_free_options() {
        let theta0 = array![1.0];
        assert!(build_nelder_mead(&theta0, &FitOptions::default()).is_ok());
        let opts = FitOptions {
            tols: Tolerances { sd_tol: None, max_iter: Some(10) },
            ..FitOptions::default()
        };
        assert!(build_nelder_mead(&theta0, &opts).is_ok());
    }

    #[test]
    fn build_rejects_invalid_start() {
        let res = build_nelder_mead(&array![f64::NAN], &FitOptions::default());
        assert!(matches!(res, Err(FitError::InvalidTheta { index: 0, .. })));
    }
}
