//! fitting::validation — guards for options, parameters and outcomes.
use crate::fitting::{
    errors::{FitError, FitResult},
    types::Theta,
};

/// Validate the optional simplex standard-deviation tolerance.
///
/// - Accepts `None` (argmin's default tolerance stays in effect).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`FitError::InvalidSdTol`] if the value is non-finite or ≤ 0.0.
pub fn verify_sd_tol(tol: Option<f64>) -> FitResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(FitError::InvalidSdTol { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(FitError::InvalidSdTol { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional iteration cap.
///
/// # Errors
/// Returns [`FitError::InvalidMaxIter`] if `max_iter == 0`.
pub fn verify_max_iter(max_iter: Option<usize>) -> FitResult<()> {
    if let Some(max_iter) = max_iter {
        if max_iter == 0 {
            return Err(FitError::InvalidMaxIter {
                max_iter,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
    }
    Ok(())
}

/// Validate the relative step used to build the initial simplex.
///
/// # Errors
/// Returns [`FitError::InvalidInitialStep`] for non-finite or non-positive steps.
pub fn verify_initial_step(step: f64) -> FitResult<()> {
    if !step.is_finite() {
        return Err(FitError::InvalidInitialStep { step, reason: "Step must be finite." });
    }
    if step <= 0.0 {
        return Err(FitError::InvalidInitialStep { step, reason: "Step must be positive." });
    }
    Ok(())
}

/// Validate a parameter vector handed in by the caller.
///
/// # Errors
/// - [`FitError::EmptyTheta`] for an empty vector.
/// - [`FitError::InvalidTheta`] for the first non-finite entry.
pub fn validate_theta(theta: &Theta) -> FitResult<()> {
    if theta.is_empty() {
        return Err(FitError::EmptyTheta);
    }
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(FitError::InvalidTheta {
                index,
                value,
                reason: "Parameters must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`FitError::MissingThetaHat`] if no vector was provided.
/// - [`FitError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> FitResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(FitError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(FitError::MissingThetaHat),
    }
}

/// Validate that a scalar cost is finite.
///
/// # Errors
/// Returns [`FitError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> FitResult<()> {
    if !value.is_finite() {
        return Err(FitError::NonFiniteCost { value });
    }
    Ok(())
}
