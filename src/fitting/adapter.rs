//! fitting::adapter — bridge from [`Objective`] to argmin's `CostFunction`.
use argmin::core::{CostFunction, Error};

use crate::fitting::{
    errors::FitError,
    traits::Objective,
    types::{Cost, Theta},
};

/// Bridges a user [`Objective`] to `argmin`'s `CostFunction`.
///
/// - `CostFunction::cost` returns the objective unchanged (we minimize).
/// - A non-finite value is turned into [`FitError::NonFiniteCost`] rather
///   than handed to the simplex.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, O: Objective> {
    pub objective: &'a O,
}

impl<'a, O: Objective> ArgMinAdapter<'a, O> {
    /// Construct a new adapter over a user objective.
    pub fn new(objective: &'a O) -> Self {
        Self { objective }
    }
}

impl<'a, O: Objective> CostFunction for ArgMinAdapter<'a, O> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the objective at `θ`.
    ///
    /// # Errors
    /// Propagates any `FitError` from the objective via `?`; the error is
    /// recovered intact by `From<argmin::core::Error> for FitError`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.objective.cost(theta)?;
        if !output.is_finite() {
            return Err((FitError::NonFiniteCost { value: output }).into());
        }
        Ok(output)
    }
}
