//! fitting::run — executor wiring for the simplex solver.
use argmin::core::{CostFunction, Executor, State};
use log::{debug, warn};

use crate::fitting::{
    adapter::ArgMinAdapter,
    builders::initial_simplex,
    errors::FitResult,
    traits::{FitOptions, FitOutcome, Objective},
    types::{NelderMeadSolver, Theta},
};

/// Run a Nelder–Mead minimization of `problem`.
///
/// Wires up the objective via [`ArgMinAdapter`], the pre-built solver, the
/// optional `max_iter` cap and, behind the `obs_slog` feature with
/// `opts.verbose`, a terminal slog observer. The final argmin state is
/// normalized into a [`FitOutcome`].
///
/// # Arguments
/// - `theta0`: starting point, used for logging only (the simplex
///   already contains it).
/// - `opts`: optimizer options.
/// - `problem`: adapter over the objective.
/// - `solver`: solver from
///   [`build_nelder_mead`](crate::fitting::builders::build_nelder_mead).
///
/// # Errors
/// - Any `FitError` the objective raises on a vertex of the initial
///   simplex, returned before the executor starts.
/// - Propagates any `argmin` runtime error, including `FitError`s raised
///   by the objective, via `From<argmin::core::Error> for FitError`.
/// - Propagates validation errors from [`FitOutcome::new`].
///
/// # Notes
/// A run that stops on the iteration cap is *not* an error; it returns
/// `converged == false` and logs a warning.
pub fn run_nelder_mead<O: Objective>(
    theta0: &Theta, opts: &FitOptions, problem: ArgMinAdapter<'_, O>, solver: NelderMeadSolver,
) -> FitResult<FitOutcome> {
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(theta0, &problem)?;
    }
    debug!("Nelder-Mead start: theta0 = {theta0}, simplex size {}", theta0.len() + 1);
    screen_initial_simplex(theta0, opts, &problem)?;

    let mut optimizer = Executor::new(problem, solver);
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let outcome = FitOutcome::new(
        result.take_best_param(),
        result.get_best_cost(),
        termination,
        iterations,
        function_counts,
    )?;
    if !outcome.converged {
        warn!(
            "Nelder-Mead stopped without converging after {} iterations ({}); best Qrms = {:.6e}",
            outcome.iterations, outcome.status, outcome.value
        );
    }
    Ok(outcome)
}

// ---- Helper Methods ----

/// Evaluate every vertex of the initial simplex once.
///
/// argmin's `NelderMead::init` unwraps the vertex costs, so an objective
/// error there has to be surfaced here as `Err`.
fn screen_initial_simplex<O: Objective>(
    theta0: &Theta, opts: &FitOptions, problem: &ArgMinAdapter<'_, O>,
) -> FitResult<()> {
    for vertex in initial_simplex(theta0, opts.initial_step)? {
        problem.cost(&vertex)?;
    }
    Ok(())
}

#[cfg(feature = "obs_slog")]
fn log_initial_state<O: Objective>(
    theta0: &Theta, problem: &ArgMinAdapter<'_, O>,
) -> FitResult<()> {
    let c0 = problem.cost(theta0)?;
    log::info!("init: cost(theta0) = {c0:.6e}");
    Ok(())
}
