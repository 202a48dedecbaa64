//! rank_order — the universal rank-order transform and Qrms model fitting.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the rank-order transform to Python via the `_rank_order`
//! extension module. The transform measures how much systematic signal is
//! left in repeated noisy measurements, using only the ranks of each
//! repetition. Its scalar summary `Qrms` doubles as a regression cost.
//!
//! Key behaviors
//! -------------
//! - [`transform`]: missing-data mask, row ranking, population matrix, the
//!   O(n_s²) Q engine and the `Qrms` reduction, plus the composed
//!   [`data_to_q_matrix`](transform::data_to_q_matrix) pipeline.
//! - [`fitting`]: fit data, the [`Model`](fitting::Model) and
//!   [`Objective`](fitting::Objective) seams, the [`QrmsCost`](fitting::QrmsCost)
//!   objective and a Nelder–Mead [`minimize`](fitting::minimize) driver.
//! - With `python-bindings`, the functions `r_matrix`, `p_matrix`,
//!   `q_matrix`, `data_to_q_matrix` and `q_rms` are registered under the
//!   `rank_order.transform` submodule, and `q_matrix_fit` / `q_rms_fit`
//!   (a Python model callable against data) under `rank_order.fitting`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file only performs
//!   FFI glue, input conversion and error mapping.
//! - Nothing in the crate holds global mutable state; every call is a pure
//!   function of its arguments (and of the seed, for random tie-breaking).
//!
//! Conventions
//! -----------
//! - Data matrices are `(n_r, n_s)`: repetitions × sampling locations, with
//!   `NaN` for missing entries.
//! - Ranks are 1-based; Python callers receive 0 for unranked cells.
//! - Errors are rich Rust enums internally and become `ValueError` at the
//!   PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Rust callers use [`transform`] and [`fitting`] directly and can ignore
//!   the items guarded by `python-bindings`.
//! - The Python packaging layer imports `_rank_order` and re-exports its
//!   `transform` and `fitting` submodules. `q_rms_fit` is the cost handed to
//!   a Python-side minimizer such as `scipy.optimize.minimize`.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules, property
//!   tests in `tests/transform_properties.rs` and end-to-end fits in
//!   `tests/integration_fit_pipeline.rs`.

pub mod fitting;
pub mod transform;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    fitting::FitData,
    transform::{
        TransformOutcome, pipeline, population::PopulationMatrix, q_matrix as q_engine, qrms,
    },
    utils::{
        build_transform_options, extract_f64_matrix, extract_f64_vector, extract_weights,
        predict_with,
    },
};

/// r_matrix — per-row ranks of a data matrix.
///
/// Parameters
/// ----------
/// - `data`: 2-D array-like `(n_r, n_s)`; `NaN` marks missing entries.
/// - `method`: `"ordinal"` (default) or `"random"` tie resolution.
/// - `seed`: optional seed for `"random"`.
/// - `min_valid`: rows with fewer observed entries are dropped (default 2).
///
/// Returns
/// -------
/// Integer array `(n_r, n_s)` of 1-based ranks; 0 marks a missing cell or
/// a dropped row.
///
/// Notes
/// -----
/// Ranks start at 1, not 0: the value 0 is taken by unranked cells, which
/// a 0-based convention could not tell apart from the lowest rank. Subtract
/// 1 from the ranked cells for 0-based ranks.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (data, method = None, seed = None, min_valid = None),
    text_signature = "(data, /, method='ordinal', seed=None, min_valid=2)"
)]
fn r_matrix<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, method: Option<&str>, seed: Option<u64>,
    min_valid: Option<usize>,
) -> PyResult<Bound<'py, PyArray2<i64>>> {
    let opts = build_transform_options(method, seed, min_valid)?;
    let arr = extract_f64_matrix(py, data)?;
    let ranks = pipeline::rank_matrix(arr.as_array(), &opts)?;
    Ok(ranks.ranks().mapv(|r| r as i64).into_pyarray(py))
}

/// p_matrix — population matrix of a data matrix.
///
/// Same parameters as `r_matrix`. Returns counts `(n_s, n_s)` indexed
/// `[rank - 1, location]`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (data, method = None, seed = None, min_valid = None),
    text_signature = "(data, /, method='ordinal', seed=None, min_valid=2)"
)]
fn p_matrix<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, method: Option<&str>, seed: Option<u64>,
    min_valid: Option<usize>,
) -> PyResult<Bound<'py, PyArray2<u64>>> {
    let opts = build_transform_options(method, seed, min_valid)?;
    let arr = extract_f64_matrix(py, data)?;
    let ranks = pipeline::rank_matrix(arr.as_array(), &opts)?;
    let population = PopulationMatrix::from_ranks(&ranks);
    Ok(population.counts().to_owned().into_pyarray(py))
}

/// q_matrix — Q matrix of a population matrix.
///
/// Parameters
/// ----------
/// - `population`: square 2-D array-like `(n_s, n_s)`.
/// - `n_r`: number of repetitions that built it.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (population, n_r), text_signature = "(population, n_r, /)")]
fn q_matrix<'py>(
    py: Python<'py>, population: &Bound<'py, PyAny>, n_r: usize,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let arr = extract_f64_matrix(py, population)?;
    let q = q_engine::q_matrix(arr.as_array(), n_r)?;
    Ok(q.into_pyarray(py))
}

/// data_to_q_matrix — the full transform of a data matrix.
///
/// Same parameters as `r_matrix`. Returns Q `(n_s − 1, n_s − 1)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (data, method = None, seed = None, min_valid = None),
    text_signature = "(data, /, method='ordinal', seed=None, min_valid=2)"
)]
fn data_to_q_matrix<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, method: Option<&str>, seed: Option<u64>,
    min_valid: Option<usize>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let opts = build_transform_options(method, seed, min_valid)?;
    let arr = extract_f64_matrix(py, data)?;
    let outcome = pipeline::data_to_q_matrix(arr.as_array(), &opts)?;
    Ok(outcome.into_q().into_pyarray(py))
}

/// q_rms — root-mean-square of a Q matrix over its finite entries.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (q), text_signature = "(q, /)")]
fn q_rms<'py>(py: Python<'py>, q: &Bound<'py, PyAny>) -> PyResult<f64> {
    let arr = extract_f64_matrix(py, q)?;
    Ok(qrms::q_rms(arr.as_array()))
}

/// Transform of the weighted residuals of `func(xdata, *params)`.
#[cfg(feature = "python-bindings")]
#[allow(clippy::too_many_arguments)]
fn fit_outcome<'py>(
    py: Python<'py>, func: &Bound<'py, PyAny>, params: &Bound<'py, PyAny>,
    xdata: &Bound<'py, PyAny>, ydata: &Bound<'py, PyAny>, weights: Option<&Bound<'py, PyAny>>,
    method: Option<&str>, seed: Option<u64>, min_valid: Option<usize>,
) -> PyResult<TransformOutcome> {
    let opts = build_transform_options(method, seed, min_valid)?;
    let x = extract_f64_vector(py, xdata)?;
    let y = extract_f64_matrix(py, ydata)?.as_array().to_owned();
    let weights = weights.map(|w| extract_weights(py, w)).transpose()?;
    let data = FitData::new(x, y, weights)?;
    let params: Vec<f64> = params.extract()?;
    let prediction = predict_with(py, func, &data.x().to_owned(), &params)?;
    let residuals = data.residuals(prediction.view())?;
    Ok(pipeline::data_to_q_matrix(residuals.view(), &opts)?)
}

/// q_matrix_fit — Q matrix of the residuals of a model fit.
///
/// Parameters
/// ----------
/// - `func`: model callable `func(xdata, *params)` returning `(n_s,)`.
/// - `params`: sequence of parameter values.
/// - `xdata`: sampling locations `(n_s,)`.
/// - `ydata`: observations `(n_r, n_s)`; `NaN` marks missing entries.
/// - `weights`: optional `(n_s,)` or `(n_r, n_s)` factors applied to the
///   residuals, e.g. `1 / sigma`.
/// - `method`, `seed`, `min_valid`: as for `r_matrix`.
///
/// Returns
/// -------
/// Q `(n_s − 1, n_s − 1)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (func, params, xdata, ydata, weights = None, method = None, seed = None, min_valid = None),
    text_signature = "(func, params, xdata, ydata, /, weights=None, method='ordinal', seed=None, min_valid=2)"
)]
#[allow(clippy::too_many_arguments)]
fn q_matrix_fit<'py>(
    py: Python<'py>, func: &Bound<'py, PyAny>, params: &Bound<'py, PyAny>,
    xdata: &Bound<'py, PyAny>, ydata: &Bound<'py, PyAny>, weights: Option<&Bound<'py, PyAny>>,
    method: Option<&str>, seed: Option<u64>, min_valid: Option<usize>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let outcome = fit_outcome(py, func, params, xdata, ydata, weights, method, seed, min_valid)?;
    Ok(outcome.into_q().into_pyarray(py))
}

/// q_rms_fit — Qrms of the residuals of a model fit; the cost to minimize.
///
/// Same parameters as `q_matrix_fit`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (func, params, xdata, ydata, weights = None, method = None, seed = None, min_valid = None),
    text_signature = "(func, params, xdata, ydata, /, weights=None, method='ordinal', seed=None, min_valid=2)"
)]
#[allow(clippy::too_many_arguments)]
fn q_rms_fit<'py>(
    py: Python<'py>, func: &Bound<'py, PyAny>, params: &Bound<'py, PyAny>,
    xdata: &Bound<'py, PyAny>, ydata: &Bound<'py, PyAny>, weights: Option<&Bound<'py, PyAny>>,
    method: Option<&str>, seed: Option<u64>, min_valid: Option<usize>,
) -> PyResult<f64> {
    let outcome = fit_outcome(py, func, params, xdata, ydata, weights, method, seed, min_valid)?;
    Ok(outcome.q_rms())
}

/// _rank_order — PyO3 module initializer.
///
/// Creates the `transform` and `fitting` submodules, registers their
/// functions and inserts them into `sys.modules` as `rank_order.transform`
/// and `rank_order.fitting` so dot-notation imports work.
///
/// Errors
/// ------
/// - `PyErr` if creating a submodule or touching `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rank_order<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let transform_mod = PyModule::new(_py, "transform")?;
    transform(_py, m, &transform_mod)?;
    let fitting_mod = PyModule::new(_py, "fitting")?;
    fitting(_py, m, &fitting_mod)?;

    // Manually add the submodules into sys.modules to allow for dot notation.
    let modules = _py.import("sys")?.getattr("modules")?;
    modules.set_item("rank_order.transform", transform_mod)?;
    modules.set_item("rank_order.fitting", fitting_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn transform<'py>(
    _py: Python, rank_order: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(r_matrix, m)?)?;
    m.add_function(wrap_pyfunction!(p_matrix, m)?)?;
    m.add_function(wrap_pyfunction!(q_matrix, m)?)?;
    m.add_function(wrap_pyfunction!(data_to_q_matrix, m)?)?;
    m.add_function(wrap_pyfunction!(q_rms, m)?)?;
    rank_order.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn fitting<'py>(
    _py: Python, rank_order: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(q_matrix_fit, m)?)?;
    m.add_function(wrap_pyfunction!(q_rms_fit, m)?)?;
    rank_order.add_submodule(m)?;
    Ok(())
}
