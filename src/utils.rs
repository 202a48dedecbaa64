//! utils — helpers for the PyO3 binding layer.
//!
//! Purpose
//! -------
//! Convert Python inputs (NumPy arrays, pandas frames, nested sequences)
//! into `ndarray` views and build validated [`TransformOptions`] from
//! Python-style keyword arguments.
//!
//! Key behaviors
//! -------------
//! - [`extract_f64_matrix`] accepts a 2-D `float64` ndarray directly, calls
//!   `to_numpy()` on objects that provide it, and finally falls back to a
//!   sequence of equally long float sequences.
//! - [`build_transform_options`] maps `(method, seed, min_valid)` onto
//!   [`TransformOptions::new`], reusing its validation and error messages.
//! - [`extract_f64_vector`] and [`extract_weights`] cover the 1-D inputs of
//!   the fit entry points. [`predict_with`] calls a Python model
//!   `func(xdata, *params)` once for all locations.
//!
//! Conventions
//! -----------
//! - Everything here is compiled only with the `python-bindings` feature.
//! - Type mismatches raise `TypeError`; shape and value problems raise
//!   `ValueError`.

#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::PyValueError,
    prelude::*,
    types::{PyAny, PyFloat, PyTuple},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Array2 → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
    PyReadonlyArray2,
};

#[cfg(feature = "python-bindings")]
use crate::{
    fitting::Weights,
    transform::options::{MIN_VALID_PER_ROW, TiePolicy, TransformOptions},
};

/// Extract a read-only 2-D `float64` array from a Python object.
///
/// Missing observations are expected as `NaN`.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray2<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro);
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro);
        }
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 2-D numpy.ndarray, pandas.DataFrame, or sequence of float64 sequences",
        )
    })?;
    let n_cols = rows.first().map_or(0, Vec::len);
    if let Some(i) = rows.iter().position(|r| r.len() != n_cols) {
        return Err(PyValueError::new_err(format!(
            "row {i} has {} entries, expected {n_cols}",
            rows[i].len()
        )));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    let n_rows = if n_cols == 0 { 0 } else { flat.len() / n_cols };
    let matrix = Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(matrix.into_pyarray(py).readonly())
}

/// Build [`TransformOptions`] from Python keyword arguments.
///
/// - `method`: `"ordinal"` (default) or `"random"`, case-insensitive.
/// - `seed`: only consulted for `"random"`.
/// - `min_valid`: defaults to [`MIN_VALID_PER_ROW`].
#[cfg(feature = "python-bindings")]
pub fn build_transform_options(
    method: Option<&str>, seed: Option<u64>, min_valid: Option<usize>,
) -> PyResult<TransformOptions> {
    let tie_policy: TiePolicy = method.unwrap_or("ordinal").parse()?;
    let opts =
        TransformOptions::new(tie_policy, seed, min_valid.unwrap_or(MIN_VALID_PER_ROW))?;
    Ok(opts)
}

/// Extract a 1-D `float64` array from a NumPy array or a float sequence.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vector<'py>(
    _py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<Array1<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }
    if let Ok(obj) = raw_data.call_method("to_numpy", (), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(series_ro.as_array().to_owned());
        }
    }
    let values: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of floats",
        )
    })?;
    Ok(Array1::from(values))
}

/// Residual weights: shape `(n_s,)` per location or `(n_r, n_s)` per entry.
#[cfg(feature = "python-bindings")]
pub fn extract_weights<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<Weights> {
    if let Ok(per_location) = extract_f64_vector(py, raw) {
        return Ok(Weights::PerLocation(per_location));
    }
    let per_entry = extract_f64_matrix(py, raw)?;
    Ok(Weights::PerEntry(per_entry.as_array().to_owned()))
}

/// Evaluate a Python model `func(xdata, *params)` at every location.
///
/// The return value must convert to a 1-D float array; its length is
/// checked later against the data.
#[cfg(feature = "python-bindings")]
pub fn predict_with<'py>(
    py: Python<'py>, func: &Bound<'py, PyAny>, x: &Array1<f64>, params: &[f64],
) -> PyResult<Array1<f64>> {
    let mut args: Vec<Bound<'py, PyAny>> = Vec::with_capacity(params.len() + 1);
    args.push(x.clone().into_pyarray(py).into_any());
    args.extend(params.iter().map(|&p| PyFloat::new(py, p).into_any()));
    let output = func.call1(PyTuple::new(py, args)?)?;
    extract_f64_vector(py, &output)
}
