//! transform — the universal rank-order transform.
//!
//! Purpose
//! -------
//! Turn a matrix of noisy repetitions (rows) over ordered sampling locations
//! (columns) into a scale-free measure of leftover systematic structure:
//! rank each row, count where each rank lands, and reduce the resulting
//! population matrix to the partition statistic `Q` and its rms `Qrms`.
//!
//! Key behaviors
//! -------------
//! - [`data_to_q_matrix`] runs the whole chain and returns a
//!   [`TransformOutcome`] with every intermediate.
//! - [`residual_signal`] returns only `Qrms`, the quantity minimized when
//!   fitting a model.
//! - The individual stages are public for callers that need them:
//!   [`MissingMask`], [`RankMatrix`], [`PopulationMatrix`], [`q_matrix`]
//!   (prefix-sum engine), [`q_matrix_direct`] (reference engine) and
//!   [`q_rms`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are `(n_r, n_s)` with `n_s ≥ 2`. `NaN` marks a missing entry;
//!   `±∞` is rejected.
//! - Only ranks matter. Any strictly increasing transform applied to a row
//!   leaves every output unchanged, and so does reordering rows.
//! - With `TiePolicy::Random` and a fixed seed, outputs are reproducible
//!   bit-for-bit regardless of rayon's scheduling.
//!
//! Conventions
//! -----------
//! - Ranks are 1-based; 0 marks an unranked cell in a [`RankMatrix`].
//! - `P[r, k]` is indexed `[rank - 1, location]`.
//! - All failures surface as [`TransformError`] via [`TransformResult`];
//!   nothing here panics on user input.
//!
//! Downstream usage
//! ----------------
//! - Typical Rust code imports the surface as:
//!
//!   ```rust
//!   use rank_order::transform::{TransformOptions, data_to_q_matrix};
//!   # use ndarray::array;
//!   # let residuals = array![[0.1, 0.4, 0.2], [0.3, 0.0, 0.5]];
//!
//!   let out = data_to_q_matrix(residuals.view(), &TransformOptions::default())?;
//!   println!("Qrms = {}", out.q_rms());
//!   # Ok::<(), rank_order::transform::TransformError>(())
//!   ```
//!
//! - `fitting::QrmsCost` wraps [`data_to_q_matrix`] as an optimizer
//!   objective; Python bindings call the stage functions one by one.
//!
//! Testing notes
//! -------------
//! - Each stage has unit tests next to its code. Cross-stage properties
//!   (row-order and monotone invariance, fast/direct agreement, the null
//!   design) are checked with proptest in `tests/transform_properties.rs`.

pub mod errors;
pub mod mask;
pub mod options;
pub mod pipeline;
pub mod population;
pub mod q_matrix;
pub mod qrms;
pub mod ranking;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{TransformError, TransformResult};
pub use self::mask::{MissingMask, RowMask};
pub use self::options::{MIN_VALID_PER_ROW, TiePolicy, TransformOptions};
pub use self::pipeline::{TransformOutcome, data_to_q_matrix, rank_matrix, residual_signal};
pub use self::population::PopulationMatrix;
pub use self::q_matrix::{q_matrix, q_matrix_direct};
pub use self::qrms::q_rms;
pub use self::ranking::{RankMatrix, rank_row};
pub use self::validation::{validate_data_matrix, validate_population};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rank_order::transform::prelude::*;
//
// to import the main transform surface in a single line.

pub mod prelude {
    pub use super::errors::{TransformError, TransformResult};
    pub use super::options::{TiePolicy, TransformOptions};
    pub use super::pipeline::{TransformOutcome, data_to_q_matrix, residual_signal};
}
