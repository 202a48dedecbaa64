//! transform::qrms — root-mean-square reduction of the Q matrix.
//!
//! The scalar `Qrms = sqrt(mean(Q[j, k]²))` is the cost an optimizer
//! minimizes. Non-finite entries are excluded from both the sum and the
//! count; an empty (or fully excluded) matrix reduces to 0.
use ndarray::ArrayView2;

/// Reduce `q` to its root-mean-square over finite entries.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rank_order::transform::qrms::q_rms;
/// let q = array![[3.0, -4.0], [0.0, f64::NAN]];
/// // NaN is excluded: sqrt((9 + 16 + 0) / 3)
/// assert!((q_rms(q.view()) - (25.0_f64 / 3.0).sqrt()).abs() < 1e-12);
/// ```
pub fn q_rms(q: ArrayView2<f64>) -> f64 {
    let (sum_sq, count) = q
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0_usize), |(acc, n), &v| (acc + v * v, n + 1));
    if count == 0 { 0.0 } else { (sum_sq / count as f64).sqrt() }
}
