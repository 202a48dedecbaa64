//! transform::options — configuration of the rank-order transform.
//!
//! Purpose
//! -------
//! Collect the few knobs of the transform in one validated carrier so the
//! pipeline receives explicit options instead of ad-hoc flags.
//!
//! Key behaviors
//! -------------
//! - [`TiePolicy`] selects how equal residuals within a row are ordered.
//! - [`TransformOptions`] bundles the tie policy, an optional random seed
//!   and the minimum number of valid entries a row needs to contribute.
//! - [`TransformOptions::master_rng`] turns the seed into an explicit
//!   generator, so no global random state is ever touched.
//!
//! Conventions
//! -----------
//! - Defaults: ordinal ties, no
//!   seed, and at least two valid entries per row.
//! - With `TiePolicy::Random` and a fixed seed, every invocation re-seeds
//!   from the same value. Repeated evaluations at the same parameters
//!   therefore return the same cost.
use std::str::FromStr;

use rand::{SeedableRng, rngs::StdRng};

use crate::transform::errors::{TransformError, TransformResult};

/// Smallest admissible `min_valid_per_row`; a single value has no order.
pub const MIN_VALID_PER_ROW: usize = 2;

/// Tie-resolution policy for ranking a row.
///
/// - `Ordinal`: equal values keep their column order (deterministic).
/// - `Random`: equal values are ordered by a uniform random permutation
///   drawn once per row and invocation.
///
/// Parsing accepts `"ordinal"` and `"random"` in any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiePolicy {
    #[default]
    Ordinal,
    Random,
}

impl FromStr for TiePolicy {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ordinal" => Ok(TiePolicy::Ordinal),
            "random" => Ok(TiePolicy::Random),
            _ => Err(TransformError::InvalidTiePolicy { name: s.to_string() }),
        }
    }
}

/// TransformOptions — validated configuration for one transform run.
///
/// Fields
/// ------
/// - `tie_policy`: [`TiePolicy`]
///   How ties within a row are resolved.
/// - `random_seed`: `Option<u64>`
///   Seed for `TiePolicy::Random`. `None` draws fresh OS entropy on each
///   invocation. Ignored for `TiePolicy::Ordinal`.
/// - `min_valid_per_row`: `usize`
///   Rows with fewer non-missing entries are dropped (not an error).
///   Must be at least [`MIN_VALID_PER_ROW`].
///
/// Default
/// -------
/// `Ordinal`, no seed, `min_valid_per_row = 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    pub tie_policy: TiePolicy,
    pub random_seed: Option<u64>,
    pub min_valid_per_row: usize,
}

impl TransformOptions {
    /// Build options, rejecting `min_valid_per_row < 2`.
    ///
    /// # Errors
    /// - [`TransformError::InvalidMinValid`] if `min_valid_per_row < 2`.
    pub fn new(
        tie_policy: TiePolicy, random_seed: Option<u64>, min_valid_per_row: usize,
    ) -> TransformResult<Self> {
        if min_valid_per_row < MIN_VALID_PER_ROW {
            return Err(TransformError::InvalidMinValid { value: min_valid_per_row });
        }
        Ok(Self { tie_policy, random_seed, min_valid_per_row })
    }

    /// Ordinal ranking with default masking.
    pub fn ordinal() -> Self {
        Self::default()
    }

    /// Random tie-breaking seeded with `seed`.
    pub fn random(seed: Option<u64>) -> Self {
        Self { tie_policy: TiePolicy::Random, random_seed: seed, ..Self::default() }
    }

    /// Generator from which per-row generators are drawn.
    ///
    /// Seeded from `random_seed` when present, otherwise from OS entropy.
    pub fn master_rng(&self) -> StdRng {
        match self.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self { tie_policy: TiePolicy::Ordinal, random_seed: None, min_valid_per_row: 2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    // Purpose
    // -------
    // Tie policy names parse case-insensitively and unknown names fail.
    //
    // Given
    // -----
    // - "Ordinal", "RANDOM" and "dense".
    //
    // Expect
    // ------
    // - The first two parse; "dense" yields `InvalidTiePolicy`.
    fn tie_policy_parses_case_insensitively() {
        assert_eq!("Ordinal".parse::<TiePolicy>(), Ok(TiePolicy::Ordinal));
        assert_eq!("RANDOM".parse::<TiePolicy>(), Ok(TiePolicy::Random));
        match "dense".parse::<TiePolicy>() {
            Err(TransformError::InvalidTiePolicy { name }) => assert_eq!(name, "dense"),
            other => panic!("expected InvalidTiePolicy, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // `min_valid_per_row` below two is rejected at construction.
    //
    // Given
    // -----
    // - `min_valid_per_row` of 1 and of 3.
    //
    // Expect
    // ------
    // - 1 fails with `InvalidMinValid { value: 1 }`; 3 succeeds.
    fn new_rejects_min_valid_below_two() {
        assert_eq!(
            TransformOptions::new(TiePolicy::Ordinal, None, 1),
            Err(TransformError::InvalidMinValid { value: 1 })
        );
        let opts = TransformOptions::new(TiePolicy::Random, Some(7), 3).expect("valid options");
        assert_eq!(opts.min_valid_per_row, 3);
        assert_eq!(opts.random_seed, Some(7));
    }

    #[test]
    // Purpose
    // -------
    // A fixed seed yields the same master stream on every call.
    //
    // Given
    // -----
    // - `TransformOptions::random(Some(42))`.
    //
    // Expect
    // ------
    // - Two master generators produce identical first draws.
    fn master_rng_is_reproducible_with_seed() {
        let opts = TransformOptions::random(Some(42));
        let a: u64 = opts.master_rng().r#gen();
        let b: u64 = opts.master_rng().r#gen();
        assert_eq!(a, b);
    }

    #[test]
    fn default_matches_documented_values() {
        let opts = TransformOptions::default();
        assert_eq!(opts.tie_policy, TiePolicy::Ordinal);
        assert_eq!(opts.random_seed, None);
        assert_eq!(opts.min_valid_per_row, MIN_VALID_PER_ROW);
    }
}
