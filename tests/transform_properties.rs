//! Property tests for the rank-order transform.
//!
//! Purpose
//! -------
//! - Check the structural guarantees of the transform over randomly
//!   generated inputs rather than hand-picked matrices.
//!
//! Coverage
//! --------
//! - Permutation property of row ranks under both tie policies.
//! - Invariance of P, Q and Qrms under row reordering and under monotone
//!   transforms of a single row.
//! - Masking an entry behaves as if the entry never existed, for ranks,
//!   P, Q and Qrms.
//! - Permuting values within one row leaves every other row's ranks alone.
//! - Agreement of the prefix-sum Q engine with the direct block sums,
//!   bit-for-bit on integer populations and to rounding on real ones.
//!
//! Exclusions
//! ----------
//! - Hand-computed values and error paths; those sit in unit tests.
use ndarray::{Array1, Array2};
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use rank_order::transform::{
    MissingMask, RankMatrix, TiePolicy, TransformOptions, data_to_q_matrix, q_matrix,
    q_matrix_direct, q_rms, rank_row,
};

/// Integer-valued matrices, so offsets and sign-preserving scalings are exact
/// and ties occur regularly.
fn integer_matrix(max_rows: usize, max_cols: usize) -> impl Strategy<Value = Array2<f64>> {
    (2..=max_rows, 2..=max_cols).prop_flat_map(|(n_r, n_s)| {
        prop::collection::vec(-20i32..20, n_r * n_s).prop_map(move |v| {
            Array2::from_shape_vec((n_r, n_s), v.into_iter().map(f64::from).collect())
                .expect("shape matches length")
        })
    })
}

fn is_permutation(ranks: &[usize]) -> bool {
    let mut sorted = ranks.to_vec();
    sorted.sort_unstable();
    sorted.iter().enumerate().all(|(pos, &r)| r == pos + 1)
}

proptest! {
    #[test]
    fn ranks_are_permutations_under_both_policies(
        data in integer_matrix(8, 10),
        seed in any::<u64>(),
    ) {
        for opts in [TransformOptions::ordinal(), TransformOptions::random(Some(seed))] {
            let mask = MissingMask::from_matrix(data.view(), opts.min_valid_per_row);
            let ranks = RankMatrix::from_data(data.view(), &mask, &opts);
            for row in ranks.ranks().outer_iter() {
                let r: Vec<usize> = row.iter().copied().filter(|&r| r > 0).collect();
                prop_assert!(is_permutation(&r), "row ranks {:?}", r);
            }
        }
    }

    #[test]
    fn row_order_does_not_matter(data in integer_matrix(8, 10)) {
        let opts = TransformOptions::ordinal();
        let mut reversed = data.clone();
        reversed.invert_axis(ndarray::Axis(0));

        let a = data_to_q_matrix(data.view(), &opts).expect("transform");
        let b = data_to_q_matrix(reversed.view(), &opts).expect("transform");

        prop_assert_eq!(a.population(), b.population());
        prop_assert_eq!(a.q(), b.q());
        prop_assert_eq!(a.q_rms().to_bits(), b.q_rms().to_bits());
    }

    #[test]
    fn monotone_row_transform_is_invisible(
        data in integer_matrix(8, 10),
        row_pick in any::<prop::sample::Index>(),
        offset in -50i32..50,
        scale in 1i32..5,
    ) {
        let opts = TransformOptions::ordinal();
        let row = row_pick.index(data.nrows());
        let mut moved = data.clone();
        moved.row_mut(row).mapv_inplace(|v| f64::from(scale) * v + f64::from(offset));

        let a = data_to_q_matrix(data.view(), &opts).expect("transform");
        let b = data_to_q_matrix(moved.view(), &opts).expect("transform");

        prop_assert_eq!(a.ranks(), b.ranks());
        prop_assert_eq!(a.population(), b.population());
        prop_assert_eq!(a.q(), b.q());
    }

    #[test]
    fn masked_entry_is_as_if_absent(
        data in integer_matrix(6, 8),
        row_pick in any::<prop::sample::Index>(),
        col_pick in any::<prop::sample::Index>(),
    ) {
        let (n_r, n_s) = data.dim();
        let (i, k) = (row_pick.index(n_r), col_pick.index(n_s));
        let mut masked = data.clone();
        masked[[i, k]] = f64::NAN;
        let opts = TransformOptions::ordinal();
        let mask = MissingMask::from_matrix(masked.view(), opts.min_valid_per_row);
        let ranks = RankMatrix::from_data(masked.view(), &mask, &opts);
        let full_mask = MissingMask::from_matrix(data.view(), opts.min_valid_per_row);
        let full = RankMatrix::from_data(data.view(), &full_mask, &opts);
        let (masked_ranks, full_ranks) = (ranks.ranks(), full.ranks());

        // Row i ranked as if column k never existed.
        prop_assert_eq!(masked_ranks[[i, k]], 0);
        let kept_cols: Vec<usize> = (0..n_s).filter(|&c| c != k).collect();
        let kept: Vec<f64> = kept_cols.iter().map(|&c| data[[i, c]]).collect();
        let row_i_contributes = kept.len() >= opts.min_valid_per_row;
        let mut expected_p = Array2::<u64>::zeros((n_s, n_s));
        if row_i_contributes {
            let mut rng = StdRng::seed_from_u64(0);
            let expected = rank_row(&kept, TiePolicy::Ordinal, &mut rng);
            let got: Vec<usize> = kept_cols.iter().map(|&c| masked_ranks[[i, c]]).collect();
            prop_assert_eq!(&got, &expected);
            for (&c, &r) in kept_cols.iter().zip(expected.iter()) {
                expected_p[[r - 1, c]] += 1;
            }
        } else {
            prop_assert!(masked_ranks.row(i).iter().all(|&r| r == 0));
        }

        // Every other row keeps its unmasked ranks and its share of P.
        for other in (0..n_r).filter(|&r| r != i) {
            prop_assert_eq!(full_ranks.row(other), masked_ranks.row(other));
            for (c, &r) in full_ranks.row(other).iter().enumerate() {
                expected_p[[r - 1, c]] += 1;
            }
        }

        // P, Q and Qrms match a transform built from the surviving ranks.
        let contributing = n_r - 1 + usize::from(row_i_contributes);
        match data_to_q_matrix(masked.view(), &opts) {
            Ok(out) => {
                prop_assert!(contributing >= 2);
                prop_assert_eq!(out.population().counts(), expected_p.view());
                prop_assert_eq!(out.contributing_rows(), contributing);
                let expected_q = q_matrix(expected_p.mapv(|c| c as f64).view(), contributing)
                    .expect("q of surviving ranks");
                prop_assert_eq!(out.q(), expected_q.view());
                prop_assert_eq!(out.q_rms().to_bits(), q_rms(expected_q.view()).to_bits());
            }
            Err(_) => {
                prop_assert!(contributing < 2);
            }
        }
    }

    #[test]
    fn permuting_one_row_only_moves_that_rows_ranks(
        data in integer_matrix(8, 10),
        row_pick in any::<prop::sample::Index>(),
        shuffle_seed in any::<u64>(),
        tie_seed in any::<u64>(),
    ) {
        let row = row_pick.index(data.nrows());
        let mut permuted = data.clone();
        let mut values = permuted.row(row).to_vec();
        values.shuffle(&mut StdRng::seed_from_u64(shuffle_seed));
        permuted.row_mut(row).assign(&Array1::from(values.clone()));

        for opts in [TransformOptions::ordinal(), TransformOptions::random(Some(tie_seed))] {
            let before = RankMatrix::from_data(
                data.view(),
                &MissingMask::from_matrix(data.view(), opts.min_valid_per_row),
                &opts,
            );
            let after = RankMatrix::from_data(
                permuted.view(),
                &MissingMask::from_matrix(permuted.view(), opts.min_valid_per_row),
                &opts,
            );
            let (before_ranks, after_ranks) = (before.ranks(), after.ranks());

            for other in (0..data.nrows()).filter(|&r| r != row) {
                prop_assert_eq!(before_ranks.row(other), after_ranks.row(other));
            }
            // The permuted row is still ranked by value.
            let moved: Vec<usize> = after_ranks.row(row).to_vec();
            prop_assert!(is_permutation(&moved), "row ranks {:?}", moved);
            for a in 0..values.len() {
                for b in 0..values.len() {
                    if values[a] < values[b] {
                        prop_assert!(moved[a] < moved[b]);
                    }
                }
            }
        }
    }

    #[test]
    fn fast_and_direct_agree_on_integer_populations(
        (n, counts) in (2usize..12).prop_flat_map(|n| (Just(n), prop::collection::vec(0u32..6, n * n))),
        empty_row in any::<prop::sample::Index>(),
        empty_col in any::<prop::sample::Index>(),
        n_r in 1usize..40,
    ) {
        let mut p = Array2::from_shape_vec((n, n), counts.into_iter().map(f64::from).collect())
            .expect("shape matches length");
        p.row_mut(empty_row.index(n)).fill(0.0);
        p.column_mut(empty_col.index(n)).fill(0.0);

        let fast = q_matrix(p.view(), n_r).expect("fast");
        let direct = q_matrix_direct(p.view(), n_r).expect("direct");

        prop_assert_eq!(fast.dim(), (n - 1, n - 1));
        for (a, b) in fast.iter().zip(direct.iter()) {
            prop_assert!(a.is_finite());
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn fast_and_direct_agree_on_real_populations(
        (n, values) in (2usize..10).prop_flat_map(|n| (Just(n), prop::collection::vec(0.0f64..10.0, n * n))),
        n_r in 1usize..20,
    ) {
        let p = Array2::from_shape_vec((n, n), values).expect("shape matches length");
        let fast = q_matrix(p.view(), n_r).expect("fast");
        let direct = q_matrix_direct(p.view(), n_r).expect("direct");
        for (a, b) in fast.iter().zip(direct.iter()) {
            prop_assert!((a - b).abs() <= 1e-9 * (1.0 + b.abs()), "fast {} vs direct {}", a, b);
        }
    }

    #[test]
    fn latin_squares_carry_no_signal(n in 2usize..12, shift in 1usize..11) {
        // Row i holds (shift * i + k) mod n, so every rank lands once per location
        // whenever the row shifts are all distinct modulo n.
        prop_assume!(gcd(shift, n) == 1);
        let data = Array2::from_shape_fn((n, n), |(i, k)| ((k + shift * i) % n) as f64);
        let out = data_to_q_matrix(data.view(), &TransformOptions::ordinal()).expect("transform");
        prop_assert!(out.population().counts().iter().all(|&c| c == 1));
        prop_assert_eq!(out.q_rms(), 0.0);
        prop_assert_eq!(out.q().dim(), (n - 1, n - 1));
    }
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 { a } else { gcd(b, a % b) }
}
