//! Property-based tests for the combination algebra
//!
//! Random frames, random sparse mass functions, and the invariants that
//! must hold for every one of them:
//!
//! - Bel(A) ≤ Pl(A), and Pl(A) = 1 − Bel(Ā) within tolerance
//! - the vacuous mass function is the identity of Dempster's rule
//! - combination is commutative, and associative across fold order
//! - pignistic probabilities form a distribution
//! - reported conflict stays in [0, 1)

use std::sync::Arc;

use proptest::prelude::*;

use doxa::{combine, FrameOfDiscernment, MassFunction, Subset, TOLERANCE};

// ============================================================================
// Generators
// ============================================================================

/// Frames of 1 to 5 hypotheses: wide enough for real subset structure,
/// small enough that shrunk counterexamples stay readable.
fn arb_frame() -> impl Strategy<Value = Arc<FrameOfDiscernment>> {
    (1usize..=5).prop_map(|n| {
        let labels = (0..n).map(|i| format!("h{i}"));
        Arc::new(FrameOfDiscernment::new(labels).unwrap())
    })
}

/// A sparse mass function over `frame`: 1 to 4 distinct non-empty focal
/// elements with positive weights, normalized to sum to 1.
fn arb_mass(frame: Arc<FrameOfDiscernment>) -> impl Strategy<Value = MassFunction> {
    let max = frame.universal().bits();
    proptest::collection::btree_map(1..=max, 0.01f64..1.0, 1..=4).prop_map(move |weights| {
        let total: f64 = weights.values().sum();
        let assignment: Vec<(Subset, f64)> = weights
            .iter()
            .map(|(bits, weight)| (Subset::from_bits(*bits), weight / total))
            .collect();
        MassFunction::new(&frame, assignment).unwrap()
    })
}

fn frame_with_masses(
    count: usize,
) -> impl Strategy<Value = (Arc<FrameOfDiscernment>, Vec<MassFunction>)> {
    arb_frame().prop_flat_map(move |frame| {
        let masses = proptest::collection::vec(arb_mass(Arc::clone(&frame)), count);
        (Just(frame), masses)
    })
}

/// A mass function together with an arbitrary query subset of its frame.
fn mass_with_subset() -> impl Strategy<Value = (MassFunction, Subset)> {
    arb_frame().prop_flat_map(|frame| {
        let max = frame.universal().bits();
        (arb_mass(frame), 0..=max).prop_map(|(mass, bits)| (mass, Subset::from_bits(bits)))
    })
}

fn max_mass_difference(left: &MassFunction, right: &MassFunction) -> f64 {
    left.focal_elements()
        .chain(right.focal_elements())
        .map(|(subset, _)| (left.mass(subset) - right.mass(subset)).abs())
        .fold(0.0, f64::max)
}

// ============================================================================
// Measure invariants
// ============================================================================

proptest! {
    #[test]
    fn belief_never_exceeds_plausibility((mass, subset) in mass_with_subset()) {
        prop_assert!(mass.belief(subset) <= mass.plausibility(subset) + TOLERANCE);
    }

    #[test]
    fn plausibility_is_dual_of_belief((mass, subset) in mass_with_subset()) {
        let complement = mass.frame().complement(subset);
        let dual = 1.0 - mass.belief(complement);
        prop_assert!((mass.plausibility(subset) - dual).abs() < TOLERANCE);
    }

    #[test]
    fn interval_width_is_nonnegative((mass, subset) in mass_with_subset()) {
        prop_assert!(mass.interval(subset).width() >= -TOLERANCE);
    }

    #[test]
    fn commonality_bounded_by_plausibility((mass, subset) in mass_with_subset()) {
        // Q(A) ≤ Pl(A) for non-empty A: every B ⊇ A also intersects A
        prop_assume!(!subset.is_empty());
        prop_assert!(mass.commonality(subset) <= mass.plausibility(subset) + TOLERANCE);
    }
}

// ============================================================================
// Combination algebra
// ============================================================================

proptest! {
    #[test]
    fn vacuous_is_the_identity((frame, masses) in frame_with_masses(1)) {
        let vacuous = MassFunction::vacuous(&frame);
        let fused = combine(&masses[0], &vacuous).unwrap();
        prop_assert!(fused.conflict.value() == 0.0);
        prop_assert!(max_mass_difference(&fused.mass, &masses[0]) < TOLERANCE);
    }

    #[test]
    fn combination_is_commutative((_, masses) in frame_with_masses(2)) {
        let forward = combine(&masses[0], &masses[1]);
        let backward = combine(&masses[1], &masses[0]);
        match (forward, backward) {
            (Ok(f), Ok(b)) => {
                prop_assert!((f.conflict.value() - b.conflict.value()).abs() < TOLERANCE);
                prop_assert!(max_mass_difference(&f.mass, &b.mass) < TOLERANCE);
            }
            (Err(f), Err(b)) => prop_assert_eq!(f, b),
            (forward, backward) => {
                return Err(TestCaseError::fail(format!(
                    "asymmetric outcome: {forward:?} vs {backward:?}"
                )));
            }
        }
    }

    #[test]
    fn combination_is_associative((_, masses) in frame_with_masses(3)) {
        let left = combine(&masses[0], &masses[1])
            .and_then(|step| combine(&step.mass, &masses[2]));
        let right = combine(&masses[1], &masses[2])
            .and_then(|step| combine(&masses[0], &step.mass));
        // Total conflict can only surface on the final denominator being
        // zero, and that is order-independent; skip those frames.
        prop_assume!(left.is_ok() && right.is_ok());
        let (left, right) = (left.unwrap(), right.unwrap());
        prop_assert!(max_mass_difference(&left.mass, &right.mass) < TOLERANCE);
    }

    #[test]
    fn conflict_stays_in_unit_interval((_, masses) in frame_with_masses(2)) {
        if let Ok(fused) = combine(&masses[0], &masses[1]) {
            let conflict = fused.conflict.value();
            prop_assert!((0.0..1.0).contains(&conflict));
        }
    }

    #[test]
    fn combined_mass_is_still_normalized((_, masses) in frame_with_masses(2)) {
        if let Ok(fused) = combine(&masses[0], &masses[1]) {
            let total: f64 = fused.mass.focal_elements().map(|(_, mass)| mass).sum();
            prop_assert!((total - 1.0).abs() < TOLERANCE);
            prop_assert!(fused.mass.mass(Subset::EMPTY) == 0.0);
        }
    }
}

// ============================================================================
// Decision invariants
// ============================================================================

proptest! {
    #[test]
    fn pignistic_is_a_distribution((_, masses) in frame_with_masses(1)) {
        let betp = masses[0].pignistic();
        let mut total = 0.0;
        for (_, probability) in betp.iter() {
            prop_assert!(probability >= 0.0);
            total += probability;
        }
        prop_assert!((total - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn pignistic_lies_within_the_interval((_, masses) in frame_with_masses(1)) {
        // Bel({x}) ≤ BetP(x) ≤ Pl({x}) for every atom
        let mass = &masses[0];
        let betp = mass.pignistic();
        for index in 0..mass.frame().hypothesis_count() {
            let atom = Subset::atom(index);
            let p = betp.probability(index).unwrap();
            prop_assert!(mass.belief(atom) - TOLERANCE <= p);
            prop_assert!(p <= mass.plausibility(atom) + TOLERANCE);
        }
    }
}
