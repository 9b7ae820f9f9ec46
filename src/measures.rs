//! Belief, plausibility and commonality measures
//!
//! The three classical functions derived from a mass function m:
//!
//! | Measure | Definition | Reading |
//! |---------|------------|---------|
//! | Bel(A) | Σ m(B), B ⊆ A     | mass that certainly supports A |
//! | Pl(A)  | Σ m(B), B ∩ A ≠ ∅ | mass that could support A |
//! | Q(A)   | Σ m(B), A ⊆ B     | mass free to move anywhere in A |
//!
//! All three iterate the stored focal elements only, so each query is
//! O(|focal|) regardless of the frame width. Bel(∅) = Pl(∅) = 0 and
//! Bel(Ω) = 1 fall out of the definitions; they are not special cases.
//!
//! The duality Pl(A) = 1 − Bel(Ā) holds within [`TOLERANCE`](crate::TOLERANCE)
//! and is exercised by the property tests.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::frame::Subset;
use crate::mass::MassFunction;
use crate::TOLERANCE;

/// The (Bel, Pl) pair for one subset: lower and upper support bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeliefPlausibility {
    pub belief: f64,
    pub plausibility: f64,
}

impl BeliefPlausibility {
    /// Pl − Bel: how much support is uncommitted.
    ///
    /// Never negative for measures derived from a valid mass function;
    /// a negative width is a calculation bug and trips the debug
    /// assertion rather than being clamped away.
    pub fn width(&self) -> f64 {
        let width = self.plausibility - self.belief;
        debug_assert!(
            width >= -TOLERANCE,
            "negative uncertainty width: Bel={} Pl={}",
            self.belief,
            self.plausibility
        );
        width
    }
}

impl fmt::Display for BeliefPlausibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.4}, {:.4}]", self.belief, self.plausibility)
    }
}

impl MassFunction {
    /// Bel(A): total mass of focal elements contained in `subset`.
    pub fn belief(&self, subset: Subset) -> f64 {
        self.focal_elements()
            .filter(|(focal, _)| focal.is_subset_of(subset))
            .map(|(_, mass)| mass)
            .sum()
    }

    /// Pl(A): total mass of focal elements overlapping `subset`.
    pub fn plausibility(&self, subset: Subset) -> f64 {
        self.focal_elements()
            .filter(|(focal, _)| focal.intersects(subset))
            .map(|(_, mass)| mass)
            .sum()
    }

    /// Q(A): total mass of focal elements containing `subset`.
    ///
    /// Needed by the commonality formulation of Dempster's rule and as a
    /// cross-check in tests.
    pub fn commonality(&self, subset: Subset) -> f64 {
        self.focal_elements()
            .filter(|(focal, _)| subset.is_subset_of(*focal))
            .map(|(_, mass)| mass)
            .sum()
    }

    /// The uncertainty interval (Bel(A), Pl(A)).
    pub fn interval(&self, subset: Subset) -> BeliefPlausibility {
        let pair = BeliefPlausibility {
            belief: self.belief(subset),
            plausibility: self.plausibility(subset),
        };
        debug_assert!(pair.plausibility - pair.belief >= -TOLERANCE);
        pair
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameOfDiscernment;
    use std::sync::Arc;

    #[test]
    fn test_binary_frame_scenario() {
        // m = {{d}: 0.14, Ω: 0.86} over {d, ¬d}
        let frame = Arc::new(FrameOfDiscernment::binary("d"));
        let d = frame.singleton("d").unwrap();
        let not_d = frame.singleton("¬d").unwrap();
        let m = MassFunction::new(&frame, [(d, 0.14), (frame.universal(), 0.86)]).unwrap();

        assert!((m.belief(d) - 0.14).abs() < 1e-12);
        assert!((m.plausibility(d) - 1.0).abs() < 1e-12);
        assert!((m.belief(not_d) - 0.0).abs() < 1e-12);
        assert!((m.plausibility(not_d) - 0.86).abs() < 1e-12);

        let interval = m.interval(d);
        assert!((interval.belief - 0.14).abs() < 1e-12);
        assert!((interval.plausibility - 1.0).abs() < 1e-12);
        assert!((interval.width() - 0.86).abs() < 1e-12);
    }

    #[test]
    fn test_edge_subsets() {
        let frame = Arc::new(FrameOfDiscernment::new(["a", "b", "c"]).unwrap());
        let a = frame.singleton("a").unwrap();
        let m = MassFunction::new(&frame, [(a, 0.4), (frame.universal(), 0.6)]).unwrap();

        assert_eq!(m.belief(Subset::EMPTY), 0.0);
        assert_eq!(m.plausibility(Subset::EMPTY), 0.0);
        assert!((m.belief(frame.universal()) - 1.0).abs() < 1e-12);
        assert!((m.plausibility(frame.universal()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_duality_with_complement() {
        let frame = Arc::new(FrameOfDiscernment::new(["a", "b", "c"]).unwrap());
        let ab = frame.subset(["a", "b"]).unwrap();
        let c = frame.singleton("c").unwrap();
        let m = MassFunction::new(&frame, [(ab, 0.5), (c, 0.2), (frame.universal(), 0.3)])
            .unwrap();

        for subset_bits in 0..8u64 {
            let subset = Subset::from_bits(subset_bits);
            let dual = 1.0 - m.belief(frame.complement(subset));
            assert!(
                (m.plausibility(subset) - dual).abs() < 1e-12,
                "Pl != 1 - Bel(complement) for {subset}"
            );
        }
    }

    #[test]
    fn test_commonality() {
        let frame = Arc::new(FrameOfDiscernment::new(["a", "b", "c"]).unwrap());
        let a = frame.singleton("a").unwrap();
        let ab = frame.subset(["a", "b"]).unwrap();
        let m = MassFunction::new(&frame, [(a, 0.2), (ab, 0.3), (frame.universal(), 0.5)])
            .unwrap();

        // Q({a}) counts every focal element containing a
        assert!((m.commonality(a) - 1.0).abs() < 1e-12);
        // Q({a,b}) counts {a,b} and Ω
        assert!((m.commonality(ab) - 0.8).abs() < 1e-12);
        // Q(Ω) is the ignorance mass
        assert!((m.commonality(frame.universal()) - 0.5).abs() < 1e-12);
        // Q(∅) is the whole unit mass, vacuously
        assert!((m.commonality(Subset::EMPTY) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_vacuous_measures() {
        let frame = Arc::new(FrameOfDiscernment::new(["a", "b"]).unwrap());
        let m = MassFunction::vacuous(&frame);
        let a = frame.singleton("a").unwrap();

        assert_eq!(m.belief(a), 0.0);
        assert!((m.plausibility(a) - 1.0).abs() < 1e-12);
        assert!((m.interval(a).width() - 1.0).abs() < 1e-12);
    }
}
