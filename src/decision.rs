//! Decision extraction: pignistic probabilities and hypothesis ranking
//!
//! A mass function answers interval queries; a decision needs a point
//! estimate. The pignistic transform spreads each focal element's mass
//! uniformly over the hypotheses it contains:
//!
//! ```text
//! BetP(x) = Σ m(B) / |B|   over focal B with x ∈ B
//! ```
//!
//! which always yields a proper probability distribution over the atoms.
//! [`rank`] keeps the interval view instead: every hypothesis with its
//! (Bel, Pl) bounds, ordered by descending belief, for callers that want
//! the cautious reading next to the point estimate.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::frame::{FrameOfDiscernment, Subset};
use crate::mass::MassFunction;
use crate::measures::BeliefPlausibility;
use crate::TOLERANCE;

/// Pignistic probability distribution over the atomic hypotheses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pignistic {
    frame: Arc<FrameOfDiscernment>,
    probabilities: Vec<f64>,
}

impl Pignistic {
    /// The frame the distribution is defined over.
    pub fn frame(&self) -> &Arc<FrameOfDiscernment> {
        &self.frame
    }

    /// BetP of the hypothesis at `index`.
    pub fn probability(&self, index: usize) -> Option<f64> {
        self.probabilities.get(index).copied()
    }

    /// BetP of the hypothesis named `label`.
    pub fn probability_of(&self, label: &str) -> Option<f64> {
        self.frame.index_of(label).map(|i| self.probabilities[i])
    }

    /// (label, BetP) pairs in frame order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.frame
            .labels()
            .iter()
            .map(String::as_str)
            .zip(self.probabilities.iter().copied())
    }

    /// The most probable hypothesis. First in frame order wins ties.
    pub fn best(&self) -> (&str, f64) {
        let mut best = 0;
        for (i, p) in self.probabilities.iter().enumerate() {
            if *p > self.probabilities[best] {
                best = i;
            }
        }
        (self.frame.labels()[best].as_str(), self.probabilities[best])
    }
}

impl fmt::Display for Pignistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, (label, p)) in self.iter().enumerate() {
            if n > 0 {
                write!(f, ", ")?;
            }
            write!(f, "BetP({label}) = {p:.4}")?;
        }
        Ok(())
    }
}

impl MassFunction {
    /// The pignistic transform of this mass function.
    ///
    /// Sums to 1 within [`TOLERANCE`]; checked by a debug assertion, the
    /// invariant being a property of the transform, not of the input.
    pub fn pignistic(&self) -> Pignistic {
        let frame = Arc::clone(self.frame());
        let mut probabilities = vec![0.0; frame.hypothesis_count()];
        for (subset, mass) in self.focal_elements() {
            let share = mass / subset.cardinality() as f64;
            for atom in subset.atom_indices() {
                probabilities[atom] += share;
            }
        }
        debug_assert!(
            (probabilities.iter().sum::<f64>() - 1.0).abs() <= TOLERANCE,
            "pignistic probabilities do not sum to 1"
        );
        Pignistic {
            frame,
            probabilities,
        }
    }
}

/// One hypothesis with its uncertainty interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedHypothesis {
    pub label: String,
    pub interval: BeliefPlausibility,
}

/// Every atomic hypothesis with its (Bel, Pl) interval, by descending
/// belief. Ties keep frame order.
pub fn rank(mass: &MassFunction) -> Vec<RankedHypothesis> {
    let frame = mass.frame();
    let mut ranked: Vec<RankedHypothesis> = frame
        .labels()
        .iter()
        .enumerate()
        .map(|(index, label)| RankedHypothesis {
            label: label.clone(),
            interval: mass.interval(Subset::atom(index)),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.interval
            .belief
            .partial_cmp(&a.interval.belief)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}
