//! Mass functions: basic belief assignments over a frame
//!
//! A mass function m allocates belief mass to subsets of a frame of
//! discernment, with m(∅) = 0 and Σ m(A) = 1. Only focal elements
//! (subsets with strictly positive mass) are stored, so a source that
//! commits to a handful of subsets stays a handful of entries even over
//! a wide frame.
//!
//! # Invariants
//!
//! | Invariant | Enforced by |
//! |-----------|-------------|
//! | every mass ∈ [0, 1]            | [`MassFunction::new`] |
//! | m(∅) = 0                       | [`MassFunction::new`] |
//! | Σ m(A) = 1 within 1e-9         | [`MassFunction::new`] |
//! | no subset assigned twice       | [`MassFunction::new`] |
//! | every subset within the frame  | [`MassFunction::new`] |
//!
//! Mass functions are immutable after construction. Combination never
//! mutates its inputs; it returns a new value.
//!
//! Focal elements iterate in ascending subset encoding (the storage is a
//! `BTreeMap` keyed by the encoding). The order is part of the contract:
//! it fixes floating-point summation order, so repeated runs and tests
//! see bit-identical sums.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::frame::{FrameOfDiscernment, Subset};
use crate::TOLERANCE;

/// Result type for mass-function construction
pub type MassResult<T> = Result<T, MassError>;

/// Errors raised while constructing or reweighting a mass function
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MassError {
    #[error("mass {mass} assigned to {subset} is outside [0, 1]")]
    InvalidMass { subset: Subset, mass: f64 },

    #[error("subset {0} appears twice in the assignment")]
    DuplicateFocalElement(Subset),

    #[error("masses sum to {total}, expected 1 within 1e-9")]
    NotNormalized { total: f64 },

    #[error("positive mass {0} assigned to the empty set")]
    EmptyFocalElement(f64),

    #[error("subset {0} uses hypotheses outside the frame")]
    ForeignSubset(Subset),

    #[error("discount rate {0} is outside [0, 1]")]
    InvalidDiscount(f64),

    #[error(transparent)]
    Frame(#[from] crate::frame::FrameError),
}

/// A basic belief assignment: sparse mapping from subset to mass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassFunction {
    frame: Arc<FrameOfDiscernment>,
    #[serde(serialize_with = "serialize_focal")]
    focal: BTreeMap<Subset, f64>,
}

fn serialize_focal<S: Serializer>(
    focal: &BTreeMap<Subset, f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    // (subset, mass) pairs rather than a map: text formats want string keys
    serializer.collect_seq(focal.iter().map(|(s, m)| (*s, *m)))
}

impl MassFunction {
    /// Build a mass function from (subset, mass) pairs.
    ///
    /// Validates the full contract: each mass in [0, 1], no duplicate
    /// subsets, nothing assigned to ∅, every subset within the frame, and
    /// the total equal to 1 within [`TOLERANCE`]. Zero-mass entries are
    /// accepted and dropped; only focal elements are stored.
    pub fn new(
        frame: &Arc<FrameOfDiscernment>,
        assignment: impl IntoIterator<Item = (Subset, f64)>,
    ) -> MassResult<Self> {
        let mut focal = BTreeMap::new();
        let mut total = 0.0;
        for (subset, mass) in assignment {
            if !frame.contains(subset) {
                return Err(MassError::ForeignSubset(subset));
            }
            if !(0.0..=1.0).contains(&mass) {
                return Err(MassError::InvalidMass { subset, mass });
            }
            if subset.is_empty() && mass > 0.0 {
                return Err(MassError::EmptyFocalElement(mass));
            }
            if focal.insert(subset, mass).is_some() {
                return Err(MassError::DuplicateFocalElement(subset));
            }
            total += mass;
        }
        if (total - 1.0).abs() > TOLERANCE {
            return Err(MassError::NotNormalized { total });
        }
        focal.retain(|_, mass| *mass > 0.0);
        Ok(Self {
            frame: Arc::clone(frame),
            focal,
        })
    }

    /// Build a mass function from (label-list, mass) pairs.
    ///
    /// Convenience for evidence-source adapters that speak labels rather
    /// than encodings.
    pub fn from_labelled<'a, I, S>(frame: &Arc<FrameOfDiscernment>, assignment: I) -> MassResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: IntoIterator<Item = &'a str>,
    {
        let mut pairs = Vec::new();
        for (labels, mass) in assignment {
            pairs.push((frame.subset(labels)?, mass));
        }
        Self::new(frame, pairs)
    }

    /// The vacuous mass function m(Ω) = 1: total ignorance.
    ///
    /// The identity element of Dempster's rule. Cannot fail.
    pub fn vacuous(frame: &Arc<FrameOfDiscernment>) -> Self {
        let mut focal = BTreeMap::new();
        focal.insert(frame.universal(), 1.0);
        Self {
            frame: Arc::clone(frame),
            focal,
        }
    }

    /// Simple support function: m(A) = w, m(Ω) = 1 − w.
    ///
    /// The shape produced by a scalar evidence reading of strength `w`
    /// for hypothesis set `A`. With w = 0, or A = Ω, this degenerates to
    /// the vacuous mass function.
    pub fn simple_support(
        frame: &Arc<FrameOfDiscernment>,
        focus: Subset,
        weight: f64,
    ) -> MassResult<Self> {
        if !frame.contains(focus) {
            return Err(MassError::ForeignSubset(focus));
        }
        if !(0.0..=1.0).contains(&weight) {
            return Err(MassError::InvalidMass {
                subset: focus,
                mass: weight,
            });
        }
        if focus.is_empty() && weight > 0.0 {
            return Err(MassError::EmptyFocalElement(weight));
        }
        let mut focal = BTreeMap::new();
        if weight > 0.0 {
            focal.insert(focus, weight);
        }
        let remainder = 1.0 - weight;
        if remainder > 0.0 {
            *focal.entry(frame.universal()).or_insert(0.0) += remainder;
        }
        Ok(Self {
            frame: Arc::clone(frame),
            focal,
        })
    }

    /// Shafer discounting: scale every focal mass by `reliability` and
    /// move the residue 1 − α onto Ω.
    ///
    /// Models a source that is only trusted with reliability α; at α = 0
    /// the result is vacuous, at α = 1 it is unchanged.
    pub fn discount(&self, reliability: f64) -> MassResult<Self> {
        if !(0.0..=1.0).contains(&reliability) {
            return Err(MassError::InvalidDiscount(reliability));
        }
        let mut focal: BTreeMap<Subset, f64> = self
            .focal
            .iter()
            .map(|(subset, mass)| (*subset, mass * reliability))
            .collect();
        let residue = 1.0 - reliability;
        if residue > 0.0 {
            *focal.entry(self.frame.universal()).or_insert(0.0) += residue;
        }
        focal.retain(|_, mass| *mass > 0.0);
        Ok(Self {
            frame: Arc::clone(&self.frame),
            focal,
        })
    }

    /// Internal constructor for values already normalized by combination.
    pub(crate) fn from_normalized(
        frame: Arc<FrameOfDiscernment>,
        focal: BTreeMap<Subset, f64>,
    ) -> Self {
        debug_assert!(!focal.contains_key(&Subset::EMPTY));
        debug_assert!({
            let total: f64 = focal.values().sum();
            (total - 1.0).abs() <= TOLERANCE
        });
        Self { frame, focal }
    }

    /// The frame this mass function is defined over.
    pub fn frame(&self) -> &Arc<FrameOfDiscernment> {
        &self.frame
    }

    /// m(A): the mass of `subset`, 0 if it is not a focal element.
    pub fn mass(&self, subset: Subset) -> f64 {
        self.focal.get(&subset).copied().unwrap_or(0.0)
    }

    /// Focal elements as (subset, mass) pairs, ascending by encoding.
    pub fn focal_elements(&self) -> impl Iterator<Item = (Subset, f64)> + '_ {
        self.focal.iter().map(|(subset, mass)| (*subset, *mass))
    }

    /// Number of focal elements.
    pub fn focal_count(&self) -> usize {
        self.focal.len()
    }

    /// Is this the vacuous mass function (single focal element Ω)?
    pub fn is_vacuous(&self) -> bool {
        self.focal.len() == 1 && self.focal.contains_key(&self.frame.universal())
    }

    /// m(Ω): the mass left on total ignorance.
    pub fn ignorance(&self) -> f64 {
        self.mass(self.frame.universal())
    }
}

impl fmt::Display for MassFunction {
    /// Focal elements by descending mass, e.g. `m({a}) = 0.6000`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<(Subset, f64)> = self.focal_elements().collect();
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        for (n, (subset, mass)) in entries.iter().enumerate() {
            if n > 0 {
                writeln!(f)?;
            }
            write!(f, "m({}) = {mass:.4}", self.frame.format_subset(*subset))?;
        }
        Ok(())
    }
}
