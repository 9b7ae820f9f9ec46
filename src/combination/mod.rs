//! Dempster's rule of combination with explicit conflict tracking
//!
//! Two independent sources m₁ and m₂ over the same frame combine by
//! pairwise intersection of their focal elements:
//!
//! ```text
//! K        = Σ m₁(B)·m₂(C)          over B ∩ C = ∅     (conflict)
//! m(D)     = Σ m₁(B)·m₂(C) / (1−K)  over B ∩ C = D ≠ ∅
//! ```
//!
//! The conflict mass K is the evidence the two sources assign to
//! incompatible subsets. It is reported next to every result so callers
//! can treat a high-conflict fusion as a data-quality signal; at K = 1
//! the rule is undefined (division by zero) and [`combine`] returns
//! [`CombinationError::TotalConflict`] instead of a NaN.
//!
//! The double pass is O(|focal(m₁)| · |focal(m₂)|). That bound is why
//! mass functions store focal elements sparsely: a dense power-set
//! table would force O(2^N · 2^N).
//!
//! The rule is commutative and associative, so a sequence of sources
//! folds pairwise in any order; [`combine_all`] is the left fold.
//! The vacuous mass function is its identity element.

mod trace;

pub use trace::{combine_traced, CombinationTrace, TraceCell};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::frame::{FrameOfDiscernment, Subset};
use crate::mass::MassFunction;
use crate::TOLERANCE;

/// Errors raised by Dempster combination
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CombinationError {
    #[error("total conflict (K = {conflict}): the sources are mutually exclusive")]
    TotalConflict { conflict: f64 },

    #[error("mass functions are defined over different frames of discernment")]
    FrameMismatch,

    #[error("cannot combine an empty sequence of mass functions")]
    NoSources,
}

/// The conflict mass K ∈ [0, 1] observed while combining two sources.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Conflict(f64);

impl Conflict {
    /// Wrap a raw conflict mass, clamping to [0, 1].
    pub fn new(value: f64) -> Self {
        Conflict(value.clamp(0.0, 1.0))
    }

    /// No conflict at all.
    pub fn none() -> Self {
        Conflict(0.0)
    }

    /// The underlying conflict mass.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Below the 5% band where sources effectively agree.
    pub fn is_negligible(self) -> bool {
        self.0 < 0.05
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0.05 {
            write!(f, "negligible conflict ({:.1}%)", self.0 * 100.0)
        } else if self.0 < 0.3 {
            write!(f, "minor conflict ({:.1}%)", self.0 * 100.0)
        } else if self.0 < 0.7 {
            write!(f, "moderate conflict ({:.1}%)", self.0 * 100.0)
        } else {
            write!(f, "severe conflict ({:.1}%)", self.0 * 100.0)
        }
    }
}

/// A combined mass function together with the conflict spent to get it.
///
/// Returned by value; holds no reference to the inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    /// The normalized combined mass function.
    pub mass: MassFunction,
    /// Conflict mass K observed before normalization. For a fold over
    /// several sources, the aggregate share of mass discarded across
    /// all pairwise steps.
    pub conflict: Conflict,
}

/// Combine two mass functions by Dempster's rule.
///
/// Pure: inputs are untouched and a fresh mass function is returned.
/// Fails with [`CombinationError::FrameMismatch`] when the operands were
/// built over different frames, and [`CombinationError::TotalConflict`]
/// when 1 − K vanishes within [`TOLERANCE`].
pub fn combine(m1: &MassFunction, m2: &MassFunction) -> Result<Combination, CombinationError> {
    check_frames(m1, m2)?;
    let mut accumulator: FxHashMap<Subset, f64> = FxHashMap::default();
    for (left, left_mass) in m1.focal_elements() {
        for (right, right_mass) in m2.focal_elements() {
            *accumulator
                .entry(left.intersection(right))
                .or_insert(0.0) += left_mass * right_mass;
        }
    }
    let conflict = accumulator.remove(&Subset::EMPTY).unwrap_or(0.0);
    normalize(m1.frame(), accumulator, conflict)
}

/// Left fold of [`combine`] over one or more sources.
///
/// The result is independent of fold order up to floating-point
/// rounding. The reported conflict is the aggregate mass discarded
/// across the fold, 1 − Π(1 − Kᵢ); a single source folds to itself
/// with zero conflict.
pub fn combine_all<'a, I>(sources: I) -> Result<Combination, CombinationError>
where
    I: IntoIterator<Item = &'a MassFunction>,
{
    let mut iter = sources.into_iter();
    let first = iter.next().ok_or(CombinationError::NoSources)?;
    let mut mass = first.clone();
    let mut survival = 1.0;
    for next in iter {
        let step = combine(&mass, next)?;
        survival *= 1.0 - step.conflict.value();
        mass = step.mass;
    }
    Ok(Combination {
        mass,
        conflict: Conflict::new(1.0 - survival),
    })
}

fn check_frames(m1: &MassFunction, m2: &MassFunction) -> Result<(), CombinationError> {
    // ptr_eq catches the common shared-Arc case without a label compare
    if Arc::ptr_eq(m1.frame(), m2.frame()) || m1.frame() == m2.frame() {
        Ok(())
    } else {
        Err(CombinationError::FrameMismatch)
    }
}

fn normalize(
    frame: &Arc<FrameOfDiscernment>,
    accumulator: FxHashMap<Subset, f64>,
    conflict: f64,
) -> Result<Combination, CombinationError> {
    if 1.0 - conflict < TOLERANCE {
        return Err(CombinationError::TotalConflict { conflict });
    }
    let denominator = 1.0 - conflict;
    let focal: BTreeMap<Subset, f64> = accumulator
        .into_iter()
        .map(|(subset, mass)| (subset, mass / denominator))
        .collect();
    let mass = MassFunction::from_normalized(Arc::clone(frame), focal);
    tracing::debug!(
        conflict,
        focal = mass.focal_count(),
        "dempster combination complete"
    );
    Ok(Combination {
        mass,
        conflict: Conflict::new(conflict),
    })
}
