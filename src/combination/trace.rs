//! Pairwise combination trace: the full m₁ × m₂ product table
//!
//! [`combine_traced`] records every cell of the intersection table that
//! Dempster's rule walks, so a caller can show where the conflict came
//! from instead of reporting a bare K. The trace is an in-memory value;
//! rendering beyond [`fmt::Display`] is the consumer's business.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::frame::{FrameOfDiscernment, Subset};
use crate::mass::MassFunction;

use super::{check_frames, normalize, Combination, CombinationError, Conflict};

/// One cell of the combination table: m₁(left) · m₂(right) flowing into
/// the intersection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceCell {
    pub left: Subset,
    pub right: Subset,
    pub product: f64,
    pub intersection: Subset,
}

impl TraceCell {
    /// Did this cell feed the conflict mass K?
    pub fn is_conflicting(&self) -> bool {
        self.intersection.is_empty()
    }
}

/// The recorded product table of one pairwise combination.
#[derive(Debug, Clone, Serialize)]
pub struct CombinationTrace {
    frame: Arc<FrameOfDiscernment>,
    cells: Vec<TraceCell>,
    conflict: Conflict,
}

impl CombinationTrace {
    /// All cells, in m₁-major order.
    pub fn cells(&self) -> &[TraceCell] {
        &self.cells
    }

    /// The conflict mass K of this combination.
    pub fn conflict(&self) -> Conflict {
        self.conflict
    }

    /// The factor 1 / (1 − K) applied to every surviving cell.
    pub fn normalization(&self) -> f64 {
        1.0 / (1.0 - self.conflict.value())
    }
}

impl fmt::Display for CombinationTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            write!(
                f,
                "m1({}) · m2({}) = {:.4} → {}",
                self.frame.format_subset(cell.left),
                self.frame.format_subset(cell.right),
                cell.product,
                self.frame.format_subset(cell.intersection),
            )?;
            if cell.is_conflicting() {
                write!(f, " (conflict)")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "conflict K = {:.4}", self.conflict.value())?;
        write!(f, "normalization 1/(1 − K) = {:.4}", self.normalization())
    }
}

/// [`combine`](super::combine), but also return the full product table.
///
/// Same contract and failure modes; costs one extra allocation per cell.
pub fn combine_traced(
    m1: &MassFunction,
    m2: &MassFunction,
) -> Result<(Combination, CombinationTrace), CombinationError> {
    check_frames(m1, m2)?;
    let mut cells = Vec::with_capacity(m1.focal_count() * m2.focal_count());
    for (left, left_mass) in m1.focal_elements() {
        for (right, right_mass) in m2.focal_elements() {
            cells.push(TraceCell {
                left,
                right,
                product: left_mass * right_mass,
                intersection: left.intersection(right),
            });
        }
    }

    let mut accumulator: FxHashMap<Subset, f64> = FxHashMap::default();
    let mut conflict = 0.0;
    for cell in &cells {
        if cell.is_conflicting() {
            conflict += cell.product;
        } else {
            *accumulator.entry(cell.intersection).or_insert(0.0) += cell.product;
        }
    }

    let combination = normalize(m1.frame(), accumulator, conflict)?;
    let trace = CombinationTrace {
        frame: Arc::clone(m1.frame()),
        cells,
        conflict: combination.conflict,
    };
    Ok((combination, trace))
}
