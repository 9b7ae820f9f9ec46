//! Dempster-Shafer evidence combination for finite frames of discernment
//!
//! `doxa` implements the computational core of belief-function theory:
//! basic belief assignments (mass functions) over the subsets of a finite
//! hypothesis frame, the derived belief / plausibility / commonality
//! measures, Dempster's rule of combination with explicit conflict
//! tracking, and pignistic decision extraction.
//!
//! # Architecture
//!
//! ```text
//! FrameOfDiscernment ──▶ MassFunction ──▶ combine ──▶ Combination (mass + K)
//!        │                    │
//!        │                    ├──▶ belief / plausibility / commonality
//!        │                    └──▶ pignistic / rank
//! ```
//!
//! Evidence sources construct one [`MassFunction`] each over a shared
//! [`FrameOfDiscernment`]; [`combine`] fuses them pairwise or as a fold;
//! the fused mass function answers belief queries and yields a
//! decision-ready probability distribution.
//!
//! # Design Principles
//!
//! 1. **Subsets are bitsets**: every subset of the frame is a `u64`
//!    encoding, so intersection, union and subset tests are single
//!    bitwise instructions.
//!
//! 2. **Sparsity is the contract**: only focal elements (subsets with
//!    strictly positive mass) are stored. Every measure is O(|focal|),
//!    never O(2^N), and combination is O(|focal₁| · |focal₂|).
//!
//! 3. **Conflict is data, not noise**: Dempster's rule reports the
//!    conflict mass K next to every combined result, and total conflict
//!    (K = 1) is a typed error, never a NaN.
//!
//! 4. **Values are immutable**: mass functions never mutate after
//!    construction; combination returns new values, and read-only
//!    sharing across threads needs no locking.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use doxa::{combine, FrameOfDiscernment, MassFunction};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = Arc::new(FrameOfDiscernment::new(["a", "b"])?);
//! let a = frame.singleton("a")?;
//! let b = frame.singleton("b")?;
//!
//! let m1 = MassFunction::new(&frame, [(a, 0.6), (frame.universal(), 0.4)])?;
//! let m2 = MassFunction::new(&frame, [(b, 0.3), (frame.universal(), 0.7)])?;
//!
//! let fused = combine(&m1, &m2)?;
//! assert!((fused.conflict.value() - 0.18).abs() < 1e-9);
//! assert!((fused.mass.mass(a) - 0.42 / 0.82).abs() < 1e-9);
//!
//! let betp = fused.mass.pignistic();
//! assert_eq!(betp.best().0, "a");
//! # Ok(())
//! # }
//! ```

pub mod combination;
pub mod decision;
pub mod frame;
pub mod mass;
pub mod measures;

pub use combination::{
    combine, combine_all, combine_traced, Combination, CombinationError, CombinationTrace,
    Conflict, TraceCell,
};
pub use decision::{rank, Pignistic, RankedHypothesis};
pub use frame::{FrameError, FrameOfDiscernment, FrameResult, Subset, MAX_HYPOTHESES};
pub use mass::{MassError, MassFunction, MassResult};
pub use measures::BeliefPlausibility;

/// Absolute tolerance for normalization and identity checks on mass values.
///
/// Masses are f64; a valid assignment must sum to 1 within this bound, and
/// the combination denominator 1 − K is treated as zero below it.
pub const TOLERANCE: f64 = 1e-9;
