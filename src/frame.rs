//! Frame of discernment: the finite universe of atomic hypotheses
//!
//! A frame Ω is an ordered set of mutually exclusive, exhaustive hypothesis
//! labels. Every subset of Ω is encoded as a [`Subset`] bitset, so the set
//! algebra that belief-function theory leans on (intersection for
//! combination, subset tests for belief, overlap tests for plausibility)
//! costs one bitwise instruction each.
//!
//! Frames are immutable after construction and shared read-only, via
//! `Arc`, by every mass function built over them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hard upper bound on frame width: subsets are encoded in a `u64`.
///
/// Explicit power-set style enumeration stops being tractable well before
/// this bound; 20 hypotheses is a practical ceiling for most callers.
pub const MAX_HYPOTHESES: usize = 64;

/// Result type for frame operations
pub type FrameResult<T> = Result<T, FrameError>;

/// Errors raised while building a frame or resolving labels against it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("frame of discernment needs at least one hypothesis")]
    Empty,

    #[error("duplicate hypothesis label: {0:?}")]
    DuplicateLabel(String),

    #[error("frame of discernment holds at most 64 hypotheses, got {0}")]
    TooManyHypotheses(usize),

    #[error("unknown hypothesis label: {0:?}")]
    UnknownLabel(String),
}

/// A subset of a frame of discernment, encoded as a bitset.
///
/// Bit i is set exactly when the i-th hypothesis of the frame belongs to
/// the subset, so the canonical encoding of a subset is an integer in
/// `[0, 2^N)`. A `Subset` is meaningful only relative to the frame it was
/// built from; [`FrameOfDiscernment::contains`] checks that relationship.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Subset(u64);

impl Subset {
    /// The empty set ∅.
    pub const EMPTY: Subset = Subset(0);

    /// Subset holding the single hypothesis at `index`.
    ///
    /// `index` must be below [`MAX_HYPOTHESES`]; whether it lies inside a
    /// particular frame is the caller's concern.
    pub fn atom(index: usize) -> Subset {
        debug_assert!(index < MAX_HYPOTHESES);
        Subset(1 << index)
    }

    /// Raw bit encoding in `[0, 2^N)`.
    pub fn bits(self) -> u64 {
        self.0
    }

    /// Reconstruct a subset from its raw encoding.
    pub fn from_bits(bits: u64) -> Subset {
        Subset(bits)
    }

    /// A ∩ B
    pub fn intersection(self, other: Subset) -> Subset {
        Subset(self.0 & other.0)
    }

    /// A ∪ B
    pub fn union(self, other: Subset) -> Subset {
        Subset(self.0 | other.0)
    }

    /// Is this the empty set?
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// A ⊆ B
    pub fn is_subset_of(self, other: Subset) -> bool {
        self.0 & !other.0 == 0
    }

    /// A ∩ B ≠ ∅
    pub fn intersects(self, other: Subset) -> bool {
        self.0 & other.0 != 0
    }

    /// Does the subset contain the hypothesis at `index`?
    pub fn contains_atom(self, index: usize) -> bool {
        index < MAX_HYPOTHESES && self.0 & (1 << index) != 0
    }

    /// Number of hypotheses in the subset (|A|).
    pub fn cardinality(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Indices of the hypotheses in the subset, ascending.
    pub fn atom_indices(self) -> impl Iterator<Item = usize> {
        (0..MAX_HYPOTHESES).filter(move |i| self.0 & (1 << i) != 0)
    }
}

impl fmt::Display for Subset {
    /// Frame-agnostic rendering by hypothesis index, e.g. `{0, 2}`.
    ///
    /// [`FrameOfDiscernment::format_subset`] renders with labels instead.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "∅");
        }
        write!(f, "{{")?;
        for (n, i) in self.atom_indices().enumerate() {
            if n > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{i}")?;
        }
        write!(f, "}}")
    }
}

/// An immutable, ordered universe of atomic hypotheses.
///
/// Two frames compare equal when their label sequences are equal, so
/// cloned or deserialized frames interoperate with the originals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FrameOfDiscernment {
    labels: Vec<String>,
}

impl FrameOfDiscernment {
    /// Build a frame from an ordered list of distinct hypothesis labels.
    pub fn new<I, S>(labels: I) -> FrameResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(FrameError::Empty);
        }
        if labels.len() > MAX_HYPOTHESES {
            return Err(FrameError::TooManyHypotheses(labels.len()));
        }
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(FrameError::DuplicateLabel(label.clone()));
            }
        }
        Ok(Self { labels })
    }

    /// The two-hypothesis frame `{x, ¬x}` for a boolean variable.
    ///
    /// Evidence about a single proposition is the degenerate case of the
    /// general engine, not a separate code path.
    pub fn binary(label: impl Into<String>) -> Self {
        let label = label.into();
        let negated = format!("¬{label}");
        Self {
            labels: vec![label, negated],
        }
    }

    /// Number of atomic hypotheses N.
    pub fn hypothesis_count(&self) -> usize {
        self.labels.len()
    }

    /// The hypothesis labels, in frame order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label at `index`, if it exists.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Position of `label` in the frame. Linear scan; frames are small.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// The singleton subset `{label}`.
    pub fn singleton(&self, label: &str) -> FrameResult<Subset> {
        match self.index_of(label) {
            Some(index) => Ok(Subset::atom(index)),
            None => Err(FrameError::UnknownLabel(label.to_string())),
        }
    }

    /// Build a subset from a list of labels.
    pub fn subset<I, S>(&self, labels: I) -> FrameResult<Subset>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut subset = Subset::EMPTY;
        for label in labels {
            subset = subset.union(self.singleton(label.as_ref())?);
        }
        Ok(subset)
    }

    /// The universal set Ω (total ignorance).
    pub fn universal(&self) -> Subset {
        if self.labels.len() == MAX_HYPOTHESES {
            Subset(u64::MAX)
        } else {
            Subset((1u64 << self.labels.len()) - 1)
        }
    }

    /// Complement Ā within this frame.
    pub fn complement(&self, subset: Subset) -> Subset {
        Subset(!subset.0 & self.universal().0)
    }

    /// Is `subset` the whole frame?
    pub fn is_universal(&self, subset: Subset) -> bool {
        subset == self.universal()
    }

    /// Does `subset` use only hypotheses of this frame?
    pub fn contains(&self, subset: Subset) -> bool {
        subset.is_subset_of(self.universal())
    }

    /// Labels of the hypotheses in `subset`, in frame order.
    pub fn members(&self, subset: Subset) -> impl Iterator<Item = &str> {
        self.labels
            .iter()
            .enumerate()
            .filter(move |(i, _)| subset.contains_atom(*i))
            .map(|(_, label)| label.as_str())
    }

    /// Human-readable rendering: `∅`, `Ω`, or `{a, b}`.
    pub fn format_subset(&self, subset: Subset) -> String {
        if subset.is_empty() {
            "∅".to_string()
        } else if self.is_universal(subset) {
            "Ω".to_string()
        } else {
            let mut out = String::from("{");
            for (n, label) in self.members(subset).enumerate() {
                if n > 0 {
                    out.push_str(", ");
                }
                out.push_str(label);
            }
            out.push('}');
            out
        }
    }
}

impl TryFrom<Vec<String>> for FrameOfDiscernment {
    type Error = FrameError;

    fn try_from(labels: Vec<String>) -> FrameResult<Self> {
        Self::new(labels)
    }
}

impl From<FrameOfDiscernment> for Vec<String> {
    fn from(frame: FrameOfDiscernment) -> Self {
        frame.labels
    }
}

impl fmt::Display for FrameOfDiscernment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ω = {{{}}}", self.labels.join(", "))
    }
}
