#![forbid(unsafe_code)]

//! The six sorting drivers.
//!
//! Each module exposes one `sort` function written like the textbook
//! algorithm, with every look and every move expressed as an engine
//! primitive. [`Algorithm`] selects among them and implements
//! [`Driver`] so a session can run it.
//!
//! Every driver leaves each index sorted on normal completion, including for
//! empty and single-element arrays.

use std::fmt;
use std::str::FromStr;

use sortviz_core::BarValue;
use sortviz_runtime::{Driver, Engine, StepResult};

pub mod bubble;
pub mod heap;
pub mod insertion;
pub mod merge;
pub mod quick;
pub mod selection;

/// Asymptotic cost of an algorithm, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Complexity {
    pub best: &'static str,
    pub average: &'static str,
    pub worst: &'static str,
}

/// One of the supported sorting algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    #[default]
    Bubble,
    Insertion,
    Selection,
    Merge,
    Quick,
    Heap,
}

impl Algorithm {
    /// Every algorithm, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Bubble,
        Self::Insertion,
        Self::Selection,
        Self::Merge,
        Self::Quick,
        Self::Heap,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bubble => "Bubble Sort",
            Self::Insertion => "Insertion Sort",
            Self::Selection => "Selection Sort",
            Self::Merge => "Merge Sort",
            Self::Quick => "Quick Sort",
            Self::Heap => "Heap Sort",
        }
    }

    /// Short lowercase identifier, as accepted on the command line.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Bubble => "bubble",
            Self::Insertion => "insertion",
            Self::Selection => "selection",
            Self::Merge => "merge",
            Self::Quick => "quick",
            Self::Heap => "heap",
        }
    }

    /// Whether equal values keep their input order.
    pub const fn is_stable(self) -> bool {
        matches!(self, Self::Bubble | Self::Insertion | Self::Merge)
    }

    pub const fn complexity(self) -> Complexity {
        const QUADRATIC: &str = "O(n^2)";
        const LINEARITHMIC: &str = "O(n log n)";
        match self {
            Self::Bubble | Self::Insertion => Complexity {
                best: "O(n)",
                average: QUADRATIC,
                worst: QUADRATIC,
            },
            Self::Selection => Complexity {
                best: QUADRATIC,
                average: QUADRATIC,
                worst: QUADRATIC,
            },
            Self::Merge | Self::Heap => Complexity {
                best: LINEARITHMIC,
                average: LINEARITHMIC,
                worst: LINEARITHMIC,
            },
            Self::Quick => Complexity {
                best: LINEARITHMIC,
                average: LINEARITHMIC,
                worst: QUADRATIC,
            },
        }
    }

    /// Next algorithm in menu order, wrapping.
    pub fn next(self) -> Self {
        let i = self.position();
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Previous algorithm in menu order, wrapping.
    pub fn prev(self) -> Self {
        let i = self.position();
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|a| *a == self).unwrap_or(0)
    }

    /// Run this algorithm's driver on `engine`.
    pub fn sort<V: BarValue>(self, engine: &Engine<V>) -> StepResult<()> {
        tracing::debug!(algorithm = self.slug(), len = engine.len(), "sort begin");
        match self {
            Self::Bubble => bubble::sort(engine),
            Self::Insertion => insertion::sort(engine),
            Self::Selection => selection::sort(engine),
            Self::Merge => merge::sort(engine),
            Self::Quick => quick::sort(engine),
            Self::Heap => heap::sort(engine),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Algorithm::name(*self))
    }
}

/// Name that matches no algorithm.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorithm {0:?} (expected one of: bubble, insertion, selection, merge, quick, heap)")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    /// Accepts the slug or the display name, case-insensitively, with or
    /// without a "sort" suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        let stem = normalized.strip_suffix(" sort").unwrap_or(normalized.as_str()).trim();
        Self::ALL
            .into_iter()
            .find(|a| a.slug() == stem)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

impl<V: BarValue> Driver<V> for Algorithm {
    fn name(&self) -> &'static str {
        Algorithm::name(*self)
    }

    fn run(&self, engine: &Engine<V>) -> StepResult<()> {
        self.sort(engine)
    }
}

/// Mark arrays too short to need sorting. Returns `true` when the caller is
/// done.
pub(crate) fn settle_trivial<V: BarValue>(engine: &Engine<V>) -> StepResult<bool> {
    match engine.len() {
        0 => Ok(true),
        1 => engine.mark_sorted(0).map(|()| true),
        _ => Ok(false),
    }
}

/// `lo..hi` as an index list.
pub(crate) fn span(lo: usize, hi: usize) -> Vec<usize> {
    (lo..hi).collect()
}
