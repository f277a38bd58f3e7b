#![forbid(unsafe_code)]

//! Step trace: a log of every state-changing primitive.
//!
//! Recording is opt-in per board. Values are stored as magnitudes so one
//! trace type serves every [`BarValue`](sortviz_core::BarValue).

use sortviz_core::VisualState;

use crate::engine::Settle;

/// One state-changing primitive call, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Highlight(Vec<usize>),
    HighlightWithAnchor {
        anchors: Vec<usize>,
        candidates: Vec<usize>,
    },
    MarkSpecial(Vec<usize>),
    ClearSpecial(Vec<usize>),
    RaiseSpecial(usize),
    LowerSpecial {
        index: usize,
        sorted: bool,
    },
    MarkPartlySorted(Vec<usize>),
    ClearPartlySorted(Vec<usize>),
    MarkSorted(usize),
    CompareAgainst {
        index: usize,
        pivot: usize,
    },
    ClearComparison,
    Lower {
        index: usize,
        settle: Settle,
    },
    /// `a` and `b` are the magnitudes at `i` and `j` before the exchange.
    Swap {
        i: usize,
        j: usize,
        a: u32,
        b: u32,
    },
    Overwrite {
        index: usize,
        value: u32,
    },
    Rotate {
        from: usize,
        to: usize,
    },
    InsertShift {
        from: usize,
        to: usize,
        anchor: Option<usize>,
    },
    Flash {
        index: usize,
        tone: VisualState,
        times: u32,
    },
}

impl Step {
    /// `true` for steps that move values.
    pub fn moves_data(&self) -> bool {
        matches!(
            self,
            Self::Swap { .. } | Self::Overwrite { .. } | Self::Rotate { .. } | Self::InsertShift { .. }
        )
    }
}

/// Split a trace into the segments between `Highlight([])` markers.
///
/// Drivers that clear their comparison between passes produce one segment
/// per pass; an empty trailing segment is dropped.
pub fn passes(trace: &[Step]) -> Vec<&[Step]> {
    let mut out: Vec<&[Step]> = trace
        .split(|step| matches!(step, Step::Highlight(indices) if indices.is_empty()))
        .collect();
    if out.last().is_some_and(|last| last.is_empty()) {
        out.pop();
    }
    out
}
