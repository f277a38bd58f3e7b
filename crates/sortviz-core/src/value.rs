#![forbid(unsafe_code)]

//! Values that can be drawn as bars.

use std::fmt::Debug;

/// A value stored in the array model.
///
/// Ordering drives the sorting drivers; [`magnitude`](Self::magnitude) drives
/// the geometry engine. Keeping the two separate lets tests attach identity
/// tags to equal keys (to observe stability) without changing how bars are
/// sized.
pub trait BarValue: Copy + Ord + Debug + Send + Sync + 'static {
    /// Bar magnitude used for layout.
    fn magnitude(&self) -> u32;
}

impl BarValue for u32 {
    #[inline]
    fn magnitude(&self) -> u32 {
        *self
    }
}

impl BarValue for u16 {
    #[inline]
    fn magnitude(&self) -> u32 {
        u32::from(*self)
    }
}

impl BarValue for u8 {
    #[inline]
    fn magnitude(&self) -> u32 {
        u32::from(*self)
    }
}
