#![forbid(unsafe_code)]

//! Algorithm driver protocol.
//!
//! A driver is a sequential procedure over an [`Engine`]. It may only touch
//! the array through engine primitives, must propagate every error (in
//! particular [`StepError::Cancelled`](crate::StepError::Cancelled)) with
//! `?`, and on normal completion must leave every index sorted.

use sortviz_core::BarValue;

use crate::engine::Engine;
use crate::error::StepResult;

/// One sorting algorithm, expressed as primitive calls.
pub trait Driver<V: BarValue = u32>: Send + Sync {
    /// Display name.
    fn name(&self) -> &'static str;

    /// Sort the engine's board.
    fn run(&self, engine: &Engine<V>) -> StepResult<()>;
}

/// Driver built from a name and a function.
///
/// ```
/// use sortviz_runtime::driver::{Driver, FnDriver};
/// use sortviz_runtime::engine::Engine;
///
/// let mark_all = FnDriver::new("mark-all", |engine: &Engine| {
///     (0..engine.len()).try_for_each(|i| engine.mark_sorted(i))
/// });
/// let (engine, _) = Engine::detached(vec![1u32, 2]);
/// mark_all.run(&engine).unwrap();
/// ```
pub struct FnDriver<F> {
    name: &'static str,
    run: F,
}

impl<F> FnDriver<F> {
    pub fn new(name: &'static str, run: F) -> Self {
        Self { name, run }
    }
}

impl<V, F> Driver<V> for FnDriver<F>
where
    V: BarValue,
    F: Fn(&Engine<V>) -> StepResult<()> + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn run(&self, engine: &Engine<V>) -> StepResult<()> {
        (self.run)(engine)
    }
}
