#![forbid(unsafe_code)]

//! Element state model: per-position visual layers.
//!
//! Each position carries up to four layers:
//!
//! | Layer | Bound to | Cleared by |
//! |---|---|---|
//! | `comparing` | position (the driver's current pointers) | `set_comparing` diff |
//! | `special` | value (follows swaps) | `set_special` diff, `clear_special`, `mark_sorted` |
//! | `partly_sorted` | value (follows swaps) | `clear_partly_sorted`, `mark_sorted` |
//! | `sorted` | position (finality of a slot) | only [`ElementStates::reset`] |
//!
//! `comparing` and `special` may co-occur (anchor vs. candidate). Both raise
//! the bar. `sorted` is terminal: assigning it drops `special` and
//! `partly_sorted` for that index.
//!
//! Every membership change counts as one transition. Replacing a tracked set
//! with the set it already holds performs zero transitions, which is what
//! makes repeated highlights idempotent.

use std::collections::BTreeSet;

/// The single colour class a bar resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisualState {
    #[default]
    Idle,
    Comparing,
    Special,
    PartlySorted,
    Sorted,
}

impl VisualState {
    /// Short lowercase name, used in traces and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Comparing => "comparing",
            Self::Special => "special",
            Self::PartlySorted => "partly-sorted",
            Self::Sorted => "sorted",
        }
    }
}

/// All layers of one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementState {
    pub comparing: bool,
    pub special: bool,
    pub partly_sorted: bool,
    pub sorted: bool,
}

impl ElementState {
    /// Raised bars are lifted above the baseline by the geometry engine.
    #[inline]
    pub const fn is_raised(&self) -> bool {
        self.comparing || self.special
    }

    /// Resolve the layers to one colour class.
    ///
    /// Precedence: special, comparing, sorted, partly sorted, idle.
    pub const fn visual(&self) -> VisualState {
        if self.special {
            VisualState::Special
        } else if self.comparing {
            VisualState::Comparing
        } else if self.sorted {
            VisualState::Sorted
        } else if self.partly_sorted {
            VisualState::PartlySorted
        } else {
            VisualState::Idle
        }
    }
}

/// Set-based trackers for the layered states of `len` positions.
#[derive(Debug, Clone, Default)]
pub struct ElementStates {
    len: usize,
    comparing: BTreeSet<usize>,
    special: BTreeSet<usize>,
    partly: BTreeSet<usize>,
    sorted: Vec<bool>,
    transitions: u64,
}

impl ElementStates {
    /// Create an all-idle model for `len` positions.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            sorted: vec![false; len],
            ..Self::default()
        }
    }

    /// Number of positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every layer and resize to `len` positions.
    ///
    /// The transition counter is kept; it is a lifetime total.
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.comparing.clear();
        self.special.clear();
        self.partly.clear();
        self.sorted.clear();
        self.sorted.resize(len, false);
    }

    /// Total membership changes since creation.
    #[inline]
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Layers at `index`. Out-of-range indices read as idle.
    pub fn state(&self, index: usize) -> ElementState {
        ElementState {
            comparing: self.comparing.contains(&index),
            special: self.special.contains(&index),
            partly_sorted: self.partly.contains(&index),
            sorted: self.sorted.get(index).copied().unwrap_or(false),
        }
    }

    /// Layers for every position, in index order.
    pub fn states(&self) -> Vec<ElementState> {
        (0..self.len).map(|i| self.state(i)).collect()
    }

    pub fn comparing(&self) -> impl Iterator<Item = usize> + '_ {
        self.comparing.iter().copied()
    }

    pub fn special(&self) -> impl Iterator<Item = usize> + '_ {
        self.special.iter().copied()
    }

    pub fn partly_sorted(&self) -> impl Iterator<Item = usize> + '_ {
        self.partly.iter().copied()
    }

    #[inline]
    pub fn is_sorted(&self, index: usize) -> bool {
        self.sorted.get(index).copied().unwrap_or(false)
    }

    /// `true` when every position is sorted (vacuously true when empty).
    pub fn all_sorted(&self) -> bool {
        self.sorted.iter().all(|&s| s)
    }

    /// Replace the comparing set with exactly `indices`.
    ///
    /// Returns the number of transitions performed.
    pub fn set_comparing(&mut self, indices: &[usize]) -> usize {
        let changed = replace_set(&mut self.comparing, indices);
        self.transitions += changed as u64;
        changed
    }

    /// Replace the special set with exactly `indices`.
    ///
    /// New members leave the partly-sorted set; the two layers never
    /// overlap.
    pub fn set_special(&mut self, indices: &[usize]) -> usize {
        let mut changed = replace_set(&mut self.special, indices);
        changed += indices.iter().filter(|&&i| self.partly.remove(&i)).count();
        self.count(changed)
    }

    /// Add `index` to the special set without touching other members.
    pub fn add_special(&mut self, index: usize) -> usize {
        let changed = usize::from(self.special.insert(index)) + usize::from(self.partly.remove(&index));
        self.count(changed)
    }

    /// Remove `indices` from the special set.
    pub fn clear_special(&mut self, indices: &[usize]) -> usize {
        let removed = indices.iter().filter(|&&i| self.special.remove(&i)).count();
        self.count(removed)
    }

    /// Union `indices` into the partly-sorted set, dropping their special
    /// layer.
    pub fn mark_partly_sorted(&mut self, indices: &[usize]) -> usize {
        let added = indices.iter().filter(|&&i| self.partly.insert(i)).count();
        let lowered = indices.iter().filter(|&&i| self.special.remove(&i)).count();
        self.count(added + lowered)
    }

    /// Remove `indices` from the partly-sorted set.
    pub fn clear_partly_sorted(&mut self, indices: &[usize]) -> usize {
        let removed = indices.iter().filter(|&&i| self.partly.remove(&i)).count();
        self.count(removed)
    }

    /// Remove `index` from the comparing set.
    pub fn remove_comparing(&mut self, index: usize) -> usize {
        let removed = usize::from(self.comparing.remove(&index));
        self.count(removed)
    }

    /// Drop every comparing membership.
    pub fn clear_comparing(&mut self) -> usize {
        let removed = self.comparing.len();
        self.comparing.clear();
        self.count(removed)
    }

    /// Mark `index` as sorted, dropping its special and partly-sorted layers.
    pub fn mark_sorted(&mut self, index: usize) -> usize {
        let mut changed = 0;
        if let Some(slot) = self.sorted.get_mut(index)
            && !*slot
        {
            *slot = true;
            changed += 1;
        }
        changed += usize::from(self.special.remove(&index));
        changed += usize::from(self.partly.remove(&index));
        self.count(changed)
    }

    /// Exchange the value-bound layers (`special`, `partly_sorted`) of two
    /// positions. `comparing` and `sorted` stay where they are.
    pub fn swap_layers(&mut self, i: usize, j: usize) -> usize {
        if i == j {
            return 0;
        }
        let changed =
            swap_membership(&mut self.special, i, j) + swap_membership(&mut self.partly, i, j);
        self.count(changed)
    }

    fn count(&mut self, changed: usize) -> usize {
        self.transitions += changed as u64;
        changed
    }
}

/// Symmetric-diff `set` into `next`: remove members not in `next`, then add
/// the new ones.
fn replace_set(set: &mut BTreeSet<usize>, next: &[usize]) -> usize {
    let next: BTreeSet<usize> = next.iter().copied().collect();
    let before = set.len();
    set.retain(|i| next.contains(i));
    let removed = before - set.len();
    let mut added = 0;
    for i in next {
        if set.insert(i) {
            added += 1;
        }
    }
    removed + added
}

fn swap_membership(set: &mut BTreeSet<usize>, a: usize, b: usize) -> usize {
    match (set.contains(&a), set.contains(&b)) {
        (true, false) => {
            set.remove(&a);
            set.insert(b);
            2
        }
        (false, true) => {
            set.remove(&b);
            set.insert(a);
            2
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_model_is_idle() {
        let states = ElementStates::new(4);
        assert!(states.states().iter().all(|s| s.visual() == VisualState::Idle));
        assert!(!states.all_sorted());
    }

    #[test]
    fn empty_model_is_vacuously_sorted() {
        assert!(ElementStates::new(0).all_sorted());
    }

    #[test]
    fn set_comparing_is_symmetric_diff() {
        let mut states = ElementStates::new(5);
        assert_eq!(states.set_comparing(&[0, 1]), 2);
        assert_eq!(states.set_comparing(&[1, 2]), 2);
        assert_eq!(states.comparing().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn repeated_highlight_is_idempotent() {
        let mut states = ElementStates::new(5);
        states.set_comparing(&[3, 1]);
        let before = states.transitions();
        assert_eq!(states.set_comparing(&[1, 3]), 0);
        assert_eq!(states.transitions(), before);
    }

    #[test]
    fn comparing_and_special_coexist() {
        let mut states = ElementStates::new(3);
        states.set_comparing(&[1]);
        states.set_special(&[1]);
        let s = states.state(1);
        assert!(s.comparing && s.special);
        assert!(s.is_raised());
        assert_eq!(s.visual(), VisualState::Special);
    }

    #[test]
    fn mark_partly_sorted_is_union_only() {
        let mut states = ElementStates::new(4);
        states.mark_partly_sorted(&[0, 1]);
        states.mark_partly_sorted(&[2]);
        assert_eq!(states.partly_sorted().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(states.mark_partly_sorted(&[1]), 0);
    }

    #[test]
    fn special_and_partly_sorted_exclude_each_other() {
        let mut states = ElementStates::new(4);
        states.mark_partly_sorted(&[1, 2, 3]);
        assert_eq!(states.set_special(&[1]), 2);
        assert!(states.state(1).special && !states.state(1).partly_sorted);

        assert_eq!(states.add_special(2), 2);
        assert!(!states.state(2).partly_sorted);
        assert_eq!(states.add_special(2), 0);

        assert_eq!(states.mark_partly_sorted(&[1]), 2);
        assert!(states.state(1).partly_sorted && !states.state(1).special);
        assert_eq!(states.special().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn mark_sorted_clears_value_layers() {
        let mut states = ElementStates::new(3);
        states.mark_partly_sorted(&[2]);
        states.set_special(&[1, 2]);
        states.mark_sorted(2);
        let s = states.state(2);
        assert!(s.sorted && !s.special && !s.partly_sorted);
        assert_eq!(states.mark_sorted(2), 0);
    }

    #[test]
    fn comparing_outranks_sorted() {
        let mut states = ElementStates::new(2);
        states.mark_sorted(0);
        states.set_comparing(&[0]);
        assert_eq!(states.state(0).visual(), VisualState::Comparing);
        states.set_comparing(&[]);
        assert_eq!(states.state(0).visual(), VisualState::Sorted);
    }

    #[test]
    fn swap_layers_moves_value_bound_layers_only() {
        let mut states = ElementStates::new(3);
        states.set_special(&[0]);
        states.mark_partly_sorted(&[2]);
        states.set_comparing(&[0]);
        states.mark_sorted(1);
        states.swap_layers(0, 2);
        assert!(states.state(2).special);
        assert!(states.state(0).partly_sorted);
        assert!(states.state(0).comparing);
        assert!(states.state(1).sorted);
    }

    #[test]
    fn swap_layers_round_trip() {
        let mut states = ElementStates::new(4);
        states.set_special(&[1]);
        states.mark_partly_sorted(&[1, 3]);
        let before = states.states();
        states.swap_layers(1, 2);
        states.swap_layers(1, 2);
        assert_eq!(states.states(), before);
    }

    #[test]
    fn reset_clears_everything() {
        let mut states = ElementStates::new(3);
        states.set_comparing(&[0]);
        states.mark_sorted(1);
        states.reset(5);
        assert_eq!(states.len(), 5);
        assert!(states.states().iter().all(|s| *s == ElementState::default()));
    }
}
