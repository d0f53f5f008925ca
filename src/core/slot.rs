//! Player slot identification and per-slot data storage.
//!
//! ## SlotId
//!
//! A match always has exactly two slots. `SlotId::First` is the slot that
//! moves first once the match starts; the binding is fixed at creation.
//!
//! ## SlotPair
//!
//! Fixed two-entry storage indexed by `SlotId`, with a split borrow for
//! code that has to touch both slots at once (combat, end of turn).

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two per-match player slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotId {
    First,
    Second,
}

impl SlotId {
    /// Both slots, first then second.
    pub const BOTH: [SlotId; 2] = [SlotId::First, SlotId::Second];

    /// Get the raw slot index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            SlotId::First => 0,
            SlotId::Second => 1,
        }
    }

    /// The opposing slot.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            SlotId::First => SlotId::Second,
            SlotId::Second => SlotId::First,
        }
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotId::First => f.write_str("Player 1"),
            SlotId::Second => f.write_str("Player 2"),
        }
    }
}

/// Per-slot data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use ccg_arena::core::{SlotId, SlotPair};
///
/// let mut life: SlotPair<i32> = SlotPair::with_value(30);
/// life[SlotId::Second] -= 5;
///
/// assert_eq!(life[SlotId::First], 30);
/// assert_eq!(life[SlotId::Second], 25);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotPair<T> {
    data: [T; 2],
}

impl<T> SlotPair<T> {
    /// Create a pair with values from a factory function.
    pub fn new(factory: impl Fn(SlotId) -> T) -> Self {
        Self {
            data: [factory(SlotId::First), factory(SlotId::Second)],
        }
    }

    /// Create a pair with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a pair with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    #[must_use]
    pub fn get(&self, slot: SlotId) -> &T {
        &self.data[slot.index()]
    }

    pub fn get_mut(&mut self, slot: SlotId) -> &mut T {
        &mut self.data[slot.index()]
    }

    /// Borrow both entries mutably, `slot` first and its opponent second.
    pub fn split_mut(&mut self, slot: SlotId) -> (&mut T, &mut T) {
        let [first, second] = &mut self.data;
        match slot {
            SlotId::First => (first, second),
            SlotId::Second => (second, first),
        }
    }

    /// Iterate over (SlotId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        SlotId::BOTH.into_iter().zip(self.data.iter())
    }

    /// Iterate over (SlotId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> {
        SlotId::BOTH.into_iter().zip(self.data.iter_mut())
    }
}

impl<T> Index<SlotId> for SlotPair<T> {
    type Output = T;

    fn index(&self, slot: SlotId) -> &Self::Output {
        self.get(slot)
    }
}

impl<T> IndexMut<SlotId> for SlotPair<T> {
    fn index_mut(&mut self, slot: SlotId) -> &mut Self::Output {
        self.get_mut(slot)
    }
}
