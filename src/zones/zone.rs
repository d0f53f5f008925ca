//! Card zones: deck, hand, and field containers.
//!
//! A `CardZone` owns the card instances in one of a player's zones and
//! enforces that zone's addressing and capacity rules:
//! - Deck: an unordered bag; cards leave only by uniform random draw
//! - Hand / Field: position-addressed, positions unique and stable until the
//!   card leaves, membership capped by capacity
//!
//! Storage is `im` persistent collections, so cloning a zone (and with it a
//! whole session) is O(1). Sessions rely on that to stage a command on a
//! copy and swap it in only when every step succeeded.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use crate::cards::CardInstance;
use crate::core::{GameError, GameRng, Result};

/// Which zone a container is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    Deck,
    Hand,
    Field,
}

impl std::fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneKind::Deck => f.write_str("deck"),
            ZoneKind::Hand => f.write_str("hand"),
            ZoneKind::Field => f.write_str("field"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum Slots {
    Bag(Vector<CardInstance>),
    Positional(OrdMap<usize, CardInstance>),
}

/// A capacity-bounded card container.
///
/// ## Usage
///
/// ```
/// use ccg_arena::cards::{CardInstance, CardRef};
/// use ccg_arena::core::EntityId;
/// use ccg_arena::zones::CardZone;
///
/// let mut hand = CardZone::hand(10);
/// let slot = hand.next_free_position().unwrap();
/// hand.add(CardInstance::new(EntityId(0), CardRef::monster(1)), Some(slot)).unwrap();
///
/// assert_eq!(slot, 0);
/// assert_eq!(hand.next_free_position(), Some(1));
/// assert!(hand.get(0).is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardZone {
    kind: ZoneKind,
    /// `None` for the deck, which has no cap.
    capacity: Option<usize>,
    slots: Slots,
}

impl CardZone {
    /// An empty, unbounded deck.
    #[must_use]
    pub fn deck() -> Self {
        Self {
            kind: ZoneKind::Deck,
            capacity: None,
            slots: Slots::Bag(Vector::new()),
        }
    }

    #[must_use]
    pub fn hand(capacity: usize) -> Self {
        Self::positional(ZoneKind::Hand, capacity)
    }

    #[must_use]
    pub fn field(capacity: usize) -> Self {
        Self::positional(ZoneKind::Field, capacity)
    }

    fn positional(kind: ZoneKind, capacity: usize) -> Self {
        Self {
            kind,
            capacity: Some(capacity),
            slots: Slots::Positional(OrdMap::new()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ZoneKind {
        self.kind
    }

    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match &self.slots {
            Slots::Bag(cards) => cards.len(),
            Slots::Positional(cards) => cards.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.len() >= cap)
    }

    /// Check that `position` could accept a card, without adding one.
    ///
    /// The deck accepts anything. Positional zones reject a missing
    /// position, an occupied position, and a full zone, in that order.
    pub fn check_insert(&self, position: Option<usize>) -> Result<()> {
        let Slots::Positional(cards) = &self.slots else {
            return Ok(());
        };
        let position = position.ok_or(GameError::UnsupportedAddressing { zone: self.kind })?;
        if cards.contains_key(&position) {
            return Err(GameError::PositionOccupied {
                zone: self.kind,
                position,
            });
        }
        if let Some(capacity) = self.capacity.filter(|&cap| cards.len() >= cap) {
            return Err(GameError::ZoneFull {
                zone: self.kind,
                capacity,
            });
        }
        Ok(())
    }

    /// Add a card. Positional zones require `position`; the deck ignores it.
    pub fn add(&mut self, instance: CardInstance, position: Option<usize>) -> Result<()> {
        self.check_insert(position)?;
        match &mut self.slots {
            Slots::Bag(cards) => cards.push_back(instance),
            Slots::Positional(cards) => {
                // check_insert already rejected a missing position
                if let Some(position) = position {
                    cards.insert(position, instance);
                }
            }
        }
        Ok(())
    }

    /// Remove the card at `position` (hand and field only).
    pub fn remove_at(&mut self, position: usize) -> Result<CardInstance> {
        match &mut self.slots {
            Slots::Bag(_) => Err(GameError::UnsupportedAddressing { zone: self.kind }),
            Slots::Positional(cards) => cards.remove(&position).ok_or_else(|| {
                GameError::NotFound(format!("no card at {} position {}", self.kind, position))
            }),
        }
    }

    /// Remove a uniformly chosen card (deck only).
    pub fn remove_random(&mut self, rng: &mut GameRng) -> Result<CardInstance> {
        match &mut self.slots {
            Slots::Positional(_) => Err(GameError::UnsupportedAddressing { zone: self.kind }),
            Slots::Bag(cards) if cards.is_empty() => Err(GameError::DeckEmpty),
            Slots::Bag(cards) => {
                let index = rng.gen_range_usize(0..cards.len());
                Ok(cards.remove(index))
            }
        }
    }

    /// Lowest unoccupied position, or `None` when the zone is full.
    ///
    /// Always `None` for the deck.
    #[must_use]
    pub fn next_free_position(&self) -> Option<usize> {
        let Slots::Positional(cards) = &self.slots else {
            return None;
        };
        let capacity = self.capacity?;
        (0..capacity).find(|p| !cards.contains_key(p))
    }

    #[must_use]
    pub fn is_occupied(&self, position: usize) -> bool {
        self.get(position).is_some()
    }

    /// Card at `position`; always `None` for the deck.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&CardInstance> {
        match &self.slots {
            Slots::Bag(_) => None,
            Slots::Positional(cards) => cards.get(&position),
        }
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut CardInstance> {
        match &mut self.slots {
            Slots::Bag(_) => None,
            Slots::Positional(cards) => cards.get_mut(&position),
        }
    }

    /// Apply `f` to every card in the zone.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut CardInstance)) {
        match &mut self.slots {
            Slots::Bag(cards) => cards.iter_mut().for_each(f),
            Slots::Positional(cards) => {
                let positions: Vec<usize> = cards.keys().copied().collect();
                for position in positions {
                    if let Some(card) = cards.get_mut(&position) {
                        f(card);
                    }
                }
            }
        }
    }

    /// Cards with their positions, ascending.
    ///
    /// The deck has no positions; its cards are numbered in bag order.
    pub fn iter(&self) -> ZoneIter<'_> {
        match &self.slots {
            Slots::Bag(cards) => ZoneIter::Bag(cards.iter().enumerate()),
            Slots::Positional(cards) => ZoneIter::Positional(cards.iter()),
        }
    }
}

/// Iterator over `(position, card)` pairs of a zone.
pub enum ZoneIter<'a> {
    Bag(std::iter::Enumerate<im::vector::Iter<'a, CardInstance>>),
    Positional(im::ordmap::Iter<'a, usize, CardInstance>),
}

impl<'a> Iterator for ZoneIter<'a> {
    type Item = (usize, &'a CardInstance);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ZoneIter::Bag(iter) => iter.next(),
            ZoneIter::Positional(iter) => iter.next().map(|(position, card)| (*position, card)),
        }
    }
}
