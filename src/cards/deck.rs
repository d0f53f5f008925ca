//! Deck lists - what a participant brings to a match.
//!
//! A deck list names templates and copy counts. Starting the match turns
//! each entry into `count` card instances in that player's deck zone.

use serde::{Deserialize, Serialize};

use super::template::CardRef;

/// One line of a deck list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub card: CardRef,
    pub count: u32,
}

/// A participant's deck list.
///
/// ```
/// use ccg_arena::cards::{CardRef, DeckList};
///
/// let deck = DeckList::new()
///     .with(CardRef::monster(1), 3)
///     .with(CardRef::spell(2), 1);
///
/// assert_eq!(deck.total_cards(), 4);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckList {
    pub entries: Vec<DeckEntry>,
}

impl DeckList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` copies of a card (builder pattern).
    #[must_use]
    pub fn with(mut self, card: CardRef, count: u32) -> Self {
        self.add(card, count);
        self
    }

    /// Add `count` copies of a card, merging with an existing entry.
    pub fn add(&mut self, card: CardRef, count: u32) {
        match self.entries.iter_mut().find(|e| e.card == card) {
            Some(entry) => entry.count += count,
            None => self.entries.push(DeckEntry { card, count }),
        }
    }

    /// Number of instances this list produces.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.entries.iter().map(|e| e.count as usize).sum()
    }

    /// Each card reference repeated by its count.
    pub fn expand(&self) -> impl Iterator<Item = CardRef> + '_ {
        self.entries
            .iter()
            .flat_map(|e| std::iter::repeat(e.card).take(e.count as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_merges_entries() {
        let mut deck = DeckList::new();
        deck.add(CardRef::monster(1), 2);
        deck.add(CardRef::monster(1), 1);
        deck.add(CardRef::monster(2), 1);

        assert_eq!(deck.entries.len(), 2);
        assert_eq!(deck.entries[0].count, 3);
        assert_eq!(deck.total_cards(), 4);
    }

    #[test]
    fn test_expand() {
        let deck = DeckList::new()
            .with(CardRef::monster(1), 2)
            .with(CardRef::spell(7), 1);

        let cards: Vec<_> = deck.expand().collect();
        assert_eq!(
            cards,
            vec![CardRef::monster(1), CardRef::monster(1), CardRef::spell(7)]
        );
    }

    #[test]
    fn test_empty_deck() {
        assert_eq!(DeckList::new().total_cards(), 0);
        assert_eq!(DeckList::new().expand().count(), 0);
    }
}
