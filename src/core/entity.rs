//! Identifiers used across the engine.
//!
//! - `EntityId`: a card instance inside one match. Allocated by the session
//!   when decks are instantiated, never reused within that match.
//! - `MatchId`: the room name a match is hosted under.
//! - `ParticipantId`: the identity a connected user acts with. It doubles as
//!   the authorization token every command carries.
//!
//! ## Usage
//!
//! ```
//! use ccg_arena::core::{EntityId, MatchId, ParticipantId};
//!
//! let card = EntityId(10);
//! assert_eq!(card.raw(), 10);
//! assert_eq!(card.next(), EntityId(11));
//!
//! let room = MatchId::new("friday-night");
//! let alice = ParticipantId::new("alice");
//! assert_eq!(room.as_str(), "friday-night");
//! assert_eq!(alice.to_string(), "alice");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// The first id handed out by a fresh session.
    pub const FIRST: EntityId = EntityId(0);

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The id allocated after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Identifier of a hosted match (the room name).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MatchId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a user taking part in (or watching) a match.
///
/// Compared by value; the name is what `AttackPlayer` targets.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The participant's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
