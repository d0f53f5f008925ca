//! # ccg-arena
//!
//! A two-player, turn-based card-battle engine.
//!
//! Players register with a deck, take alternating turns, summon creatures
//! from hand to field by paying mana, and fight creatures or strike the
//! opposing player until one player's life reaches zero.
//!
//! ## Design Principles
//!
//! 1. **Single Writer Per Match**: every hosted match is owned by one
//!    worker task; commands for a match apply in a strict total order while
//!    different matches run in parallel.
//!
//! 2. **Stage Then Commit**: a command runs against a clone of the session
//!    and is swapped in only on success. A failed command never leaves a
//!    trace.
//!
//! 3. **Injected Collaborators**: card catalog, durable store and broadcast
//!    sink are passed in. Sessions hold no ambient references.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) session cloning via `im-rs`,
//!   which is what makes stage-then-commit cheap.
//!
//! - **Deterministic RNG**: `GameRng` (ChaCha8) is part of session state,
//!   so seat assignment and draws replay exactly from a seed.
//!
//! ## Modules
//!
//! - `core`: identifiers, slots, RNG, configuration, errors, commands
//! - `cards`: templates, catalog, deck lists, instances
//! - `zones`: deck, hand and field containers
//! - `session`: resources, player slots, the match state machine, snapshots
//! - `registry`: per-match workers, store and broadcast boundaries

pub mod core;
pub mod cards;
pub mod zones;
pub mod session;
pub mod registry;

// Re-export commonly used types
pub use crate::core::{
    EntityId, MatchId, ParticipantId,
    SlotId, SlotPair,
    GameRng, GameRngState,
    MatchConfig, RegistryConfig,
    ErrorKind, GameError, Result,
    Command, CommandKind, CommandRecord, InboundCommand,
};

pub use crate::cards::{
    CardBody, CardKind, CardRef, CardTemplate, TemplateId,
    CardCatalog, DeckEntry, DeckList, CardInstance, CombatStats,
};

pub use crate::zones::{CardZone, ZoneKind};

pub use crate::session::{
    GameSession, MatchResources, PlayerSlot,
    MatchSnapshot, PlayerView, FieldCardView, HandCardView, CardFace,
};

pub use crate::registry::{
    SessionRegistry, SessionHandle, RoomSummary,
    SessionStore, MemoryStore, StoreError,
    BroadcastSink, ChannelSink, NullSink, MatchUpdate, ViewerSnapshot,
};
