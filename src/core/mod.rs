//! Core engine types: identifiers, slots, RNG, configuration, errors, commands.
//!
//! These are the building blocks every other module leans on. None of them
//! know about zones or cards beyond the deck list a registration carries.

pub mod entity;
pub mod slot;
pub mod rng;
pub mod config;
pub mod error;
pub mod command;

pub use entity::{EntityId, MatchId, ParticipantId};
pub use slot::{SlotId, SlotPair};
pub use rng::{GameRng, GameRngState};
pub use config::{MatchConfig, RegistryConfig};
pub use error::{ErrorKind, GameError, Result};
pub use command::{Command, CommandKind, CommandRecord, InboundCommand};
