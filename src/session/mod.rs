//! Match sessions: the two-player state machine and its read model.
//!
//! ## Key Types
//!
//! - `MatchResources`: life, mana, max mana
//! - `PlayerSlot`: a participant's resources, zones and turn flags
//! - `GameSession`: the match aggregate; every command is stage-then-commit
//! - `MatchSnapshot`: per-viewer outbound view

pub mod resources;
pub mod player;
pub mod combat;
pub mod game;
pub mod snapshot;

pub use resources::MatchResources;
pub use player::PlayerSlot;
pub use combat::{resolve_creature_combat, resolve_player_strike, CombatOutcome};
pub use game::GameSession;
pub use snapshot::{CardFace, FieldCardView, HandCardView, MatchSnapshot, PlayerView};
