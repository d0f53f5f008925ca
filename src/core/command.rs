//! Inbound command model.
//!
//! A command is the verb plus its arguments; the acting participant travels
//! beside it and is the authorization token. For example:
//! - "End turn" = no arguments
//! - "Summon" = hand position + field position
//! - "Attack player" = attacker position + the defender's name

use serde::{Deserialize, Serialize};

use super::entity::{MatchId, ParticipantId};
use crate::cards::DeckList;

/// A match command.
///
/// ## Example
///
/// ```
/// use ccg_arena::core::{Command, CommandKind};
///
/// let summon = Command::Summon { hand_position: 0, field_position: 3 };
/// assert_eq!(summon.kind(), CommandKind::Summon);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Claim a player slot, bringing the deck to play with.
    Register { deck: DeckList },
    /// Start the match once both slots are bound.
    Start,
    /// Hand the turn to the opponent.
    EndTurn,
    /// Move a creature from hand to field.
    Summon {
        hand_position: usize,
        field_position: usize,
    },
    /// Fight an opposing creature.
    Attack {
        attacker_position: usize,
        defender_position: usize,
    },
    /// Strike the opposing player directly.
    AttackPlayer {
        attacker_position: usize,
        defending_player: String,
    },
    /// Tear the match down.
    Delete,
}

/// Fieldless command discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    Register,
    Start,
    EndTurn,
    Summon,
    Attack,
    AttackPlayer,
    Delete,
}

impl Command {
    #[must_use]
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Register { .. } => CommandKind::Register,
            Command::Start => CommandKind::Start,
            Command::EndTurn => CommandKind::EndTurn,
            Command::Summon { .. } => CommandKind::Summon,
            Command::Attack { .. } => CommandKind::Attack,
            Command::AttackPlayer { .. } => CommandKind::AttackPlayer,
            Command::Delete => CommandKind::Delete,
        }
    }
}

/// A command addressed to a match, as it arrives from the transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundCommand {
    pub match_id: MatchId,
    pub actor: ParticipantId,
    pub command: Command,
}

impl InboundCommand {
    pub fn new(
        match_id: impl Into<MatchId>,
        actor: impl Into<ParticipantId>,
        command: Command,
    ) -> Self {
        Self {
            match_id: match_id.into(),
            actor: actor.into(),
            command,
        }
    }
}

/// A successfully applied command, kept in the session history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// The participant who issued the command.
    pub actor: ParticipantId,

    /// The command applied.
    pub command: Command,

    /// Turn number before the command applied.
    pub turn: u32,

    /// Number of commands applied before this one, counting records
    /// already dropped from the history.
    pub sequence: u64,
}

impl CommandRecord {
    #[must_use]
    pub fn new(actor: ParticipantId, command: Command, turn: u32, sequence: u64) -> Self {
        Self {
            actor,
            command,
            turn,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_wire_shape() {
        let json = r#"{
            "match_id": "room",
            "actor": "alice",
            "command": { "summon": { "hand_position": 2, "field_position": 0 } }
        }"#;

        let inbound: InboundCommand = serde_json::from_str(json).unwrap();

        assert_eq!(inbound.match_id, MatchId::new("room"));
        assert_eq!(inbound.actor, ParticipantId::new("alice"));
        assert_eq!(
            inbound.command,
            Command::Summon {
                hand_position: 2,
                field_position: 0
            }
        );
    }

    #[test]
    fn test_unit_command_wire_shape() {
        let inbound = InboundCommand::new("room", "bob", Command::EndTurn);
        let json = serde_json::to_value(&inbound).unwrap();

        assert_eq!(json["command"], "end_turn");
        assert_eq!(json["actor"], "bob");
    }

    #[test]
    fn test_record() {
        let record = CommandRecord::new(ParticipantId::new("alice"), Command::EndTurn, 3, 5);

        assert_eq!(record.turn, 3);
        assert_eq!(record.sequence, 5);
        assert_eq!(record.command.kind(), CommandKind::EndTurn);
    }
}
