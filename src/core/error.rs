//! Error taxonomy for match commands.
//!
//! Every failure is local and recoverable: the command does not apply, the
//! session is unchanged, and the error goes back to the caller. Only
//! `Store` wraps an infrastructure failure from outside the engine.

use thiserror::Error;

use super::entity::{MatchId, ParticipantId};
use crate::registry::StoreError;
use crate::zones::ZoneKind;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{actor} is not entitled to issue this command")]
    Unauthorized { actor: ParticipantId },

    #[error("match has not started")]
    NotStarted,

    #[error("match has already started")]
    AlreadyStarted,

    #[error("match has already ended")]
    AlreadyEnded,

    #[error("both player slots must be bound before the match can start")]
    NotRegistered,

    #[error("invalid card: {0}")]
    InvalidCard(String),

    #[error("{zone} is full ({capacity} cards)")]
    ZoneFull { zone: ZoneKind, capacity: usize },

    #[error("{zone} position {position} is occupied")]
    PositionOccupied { zone: ZoneKind, position: usize },

    #[error("{zone} does not support this kind of addressing")]
    UnsupportedAddressing { zone: ZoneKind },

    #[error("deck is empty")]
    DeckEmpty,

    #[error("card costs {cost} mana but only {available} is available")]
    ManaInsufficient { cost: i32, available: i32 },

    #[error("attacker has no attacks left this turn")]
    AttacksNoneLeft,

    #[error("attacker was summoned this turn and lacks charge")]
    AttackOnTurnSummonedWithoutCharge,

    #[error("{named} is not the defending player")]
    AttackInvalidPlayer { named: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("match {0} is already hosted")]
    SessionExists(MatchId),

    #[error("match executor is no longer running")]
    ChannelClosed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fieldless view of [`GameError`] for messaging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    NotStarted,
    AlreadyStarted,
    AlreadyEnded,
    NotRegistered,
    InvalidCard,
    ZoneFull,
    PositionOccupied,
    UnsupportedAddressing,
    DeckEmpty,
    ManaInsufficient,
    AttacksNoneLeft,
    AttackOnTurnSummonedWithoutCharge,
    AttackInvalidPlayer,
    NotFound,
    SessionExists,
    ChannelClosed,
    Store,
}

impl GameError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::Unauthorized { .. } => ErrorKind::Unauthorized,
            GameError::NotStarted => ErrorKind::NotStarted,
            GameError::AlreadyStarted => ErrorKind::AlreadyStarted,
            GameError::AlreadyEnded => ErrorKind::AlreadyEnded,
            GameError::NotRegistered => ErrorKind::NotRegistered,
            GameError::InvalidCard(_) => ErrorKind::InvalidCard,
            GameError::ZoneFull { .. } => ErrorKind::ZoneFull,
            GameError::PositionOccupied { .. } => ErrorKind::PositionOccupied,
            GameError::UnsupportedAddressing { .. } => ErrorKind::UnsupportedAddressing,
            GameError::DeckEmpty => ErrorKind::DeckEmpty,
            GameError::ManaInsufficient { .. } => ErrorKind::ManaInsufficient,
            GameError::AttacksNoneLeft => ErrorKind::AttacksNoneLeft,
            GameError::AttackOnTurnSummonedWithoutCharge => {
                ErrorKind::AttackOnTurnSummonedWithoutCharge
            }
            GameError::AttackInvalidPlayer { .. } => ErrorKind::AttackInvalidPlayer,
            GameError::NotFound(_) => ErrorKind::NotFound,
            GameError::SessionExists(_) => ErrorKind::SessionExists,
            GameError::ChannelClosed => ErrorKind::ChannelClosed,
            GameError::Store(_) => ErrorKind::Store,
        }
    }

    pub(crate) fn unauthorized(actor: &ParticipantId) -> Self {
        GameError::Unauthorized {
            actor: actor.clone(),
        }
    }
}
