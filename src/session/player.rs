//! Player slots: one participant's resources, zones and turn flags.

use serde::{Deserialize, Serialize};

use super::resources::MatchResources;
use crate::cards::DeckList;
use crate::core::{MatchConfig, ParticipantId};
use crate::zones::CardZone;

/// One of the two per-match player sub-states.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    /// Bound participant; `None` while the slot is free.
    pub participant: Option<ParticipantId>,

    /// Deck list brought at registration, instantiated at start.
    pub deck_list: DeckList,

    pub resources: MatchResources,
    pub deck: CardZone,
    pub hand: CardZone,
    pub field: CardZone,

    /// Whether it is this slot's turn.
    pub is_moving: bool,

    /// Fixed at creation; the first slot moves first.
    pub is_first: bool,
}

impl PlayerSlot {
    /// An unbound slot with empty zones.
    #[must_use]
    pub fn empty(config: &MatchConfig, is_first: bool) -> Self {
        Self {
            participant: None,
            deck_list: DeckList::new(),
            resources: MatchResources::default(),
            deck: CardZone::deck(),
            hand: CardZone::hand(config.hand_capacity),
            field: CardZone::field(config.field_capacity),
            is_moving: is_first,
            is_first,
        }
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.participant.is_some()
    }

    /// Whether `actor` is the participant bound here.
    #[must_use]
    pub fn is_held_by(&self, actor: &ParticipantId) -> bool {
        self.participant.as_ref() == Some(actor)
    }

    /// Participant name, if bound.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.participant.as_ref().map(ParticipantId::name)
    }

    pub fn bind(&mut self, actor: ParticipantId, deck: DeckList) {
        self.participant = Some(actor);
        self.deck_list = deck;
    }
}
