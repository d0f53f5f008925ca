//! Outbound read model.
//!
//! A `MatchSnapshot` is what a connected client sees after each command:
//! lifecycle flags, turn, both players' public numbers and fields, and the
//! viewer's own hand. The opponent's hand is never included, and
//! spectators get no hand at all.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::game::GameSession;
use super::player::PlayerSlot;
use crate::cards::{CardCatalog, CardInstance, CardTemplate};
use crate::core::{MatchId, ParticipantId, Result, SlotId};

/// Printed face of a card, taken from its template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFace {
    pub name: String,
    pub description: String,
    pub cost: i32,
    pub picture_url: Option<String>,
}

impl From<&CardTemplate> for CardFace {
    fn from(template: &CardTemplate) -> Self {
        Self {
            name: template.name.clone(),
            description: template.description.clone(),
            cost: template.cost,
            picture_url: template.picture_url.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandCardView {
    pub position: usize,
    pub face: CardFace,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCardView {
    pub position: usize,
    pub face: CardFace,
    /// Current attack.
    pub attack: i32,
    /// Current hp.
    pub hp: i32,
}

/// Public view of one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub slot: SlotId,
    pub name: Option<String>,
    pub life: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub deck_count: usize,
    pub is_moving: bool,
    /// Ordered by position.
    pub field: SmallVec<[FieldCardView; 7]>,
}

/// Snapshot of a match as one viewer sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub match_id: MatchId,
    pub started: bool,
    pub ended: bool,
    pub winner: Option<String>,
    pub turn: u32,

    /// Both players, first slot first. Empty before the match starts.
    pub players: SmallVec<[PlayerView; 2]>,

    /// The viewer's own hand, ordered by position. `None` for spectators
    /// and before the match starts.
    pub hand: Option<SmallVec<[HandCardView; 10]>>,
}

impl MatchSnapshot {
    /// Build the snapshot `viewer` is allowed to see.
    ///
    /// Fails with `InvalidCard` if a card's template is missing from
    /// `catalog`.
    pub fn build(
        session: &GameSession,
        viewer: Option<&ParticipantId>,
        catalog: &CardCatalog,
    ) -> Result<Self> {
        let mut snapshot = Self {
            match_id: session.match_id().clone(),
            started: session.is_started(),
            ended: session.is_ended(),
            winner: session.winner().map(|w| w.name().to_string()),
            turn: session.turn(),
            players: SmallVec::new(),
            hand: None,
        };

        if !session.is_started() {
            return Ok(snapshot);
        }

        for slot in SlotId::BOTH {
            snapshot
                .players
                .push(player_view(slot, session.slot(slot), catalog)?);
        }

        if let Some(own) = viewer.and_then(|v| session.slot_of(v)) {
            let hand = session
                .slot(own)
                .hand
                .iter()
                .map(|(position, card)| {
                    Ok(HandCardView {
                        position,
                        face: face_of(card, catalog)?,
                    })
                })
                .collect::<Result<SmallVec<_>>>()?;
            snapshot.hand = Some(hand);
        }

        Ok(snapshot)
    }

    /// View of `slot`, if the match has started.
    #[must_use]
    pub fn player(&self, slot: SlotId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.slot == slot)
    }
}

fn player_view(slot: SlotId, player: &PlayerSlot, catalog: &CardCatalog) -> Result<PlayerView> {
    let field = player
        .field
        .iter()
        .map(|(position, card)| {
            let stats = card.field_stats()?;
            Ok(FieldCardView {
                position,
                face: face_of(card, catalog)?,
                attack: stats.attack,
                hp: stats.hp,
            })
        })
        .collect::<Result<SmallVec<_>>>()?;

    Ok(PlayerView {
        slot,
        name: player.name().map(str::to_string),
        life: player.resources.life,
        mana: player.resources.mana,
        max_mana: player.resources.max_mana,
        deck_count: player.deck.len(),
        is_moving: player.is_moving,
        field,
    })
}

fn face_of(card: &CardInstance, catalog: &CardCatalog) -> Result<CardFace> {
    catalog.resolve(card.card).map(CardFace::from)
}
