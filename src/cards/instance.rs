//! Card instances - per-match card state.
//!
//! `CardInstance` is one physical card in one match. It always carries its
//! template reference; combat attributes exist only while it is on the
//! field. Leaving the field drops them, so a card that is summoned again
//! starts from its template, never from earlier combat wear.

use serde::{Deserialize, Serialize};

use super::template::{CardRef, CardTemplate};
use crate::core::{EntityId, GameError, Result};

/// Mutable combat attributes of a creature on the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatStats {
    pub attack: i32,
    pub hp: i32,

    /// Ends of turn survived since it was summoned.
    pub turns_alive: u32,

    /// Attacks made since the last end of turn.
    pub attacks_used: u32,

    pub attacks_per_turn: u32,

    /// May attack on the turn it was summoned.
    ///
    /// No card grants this yet; it is the hook an ability system would set.
    pub charge: bool,
}

impl CombatStats {
    /// Fresh stats for a creature entering the field.
    #[must_use]
    pub fn fresh(attack: i32, hp: i32, attacks_per_turn: u32) -> Self {
        Self {
            attack,
            hp,
            turns_alive: 0,
            attacks_used: 0,
            attacks_per_turn,
            charge: false,
        }
    }

    #[must_use]
    pub fn attacks_left(&self) -> u32 {
        self.attacks_per_turn.saturating_sub(self.attacks_used)
    }

    /// Check the summoning-sickness rule, then the attack allowance.
    pub fn ensure_can_attack(&self) -> Result<()> {
        if self.turns_alive == 0 && !self.charge {
            return Err(GameError::AttackOnTurnSummonedWithoutCharge);
        }
        if self.attacks_left() == 0 {
            return Err(GameError::AttacksNoneLeft);
        }
        Ok(())
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.hp <= 0
    }

    /// End-of-turn refresh: one more turn alive, attacks restored.
    pub fn upkeep(&mut self) {
        self.turns_alive += 1;
        self.attacks_used = 0;
    }
}

/// A card in a match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique entity ID for this instance.
    pub entity_id: EntityId,

    /// Reference to the card template.
    pub card: CardRef,

    /// Present only while on the field.
    combat: Option<CombatStats>,
}

impl CardInstance {
    /// Create an off-field instance.
    #[must_use]
    pub fn new(entity_id: EntityId, card: CardRef) -> Self {
        Self {
            entity_id,
            card,
            combat: None,
        }
    }

    /// Derive the field form of this card from its template.
    ///
    /// Fails with `InvalidCard` for templates without creature stats.
    pub fn enter_field(&self, template: &CardTemplate, attacks_per_turn: u32) -> Result<Self> {
        let (attack, hp) = template.creature_stats().ok_or_else(|| {
            GameError::InvalidCard(format!("{} is not a creature", template.name))
        })?;
        Ok(Self {
            entity_id: self.entity_id,
            card: self.card,
            combat: Some(CombatStats::fresh(attack, hp, attacks_per_turn)),
        })
    }

    #[must_use]
    pub fn combat(&self) -> Option<&CombatStats> {
        self.combat.as_ref()
    }

    pub fn combat_mut(&mut self) -> Option<&mut CombatStats> {
        self.combat.as_mut()
    }

    /// Combat stats of a card known to be on the field.
    ///
    /// Fails with `InvalidCard` for an off-field instance.
    pub fn field_stats(&self) -> Result<&CombatStats> {
        self.combat.as_ref().ok_or_else(|| {
            GameError::InvalidCard(format!("{} is not on the field", self.entity_id))
        })
    }

    /// Mutable counterpart of [`CardInstance::field_stats`].
    pub fn field_stats_mut(&mut self) -> Result<&mut CombatStats> {
        let entity_id = self.entity_id;
        self.combat
            .as_mut()
            .ok_or_else(|| GameError::InvalidCard(format!("{} is not on the field", entity_id)))
    }
}
