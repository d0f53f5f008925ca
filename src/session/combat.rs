//! Combat resolution.
//!
//! Creature combat is simultaneous: both sides deal damage computed from
//! the pre-combat attack values, so the outcome does not depend on which
//! creature would "die first". A strike at a player deals damage one way.

use crate::cards::CombatStats;

use super::resources::MatchResources;

/// Result of a creature-versus-creature fight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombatOutcome {
    pub attacker_destroyed: bool,
    pub defender_destroyed: bool,
}

/// Resolve a fight between two field creatures.
///
/// Spends one of the attacker's attacks. Callers remove destroyed
/// creatures from their fields.
pub fn resolve_creature_combat(
    attacker: &mut CombatStats,
    defender: &mut CombatStats,
) -> CombatOutcome {
    let attacker_damage = attacker.attack;
    let defender_damage = defender.attack;

    attacker.hp = attacker.hp.saturating_sub(defender_damage);
    defender.hp = defender.hp.saturating_sub(attacker_damage);
    attacker.attacks_used += 1;

    CombatOutcome {
        attacker_destroyed: attacker.is_destroyed(),
        defender_destroyed: defender.is_destroyed(),
    }
}

/// Resolve a creature striking the opposing player.
///
/// Spends one attack; the attacker takes no damage. Returns whether the
/// defender is now defeated.
pub fn resolve_player_strike(attacker: &mut CombatStats, defender: &mut MatchResources) -> bool {
    attacker.attacks_used += 1;
    defender.take_damage(attacker.attack);
    defender.is_defeated()
}
