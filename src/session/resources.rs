//! Per-player match resources: life and mana.

use serde::{Deserialize, Serialize};

use crate::core::{GameError, MatchConfig, Result};

/// Life, mana and max mana of one player.
///
/// Life is not clamped: an attack can drive it below zero, and any value
/// `<= 0` is terminal. Max mana has no ceiling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchResources {
    pub life: i32,
    pub mana: i32,
    pub max_mana: i32,
}

impl MatchResources {
    /// Starting resources for a new match.
    #[must_use]
    pub fn starting(config: &MatchConfig) -> Self {
        Self {
            life: config.starting_life,
            mana: config.starting_mana,
            max_mana: config.starting_max_mana,
        }
    }

    /// Pay `cost` mana, or fail without touching the pool.
    pub fn spend(&mut self, cost: i32) -> Result<()> {
        if cost > self.mana {
            return Err(GameError::ManaInsufficient {
                cost,
                available: self.mana,
            });
        }
        self.mana -= cost;
        Ok(())
    }

    /// Start-of-turn growth: raise max mana and refill.
    pub fn grow_and_refill(&mut self, growth: i32) {
        self.max_mana += growth;
        self.mana = self.max_mana;
    }

    /// Saturates at `i32::MIN` rather than wrapping.
    pub fn take_damage(&mut self, amount: i32) {
        self.life = self.life.saturating_sub(amount);
    }

    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.life <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting() {
        let res = MatchResources::starting(&MatchConfig::default());

        assert_eq!(res.life, 30);
        assert_eq!(res.mana, 1);
        assert_eq!(res.max_mana, 1);
    }

    #[test]
    fn test_spend() {
        let mut res = MatchResources::starting(&MatchConfig::default());

        assert_eq!(
            res.spend(2),
            Err(GameError::ManaInsufficient {
                cost: 2,
                available: 1
            })
        );
        assert_eq!(res.mana, 1);

        res.spend(1).unwrap();
        assert_eq!(res.mana, 0);
        res.spend(0).unwrap();
    }

    #[test]
    fn test_grow_and_refill() {
        let mut res = MatchResources {
            life: 30,
            mana: 0,
            max_mana: 3,
        };
        res.grow_and_refill(1);

        assert_eq!(res.max_mana, 4);
        assert_eq!(res.mana, 4);
    }

    #[test]
    fn test_damage_goes_negative() {
        let mut res = MatchResources {
            life: 3,
            mana: 1,
            max_mana: 1,
        };
        res.take_damage(5);

        assert_eq!(res.life, -2);
        assert!(res.is_defeated());
    }

    #[test]
    fn test_damage_saturates() {
        let mut res = MatchResources {
            life: -5,
            mana: 0,
            max_mana: 0,
        };
        res.take_damage(i32::MAX);

        assert_eq!(res.life, i32::MIN);
        assert!(res.is_defeated());
    }
}
