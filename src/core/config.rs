//! Engine configuration.
//!
//! - `MatchConfig`: rule constants for one match (life, mana, capacities)
//! - `RegistryConfig`: executor plumbing for the session registry
//!
//! Both have defaults matching the reference rules, and builder methods for
//! tests and alternative rule sets.

use serde::{Deserialize, Serialize};

/// Rule constants for a single match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Life each player starts with.
    pub starting_life: i32,

    /// Mana available on the first turn.
    pub starting_mana: i32,

    /// Max mana before any turn growth.
    pub starting_max_mana: i32,

    /// Max mana gained at the start of each of a player's turns.
    pub mana_growth: i32,

    /// Cards a hand can hold.
    pub hand_capacity: usize,

    /// Creatures a field can hold.
    pub field_capacity: usize,

    /// Attacks a freshly summoned creature may make each turn.
    pub attacks_per_turn: u32,

    /// Most recent command records a session keeps.
    pub history_limit: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            starting_life: 30,
            starting_mana: 1,
            starting_max_mana: 1,
            mana_growth: 1,
            hand_capacity: 10,
            field_capacity: 7,
            attacks_per_turn: 1,
            history_limit: 256,
        }
    }
}

impl MatchConfig {
    #[must_use]
    pub fn with_starting_life(mut self, life: i32) -> Self {
        self.starting_life = life;
        self
    }

    #[must_use]
    pub fn with_starting_mana(mut self, mana: i32) -> Self {
        self.starting_mana = mana;
        self.starting_max_mana = mana;
        self
    }

    #[must_use]
    pub fn with_hand_capacity(mut self, capacity: usize) -> Self {
        self.hand_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_field_capacity(mut self, capacity: usize) -> Self {
        self.field_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}

/// Configuration for the session registry and its per-match executors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Rules applied to every hosted match.
    pub match_config: MatchConfig,

    /// Pending commands buffered per match before senders wait (at least 1).
    pub command_buffer_size: usize,

    /// Updates buffered per [`ChannelSink`] subscriber (at least 1).
    ///
    /// [`ChannelSink`]: crate::registry::ChannelSink
    pub broadcast_buffer_size: usize,

    /// Fixed RNG seed for every hosted match. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            match_config: MatchConfig::default(),
            command_buffer_size: 32,
            broadcast_buffer_size: 100,
            seed: None,
        }
    }
}

impl RegistryConfig {
    #[must_use]
    pub fn with_match_config(mut self, config: MatchConfig) -> Self {
        self.match_config = config;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_command_buffer_size(mut self, size: usize) -> Self {
        self.command_buffer_size = size;
        self
    }

    #[must_use]
    pub fn with_broadcast_buffer_size(mut self, size: usize) -> Self {
        self.broadcast_buffer_size = size;
        self
    }
}
