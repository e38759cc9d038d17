//! Rules configuration.
//!
//! Every numeric rule the engine enforces (caps, deck size, opening hands,
//! phase timers) lives in `RulesConfig`. Matches are created from a config
//! and the engine consults the same config for every operation.
//!
//! ```
//! use duel_ccg::core::{DeathSweep, RulesConfig};
//!
//! let config = RulesConfig::default()
//!     .with_board_capacity(5)
//!     .with_death_sweep(DeathSweep::SinglePass);
//!
//! assert_eq!(config.board_capacity, 5);
//! assert_eq!(config.hand_capacity, 10);
//! ```

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::error::DataError;

/// How dead units are collected after a state-mutating step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathSweep {
    /// Sweep repeatedly until no unit at or below zero health remains,
    /// so deaths caused by on-death effects resolve in the same step.
    #[default]
    FixedPoint,
    /// Sweep once; units killed by on-death effects wait for the next step.
    SinglePass,
}

/// Complete rules configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Health each side starts with.
    pub starting_health: i32,

    /// Maximum cards in hand; further draws are discarded.
    pub hand_capacity: usize,

    /// Maximum units (including buildings) on one board.
    pub board_capacity: usize,

    /// Absolute ceiling for maximum mana. Refills never exceed it; bonus
    /// mana may.
    pub mana_cap: i32,

    /// Exact number of cards in a constructed deck.
    pub deck_size: usize,

    /// Maximum copies of one card id in a deck.
    pub copy_limit: usize,

    /// Opening hand of the side that acts first.
    pub first_hand_size: usize,

    /// Opening hand of the side that acts second.
    pub second_hand_size: usize,

    /// Card given to the second side once the mulligan completes.
    pub bonus_card: CardId,

    /// Delay before the coin toss resolves, in milliseconds.
    pub coin_toss_delay_ms: u64,

    /// Mulligan timeout after which marked selections are forced.
    pub mulligan_timeout_ms: u64,

    /// Delay between end-of-turn effects and the death sweep.
    pub settle_delay_ms: u64,

    /// Death sweep policy.
    pub death_sweep: DeathSweep,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            starting_health: 30,
            hand_capacity: 10,
            board_capacity: 7,
            mana_cap: 10,
            deck_size: 30,
            copy_limit: 2,
            first_hand_size: 3,
            second_hand_size: 4,
            bonus_card: CardId::BONUS_MANA,
            coin_toss_delay_ms: 3_000,
            mulligan_timeout_ms: 30_000,
            settle_delay_ms: 600,
            death_sweep: DeathSweep::FixedPoint,
        }
    }
}

impl RulesConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs the engine cannot run with.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.board_capacity == 0 || self.hand_capacity == 0 {
            return Err(DataError::Config("zone capacities must be positive".into()));
        }
        if self.starting_health <= 0 {
            return Err(DataError::Config("starting health must be positive".into()));
        }
        if self.copy_limit == 0 {
            return Err(DataError::Config("copy limit must be positive".into()));
        }
        if self.first_hand_size.max(self.second_hand_size) > self.hand_capacity {
            return Err(DataError::Config("opening hand exceeds hand capacity".into()));
        }
        Ok(())
    }

    /// Set the starting health.
    #[must_use]
    pub fn with_starting_health(mut self, health: i32) -> Self {
        self.starting_health = health;
        self
    }

    /// Set the hand capacity.
    #[must_use]
    pub fn with_hand_capacity(mut self, capacity: usize) -> Self {
        self.hand_capacity = capacity;
        self
    }

    /// Set the board capacity.
    #[must_use]
    pub fn with_board_capacity(mut self, capacity: usize) -> Self {
        self.board_capacity = capacity;
        self
    }

    /// Set the deck size and copy limit.
    #[must_use]
    pub fn with_deck_rules(mut self, deck_size: usize, copy_limit: usize) -> Self {
        self.deck_size = deck_size;
        self.copy_limit = copy_limit;
        self
    }

    /// Set all phase timers to zero (useful for headless simulation).
    #[must_use]
    pub fn without_delays(mut self) -> Self {
        self.coin_toss_delay_ms = 0;
        self.mulligan_timeout_ms = 0;
        self.settle_delay_ms = 0;
        self
    }

    /// Set the death sweep policy.
    #[must_use]
    pub fn with_death_sweep(mut self, policy: DeathSweep) -> Self {
        self.death_sweep = policy;
        self
    }
}
