//! Engine configuration.
//!
//! Balance and capacity parameters for a match. These are
//! implementation-defined knobs, not rules: the rule modules read
//! them but never hardcode the values.

use serde::{Deserialize, Serialize};

/// Match configuration.
///
/// ## Example
///
/// ```
/// use duelcore::core::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_starting_hand_size(4)
///     .with_starting_lp(4000);
///
/// assert_eq!(config.starting_hand_size, 4);
/// assert_eq!(config.max_board_slots, 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cards dealt to each seat at match start.
    pub starting_hand_size: usize,

    /// Life points each seat starts with.
    pub starting_lp: i32,

    /// Creature slots per seat.
    pub max_board_slots: usize,

    /// Spell/trap slots per seat (field-spell slot excluded).
    pub max_spell_trap_slots: usize,

    /// Creatures at or above this level require a tribute to summon.
    pub tribute_level_threshold: u8,

    /// A seat whose vice-counter tally reaches this loses the match.
    pub vice_threshold: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_hand_size: 5,
            starting_lp: 8000,
            max_board_slots: 5,
            max_spell_trap_slots: 5,
            tribute_level_threshold: 5,
            vice_threshold: 10,
        }
    }
}

impl EngineConfig {
    /// Set the starting hand size.
    #[must_use]
    pub fn with_starting_hand_size(mut self, size: usize) -> Self {
        self.starting_hand_size = size;
        self
    }

    /// Set the starting life points.
    #[must_use]
    pub fn with_starting_lp(mut self, lp: i32) -> Self {
        self.starting_lp = lp;
        self
    }

    /// Set the board slot count.
    #[must_use]
    pub fn with_max_board_slots(mut self, slots: usize) -> Self {
        self.max_board_slots = slots;
        self
    }

    /// Set the spell/trap slot count.
    #[must_use]
    pub fn with_max_spell_trap_slots(mut self, slots: usize) -> Self {
        self.max_spell_trap_slots = slots;
        self
    }

    /// Set the tribute level threshold.
    #[must_use]
    pub fn with_tribute_level_threshold(mut self, level: u8) -> Self {
        self.tribute_level_threshold = level;
        self
    }

    /// Set the vice-counter loss threshold.
    #[must_use]
    pub fn with_vice_threshold(mut self, threshold: u32) -> Self {
        self.vice_threshold = threshold;
        self
    }
}
