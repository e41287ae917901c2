//! Player commands — the closed intent vocabulary.
//!
//! A `Command` is what a seat *wants* to do. `decide` translates it
//! into events or, if it is currently illegal, into an empty batch (a
//! silent no-op, never an error). Callers pre-filter via `legal_moves`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::state::{CardId, Position};

/// Small inline list of card ids (targets, tributes).
pub type CardList = SmallVec<[CardId; 2]>;

/// A player-issued command.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Move to the next phase (rolls the turn from the end phase).
    AdvancePhase,

    /// Advance phases until the turn rolls over.
    EndTurn,

    /// Concede the match.
    Surrender,

    /// Normal summon a creature from hand, naming tributes if required.
    Summon {
        card: CardId,
        position: Position,
        tributes: CardList,
    },

    /// Set a creature from hand face-down in defense.
    SetMonster { card: CardId },

    /// Flip a face-down creature summoned on an earlier turn.
    FlipSummon { card: CardId },

    /// Set a spell or trap face-down in the spell/trap zone.
    SetSpellTrap { card: CardId },

    /// Activate a spell from hand or from a set face-down position.
    ActivateSpell { card: CardId, targets: CardList },

    /// Activate a set face-down trap.
    ActivateTrap { card: CardId, targets: CardList },

    /// Declare an attack; no target means a direct attack.
    DeclareAttack {
        attacker: CardId,
        target: Option<CardId>,
    },

    /// Respond on an open chain. `card: None` passes priority.
    ChainResponse {
        card: Option<CardId>,
        targets: CardList,
    },

    /// Activate an ignition effect of a face-up creature.
    ActivateEffect {
        card: CardId,
        effect_index: usize,
        targets: CardList,
    },

    /// Toggle a face-up creature's battle position.
    ChangePosition { card: CardId },
}

impl Command {
    /// A chain pass response.
    #[must_use]
    pub fn pass() -> Self {
        Command::ChainResponse {
            card: None,
            targets: CardList::new(),
        }
    }

    /// Is this command a chain response?
    #[must_use]
    pub fn is_chain_response(&self) -> bool {
        matches!(self, Command::ChainResponse { .. })
    }
}
