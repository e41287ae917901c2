//! Events — the closed vocabulary of state deltas.
//!
//! Every way the game state can change is an `Event` variant. `evolve`
//! folds events left-to-right into a new snapshot; the dispatch is an
//! exhaustive match, so an added variant with no evolver fails to
//! compile rather than hitting a runtime "unreachable".

use serde::{Deserialize, Serialize};

use super::seat::Seat;
use super::state::{CardId, ChainLink, Phase, Position, TemporaryModifier, WinReason};
use crate::effects::RestrictionKind;
use crate::zones::Zone;

/// A single state delta.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    // === Turn structure ===
    /// The current phase changed (within the same turn).
    PhaseChanged { phase: Phase },

    /// A new turn began: `seat` becomes the turn player, phase resets
    /// to draw, per-turn flags clear.
    TurnStarted { turn: u32, seat: Seat },

    /// The mandatory draw (or an effect draw) moved a card from the
    /// head of `seat`'s deck to their hand.
    CardDrawn { seat: Seat, card: CardId },

    /// `seat` attempted to draw from an empty deck and loses.
    DeckOut { seat: Seat },

    // === Summoning ===
    /// A creature was normal summoned (tributes already paid via
    /// preceding `CardMoved` events).
    NormalSummoned {
        seat: Seat,
        card: CardId,
        position: Position,
    },

    /// A creature was set face-down in defense.
    MonsterSet { seat: Seat, card: CardId },

    /// A face-down creature was flip summoned to face-up attack.
    FlipSummoned { seat: Seat, card: CardId },

    /// A face-down defender was flipped face-up by battle.
    MonsterFlipped { seat: Seat, card: CardId },

    /// A face-up creature changed battle position.
    PositionChanged {
        seat: Seat,
        card: CardId,
        position: Position,
    },

    /// A creature arrived on the board by card effect.
    SpecialSummoned {
        seat: Seat,
        card: CardId,
        position: Position,
    },

    // === Spells & traps ===
    /// A spell or trap was set face-down.
    SpellTrapSet { seat: Seat, card: CardId },

    /// A spell was activated (placed or turned face-up).
    SpellActivated {
        seat: Seat,
        card: CardId,
        from_hand: bool,
    },

    /// A set trap was activated (turned face-up).
    TrapActivated { seat: Seat, card: CardId },

    // === Zone transfer ===
    /// The generic zone transfer: `card` left `from` and entered `to`
    /// under `seat`'s control.
    CardMoved {
        seat: Seat,
        card: CardId,
        from: Zone,
        to: Zone,
    },

    // === Combat ===
    /// An attack was declared; `target: None` is a direct attack.
    AttackDeclared {
        seat: Seat,
        attacker: CardId,
        target: Option<CardId>,
    },

    /// Battle damage to `seat`'s life points.
    BattleDamage { seat: Seat, amount: i32 },

    /// A creature lost the battle comparison.
    DestroyedByBattle { seat: Seat, card: CardId },

    // === Effects ===
    /// An effect was activated (also marks OPT/HOPT usage).
    EffectActivated {
        seat: Seat,
        card: CardId,
        effect_index: usize,
    },

    /// Life points changed by an effect (negative = damage).
    LifeChanged { seat: Seat, delta: i32 },

    /// Vice counters on a board card (and its controller's tally)
    /// changed.
    ViceChanged { seat: Seat, card: CardId, delta: i32 },

    /// A temporary stat modifier was created and applied.
    ModifierApplied { modifier: TemporaryModifier },

    /// A temporary modifier reached its expiry turn and reverted.
    ModifierExpired { id: u32 },

    /// A timed restriction was placed on a board card.
    RestrictionApplied {
        card: CardId,
        kind: RestrictionKind,
        expires_turn: Option<u32>,
    },

    /// The top of `seat`'s deck was revealed. Informational; folds to
    /// the same state.
    DeckViewed { seat: Seat, cards: Vec<CardId> },

    /// A seat's tribute requirement changed for this turn.
    TributeCostModified { seat: Seat, delta: i8 },

    // === Chain ===
    /// A link was added, handing priority to the activator's opponent.
    ChainLinkAdded { link: ChainLink },

    /// The priority holder passed; priority moves to their opponent.
    ChainPassed { seat: Seat },

    /// A resolving link negated the link at `index`.
    ChainLinkNegated { index: usize },

    /// The chain finished resolving and is cleared.
    ChainResolved,

    // === Terminal ===
    /// The match ended. `winner: None` is a draw.
    GameEnded {
        winner: Option<Seat>,
        reason: WinReason,
    },
}

impl Event {
    /// Does this event end the match?
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::GameEnded { .. } | Event::DeckOut { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_events() {
        assert!(Event::GameEnded {
            winner: Some(Seat::Host),
            reason: WinReason::LifeDepleted
        }
        .is_terminal());
        assert!(Event::DeckOut { seat: Seat::Away }.is_terminal());
        assert!(!Event::ChainResolved.is_terminal());
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::CardMoved {
            seat: Seat::Host,
            card: CardId::new(3),
            from: Zone::Board,
            to: Zone::Graveyard,
        };

        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
        assert!(json.contains("card_moved"));
    }
}
