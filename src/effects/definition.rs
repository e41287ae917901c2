//! Effect definitions — the structured form of card ability text.
//!
//! The ability-text parser (an external collaborator) translates raw
//! card text into `EffectDefinition` values before the engine ever
//! sees them. The engine only consumes this structured form.
//!
//! An effect is a trigger class, an optional target filter, and an
//! ordered list of atomic `EffectAction`s, plus once-per-turn flags.

use serde::{Deserialize, Serialize};

use super::targeting::TargetFilter;

/// When an effect may fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTrigger {
    /// Fires automatically when the carrying creature is summoned.
    OnSummon,
    /// Manually activated by its controller during a main phase.
    Ignition,
    /// Fires automatically when its condition becomes true.
    Trigger,
    /// May be activated in response on an open chain.
    Quick,
    /// Applies while the card remains face-up.
    Continuous,
}

/// Which stat a boost or modifier touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatField {
    Attack,
    Defense,
}

/// How long a temporary modifier lasts.
///
/// Resolved into an absolute turn number when the modifier is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierDuration {
    EndOfTurn,
    EndOfNextTurn,
    Permanent,
}

/// A restriction an effect can place on a board card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionKind {
    CannotAttack,
    CannotChangePosition,
}

/// An atomic effect action.
///
/// Actions execute in order against the effect's declared targets.
/// Targeted actions (`Boost`, `Destroy`, ...) apply per target; seat
/// actions (`Damage`, `Draw`, ...) apply to a seat derived from the
/// activator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectAction {
    /// Apply a temporary stat modifier to each target.
    Boost {
        stat: StatField,
        amount: i32,
        duration: ModifierDuration,
    },

    /// Deal damage to the opponent's life points.
    Damage { amount: i32 },

    /// Restore the activator's life points.
    Heal { amount: i32 },

    /// The activator draws cards.
    Draw { count: usize },

    /// The activator discards from the head of their hand.
    Discard { count: usize },

    /// Destroy each target (board or spell/trap zone, to graveyard).
    Destroy,

    /// Negate the next chain link to resolve. No-op outside a chain.
    Negate,

    /// Return each target from the board to its owner's hand.
    ReturnToHand,

    /// Banish each target.
    Banish,

    /// Special-summon each target from the graveyard, face-up attack.
    SpecialSummon,

    /// Toggle each target's battle position.
    ChangePosition,

    /// Reveal the top cards of the activator's deck.
    ViewTop { count: usize },

    /// Place a timed restriction on each target.
    ApplyRestriction {
        restriction: RestrictionKind,
        duration: ModifierDuration,
    },

    /// Adjust the activator's tribute requirement for this turn.
    ModifyTributeCost { delta: i8 },

    /// Add vice counters to each target.
    AddVice { count: u32 },

    /// Remove vice counters from each target.
    RemoveVice { count: u32 },
}

/// A single card effect: trigger class, targeting, actions, usage limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectDefinition {
    /// When the effect may fire.
    pub trigger: EffectTrigger,

    /// What the effect targets. `None` for untargeted effects.
    pub target: Option<TargetFilter>,

    /// Actions executed in order on resolution.
    pub actions: Vec<EffectAction>,

    /// Usable at most once per turn.
    pub once_per_turn: bool,

    /// Usable at most once per match.
    pub hard_once_per_turn: bool,
}

impl EffectDefinition {
    /// Create an effect with the given trigger and actions.
    #[must_use]
    pub fn new(trigger: EffectTrigger, actions: Vec<EffectAction>) -> Self {
        Self {
            trigger,
            target: None,
            actions,
            once_per_turn: false,
            hard_once_per_turn: false,
        }
    }

    /// Set the target filter.
    #[must_use]
    pub fn with_target(mut self, target: TargetFilter) -> Self {
        self.target = Some(target);
        self
    }

    /// Mark once-per-turn.
    #[must_use]
    pub fn once_per_turn(mut self) -> Self {
        self.once_per_turn = true;
        self
    }

    /// Mark hard-once-per-turn.
    #[must_use]
    pub fn hard_once_per_turn(mut self) -> Self {
        self.hard_once_per_turn = true;
        self
    }

    /// Number of targets this effect requires.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.target.as_ref().map_or(0, |t| t.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::targeting::{TargetFilter, TargetSide, TargetZone};

    #[test]
    fn test_effect_builder() {
        let effect = EffectDefinition::new(
            EffectTrigger::Ignition,
            vec![EffectAction::Damage { amount: 500 }],
        )
        .once_per_turn();

        assert_eq!(effect.trigger, EffectTrigger::Ignition);
        assert!(effect.once_per_turn);
        assert!(!effect.hard_once_per_turn);
        assert_eq!(effect.target_count(), 0);
    }

    #[test]
    fn test_effect_with_target() {
        let effect = EffectDefinition::new(EffectTrigger::Quick, vec![EffectAction::Destroy])
            .with_target(TargetFilter::new(TargetSide::Opponent, TargetZone::Board, 1));

        assert_eq!(effect.target_count(), 1);
    }

    #[test]
    fn test_action_serialization() {
        let action = EffectAction::Boost {
            stat: StatField::Attack,
            amount: 300,
            duration: ModifierDuration::EndOfTurn,
        };

        let json = serde_json::to_string(&action).unwrap();
        let back: EffectAction = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
    }
}
