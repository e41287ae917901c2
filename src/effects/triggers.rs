//! Trigger detection: which effects auto-fire after a batch folds.
//!
//! After `evolve` folds a batch, any creature that arrived face-up on
//! the board fires its on-summon effects. Detection is re-run on the
//! events those resolutions emit, so a special summon performed by a
//! trigger fires the summoned creature's own triggers in turn.

use crate::cards::CardRegistry;
use crate::core::{CardId, Event, GameState, Seat};

use super::definition::{EffectDefinition, EffectTrigger};
use super::targeting::candidates;

/// An effect due to auto-fire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTrigger {
    pub seat: Seat,
    pub card: CardId,
    pub effect_index: usize,
}

/// Scan a folded batch for summon events and collect the on-summon
/// effects that should fire, in batch order.
///
/// An effect fires only if the creature is still on the board and the
/// effect has not been consumed (once-per-turn / once-per-match).
#[must_use]
pub fn pending_triggers(
    state: &GameState,
    registry: &CardRegistry,
    batch: &[Event],
) -> Vec<PendingTrigger> {
    let mut pending = Vec::new();

    for event in batch {
        let (seat, card) = match event {
            Event::NormalSummoned { seat, card, .. }
            | Event::SpecialSummoned { seat, card, .. }
            | Event::FlipSummoned { seat, card } => (*seat, *card),
            _ => continue,
        };

        if state.find_board(card).is_none() {
            continue;
        }

        let definition = registry.get_unchecked(state.definition_id(card));
        for (effect_index, effect) in definition.effects.iter().enumerate() {
            if effect.trigger != EffectTrigger::OnSummon {
                continue;
            }
            let key = crate::core::EffectKey { card, effect_index };
            if state.effect_used(key) {
                continue;
            }
            pending.push(PendingTrigger {
                seat,
                card,
                effect_index,
            });
        }
    }

    pending
}

/// Deterministic target selection for an auto-fired effect: the first
/// `count` candidates in enumeration order.
///
/// Returns `None` when too few candidates exist; the trigger then
/// fizzles without activating.
#[must_use]
pub fn auto_targets(
    state: &GameState,
    activator: Seat,
    effect: &EffectDefinition,
) -> Option<Vec<CardId>> {
    match &effect.target {
        None => Some(Vec::new()),
        Some(filter) => {
            let pool = candidates(state, activator, filter);
            if pool.len() < filter.count {
                return None;
            }
            Some(pool.into_iter().take(filter.count).collect())
        }
    }
}
