//! State-based actions and bookkeeping evolvers.
//!
//! After every batch folds, the engine sweeps for loss conditions that
//! arise from the state itself rather than from a specific event: life
//! at or below zero and the vice-counter threshold. Both seats failing
//! at once is a draw. Evolvers for modifiers, restrictions, life, vice,
//! and effect-usage bookkeeping also live here.

use crate::cards::CardRegistry;
use crate::core::{
    CardId, EffectKey, EngineConfig, Event, GameState, Restriction, Seat, TemporaryModifier,
    WinReason,
};
use crate::effects::{RestrictionKind, StatField};

/// Sweep the state for loss conditions. At most one `GameEnded` is
/// produced; life depletion outranks the vice threshold when both hold.
#[must_use]
pub fn check_state_based_actions(state: &GameState, config: &EngineConfig) -> Vec<Event> {
    if state.game_over {
        return Vec::new();
    }

    let life_out: Vec<Seat> = Seat::ALL
        .into_iter()
        .filter(|&s| state.seats[s].life <= 0)
        .collect();
    if !life_out.is_empty() {
        return vec![ended(&life_out, WinReason::LifeDepleted)];
    }

    let vice_out: Vec<Seat> = Seat::ALL
        .into_iter()
        .filter(|&s| state.seats[s].vice_total >= config.vice_threshold)
        .collect();
    if !vice_out.is_empty() {
        return vec![ended(&vice_out, WinReason::ViceThreshold)];
    }

    Vec::new()
}

fn ended(losers: &[Seat], reason: WinReason) -> Event {
    let winner = match losers {
        [only] => Some(only.opponent()),
        _ => None,
    };
    Event::GameEnded { winner, reason }
}

// === Evolvers ===

/// Fold a `GameEnded` event.
pub fn evolve_game_ended(state: &mut GameState, winner: Option<Seat>, reason: WinReason) {
    state.game_over = true;
    state.winner = winner;
    state.win_reason = Some(reason);
}

/// Fold a `LifeChanged` event.
pub fn evolve_life_changed(state: &mut GameState, seat: Seat, delta: i32) {
    state.seats[seat].life += delta;
}

/// Fold a `ViceChanged` event: per-card counters and the seat tally.
pub fn evolve_vice_changed(state: &mut GameState, seat: Seat, card: CardId, delta: i32) {
    let board_card = state.seats[seat]
        .board
        .iter_mut()
        .find(|b| b.card == card)
        .unwrap_or_else(|| panic!("Vice counters on {} off {}'s board", card, seat));

    if delta >= 0 {
        board_card.vice_counters += delta as u32;
        state.seats[seat].vice_total += delta as u32;
    } else {
        let removed = (-delta) as u32;
        board_card.vice_counters = board_card.vice_counters.saturating_sub(removed);
        state.seats[seat].vice_total = state.seats[seat].vice_total.saturating_sub(removed);
    }
}

/// Fold a `ModifierApplied` event: record the modifier and apply its
/// delta to the target's boost field.
pub fn evolve_modifier_applied(state: &mut GameState, modifier: TemporaryModifier) {
    apply_boost(state, modifier.card, modifier.stat, modifier.delta);
    state.next_modifier_id = state.next_modifier_id.max(modifier.id + 1);
    state.modifiers.push_back(modifier);
}

/// Fold a `ModifierExpired` event: revert and drop the modifier.
///
/// Idempotent: an already-removed id folds to the same state, so
/// re-folding a batch cannot double-revert.
pub fn evolve_modifier_expired(state: &mut GameState, id: u32) {
    let Some(index) = state.modifiers.iter().position(|m| m.id == id) else {
        return;
    };
    let modifier = state.modifiers.remove(index);
    apply_boost(state, modifier.card, modifier.stat, -modifier.delta);
}

/// Fold a `RestrictionApplied` event.
pub fn evolve_restriction_applied(
    state: &mut GameState,
    card: CardId,
    kind: RestrictionKind,
    expires_turn: Option<u32>,
) {
    state.restrictions.push_back(Restriction {
        card,
        kind,
        expires_turn,
    });
}

/// Fold an `EffectActivated` event: mark once-per-turn and
/// once-per-match usage.
pub fn evolve_effect_activated(
    state: &mut GameState,
    registry: &CardRegistry,
    card: CardId,
    effect_index: usize,
) {
    let definition = registry.get_unchecked(state.definition_id(card));
    let Some(effect) = definition.effect(effect_index) else {
        panic!("Activated missing effect {} on {}", effect_index, card);
    };

    let key = EffectKey { card, effect_index };
    if effect.once_per_turn {
        state.opt_used.insert(key);
    }
    if effect.hard_once_per_turn {
        state.hopt_used.insert(key);
    }
}

/// Fold a `TributeCostModified` event into the seat's per-turn discount.
pub fn evolve_tribute_cost_modified(state: &mut GameState, seat: Seat, delta: i8) {
    let side = &mut state.seats[seat];
    if delta < 0 {
        side.tribute_discount += (-delta) as u8;
    } else {
        side.tribute_discount = side.tribute_discount.saturating_sub(delta as u8);
    }
}

fn apply_boost(state: &mut GameState, card: CardId, stat: StatField, delta: i32) {
    // Zone removal purges modifiers on departed cards.
    let Some(seat) = Seat::ALL
        .into_iter()
        .find(|&s| state.seats[s].board.iter().any(|b| b.card == card))
    else {
        return;
    };
    let board_card = state.seats[seat]
        .board
        .iter_mut()
        .find(|b| b.card == card)
        .expect("seat was just located");

    match stat {
        StatField::Attack => board_card.attack_boost += delta,
        StatField::Defense => board_card.defense_boost += delta,
    }
}
