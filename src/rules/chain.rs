//! The chain: response windows and last-in-first-out resolution.
//!
//! A spell or trap activation opens a chain and hands priority to the
//! opponent. The priority holder either chains another set trap or
//! quick-play spell (handing priority back) or passes. Two consecutive
//! passes close the window and the chain resolves newest link first.
//! A resolving link carrying `Negate` marks the next link to resolve;
//! negated links skip their actions but their cards are still spent.

use crate::cards::{CardRegistry, SpellKind};
use crate::core::{CardId, EngineConfig, Event, GameState, Seat};
use crate::effects::resolver::{resolve_actions, ResolutionContext};
use crate::engine::apply_event;
use crate::zones::{self, Zone};

use super::spells;

/// Decide a chain response from the priority holder.
///
/// `card: None` passes; the second consecutive pass also resolves the
/// whole chain.
#[must_use]
pub fn decide_chain_response(
    state: &GameState,
    registry: &CardRegistry,
    config: &EngineConfig,
    seat: Seat,
    card: Option<CardId>,
    targets: &[CardId],
) -> Vec<Event> {
    match card {
        None => {
            let mut events = vec![Event::ChainPassed { seat }];
            if state.chain_passes >= 1 {
                let mut scratch = state.clone();
                apply_event(&mut scratch, registry, &events[0]);
                events.extend(resolve_chain(&mut scratch, registry, config));
            }
            events
        }
        Some(card) => decide_chain_link(state, registry, seat, card, targets),
    }
}

fn decide_chain_link(
    state: &GameState,
    registry: &CardRegistry,
    seat: Seat,
    card: CardId,
    targets: &[CardId],
) -> Vec<Event> {
    let Some(opener) = chain_opener(state, registry, seat, card) else {
        return Vec::new();
    };
    let definition = registry.get_unchecked(state.definition_id(card));
    let Some(activation) = spells::activation_events(state, seat, card, definition.effect(0), targets)
    else {
        return Vec::new();
    };

    let mut events = vec![opener];
    events.extend(activation);
    events
}

/// The event that turns the responding card face-up, if it is
/// chainable: a set trap or a set quick-play spell from an earlier
/// turn.
fn chain_opener(
    state: &GameState,
    registry: &CardRegistry,
    seat: Seat,
    card: CardId,
) -> Option<Event> {
    if spells::trap_activatable(state, registry, seat, card) {
        return Some(Event::TrapActivated { seat, card });
    }

    let (holder, set_card) = state.find_spell_trap(card)?;
    if holder != seat || set_card.face_up || set_card.set_turn >= state.turn_number {
        return None;
    }
    let is_quick_play = matches!(
        registry.get_unchecked(state.definition_id(card)).kind,
        crate::cards::CardKind::Spell(SpellKind::QuickPlay)
    );
    is_quick_play.then_some(Event::SpellActivated {
        seat,
        card,
        from_hand: false,
    })
}

/// Is any chain response besides passing available to `seat`?
#[must_use]
pub fn can_respond(state: &GameState, registry: &CardRegistry, seat: Seat, card: CardId) -> bool {
    chain_opener(state, registry, seat, card).is_some()
}

/// Resolve the chain newest link first against a scratch state.
///
/// Negation is re-checked per link as earlier resolutions fold. Spent
/// one-shot spells and traps go to the graveyard whether or not their
/// link was negated; continuous and field cards stay.
#[must_use]
pub fn resolve_chain(
    scratch: &mut GameState,
    registry: &CardRegistry,
    config: &EngineConfig,
) -> Vec<Event> {
    let mut events = Vec::new();

    for index in (0..scratch.chain.len()).rev() {
        if scratch.game_over {
            return events;
        }

        let link = scratch.chain[index].clone();
        if !scratch.chain[index].negated {
            let definition = registry.get_unchecked(scratch.definition_id(link.card));
            let effect = definition
                .effect(link.effect_index)
                .unwrap_or_else(|| panic!("Chain link references missing effect on {}", link.card));
            let ctx = ResolutionContext {
                registry,
                config,
                activator: link.seat,
                source: link.card,
                chain_index: Some(index),
            };
            events.extend(resolve_actions(scratch, &ctx, effect, &link.targets));
        }

        if !scratch.game_over {
            dispose_spent(scratch, registry, link.seat, link.card, &mut events);
        }
    }

    if !scratch.game_over {
        let done = Event::ChainResolved;
        apply_event(scratch, registry, &done);
        events.push(done);
    }

    events
}

/// Send a resolved one-shot spell or trap to the graveyard.
fn dispose_spent(
    scratch: &mut GameState,
    registry: &CardRegistry,
    seat: Seat,
    card: CardId,
    events: &mut Vec<Event>,
) {
    let zone = match zones::zone_of(scratch, seat, card) {
        Some(zone @ (Zone::SpellTrap | Zone::Field)) => zone,
        _ => return,
    };
    let one_shot = matches!(
        registry.get_unchecked(scratch.definition_id(card)).kind,
        crate::cards::CardKind::Spell(SpellKind::Normal | SpellKind::QuickPlay)
            | crate::cards::CardKind::Trap(crate::cards::TrapKind::Normal)
    );
    if !one_shot {
        return;
    }

    let moved = Event::CardMoved {
        seat,
        card,
        from: zone,
        to: Zone::Graveyard,
    };
    apply_event(scratch, registry, &moved);
    events.push(moved);
}

// === Evolvers ===

/// Fold a `ChainLinkAdded` event: push the link, priority to the
/// activator's opponent, pass counter resets.
pub fn evolve_chain_link_added(state: &mut GameState, link: crate::core::ChainLink) {
    state.priority = Some(link.seat.opponent());
    state.chain.push_back(link);
    state.chain_passes = 0;
}

/// Fold a `ChainPassed` event.
pub fn evolve_chain_passed(state: &mut GameState, seat: Seat) {
    state.chain_passes += 1;
    state.priority = Some(seat.opponent());
}

/// Fold a `ChainLinkNegated` event.
pub fn evolve_chain_link_negated(state: &mut GameState, index: usize) {
    let link = state
        .chain
        .get_mut(index)
        .unwrap_or_else(|| panic!("Negated chain link {} out of bounds", index));
    link.negated = true;
}

/// Fold a `ChainResolved` event: the window closes.
pub fn evolve_chain_resolved(state: &mut GameState) {
    state.chain.clear();
    state.priority = None;
    state.chain_passes = 0;
}
