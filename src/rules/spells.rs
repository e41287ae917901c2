//! Spells and traps: setting and activating.
//!
//! Every spell or trap activation opens (or will extend) a chain: the
//! decide produces a `ChainLinkAdded`, which hands priority to the
//! opponent. Traps and quick-play spells activated from a set position
//! must have been set on an earlier turn. Field spells occupy their own
//! slot; activating a new one sends the old one to the graveyard.

use crate::cards::{CardRegistry, SpellKind};
use crate::core::{
    CardId, ChainLink, EngineConfig, Event, GameState, Seat, SpellTrapCard,
};
use crate::effects::{validate_declared, EffectDefinition};
use crate::zones::{self, Zone};

/// Decide setting a spell or trap face-down.
#[must_use]
pub fn decide_set_spell_trap(
    state: &GameState,
    registry: &CardRegistry,
    config: &EngineConfig,
    seat: Seat,
    card: CardId,
) -> Vec<Event> {
    if !state.phase.is_main() {
        return Vec::new();
    }
    if zones::zone_of(state, seat, card) != Some(Zone::Hand) {
        return Vec::new();
    }
    let definition = registry.get_unchecked(state.definition_id(card));
    if !definition.kind.is_spell() && !definition.kind.is_trap() {
        return Vec::new();
    }

    let side = &state.seats[seat];
    let has_room = if is_field_spell(registry, state, card) {
        side.field_spell.is_none()
    } else {
        side.spell_traps.len() < config.max_spell_trap_slots
    };
    if !has_room {
        return Vec::new();
    }

    vec![Event::SpellTrapSet { seat, card }]
}

/// Decide activating a spell from hand or from a set position.
#[must_use]
pub fn decide_activate_spell(
    state: &GameState,
    registry: &CardRegistry,
    config: &EngineConfig,
    seat: Seat,
    card: CardId,
    targets: &[CardId],
) -> Vec<Event> {
    if !state.phase.is_main() {
        return Vec::new();
    }
    let definition = registry.get_unchecked(state.definition_id(card));
    let Some(kind) = spell_kind(definition.kind) else {
        return Vec::new();
    };

    let from_hand = match zones::zone_of(state, seat, card) {
        Some(Zone::Hand) => true,
        Some(Zone::SpellTrap) | Some(Zone::Field) => {
            let (_, set_card) = state
                .find_spell_trap(card)
                .expect("zone_of said spell/trap zone");
            if set_card.face_up {
                return Vec::new();
            }
            // Quick-plays set this turn are locked, like traps.
            if kind == SpellKind::QuickPlay && set_card.set_turn >= state.turn_number {
                return Vec::new();
            }
            false
        }
        _ => return Vec::new(),
    };

    let side = &state.seats[seat];
    let mut events = Vec::new();
    if from_hand {
        if kind == SpellKind::Field {
            if let Some(old) = &side.field_spell {
                events.push(Event::CardMoved {
                    seat,
                    card: old.card,
                    from: Zone::Field,
                    to: Zone::Graveyard,
                });
            }
        } else if side.spell_traps.len() >= config.max_spell_trap_slots {
            return Vec::new();
        }
    }

    let Some(activation) = activation_events(state, seat, card, definition.effect(0), targets)
    else {
        return Vec::new();
    };
    events.push(Event::SpellActivated {
        seat,
        card,
        from_hand,
    });
    events.extend(activation);
    events
}

/// Decide activating a set trap on the activator's own turn.
#[must_use]
pub fn decide_activate_trap(
    state: &GameState,
    registry: &CardRegistry,
    seat: Seat,
    card: CardId,
    targets: &[CardId],
) -> Vec<Event> {
    if !state.phase.is_main() {
        return Vec::new();
    }
    if !trap_activatable(state, registry, seat, card) {
        return Vec::new();
    }
    let definition = registry.get_unchecked(state.definition_id(card));

    let Some(activation) = activation_events(state, seat, card, definition.effect(0), targets)
    else {
        return Vec::new();
    };
    let mut events = vec![Event::TrapActivated { seat, card }];
    events.extend(activation);
    events
}

/// Is this card a set trap (or chainable quick-play) ready to fire?
///
/// Shared between the turn player's trap activation and chain
/// responses: face-down, set on an earlier turn, effect not consumed.
#[must_use]
pub fn trap_activatable(
    state: &GameState,
    registry: &CardRegistry,
    seat: Seat,
    card: CardId,
) -> bool {
    let Some((holder, set_card)) = state.find_spell_trap(card) else {
        return false;
    };
    if holder != seat || set_card.face_up || set_card.set_turn >= state.turn_number {
        return false;
    }
    registry.get_unchecked(state.definition_id(card)).kind.is_trap()
}

/// The shared tail of every activation: mark the effect used and add
/// the chain link. `None` when the effect is missing, consumed, or the
/// targets do not satisfy its filter.
pub(crate) fn activation_events(
    state: &GameState,
    seat: Seat,
    card: CardId,
    effect: Option<&EffectDefinition>,
    targets: &[CardId],
) -> Option<Vec<Event>> {
    let effect = effect?;
    let key = crate::core::EffectKey {
        card,
        effect_index: 0,
    };
    if state.effect_used(key) {
        return None;
    }
    if !validate_declared(state, seat, effect, targets) {
        return None;
    }

    Some(vec![
        Event::EffectActivated {
            seat,
            card,
            effect_index: 0,
        },
        Event::ChainLinkAdded {
            link: ChainLink {
                card,
                seat,
                effect_index: 0,
                targets: targets.to_vec(),
                negated: false,
            },
        },
    ])
}

fn spell_kind(kind: crate::cards::CardKind) -> Option<SpellKind> {
    match kind {
        crate::cards::CardKind::Spell(k) => Some(k),
        _ => None,
    }
}

fn is_field_spell(registry: &CardRegistry, state: &GameState, card: CardId) -> bool {
    matches!(
        registry.get_unchecked(state.definition_id(card)).kind,
        crate::cards::CardKind::Spell(SpellKind::Field)
    )
}

// === Evolvers ===

/// Fold a `SpellTrapSet` event.
pub fn evolve_spell_trap_set(
    state: &mut GameState,
    registry: &CardRegistry,
    seat: Seat,
    card: CardId,
) {
    let from = zones::remove_card(state, seat, card);
    assert_eq!(from, Some(Zone::Hand), "{} set from outside hand", card);

    let set_card = SpellTrapCard {
        card,
        definition: state.definition_id(card).clone(),
        face_up: false,
        set_turn: state.turn_number,
    };
    if is_field_spell(registry, state, card) {
        state.seats[seat].field_spell = Some(set_card);
    } else {
        state.seats[seat].spell_traps.push_back(set_card);
    }
}

/// Fold a `SpellActivated` event.
pub fn evolve_spell_activated(
    state: &mut GameState,
    registry: &CardRegistry,
    seat: Seat,
    card: CardId,
    from_hand: bool,
) {
    if from_hand {
        let from = zones::remove_card(state, seat, card);
        assert_eq!(
            from,
            Some(Zone::Hand),
            "{} activated from outside hand",
            card
        );
        let active = SpellTrapCard {
            card,
            definition: state.definition_id(card).clone(),
            face_up: true,
            set_turn: state.turn_number,
        };
        if is_field_spell(registry, state, card) {
            assert!(
                state.seats[seat].field_spell.is_none(),
                "Field slot still occupied"
            );
            state.seats[seat].field_spell = Some(active);
        } else {
            state.seats[seat].spell_traps.push_back(active);
        }
    } else {
        flip_face_up(state, seat, card);
    }
}

/// Fold a `TrapActivated` event.
pub fn evolve_trap_activated(state: &mut GameState, seat: Seat, card: CardId) {
    flip_face_up(state, seat, card);
}

fn flip_face_up(state: &mut GameState, seat: Seat, card: CardId) {
    let side = &mut state.seats[seat];
    if let Some(set_card) = side.spell_traps.iter_mut().find(|st| st.card == card) {
        set_card.face_up = true;
        return;
    }
    if let Some(set_card) = side.field_spell.as_mut().filter(|st| st.card == card) {
        set_card.face_up = true;
        return;
    }
    panic!("{} activated but not in {}'s spell/trap zones", card, seat);
}
