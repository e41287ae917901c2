//! Effect resolution: an effect's action list becomes an event batch.
//!
//! Resolution runs against a scratch state: every emitted event is
//! folded before the next action executes, so a `Draw` followed by a
//! `Discard` sees the drawn card in hand. Targeted actions skip targets
//! that have already left their expected zone by the time the action
//! runs (a later chain link may have moved them).

use crate::cards::CardRegistry;
use crate::core::{
    CardId, EngineConfig, Event, GameState, Position, Seat, TemporaryModifier,
};
use crate::engine::apply_event;
use crate::zones::{self, Zone};

use super::definition::{EffectAction, EffectDefinition, ModifierDuration};

/// Everything an action needs beyond the scratch state.
pub struct ResolutionContext<'a> {
    pub registry: &'a CardRegistry,
    pub config: &'a EngineConfig,

    /// Seat that activated the effect.
    pub activator: Seat,

    /// Card carrying the effect.
    pub source: CardId,

    /// Index of the resolving chain link, when resolving on a chain.
    /// `Negate` is a no-op without it.
    pub chain_index: Option<usize>,
}

/// Resolve an effect's actions in order, folding each event into
/// `scratch` as it is emitted. Stops early if the game ends mid-way.
#[must_use]
pub fn resolve_actions(
    scratch: &mut GameState,
    ctx: &ResolutionContext<'_>,
    effect: &EffectDefinition,
    targets: &[CardId],
) -> Vec<Event> {
    let mut events = Vec::new();

    for action in &effect.actions {
        resolve_action(scratch, ctx, action, targets, &mut events);
        if scratch.game_over {
            break;
        }
    }

    events
}

fn resolve_action(
    scratch: &mut GameState,
    ctx: &ResolutionContext<'_>,
    action: &EffectAction,
    targets: &[CardId],
    events: &mut Vec<Event>,
) {
    match action {
        EffectAction::Boost {
            stat,
            amount,
            duration,
        } => {
            for &target in targets {
                if scratch.find_board(target).is_none() {
                    continue;
                }
                let modifier = TemporaryModifier {
                    id: scratch.next_modifier_id,
                    card: target,
                    stat: *stat,
                    delta: *amount,
                    source: ctx.source,
                    expires_turn: expiry_turn(*duration, scratch.turn_number),
                };
                emit(scratch, ctx, events, Event::ModifierApplied { modifier });
            }
        }

        EffectAction::Damage { amount } => {
            emit(
                scratch,
                ctx,
                events,
                Event::LifeChanged {
                    seat: ctx.activator.opponent(),
                    delta: -amount,
                },
            );
        }

        EffectAction::Heal { amount } => {
            emit(
                scratch,
                ctx,
                events,
                Event::LifeChanged {
                    seat: ctx.activator,
                    delta: *amount,
                },
            );
        }

        EffectAction::Draw { count } => {
            for _ in 0..*count {
                match scratch.seats[ctx.activator].deck.front() {
                    Some(&card) => emit(
                        scratch,
                        ctx,
                        events,
                        Event::CardDrawn {
                            seat: ctx.activator,
                            card,
                        },
                    ),
                    None => {
                        emit(
                            scratch,
                            ctx,
                            events,
                            Event::DeckOut {
                                seat: ctx.activator,
                            },
                        );
                        return;
                    }
                }
            }
        }

        EffectAction::Discard { count } => {
            for _ in 0..*count {
                let Some(&head) = scratch.seats[ctx.activator].hand.front() else {
                    break;
                };
                emit(
                    scratch,
                    ctx,
                    events,
                    Event::CardMoved {
                        seat: ctx.activator,
                        card: head,
                        from: Zone::Hand,
                        to: Zone::Graveyard,
                    },
                );
            }
        }

        EffectAction::Destroy => {
            for &target in targets {
                let Some((seat, zone)) = locate(scratch, target) else {
                    continue;
                };
                if matches!(zone, Zone::Board | Zone::SpellTrap | Zone::Field) {
                    emit(
                        scratch,
                        ctx,
                        events,
                        Event::CardMoved {
                            seat,
                            card: target,
                            from: zone,
                            to: Zone::Graveyard,
                        },
                    );
                }
            }
        }

        EffectAction::Negate => {
            if let Some(index) = ctx.chain_index {
                if index > 0 {
                    emit(
                        scratch,
                        ctx,
                        events,
                        Event::ChainLinkNegated { index: index - 1 },
                    );
                }
            }
        }

        EffectAction::ReturnToHand => {
            for &target in targets {
                let Some((seat, zone)) = locate(scratch, target) else {
                    continue;
                };
                if matches!(zone, Zone::Board | Zone::SpellTrap | Zone::Field) {
                    emit(
                        scratch,
                        ctx,
                        events,
                        Event::CardMoved {
                            seat,
                            card: target,
                            from: zone,
                            to: Zone::Hand,
                        },
                    );
                }
            }
        }

        EffectAction::Banish => {
            for &target in targets {
                let Some((seat, zone)) = locate(scratch, target) else {
                    continue;
                };
                if zone != Zone::Deck && zone != Zone::Banished {
                    emit(
                        scratch,
                        ctx,
                        events,
                        Event::CardMoved {
                            seat,
                            card: target,
                            from: zone,
                            to: Zone::Banished,
                        },
                    );
                }
            }
        }

        EffectAction::SpecialSummon => {
            for &target in targets {
                let in_graveyard =
                    matches!(locate(scratch, target), Some((_, Zone::Graveyard)));
                let definition = ctx.registry.get_unchecked(scratch.definition_id(target));
                let has_space = scratch.seats[ctx.activator].board.len()
                    < ctx.config.max_board_slots;
                if in_graveyard && definition.kind.is_creature() && has_space {
                    emit(
                        scratch,
                        ctx,
                        events,
                        Event::SpecialSummoned {
                            seat: ctx.activator,
                            card: target,
                            position: Position::Attack,
                        },
                    );
                }
            }
        }

        EffectAction::ChangePosition => {
            for &target in targets {
                let Some((seat, board_card)) = scratch.find_board(target) else {
                    continue;
                };
                if board_card.face_up {
                    let position = board_card.position.flipped();
                    emit(
                        scratch,
                        ctx,
                        events,
                        Event::PositionChanged {
                            seat,
                            card: target,
                            position,
                        },
                    );
                }
            }
        }

        EffectAction::ViewTop { count } => {
            let cards: Vec<CardId> = scratch.seats[ctx.activator]
                .deck
                .iter()
                .take(*count)
                .copied()
                .collect();
            emit(
                scratch,
                ctx,
                events,
                Event::DeckViewed {
                    seat: ctx.activator,
                    cards,
                },
            );
        }

        EffectAction::ApplyRestriction {
            restriction,
            duration,
        } => {
            for &target in targets {
                if scratch.find_board(target).is_none() {
                    continue;
                }
                emit(
                    scratch,
                    ctx,
                    events,
                    Event::RestrictionApplied {
                        card: target,
                        kind: *restriction,
                        expires_turn: expiry_turn(*duration, scratch.turn_number),
                    },
                );
            }
        }

        EffectAction::ModifyTributeCost { delta } => {
            emit(
                scratch,
                ctx,
                events,
                Event::TributeCostModified {
                    seat: ctx.activator,
                    delta: *delta,
                },
            );
        }

        EffectAction::AddVice { count } => {
            for &target in targets {
                let Some((seat, _)) = scratch.find_board(target) else {
                    continue;
                };
                emit(
                    scratch,
                    ctx,
                    events,
                    Event::ViceChanged {
                        seat,
                        card: target,
                        delta: *count as i32,
                    },
                );
            }
        }

        EffectAction::RemoveVice { count } => {
            for &target in targets {
                let Some((seat, board_card)) = scratch.find_board(target) else {
                    continue;
                };
                let removable = (*count).min(board_card.vice_counters);
                if removable > 0 {
                    emit(
                        scratch,
                        ctx,
                        events,
                        Event::ViceChanged {
                            seat,
                            card: target,
                            delta: -(removable as i32),
                        },
                    );
                }
            }
        }
    }
}

/// Fold an event into the scratch state and record it.
fn emit(
    scratch: &mut GameState,
    ctx: &ResolutionContext<'_>,
    events: &mut Vec<Event>,
    event: Event,
) {
    apply_event(scratch, ctx.registry, &event);
    events.push(event);
}

/// Resolve a duration class into an absolute expiry turn.
fn expiry_turn(duration: ModifierDuration, current_turn: u32) -> Option<u32> {
    match duration {
        ModifierDuration::EndOfTurn => Some(current_turn + 1),
        ModifierDuration::EndOfNextTurn => Some(current_turn + 2),
        ModifierDuration::Permanent => None,
    }
}

/// Find the seat and zone holding a card, if it is anywhere.
fn locate(state: &GameState, card: CardId) -> Option<(Seat, Zone)> {
    Seat::ALL
        .into_iter()
        .find_map(|seat| zones::zone_of(state, seat, card).map(|zone| (seat, zone)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, DefId};
    use crate::core::{BoardCard, CardMeta};
    use crate::effects::{EffectTrigger, StatField};

    fn setup() -> (GameState, CardRegistry, EngineConfig) {
        let registry = CardRegistry::from_definitions(vec![
            CardDefinition::creature("c1", "Golem", 4, 1500, 1200),
            CardDefinition::creature("c2", "Imp", 2, 800, 600),
        ]);
        let mut state = GameState::new(Seat::Host, 8000);
        for (i, def) in ["c1", "c2"].iter().enumerate() {
            state.cards.insert(
                CardId::new(i as u32),
                CardMeta {
                    definition: DefId::new(*def),
                    owner: Seat::Host,
                },
            );
        }
        (state, registry, EngineConfig::default())
    }

    fn ctx<'a>(
        registry: &'a CardRegistry,
        config: &'a EngineConfig,
        source: CardId,
    ) -> ResolutionContext<'a> {
        ResolutionContext {
            registry,
            config,
            activator: Seat::Host,
            source,
            chain_index: None,
        }
    }

    #[test]
    fn test_damage_hits_opponent() {
        let (mut state, registry, config) = setup();
        let effect = EffectDefinition::new(
            EffectTrigger::Ignition,
            vec![EffectAction::Damage { amount: 500 }],
        );

        let events = resolve_actions(
            &mut state,
            &ctx(&registry, &config, CardId::new(0)),
            &effect,
            &[],
        );

        assert_eq!(
            events,
            vec![Event::LifeChanged {
                seat: Seat::Away,
                delta: -500
            }]
        );
        assert_eq!(state.seats[Seat::Away].life, 7500);
    }

    #[test]
    fn test_boost_creates_modifier_and_applies() {
        let (mut state, registry, config) = setup();
        let target = CardId::new(1);
        state.seats[Seat::Host].board.push_back(BoardCard::new(
            target,
            DefId::new("c2"),
            Position::Attack,
            true,
            1,
        ));
        let effect = EffectDefinition::new(
            EffectTrigger::Ignition,
            vec![EffectAction::Boost {
                stat: StatField::Attack,
                amount: 400,
                duration: ModifierDuration::EndOfTurn,
            }],
        );

        let events = resolve_actions(
            &mut state,
            &ctx(&registry, &config, CardId::new(0)),
            &effect,
            &[target],
        );

        assert_eq!(events.len(), 1);
        assert_eq!(state.modifiers.len(), 1);
        let modifier = &state.modifiers[0];
        assert_eq!(modifier.delta, 400);
        assert_eq!(modifier.expires_turn, Some(2));
        assert_eq!(state.seats[Seat::Host].board[0].attack_boost, 400);
    }

    #[test]
    fn test_destroy_skips_departed_target() {
        let (mut state, registry, config) = setup();
        let effect = EffectDefinition::new(EffectTrigger::Quick, vec![EffectAction::Destroy]);

        // Target is not on the board (already destroyed elsewhere).
        let events = resolve_actions(
            &mut state,
            &ctx(&registry, &config, CardId::new(0)),
            &effect,
            &[CardId::new(1)],
        );

        assert!(events.is_empty());
    }

    #[test]
    fn test_draw_from_empty_deck_ends_game() {
        let (mut state, registry, config) = setup();
        let effect = EffectDefinition::new(
            EffectTrigger::Ignition,
            vec![
                EffectAction::Draw { count: 1 },
                EffectAction::Damage { amount: 100 },
            ],
        );

        let events = resolve_actions(
            &mut state,
            &ctx(&registry, &config, CardId::new(0)),
            &effect,
            &[],
        );

        // Deck-out stops resolution before the damage action.
        assert_eq!(events, vec![Event::DeckOut { seat: Seat::Host }]);
        assert!(state.game_over);
    }

    #[test]
    fn test_negate_outside_chain_is_noop() {
        let (mut state, registry, config) = setup();
        let effect = EffectDefinition::new(EffectTrigger::Quick, vec![EffectAction::Negate]);

        let events = resolve_actions(
            &mut state,
            &ctx(&registry, &config, CardId::new(0)),
            &effect,
            &[],
        );

        assert!(events.is_empty());
    }

    #[test]
    fn test_expiry_turn_mapping() {
        assert_eq!(expiry_turn(ModifierDuration::EndOfTurn, 3), Some(4));
        assert_eq!(expiry_turn(ModifierDuration::EndOfNextTurn, 3), Some(5));
        assert_eq!(expiry_turn(ModifierDuration::Permanent, 3), None);
    }
}
