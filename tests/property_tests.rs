//! Engine-wide invariants checked over randomized playouts.

use proptest::prelude::*;

use duelcore::cards::{CardDefinition, CardRegistry, DefId, SpellKind, TrapKind};
use duelcore::core::{CardId, Command, EngineConfig, Seat, SeatMap};
use duelcore::effects::{
    EffectAction, EffectDefinition, EffectTrigger, ModifierDuration, StatField, TargetFilter,
    TargetSide, TargetZone,
};
use duelcore::engine::Engine;
use duelcore::GameState;

fn card_pool() -> CardRegistry {
    CardRegistry::from_definitions(vec![
        CardDefinition::creature("grunt", "Gravel Grunt", 3, 1200, 900),
        CardDefinition::creature("wall", "Stone Wall", 4, 400, 1800),
        CardDefinition::creature("tyrant", "Ash Tyrant", 6, 2400, 1900),
        CardDefinition::creature("herald", "Deck Herald", 3, 800, 600).with_effect(
            EffectDefinition::new(
                EffectTrigger::OnSummon,
                vec![EffectAction::Draw { count: 1 }],
            ),
        ),
        CardDefinition::creature("brawler", "Pit Brawler", 4, 1000, 800).with_effect(
            EffectDefinition::new(
                EffectTrigger::Ignition,
                vec![EffectAction::Boost {
                    stat: StatField::Attack,
                    amount: 600,
                    duration: ModifierDuration::EndOfTurn,
                }],
            )
            .with_target(TargetFilter::new(TargetSide::Own, TargetZone::Board, 1))
            .once_per_turn(),
        ),
        CardDefinition::spell("bolt", "Cinder Bolt", SpellKind::Normal).with_effect(
            EffectDefinition::new(
                EffectTrigger::Quick,
                vec![EffectAction::Damage { amount: 500 }],
            ),
        ),
        CardDefinition::trap("veto", "Stern Veto", TrapKind::Normal).with_effect(
            EffectDefinition::new(EffectTrigger::Quick, vec![EffectAction::Negate]),
        ),
    ])
}

fn playout_engine() -> Engine {
    Engine::new(card_pool(), EngineConfig::default().with_starting_hand_size(4))
}

fn playout_decks() -> SeatMap<Vec<DefId>> {
    let names = [
        "grunt", "wall", "tyrant", "herald", "brawler", "bolt", "veto", "grunt", "wall", "bolt",
        "herald", "veto", "grunt", "brawler", "wall",
    ];
    SeatMap::with_value(names.iter().map(|&n| DefId::new(n)).collect())
}

/// Every card instance sits in exactly one zone of one seat.
fn assert_card_conservation(state: &GameState) {
    let mut seen: Vec<CardId> = Vec::new();
    for seat in Seat::ALL {
        let side = &state.seats[seat];
        seen.extend(side.hand.iter().copied());
        seen.extend(side.deck.iter().copied());
        seen.extend(side.board.iter().map(|b| b.card));
        seen.extend(side.spell_traps.iter().map(|st| st.card));
        seen.extend(side.field_spell.iter().map(|st| st.card));
        seen.extend(side.graveyard.iter().copied());
        seen.extend(side.banished.iter().copied());
    }
    seen.sort();

    let mut all: Vec<CardId> = state.cards.keys().copied().collect();
    all.sort();

    assert_eq!(seen, all, "card instances duplicated or lost");
}

/// The seat allowed to act right now.
fn actor(state: &GameState) -> Seat {
    state.priority.unwrap_or(state.turn_player)
}

/// Drive a match for up to `plies` moves, picking among legal moves by
/// index. Returns the trace of chosen commands with their actors.
fn playout(
    engine: &Engine,
    seed: u64,
    choices: &[prop::sample::Index],
) -> (GameState, Vec<(Seat, Command)>) {
    let mut state = engine.create_initial_state(playout_decks(), None, Some(seed));
    let mut trace = Vec::new();

    for choice in choices {
        if state.game_over {
            break;
        }
        let seat = actor(&state);
        let moves = engine.legal_moves(&state, seat);
        assert!(!moves.is_empty(), "live game must offer at least one move");

        // Never pick surrender; it makes playouts trivially short.
        let useful: Vec<&Command> = moves
            .iter()
            .filter(|m| !matches!(m, Command::Surrender))
            .collect();
        let command = useful[choice.index(useful.len())].clone();

        let events = engine.decide(&state, seat, &command);
        assert!(
            !events.is_empty(),
            "legal move {:?} rejected by decide",
            command
        );

        state = engine.evolve(&state, &events);
        assert_card_conservation(&state);
        trace.push((seat, command));
    }

    (state, trace)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Every advertised move is accepted and no invariant breaks,
    /// whatever path the match takes.
    #[test]
    fn random_playouts_stay_sound(
        seed in any::<u64>(),
        choices in prop::collection::vec(any::<prop::sample::Index>(), 60),
    ) {
        let engine = playout_engine();
        let (state, _) = playout(&engine, seed, &choices);

        // Terminal states carry a reason; live states never do.
        prop_assert_eq!(state.game_over, state.win_reason.is_some());
    }

    /// Re-running the identical seed and choices reproduces the match
    /// exactly.
    #[test]
    fn playouts_are_deterministic(
        seed in any::<u64>(),
        choices in prop::collection::vec(any::<prop::sample::Index>(), 40),
    ) {
        let engine = playout_engine();
        let (state_a, trace_a) = playout(&engine, seed, &choices);
        let (state_b, trace_b) = playout(&engine, seed, &choices);

        prop_assert_eq!(trace_a, trace_b);
        prop_assert_eq!(state_a, state_b);
    }

    /// Seats without authority always see an empty move list.
    #[test]
    fn only_one_seat_may_act(
        seed in any::<u64>(),
        choices in prop::collection::vec(any::<prop::sample::Index>(), 30),
    ) {
        let engine = playout_engine();
        let mut state = engine.create_initial_state(playout_decks(), None, Some(seed));

        for choice in &choices {
            if state.game_over {
                break;
            }
            let seat = actor(&state);
            prop_assert!(engine.legal_moves(&state, seat.opponent()).is_empty());

            let moves = engine.legal_moves(&state, seat);
            let command = moves[choice.index(moves.len())].clone();
            let (next, _) = engine.apply(&state, seat, &command);
            state = next;
        }
    }

    /// Folding a batch in two halves matches folding it whole when no
    /// summon triggers are involved (turn rollover batches).
    #[test]
    fn end_turn_batches_fold_associatively(
        seed in any::<u64>(),
        split in 0usize..6,
    ) {
        let engine = playout_engine();
        let state = engine.create_initial_state(playout_decks(), None, Some(seed));

        let events = engine.decide(&state, Seat::Host, &Command::EndTurn);
        let split = split.min(events.len());

        let whole = engine.evolve(&state, &events);
        let halved = engine.evolve(&engine.evolve(&state, &events[..split]), &events[split..]);

        prop_assert_eq!(whole, halved);
    }
}

#[test]
fn masked_views_never_leak_face_down_definitions() {
    let engine = playout_engine();

    // Drive a short game that favors setting cards, checking the
    // opponent's view at every step.
    let mut state = engine.create_initial_state(playout_decks(), None, Some(99));
    for _ in 0..30 {
        if state.game_over {
            break;
        }
        let seat = actor(&state);
        let moves = engine.legal_moves(&state, seat);
        let command = moves
            .iter()
            .find(|m| matches!(m, Command::SetMonster { .. } | Command::SetSpellTrap { .. }))
            .unwrap_or(&moves[0])
            .clone();
        let (next, _) = engine.apply(&state, seat, &command);
        state = next;

        for viewer in Seat::ALL {
            let view = engine.mask(&state, viewer);
            for board_card in &view.opponent.board {
                if !board_card.face_up {
                    assert_eq!(board_card.definition, DefId::hidden());
                }
            }
            for set_card in &view.opponent.spell_traps {
                if !set_card.face_up {
                    assert_eq!(set_card.definition, DefId::hidden());
                }
            }
        }
    }
}
