//! Phase state machine: draw → standby → main → combat → main2 → end.
//!
//! Crossing draw→standby forces the turn player's draw. Advancing out
//! of the end phase rolls the turn: the opposing seat becomes the turn
//! player, per-turn flags reset, and due temporary modifiers expire.
//! `END_TURN` is sugar for advancing until the turn rolls over.

use crate::core::{CardId, Event, GameState, Phase, Seat, WinReason};

/// Decide a single phase advance for the turn player.
#[must_use]
pub fn decide_advance_phase(state: &GameState, seat: Seat) -> Vec<Event> {
    match state.phase {
        Phase::Draw => draw_crossing(state, seat),
        Phase::End => turn_roll_events(state),
        phase => {
            let next = phase.next().expect("non-end phase always has a successor");
            vec![Event::PhaseChanged { phase: next }]
        }
    }
}

/// Decide advancing phases until the turn rolls over.
#[must_use]
pub fn decide_end_turn(state: &GameState, seat: Seat) -> Vec<Event> {
    let mut events = Vec::new();
    let mut phase = state.phase;

    loop {
        match phase {
            Phase::Draw => {
                let crossing = draw_crossing(state, seat);
                let deck_out = crossing.iter().any(|e| matches!(e, Event::DeckOut { .. }));
                events.extend(crossing);
                if deck_out {
                    return events;
                }
                phase = Phase::Standby;
            }
            Phase::End => {
                events.extend(turn_roll_events(state));
                return events;
            }
            _ => {
                let next = phase.next().expect("non-end phase always has a successor");
                events.push(Event::PhaseChanged { phase: next });
                phase = next;
            }
        }
    }
}

/// Events for the draw→standby crossing: the mandatory draw, or the
/// deck-out loss if the deck is empty.
fn draw_crossing(state: &GameState, seat: Seat) -> Vec<Event> {
    match state.seats[seat].deck.front() {
        Some(&card) => vec![
            Event::CardDrawn { seat, card },
            Event::PhaseChanged {
                phase: Phase::Standby,
            },
        ],
        None => vec![Event::DeckOut { seat }],
    }
}

/// Events rolling the turn over: `TurnStarted` for the opposing seat
/// plus one `ModifierExpired` per temporary modifier that is due.
#[must_use]
pub fn turn_roll_events(state: &GameState) -> Vec<Event> {
    let next_turn = state.turn_number + 1;
    let next_seat = state.turn_player.opponent();

    let mut events = vec![Event::TurnStarted {
        turn: next_turn,
        seat: next_seat,
    }];

    for modifier in &state.modifiers {
        if modifier.expires_turn.is_some_and(|t| t <= next_turn) {
            events.push(Event::ModifierExpired { id: modifier.id });
        }
    }

    events
}

/// Fold a `PhaseChanged` event.
pub fn evolve_phase_changed(state: &mut GameState, phase: Phase) {
    state.phase = phase;
}

/// Fold a `TurnStarted` event: advance the turn, flip the turn player,
/// reset per-turn flags, prune lapsed restrictions.
pub fn evolve_turn_started(state: &mut GameState, turn: u32, seat: Seat) {
    state.turn_number = turn;
    state.turn_player = seat;
    state.phase = Phase::Draw;
    state.opt_used.clear();

    for s in Seat::ALL {
        state.seats[s].tribute_discount = 0;
    }

    let side = &mut state.seats[seat];
    side.normal_summon_used = false;
    for board_card in side.board.iter_mut() {
        board_card.can_attack = true;
        board_card.has_attacked_this_turn = false;
        board_card.changed_position_this_turn = false;
    }

    state
        .restrictions
        .retain(|r| !r.expires_turn.is_some_and(|t| t <= turn));
}

/// Fold a `CardDrawn` event: deck head to hand.
pub fn evolve_card_drawn(state: &mut GameState, seat: Seat, card: CardId) {
    let head = state.seats[seat]
        .deck
        .pop_front()
        .unwrap_or_else(|| panic!("CardDrawn folded against an empty deck for {}", seat));
    assert_eq!(head, card, "CardDrawn does not match the deck head");
    state.seats[seat].hand.push_back(head);
}

/// Fold a `DeckOut` event: the drawing seat loses.
pub fn evolve_deck_out(state: &mut GameState, seat: Seat) {
    state.game_over = true;
    state.winner = Some(seat.opponent());
    state.win_reason = Some(WinReason::DeckOut);
}
