//! Summoning: normal summon, set, flip summon, position change.
//!
//! One normal summon *or* set per turn. Creatures at or above the
//! tribute level threshold require a tribute: a face-up creature sent
//! from the board to the graveyard before the summon lands. Effects can
//! discount the requirement for a turn. Flip summons and position
//! changes are locked on the turn the creature arrived.

use crate::cards::CardRegistry;
use crate::core::{
    BoardCard, CardId, Command, EngineConfig, Event, GameState, Position, Seat,
};
use crate::effects::RestrictionKind;
use crate::zones::{self, Zone};

/// Tributes required to summon a creature of the given level.
#[must_use]
pub fn tributes_required(config: &EngineConfig, level: u8, discount: u8) -> usize {
    let base: usize = if level >= config.tribute_level_threshold {
        1
    } else {
        0
    };
    base.saturating_sub(discount as usize)
}

/// Decide a normal summon.
#[must_use]
pub fn decide_summon(
    state: &GameState,
    registry: &CardRegistry,
    config: &EngineConfig,
    seat: Seat,
    card: CardId,
    position: Position,
    tributes: &[CardId],
) -> Vec<Event> {
    let side = &state.seats[seat];
    if !state.phase.is_main() || side.normal_summon_used {
        return Vec::new();
    }
    if zones::zone_of(state, seat, card) != Some(Zone::Hand) {
        return Vec::new();
    }
    let definition = registry.get_unchecked(state.definition_id(card));
    if !definition.kind.is_creature() {
        return Vec::new();
    }

    let required = tributes_required(config, definition.level(), side.tribute_discount);
    if tributes.len() != required {
        return Vec::new();
    }

    if required == 0 {
        if side.board.len() >= config.max_board_slots {
            return Vec::new();
        }
        return vec![Event::NormalSummoned {
            seat,
            card,
            position,
        }];
    }

    // Tributes: distinct, face-up, on the summoner's board.
    for (i, &tribute) in tributes.iter().enumerate() {
        if tributes[..i].contains(&tribute) {
            return Vec::new();
        }
        let on_board = side
            .board
            .iter()
            .any(|b| b.card == tribute && b.face_up);
        if !on_board {
            return Vec::new();
        }
    }

    let mut events: Vec<Event> = tributes
        .iter()
        .map(|&tribute| Event::CardMoved {
            seat,
            card: tribute,
            from: Zone::Board,
            to: Zone::Graveyard,
        })
        .collect();
    events.push(Event::NormalSummoned {
        seat,
        card,
        position,
    });
    events
}

/// Decide setting a creature face-down in defense.
///
/// Consumes the normal summon for the turn but never costs tributes.
#[must_use]
pub fn decide_set_monster(
    state: &GameState,
    registry: &CardRegistry,
    config: &EngineConfig,
    seat: Seat,
    card: CardId,
) -> Vec<Event> {
    let side = &state.seats[seat];
    if !state.phase.is_main()
        || side.normal_summon_used
        || side.board.len() >= config.max_board_slots
    {
        return Vec::new();
    }
    if zones::zone_of(state, seat, card) != Some(Zone::Hand) {
        return Vec::new();
    }
    if !registry
        .get_unchecked(state.definition_id(card))
        .kind
        .is_creature()
    {
        return Vec::new();
    }

    vec![Event::MonsterSet { seat, card }]
}

/// Decide a flip summon of a face-down creature set on an earlier turn.
#[must_use]
pub fn decide_flip_summon(state: &GameState, seat: Seat, card: CardId) -> Vec<Event> {
    if !state.phase.is_main() {
        return Vec::new();
    }
    let Some(board_card) = state.seats[seat].board.iter().find(|b| b.card == card) else {
        return Vec::new();
    };
    if board_card.face_up || board_card.turn_summoned >= state.turn_number {
        return Vec::new();
    }

    vec![Event::FlipSummoned { seat, card }]
}

/// Decide a manual battle-position toggle.
#[must_use]
pub fn decide_change_position(state: &GameState, seat: Seat, card: CardId) -> Vec<Event> {
    if !state.phase.is_main() {
        return Vec::new();
    }
    let Some(board_card) = state.seats[seat].board.iter().find(|b| b.card == card) else {
        return Vec::new();
    };
    if !board_card.face_up
        || board_card.changed_position_this_turn
        || board_card.has_attacked_this_turn
        || board_card.turn_summoned >= state.turn_number
        || state.restricted(card, RestrictionKind::CannotChangePosition)
    {
        return Vec::new();
    }

    vec![Event::PositionChanged {
        seat,
        card,
        position: board_card.position.flipped(),
    }]
}

/// Enumerate legal `Summon` commands for a hand card, one per tribute
/// combination per position.
pub fn summon_commands(
    state: &GameState,
    registry: &CardRegistry,
    config: &EngineConfig,
    seat: Seat,
    card: CardId,
    out: &mut Vec<Command>,
) {
    let side = &state.seats[seat];
    let definition = registry.get_unchecked(state.definition_id(card));
    if !definition.kind.is_creature() {
        return;
    }
    let required = tributes_required(config, definition.level(), side.tribute_discount);

    let tribute_sets: Vec<Vec<CardId>> = if required == 0 {
        if side.board.len() >= config.max_board_slots {
            return;
        }
        vec![Vec::new()]
    } else {
        let pool: Vec<CardId> = side
            .board
            .iter()
            .filter(|b| b.face_up)
            .map(|b| b.card)
            .collect();
        if pool.len() < required {
            return;
        }
        choose(&pool, required)
    };

    for tributes in tribute_sets {
        for position in [Position::Attack, Position::Defense] {
            out.push(Command::Summon {
                card,
                position,
                tributes: tributes.iter().copied().collect(),
            });
        }
    }
}

fn choose(pool: &[CardId], count: usize) -> Vec<Vec<CardId>> {
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(count);
    choose_from(pool, count, 0, &mut current, &mut out);
    out
}

fn choose_from(
    pool: &[CardId],
    remaining: usize,
    start: usize,
    current: &mut Vec<CardId>,
    out: &mut Vec<Vec<CardId>>,
) {
    if remaining == 0 {
        out.push(current.clone());
        return;
    }
    for i in start..pool.len() {
        current.push(pool[i]);
        choose_from(pool, remaining - 1, i + 1, current, out);
        current.pop();
    }
}

// === Evolvers ===

/// Fold a `NormalSummoned` event.
pub fn evolve_normal_summoned(state: &mut GameState, seat: Seat, card: CardId, position: Position) {
    let from = zones::remove_card(state, seat, card);
    assert_eq!(from, Some(Zone::Hand), "{} summoned from outside hand", card);

    let definition = state.definition_id(card).clone();
    let turn = state.turn_number;
    state.seats[seat]
        .board
        .push_back(BoardCard::new(card, definition, position, true, turn));
    state.seats[seat].normal_summon_used = true;
}

/// Fold a `MonsterSet` event.
pub fn evolve_monster_set(state: &mut GameState, seat: Seat, card: CardId) {
    let from = zones::remove_card(state, seat, card);
    assert_eq!(from, Some(Zone::Hand), "{} set from outside hand", card);

    let definition = state.definition_id(card).clone();
    let turn = state.turn_number;
    state.seats[seat].board.push_back(BoardCard::new(
        card,
        definition,
        Position::Defense,
        false,
        turn,
    ));
    state.seats[seat].normal_summon_used = true;
}

/// Fold a `FlipSummoned` event: face-up attack, position locked.
pub fn evolve_flip_summoned(state: &mut GameState, seat: Seat, card: CardId) {
    let board_card = board_card_mut(state, seat, card);
    board_card.face_up = true;
    board_card.position = Position::Attack;
    board_card.changed_position_this_turn = true;
}

/// Fold a `MonsterFlipped` event (flipped by battle; position keeps).
pub fn evolve_monster_flipped(state: &mut GameState, seat: Seat, card: CardId) {
    board_card_mut(state, seat, card).face_up = true;
}

/// Fold a `PositionChanged` event.
pub fn evolve_position_changed(state: &mut GameState, seat: Seat, card: CardId, position: Position) {
    let board_card = board_card_mut(state, seat, card);
    board_card.position = position;
    board_card.changed_position_this_turn = true;
}

/// Fold a `SpecialSummoned` event: the card leaves whichever zone holds
/// it and arrives face-up on `seat`'s board.
pub fn evolve_special_summoned(state: &mut GameState, seat: Seat, card: CardId, position: Position) {
    let holder = Seat::ALL
        .into_iter()
        .find(|&s| zones::zone_of(state, s, card).is_some())
        .unwrap_or_else(|| panic!("{} special summoned from nowhere", card));
    zones::remove_card(state, holder, card);

    let definition = state.definition_id(card).clone();
    let turn = state.turn_number;
    state.seats[seat]
        .board
        .push_back(BoardCard::new(card, definition, position, true, turn));
}

fn board_card_mut(state: &mut GameState, seat: Seat, card: CardId) -> &mut BoardCard {
    state.seats[seat]
        .board
        .iter_mut()
        .find(|b| b.card == card)
        .unwrap_or_else(|| panic!("{} not on {}'s board", card, seat))
}
