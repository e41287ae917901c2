//! Zones and the generic zone-transfer operation.
//!
//! Every card instance lives in exactly one zone of one seat. All
//! movement between the id-list zones (hand, deck, graveyard,
//! banished) and removal from the structured zones (board, spell/trap,
//! field) funnels through this module, so the "one zone owns a card"
//! invariant is enforced in one place instead of six.

use serde::{Deserialize, Serialize};

use crate::core::state::{CardId, GameState};
use crate::core::Seat;

/// The zones a card can occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Hand,
    Deck,
    Board,
    SpellTrap,
    Field,
    Graveyard,
    Banished,
}

/// Locate the zone holding `card` under `seat`, if any.
#[must_use]
pub fn zone_of(state: &GameState, seat: Seat, card: CardId) -> Option<Zone> {
    let side = &state.seats[seat];

    if side.hand.contains(&card) {
        Some(Zone::Hand)
    } else if side.deck.contains(&card) {
        Some(Zone::Deck)
    } else if side.board.iter().any(|b| b.card == card) {
        Some(Zone::Board)
    } else if side.spell_traps.iter().any(|st| st.card == card) {
        Some(Zone::SpellTrap)
    } else if side.field_spell.as_ref().is_some_and(|st| st.card == card) {
        Some(Zone::Field)
    } else if side.graveyard.contains(&card) {
        Some(Zone::Graveyard)
    } else if side.banished.contains(&card) {
        Some(Zone::Banished)
    } else {
        None
    }
}

/// Remove `card` from whichever of `seat`'s zones holds it.
///
/// Returns the zone it was removed from. Removing a board card also
/// drops its live modifiers and restrictions — they track the board
/// presence, not the card identity.
pub fn remove_card(state: &mut GameState, seat: Seat, card: CardId) -> Option<Zone> {
    let zone = zone_of(state, seat, card)?;
    let side = &mut state.seats[seat];

    match zone {
        Zone::Hand => retain_id(&mut side.hand, card),
        Zone::Deck => retain_id(&mut side.deck, card),
        Zone::Graveyard => retain_id(&mut side.graveyard, card),
        Zone::Banished => retain_id(&mut side.banished, card),
        Zone::Board => {
            side.board.retain(|b| b.card != card);
            state.modifiers.retain(|m| m.card != card);
            state.restrictions.retain(|r| r.card != card);
        }
        Zone::SpellTrap => side.spell_traps.retain(|st| st.card != card),
        Zone::Field => side.field_spell = None,
    }

    Some(zone)
}

/// Insert `card` into one of `seat`'s id-list zones.
///
/// Board, spell/trap, and field placements carry extra per-card state
/// and go through their dedicated evolvers; routing them here is an
/// engine bug.
pub fn place_card(state: &mut GameState, seat: Seat, card: CardId, zone: Zone) {
    let side = &mut state.seats[seat];
    match zone {
        Zone::Hand => side.hand.push_back(card),
        Zone::Deck => side.deck.push_back(card),
        Zone::Graveyard => side.graveyard.push_back(card),
        Zone::Banished => side.banished.push_back(card),
        Zone::Board | Zone::SpellTrap | Zone::Field => {
            panic!("Cannot place {} into {:?} via generic transfer", card, zone)
        }
    }
}

/// Apply a `CardMoved` delta: remove from `from`, insert into `to`.
///
/// Panics if the card is not where the event says it is — the event
/// stream is produced against the same state it folds into, so a
/// mismatch is an engine bug.
pub fn transfer(state: &mut GameState, seat: Seat, card: CardId, from: Zone, to: Zone) {
    let actual = remove_card(state, seat, card)
        .unwrap_or_else(|| panic!("{} not in any zone of {}", card, seat));
    assert_eq!(
        actual, from,
        "{} moved from {:?} but event says {:?}",
        card, actual, from
    );

    place_card(state, seat, card, to);
}

fn retain_id(list: &mut im::Vector<CardId>, card: CardId) {
    list.retain(|&c| c != card);
}
