//! Masking: the state projected onto what one seat may see.
//!
//! Hidden information per the table-top rules: either deck's order and
//! contents (counts only, including the viewer's own), the opponent's
//! hand (count only), and the definition of any face-down card, which
//! is replaced by the [`DefId::hidden`] sentinel. Everything else is
//! public.

use serde::{Deserialize, Serialize};

use crate::cards::DefId;
use crate::core::{
    BoardCard, CardId, ChainLink, GameState, Phase, Seat, SpellTrapCard, WinReason,
};

/// The viewer's own side: full knowledge except deck contents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OwnSeat {
    pub hand: Vec<CardId>,
    pub deck_count: usize,
    pub board: Vec<BoardCard>,
    pub spell_traps: Vec<SpellTrapCard>,
    pub field_spell: Option<SpellTrapCard>,
    pub graveyard: Vec<CardId>,
    pub banished: Vec<CardId>,
    pub life: i32,
    pub vice_total: u32,
    pub normal_summon_used: bool,
    pub tribute_discount: u8,
}

/// The opponent's side with hidden information concealed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaskedSeat {
    pub hand_count: usize,
    pub deck_count: usize,

    /// Board cards; face-down definitions replaced by the sentinel.
    pub board: Vec<BoardCard>,

    /// Spell/trap zone; face-down definitions replaced by the sentinel.
    pub spell_traps: Vec<SpellTrapCard>,
    pub field_spell: Option<SpellTrapCard>,

    pub graveyard: Vec<CardId>,
    pub banished: Vec<CardId>,
    pub life: i32,
    pub vice_total: u32,
}

/// Everything one seat may know about the match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub seat: Seat,
    pub turn_player: Seat,
    pub turn_number: u32,
    pub phase: Phase,
    pub priority: Option<Seat>,

    /// Chain links are public once activated.
    pub chain: Vec<ChainLink>,

    pub you: OwnSeat,
    pub opponent: MaskedSeat,

    pub game_over: bool,
    pub winner: Option<Seat>,
    pub win_reason: Option<WinReason>,
}

/// Project the state onto `seat`'s view.
#[must_use]
pub fn mask(state: &GameState, seat: Seat) -> PlayerView {
    let own = &state.seats[seat];
    let other = &state.seats[seat.opponent()];

    PlayerView {
        seat,
        turn_player: state.turn_player,
        turn_number: state.turn_number,
        phase: state.phase,
        priority: state.priority,
        chain: state.chain.iter().cloned().collect(),
        you: OwnSeat {
            hand: own.hand.iter().copied().collect(),
            deck_count: own.deck.len(),
            board: own.board.iter().cloned().collect(),
            spell_traps: own.spell_traps.iter().cloned().collect(),
            field_spell: own.field_spell.clone(),
            graveyard: own.graveyard.iter().copied().collect(),
            banished: own.banished.iter().copied().collect(),
            life: own.life,
            vice_total: own.vice_total,
            normal_summon_used: own.normal_summon_used,
            tribute_discount: own.tribute_discount,
        },
        opponent: MaskedSeat {
            hand_count: other.hand.len(),
            deck_count: other.deck.len(),
            board: other.board.iter().map(conceal_board).collect(),
            spell_traps: other.spell_traps.iter().map(conceal_spell_trap).collect(),
            field_spell: other.field_spell.as_ref().map(|st| conceal_spell_trap(st)),
            graveyard: other.graveyard.iter().copied().collect(),
            banished: other.banished.iter().copied().collect(),
            life: other.life,
            vice_total: other.vice_total,
        },
        game_over: state.game_over,
        winner: state.winner,
        win_reason: state.win_reason,
    }
}

fn conceal_board(card: &BoardCard) -> BoardCard {
    let mut masked = card.clone();
    if !masked.face_up {
        masked.definition = DefId::hidden();
    }
    masked
}

fn conceal_spell_trap(card: &SpellTrapCard) -> SpellTrapCard {
    let mut masked = card.clone();
    if !masked.face_up {
        masked.definition = DefId::hidden();
    }
    masked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardMeta, Position};

    fn sample_state() -> GameState {
        let mut state = GameState::new(Seat::Host, 8000);
        for id in 0..4u32 {
            state.cards.insert(
                CardId::new(id),
                CardMeta {
                    definition: DefId::new("c1"),
                    owner: Seat::Away,
                },
            );
        }
        state.seats[Seat::Away].hand.push_back(CardId::new(0));
        state.seats[Seat::Away].deck.push_back(CardId::new(1));
        state.seats[Seat::Away].board.push_back(BoardCard::new(
            CardId::new(2),
            DefId::new("c1"),
            Position::Defense,
            false,
            1,
        ));
        state.seats[Seat::Away].spell_traps.push_back(SpellTrapCard {
            card: CardId::new(3),
            definition: DefId::new("c1"),
            face_up: true,
            set_turn: 1,
        });
        state
    }

    #[test]
    fn test_opponent_hand_becomes_count() {
        let view = mask(&sample_state(), Seat::Host);

        assert_eq!(view.opponent.hand_count, 1);
        assert_eq!(view.opponent.deck_count, 1);
    }

    #[test]
    fn test_face_down_definition_concealed() {
        let view = mask(&sample_state(), Seat::Host);

        assert_eq!(view.opponent.board[0].definition, DefId::hidden());
        // Face-up cards stay visible.
        assert_eq!(view.opponent.spell_traps[0].definition, DefId::new("c1"));
    }

    #[test]
    fn test_own_face_down_cards_stay_visible() {
        let mut state = sample_state();
        state.cards.insert(
            CardId::new(10),
            CardMeta {
                definition: DefId::new("c1"),
                owner: Seat::Host,
            },
        );
        state.seats[Seat::Host].board.push_back(BoardCard::new(
            CardId::new(10),
            DefId::new("c1"),
            Position::Defense,
            false,
            1,
        ));

        let view = mask(&state, Seat::Host);

        assert_eq!(view.you.board[0].definition, DefId::new("c1"));
    }

    #[test]
    fn test_own_deck_order_hidden() {
        let view = mask(&sample_state(), Seat::Away);

        assert_eq!(view.you.deck_count, 1);
        assert_eq!(view.you.hand, vec![CardId::new(0)]);
    }
}
