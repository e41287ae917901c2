//! Combat: attack declaration and battle resolution.
//!
//! Battles resolve deterministically from effective stats (base plus
//! live boosts). Attacking an attack-position creature destroys the
//! weaker side and deals the difference to its controller; attacking a
//! defense-position creature never damages the defender's controller. A
//! face-down defender flips face-up before comparison. Direct attacks
//! are legal only while the opponent controls no face-up creature, and
//! never on the first turn of the match.

use crate::cards::CardRegistry;
use crate::core::{BoardCard, CardId, Event, GameState, Phase, Position, Seat};
use crate::effects::RestrictionKind;

/// Can this board card declare an attack right now?
#[must_use]
pub fn can_declare_attack(state: &GameState, board_card: &BoardCard) -> bool {
    board_card.face_up
        && board_card.position == Position::Attack
        && board_card.can_attack
        && !board_card.has_attacked_this_turn
        && !state.restricted(board_card.card, RestrictionKind::CannotAttack)
}

/// Decide an attack declaration and the battle it resolves into.
#[must_use]
pub fn decide_attack(
    state: &GameState,
    registry: &CardRegistry,
    seat: Seat,
    attacker: CardId,
    target: Option<CardId>,
) -> Vec<Event> {
    if state.phase != Phase::Combat || state.turn_number < 2 {
        return Vec::new();
    }
    let Some(attacker_card) = state.seats[seat].board.iter().find(|b| b.card == attacker) else {
        return Vec::new();
    };
    if !can_declare_attack(state, attacker_card) {
        return Vec::new();
    }

    let opponent = seat.opponent();
    let attack = effective_attack(state, registry, attacker_card);

    let mut events = vec![Event::AttackDeclared {
        seat,
        attacker,
        target,
    }];

    match target {
        None => {
            if state.seats[opponent].has_face_up_creature() {
                return Vec::new();
            }
            events.push(Event::BattleDamage {
                seat: opponent,
                amount: attack,
            });
        }
        Some(target_id) => {
            let Some(defender) = state.seats[opponent]
                .board
                .iter()
                .find(|b| b.card == target_id)
            else {
                return Vec::new();
            };
            if !defender.face_up {
                events.push(Event::MonsterFlipped {
                    seat: opponent,
                    card: target_id,
                });
            }
            events.extend(battle_events(
                state, registry, seat, attacker, attack, defender,
            ));
        }
    }

    events
}

/// Resolve the stat comparison against a (possibly just-flipped)
/// defender into destruction and damage events.
fn battle_events(
    state: &GameState,
    registry: &CardRegistry,
    seat: Seat,
    attacker: CardId,
    attack: i32,
    defender: &BoardCard,
) -> Vec<Event> {
    let opponent = seat.opponent();
    let mut events = Vec::new();

    match defender.position {
        Position::Attack => {
            let defender_attack = effective_attack(state, registry, defender);
            match attack.cmp(&defender_attack) {
                std::cmp::Ordering::Greater => {
                    events.push(Event::DestroyedByBattle {
                        seat: opponent,
                        card: defender.card,
                    });
                    events.push(Event::BattleDamage {
                        seat: opponent,
                        amount: attack - defender_attack,
                    });
                }
                std::cmp::Ordering::Equal => {
                    events.push(Event::DestroyedByBattle {
                        seat: opponent,
                        card: defender.card,
                    });
                    events.push(Event::DestroyedByBattle {
                        seat,
                        card: attacker,
                    });
                }
                std::cmp::Ordering::Less => {
                    events.push(Event::DestroyedByBattle {
                        seat,
                        card: attacker,
                    });
                    events.push(Event::BattleDamage {
                        seat,
                        amount: defender_attack - attack,
                    });
                }
            }
        }
        Position::Defense => {
            let defense = effective_defense(state, registry, defender);
            match attack.cmp(&defense) {
                std::cmp::Ordering::Greater => {
                    events.push(Event::DestroyedByBattle {
                        seat: opponent,
                        card: defender.card,
                    });
                }
                std::cmp::Ordering::Equal => {}
                std::cmp::Ordering::Less => {
                    events.push(Event::BattleDamage {
                        seat,
                        amount: defense - attack,
                    });
                }
            }
        }
    }

    events
}

fn effective_attack(state: &GameState, registry: &CardRegistry, board_card: &BoardCard) -> i32 {
    let definition = registry.get_unchecked(state.definition_id(board_card.card));
    let stats = definition
        .kind
        .stats()
        .unwrap_or_else(|| panic!("{} on board is not a creature", board_card.card));
    board_card.effective_attack(stats.attack)
}

fn effective_defense(state: &GameState, registry: &CardRegistry, board_card: &BoardCard) -> i32 {
    let definition = registry.get_unchecked(state.definition_id(board_card.card));
    let stats = definition
        .kind
        .stats()
        .unwrap_or_else(|| panic!("{} on board is not a creature", board_card.card));
    board_card.effective_defense(stats.defense)
}

// === Evolvers ===

/// Fold an `AttackDeclared` event: mark the attacker spent.
pub fn evolve_attack_declared(state: &mut GameState, seat: Seat, attacker: CardId) {
    let board_card = state.seats[seat]
        .board
        .iter_mut()
        .find(|b| b.card == attacker)
        .unwrap_or_else(|| panic!("{} declared an attack off-board", attacker));
    board_card.has_attacked_this_turn = true;
}

/// Fold a `BattleDamage` event.
pub fn evolve_battle_damage(state: &mut GameState, seat: Seat, amount: i32) {
    state.seats[seat].life -= amount;
}

/// Fold a `DestroyedByBattle` event: board to graveyard.
pub fn evolve_destroyed_by_battle(state: &mut GameState, seat: Seat, card: CardId) {
    crate::zones::transfer(
        state,
        seat,
        card,
        crate::zones::Zone::Board,
        crate::zones::Zone::Graveyard,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, DefId};
    use crate::core::CardMeta;

    fn registry() -> CardRegistry {
        CardRegistry::from_definitions(vec![
            CardDefinition::creature("strong", "Ogre", 4, 1800, 1500),
            CardDefinition::creature("weak", "Imp", 2, 800, 1000),
        ])
    }

    fn combat_state() -> GameState {
        let mut state = GameState::new(Seat::Host, 8000);
        state.phase = Phase::Combat;
        state.turn_number = 2;
        state
    }

    fn put(state: &mut GameState, seat: Seat, id: u32, def: &str, position: Position, face_up: bool) {
        let card = CardId::new(id);
        state.cards.insert(
            card,
            CardMeta {
                definition: DefId::new(def),
                owner: seat,
            },
        );
        state
            .seats[seat]
            .board
            .push_back(BoardCard::new(card, DefId::new(def), position, face_up, 1));
    }

    #[test]
    fn test_attack_vs_weaker_attacker_wins() {
        let mut state = combat_state();
        put(&mut state, Seat::Host, 0, "strong", Position::Attack, true);
        put(&mut state, Seat::Away, 1, "weak", Position::Attack, true);

        let events = decide_attack(
            &state,
            &registry(),
            Seat::Host,
            CardId::new(0),
            Some(CardId::new(1)),
        );

        assert_eq!(
            events,
            vec![
                Event::AttackDeclared {
                    seat: Seat::Host,
                    attacker: CardId::new(0),
                    target: Some(CardId::new(1)),
                },
                Event::DestroyedByBattle {
                    seat: Seat::Away,
                    card: CardId::new(1),
                },
                Event::BattleDamage {
                    seat: Seat::Away,
                    amount: 1000,
                },
            ]
        );
    }

    #[test]
    fn test_mutual_destruction_on_tie() {
        let mut state = combat_state();
        put(&mut state, Seat::Host, 0, "strong", Position::Attack, true);
        put(&mut state, Seat::Away, 1, "strong", Position::Attack, true);

        let events = decide_attack(
            &state,
            &registry(),
            Seat::Host,
            CardId::new(0),
            Some(CardId::new(1)),
        );

        assert_eq!(events.len(), 3);
        assert!(!events
            .iter()
            .any(|e| matches!(e, Event::BattleDamage { .. })));
    }

    #[test]
    fn test_attack_into_higher_defense_bounces() {
        let mut state = combat_state();
        put(&mut state, Seat::Host, 0, "weak", Position::Attack, true);
        put(&mut state, Seat::Away, 1, "strong", Position::Defense, true);

        let events = decide_attack(
            &state,
            &registry(),
            Seat::Host,
            CardId::new(0),
            Some(CardId::new(1)),
        );

        // 800 attack into 1500 defense: attacker's controller takes 700.
        assert_eq!(
            events[1..],
            [Event::BattleDamage {
                seat: Seat::Host,
                amount: 700,
            }]
        );
    }

    #[test]
    fn test_face_down_defender_flips_first() {
        let mut state = combat_state();
        put(&mut state, Seat::Host, 0, "strong", Position::Attack, true);
        put(&mut state, Seat::Away, 1, "weak", Position::Defense, false);

        let events = decide_attack(
            &state,
            &registry(),
            Seat::Host,
            CardId::new(0),
            Some(CardId::new(1)),
        );

        // 1800 attack over 1000 defense: flip, destroy, no damage.
        assert_eq!(
            events,
            vec![
                Event::AttackDeclared {
                    seat: Seat::Host,
                    attacker: CardId::new(0),
                    target: Some(CardId::new(1)),
                },
                Event::MonsterFlipped {
                    seat: Seat::Away,
                    card: CardId::new(1),
                },
                Event::DestroyedByBattle {
                    seat: Seat::Away,
                    card: CardId::new(1),
                },
            ]
        );
    }

    #[test]
    fn test_direct_attack_blocked_by_face_up_creature() {
        let mut state = combat_state();
        put(&mut state, Seat::Host, 0, "strong", Position::Attack, true);
        put(&mut state, Seat::Away, 1, "weak", Position::Attack, true);

        assert!(decide_attack(&state, &registry(), Seat::Host, CardId::new(0), None).is_empty());
    }

    #[test]
    fn test_direct_attack_full_damage() {
        let mut state = combat_state();
        put(&mut state, Seat::Host, 0, "strong", Position::Attack, true);

        let events = decide_attack(&state, &registry(), Seat::Host, CardId::new(0), None);

        assert_eq!(
            events[1],
            Event::BattleDamage {
                seat: Seat::Away,
                amount: 1800,
            }
        );
    }

    #[test]
    fn test_no_attacks_on_first_turn() {
        let mut state = combat_state();
        state.turn_number = 1;
        put(&mut state, Seat::Host, 0, "strong", Position::Attack, true);

        assert!(decide_attack(&state, &registry(), Seat::Host, CardId::new(0), None).is_empty());
    }

    #[test]
    fn test_one_attack_per_creature_per_turn() {
        let mut state = combat_state();
        put(&mut state, Seat::Host, 0, "strong", Position::Attack, true);
        evolve_attack_declared(&mut state, Seat::Host, CardId::new(0));

        assert!(decide_attack(&state, &registry(), Seat::Host, CardId::new(0), None).is_empty());
    }

    #[test]
    fn test_boost_changes_battle_outcome() {
        let mut state = combat_state();
        put(&mut state, Seat::Host, 0, "weak", Position::Attack, true);
        put(&mut state, Seat::Away, 1, "strong", Position::Attack, true);
        state.seats[Seat::Host].board[0].attack_boost = 1200;

        let events = decide_attack(
            &state,
            &registry(),
            Seat::Host,
            CardId::new(0),
            Some(CardId::new(1)),
        );

        // 800 + 1200 = 2000 over 1800: defender destroyed, 200 damage.
        assert_eq!(
            events[1..],
            [
                Event::DestroyedByBattle {
                    seat: Seat::Away,
                    card: CardId::new(1),
                },
                Event::BattleDamage {
                    seat: Seat::Away,
                    amount: 200,
                },
            ]
        );
    }
}
