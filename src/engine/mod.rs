//! The engine: match creation, `decide`, `evolve`, and legal-move
//! enumeration.
//!
//! ## Decide / evolve
//!
//! `decide` is a pure function from (state, seat, command) to an event
//! batch; an illegal command produces an empty batch and never an
//! error. `evolve` folds a batch into a fresh snapshot, then auto-fires
//! on-summon triggers and sweeps state-based loss conditions. Neither
//! touches the input state.
//!
//! ## Authority
//!
//! While a chain is open only the priority holder may act, and only
//! with a chain response. Otherwise only the turn player may act.

pub mod view;

use crate::cards::{CardKind, CardRegistry, DefId};
use crate::core::{
    CardId, CardMeta, Command, EffectKey, EngineConfig, Event, GameRng, GameState, Phase, Seat,
    SeatMap, WinReason,
};
use crate::effects::resolver::{resolve_actions, ResolutionContext};
use crate::effects::triggers::{auto_targets, pending_triggers};
use crate::effects::{combinations, EffectTrigger};
use crate::rules::{chain, combat, phase, sba, spells, summon};
use crate::zones;

pub use view::{MaskedSeat, OwnSeat, PlayerView};

/// The rules engine for a single card pool.
///
/// Stateless beyond its registry and configuration; one engine value
/// serves any number of concurrent matches.
///
/// ## Example
///
/// ```
/// use duelcore::cards::{CardDefinition, CardRegistry, DefId};
/// use duelcore::core::{EngineConfig, Seat, SeatMap};
/// use duelcore::engine::Engine;
///
/// let registry = CardRegistry::from_definitions(vec![
///     CardDefinition::creature("c1", "Gravel Golem", 4, 1500, 1200),
/// ]);
/// let engine = Engine::new(registry, EngineConfig::default().with_starting_hand_size(1));
///
/// let decks = SeatMap::with_value(vec![DefId::new("c1"); 3]);
/// let state = engine.create_initial_state(decks, None, Some(42));
///
/// assert_eq!(state.seats[Seat::Host].hand.len(), 1);
/// assert_eq!(state.seats[Seat::Host].deck.len(), 2);
/// ```
pub struct Engine {
    registry: CardRegistry,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine over a card pool.
    #[must_use]
    pub fn new(registry: CardRegistry, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    /// The card pool this engine plays with.
    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    /// The match configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // === Match creation ===

    /// Create the initial state for a match: allocate card instances,
    /// shuffle both decks with the seeded RNG, deal starting hands.
    ///
    /// The same decks, first player, and seed always produce the same
    /// state. Panics if a deck names a definition missing from the
    /// registry.
    #[must_use]
    pub fn create_initial_state(
        &self,
        decks: SeatMap<Vec<DefId>>,
        first_player: Option<Seat>,
        seed: Option<u64>,
    ) -> GameState {
        let first = first_player.unwrap_or(Seat::Host);
        let mut rng = GameRng::new(seed.unwrap_or(0));
        let mut state = GameState::new(first, self.config.starting_lp);

        let mut next_id = 0u32;
        for seat in Seat::ALL {
            let mut instances = Vec::with_capacity(decks[seat].len());
            for definition in &decks[seat] {
                assert!(
                    self.registry.contains(definition),
                    "Deck references unknown definition {}",
                    definition
                );
                let card = CardId::new(next_id);
                next_id += 1;
                state.cards.insert(
                    card,
                    CardMeta {
                        definition: definition.clone(),
                        owner: seat,
                    },
                );
                instances.push(card);
            }
            rng.shuffle(&mut instances);
            state.seats[seat].deck = instances.into_iter().collect();
        }

        for seat in Seat::ALL {
            for _ in 0..self.config.starting_hand_size {
                if let Some(card) = state.seats[seat].deck.pop_front() {
                    state.seats[seat].hand.push_back(card);
                }
            }
        }

        state
    }

    // === Decide ===

    /// Translate a command into the events it causes.
    ///
    /// Returns an empty batch when the command is illegal for `seat`
    /// in this state. Never mutates `state`.
    #[must_use]
    pub fn decide(&self, state: &GameState, seat: Seat, command: &Command) -> Vec<Event> {
        if state.game_over {
            return Vec::new();
        }

        // An open chain locks out everyone but the priority holder,
        // and the priority holder to chain responses.
        if state.chain_open() {
            if state.priority != Some(seat) {
                return Vec::new();
            }
            return match command {
                Command::ChainResponse { card, targets } => chain::decide_chain_response(
                    state,
                    &self.registry,
                    &self.config,
                    seat,
                    *card,
                    targets,
                ),
                _ => Vec::new(),
            };
        }

        if seat != state.turn_player {
            return Vec::new();
        }

        match command {
            Command::AdvancePhase => phase::decide_advance_phase(state, seat),
            Command::EndTurn => phase::decide_end_turn(state, seat),
            Command::Surrender => vec![Event::GameEnded {
                winner: Some(seat.opponent()),
                reason: WinReason::Surrender,
            }],
            Command::Summon {
                card,
                position,
                tributes,
            } => summon::decide_summon(
                state,
                &self.registry,
                &self.config,
                seat,
                *card,
                *position,
                tributes,
            ),
            Command::SetMonster { card } => {
                summon::decide_set_monster(state, &self.registry, &self.config, seat, *card)
            }
            Command::FlipSummon { card } => summon::decide_flip_summon(state, seat, *card),
            Command::ChangePosition { card } => summon::decide_change_position(state, seat, *card),
            Command::SetSpellTrap { card } => {
                spells::decide_set_spell_trap(state, &self.registry, &self.config, seat, *card)
            }
            Command::ActivateSpell { card, targets } => spells::decide_activate_spell(
                state,
                &self.registry,
                &self.config,
                seat,
                *card,
                targets,
            ),
            Command::ActivateTrap { card, targets } => {
                spells::decide_activate_trap(state, &self.registry, seat, *card, targets)
            }
            Command::DeclareAttack { attacker, target } => {
                combat::decide_attack(state, &self.registry, seat, *attacker, *target)
            }
            Command::ActivateEffect {
                card,
                effect_index,
                targets,
            } => self.decide_ignition(state, seat, *card, *effect_index, targets),
            // No chain to respond to.
            Command::ChainResponse { .. } => Vec::new(),
        }
    }

    /// Ignition effects resolve immediately; they never open a chain.
    fn decide_ignition(
        &self,
        state: &GameState,
        seat: Seat,
        card: CardId,
        effect_index: usize,
        targets: &[CardId],
    ) -> Vec<Event> {
        if !state.phase.is_main() {
            return Vec::new();
        }
        let on_board = state.seats[seat]
            .board
            .iter()
            .any(|b| b.card == card && b.face_up);
        if !on_board {
            return Vec::new();
        }
        let definition = self.registry.get_unchecked(state.definition_id(card));
        let Some(effect) = definition.effect(effect_index) else {
            return Vec::new();
        };
        if effect.trigger != EffectTrigger::Ignition {
            return Vec::new();
        }
        if state.effect_used(EffectKey { card, effect_index }) {
            return Vec::new();
        }
        if !crate::effects::validate_declared(state, seat, effect, targets) {
            return Vec::new();
        }

        let activated = Event::EffectActivated {
            seat,
            card,
            effect_index,
        };
        let mut scratch = state.clone();
        apply_event(&mut scratch, &self.registry, &activated);

        let ctx = ResolutionContext {
            registry: &self.registry,
            config: &self.config,
            activator: seat,
            source: card,
            chain_index: None,
        };
        let mut events = vec![activated];
        events.extend(resolve_actions(&mut scratch, &ctx, effect, targets));
        events
    }

    // === Evolve ===

    /// Fold an event batch into a new snapshot, then auto-fire
    /// on-summon triggers and sweep state-based loss conditions.
    #[must_use]
    pub fn evolve(&self, state: &GameState, events: &[Event]) -> GameState {
        let mut next = state.clone();
        for event in events {
            apply_event(&mut next, &self.registry, event);
        }

        // Summons in this batch fire triggers; their resolutions may
        // summon again, so re-detect until quiescent.
        let mut batch = events.to_vec();
        while !next.game_over {
            let pending = pending_triggers(&next, &self.registry, &batch);
            if pending.is_empty() {
                break;
            }

            let mut emitted = Vec::new();
            for trigger in pending {
                if next.game_over {
                    break;
                }
                let key = EffectKey {
                    card: trigger.card,
                    effect_index: trigger.effect_index,
                };
                // An earlier trigger this round may have consumed the
                // effect or removed the creature.
                if next.effect_used(key) || next.find_board(trigger.card).is_none() {
                    continue;
                }
                let definition = self.registry.get_unchecked(next.definition_id(trigger.card));
                let Some(effect) = definition.effect(trigger.effect_index) else {
                    continue;
                };
                let Some(targets) = auto_targets(&next, trigger.seat, effect) else {
                    continue;
                };

                let activated = Event::EffectActivated {
                    seat: trigger.seat,
                    card: trigger.card,
                    effect_index: trigger.effect_index,
                };
                apply_event(&mut next, &self.registry, &activated);
                emitted.push(activated);

                let ctx = ResolutionContext {
                    registry: &self.registry,
                    config: &self.config,
                    activator: trigger.seat,
                    source: trigger.card,
                    chain_index: None,
                };
                emitted.extend(resolve_actions(&mut next, &ctx, effect, &targets));
            }
            batch = emitted;
        }

        for event in sba::check_state_based_actions(&next, &self.config) {
            apply_event(&mut next, &self.registry, &event);
        }

        next
    }

    /// Decide and evolve in one step.
    #[must_use]
    pub fn apply(&self, state: &GameState, seat: Seat, command: &Command) -> (GameState, Vec<Event>) {
        let events = self.decide(state, seat, command);
        let next = self.evolve(state, &events);
        (next, events)
    }

    // === Legal moves ===

    /// Enumerate every command `decide` would accept from `seat`.
    ///
    /// Candidates are generated structurally and then checked through
    /// `decide` itself, so an advertised move is accepted by
    /// construction. Seats without authority get an empty list.
    #[must_use]
    pub fn legal_moves(&self, state: &GameState, seat: Seat) -> Vec<Command> {
        if state.game_over {
            return Vec::new();
        }

        let mut candidates = Vec::new();
        if state.chain_open() {
            if state.priority != Some(seat) {
                return Vec::new();
            }
            candidates.push(Command::pass());
            self.chain_response_candidates(state, seat, &mut candidates);
        } else {
            if seat != state.turn_player {
                return Vec::new();
            }
            candidates.push(Command::AdvancePhase);
            candidates.push(Command::EndTurn);
            candidates.push(Command::Surrender);
            if state.phase.is_main() {
                self.main_phase_candidates(state, seat, &mut candidates);
            }
            if state.phase == Phase::Combat {
                self.combat_candidates(state, seat, &mut candidates);
            }
        }

        candidates.retain(|command| !self.decide(state, seat, command).is_empty());
        candidates
    }

    fn chain_response_candidates(&self, state: &GameState, seat: Seat, out: &mut Vec<Command>) {
        let set_cards: Vec<CardId> = state.seats[seat]
            .spell_traps
            .iter()
            .filter(|st| !st.face_up)
            .map(|st| st.card)
            .collect();

        for card in set_cards {
            if !chain::can_respond(state, &self.registry, seat, card) {
                continue;
            }
            let definition = self.registry.get_unchecked(state.definition_id(card));
            let Some(effect) = definition.effect(0) else {
                continue;
            };
            self.targeted_candidates(state, seat, effect, out, |targets| {
                Command::ChainResponse {
                    card: Some(card),
                    targets,
                }
            });
        }
    }

    fn main_phase_candidates(&self, state: &GameState, seat: Seat, out: &mut Vec<Command>) {
        let side = &state.seats[seat];

        for &card in side.hand.iter() {
            match self.registry.get_unchecked(state.definition_id(card)).kind {
                CardKind::Creature(_) => {
                    summon::summon_commands(state, &self.registry, &self.config, seat, card, out);
                    out.push(Command::SetMonster { card });
                }
                CardKind::Spell(_) => {
                    out.push(Command::SetSpellTrap { card });
                    self.spell_activation_candidates(state, seat, card, out);
                }
                CardKind::Trap(_) => {
                    out.push(Command::SetSpellTrap { card });
                }
            }
        }

        let mut set_cards: Vec<CardId> = side
            .spell_traps
            .iter()
            .filter(|st| !st.face_up)
            .map(|st| st.card)
            .collect();
        if let Some(field) = side.field_spell.as_ref().filter(|st| !st.face_up) {
            set_cards.push(field.card);
        }
        for card in set_cards {
            match self.registry.get_unchecked(state.definition_id(card)).kind {
                CardKind::Spell(_) => self.spell_activation_candidates(state, seat, card, out),
                CardKind::Trap(_) => {
                    let definition = self.registry.get_unchecked(state.definition_id(card));
                    if let Some(effect) = definition.effect(0) {
                        self.targeted_candidates(state, seat, effect, out, |targets| {
                            Command::ActivateTrap { card, targets }
                        });
                    }
                }
                CardKind::Creature(_) => {}
            }
        }

        for board_card in side.board.iter() {
            let card = board_card.card;
            if !board_card.face_up {
                out.push(Command::FlipSummon { card });
                continue;
            }
            out.push(Command::ChangePosition { card });

            let definition = self.registry.get_unchecked(state.definition_id(card));
            for (effect_index, effect) in definition.effects.iter().enumerate() {
                if effect.trigger != EffectTrigger::Ignition {
                    continue;
                }
                self.targeted_candidates(state, seat, effect, out, |targets| {
                    Command::ActivateEffect {
                        card,
                        effect_index,
                        targets,
                    }
                });
            }
        }
    }

    fn spell_activation_candidates(
        &self,
        state: &GameState,
        seat: Seat,
        card: CardId,
        out: &mut Vec<Command>,
    ) {
        let definition = self.registry.get_unchecked(state.definition_id(card));
        if let Some(effect) = definition.effect(0) {
            self.targeted_candidates(state, seat, effect, out, |targets| Command::ActivateSpell {
                card,
                targets,
            });
        }
    }

    fn combat_candidates(&self, state: &GameState, seat: Seat, out: &mut Vec<Command>) {
        let opponent_board: Vec<CardId> = state.seats[seat.opponent()]
            .board
            .iter()
            .map(|b| b.card)
            .collect();

        for board_card in state.seats[seat].board.iter() {
            if !combat::can_declare_attack(state, board_card) {
                continue;
            }
            for &target in &opponent_board {
                out.push(Command::DeclareAttack {
                    attacker: board_card.card,
                    target: Some(target),
                });
            }
            out.push(Command::DeclareAttack {
                attacker: board_card.card,
                target: None,
            });
        }
    }

    fn targeted_candidates(
        &self,
        state: &GameState,
        seat: Seat,
        effect: &crate::effects::EffectDefinition,
        out: &mut Vec<Command>,
        mut make: impl FnMut(crate::core::CardList) -> Command,
    ) {
        match &effect.target {
            None => out.push(make(crate::core::CardList::new())),
            Some(filter) => {
                for combo in combinations(state, seat, filter) {
                    out.push(make(combo.into_iter().collect()));
                }
            }
        }
    }

    // === Masking ===

    /// Project the state onto what `seat` is allowed to see.
    #[must_use]
    pub fn mask(&self, state: &GameState, seat: Seat) -> PlayerView {
        view::mask(state, seat)
    }
}

/// Fold a single event into the state.
///
/// The dispatch is exhaustive: adding an `Event` variant without an
/// evolver is a compile error.
pub(crate) fn apply_event(state: &mut GameState, registry: &CardRegistry, event: &Event) {
    match event {
        Event::PhaseChanged { phase } => phase::evolve_phase_changed(state, *phase),
        Event::TurnStarted { turn, seat } => phase::evolve_turn_started(state, *turn, *seat),
        Event::CardDrawn { seat, card } => phase::evolve_card_drawn(state, *seat, *card),
        Event::DeckOut { seat } => phase::evolve_deck_out(state, *seat),
        Event::NormalSummoned {
            seat,
            card,
            position,
        } => summon::evolve_normal_summoned(state, *seat, *card, *position),
        Event::MonsterSet { seat, card } => summon::evolve_monster_set(state, *seat, *card),
        Event::FlipSummoned { seat, card } => summon::evolve_flip_summoned(state, *seat, *card),
        Event::MonsterFlipped { seat, card } => summon::evolve_monster_flipped(state, *seat, *card),
        Event::PositionChanged {
            seat,
            card,
            position,
        } => summon::evolve_position_changed(state, *seat, *card, *position),
        Event::SpecialSummoned {
            seat,
            card,
            position,
        } => summon::evolve_special_summoned(state, *seat, *card, *position),
        Event::SpellTrapSet { seat, card } => {
            spells::evolve_spell_trap_set(state, registry, *seat, *card);
        }
        Event::SpellActivated {
            seat,
            card,
            from_hand,
        } => spells::evolve_spell_activated(state, registry, *seat, *card, *from_hand),
        Event::TrapActivated { seat, card } => spells::evolve_trap_activated(state, *seat, *card),
        Event::CardMoved {
            seat,
            card,
            from,
            to,
        } => zones::transfer(state, *seat, *card, *from, *to),
        Event::AttackDeclared { seat, attacker, .. } => {
            combat::evolve_attack_declared(state, *seat, *attacker);
        }
        Event::BattleDamage { seat, amount } => combat::evolve_battle_damage(state, *seat, *amount),
        Event::DestroyedByBattle { seat, card } => {
            combat::evolve_destroyed_by_battle(state, *seat, *card);
        }
        Event::EffectActivated {
            card, effect_index, ..
        } => sba::evolve_effect_activated(state, registry, *card, *effect_index),
        Event::LifeChanged { seat, delta } => sba::evolve_life_changed(state, *seat, *delta),
        Event::ViceChanged { seat, card, delta } => {
            sba::evolve_vice_changed(state, *seat, *card, *delta);
        }
        Event::ModifierApplied { modifier } => {
            sba::evolve_modifier_applied(state, modifier.clone());
        }
        Event::ModifierExpired { id } => sba::evolve_modifier_expired(state, *id),
        Event::RestrictionApplied {
            card,
            kind,
            expires_turn,
        } => sba::evolve_restriction_applied(state, *card, *kind, *expires_turn),
        // Informational only.
        Event::DeckViewed { .. } => {}
        Event::TributeCostModified { seat, delta } => {
            sba::evolve_tribute_cost_modified(state, *seat, *delta);
        }
        Event::ChainLinkAdded { link } => chain::evolve_chain_link_added(state, link.clone()),
        Event::ChainPassed { seat } => chain::evolve_chain_passed(state, *seat),
        Event::ChainLinkNegated { index } => chain::evolve_chain_link_negated(state, *index),
        Event::ChainResolved => chain::evolve_chain_resolved(state),
        Event::GameEnded { winner, reason } => sba::evolve_game_ended(state, *winner, *reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;
    use crate::core::Position;

    fn simple_engine() -> Engine {
        let registry = CardRegistry::from_definitions(vec![CardDefinition::creature(
            "c1", "Golem", 4, 1500, 1200,
        )]);
        Engine::new(
            registry,
            EngineConfig::default().with_starting_hand_size(1),
        )
    }

    fn decks(count: usize) -> SeatMap<Vec<DefId>> {
        SeatMap::with_value(vec![DefId::new("c1"); count])
    }

    #[test]
    fn test_create_initial_state_deals_hands() {
        let engine = simple_engine();
        let state = engine.create_initial_state(decks(3), None, Some(42));

        for seat in Seat::ALL {
            assert_eq!(state.seats[seat].hand.len(), 1);
            assert_eq!(state.seats[seat].deck.len(), 2);
        }
        assert_eq!(state.cards.len(), 6);
        assert_eq!(state.turn_player, Seat::Host);
    }

    #[test]
    fn test_same_seed_same_state() {
        let engine = simple_engine();
        let a = engine.create_initial_state(decks(3), None, Some(42));
        let b = engine.create_initial_state(decks(3), None, Some(42));
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "unknown definition")]
    fn test_unknown_definition_panics() {
        let engine = simple_engine();
        engine.create_initial_state(SeatMap::with_value(vec![DefId::new("nope")]), None, None);
    }

    #[test]
    fn test_off_turn_commands_rejected() {
        let engine = simple_engine();
        let state = engine.create_initial_state(decks(3), None, Some(1));

        assert!(engine
            .decide(&state, Seat::Away, &Command::AdvancePhase)
            .is_empty());
        assert!(engine.legal_moves(&state, Seat::Away).is_empty());
    }

    #[test]
    fn test_decide_never_mutates() {
        let engine = simple_engine();
        let state = engine.create_initial_state(decks(3), None, Some(1));
        let snapshot = state.clone();

        let _ = engine.decide(&state, Seat::Host, &Command::EndTurn);

        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_surrender_ends_game() {
        let engine = simple_engine();
        let state = engine.create_initial_state(decks(3), None, Some(1));

        let (next, events) = engine.apply(&state, Seat::Host, &Command::Surrender);

        assert_eq!(
            events,
            vec![Event::GameEnded {
                winner: Some(Seat::Away),
                reason: WinReason::Surrender,
            }]
        );
        assert!(next.game_over);
        assert!(engine.legal_moves(&next, Seat::Host).is_empty());
    }

    #[test]
    fn test_summon_appears_in_legal_moves() {
        let engine = simple_engine();
        let state = engine.create_initial_state(decks(3), None, Some(1));

        // Walk to the main phase.
        let (state, _) = engine.apply(&state, Seat::Host, &Command::AdvancePhase);
        let (state, _) = engine.apply(&state, Seat::Host, &Command::AdvancePhase);
        assert_eq!(state.phase, Phase::Main);

        let card = state.seats[Seat::Host].hand[0];
        let moves = engine.legal_moves(&state, Seat::Host);
        assert!(moves.contains(&Command::Summon {
            card,
            position: Position::Attack,
            tributes: crate::core::CardList::new(),
        }));
        assert!(moves.contains(&Command::SetMonster { card }));
    }
}
