//! # duelcore
//!
//! A deterministic, turn-based dueling-card-game rules engine built
//! around two pure functions:
//!
//! - **decide**: `(state, seat, command) → events` — legality checking
//!   and rule application. Illegal commands produce an empty batch,
//!   never an error.
//! - **evolve**: `(state, events) → state` — folds the batch into a
//!   fresh snapshot, fires on-summon triggers, and sweeps state-based
//!   loss conditions.
//!
//! The same state, command, and seed always produce the same events
//! and the same next state, so matches are replayable from their event
//! log. Randomness is confined to the initial shuffle.
//!
//! ## Layout
//!
//! - [`core`] — seats, state, commands, events, config, RNG
//! - [`cards`] — definitions and the card registry
//! - [`effects`] — structured effects, targeting, resolution, triggers
//! - [`zones`] — zone membership and the generic zone transfer
//! - [`rules`] — phase, summoning, spells/traps, combat, chain, and
//!   state-based-action rule domains
//! - [`engine`] — the orchestrator: match creation, decide/evolve,
//!   legal moves, masking
//!
//! ## Example
//!
//! ```
//! use duelcore::cards::{CardDefinition, CardRegistry, DefId};
//! use duelcore::core::{Command, EngineConfig, Seat, SeatMap};
//! use duelcore::engine::Engine;
//!
//! let registry = CardRegistry::from_definitions(vec![
//!     CardDefinition::creature("c1", "Gravel Golem", 4, 1500, 1200),
//! ]);
//! let engine = Engine::new(registry, EngineConfig::default().with_starting_hand_size(1));
//!
//! let decks = SeatMap::with_value(vec![DefId::new("c1"); 3]);
//! let state = engine.create_initial_state(decks, None, Some(42));
//!
//! // The turn player advances out of the draw phase, drawing a card.
//! let (state, events) = engine.apply(&state, Seat::Host, &Command::AdvancePhase);
//! assert_eq!(events.len(), 2);
//! assert_eq!(state.seats[Seat::Host].hand.len(), 2);
//! ```

pub mod cards;
pub mod core;
pub mod effects;
pub mod engine;
pub mod rules;
pub mod zones;

pub use cards::{CardDefinition, CardRegistry, DefId};
pub use crate::core::{Command, EngineConfig, Event, GameState, Seat, SeatMap};
pub use engine::{Engine, PlayerView};
