//! Core types: seats, state, commands, events, configuration, RNG.

pub mod command;
pub mod config;
pub mod event;
pub mod rng;
pub mod seat;
pub mod state;

pub use command::{CardList, Command};
pub use config::EngineConfig;
pub use event::Event;
pub use rng::GameRng;
pub use seat::{Seat, SeatMap};
pub use state::{
    BoardCard, CardId, CardMeta, ChainLink, EffectKey, GameState, Phase, Position, Restriction,
    SeatState, SpellTrapCard, TemporaryModifier, WinReason,
};
