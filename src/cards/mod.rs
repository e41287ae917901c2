//! Static card data: definitions and the per-match registry.

pub mod definition;
pub mod registry;

pub use definition::{CardDefinition, CardKind, CreatureStats, DefId, SpellKind, TrapKind};
pub use registry::CardRegistry;
