//! Card effects: structured definitions, targeting, resolution, triggers.

pub mod definition;
pub mod resolver;
pub mod targeting;
pub mod triggers;

pub use definition::{
    EffectAction, EffectDefinition, EffectTrigger, ModifierDuration, RestrictionKind, StatField,
};
pub use targeting::{
    candidates, combinations, validate, validate_declared, TargetFilter, TargetSide, TargetZone,
};
