//! Rule domains: each module pairs its `decide_*` legality checks with
//! the evolvers for the events it produces.

pub mod chain;
pub mod combat;
pub mod phase;
pub mod sba;
pub mod spells;
pub mod summon;
