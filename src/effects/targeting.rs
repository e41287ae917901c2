//! Target filters and target enumeration.
//!
//! A `TargetFilter` declares which cards an effect may target: a side
//! relative to the activator, a zone, and an exact count. Candidate
//! enumeration is deterministic (own side before opponent, zone order
//! as stored) so auto-fired triggers select stable targets.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, GameState, Seat};

/// Which side's cards an effect may target, relative to the activator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSide {
    Own,
    Opponent,
    Any,
}

/// Which zone an effect targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetZone {
    Board,
    Graveyard,
    Hand,
}

/// Declares what an effect targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFilter {
    pub side: TargetSide,
    pub zone: TargetZone,
    /// Exact number of targets required.
    pub count: usize,
}

impl TargetFilter {
    /// Create a new target filter.
    #[must_use]
    pub const fn new(side: TargetSide, zone: TargetZone, count: usize) -> Self {
        Self { side, zone, count }
    }

    /// Seats this filter may draw targets from, activator's side first.
    fn seats(&self, activator: Seat) -> Vec<Seat> {
        match self.side {
            TargetSide::Own => vec![activator],
            TargetSide::Opponent => vec![activator.opponent()],
            TargetSide::Any => vec![activator, activator.opponent()],
        }
    }
}

/// Enumerate all legal targets for a filter, in stable order.
#[must_use]
pub fn candidates(state: &GameState, activator: Seat, filter: &TargetFilter) -> Vec<CardId> {
    let mut out = Vec::new();

    for seat in filter.seats(activator) {
        let side = &state.seats[seat];
        match filter.zone {
            TargetZone::Board => out.extend(side.board.iter().map(|b| b.card)),
            TargetZone::Graveyard => out.extend(side.graveyard.iter().copied()),
            TargetZone::Hand => out.extend(side.hand.iter().copied()),
        }
    }

    out
}

/// Check a declared target list against a filter.
///
/// Targets must be distinct, each a legal candidate, and exactly
/// `filter.count` of them.
#[must_use]
pub fn validate(
    state: &GameState,
    activator: Seat,
    filter: &TargetFilter,
    targets: &[CardId],
) -> bool {
    if targets.len() != filter.count {
        return false;
    }

    let legal = candidates(state, activator, filter);

    for (i, target) in targets.iter().enumerate() {
        if !legal.contains(target) {
            return false;
        }
        if targets[..i].contains(target) {
            return false;
        }
    }

    true
}

/// Check a declared target list against an effect's filter.
///
/// Untargeted effects require an empty list.
#[must_use]
pub fn validate_declared(
    state: &GameState,
    activator: Seat,
    effect: &crate::effects::EffectDefinition,
    targets: &[CardId],
) -> bool {
    match &effect.target {
        None => targets.is_empty(),
        Some(filter) => validate(state, activator, filter, targets),
    }
}

/// Enumerate every distinct target combination for a filter.
///
/// Used by `legal_moves` to advertise complete commands. Order within
/// a combination is not significant, so only ascending candidate-order
/// combinations are produced.
#[must_use]
pub fn combinations(state: &GameState, activator: Seat, filter: &TargetFilter) -> Vec<Vec<CardId>> {
    let pool = candidates(state, activator, filter);
    if pool.len() < filter.count || filter.count == 0 {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut current = Vec::with_capacity(filter.count);
    pick(&pool, filter.count, 0, &mut current, &mut out);
    out
}

fn pick(
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
        pick(pool, remaining - 1, i + 1, current, out);
        current.pop();
    }
}
