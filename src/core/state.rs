//! Game state: the single source of truth for a match.
//!
//! ## GameState
//!
//! An immutable snapshot threaded through `decide`/`evolve`. Zones use
//! `im` persistent collections so cloning a snapshot is cheap and the
//! evolved state never aliases its input.
//!
//! Per seat: hand, deck (draw from head), board, spell/trap zone, one
//! field-spell slot, graveyard, banished pile, life points, vice tally.
//! Global: turn/phase/priority, the active chain, temporary modifiers,
//! effect-usage sets, and terminal fields.

use im::{HashMap as ImHashMap, HashSet as ImHashSet, Vector};
use serde::{Deserialize, Serialize};

use super::seat::{Seat, SeatMap};
use crate::cards::DefId;
use crate::effects::{RestrictionKind, StatField};

/// Per-match card instance identifier.
///
/// Allocated sequentially at match creation; every instance resolves to
/// a definition through [`GameState::cards`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card instance ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Battle position of a board creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Attack,
    Defense,
}

impl Position {
    /// The other position.
    #[must_use]
    pub const fn flipped(self) -> Position {
        match self {
            Position::Attack => Position::Defense,
            Position::Defense => Position::Attack,
        }
    }
}

/// Turn phases, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Draw,
    Standby,
    Main,
    Combat,
    Main2,
    End,
}

impl Phase {
    /// The next phase in sequence, or `None` when the turn rolls over.
    #[must_use]
    pub const fn next(self) -> Option<Phase> {
        match self {
            Phase::Draw => Some(Phase::Standby),
            Phase::Standby => Some(Phase::Main),
            Phase::Main => Some(Phase::Combat),
            Phase::Combat => Some(Phase::Main2),
            Phase::Main2 => Some(Phase::End),
            Phase::End => None,
        }
    }

    /// Is this one of the two main phases?
    #[must_use]
    pub const fn is_main(self) -> bool {
        matches!(self, Phase::Main | Phase::Main2)
    }
}

/// Why a finished match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    LifeDepleted,
    DeckOut,
    ViceThreshold,
    Surrender,
}

/// A creature on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCard {
    /// Card instance id.
    pub card: CardId,

    /// Definition id (concealed by masking while face-down).
    pub definition: DefId,

    /// Battle position.
    pub position: Position,

    /// Face-up or face-down.
    pub face_up: bool,

    /// May still declare an attack (per-turn flag).
    pub can_attack: bool,

    /// Already attacked this turn.
    pub has_attacked_this_turn: bool,

    /// Already changed position this turn.
    pub changed_position_this_turn: bool,

    /// Accumulated vice counters.
    pub vice_counters: u32,

    /// Net temporary attack boost.
    pub attack_boost: i32,

    /// Net temporary defense boost.
    pub defense_boost: i32,

    /// Turn this card arrived on the board. Forbids same-turn flip
    /// summon and position change.
    pub turn_summoned: u32,
}

impl BoardCard {
    /// Create a board card with fresh per-turn flags.
    #[must_use]
    pub fn new(
        card: CardId,
        definition: DefId,
        position: Position,
        face_up: bool,
        turn_summoned: u32,
    ) -> Self {
        Self {
            card,
            definition,
            position,
            face_up,
            can_attack: true,
            has_attacked_this_turn: false,
            changed_position_this_turn: false,
            vice_counters: 0,
            attack_boost: 0,
            defense_boost: 0,
            turn_summoned,
        }
    }

    /// Effective attack given the definition's base attack.
    #[must_use]
    pub fn effective_attack(&self, base: i32) -> i32 {
        base + self.attack_boost
    }

    /// Effective defense given the definition's base defense.
    #[must_use]
    pub fn effective_defense(&self, base: i32) -> i32 {
        base + self.defense_boost
    }
}

/// A spell or trap card in the spell/trap zone or field slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellTrapCard {
    /// Card instance id.
    pub card: CardId,

    /// Definition id (concealed by masking while face-down).
    pub definition: DefId,

    /// Face-up (activated) or face-down (set).
    pub face_up: bool,

    /// Turn this card was set. Traps and quick-plays set this turn
    /// cannot be activated yet.
    pub set_turn: u32,
}

/// A link on the active chain.
///
/// The chain is a stack: the most recently added link hands priority to
/// the *opponent* of its activator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    /// Activating card.
    pub card: CardId,

    /// Activating seat.
    pub seat: Seat,

    /// Effect index on the activating card.
    pub effect_index: usize,

    /// Targets resolved at activation time.
    pub targets: Vec<CardId>,

    /// Negated links are skipped at resolution.
    pub negated: bool,
}

/// A live temporary stat modifier.
///
/// The duration class is resolved into an absolute expiry turn at
/// creation; expiry removes the modifier from the live list, so each
/// modifier reverts exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryModifier {
    /// Monotonic id, unique within a match.
    pub id: u32,

    /// Target board card.
    pub card: CardId,

    /// Which stat is boosted.
    pub stat: StatField,

    /// Signed delta applied to the boost field.
    pub delta: i32,

    /// Card whose effect created this modifier.
    pub source: CardId,

    /// Absolute turn at whose start this expires. `None` = permanent.
    pub expires_turn: Option<u32>,
}

/// A timed restriction placed on a board card by an effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    pub card: CardId,
    pub kind: RestrictionKind,
    /// Absolute turn at whose start this lapses. `None` = permanent.
    pub expires_turn: Option<u32>,
}

/// Key into the OPT/HOPT effect-usage sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectKey {
    pub card: CardId,
    pub effect_index: usize,
}

/// Everything a single seat owns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatState {
    /// Hand, in draw order.
    pub hand: Vector<CardId>,

    /// Deck; the head is the next card drawn.
    pub deck: Vector<CardId>,

    /// Board creatures.
    pub board: Vector<BoardCard>,

    /// Spell/trap zone.
    pub spell_traps: Vector<SpellTrapCard>,

    /// At most one field spell.
    pub field_spell: Option<SpellTrapCard>,

    /// Graveyard, oldest first.
    pub graveyard: Vector<CardId>,

    /// Banished pile.
    pub banished: Vector<CardId>,

    /// Life points.
    pub life: i32,

    /// Breakdown/vice counter tally for the whole seat.
    pub vice_total: u32,

    /// Normal summon or set already used this turn.
    pub normal_summon_used: bool,

    /// Per-turn tribute requirement reduction.
    pub tribute_discount: u8,
}

impl SeatState {
    /// Create a seat with the given starting life points.
    #[must_use]
    pub fn new(life: i32) -> Self {
        Self {
            hand: Vector::new(),
            deck: Vector::new(),
            board: Vector::new(),
            spell_traps: Vector::new(),
            field_spell: None,
            graveyard: Vector::new(),
            banished: Vector::new(),
            life,
            vice_total: 0,
            normal_summon_used: false,
            tribute_discount: 0,
        }
    }

    /// Does this seat control any face-up creature?
    #[must_use]
    pub fn has_face_up_creature(&self) -> bool {
        self.board.iter().any(|b| b.face_up)
    }
}

/// Per-instance metadata: definition and original owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMeta {
    pub definition: DefId,
    pub owner: Seat,
}

/// Full game state.
///
/// Created once via `Engine::create_initial_state`, then threaded as a
/// pure value through `decide` → `evolve`. Never mutated in place by
/// callers; `evolve` returns a fresh snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Per-seat zones and counters.
    pub seats: SeatMap<SeatState>,

    /// Instance id → definition/owner. Every id in any zone resolves here.
    pub cards: ImHashMap<CardId, CardMeta>,

    /// Whose turn it is.
    pub turn_player: Seat,

    /// Turn number (starts at 1).
    pub turn_number: u32,

    /// Current phase.
    pub phase: Phase,

    /// The active chain (index 0 = first link, last = most recent).
    pub chain: Vector<ChainLink>,

    /// Seat holding priority. `Some` iff the chain is non-empty.
    pub priority: Option<Seat>,

    /// Consecutive passes since the last link was added.
    pub chain_passes: u8,

    /// Live temporary stat modifiers.
    pub modifiers: Vector<TemporaryModifier>,

    /// Live effect restrictions.
    pub restrictions: Vector<Restriction>,

    /// Effects used this turn (cleared on turn start).
    pub opt_used: ImHashSet<EffectKey>,

    /// Effects used this match (never cleared).
    pub hopt_used: ImHashSet<EffectKey>,

    /// Next temporary-modifier id.
    pub next_modifier_id: u32,

    /// Terminal fields.
    pub game_over: bool,
    pub winner: Option<Seat>,
    pub win_reason: Option<WinReason>,
}

impl GameState {
    /// Create an empty state (no cards dealt).
    #[must_use]
    pub fn new(first_player: Seat, starting_lp: i32) -> Self {
        Self {
            seats: SeatMap::new(|_| SeatState::new(starting_lp)),
            cards: ImHashMap::new(),
            turn_player: first_player,
            turn_number: 1,
            phase: Phase::Draw,
            chain: Vector::new(),
            priority: None,
            chain_passes: 0,
            modifiers: Vector::new(),
            restrictions: Vector::new(),
            opt_used: ImHashSet::new(),
            hopt_used: ImHashSet::new(),
            next_modifier_id: 0,
            game_over: false,
            winner: None,
            win_reason: None,
        }
    }

    // === Instance lookup ===

    /// Definition id of a card instance.
    ///
    /// Panics if the instance is unknown — an engine bug, since every
    /// id reachable from a valid state resolves.
    #[must_use]
    pub fn definition_id(&self, card: CardId) -> &DefId {
        &self
            .cards
            .get(&card)
            .unwrap_or_else(|| panic!("Unknown card instance {}", card))
            .definition
    }

    /// Original owner of a card instance.
    #[must_use]
    pub fn owner_of(&self, card: CardId) -> Seat {
        self.cards
            .get(&card)
            .unwrap_or_else(|| panic!("Unknown card instance {}", card))
            .owner
    }

    // === Board lookup ===

    /// Find a board card and its controller.
    #[must_use]
    pub fn find_board(&self, card: CardId) -> Option<(Seat, &BoardCard)> {
        for seat in Seat::ALL {
            if let Some(b) = self.seats[seat].board.iter().find(|b| b.card == card) {
                return Some((seat, b));
            }
        }
        None
    }

    /// Find a spell/trap card (zone or field slot) and its controller.
    #[must_use]
    pub fn find_spell_trap(&self, card: CardId) -> Option<(Seat, &SpellTrapCard)> {
        for seat in Seat::ALL {
            let side = &self.seats[seat];
            if let Some(st) = side.spell_traps.iter().find(|st| st.card == card) {
                return Some((seat, st));
            }
            if let Some(st) = side.field_spell.as_ref().filter(|st| st.card == card) {
                return Some((seat, st));
            }
        }
        None
    }

    // === Chain ===

    /// Is a chain currently open?
    #[must_use]
    pub fn chain_open(&self) -> bool {
        !self.chain.is_empty()
    }

    /// Is a live restriction of this kind on the card?
    #[must_use]
    pub fn restricted(&self, card: CardId, kind: RestrictionKind) -> bool {
        self.restrictions
            .iter()
            .any(|r| r.card == card && r.kind == kind)
    }

    // === Usage sets ===

    /// Has an effect been consumed this turn (OPT) or ever (HOPT)?
    #[must_use]
    pub fn effect_used(&self, key: EffectKey) -> bool {
        self.opt_used.contains(&key) || self.hopt_used.contains(&key)
    }

    // === Snapshot boundary ===

    /// Serialize to opaque snapshot bytes for the persistence layer.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("GameState serialization cannot fail")
    }

    /// Deserialize a snapshot. A decode failure is a boundary error the
    /// caller treats as a retryable conflict.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}
