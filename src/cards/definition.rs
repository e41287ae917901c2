//! Card definitions — static card data.
//!
//! `CardDefinition` holds the immutable properties of a card type:
//! its kind (creature/spell/trap), creature stats, and its structured
//! effects. Instance-specific data (position, face, counters) lives in
//! the game state's `BoardCard`/`SpellTrapCard` records.

use serde::{Deserialize, Serialize};

use crate::effects::EffectDefinition;

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card (e.g., `"c1"`), not a specific
/// instance in a match. The masking layer replaces the definition id
/// of hidden cards with [`DefId::HIDDEN`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefId(pub String);

impl DefId {
    /// Sentinel shown in place of a concealed card's definition.
    pub const HIDDEN: &'static str = "hidden";

    /// Create a new definition ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The sentinel definition id used by masked views.
    #[must_use]
    pub fn hidden() -> Self {
        Self(Self::HIDDEN.to_string())
    }

    /// Get the raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DefId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DefId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Spell card subtypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellKind {
    /// One-shot; goes to the graveyard after its chain link resolves.
    Normal,
    /// Stays face-up in the spell/trap zone.
    Continuous,
    /// May be chained from a set position like a trap.
    QuickPlay,
    /// Occupies the field-spell slot.
    Field,
}

/// Trap card subtypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrapKind {
    Normal,
    Continuous,
}

/// Combat stats of a creature card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureStats {
    pub level: u8,
    pub attack: i32,
    pub defense: i32,
}

/// What kind of card a definition describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Creature(CreatureStats),
    Spell(SpellKind),
    Trap(TrapKind),
}

impl CardKind {
    /// Creature stats, if this is a creature.
    #[must_use]
    pub fn stats(&self) -> Option<&CreatureStats> {
        match self {
            CardKind::Creature(stats) => Some(stats),
            _ => None,
        }
    }

    /// Is this a creature card?
    #[must_use]
    pub fn is_creature(&self) -> bool {
        matches!(self, CardKind::Creature(_))
    }

    /// Is this a spell card?
    #[must_use]
    pub fn is_spell(&self) -> bool {
        matches!(self, CardKind::Spell(_))
    }

    /// Is this a trap card?
    #[must_use]
    pub fn is_trap(&self) -> bool {
        matches!(self, CardKind::Trap(_))
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use duelcore::cards::{CardDefinition, DefId};
///
/// let card = CardDefinition::creature("c1", "Gravel Golem", 4, 1500, 1200);
///
/// assert_eq!(card.id, DefId::new("c1"));
/// assert!(card.kind.is_creature());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: DefId,

    /// Card name (for display/debugging).
    pub name: String,

    /// What kind of card this is.
    pub kind: CardKind,

    /// Structured effects, in activation-index order.
    pub effects: Vec<EffectDefinition>,
}

impl CardDefinition {
    /// Create a creature definition.
    #[must_use]
    pub fn creature(
        id: impl Into<DefId>,
        name: impl Into<String>,
        level: u8,
        attack: i32,
        defense: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: CardKind::Creature(CreatureStats {
                level,
                attack,
                defense,
            }),
            effects: Vec::new(),
        }
    }

    /// Create a spell definition.
    #[must_use]
    pub fn spell(id: impl Into<DefId>, name: impl Into<String>, kind: SpellKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: CardKind::Spell(kind),
            effects: Vec::new(),
        }
    }

    /// Create a trap definition.
    #[must_use]
    pub fn trap(id: impl Into<DefId>, name: impl Into<String>, kind: TrapKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: CardKind::Trap(kind),
            effects: Vec::new(),
        }
    }

    /// Add an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: EffectDefinition) -> Self {
        self.effects.push(effect);
        self
    }

    /// Get an effect by index.
    #[must_use]
    pub fn effect(&self, index: usize) -> Option<&EffectDefinition> {
        self.effects.get(index)
    }

    /// Creature level, or 0 for non-creatures.
    #[must_use]
    pub fn level(&self) -> u8 {
        self.kind.stats().map_or(0, |s| s.level)
    }
}

impl From<DefId> for String {
    fn from(id: DefId) -> String {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{EffectAction, EffectDefinition, EffectTrigger};

    #[test]
    fn test_def_id() {
        let id = DefId::new("c1");
        assert_eq!(id.as_str(), "c1");
        assert_eq!(format!("{}", id), "c1");
        assert_eq!(DefId::hidden().as_str(), "hidden");
    }

    #[test]
    fn test_creature_definition() {
        let card = CardDefinition::creature("c1", "Test", 7, 2500, 2100);

        assert!(card.kind.is_creature());
        assert_eq!(card.level(), 7);
        let stats = card.kind.stats().unwrap();
        assert_eq!(stats.attack, 2500);
        assert_eq!(stats.defense, 2100);
    }

    #[test]
    fn test_spell_and_trap_kinds() {
        let spell = CardDefinition::spell("s1", "Bolt", SpellKind::Normal);
        assert!(spell.kind.is_spell());
        assert!(!spell.kind.is_trap());
        assert_eq!(spell.level(), 0);

        let trap = CardDefinition::trap("t1", "Pit", TrapKind::Normal);
        assert!(trap.kind.is_trap());
        assert!(trap.kind.stats().is_none());
    }

    #[test]
    fn test_with_effect() {
        let card = CardDefinition::creature("c1", "Test", 4, 1000, 1000).with_effect(
            EffectDefinition::new(EffectTrigger::OnSummon, vec![EffectAction::Draw { count: 1 }]),
        );

        assert_eq!(card.effects.len(), 1);
        assert!(card.effect(0).is_some());
        assert!(card.effect(1).is_none());
    }

    #[test]
    fn test_definition_serialization() {
        let card = CardDefinition::creature("c1", "Test", 4, 1000, 1000);
        let json = serde_json::to_string(&card).unwrap();
        let back: CardDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(card, back);
    }
}
