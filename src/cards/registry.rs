//! Card registry for definition lookup.
//!
//! The `CardRegistry` is the card-definition lookup table the game
//! state references: every card instance id in any zone must resolve
//! through it.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, DefId};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use duelcore::cards::{CardRegistry, CardDefinition};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDefinition::creature("c1", "Gravel Golem", 4, 1500, 1200));
///
/// let found = registry.get(&"c1".into()).unwrap();
/// assert_eq!(found.name, "Gravel Golem");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<DefId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from an iterator of definitions.
    #[must_use]
    pub fn from_definitions(defs: impl IntoIterator<Item = CardDefinition>) -> Self {
        let mut registry = Self::new();
        for def in defs {
            registry.register(def);
        }
        registry
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        self.cards.insert(card.id.clone(), card);
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: &DefId) -> Option<&CardDefinition> {
        self.cards.get(id)
    }

    /// Get a card definition by ID, panicking if not found.
    ///
    /// Every id reachable from a valid `GameState` resolves, so a miss
    /// here is an engine bug, not a bad player action.
    #[must_use]
    pub fn get_unchecked(&self, id: &DefId) -> &CardDefinition {
        self.cards
            .get(id)
            .unwrap_or_else(|| panic!("Definition {:?} not found in registry", id))
    }

    /// Check if a definition ID is registered.
    #[must_use]
    pub fn contains(&self, id: &DefId) -> bool {
        self.cards.contains_key(id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::SpellKind;

    #[test]
    fn test_register_and_get() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::creature("c1", "Test", 4, 1000, 1000));

        assert!(registry.get(&"c1".into()).is_some());
        assert!(registry.get(&"c9".into()).is_none());
        assert!(registry.contains(&"c1".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_from_definitions() {
        let registry = CardRegistry::from_definitions([
            CardDefinition::creature("c1", "A", 4, 1000, 1000),
            CardDefinition::spell("s1", "B", SpellKind::Normal),
        ]);

        assert_eq!(registry.len(), 2);
        assert!(registry.get(&"s1".into()).unwrap().kind.is_spell());
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_id_panics() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::creature("c1", "A", 4, 1000, 1000));
        registry.register(CardDefinition::creature("c1", "B", 4, 1000, 1000));
    }

    #[test]
    #[should_panic(expected = "not found")]
    fn test_get_unchecked_panics() {
        let registry = CardRegistry::new();
        registry.get_unchecked(&"missing".into());
    }
}
