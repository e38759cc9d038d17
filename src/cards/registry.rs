//! Card catalog for definition lookup.
//!
//! The `CardCatalog` stores every card definition a match may reference.
//! It provides fast lookup by `CardId` and never fails a lookup at runtime:
//! [`CardCatalog::get_or_unknown`] substitutes the placeholder card.

use rustc_hash::FxHashMap;
use tracing::warn;

use super::definition::{CardDefinition, CardId, CardKind};
use crate::error::DataError;

/// Catalog of card definitions.
///
/// ## Example
///
/// ```
/// use duel_ccg::cards::{CardCatalog, CardDefinition, CardId};
///
/// let mut catalog = CardCatalog::new();
/// catalog.register(CardDefinition::unit(CardId::new(1), "Recruit", 1, 1, 1)).unwrap();
///
/// assert_eq!(catalog.get(CardId::new(1)).unwrap().name, "Recruit");
/// assert_eq!(catalog.get_or_unknown(CardId::new(99)).name, "Unknown");
/// ```
#[derive(Clone, Debug)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, CardDefinition>,
    placeholder: CardDefinition,
}

impl Default for CardCatalog {
    fn default() -> Self {
        Self {
            cards: FxHashMap::default(),
            placeholder: CardDefinition::placeholder(),
        }
    }
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in card pool.
    #[must_use]
    pub fn standard() -> Self {
        super::standard::catalog()
    }

    /// Parse a catalog from a JSON array of definitions.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let cards: Vec<CardDefinition> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for card in cards {
            catalog.register(card)?;
        }
        Ok(catalog)
    }

    /// Register a card definition.
    ///
    /// Rejects duplicate ids, the reserved placeholder id, and buildings
    /// without durability.
    pub fn register(&mut self, card: CardDefinition) -> Result<(), DataError> {
        if card.id == CardId::UNKNOWN {
            return Err(DataError::InvalidCard {
                id: card.id,
                reason: "id 0 is reserved for the placeholder".into(),
            });
        }
        if self.cards.contains_key(&card.id) {
            return Err(DataError::DuplicateCard(card.id));
        }
        if card.kind == CardKind::Building && card.durability.unwrap_or(0) == 0 {
            return Err(DataError::InvalidCard {
                id: card.id,
                reason: "building needs a positive durability".into(),
            });
        }
        if card.kind != CardKind::Spell && card.health <= 0 {
            return Err(DataError::InvalidCard {
                id: card.id,
                reason: "board cards need positive health".into(),
            });
        }
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Get a card definition, falling back to the placeholder.
    pub fn get_or_unknown(&self, id: CardId) -> &CardDefinition {
        match self.cards.get(&id) {
            Some(card) => card,
            None => {
                warn!(card = %id, "card not in catalog, using placeholder");
                &self.placeholder
            }
        }
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Collectible ids in ascending order.
    #[must_use]
    pub fn collectible_ids(&self) -> Vec<CardId> {
        let mut ids: Vec<_> = self.cards.values().filter(|c| c.collectible).map(|c| c.id).collect();
        ids.sort();
        ids
    }
}
