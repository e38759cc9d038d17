//! Deck construction and match setup.
//!
//! A deck list is validated against the configured size and per-card copy
//! limit, converted to hand/deck card instances through the catalog and
//! shuffled with the match RNG.
//!
//! Ids missing from the catalog are not rejected: they become the
//! `Unknown` placeholder, with a warning, so a stale deck list never blocks
//! a match from starting.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::cards::{CardCatalog, CardId, CardInstance};
use crate::core::{Match, MatchId, RulesConfig, Side, SideMap};
use crate::error::DeckError;

/// Check a deck list against construction rules.
pub fn validate_deck(catalog: &CardCatalog, config: &RulesConfig, cards: &[CardId]) -> Result<(), DeckError> {
    if cards.len() != config.deck_size {
        return Err(DeckError::WrongSize {
            expected: config.deck_size,
            actual: cards.len(),
        });
    }

    let mut counts: FxHashMap<CardId, usize> = FxHashMap::default();
    for &card in cards {
        if catalog.get(card).is_some_and(|def| !def.collectible) {
            return Err(DeckError::NotCollectible(card));
        }
        let count = counts.entry(card).or_insert(0);
        *count += 1;
        if *count > config.copy_limit {
            return Err(DeckError::TooManyCopies {
                card,
                count: *count,
                limit: config.copy_limit,
            });
        }
    }
    Ok(())
}

/// Builds a match in the `Waiting` state with both decks shuffled.
///
/// ```
/// use duel_ccg::cards::{CardCatalog, CardId};
/// use duel_ccg::core::{RulesConfig, Side};
/// use duel_ccg::lifecycle::MatchBuilder;
///
/// let catalog = CardCatalog::standard();
/// let config = RulesConfig::default();
/// let deck: Vec<CardId> = (1..=15).flat_map(|n| [CardId::new(n); 2]).collect();
///
/// let state = MatchBuilder::new(&catalog, &config)
///     .with_seed(7)
///     .with_deck(Side::Host, deck.clone())
///     .with_deck(Side::Guest, deck)
///     .build()
///     .unwrap();
///
/// assert_eq!(state.sides[Side::Host].deck.len(), 30);
/// ```
pub struct MatchBuilder<'a> {
    catalog: &'a CardCatalog,
    config: &'a RulesConfig,
    id: MatchId,
    seed: u64,
    decks: SideMap<Vec<CardId>>,
}

impl<'a> MatchBuilder<'a> {
    /// Start a builder with empty decks.
    #[must_use]
    pub fn new(catalog: &'a CardCatalog, config: &'a RulesConfig) -> Self {
        Self {
            catalog,
            config,
            id: MatchId(0),
            seed: 0,
            decks: SideMap::default(),
        }
    }

    /// Set the match id (builder pattern).
    #[must_use]
    pub fn with_id(mut self, id: MatchId) -> Self {
        self.id = id;
        self
    }

    /// Set the RNG seed (builder pattern).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set one side's deck list (builder pattern).
    #[must_use]
    pub fn with_deck(mut self, side: Side, cards: Vec<CardId>) -> Self {
        self.decks[side] = cards;
        self
    }

    /// Validate both decks and create the match.
    pub fn build(self) -> Result<Match, DeckError> {
        for (_, cards) in self.decks.iter() {
            validate_deck(self.catalog, self.config, cards)?;
        }

        let mut state = Match::new(self.id, self.seed, self.config);
        for side in Side::BOTH {
            for &card in &self.decks[side] {
                if !self.catalog.contains(card) {
                    warn!(%card, %side, "deck card missing from catalog, using placeholder");
                }
                let def = self.catalog.get_or_unknown(card).clone();
                let instance = CardInstance::new(state.alloc_instance(), def);
                let _ = state.sides[side].deck.push(instance);
            }
            state.sides[side].deck.shuffle(&mut state.rng);
            debug!(%side, cards = state.sides[side].deck.len(), "deck shuffled");
        }
        Ok(state)
    }
}
