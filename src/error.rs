//! Data-fault error types.
//!
//! Declines (a precondition not met) are not errors; see
//! [`crate::rules::Decline`]. The types here cover malformed input data:
//! catalogs, configs, decks and document snapshots.

use thiserror::Error;

use crate::cards::CardId;

/// Malformed catalog, config or snapshot data.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate card id {0}")]
    DuplicateCard(CardId),

    #[error("invalid card {id}: {reason}")]
    InvalidCard { id: CardId, reason: String },

    #[error("invalid rules config: {0}")]
    Config(String),
}

/// A deck list that violates construction rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck has {actual} cards, expected {expected}")]
    WrongSize { expected: usize, actual: usize },

    #[error("{card} appears {count} times, limit is {limit}")]
    TooManyCopies { card: CardId, count: usize, limit: usize },

    #[error("{0} cannot be put in a deck")]
    NotCollectible(CardId),
}
