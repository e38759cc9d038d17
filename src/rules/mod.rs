//! Duel rules: actions, phase transitions and the engine.
//!
//! - `DuelEngine`: every match operation, returning an `Outcome`
//! - `RulesEngine`: the trait the engine implements
//! - `PhaseScheduler`: one-shot, delayed phase transitions
//! - `Decline`: why an operation was rejected
//!
//! The engine never interprets presentation or transport concerns; it
//! computes deltas and leaves committing them to the caller.

pub mod actions;
pub mod engine;
pub mod outcome;
pub mod phase;
pub mod scheduler;

pub use actions::{require_turn, validate_mulligan, validate_play};
pub use engine::{DuelEngine, GameResult, RulesEngine};
pub use outcome::{Decline, Outcome, Resolution};
pub use phase::authority;
pub use scheduler::{Checkpoint, PhaseScheduler};
