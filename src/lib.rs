//! # duel-ccg
//!
//! Rules engine for a two-player, turn-based card battle.
//!
//! ## Design Principles
//!
//! 1. **State as a Value**: The match is one serializable document. Every
//!    operation takes it by reference and returns a delta; nothing is held
//!    in process-wide state.
//!
//! 2. **Closed Effect Set**: Card effects are a tagged enum with one variant
//!    per kind, resolved by a single exhaustive match.
//!
//! 3. **Declines, Not Failures**: An operation whose preconditions fail
//!    returns a `Decline` and changes nothing. Catalog misses fall back to a
//!    placeholder card instead of halting the match.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs`, so every
//!   operation runs on a throwaway working copy.
//!
//! - **Deterministic RNG**: Shuffles, coin toss and random targets draw from
//!   a seeded ChaCha stream stored in the document.
//!
//! - **Explicit Scheduling**: Delayed phase transitions are one-shot tasks
//!   keyed by match, turn and phase.
//!
//! ## Modules
//!
//! - `core`: Instance ids, sides, the match document, actions, deltas, RNG, config
//! - `zones`: Bounded and unbounded card zones
//! - `cards`: Card definitions, keywords, instances and the catalog
//! - `effects`: Effect descriptors, targeting and resolution
//! - `triggers`: Triggered effects and the death sweep
//! - `combat`: Attack validation and resolution
//! - `lifecycle`: Deck setup, opening hands, mulligan, draws, victory
//! - `rules`: Player actions, phase transitions, scheduler and engine

pub mod core;
pub mod zones;
pub mod cards;
pub mod effects;
pub mod triggers;
pub mod combat;
pub mod lifecycle;
pub mod rules;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    InstanceId, MatchId, Side, SideMap,
    GameRng, GameRngState,
    DeathSweep, RulesConfig,
    ActionRecord, AttackTarget, PlayerAction, Strategy,
    Match, MatchStatus, SideState, TurnPhase, MatchDelta,
};

pub use crate::zones::Zone;

pub use crate::cards::{
    CardId, CardKind, CardDefinition, CardInstance, UnitInstance,
    Keyword, Keywords, Status, CardCatalog,
};

pub use crate::effects::{Effect, EffectSpec, TargetMode, EffectResolver, EffectContext, EffectReport};

pub use crate::triggers::{TriggerKind, Triggers};

pub use crate::lifecycle::MatchBuilder;

pub use crate::rules::{
    DuelEngine, RulesEngine, GameResult,
    Outcome, Resolution, Decline,
    PhaseScheduler, Checkpoint,
};

pub use crate::error::{DataError, DeckError};
