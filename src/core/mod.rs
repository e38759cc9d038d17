//! Core engine types: instance ids, sides, the match document, actions,
//! deltas, RNG and rules configuration.

pub mod entity;
pub mod side;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;
pub mod delta;

pub use entity::{InstanceId, MatchId};
pub use side::{Side, SideMap};
pub use rng::{GameRng, GameRngState};
pub use config::{DeathSweep, RulesConfig};
pub use action::{ActionRecord, AttackTarget, PlayerAction, Strategy};
pub use state::{Match, MatchStatus, SideState, TurnPhase};
pub use delta::MatchDelta;
