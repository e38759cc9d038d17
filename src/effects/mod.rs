//! Effect system for card abilities.
//!
//! Effects are the building blocks of card text:
//! - `Effect`: closed enumeration of effect kinds
//! - `EffectSpec`: one effect or an ordered sequence
//! - `TargetMode`: how a target is chosen when none is given
//! - `EffectResolver`: executes effects on a working copy of the match
//!
//! ## Design Philosophy
//!
//! Effects never fail the surrounding action. A step with no valid target
//! is declined with a log line and the rest of the sequence still runs.
//! Catalog misses fall back to the placeholder card.

mod effect;
mod resolver;
mod targeting;

pub use effect::{Effect, EffectSpec, Stat, StatCondition, TargetMode};
pub use resolver::{EffectContext, EffectReport, EffectResolver, ResolveResult, MAX_TRIGGER_DEPTH};
pub use targeting::{area_units, explicit_unit, resolve_target, unit_pool, Target, TargetMiss};
