//! Effect target resolution.
//!
//! An explicit target id is looked up on whichever board holds it in the
//! working copy. Without one, the effect's [`TargetMode`] selects a pool and
//! a uniformly random member is drawn from the match RNG.
//!
//! ## Exclusions
//!
//! - Buildings are never in a pool and never valid explicit targets
//! - Enemy units with stealth cannot be explicitly targeted
//! - Units at or below zero health are left out of random pools

use crate::cards::UnitInstance;
use crate::core::{InstanceId, Match, Side};

use super::effect::TargetMode;

/// A resolved effect target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// A side's health.
    Face(Side),
    /// A unit, with the side whose board holds it.
    Unit(Side, InstanceId),
}

/// Why no target could be resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetMiss {
    /// The explicit id is on neither board.
    NotFound(InstanceId),
    /// The explicit id is a building.
    Building(InstanceId),
    /// The explicit id is an enemy unit in stealth.
    Stealthed(InstanceId),
    /// The explicit id fails the effect's own requirement.
    Ineligible(InstanceId),
    /// The effect has no source unit on a board.
    NoSource,
    /// The candidate pool is empty.
    EmptyPool,
}

impl std::fmt::Display for TargetMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetMiss::NotFound(id) => write!(f, "{} is not on the board", id),
            TargetMiss::Building(id) => write!(f, "{} is a building", id),
            TargetMiss::Stealthed(id) => write!(f, "{} is in stealth", id),
            TargetMiss::Ineligible(id) => write!(f, "{} is not a valid target", id),
            TargetMiss::NoSource => write!(f, "no source unit"),
            TargetMiss::EmptyPool => write!(f, "no valid target"),
        }
    }
}

/// Resolve a single target for an effect.
///
/// `eligible` narrows unit candidates further (e.g. damaged units only);
/// face modes ignore it.
pub fn resolve_target(
    state: &mut Match,
    acting: Side,
    mode: TargetMode,
    source: Option<InstanceId>,
    explicit: Option<InstanceId>,
    eligible: impl Fn(&UnitInstance) -> bool,
) -> Result<Target, TargetMiss> {
    match mode {
        TargetMode::EnemyFace => return Ok(Target::Face(acting.opponent())),
        TargetMode::AllyFace => return Ok(Target::Face(acting)),
        TargetMode::SelfUnit => {
            let id = source.ok_or(TargetMiss::NoSource)?;
            let side = state.locate_unit(id).ok_or(TargetMiss::NoSource)?;
            return Ok(Target::Unit(side, id));
        }
        _ => {}
    }

    if let Some(id) = explicit {
        let side = explicit_unit(state, acting, id)?;
        let unit = state.sides[side].unit(id).ok_or(TargetMiss::NotFound(id))?;
        if !eligible(unit) {
            return Err(TargetMiss::Ineligible(id));
        }
        return Ok(Target::Unit(side, id));
    }

    let pool: Vec<(Side, InstanceId)> = unit_pool(state, acting, mode)
        .into_iter()
        .filter(|(side, id)| state.sides[*side].unit(*id).is_some_and(&eligible))
        .collect();
    state
        .rng
        .choose(&pool)
        .map(|(side, id)| Target::Unit(*side, *id))
        .ok_or(TargetMiss::EmptyPool)
}

/// Validate a manually chosen unit and return the side holding it.
pub fn explicit_unit(state: &Match, acting: Side, id: InstanceId) -> Result<Side, TargetMiss> {
    let side = state.locate_unit(id).ok_or(TargetMiss::NotFound(id))?;
    let unit = state.sides[side].unit(id).ok_or(TargetMiss::NotFound(id))?;
    if unit.is_building() {
        return Err(TargetMiss::Building(id));
    }
    if side != acting && unit.keywords.stealth {
        return Err(TargetMiss::Stealthed(id));
    }
    Ok(side)
}

/// Random-selection candidates for a unit mode, board order, host side first
/// for `Unit`.
#[must_use]
pub fn unit_pool(state: &Match, acting: Side, mode: TargetMode) -> Vec<(Side, InstanceId)> {
    let sides: Vec<Side> = match mode {
        TargetMode::EnemyUnit => vec![acting.opponent()],
        TargetMode::AllyUnit => vec![acting],
        TargetMode::Unit => Side::BOTH.to_vec(),
        _ => Vec::new(),
    };
    sides
        .into_iter()
        .flat_map(|side| {
            state.sides[side]
                .board
                .iter()
                .filter(|u| !u.is_building() && !u.is_dead())
                .map(move |u| (side, u.instance_id))
        })
        .collect()
}

/// Units an area effect touches on one board, in board order.
#[must_use]
pub fn area_units(state: &Match, side: Side) -> Vec<InstanceId> {
    state.sides[side]
        .board
        .iter()
        .filter(|u| !u.is_building())
        .map(|u| u.instance_id)
        .collect()
}
