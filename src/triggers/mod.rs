//! Triggered effects.
//!
//! Every card carries at most one effect per [`TriggerKind`]. Triggers are
//! stored on the definition and copied onto board units; silencing a unit
//! clears them.
//!
//! ## Firing
//!
//! - `on_play`: when the card is played (spells and units alike)
//! - `on_attack`: before the attacker's strike is computed
//! - `on_death`: once, when the death sweep moves the unit to a graveyard
//! - `on_draw`: for every card leaving the owner's deck
//! - `turn_start` / `turn_end`: during the owner's start and end effects
//!
//! Board-wide firing ([`fire_board`]) snapshots the board left to right and
//! skips units that left the board before their turn to fire.

pub mod deaths;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{InstanceId, Match, Side};
use crate::effects::{EffectContext, EffectReport, EffectResolver, EffectSpec};

pub use deaths::sweep_deaths;

/// The moment a triggered effect fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    OnPlay,
    OnAttack,
    OnDeath,
    OnDraw,
    TurnStart,
    TurnEnd,
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TriggerKind::OnPlay => "on_play",
            TriggerKind::OnAttack => "on_attack",
            TriggerKind::OnDeath => "on_death",
            TriggerKind::OnDraw => "on_draw",
            TriggerKind::TurnStart => "turn_start",
            TriggerKind::TurnEnd => "turn_end",
        };
        f.write_str(name)
    }
}

/// Effects keyed by trigger.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Triggers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_play: Option<EffectSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_attack: Option<EffectSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_death: Option<EffectSpec>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "on_draw_trigger")]
    pub on_draw: Option<EffectSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_start: Option<EffectSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_end: Option<EffectSpec>,
}

impl Triggers {
    /// Get the effect for a trigger.
    #[must_use]
    pub fn get(&self, kind: TriggerKind) -> Option<&EffectSpec> {
        match kind {
            TriggerKind::OnPlay => self.on_play.as_ref(),
            TriggerKind::OnAttack => self.on_attack.as_ref(),
            TriggerKind::OnDeath => self.on_death.as_ref(),
            TriggerKind::OnDraw => self.on_draw.as_ref(),
            TriggerKind::TurnStart => self.turn_start.as_ref(),
            TriggerKind::TurnEnd => self.turn_end.as_ref(),
        }
    }

    /// Set or clear the effect for a trigger.
    pub fn set(&mut self, kind: TriggerKind, spec: Option<EffectSpec>) {
        let slot = match kind {
            TriggerKind::OnPlay => &mut self.on_play,
            TriggerKind::OnAttack => &mut self.on_attack,
            TriggerKind::OnDeath => &mut self.on_death,
            TriggerKind::OnDraw => &mut self.on_draw,
            TriggerKind::TurnStart => &mut self.turn_start,
            TriggerKind::TurnEnd => &mut self.turn_end,
        };
        *slot = spec;
    }

    /// Check if no trigger carries an effect.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Fire one trigger kind for every unit on a side's board, left to right.
pub fn fire_board(
    resolver: &EffectResolver<'_>,
    state: &mut Match,
    side: Side,
    kind: TriggerKind,
    depth: u8,
) -> EffectReport {
    let pending: Vec<(InstanceId, EffectSpec)> = state.sides[side]
        .board
        .iter()
        .filter(|u| !u.is_silenced())
        .filter_map(|u| u.triggers.get(kind).map(|spec| (u.instance_id, spec.clone())))
        .collect();

    let mut report = EffectReport::default();
    for (source, spec) in pending {
        if !state.sides[side].board.contains(source) {
            continue;
        }
        debug!(%side, %source, trigger = %kind, "firing board trigger");
        let ctx = EffectContext::new(side).with_source(source).at_depth(depth);
        report.merge(resolver.resolve(&spec, &ctx, state));
    }
    report
}
