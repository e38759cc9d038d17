//! Death sweep.
//!
//! After a state-mutating step every unit at or below zero health leaves its
//! board for its owner's graveyard, fields preserved. Each dead unit that is
//! not silenced fires its `on_death` effect once, acting for its owner.
//!
//! Under [`DeathSweep::FixedPoint`] the sweep repeats until a pass finds no
//! dead unit, so on-death chains settle in the same step. Under
//! [`DeathSweep::SinglePass`] units killed by on-death effects stay on the
//! board at zero health until the next sweep.

use tracing::{debug, warn};

use crate::core::{DeathSweep, Match, Side};
use crate::effects::{EffectContext, EffectReport, EffectResolver};

use super::TriggerKind;

/// Upper bound on fixed-point passes.
pub const MAX_SWEEP_PASSES: usize = 16;

/// Collect dead units from both boards, acting side first.
pub fn sweep_deaths(resolver: &EffectResolver<'_>, state: &mut Match, acting: Side, depth: u8) -> EffectReport {
    let passes = match resolver.config().death_sweep {
        DeathSweep::FixedPoint => MAX_SWEEP_PASSES,
        DeathSweep::SinglePass => 1,
    };

    let mut report = EffectReport::default();
    for pass in 0..passes {
        let mut dead = Vec::new();
        for side in acting.this_then_opponent() {
            dead.extend(state.sides[side].board.drain_where(|u| u.is_dead()));
        }
        if dead.is_empty() {
            return report;
        }

        debug!(pass, count = dead.len(), "death sweep");
        for unit in &dead {
            report.note(format!("{} ({}) dies", unit.name, unit.instance_id));
            let _ = state.sides[unit.owner].graveyard.push(unit.clone());
        }

        for unit in dead {
            if unit.is_silenced() {
                continue;
            }
            if let Some(spec) = unit.triggers.get(TriggerKind::OnDeath) {
                let ctx = EffectContext::new(unit.owner)
                    .with_source(unit.instance_id)
                    .at_depth(depth + 1);
                report.merge(resolver.resolve(spec, &ctx, state));
            }
        }
    }

    if passes > 1 && state.sides.iter().any(|(_, s)| s.board.iter().any(|u| u.is_dead())) {
        warn!(passes, "death sweep did not settle");
    }
    report
}
