//! Attack validation and resolution.
//!
//! ## Resolution order
//!
//! 1. The attacker's `on_attack` effect
//! 2. Attacker stats are read again
//! 3. The strike, against a face or a unit
//! 4. The return strike, when the defender can hit back
//! 5. Death sweep, with on-death effects
//! 6. The attacker is marked as having attacked
//! 7. Victory check
//!
//! A validation failure returns a [`Decline`] before anything changes.

use tracing::debug;

use crate::cards::{Hit, UnitInstance};
use crate::core::{AttackTarget, InstanceId, Match, Side, TurnPhase};
use crate::effects::{EffectContext, EffectReport, EffectResolver};
use crate::lifecycle::check_victory;
use crate::rules::{require_turn, Decline};
use crate::triggers::{sweep_deaths, TriggerKind};

/// Check every attack precondition without changing anything.
pub fn validate_attack(state: &Match, side: Side, attacker: InstanceId, target: AttackTarget) -> Result<(), Decline> {
    require_turn(state, side, TurnPhase::Main)?;

    let unit = state.sides[side]
        .unit(attacker)
        .filter(|u| !u.is_dead())
        .ok_or(Decline::UnitNotFound(attacker))?;
    if unit.is_building() {
        return Err(Decline::BuildingCannotAttack);
    }
    if unit.is_frozen() {
        return Err(Decline::Frozen(attacker));
    }
    if !unit.can_attack {
        return Err(Decline::CannotAttack(attacker));
    }

    let foe = &state.sides[side.opponent()];
    let taunt_up = foe.has_taunt();
    match target {
        AttackTarget::Face => {
            if taunt_up {
                return Err(Decline::TauntRequired);
            }
        }
        AttackTarget::Unit(id) => {
            let defender = foe
                .unit(id)
                .filter(|u| !u.is_dead())
                .ok_or(Decline::UnitNotFound(id))?;
            if defender.is_building() {
                return Err(Decline::TargetIsBuilding);
            }
            if defender.keywords.stealth {
                return Err(Decline::StealthTarget(id));
            }
            if taunt_up && !(defender.keywords.taunt && !defender.is_silenced()) {
                return Err(Decline::TauntRequired);
            }
            if defender.keywords.elusive && !unit.keywords.elusive {
                return Err(Decline::ElusiveTarget(id));
            }
        }
    }
    Ok(())
}

/// One side of an exchange: `striker` hits `victim`.
///
/// A bane striker destroys the victim even when a shield absorbed the hit.
fn strike(striker: &UnitInstance, victim: &mut UnitInstance) -> String {
    let bane = striker.keywords.bane && !victim.is_building();
    if striker.attack <= 0 && !bane {
        return format!("{} deals no damage", striker.name);
    }

    let line = match victim.take_damage(striker.attack) {
        Hit::Dealt(amount) => format!("{} deals {} to {}", striker.name, amount, victim.name),
        Hit::Absorbed => format!("{}'s divine shield absorbs {}'s strike", victim.name, striker.name),
        Hit::Ignored => format!("{} strikes {} for nothing", striker.name, victim.name),
    };
    if bane {
        victim.health = 0;
        return format!("{}; bane destroys {}", line, victim.name);
    }
    line
}

/// Resolve an attack on a working copy.
pub fn attack(
    resolver: &EffectResolver<'_>,
    state: &mut Match,
    side: Side,
    attacker: InstanceId,
    target: AttackTarget,
) -> Result<EffectReport, Decline> {
    validate_attack(state, side, attacker, target)?;
    let enemy = side.opponent();
    let mut report = EffectReport::default();

    let on_attack = state.sides[side]
        .unit(attacker)
        .filter(|u| !u.is_silenced())
        .and_then(|u| u.triggers.get(TriggerKind::OnAttack).cloned());
    if let Some(spec) = on_attack {
        let ctx = EffectContext::new(side).with_source(attacker);
        report.merge(resolver.resolve(&spec, &ctx, state));
    }

    // The on-attack effect may have changed the attacker.
    if let Some(striker) = state.sides[side].unit(attacker).cloned() {
        match target {
            AttackTarget::Face => {
                let amount = striker.attack.max(0);
                state.sides[enemy].health -= amount;
                report.note(format!("{} attacks {} for {}", striker.name, enemy, amount));
            }
            AttackTarget::Unit(id) => {
                if let Some(defender) = state.sides[enemy].unit(id).cloned() {
                    report.note(format!("{} attacks {}", striker.name, defender.name));
                    if let Some(victim) = state.sides[enemy].unit_mut(id) {
                        report.note(strike(&striker, victim));
                    }
                    if (defender.attack > 0 || defender.keywords.bane) && !defender.is_building() {
                        if let Some(me) = state.sides[side].unit_mut(attacker) {
                            report.note(strike(&defender, me));
                        }
                    }
                } else {
                    report.note(format!("{} attacks, but {} is gone", striker.name, id));
                }
            }
        }
    }

    report.merge(sweep_deaths(resolver, state, side, 0));

    if let Some(unit) = state.sides[side].unit_mut(attacker) {
        unit.mark_attacked();
        debug!(%side, %attacker, attacks = unit.attacks_this_turn, can_attack = unit.can_attack, "attack resolved");
    }

    check_victory(state);
    Ok(report)
}
