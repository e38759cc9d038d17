//! Effect resolution - executing effect descriptors on a working copy.
//!
//! `EffectResolver` interprets one [`EffectSpec`] against a match. Sequences
//! resolve left to right on the same working copy. Each step either resolves
//! or is declined with an explanatory line; a declined step never aborts the
//! surrounding action.
//!
//! Effects that fire further triggers (draws fire `on_draw`) pass an
//! increased depth along. Past [`MAX_TRIGGER_DEPTH`] the chain is cut and a
//! warning is logged.

use tracing::{debug, warn};

use crate::cards::{CardCatalog, CardId, CardInstance, CardKind, Hit, Status, UnitInstance};
use crate::core::{InstanceId, Match, RulesConfig, Side};
use crate::lifecycle::draw_cards;

use super::effect::{Effect, EffectSpec, Stat, StatCondition, TargetMode};
use super::targeting::{area_units, resolve_target, Target};

/// Nesting limit for effects fired by other effects.
pub const MAX_TRIGGER_DEPTH: u8 = 8;

/// Who is resolving an effect, and on what.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectContext {
    /// Side the effect acts for; "enemy" and "ally" are relative to it.
    pub acting: Side,
    /// Unit the effect belongs to, if any.
    pub source: Option<InstanceId>,
    /// Unit chosen by the player, if any.
    pub explicit_target: Option<InstanceId>,
    /// Trigger nesting depth; 0 for effects fired directly by an action.
    pub depth: u8,
}

impl EffectContext {
    /// A top-level context with no source and no target.
    #[must_use]
    pub fn new(acting: Side) -> Self {
        Self {
            acting,
            source: None,
            explicit_target: None,
            depth: 0,
        }
    }

    /// Set the source unit (builder pattern).
    #[must_use]
    pub fn with_source(mut self, source: InstanceId) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the explicit target (builder pattern).
    #[must_use]
    pub fn with_target(mut self, target: Option<InstanceId>) -> Self {
        self.explicit_target = target;
        self
    }

    /// Set the nesting depth (builder pattern).
    #[must_use]
    pub fn at_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }
}

/// Result of resolving one effect step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveResult {
    /// The step changed the match.
    Resolved(String),
    /// The step had no valid target or precondition.
    Declined(String),
}

/// Log lines and counts gathered while resolving effects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectReport {
    pub lines: Vec<String>,
    pub resolved: usize,
    pub declined: usize,
}

impl EffectReport {
    /// Record one step result.
    pub fn record(&mut self, result: ResolveResult) {
        match result {
            ResolveResult::Resolved(line) => {
                self.resolved += 1;
                self.lines.push(line);
            }
            ResolveResult::Declined(line) => {
                self.declined += 1;
                self.lines.push(line);
            }
        }
    }

    /// Add a plain log line.
    pub fn note(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append another report.
    pub fn merge(&mut self, other: EffectReport) {
        self.lines.extend(other.lines);
        self.resolved += other.resolved;
        self.declined += other.declined;
    }
}

fn label(unit: &UnitInstance) -> String {
    format!("{} ({})", unit.name, unit.instance_id)
}

fn describe_hit(unit: &UnitInstance, hit: Hit) -> String {
    match hit {
        Hit::Dealt(amount) => format!("{} takes {} damage", label(unit), amount),
        Hit::Absorbed => format!("{}'s divine shield absorbs the hit", label(unit)),
        Hit::Ignored => format!("{} is unharmed", label(unit)),
    }
}

fn passes(unit: &UnitInstance, condition: Option<StatCondition>) -> bool {
    match condition {
        None => true,
        Some(StatCondition { stat, max }) => {
            let value = match stat {
                Stat::Attack => unit.attack,
                Stat::Health => unit.health,
                Stat::Cost => unit.cost,
            };
            value <= max
        }
    }
}

/// Resolves effect descriptors against a match.
pub struct EffectResolver<'a> {
    catalog: &'a CardCatalog,
    config: &'a RulesConfig,
}

impl<'a> EffectResolver<'a> {
    /// Create a resolver over a catalog and rules config.
    #[must_use]
    pub fn new(catalog: &'a CardCatalog, config: &'a RulesConfig) -> Self {
        Self { catalog, config }
    }

    /// The card catalog.
    #[must_use]
    pub fn catalog(&self) -> &'a CardCatalog {
        self.catalog
    }

    /// The rules config.
    #[must_use]
    pub fn config(&self) -> &'a RulesConfig {
        self.config
    }

    /// Resolve a descriptor, step by step.
    pub fn resolve(&self, spec: &EffectSpec, ctx: &EffectContext, state: &mut Match) -> EffectReport {
        let mut report = EffectReport::default();
        if ctx.depth > MAX_TRIGGER_DEPTH {
            warn!(depth = ctx.depth, acting = %ctx.acting, "trigger chain too deep, effect skipped");
            report.record(ResolveResult::Declined("trigger chain too deep".to_string()));
            return report;
        }

        for effect in spec.steps() {
            let result = self.resolve_single(effect, ctx, state, &mut report);
            debug!(effect = effect.name(), acting = %ctx.acting, ?result, "effect step");
            report.record(result);
        }
        report
    }

    /// Resolve one step. Lines from nested triggers go into `report`.
    pub fn resolve_single(
        &self,
        effect: &Effect,
        ctx: &EffectContext,
        state: &mut Match,
        report: &mut EffectReport,
    ) -> ResolveResult {
        let acting = ctx.acting;
        let enemy = acting.opponent();

        match *effect {
            // === Damage ===
            Effect::Damage { target, value } => self.damage(state, ctx, target, ctx.explicit_target, value),
            Effect::DamageRandom { target, value } => self.damage(state, ctx, target, None, value),
            Effect::DamageAll { value } => self.damage_area(state, &[acting, enemy], value),
            Effect::DamageAllEnemy { value } => self.damage_area(state, &[enemy], value),
            Effect::DamageAllAlly { value } => self.damage_area(state, &[acting], value),
            Effect::ChainLightning { target, value, secondary } => {
                self.chain_lightning(state, ctx, target, value, secondary)
            }

            // === Healing ===
            Effect::Heal { target, value } => {
                match resolve_target(state, acting, target, ctx.source, ctx.explicit_target, |_| true) {
                    Ok(Target::Face(side)) => {
                        state.sides[side].health += value.max(0);
                        ResolveResult::Resolved(format!("{} restores {} health", side, value))
                    }
                    Ok(Target::Unit(side, id)) => match state.sides[side].unit_mut(id) {
                        Some(unit) => {
                            let restored = unit.heal(value);
                            ResolveResult::Resolved(format!("{} heals {}", label(unit), restored))
                        }
                        None => ResolveResult::Declined(format!("heal: {} is gone", id)),
                    },
                    Err(miss) => ResolveResult::Declined(format!("heal: {}", miss)),
                }
            }
            Effect::HealFace { value } => {
                state.sides[acting].health += value.max(0);
                ResolveResult::Resolved(format!("{} restores {} health", acting, value))
            }
            Effect::HealUnitFull { target } => self.with_unit(state, ctx, target, |_| true, "heal_unit_full", |unit| {
                unit.health = unit.max_health;
                format!("{} is fully healed", label(unit))
            }),
            Effect::HealAllAlly { value } => {
                let mut lines = Vec::new();
                for id in area_units(state, acting) {
                    if let Some(unit) = state.sides[acting].unit_mut(id) {
                        let restored = unit.heal(value);
                        lines.push(format!("{} heals {}", label(unit), restored));
                    }
                }
                Self::area_result(lines, "heal_all_ally: no units to heal")
            }

            // === Removal ===
            Effect::Destroy { target } => {
                self.destroy(state, ctx, target, ctx.explicit_target, |_| true, "destroy")
            }
            Effect::DestroyRandom { target } => self.destroy(state, ctx, target, None, |_| true, "destroy_random"),
            Effect::ExecuteDamaged { target } => self.destroy(
                state,
                ctx,
                target,
                ctx.explicit_target,
                UnitInstance::is_damaged,
                "execute_damaged",
            ),
            Effect::ReturnToHand { target } => self.return_to_hand(state, ctx, target),

            // === Board ===
            Effect::Summon { value } => self.summon(state, acting, value, 1),
            Effect::SummonMulti { value, count } => self.summon(state, acting, value, count),
            Effect::Resurrect { value } => self.resurrect(state, acting, value),

            // === Stats ===
            Effect::BuffAllAttack { value } => {
                let mut lines = Vec::new();
                for id in area_units(state, acting) {
                    if let Some(unit) = state.sides[acting].unit_mut(id) {
                        unit.attack += value;
                        lines.push(format!("{} gains {} attack", label(unit), value));
                    }
                }
                Self::area_result(lines, "buff_all_attack: no units to buff")
            }
            Effect::BuffSelfAttack { value } => {
                let unit = ctx
                    .source
                    .and_then(|id| state.find_unit_mut(id))
                    .filter(|u| !u.is_building());
                match unit {
                    Some(unit) => {
                        unit.attack += value;
                        ResolveResult::Resolved(format!("{} gains {} attack", label(unit), value))
                    }
                    None => ResolveResult::Declined("buff_self_attack: no source unit".to_string()),
                }
            }
            Effect::BuffStats { target, attack, health } => {
                self.with_unit(state, ctx, target, |_| true, "buff_stats", |unit| {
                    unit.attack += attack;
                    unit.max_health += health;
                    unit.health += health;
                    format!("{} gets +{}/+{}", label(unit), attack, health)
                })
            }
            Effect::DoubleStats { target } => self.with_unit(state, ctx, target, |_| true, "double_stats", |unit| {
                unit.attack *= 2;
                unit.max_health *= 2;
                unit.health = (unit.health * 2).min(unit.max_health);
                format!("{} doubles to {}/{}", label(unit), unit.attack, unit.health)
            }),

            // === Control ===
            Effect::FreezeEnemy { target } => self.with_unit(state, ctx, target, |_| true, "freeze_enemy", |unit| {
                unit.add_status(Status::Frozen);
                unit.can_attack = false;
                format!("{} is frozen", label(unit))
            }),
            Effect::SilenceUnit { target } => self.with_unit(state, ctx, target, |_| true, "silence_unit", |unit| {
                unit.silence();
                format!("{} is silenced", label(unit))
            }),
            Effect::SilenceAllEnemy { condition } => {
                let mut lines = Vec::new();
                for id in area_units(state, enemy) {
                    if let Some(unit) = state.sides[enemy].unit_mut(id) {
                        if passes(unit, condition) {
                            unit.silence();
                            lines.push(format!("{} is silenced", label(unit)));
                        }
                    }
                }
                Self::area_result(lines, "silence_all_enemy: no units to silence")
            }

            // === Resources ===
            Effect::Draw { value } => self.draw(state, ctx, value as usize, report),
            Effect::DrawUntilMatchEnemy => {
                let mine = state.sides[acting].hand.len();
                let theirs = state.sides[enemy].hand.len();
                if theirs <= mine {
                    return ResolveResult::Declined(format!(
                        "draw_until_match_enemy: {} already holds {} cards",
                        acting, mine
                    ));
                }
                self.draw(state, ctx, theirs - mine, report)
            }
            Effect::AddMana { value } => {
                // Current mana only; may rise above the maximum for this turn.
                let side = &mut state.sides[acting];
                side.mana += value;
                ResolveResult::Resolved(format!("{} has {} mana", acting, side.mana))
            }
            Effect::GainEmptyMana { value } => {
                let cap = self.config.mana_cap;
                let side = &mut state.sides[acting];
                side.max_mana = (side.max_mana + value).min(cap);
                ResolveResult::Resolved(format!("{} has {} maximum mana", acting, side.max_mana))
            }
        }
    }

    fn area_result(lines: Vec<String>, empty: &str) -> ResolveResult {
        if lines.is_empty() {
            ResolveResult::Declined(empty.to_string())
        } else {
            ResolveResult::Resolved(lines.join("; "))
        }
    }

    /// Resolve a unit target, or explain why there is none.
    fn unit_target(
        &self,
        state: &mut Match,
        ctx: &EffectContext,
        mode: TargetMode,
        explicit: Option<InstanceId>,
        eligible: impl Fn(&UnitInstance) -> bool,
        name: &str,
    ) -> Result<(Side, InstanceId), ResolveResult> {
        match resolve_target(state, ctx.acting, mode, ctx.source, explicit, eligible) {
            Ok(Target::Unit(side, id)) => Ok((side, id)),
            Ok(Target::Face(_)) => Err(ResolveResult::Declined(format!("{}: needs a unit target", name))),
            Err(miss) => Err(ResolveResult::Declined(format!("{}: {}", name, miss))),
        }
    }

    /// Resolve a unit target and apply `f` to it.
    fn with_unit(
        &self,
        state: &mut Match,
        ctx: &EffectContext,
        mode: TargetMode,
        eligible: impl Fn(&UnitInstance) -> bool,
        name: &str,
        f: impl FnOnce(&mut UnitInstance) -> String,
    ) -> ResolveResult {
        let (side, id) = match self.unit_target(state, ctx, mode, ctx.explicit_target, eligible, name) {
            Ok(found) => found,
            Err(declined) => return declined,
        };
        match state.sides[side].unit_mut(id) {
            Some(unit) => ResolveResult::Resolved(f(unit)),
            None => ResolveResult::Declined(format!("{}: {} is gone", name, id)),
        }
    }

    fn damage(
        &self,
        state: &mut Match,
        ctx: &EffectContext,
        mode: TargetMode,
        explicit: Option<InstanceId>,
        value: i32,
    ) -> ResolveResult {
        match resolve_target(state, ctx.acting, mode, ctx.source, explicit, |_| true) {
            Ok(Target::Face(side)) => {
                state.sides[side].health -= value.max(0);
                ResolveResult::Resolved(format!("{} takes {} damage", side, value))
            }
            Ok(Target::Unit(side, id)) => match state.sides[side].unit_mut(id) {
                Some(unit) => {
                    let hit = unit.take_damage(value);
                    ResolveResult::Resolved(describe_hit(unit, hit))
                }
                None => ResolveResult::Declined(format!("damage: {} is gone", id)),
            },
            Err(miss) => ResolveResult::Declined(format!("damage: {}", miss)),
        }
    }

    fn damage_area(&self, state: &mut Match, sides: &[Side], value: i32) -> ResolveResult {
        let mut lines = Vec::new();
        for &side in sides {
            for id in area_units(state, side) {
                if let Some(unit) = state.sides[side].unit_mut(id) {
                    let hit = unit.take_damage(value);
                    lines.push(describe_hit(unit, hit));
                }
            }
        }
        Self::area_result(lines, "area damage: no units to hit")
    }

    fn chain_lightning(
        &self,
        state: &mut Match,
        ctx: &EffectContext,
        mode: TargetMode,
        value: i32,
        secondary: i32,
    ) -> ResolveResult {
        let (side, id) = match self.unit_target(state, ctx, mode, ctx.explicit_target, |_| true, "chain_lightning") {
            Ok(found) => found,
            Err(declined) => return declined,
        };

        let board = &state.sides[side].board;
        let Some(pos) = board.position(id) else {
            return ResolveResult::Declined(format!("chain_lightning: {} is gone", id));
        };
        let neighbours: Vec<InstanceId> = [pos.checked_sub(1), pos.checked_add(1)]
            .into_iter()
            .flatten()
            .filter_map(|i| board.get(i))
            .filter(|u| !u.is_building())
            .map(|u| u.instance_id)
            .collect();

        let mut lines = Vec::new();
        if let Some(unit) = state.sides[side].unit_mut(id) {
            let hit = unit.take_damage(value);
            lines.push(describe_hit(unit, hit));
        }
        for neighbour in neighbours {
            if let Some(unit) = state.sides[side].unit_mut(neighbour) {
                let hit = unit.take_damage(secondary);
                lines.push(describe_hit(unit, hit));
            }
        }
        ResolveResult::Resolved(lines.join("; "))
    }

    fn destroy(
        &self,
        state: &mut Match,
        ctx: &EffectContext,
        mode: TargetMode,
        explicit: Option<InstanceId>,
        eligible: impl Fn(&UnitInstance) -> bool,
        name: &str,
    ) -> ResolveResult {
        let (side, id) = match self.unit_target(state, ctx, mode, explicit, eligible, name) {
            Ok(found) => found,
            Err(declined) => return declined,
        };
        match state.sides[side].unit_mut(id) {
            Some(unit) => {
                unit.health = 0;
                ResolveResult::Resolved(format!("{} is destroyed", label(unit)))
            }
            None => ResolveResult::Declined(format!("{}: {} is gone", name, id)),
        }
    }

    fn return_to_hand(&self, state: &mut Match, ctx: &EffectContext, mode: TargetMode) -> ResolveResult {
        let (side, id) = match self.unit_target(state, ctx, mode, ctx.explicit_target, |_| true, "return_to_hand") {
            Ok(found) => found,
            Err(declined) => return declined,
        };
        let Some(unit) = state.sides[side].board.remove(id) else {
            return ResolveResult::Declined(format!("return_to_hand: {} is gone", id));
        };

        let owner = unit.owner;
        if state.sides[owner].hand.is_full() {
            return ResolveResult::Declined(format!(
                "{} leaves the board; {}'s hand is full",
                label(&unit),
                owner
            ));
        }
        let card = self.catalog.get_or_unknown(unit.card_id).clone();
        let fresh = CardInstance::new(state.alloc_instance(), card);
        match state.sides[owner].hand.push(fresh) {
            Ok(()) => ResolveResult::Resolved(format!("{} returns to {}'s hand", label(&unit), owner)),
            Err(_) => ResolveResult::Declined(format!("{} leaves the board; {}'s hand is full", label(&unit), owner)),
        }
    }

    fn summon(&self, state: &mut Match, side: Side, card: CardId, count: u32) -> ResolveResult {
        let def = self.catalog.get_or_unknown(card);
        if !def.occupies_board() {
            return ResolveResult::Declined(format!("summon: {} is not a unit", def.name));
        }

        let mut placed = 0;
        for _ in 0..count {
            if state.sides[side].board.is_full() {
                break;
            }
            let id = state.alloc_instance();
            let unit = UnitInstance::from_definition(def, id, side);
            if state.sides[side].board.push(unit).is_err() {
                break;
            }
            placed += 1;
        }

        if placed == 0 {
            ResolveResult::Declined(format!("summon: {}'s board is full", side))
        } else {
            ResolveResult::Resolved(format!("{} summons {} x{}", side, def.name, placed))
        }
    }

    fn resurrect(&self, state: &mut Match, side: Side, ceiling: i32) -> ResolveResult {
        if state.sides[side].board.is_full() {
            return ResolveResult::Declined(format!("resurrect: {}'s board is full", side));
        }

        let candidates: Vec<(i32, CardId)> = state.sides[side]
            .graveyard
            .iter()
            .filter(|u| u.kind == CardKind::Unit && u.cost <= ceiling)
            .map(|u| (u.cost, u.card_id))
            .collect();
        let Some(top) = candidates.iter().map(|(cost, _)| *cost).max() else {
            return ResolveResult::Declined(format!(
                "resurrect: no unit costing {} or less in {}'s graveyard",
                ceiling, side
            ));
        };
        let bracket: Vec<CardId> = candidates
            .into_iter()
            .filter(|(cost, _)| *cost == top)
            .map(|(_, id)| id)
            .collect();

        match state.rng.choose(&bracket).copied() {
            Some(card) => self.summon(state, side, card, 1),
            None => ResolveResult::Declined("resurrect: no candidate".to_string()),
        }
    }

    fn draw(&self, state: &mut Match, ctx: &EffectContext, count: usize, report: &mut EffectReport) -> ResolveResult {
        let outcome = draw_cards(self, state, ctx.acting, count, ctx.depth);
        let line = match (outcome.drawn, outcome.discarded) {
            (0, 0) => format!("{}'s deck is empty", ctx.acting),
            (drawn, 0) => format!("{} draws {}", ctx.acting, drawn),
            (drawn, discarded) => format!(
                "{} draws {}, {} discarded from a full hand",
                ctx.acting, drawn, discarded
            ),
        };
        report.merge(outcome.report);
        ResolveResult::Resolved(line)
    }
}
