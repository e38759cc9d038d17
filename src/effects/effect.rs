//! Effect descriptors.
//!
//! An effect descriptor is one tagged record (`{"type": "damage", ...}`) or
//! an ordered list of them. Lists resolve strictly left to right on the same
//! working copy, so later steps see what earlier steps did.
//!
//! ## Families
//!
//! - Damage: `damage`, `damage_random`, `damage_all`, `damage_all_enemy`,
//!   `damage_all_ally`, `chain_lightning`
//! - Healing: `heal`, `heal_face`, `heal_unit_full`, `heal_all_ally`
//! - Removal: `destroy`, `destroy_random`, `execute_damaged`, `return_to_hand`
//! - Board: `summon`, `summon_multi`, `resurrect`
//! - Stats: `buff_all_attack`, `buff_self_attack`, `buff_stats`, `double_stats`
//! - Control: `freeze_enemy`, `silence_unit`, `silence_all_enemy`
//! - Resources: `draw`, `draw_until_match_enemy`, `add_mana`, `gain_empty_mana`

use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// Candidate pool for effects without an explicit target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    /// A unit on the opposing board.
    #[default]
    EnemyUnit,
    /// A unit on the acting side's board.
    AllyUnit,
    /// A unit on either board.
    Unit,
    /// The unit that owns the effect.
    SelfUnit,
    /// The opposing side.
    EnemyFace,
    /// The acting side.
    AllyFace,
}

impl TargetMode {
    fn ally_unit() -> Self {
        TargetMode::AllyUnit
    }

    /// Check if this mode picks a side rather than a unit.
    #[must_use]
    pub fn is_face(self) -> bool {
        matches!(self, TargetMode::EnemyFace | TargetMode::AllyFace)
    }
}

/// Unit stat consulted by a [`StatCondition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Attack,
    Health,
    Cost,
}

/// Upper bound on a unit stat; units above `max` are skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatCondition {
    pub stat: Stat,
    pub max: i32,
}

/// One atomic rule effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    // === Damage ===
    /// Damage a unit or a face.
    Damage {
        #[serde(default)]
        target: TargetMode,
        value: i32,
    },

    /// Damage a random unit from the pool, ignoring any explicit target.
    DamageRandom {
        #[serde(default)]
        target: TargetMode,
        value: i32,
    },

    /// Damage every unit on both boards.
    DamageAll { value: i32 },

    /// Damage every unit on the opposing board.
    DamageAllEnemy { value: i32 },

    /// Damage every unit on the acting side's board.
    DamageAllAlly { value: i32 },

    /// Damage the target, then `secondary` to each board neighbour.
    ChainLightning {
        #[serde(default)]
        target: TargetMode,
        value: i32,
        #[serde(default)]
        secondary: i32,
    },

    // === Healing ===
    /// Heal a unit (clamped to max health) or a face (unclamped).
    Heal {
        #[serde(default = "TargetMode::ally_unit")]
        target: TargetMode,
        value: i32,
    },

    /// Heal the acting side.
    HealFace { value: i32 },

    /// Restore a unit to full health.
    HealUnitFull {
        #[serde(default = "TargetMode::ally_unit")]
        target: TargetMode,
    },

    /// Heal every unit on the acting side's board.
    HealAllAlly { value: i32 },

    // === Removal ===
    /// Set a unit's health to zero; bypasses divine shield.
    Destroy {
        #[serde(default)]
        target: TargetMode,
    },

    /// Destroy a random unit from the pool.
    DestroyRandom {
        #[serde(default)]
        target: TargetMode,
    },

    /// Destroy a unit below its maximum health.
    ExecuteDamaged {
        #[serde(default)]
        target: TargetMode,
    },

    /// Remove a unit and put a fresh copy in its owner's hand.
    ReturnToHand {
        #[serde(default)]
        target: TargetMode,
    },

    // === Board ===
    /// Put one unit on the acting side's board.
    Summon { value: CardId },

    /// Put `count` copies of a unit on the acting side's board.
    SummonMulti {
        value: CardId,
        #[serde(default = "default_count")]
        count: u32,
    },

    /// Summon a copy of a graveyard unit costing at most `value`.
    Resurrect { value: i32 },

    // === Stats ===
    /// Add attack to every unit on the acting side's board.
    BuffAllAttack { value: i32 },

    /// Add attack to the source unit.
    BuffSelfAttack { value: i32 },

    /// Add attack and health to a unit.
    BuffStats {
        #[serde(default = "TargetMode::ally_unit")]
        target: TargetMode,
        #[serde(default)]
        attack: i32,
        #[serde(default)]
        health: i32,
    },

    /// Double a unit's attack, health and maximum health.
    DoubleStats {
        #[serde(default = "TargetMode::ally_unit")]
        target: TargetMode,
    },

    // === Control ===
    /// Freeze a unit; it thaws at its owner's next turn start.
    FreezeEnemy {
        #[serde(default)]
        target: TargetMode,
    },

    /// Strip keywords and triggers from a unit.
    SilenceUnit {
        #[serde(default)]
        target: TargetMode,
    },

    /// Silence every opposing unit that passes `condition`.
    SilenceAllEnemy {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<StatCondition>,
    },

    // === Resources ===
    /// Draw cards for the acting side.
    Draw { value: u32 },

    /// Draw until the hand is as large as the opponent's.
    DrawUntilMatchEnemy,

    /// Add current mana (capped).
    AddMana { value: i32 },

    /// Add maximum mana (capped) without refilling.
    GainEmptyMana { value: i32 },
}

fn default_count() -> u32 {
    1
}

impl Effect {
    /// The descriptor tag, as written in card data.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Damage { .. } => "damage",
            Effect::DamageRandom { .. } => "damage_random",
            Effect::DamageAll { .. } => "damage_all",
            Effect::DamageAllEnemy { .. } => "damage_all_enemy",
            Effect::DamageAllAlly { .. } => "damage_all_ally",
            Effect::ChainLightning { .. } => "chain_lightning",
            Effect::Heal { .. } => "heal",
            Effect::HealFace { .. } => "heal_face",
            Effect::HealUnitFull { .. } => "heal_unit_full",
            Effect::HealAllAlly { .. } => "heal_all_ally",
            Effect::Destroy { .. } => "destroy",
            Effect::DestroyRandom { .. } => "destroy_random",
            Effect::ExecuteDamaged { .. } => "execute_damaged",
            Effect::ReturnToHand { .. } => "return_to_hand",
            Effect::Summon { .. } => "summon",
            Effect::SummonMulti { .. } => "summon_multi",
            Effect::Resurrect { .. } => "resurrect",
            Effect::BuffAllAttack { .. } => "buff_all_attack",
            Effect::BuffSelfAttack { .. } => "buff_self_attack",
            Effect::BuffStats { .. } => "buff_stats",
            Effect::DoubleStats { .. } => "double_stats",
            Effect::FreezeEnemy { .. } => "freeze_enemy",
            Effect::SilenceUnit { .. } => "silence_unit",
            Effect::SilenceAllEnemy { .. } => "silence_all_enemy",
            Effect::Draw { .. } => "draw",
            Effect::DrawUntilMatchEnemy => "draw_until_match_enemy",
            Effect::AddMana { .. } => "add_mana",
            Effect::GainEmptyMana { .. } => "gain_empty_mana",
        }
    }

    /// The unit-target mode, for effects that honour an explicit target.
    ///
    /// Random and board-wide effects return `None`; so do single-target
    /// effects aimed at a face.
    #[must_use]
    pub fn unit_target(&self) -> Option<TargetMode> {
        let mode = match self {
            Effect::Damage { target, .. }
            | Effect::ChainLightning { target, .. }
            | Effect::Heal { target, .. }
            | Effect::HealUnitFull { target }
            | Effect::Destroy { target }
            | Effect::ExecuteDamaged { target }
            | Effect::ReturnToHand { target }
            | Effect::BuffStats { target, .. }
            | Effect::DoubleStats { target }
            | Effect::FreezeEnemy { target }
            | Effect::SilenceUnit { target } => *target,
            _ => return None,
        };
        (!mode.is_face() && mode != TargetMode::SelfUnit).then_some(mode)
    }
}

/// A single effect or an ordered list of effects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectSpec {
    Single(Effect),
    Sequence(Vec<Effect>),
}

impl EffectSpec {
    /// The steps, in resolution order.
    #[must_use]
    pub fn steps(&self) -> &[Effect] {
        match self {
            EffectSpec::Single(effect) => std::slice::from_ref(effect),
            EffectSpec::Sequence(effects) => effects,
        }
    }

    /// The target mode of the first step that accepts an explicit target.
    #[must_use]
    pub fn unit_target(&self) -> Option<TargetMode> {
        self.steps().iter().find_map(Effect::unit_target)
    }
}

impl From<Effect> for EffectSpec {
    fn from(effect: Effect) -> Self {
        EffectSpec::Single(effect)
    }
}

impl From<Vec<Effect>> for EffectSpec {
    fn from(effects: Vec<Effect>) -> Self {
        EffectSpec::Sequence(effects)
    }
}
