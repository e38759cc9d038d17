//! Card instances - runtime card state.
//!
//! - `CardInstance`: a card in a hand or deck. Catalog fields copied in plus
//!   a unique instance id; no gameplay state until played.
//! - `UnitInstance`: a unit or building on a board. Tracks current stats,
//!   attack eligibility, statuses and the divine shield.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::{CardDefinition, CardId, CardKind};
use super::keywords::Keywords;
use crate::core::{InstanceId, Side};
use crate::triggers::Triggers;

/// Anything stored in a zone that carries an instance id.
pub trait Instance {
    /// The instance id.
    fn instance_id(&self) -> InstanceId;
}

/// A card in hand or deck.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique instance id.
    pub instance_id: InstanceId,

    /// Copy of the catalog entry.
    pub card: CardDefinition,
}

impl CardInstance {
    /// Create a card instance from a definition.
    #[must_use]
    pub fn new(instance_id: InstanceId, card: CardDefinition) -> Self {
        Self { instance_id, card }
    }

    /// The catalog id.
    #[must_use]
    pub fn card_id(&self) -> CardId {
        self.card.id
    }

    /// The mana cost.
    #[must_use]
    pub fn cost(&self) -> i32 {
        self.card.cost
    }
}

impl Instance for CardInstance {
    fn instance_id(&self) -> InstanceId {
        self.instance_id
    }
}

/// Transient unit status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Cannot attack; thaws at the start of its owner's next turn.
    Frozen,
    /// Keywords and effects were stripped.
    Silenced,
}

/// Result of one damage instance against a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    /// Nothing happened (no damage, or a building).
    Ignored,
    /// A divine shield absorbed the hit.
    Absorbed,
    /// Health was reduced by this much.
    Dealt(i32),
}

/// A unit or building on a board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitInstance {
    /// Unique instance id.
    pub instance_id: InstanceId,

    /// Catalog id this unit was created from.
    pub card_id: CardId,

    /// Unit or building.
    pub kind: CardKind,

    pub name: String,
    pub description: String,
    pub cost: i32,

    /// Base stats from the catalog.
    pub base_attack: i32,
    pub base_health: i32,

    /// Current stats.
    pub attack: i32,
    pub health: i32,
    pub max_health: i32,

    /// Side that controls this unit.
    pub owner: Side,

    /// Whether the unit may declare an attack right now.
    pub can_attack: bool,

    /// Attacks declared this turn.
    pub attacks_this_turn: u32,

    /// Transient statuses.
    #[serde(default)]
    pub statuses: SmallVec<[Status; 2]>,

    /// Absorbs the next damage instance, then clears.
    pub divine_shield: bool,

    /// Remaining turns for a building.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durability: Option<u32>,

    pub keywords: Keywords,
    pub triggers: Triggers,
}

impl UnitInstance {
    /// Create a board unit from a catalog definition.
    ///
    /// Units without haste cannot attack on the turn they arrive; buildings
    /// never can.
    #[must_use]
    pub fn from_definition(def: &CardDefinition, instance_id: InstanceId, owner: Side) -> Self {
        Self {
            instance_id,
            card_id: def.id,
            kind: def.kind,
            name: def.name.clone(),
            description: def.description.clone(),
            cost: def.cost,
            base_attack: def.attack,
            base_health: def.health,
            attack: def.attack,
            health: def.health,
            max_health: def.health,
            owner,
            can_attack: def.keywords.haste && def.kind != CardKind::Building,
            attacks_this_turn: 0,
            statuses: SmallVec::new(),
            divine_shield: def.keywords.divine_shield,
            durability: if def.kind == CardKind::Building {
                Some(def.durability.unwrap_or(1))
            } else {
                None
            },
            keywords: def.keywords,
            triggers: def.triggers.clone(),
        }
    }

    /// Check if this is a building.
    #[must_use]
    pub fn is_building(&self) -> bool {
        self.kind == CardKind::Building
    }

    /// Check if the unit is at or below zero health.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Check if the unit is below its maximum health.
    #[must_use]
    pub fn is_damaged(&self) -> bool {
        self.health < self.max_health
    }

    /// Check a status.
    #[must_use]
    pub fn has_status(&self, status: Status) -> bool {
        self.statuses.contains(&status)
    }

    /// Add a status if not already present.
    pub fn add_status(&mut self, status: Status) {
        if !self.has_status(status) {
            self.statuses.push(status);
        }
    }

    /// Remove a status.
    pub fn remove_status(&mut self, status: Status) {
        self.statuses.retain(|s| *s != status);
    }

    /// Check if the unit is frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.has_status(Status::Frozen)
    }

    /// Check if the unit is silenced.
    #[must_use]
    pub fn is_silenced(&self) -> bool {
        self.has_status(Status::Silenced)
    }

    /// Whether this unit forces enemy attacks onto taunt units.
    ///
    /// A stealthy or elusive taunt unit cannot be reliably struck, so it
    /// does not restrict attacks.
    #[must_use]
    pub fn enforces_taunt(&self) -> bool {
        self.keywords.taunt
            && !self.is_silenced()
            && !self.keywords.stealth
            && !self.keywords.elusive
            && !self.is_building()
            && !self.is_dead()
    }

    /// Apply one damage instance.
    ///
    /// Buildings ignore damage. A divine shield absorbs the whole instance
    /// and is cleared.
    pub fn take_damage(&mut self, amount: i32) -> Hit {
        if amount <= 0 || self.is_building() {
            return Hit::Ignored;
        }
        if self.divine_shield {
            self.divine_shield = false;
            self.keywords.divine_shield = false;
            return Hit::Absorbed;
        }
        self.health -= amount;
        Hit::Dealt(amount)
    }

    /// Heal up to maximum health. Returns the amount restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health + amount.max(0)).min(self.max_health);
        self.health - before
    }

    /// Strip all keywords and triggered effects.
    pub fn silence(&mut self) {
        self.keywords = Keywords::none();
        self.triggers = Triggers::default();
        self.divine_shield = false;
        self.description = "Silenced.".to_string();
        self.add_status(Status::Silenced);
    }

    /// Record an attack and recompute eligibility.
    pub fn mark_attacked(&mut self) {
        self.attacks_this_turn += 1;
        self.can_attack = self.keywords.double_attack && self.attacks_this_turn < 2;
        self.keywords.stealth = false;
    }

    /// Reset attack state at the start of the owner's turn.
    pub fn ready(&mut self) {
        self.attacks_this_turn = 0;
        self.can_attack = !self.is_building();
    }
}

impl Instance for UnitInstance {
    fn instance_id(&self) -> InstanceId {
        self.instance_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Keyword;

    fn grunt() -> CardDefinition {
        CardDefinition::unit(CardId::new(1), "Grunt", 2, 2, 3)
    }

    #[test]
    fn test_from_definition() {
        let unit = UnitInstance::from_definition(&grunt(), InstanceId(10), Side::Host);

        assert_eq!(unit.instance_id, InstanceId(10));
        assert_eq!((unit.attack, unit.health, unit.max_health), (2, 3, 3));
        assert_eq!(unit.owner, Side::Host);
        assert!(!unit.can_attack);
        assert!(!unit.divine_shield);
        assert_eq!(unit.durability, None);
    }

    #[test]
    fn test_haste_and_shield() {
        let def = grunt()
            .with_keyword(Keyword::Haste)
            .with_keyword(Keyword::DivineShield);
        let unit = UnitInstance::from_definition(&def, InstanceId(1), Side::Guest);

        assert!(unit.can_attack);
        assert!(unit.divine_shield);
    }

    #[test]
    fn test_building_never_attacks() {
        let def = CardDefinition::building(CardId::new(2), "Wall", 1, 5, 2).with_keyword(Keyword::Haste);
        let mut unit = UnitInstance::from_definition(&def, InstanceId(1), Side::Host);

        assert!(unit.is_building());
        assert!(!unit.can_attack);
        assert_eq!(unit.durability, Some(2));

        unit.ready();
        assert!(!unit.can_attack);
    }

    #[test]
    fn test_shield_absorbs_one_instance() {
        let def = grunt().with_keyword(Keyword::DivineShield);
        let mut unit = UnitInstance::from_definition(&def, InstanceId(1), Side::Host);

        assert_eq!(unit.take_damage(100), Hit::Absorbed);
        assert_eq!(unit.health, 3);
        assert!(!unit.divine_shield);

        assert_eq!(unit.take_damage(1), Hit::Dealt(1));
        assert_eq!(unit.health, 2);
    }

    #[test]
    fn test_building_ignores_damage() {
        let def = CardDefinition::building(CardId::new(2), "Wall", 1, 5, 2);
        let mut unit = UnitInstance::from_definition(&def, InstanceId(1), Side::Host);

        assert_eq!(unit.take_damage(4), Hit::Ignored);
        assert_eq!(unit.health, 5);
    }

    #[test]
    fn test_heal_clamps() {
        let mut unit = UnitInstance::from_definition(&grunt(), InstanceId(1), Side::Host);
        unit.health = 1;

        assert_eq!(unit.heal(10), 2);
        assert_eq!(unit.health, unit.max_health);
    }

    #[test]
    fn test_silence_strips_everything() {
        let def = grunt()
            .with_keyword(Keyword::Taunt)
            .with_keyword(Keyword::DivineShield)
            .with_trigger(
                crate::triggers::TriggerKind::OnDeath,
                crate::effects::Effect::Draw { value: 1 },
            );
        let mut unit = UnitInstance::from_definition(&def, InstanceId(1), Side::Host);
        assert!(unit.enforces_taunt());

        unit.silence();

        assert!(unit.keywords.is_empty());
        assert!(unit.triggers.is_empty());
        assert!(!unit.divine_shield);
        assert!(unit.is_silenced());
        assert!(!unit.enforces_taunt());
        assert_eq!(unit.description, "Silenced.");
    }

    #[test]
    fn test_mark_attacked_double_attack() {
        let def = grunt().with_keyword(Keyword::DoubleAttack);
        let mut unit = UnitInstance::from_definition(&def, InstanceId(1), Side::Host);
        unit.ready();

        unit.mark_attacked();
        assert!(unit.can_attack);
        unit.mark_attacked();
        assert!(!unit.can_attack);
    }

    #[test]
    fn test_status_set() {
        let mut unit = UnitInstance::from_definition(&grunt(), InstanceId(1), Side::Host);
        unit.add_status(Status::Frozen);
        unit.add_status(Status::Frozen);

        assert_eq!(unit.statuses.len(), 1);
        assert!(unit.is_frozen());

        unit.remove_status(Status::Frozen);
        assert!(!unit.is_frozen());
    }
}
