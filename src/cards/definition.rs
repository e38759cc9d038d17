//! Card definitions - static catalog data.
//!
//! `CardDefinition` holds the immutable properties of a card: its kind,
//! cost, base stats, keywords and triggered effects. Definitions are never
//! mutated at runtime; instances copy the fields they need.

use serde::{Deserialize, Serialize};

use super::keywords::{Keyword, Keywords};
use crate::effects::EffectSpec;
use crate::triggers::{TriggerKind, Triggers};

/// Unique identifier for a card definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// The placeholder used when a catalog lookup misses.
    pub const UNKNOWN: CardId = CardId(0);

    /// The default bonus-mana card given to the second side.
    pub const BONUS_MANA: CardId = CardId(900);

    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// What a card becomes when played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// Lands on the board and fights.
    #[default]
    Unit,
    /// Resolves its on-play effect and is gone.
    Spell,
    /// Lands on the board, never attacks or takes damage, decays each turn.
    Building,
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use duel_ccg::cards::{CardDefinition, CardId, Keyword};
/// use duel_ccg::effects::{Effect, TargetMode};
/// use duel_ccg::triggers::TriggerKind;
///
/// let archer = CardDefinition::unit(CardId::new(7), "Hill Archer", 2, 2, 1)
///     .with_keyword(Keyword::Haste)
///     .with_trigger(TriggerKind::OnPlay, Effect::Damage { target: TargetMode::EnemyUnit, value: 1 });
///
/// assert_eq!(archer.cost, 2);
/// assert!(archer.keywords.haste);
/// assert!(archer.triggers.get(TriggerKind::OnPlay).is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Unit, spell or building.
    #[serde(default)]
    pub kind: CardKind,

    /// Card name (for display and log lines).
    pub name: String,

    /// Rules text.
    #[serde(default)]
    pub description: String,

    /// Mana cost.
    #[serde(default)]
    pub cost: i32,

    /// Base attack.
    #[serde(default)]
    pub attack: i32,

    /// Base health.
    #[serde(default)]
    pub health: i32,

    /// Turns a building stays on the board.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durability: Option<u32>,

    /// Keyword flags.
    #[serde(default)]
    pub keywords: Keywords,

    /// Effects keyed by trigger.
    #[serde(default)]
    pub triggers: Triggers,

    /// Whether the card may appear in a constructed deck.
    #[serde(default = "default_collectible")]
    pub collectible: bool,
}

fn default_collectible() -> bool {
    true
}

impl CardDefinition {
    /// Create a new card definition with zero stats.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, kind: CardKind) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            description: String::new(),
            cost: 0,
            attack: 0,
            health: 0,
            durability: None,
            keywords: Keywords::none(),
            triggers: Triggers::default(),
            collectible: true,
        }
    }

    /// Create a unit definition.
    #[must_use]
    pub fn unit(id: CardId, name: impl Into<String>, cost: i32, attack: i32, health: i32) -> Self {
        let mut def = Self::new(id, name, CardKind::Unit);
        def.cost = cost;
        def.attack = attack;
        def.health = health;
        def
    }

    /// Create a spell definition.
    #[must_use]
    pub fn spell(id: CardId, name: impl Into<String>, cost: i32) -> Self {
        let mut def = Self::new(id, name, CardKind::Spell);
        def.cost = cost;
        def
    }

    /// Create a building definition.
    #[must_use]
    pub fn building(id: CardId, name: impl Into<String>, cost: i32, health: i32, durability: u32) -> Self {
        let mut def = Self::new(id, name, CardKind::Building);
        def.cost = cost;
        def.health = health;
        def.durability = Some(durability);
        def
    }

    /// The placeholder substituted for unknown catalog ids.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::unit(CardId::UNKNOWN, "Unknown", 0, 0, 1)
            .with_description("This card could not be found.")
            .uncollectible()
    }

    /// Set the rules text (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a keyword (builder pattern).
    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.set(keyword, true);
        self
    }

    /// Attach an effect to a trigger (builder pattern).
    #[must_use]
    pub fn with_trigger(mut self, trigger: TriggerKind, spec: impl Into<EffectSpec>) -> Self {
        self.triggers.set(trigger, Some(spec.into()));
        self
    }

    /// Exclude the card from constructed decks (builder pattern).
    #[must_use]
    pub fn uncollectible(mut self) -> Self {
        self.collectible = false;
        self
    }

    /// Check if this is a building.
    #[must_use]
    pub fn is_building(&self) -> bool {
        self.kind == CardKind::Building
    }

    /// Check if playing this card puts something on the board.
    #[must_use]
    pub fn occupies_board(&self) -> bool {
        matches!(self.kind, CardKind::Unit | CardKind::Building)
    }
}
