//! The built-in card pool.
//!
//! Twenty-four collectible cards (ids 1-24) covering every keyword and
//! effect family, plus the uncollectible tokens they summon and the
//! bonus-mana card handed to the side that acts second.

use super::definition::{CardDefinition, CardId};
use super::keywords::Keyword;
use super::registry::CardCatalog;
use crate::effects::{Effect, Stat, StatCondition, TargetMode};
use crate::triggers::TriggerKind;

/// Summoned by Recruiting Horn and the Warren.
pub const SQUIRE_TOKEN: CardId = CardId(100);

/// Summoned when a Sprouting Husk dies.
pub const SAPLING_TOKEN: CardId = CardId(101);

/// Build the standard catalog.
pub(crate) fn catalog() -> CardCatalog {
    let mut catalog = CardCatalog::new();
    for card in definitions() {
        // Static data; a rejection would be caught by the catalog tests.
        if let Err(err) = catalog.register(card) {
            tracing::warn!(%err, "standard card rejected");
        }
    }
    catalog
}

fn definitions() -> Vec<CardDefinition> {
    use Effect::*;
    use TriggerKind::*;

    let id = CardId::new;
    vec![
        CardDefinition::unit(id(1), "Village Militia", 1, 1, 1),
        CardDefinition::unit(id(2), "Road Runner", 1, 1, 1)
            .with_keyword(Keyword::Haste)
            .with_description("Haste."),
        CardDefinition::unit(id(3), "Shield Initiate", 2, 1, 2)
            .with_keyword(Keyword::DivineShield)
            .with_description("Divine Shield."),
        CardDefinition::unit(id(4), "Gate Warden", 2, 1, 4)
            .with_keyword(Keyword::Taunt)
            .with_description("Taunt."),
        CardDefinition::unit(id(5), "Hill Archer", 2, 2, 1)
            .with_trigger(OnPlay, Damage { target: TargetMode::EnemyUnit, value: 1 })
            .with_description("On play: deal 1 damage to an enemy unit."),
        CardDefinition::unit(id(6), "Marsh Viper", 2, 1, 1)
            .with_keyword(Keyword::Bane)
            .with_description("Bane."),
        CardDefinition::unit(id(7), "Sprouting Husk", 2, 2, 1)
            .with_trigger(OnDeath, Summon { value: SAPLING_TOKEN })
            .with_description("On death: summon a 1/1 Sapling."),
        CardDefinition::unit(id(8), "Night Prowler", 3, 3, 2)
            .with_keyword(Keyword::Stealth)
            .with_description("Stealth."),
        CardDefinition::unit(id(9), "Cloud Drifter", 3, 2, 3)
            .with_keyword(Keyword::Elusive)
            .with_description("Elusive."),
        CardDefinition::unit(id(10), "Twin Blade Duelist", 4, 2, 3)
            .with_keyword(Keyword::DoubleAttack)
            .with_description("Double Attack."),
        CardDefinition::unit(id(11), "Battle Drummer", 3, 2, 2)
            .with_trigger(OnPlay, BuffAllAttack { value: 1 })
            .with_description("On play: give your units +1 attack."),
        CardDefinition::unit(id(12), "Raging Brute", 3, 2, 4)
            .with_trigger(OnAttack, BuffSelfAttack { value: 1 })
            .with_description("On attack: gain +1 attack."),
        CardDefinition::unit(id(13), "Field Medic", 3, 2, 3)
            .with_trigger(TurnEnd, HealAllAlly { value: 1 })
            .with_description("End of turn: heal your units for 1."),
        CardDefinition::unit(id(14), "Scroll Keeper", 2, 1, 3)
            .with_trigger(TurnStart, HealFace { value: 1 })
            .with_description("Start of turn: restore 1 health to you."),
        CardDefinition::unit(id(15), "Lore Seeker", 3, 2, 2)
            .with_trigger(OnDraw, BuffSelfAttack { value: 1 })
            .with_description("Whenever you draw a card, gain +1 attack."),
        CardDefinition::unit(id(16), "Grave Caller", 5, 3, 3)
            .with_trigger(OnPlay, Resurrect { value: 4 })
            .with_description("On play: resurrect a friendly unit costing 4 or less."),
        CardDefinition::building(id(17), "Watchtower", 2, 5, 3)
            .with_trigger(TurnStart, Damage { target: TargetMode::EnemyFace, value: 1 })
            .with_description("Start of turn: deal 1 damage to the enemy. Lasts 3 turns."),
        CardDefinition::building(id(18), "Warren", 3, 4, 2)
            .with_trigger(TurnEnd, Summon { value: SQUIRE_TOKEN })
            .with_description("End of turn: summon a 1/1 Squire. Lasts 2 turns."),
        CardDefinition::spell(id(19), "Spark", 1)
            .with_trigger(OnPlay, Damage { target: TargetMode::EnemyUnit, value: 2 })
            .with_description("Deal 2 damage to an enemy unit."),
        CardDefinition::spell(id(20), "Frost Snap", 1)
            .with_trigger(OnPlay, FreezeEnemy { target: TargetMode::EnemyUnit })
            .with_description("Freeze an enemy unit."),
        CardDefinition::spell(id(21), "Forked Lightning", 3)
            .with_trigger(
                OnPlay,
                ChainLightning { target: TargetMode::EnemyUnit, value: 3, secondary: 1 },
            )
            .with_description("Deal 3 damage to an enemy unit and 1 to its neighbours."),
        CardDefinition::spell(id(22), "Headsman's Order", 2)
            .with_trigger(OnPlay, ExecuteDamaged { target: TargetMode::EnemyUnit })
            .with_description("Destroy a damaged enemy unit."),
        CardDefinition::spell(id(23), "Recruiting Horn", 3)
            .with_trigger(OnPlay, SummonMulti { value: SQUIRE_TOKEN, count: 2 })
            .with_description("Summon two 1/1 Squires."),
        CardDefinition::spell(id(24), "Hush", 4)
            .with_trigger(
                OnPlay,
                vec![
                    SilenceAllEnemy { condition: Some(StatCondition { stat: Stat::Attack, max: 3 }) },
                    Draw { value: 1 },
                ],
            )
            .with_description("Silence enemy units with 3 or less attack. Draw a card."),
        CardDefinition::unit(SQUIRE_TOKEN, "Squire", 1, 1, 1).uncollectible(),
        CardDefinition::unit(SAPLING_TOKEN, "Sapling", 1, 1, 1).uncollectible(),
        CardDefinition::spell(CardId::BONUS_MANA, "Bonus Mana", 0)
            .with_trigger(OnPlay, AddMana { value: 1 })
            .with_description("Gain 1 mana this turn.")
            .uncollectible(),
    ]
}
