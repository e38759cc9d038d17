//! Card draw.
//!
//! Drawing takes the front card of the deck. An empty deck draws nothing and
//! costs nothing. A card drawn into a full hand is discarded. Every card
//! that leaves the deck fires the drawing side's `on_draw` board triggers,
//! whoever caused the draw.

use tracing::debug;

use crate::core::{Match, Side};
use crate::effects::{EffectReport, EffectResolver};
use crate::triggers::{fire_board, TriggerKind};

/// What a draw produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawOutcome {
    /// Cards added to the hand.
    pub drawn: usize,
    /// Cards discarded because the hand was full.
    pub discarded: usize,
    /// Draw log lines and any on-draw trigger results.
    pub report: EffectReport,
}

impl DrawOutcome {
    /// Cards that left the deck.
    #[must_use]
    pub fn removed(&self) -> usize {
        self.drawn + self.discarded
    }
}

/// Draw `count` cards for `side`.
pub fn draw_cards(
    resolver: &EffectResolver<'_>,
    state: &mut Match,
    side: Side,
    count: usize,
    depth: u8,
) -> DrawOutcome {
    let mut outcome = DrawOutcome::default();

    for _ in 0..count {
        let Some(card) = state.sides[side].deck.pop_front() else {
            debug!(%side, "deck empty, draw skipped");
            break;
        };

        let name = card.card.name.clone();
        match state.sides[side].hand.push(card) {
            Ok(()) => {
                outcome.drawn += 1;
                outcome.report.note(format!("{} draws a card", side));
            }
            Err(_) => {
                outcome.discarded += 1;
                outcome.report.note(format!("{}'s hand is full; {} is discarded", side, name));
            }
        }

        let triggered = fire_board(resolver, state, side, TriggerKind::OnDraw, depth + 1);
        outcome.report.merge(triggered);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCatalog, CardDefinition, CardId, CardInstance, UnitInstance};
    use crate::core::{MatchId, RulesConfig};
    use crate::effects::Effect;

    fn stock(state: &mut Match, side: Side, n: usize) {
        for i in 0..n {
            let id = state.alloc_instance();
            let def = CardDefinition::unit(CardId::new(1), format!("Card {}", i), 1, 1, 1);
            let _ = state.sides[side].deck.push(CardInstance::new(id, def));
        }
    }

    #[test]
    fn test_draw_from_front() {
        let catalog = CardCatalog::new();
        let config = RulesConfig::default();
        let mut state = Match::new(MatchId(1), 5, &config);
        stock(&mut state, Side::Host, 3);
        let front = state.sides[Side::Host].deck.get(0).map(|c| c.instance_id);

        let resolver = EffectResolver::new(&catalog, &config);
        let outcome = draw_cards(&resolver, &mut state, Side::Host, 1, 0);

        assert_eq!(outcome.drawn, 1);
        assert_eq!(state.sides[Side::Host].hand.get(0).map(|c| c.instance_id), front);
        assert_eq!(state.sides[Side::Host].deck.len(), 2);
    }

    #[test]
    fn test_empty_deck_is_silent() {
        let catalog = CardCatalog::new();
        let config = RulesConfig::default();
        let mut state = Match::new(MatchId(1), 5, &config);
        stock(&mut state, Side::Host, 1);

        let resolver = EffectResolver::new(&catalog, &config);
        let outcome = draw_cards(&resolver, &mut state, Side::Host, 3, 0);

        assert_eq!(outcome.drawn, 1);
        assert_eq!(outcome.removed(), 1);
        assert_eq!(state.sides[Side::Host].health, 30);
    }

    #[test]
    fn test_full_hand_discards() {
        let catalog = CardCatalog::new();
        let config = RulesConfig::default().with_hand_capacity(2);
        let mut state = Match::new(MatchId(1), 5, &config);
        stock(&mut state, Side::Guest, 4);

        let resolver = EffectResolver::new(&catalog, &config);
        let outcome = draw_cards(&resolver, &mut state, Side::Guest, 4, 0);

        assert_eq!((outcome.drawn, outcome.discarded), (2, 2));
        assert_eq!(state.sides[Side::Guest].hand.len(), 2);
        assert!(state.sides[Side::Guest].deck.is_empty());
    }

    #[test]
    fn test_on_draw_fires_per_card() {
        let catalog = CardCatalog::new();
        let config = RulesConfig::default();
        let mut state = Match::new(MatchId(1), 5, &config);
        stock(&mut state, Side::Host, 2);

        let seeker = CardDefinition::unit(CardId::new(2), "Seeker", 3, 2, 2)
            .with_trigger(TriggerKind::OnDraw, Effect::BuffSelfAttack { value: 1 });
        let id = state.alloc_instance();
        let _ = state.sides[Side::Host].board.push(UnitInstance::from_definition(&seeker, id, Side::Host));

        let resolver = EffectResolver::new(&catalog, &config);
        draw_cards(&resolver, &mut state, Side::Host, 2, 0);

        assert_eq!(state.find_unit(id).map(|u| u.attack), Some(4));
    }
}
