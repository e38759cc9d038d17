//! Mulligan exchange.
//!
//! Each side privately marks opening-hand cards. Submitting returns the
//! marked cards to the deck, reshuffles, and draws the same number of
//! replacements. Hand size is unchanged.

use tracing::debug;

use crate::core::{InstanceId, Match, Side};
use crate::effects::{EffectReport, EffectResolver};

use super::draw::draw_cards;

/// Record the private selection used when the mulligan timer runs out.
///
/// Ids not in the hand are dropped; duplicates are collapsed.
pub fn mark_cards(state: &mut Match, side: Side, cards: &[InstanceId]) {
    let hand = &state.sides[side].hand;
    let mut marked: Vec<InstanceId> = Vec::with_capacity(cards.len());
    for &id in cards {
        if hand.contains(id) && !marked.contains(&id) {
            marked.push(id);
        }
    }
    state.sides[side].mulligan_marked = marked;
}

/// Exchange `cards` and flag the side done.
pub fn exchange(resolver: &EffectResolver<'_>, state: &mut Match, side: Side, cards: &[InstanceId]) -> EffectReport {
    let mut returned = 0;
    for &id in cards {
        if let Some(card) = state.sides[side].hand.remove(id) {
            let _ = state.sides[side].deck.push(card);
            returned += 1;
        }
    }

    let mut report = EffectReport::default();
    if returned > 0 {
        state.sides[side].deck.shuffle(&mut state.rng);
        let outcome = draw_cards(resolver, state, side, returned, 0);
        report.merge(outcome.report);
    }

    let side_state = &mut state.sides[side];
    side_state.mulligan_done = true;
    side_state.mulligan_marked.clear();
    debug!(%side, returned, "mulligan submitted");
    report.note(format!("{} exchanges {} card(s)", side, returned));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCatalog, CardDefinition, CardId, CardInstance};
    use crate::core::{MatchId, RulesConfig};

    fn setup() -> Match {
        let mut state = Match::new(MatchId(1), 11, &RulesConfig::default());
        for n in 0..10 {
            let id = state.alloc_instance();
            let def = CardDefinition::unit(CardId::new(n + 1), "Card", 1, 1, 1);
            let zone = if n < 4 {
                &mut state.sides[Side::Guest].hand
            } else {
                &mut state.sides[Side::Guest].deck
            };
            let _ = zone.push(CardInstance::new(id, def));
        }
        state
    }

    #[test]
    fn test_exchange_n_for_n() {
        let catalog = CardCatalog::new();
        let config = RulesConfig::default();
        let mut state = setup();
        let marked: Vec<InstanceId> = state.sides[Side::Guest].hand.ids().into_iter().take(2).collect();

        let resolver = EffectResolver::new(&catalog, &config);
        exchange(&resolver, &mut state, Side::Guest, &marked);

        let side = &state.sides[Side::Guest];
        assert_eq!(side.hand.len(), 4);
        assert_eq!(side.deck.len(), 6);
        assert!(side.mulligan_done);
        assert!(side.deck.contains(marked[0]) || side.hand.contains(marked[0]));
    }

    #[test]
    fn test_exchange_nothing() {
        let catalog = CardCatalog::new();
        let config = RulesConfig::default();
        let mut state = setup();
        let before = state.sides[Side::Guest].hand.ids();

        let resolver = EffectResolver::new(&catalog, &config);
        exchange(&resolver, &mut state, Side::Guest, &[]);

        assert_eq!(state.sides[Side::Guest].hand.ids(), before);
        assert!(state.sides[Side::Guest].mulligan_done);
    }

    #[test]
    fn test_mark_filters_foreign_ids() {
        let mut state = setup();
        let hand = state.sides[Side::Guest].hand.ids();
        let deck = state.sides[Side::Guest].deck.ids();

        mark_cards(&mut state, Side::Guest, &[hand[0], hand[0], deck[0]]);

        assert_eq!(state.sides[Side::Guest].mulligan_marked, vec![hand[0]]);
    }
}
