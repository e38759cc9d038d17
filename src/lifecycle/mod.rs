//! Match lifecycle: deck setup, opening hands, mulligan, draws and victory.
//!
//! ## Key Types
//!
//! - `MatchBuilder`: validates decks and creates a shuffled match
//! - `DrawOutcome`: what a draw produced, with on-draw trigger results
//!
//! ## Opening
//!
//! The side that acts first draws `first_hand_size` cards, the other side
//! `second_hand_size`. Once both mulligans are in, the second side receives
//! the bonus card.

pub mod deck;
pub mod draw;
pub mod mulligan;

use tracing::{info, warn};

use crate::cards::CardInstance;
use crate::core::{Match, MatchStatus, Side};
use crate::effects::{EffectReport, EffectResolver};

pub use deck::{validate_deck, MatchBuilder};
pub use draw::{draw_cards, DrawOutcome};
pub use mulligan::{exchange, mark_cards};

/// Deal opening hands once the first player is known.
pub fn deal_opening_hands(resolver: &EffectResolver<'_>, state: &mut Match, first: Side) -> EffectReport {
    let config = resolver.config();
    let mut report = EffectReport::default();
    for (side, count) in [
        (first, config.first_hand_size),
        (first.opponent(), config.second_hand_size),
    ] {
        let outcome = draw_cards(resolver, state, side, count, 0);
        report.note(format!("{} draws an opening hand of {}", side, outcome.drawn));
    }
    report
}

/// Give the configured bonus card to `side`.
pub fn grant_bonus_card(resolver: &EffectResolver<'_>, state: &mut Match, side: Side) -> EffectReport {
    let bonus = resolver.config().bonus_card;
    if !resolver.catalog().contains(bonus) {
        warn!(card = %bonus, "bonus card missing from catalog, using placeholder");
    }
    let def = resolver.catalog().get_or_unknown(bonus).clone();
    let name = def.name.clone();
    let card = CardInstance::new(state.alloc_instance(), def);

    let mut report = EffectReport::default();
    match state.sides[side].hand.push(card) {
        Ok(()) => report.note(format!("{} receives {}", side, name)),
        Err(_) => report.note(format!("{}'s hand is full; {} is lost", side, name)),
    }
    report
}

/// Finish the match if either side is at or below zero health.
///
/// Both sides at zero is a draw. Returns whether the match ended now.
pub fn check_victory(state: &mut Match) -> bool {
    if state.is_finished() {
        return false;
    }

    let host_down = state.sides[Side::Host].health <= 0;
    let guest_down = state.sides[Side::Guest].health <= 0;
    let winner = match (host_down, guest_down) {
        (false, false) => return false,
        (true, true) => None,
        (true, false) => Some(Side::Guest),
        (false, true) => Some(Side::Host),
    };

    state.status = MatchStatus::Finished;
    state.winner = winner;
    state.phase_lock = true;
    match winner {
        Some(side) => info!(match_id = %state.id, winner = %side, "match finished"),
        None => info!(match_id = %state.id, "match finished in a draw"),
    }
    true
}
