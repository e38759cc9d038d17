//! The duel rules engine.
//!
//! `DuelEngine` owns the card catalog and rules config and exposes every
//! match operation. Operations are pure with respect to the shared
//! document: each clones the match (O(1) through `im`), runs the change on
//! the clone and returns the difference as an [`Outcome`]. The caller
//! commits it.
//!
//! ```
//! use duel_ccg::cards::CardCatalog;
//! use duel_ccg::core::{MatchId, PlayerAction, RulesConfig, Side};
//! use duel_ccg::rules::{DuelEngine, RulesEngine};
//!
//! let engine = DuelEngine::new(CardCatalog::standard(), RulesConfig::default());
//! let mut state = duel_ccg::core::Match::new(MatchId(1), 7, engine.config());
//!
//! let outcome = engine.apply_action(&state, Side::Guest, &PlayerAction::Surrender);
//! assert!(outcome.commit(&mut state));
//! assert_eq!(engine.is_terminal(&state), Some(duel_ccg::rules::GameResult::Winner(Side::Host)));
//! ```

use tracing::debug;

use crate::cards::CardCatalog;
use crate::combat;
use crate::core::{AttackTarget, InstanceId, Match, PlayerAction, RulesConfig, Side, Strategy, TurnPhase};
use crate::effects::{explicit_unit, EffectReport, EffectResolver};
use crate::lifecycle::MatchBuilder;

use super::actions;
use super::outcome::{Decline, Outcome};
use super::phase;

/// Result of a completed match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(Side),
    /// Both sides fell together.
    Draw,
}

impl GameResult {
    /// Check if a side won.
    #[must_use]
    pub fn is_winner(&self, side: Side) -> bool {
        matches!(self, GameResult::Winner(s) if *s == side)
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_actions`: empty if the side can't act
/// - `apply_action`: must be deterministic for a given document
/// - `is_terminal`: `None` while the match continues
pub trait RulesEngine {
    /// Get the rules configuration.
    fn config(&self) -> &RulesConfig;

    /// Enumerate the actions `side` may take right now.
    fn legal_actions(&self, state: &Match, side: Side) -> Vec<PlayerAction>;

    /// Apply one player action.
    fn apply_action(&self, state: &Match, side: Side, action: &PlayerAction) -> Outcome;

    /// Check if the match is over.
    fn is_terminal(&self, state: &Match) -> Option<GameResult>;

    // === Convenience Methods ===

    /// Check a single action without applying it.
    fn is_legal(&self, state: &Match, side: Side, action: &PlayerAction) -> bool {
        self.legal_actions(state, side).contains(action)
    }
}

/// Engine for the two-sided duel.
pub struct DuelEngine {
    catalog: CardCatalog,
    config: RulesConfig,
}

impl DuelEngine {
    /// Create an engine.
    #[must_use]
    pub fn new(catalog: CardCatalog, config: RulesConfig) -> Self {
        Self { catalog, config }
    }

    /// Engine with the built-in card set and default rules.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(CardCatalog::standard(), RulesConfig::default())
    }

    /// The card catalog.
    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    /// An effect resolver over this engine's catalog and config.
    #[must_use]
    pub fn resolver(&self) -> EffectResolver<'_> {
        EffectResolver::new(&self.catalog, &self.config)
    }

    /// A match builder over this engine's catalog and config.
    #[must_use]
    pub fn builder(&self) -> MatchBuilder<'_> {
        MatchBuilder::new(&self.catalog, &self.config)
    }

    /// Run `op` on a working copy and diff the result.
    fn run(
        &self,
        state: &Match,
        side: Side,
        record: Option<&PlayerAction>,
        op: impl FnOnce(&EffectResolver<'_>, &mut Match) -> Result<EffectReport, Decline>,
    ) -> Outcome {
        let mut working = state.clone();
        let resolver = self.resolver();
        match op(&resolver, &mut working) {
            Ok(report) => {
                if let Some(action) = record.filter(|a| a.is_recorded()) {
                    working.record(side, action.clone());
                }
                Outcome::applied(state, &working, report.lines)
            }
            Err(decline) => {
                debug!(%side, %decline, "declined");
                Outcome::Declined(decline)
            }
        }
    }

    /// Exchange opening-hand cards and finish this side's mulligan.
    pub fn submit_mulligan(&self, state: &Match, side: Side, cards: &[InstanceId]) -> Outcome {
        let action = PlayerAction::SubmitMulligan { cards: cards.iter().copied().collect() };
        self.run(state, side, Some(&action), |r, m| actions::submit_mulligan(r, m, side, cards))
    }

    /// Record the private mulligan selection.
    pub fn mark_mulligan(&self, state: &Match, side: Side, cards: &[InstanceId]) -> Outcome {
        self.run(state, side, None, |_, m| actions::mark_mulligan(m, side, cards))
    }

    /// Play a card from hand, with an optional explicit target.
    pub fn play_card(&self, state: &Match, side: Side, card: InstanceId, target: Option<InstanceId>) -> Outcome {
        let action = PlayerAction::PlayCard { card, target };
        self.run(state, side, Some(&action), |r, m| actions::play_card(r, m, side, card, target))
    }

    /// Declare an attack.
    pub fn attack(&self, state: &Match, side: Side, attacker: InstanceId, target: AttackTarget) -> Outcome {
        let action = PlayerAction::Attack { attacker, target };
        self.run(state, side, Some(&action), |r, m| combat::attack(r, m, side, attacker, target))
    }

    /// Pick the strategy for this turn.
    pub fn choose_strategy(&self, state: &Match, side: Side, choice: Strategy) -> Outcome {
        let action = PlayerAction::ChooseStrategy { choice };
        self.run(state, side, Some(&action), |r, m| actions::choose_strategy(r, m, side, choice))
    }

    /// End the main phase.
    pub fn end_turn(&self, state: &Match, side: Side) -> Outcome {
        self.run(state, side, Some(&PlayerAction::EndTurn), |_, m| actions::end_turn(m, side))
    }

    /// Concede the match.
    pub fn surrender(&self, state: &Match, side: Side) -> Outcome {
        self.run(state, side, Some(&PlayerAction::Surrender), |_, m| actions::surrender(m, side))
    }

    /// Run the system transition for the current phase, as `side`.
    ///
    /// Delays are not checked here; see
    /// [`PhaseScheduler`](super::PhaseScheduler).
    pub fn advance_phase(&self, state: &Match, side: Side) -> Outcome {
        self.run(state, side, None, |r, m| phase::advance(r, m, side))
    }

    fn play_actions(&self, state: &Match, side: Side, out: &mut Vec<PlayerAction>) {
        for card in state.sides[side].hand.iter() {
            let id = card.instance_id;
            if actions::validate_play(state, side, id).is_err() {
                continue;
            }
            let wants_target = card
                .card
                .triggers
                .on_play
                .as_ref()
                .and_then(|spec| spec.unit_target())
                .is_some();
            out.push(PlayerAction::PlayCard { card: id, target: None });
            if wants_target {
                for target_side in Side::BOTH {
                    for unit in state.sides[target_side].board.iter() {
                        if explicit_unit(state, side, unit.instance_id).is_ok() {
                            out.push(PlayerAction::PlayCard {
                                card: id,
                                target: Some(unit.instance_id),
                            });
                        }
                    }
                }
            }
        }
    }

    fn attack_actions(&self, state: &Match, side: Side, out: &mut Vec<PlayerAction>) {
        let targets: Vec<AttackTarget> = std::iter::once(AttackTarget::Face)
            .chain(
                state.sides[side.opponent()]
                    .board
                    .iter()
                    .map(|u| AttackTarget::Unit(u.instance_id)),
            )
            .collect();
        for attacker in state.sides[side].board.ids() {
            for &target in &targets {
                if combat::validate_attack(state, side, attacker, target).is_ok() {
                    out.push(PlayerAction::Attack { attacker, target });
                }
            }
        }
    }
}

impl RulesEngine for DuelEngine {
    fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Surrender is always possible and is left out.
    fn legal_actions(&self, state: &Match, side: Side) -> Vec<PlayerAction> {
        let mut out = Vec::new();
        if state.is_finished() {
            return out;
        }

        match state.phase {
            TurnPhase::Mulligan if !state.sides[side].mulligan_done => {
                let marked = &state.sides[side].mulligan_marked;
                out.push(PlayerAction::SubmitMulligan { cards: marked.iter().copied().collect() });
                if !marked.is_empty() {
                    out.push(PlayerAction::SubmitMulligan { cards: Default::default() });
                }
            }
            TurnPhase::Strategy if actions::require_turn(state, side, TurnPhase::Strategy).is_ok() => {
                out.push(PlayerAction::ChooseStrategy { choice: Strategy::Mana });
                out.push(PlayerAction::ChooseStrategy { choice: Strategy::Draw });
            }
            TurnPhase::Main if actions::require_turn(state, side, TurnPhase::Main).is_ok() => {
                self.play_actions(state, side, &mut out);
                self.attack_actions(state, side, &mut out);
                out.push(PlayerAction::EndTurn);
            }
            _ => {}
        }
        out
    }

    fn apply_action(&self, state: &Match, side: Side, action: &PlayerAction) -> Outcome {
        match action {
            PlayerAction::MarkMulligan { cards } => self.mark_mulligan(state, side, cards),
            PlayerAction::SubmitMulligan { cards } => self.submit_mulligan(state, side, cards),
            PlayerAction::PlayCard { card, target } => self.play_card(state, side, *card, *target),
            PlayerAction::Attack { attacker, target } => self.attack(state, side, *attacker, *target),
            PlayerAction::ChooseStrategy { choice } => self.choose_strategy(state, side, *choice),
            PlayerAction::EndTurn => self.end_turn(state, side),
            PlayerAction::Surrender => self.surrender(state, side),
        }
    }

    fn is_terminal(&self, state: &Match) -> Option<GameResult> {
        if !state.is_finished() {
            return None;
        }
        Some(match state.winner {
            Some(side) => GameResult::Winner(side),
            None => GameResult::Draw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;
    use crate::core::MatchId;

    fn started() -> (DuelEngine, Match) {
        let engine = DuelEngine::standard();
        let deck: Vec<CardId> = (1..=15).flat_map(|n| [CardId::new(n); 2]).collect();
        let mut state = engine
            .builder()
            .with_id(MatchId(2))
            .with_seed(21)
            .with_deck(Side::Host, deck.clone())
            .with_deck(Side::Guest, deck)
            .build()
            .unwrap();
        for _ in 0..2 {
            let outcome = engine.advance_phase(&state, Side::Host);
            assert!(outcome.commit(&mut state));
        }
        (engine, state)
    }

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(Side::Guest);
        assert!(result.is_winner(Side::Guest));
        assert!(!result.is_winner(Side::Host));
        assert!(!GameResult::Draw.is_winner(Side::Host));
    }

    #[test]
    fn test_declined_returns_no_delta() {
        let (engine, state) = started();
        let outsider = state.turn_owner.opponent();

        let outcome = engine.end_turn(&state, outsider);

        assert!(outcome.resolution().is_none());
        assert!(outcome.decline().is_some());
    }

    #[test]
    fn test_history_records_player_actions() {
        let (engine, mut state) = started();
        let owner = state.turn_owner;
        assert!(engine.advance_phase(&state, owner).commit(&mut state));

        let outcome = engine.choose_strategy(&state, owner, Strategy::Mana);
        assert!(outcome.commit(&mut state));

        let last = state.history.last().unwrap();
        assert_eq!(last.side, owner);
        assert_eq!(last.action, PlayerAction::ChooseStrategy { choice: Strategy::Mana });
    }

    #[test]
    fn test_legal_actions_match_apply() {
        let (engine, mut state) = started();
        let owner = state.turn_owner;
        assert!(engine.advance_phase(&state, owner).commit(&mut state));
        assert!(engine.choose_strategy(&state, owner, Strategy::Mana).commit(&mut state));
        assert!(engine.advance_phase(&state, owner).commit(&mut state));
        assert_eq!(state.phase, TurnPhase::Main);

        let legal = engine.legal_actions(&state, owner);
        assert!(legal.contains(&PlayerAction::EndTurn));
        for action in &legal {
            assert!(engine.apply_action(&state, owner, action).is_applied(), "{:?}", action);
        }
        assert!(engine.legal_actions(&state, owner.opponent()).is_empty());
    }
}
