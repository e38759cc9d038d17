//! Deferred phase transitions.
//!
//! Phase advancement is re-evaluated every time a side observes the shared
//! document. `PhaseScheduler` turns those observations into one-shot
//! transitions: each [`Checkpoint`] is scheduled once, fires once when its
//! delay has passed, and is then remembered as processed. Observing the same
//! checkpoint again never schedules a second transition.
//!
//! ## Delays
//!
//! - `coin_toss`: coin-toss delay
//! - `mulligan`, while a side is still choosing: mulligan timeout
//! - `end_effect`, second stage: settle delay
//! - everything else system-driven: immediate
//!
//! `strategy` and `main` are never scheduled; they wait for the turn owner.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::core::{Match, MatchId, RulesConfig, Side, TurnPhase};

use super::engine::{DuelEngine, RulesEngine};
use super::outcome::{Decline, Outcome};
use super::phase::authority;

/// Identity of one system-driven transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Checkpoint {
    pub match_id: MatchId,
    pub turn: u32,
    pub phase: TurnPhase,
    /// Sub-step inside the phase.
    pub stage: u8,
}

impl Checkpoint {
    /// The checkpoint a match is currently at.
    #[must_use]
    pub fn of(state: &Match) -> Self {
        let stage = match state.phase {
            TurnPhase::Mulligan => u8::from(state.sides.iter().all(|(_, s)| s.mulligan_done)),
            TurnPhase::EndEffect => u8::from(state.turn_end_resolved),
            _ => 0,
        };
        Self {
            match_id: state.id,
            turn: state.turn,
            phase: state.phase,
            stage,
        }
    }

    /// Delay before this transition may run, or `None` for player-driven
    /// phases.
    #[must_use]
    pub fn delay_ms(&self, config: &RulesConfig) -> Option<u64> {
        match (self.phase, self.stage) {
            (TurnPhase::Strategy | TurnPhase::Main, _) => None,
            (TurnPhase::CoinToss, _) => Some(config.coin_toss_delay_ms),
            (TurnPhase::Mulligan, 0) => Some(config.mulligan_timeout_ms),
            (TurnPhase::EndEffect, 1) => Some(config.settle_delay_ms),
            _ => Some(0),
        }
    }
}

/// One observer's transition guard.
#[derive(Debug, Default)]
pub struct PhaseScheduler {
    due: FxHashMap<Checkpoint, u64>,
    processed: FxHashSet<Checkpoint>,
}

impl PhaseScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe `state` at `now_ms` as `observer` and run the current
    /// transition if it is due.
    pub fn tick(&mut self, engine: &DuelEngine, state: &Match, observer: Side, now_ms: u64) -> Outcome {
        if state.is_finished() {
            return Outcome::Declined(Decline::MatchFinished);
        }
        if observer != authority(state) {
            return Outcome::Declined(Decline::NotAuthoritative);
        }

        let checkpoint = Checkpoint::of(state);
        if self.processed.contains(&checkpoint) {
            return Outcome::Declined(Decline::AlreadyProcessed);
        }
        let Some(delay) = checkpoint.delay_ms(engine.config()) else {
            return Outcome::Declined(Decline::AwaitingPlayer(state.phase));
        };

        let due = *self.due.entry(checkpoint).or_insert_with(|| {
            debug!(?checkpoint, delay, "transition scheduled");
            now_ms.saturating_add(delay)
        });
        if now_ms < due {
            return Outcome::Declined(Decline::NotDue {
                remaining_ms: due - now_ms,
            });
        }

        let outcome = engine.advance_phase(state, observer);
        if outcome.is_applied() {
            // Earlier stages of the same phase can no longer fire.
            self.due.retain(|c, _| {
                (c.match_id, c.turn, c.phase) != (checkpoint.match_id, checkpoint.turn, checkpoint.phase)
            });
            self.processed.insert(checkpoint);
        }
        outcome
    }

    /// Transitions scheduled but not yet run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.due.len()
    }

    /// Check if a checkpoint already ran.
    #[must_use]
    pub fn is_processed(&self, checkpoint: &Checkpoint) -> bool {
        self.processed.contains(checkpoint)
    }

    /// Drop everything remembered about a match.
    pub fn forget(&mut self, match_id: MatchId) {
        self.due.retain(|c, _| c.match_id != match_id);
        self.processed.retain(|c| c.match_id != match_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCatalog, CardId};
    use crate::core::MatchStatus;

    fn engine() -> DuelEngine {
        DuelEngine::new(CardCatalog::standard(), RulesConfig::default())
    }

    fn in_mulligan(engine: &DuelEngine) -> Match {
        let deck: Vec<CardId> = (1..=15).flat_map(|n| [CardId::new(n); 2]).collect();
        let mut state = engine
            .builder()
            .with_id(MatchId(6))
            .with_deck(Side::Host, deck.clone())
            .with_deck(Side::Guest, deck)
            .build()
            .unwrap();
        assert!(engine.advance_phase(&state, Side::Host).commit(&mut state));
        assert_eq!(state.phase, TurnPhase::Mulligan);
        state
    }

    #[test]
    fn test_coin_toss_waits_for_delay() {
        let engine = engine();
        let state = Match::new(MatchId(4), 1, engine.config());
        let mut scheduler = PhaseScheduler::new();

        let first = scheduler.tick(&engine, &state, Side::Host, 1_000);
        assert_eq!(first.decline(), Some(&Decline::NotDue { remaining_ms: 3_000 }));

        let again = scheduler.tick(&engine, &state, Side::Host, 2_500);
        assert_eq!(again.decline(), Some(&Decline::NotDue { remaining_ms: 1_500 }));
        assert_eq!(scheduler.pending(), 1);

        let fired = scheduler.tick(&engine, &state, Side::Host, 4_000);
        assert!(fired.is_applied());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_processed_never_fires_twice() {
        let engine = engine();
        let state = Match::new(MatchId(4), 1, engine.config());
        let mut scheduler = PhaseScheduler::new();

        scheduler.tick(&engine, &state, Side::Host, 0);
        assert!(scheduler.tick(&engine, &state, Side::Host, 5_000).is_applied());

        // The same document observed again, before the commit lands.
        let stale = scheduler.tick(&engine, &state, Side::Host, 6_000);
        assert_eq!(stale.decline(), Some(&Decline::AlreadyProcessed));
        assert!(scheduler.is_processed(&Checkpoint::of(&state)));
    }

    #[test]
    fn test_guest_cannot_drive_pre_game() {
        let engine = engine();
        let state = Match::new(MatchId(4), 1, engine.config());
        let mut scheduler = PhaseScheduler::new();

        let outcome = scheduler.tick(&engine, &state, Side::Guest, 10_000);
        assert_eq!(outcome.decline(), Some(&Decline::NotAuthoritative));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_player_phase_not_scheduled() {
        let engine = engine();
        let mut state = Match::new(MatchId(4), 1, engine.config());
        state.status = MatchStatus::InProgress;
        state.phase = TurnPhase::Main;
        state.phase_lock = false;
        let mut scheduler = PhaseScheduler::new();

        let outcome = scheduler.tick(&engine, &state, Side::Host, 0);
        assert_eq!(outcome.decline(), Some(&Decline::AwaitingPlayer(TurnPhase::Main)));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_end_effect_stages() {
        let config = RulesConfig::default();
        let mut state = Match::new(MatchId(9), 1, &config);
        state.phase = TurnPhase::EndEffect;

        let first = Checkpoint::of(&state);
        assert_eq!(first.delay_ms(&config), Some(0));

        state.turn_end_resolved = true;
        let second = Checkpoint::of(&state);
        assert_ne!(first, second);
        assert_eq!(second.delay_ms(&config), Some(600));
    }

    #[test]
    fn test_mulligan_waits_for_both_sides() {
        let engine = engine();
        let mut state = in_mulligan(&engine);
        let mut scheduler = PhaseScheduler::new();

        let waiting = scheduler.tick(&engine, &state, Side::Host, 0);
        assert_eq!(waiting.decline(), Some(&Decline::NotDue { remaining_ms: 30_000 }));

        assert!(engine.submit_mulligan(&state, Side::Host, &[]).commit(&mut state));
        let one_in = scheduler.tick(&engine, &state, Side::Host, 900);
        assert_eq!(one_in.decline(), Some(&Decline::NotDue { remaining_ms: 29_100 }));
        assert_eq!(state.phase, TurnPhase::Mulligan);

        assert!(engine.submit_mulligan(&state, Side::Guest, &[]).commit(&mut state));
        let done = scheduler.tick(&engine, &state, Side::Host, 1_000);
        assert!(done.commit(&mut state));

        assert_eq!(state.phase, TurnPhase::StartEffect);
        assert_eq!(state.turn, 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_mulligan_forced_on_timeout() {
        let engine = engine();
        let mut state = in_mulligan(&engine);
        let mut scheduler = PhaseScheduler::new();

        scheduler.tick(&engine, &state, Side::Host, 0);
        let early = scheduler.tick(&engine, &state, Side::Host, 29_999);
        assert_eq!(early.decline(), Some(&Decline::NotDue { remaining_ms: 1 }));

        let forced = scheduler.tick(&engine, &state, Side::Host, 30_000);
        assert!(forced.commit(&mut state));

        assert!(state.sides.iter().all(|(_, s)| s.mulligan_done));
        assert_eq!(state.phase, TurnPhase::StartEffect);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_forget() {
        let engine = engine();
        let state = Match::new(MatchId(4), 1, engine.config());
        let mut scheduler = PhaseScheduler::new();
        scheduler.tick(&engine, &state, Side::Host, 0);

        scheduler.forget(MatchId(4));

        assert_eq!(scheduler.pending(), 0);
    }
}
