//! Full-match playouts.
//!
//! Two scripted players play complete matches while a `PhaseScheduler`
//! drives every system transition. Invariants are checked after each
//! committed step.

use duel_ccg::cards::CardId;
use duel_ccg::core::{AttackTarget, Match, MatchId, PlayerAction, RulesConfig, Side, Strategy, TurnPhase};
use duel_ccg::rules::{authority, DuelEngine, PhaseScheduler, RulesEngine};
use duel_ccg::CardCatalog;

const STEP_LIMIT: usize = 5_000;

// No healing cards, so health only ever goes down and every match ends.
const HOST_POOL: [u32; 15] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 15, 16, 19];
const GUEST_POOL: [u32; 15] = [2, 5, 6, 7, 8, 10, 11, 12, 17, 18, 19, 20, 21, 22, 23];

fn deck(pool: &[u32]) -> Vec<CardId> {
    pool.iter().flat_map(|&n| [CardId::new(n); 2]).collect()
}

/// Aggressive script: attack face, else attack anything, else play, else end.
fn pick(engine: &DuelEngine, state: &Match, side: Side) -> Option<PlayerAction> {
    if state.phase == TurnPhase::Strategy {
        let choice = if state.sides[side].max_mana < engine.config().mana_cap {
            Strategy::Mana
        } else {
            Strategy::Draw
        };
        return Some(PlayerAction::ChooseStrategy { choice });
    }
    let legal = engine.legal_actions(state, side);
    let face = legal
        .iter()
        .find(|a| matches!(a, PlayerAction::Attack { target: AttackTarget::Face, .. }));
    let any_attack = legal.iter().find(|a| matches!(a, PlayerAction::Attack { .. }));
    let play = legal.iter().find(|a| matches!(a, PlayerAction::PlayCard { .. }));
    face.or(any_attack).or(play).or(legal.last()).cloned()
}

fn check_invariants(state: &Match, config: &RulesConfig) {
    for (side, side_state) in state.sides.iter() {
        assert!(side_state.hand.len() <= config.hand_capacity, "{} hand overflow", side);
        assert!(side_state.board.len() <= config.board_capacity, "{} board overflow", side);
        // Bonus mana may lift current mana past the cap for one turn.
        assert!(side_state.mana <= config.mana_cap + 1);
        assert!(side_state.max_mana <= config.mana_cap);
        for unit in side_state.board.iter() {
            assert!(unit.health <= unit.max_health, "{} over max health", unit.name);
            assert_eq!(unit.owner, side);
            if unit.is_building() {
                assert!(!unit.can_attack);
            }
        }
    }
}

fn play_out(seed: u64) -> Match {
    let config = RulesConfig::default().without_delays();
    let engine = DuelEngine::new(CardCatalog::standard(), config.clone());
    let mut state = engine
        .builder()
        .with_id(MatchId(seed))
        .with_seed(seed)
        .with_deck(Side::Host, deck(&HOST_POOL))
        .with_deck(Side::Guest, deck(&GUEST_POOL))
        .build()
        .unwrap();
    let mut scheduler = PhaseScheduler::new();

    for step in 0..STEP_LIMIT {
        if state.is_finished() {
            break;
        }
        let outcome = match state.phase {
            TurnPhase::Strategy | TurnPhase::Main => {
                let owner = state.turn_owner;
                let action = pick(&engine, &state, owner).unwrap();
                engine.apply_action(&state, owner, &action)
            }
            _ => scheduler.tick(&engine, &state, authority(&state), step as u64),
        };
        assert!(outcome.commit(&mut state), "stalled at {:?}: {:?}", state.phase, outcome.decline());
        check_invariants(&state, &config);
    }
    state
}

#[test]
fn test_playout_finishes() {
    for seed in [1, 7, 42] {
        let state = play_out(seed);
        assert!(state.is_finished(), "seed {} did not finish", seed);
        assert!(state.sides.iter().any(|(_, s)| s.health <= 0));
        if let Some(winner) = state.winner {
            assert!(state.sides[winner].health > 0);
        }
    }
}

#[test]
fn test_playout_is_deterministic() {
    let a = play_out(99);
    let b = play_out(99);

    assert_eq!(a, b);
    assert_eq!(a.history.len(), b.history.len());
}

#[test]
fn test_history_is_sequenced() {
    let state = play_out(3);

    for (i, record) in state.history.iter().enumerate() {
        assert_eq!(record.sequence as usize, i);
        assert_ne!(record.action.name(), "mark_mulligan");
    }
}
