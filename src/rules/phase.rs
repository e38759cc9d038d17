//! System-driven phase transitions.
//!
//! ## Phase order
//!
//! `coin_toss` → `mulligan` → `start_effect` → `strategy` → `draw_phase` →
//! `main` → `end_effect` → `switching` → `start_effect` …
//!
//! `strategy` and `main` wait for the turn owner. Every other phase is
//! advanced by its authoritative side: the host before the first turn, the
//! turn owner afterwards. `end_effect` runs in two stages: turn-end effects
//! first, then, after the settle delay, the death sweep and cleanup.
//!
//! Every transition checks the win condition before moving on; a finished
//! match stays in the phase it ended in.

use tracing::info;

use crate::cards::Status;
use crate::core::{Match, MatchStatus, Side, TurnPhase};
use crate::effects::{EffectReport, EffectResolver};
use crate::lifecycle::{check_victory, deal_opening_hands, draw_cards, exchange, grant_bonus_card};
use crate::triggers::{fire_board, sweep_deaths, TriggerKind};

use super::outcome::Decline;

/// The side allowed to advance the current phase.
#[must_use]
pub fn authority(state: &Match) -> Side {
    if state.phase.is_pre_game() {
        Side::Host
    } else {
        state.turn_owner
    }
}

/// Move to `phase`, setting the lock to match.
pub(crate) fn enter(state: &mut Match, phase: TurnPhase) {
    state.phase = phase;
    state.phase_lock = phase.is_locked();
    info!(match_id = %state.id, turn = state.turn, owner = %state.turn_owner, %phase, "phase");
}

fn enter_unless_finished(state: &mut Match, phase: TurnPhase) {
    if !check_victory(state) && !state.is_finished() {
        enter(state, phase);
    }
}

/// Run the transition due in the current phase.
pub fn advance(resolver: &EffectResolver<'_>, state: &mut Match, side: Side) -> Result<EffectReport, Decline> {
    if state.is_finished() {
        return Err(Decline::MatchFinished);
    }
    if side != authority(state) {
        return Err(Decline::NotAuthoritative);
    }

    match state.phase {
        TurnPhase::CoinToss => Ok(coin_toss(resolver, state)),
        TurnPhase::Mulligan => Ok(finish_mulligan(resolver, state)),
        TurnPhase::StartEffect => Ok(start_effect(resolver, state)),
        TurnPhase::Strategy | TurnPhase::Main => Err(Decline::AwaitingPlayer(state.phase)),
        TurnPhase::DrawPhase => Ok(draw_phase(resolver, state)),
        TurnPhase::EndEffect if !state.turn_end_resolved => Ok(turn_end_effects(resolver, state)),
        TurnPhase::EndEffect => Ok(settle_turn_end(resolver, state)),
        TurnPhase::Switching => Ok(switch_turn(state)),
    }
}

fn coin_toss(resolver: &EffectResolver<'_>, state: &mut Match) -> EffectReport {
    let first = if state.rng.gen_bool(0.5) { Side::Host } else { Side::Guest };
    state.first_player = Some(first);
    state.turn_owner = first;
    state.status = MatchStatus::InProgress;

    let mut report = EffectReport::default();
    report.note(format!("{} wins the coin toss and goes first", first));
    report.merge(deal_opening_hands(resolver, state, first));
    enter(state, TurnPhase::Mulligan);
    report
}

/// Force any pending mulligan, hand out the bonus card and start turn 1.
fn finish_mulligan(resolver: &EffectResolver<'_>, state: &mut Match) -> EffectReport {
    let mut report = EffectReport::default();
    for side in Side::BOTH {
        if !state.sides[side].mulligan_done {
            let marked = std::mem::take(&mut state.sides[side].mulligan_marked);
            report.note(format!("{}'s mulligan timer runs out", side));
            report.merge(exchange(resolver, state, side, &marked));
        }
    }

    let first = state.first_player.unwrap_or(Side::Host);
    report.merge(grant_bonus_card(resolver, state, first.opponent()));
    state.turn = 1;
    state.turn_owner = first;
    enter(state, TurnPhase::StartEffect);
    report
}

fn start_effect(resolver: &EffectResolver<'_>, state: &mut Match) -> EffectReport {
    let owner = state.turn_owner;
    let mut report = EffectReport::default();

    let board = &mut state.sides[owner].board;
    for unit in board.iter_mut() {
        if unit.is_building() {
            unit.durability = unit.durability.map(|d| d.saturating_sub(1));
        } else {
            unit.remove_status(Status::Frozen);
            unit.ready();
        }
    }
    let expired = board.drain_where(|u| u.is_building() && u.durability == Some(0));
    for building in expired {
        report.note(format!("{} crumbles", building.name));
        let _ = state.sides[owner].graveyard.push(building);
    }

    report.merge(fire_board(resolver, state, owner, TriggerKind::TurnStart, 0));
    report.merge(sweep_deaths(resolver, state, owner, 0));
    enter_unless_finished(state, TurnPhase::Strategy);
    report
}

fn draw_phase(resolver: &EffectResolver<'_>, state: &mut Match) -> EffectReport {
    let owner = state.turn_owner;
    let outcome = draw_cards(resolver, state, owner, 1, 0);
    let removed = outcome.removed();
    let mut report = outcome.report;
    if removed == 0 {
        report.note(format!("{}'s deck is empty", owner));
    }
    enter_unless_finished(state, TurnPhase::Main);
    report
}

fn turn_end_effects(resolver: &EffectResolver<'_>, state: &mut Match) -> EffectReport {
    let owner = state.turn_owner;
    let report = fire_board(resolver, state, owner, TriggerKind::TurnEnd, 0);
    state.turn_end_resolved = true;
    check_victory(state);
    report
}

fn settle_turn_end(resolver: &EffectResolver<'_>, state: &mut Match) -> EffectReport {
    let owner = state.turn_owner;
    let report = sweep_deaths(resolver, state, owner, 0);
    for unit in state.sides[owner].board.iter_mut() {
        if !unit.is_building() {
            unit.can_attack = true;
        }
    }
    enter_unless_finished(state, TurnPhase::Switching);
    report
}

fn switch_turn(state: &mut Match) -> EffectReport {
    let previous = state.turn_owner;
    state.turn_owner = previous.opponent();
    state.turn += 1;
    state.turn_end_resolved = false;

    let mut report = EffectReport::default();
    report.note(format!("turn {} passes to {}", state.turn, state.turn_owner));
    enter(state, TurnPhase::StartEffect);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCatalog, CardDefinition, CardId, UnitInstance};
    use crate::core::{InstanceId, MatchId, RulesConfig};
    use crate::effects::Effect;

    fn in_phase(phase: TurnPhase) -> Match {
        let mut state = Match::new(MatchId(3), 8, &RulesConfig::default());
        state.status = MatchStatus::InProgress;
        state.first_player = Some(Side::Host);
        state.turn = 1;
        state.phase = phase;
        state.phase_lock = phase.is_locked();
        state
    }

    fn place(state: &mut Match, side: Side, def: &CardDefinition) -> InstanceId {
        let id = state.alloc_instance();
        state.sides[side].board.push(UnitInstance::from_definition(def, id, side)).unwrap();
        id
    }

    #[test]
    fn test_authority() {
        let mut state = in_phase(TurnPhase::CoinToss);
        state.turn_owner = Side::Guest;
        assert_eq!(authority(&state), Side::Host);

        state.phase = TurnPhase::EndEffect;
        assert_eq!(authority(&state), Side::Guest);
    }

    #[test]
    fn test_non_authority_declined() {
        let catalog = CardCatalog::standard();
        let config = RulesConfig::default();
        let resolver = EffectResolver::new(&catalog, &config);
        let mut state = in_phase(TurnPhase::StartEffect);

        assert_eq!(advance(&resolver, &mut state, Side::Guest).unwrap_err(), Decline::NotAuthoritative);
        assert_eq!(state.phase, TurnPhase::StartEffect);
    }

    #[test]
    fn test_player_phases_wait() {
        let catalog = CardCatalog::standard();
        let config = RulesConfig::default();
        let resolver = EffectResolver::new(&catalog, &config);
        let mut state = in_phase(TurnPhase::Main);

        assert_eq!(
            advance(&resolver, &mut state, Side::Host).unwrap_err(),
            Decline::AwaitingPlayer(TurnPhase::Main)
        );
    }

    #[test]
    fn test_start_effect_decay_and_thaw() {
        let catalog = CardCatalog::standard();
        let config = RulesConfig::default();
        let resolver = EffectResolver::new(&catalog, &config);
        let mut state = in_phase(TurnPhase::StartEffect);

        let shack = place(&mut state, Side::Host, &CardDefinition::building(CardId::new(2), "Shack", 1, 3, 1));
        let grunt = CardDefinition::unit(CardId::new(1), "Grunt", 1, 1, 1);
        let ready = place(&mut state, Side::Host, &grunt);
        let frozen = place(&mut state, Side::Host, &grunt);
        if let Some(unit) = state.find_unit_mut(frozen) {
            unit.add_status(Status::Frozen);
        }

        advance(&resolver, &mut state, Side::Host).unwrap();

        assert!(state.find_unit(shack).is_none());
        assert_eq!(state.sides[Side::Host].graveyard.len(), 1);
        assert!(state.find_unit(ready).unwrap().can_attack);
        let thawed = state.find_unit(frozen).unwrap();
        assert!(!thawed.is_frozen());
        assert!(thawed.can_attack);
        assert_eq!(state.phase, TurnPhase::Strategy);
        assert!(!state.phase_lock);
    }

    #[test]
    fn test_turn_start_trigger() {
        let catalog = CardCatalog::standard();
        let config = RulesConfig::default();
        let resolver = EffectResolver::new(&catalog, &config);
        let mut state = in_phase(TurnPhase::StartEffect);
        let tower = CardDefinition::building(CardId::new(17), "Watchtower", 2, 5, 3).with_trigger(
            TriggerKind::TurnStart,
            Effect::Damage { target: crate::effects::TargetMode::EnemyFace, value: 1 },
        );
        place(&mut state, Side::Host, &tower);

        advance(&resolver, &mut state, Side::Host).unwrap();

        assert_eq!(state.sides[Side::Guest].health, 29);
    }

    #[test]
    fn test_end_effect_two_stages() {
        let catalog = CardCatalog::standard();
        let config = RulesConfig::default();
        let resolver = EffectResolver::new(&catalog, &config);
        let mut state = in_phase(TurnPhase::EndEffect);
        let bomber = CardDefinition::unit(CardId::new(13), "Bomber", 3, 2, 5)
            .with_trigger(TriggerKind::TurnEnd, Effect::DamageAllEnemy { value: 3 });
        let victim = place(&mut state, Side::Guest, &CardDefinition::unit(CardId::new(1), "Grunt", 1, 1, 2));
        place(&mut state, Side::Host, &bomber);

        advance(&resolver, &mut state, Side::Host).unwrap();
        assert!(state.turn_end_resolved);
        assert_eq!(state.phase, TurnPhase::EndEffect);
        assert!(state.find_unit(victim).is_some());

        advance(&resolver, &mut state, Side::Host).unwrap();
        assert!(state.find_unit(victim).is_none());
        assert_eq!(state.phase, TurnPhase::Switching);

        advance(&resolver, &mut state, Side::Host).unwrap();
        assert_eq!(state.turn_owner, Side::Guest);
        assert_eq!(state.turn, 2);
        assert_eq!(state.phase, TurnPhase::StartEffect);
        assert!(!state.turn_end_resolved);
    }

    #[test]
    fn test_frozen_unit_thaws_on_owner_turn() {
        let catalog = CardCatalog::standard();
        let config = RulesConfig::default();
        let resolver = EffectResolver::new(&catalog, &config);
        let mut state = in_phase(TurnPhase::EndEffect);
        let grunt = CardDefinition::unit(CardId::new(1), "Grunt", 1, 2, 2);
        let frozen = place(&mut state, Side::Guest, &grunt);
        if let Some(unit) = state.find_unit_mut(frozen) {
            unit.ready();
            unit.add_status(Status::Frozen);
        }

        for _ in 0..3 {
            advance(&resolver, &mut state, Side::Host).unwrap();
        }
        assert!(state.find_unit(frozen).unwrap().is_frozen());

        advance(&resolver, &mut state, Side::Guest).unwrap();
        let thawed = state.find_unit(frozen).unwrap();
        assert!(!thawed.is_frozen());
        assert!(thawed.can_attack);
        assert_eq!(thawed.attacks_this_turn, 0);
    }

    #[test]
    fn test_settle_readies_owner_units() {
        let catalog = CardCatalog::standard();
        let config = RulesConfig::default();
        let resolver = EffectResolver::new(&catalog, &config);
        let mut state = in_phase(TurnPhase::EndEffect);
        state.turn_end_resolved = true;
        let grunt = CardDefinition::unit(CardId::new(1), "Grunt", 1, 1, 1);
        let fresh = place(&mut state, Side::Host, &grunt);
        let chilled = place(&mut state, Side::Host, &grunt);
        if let Some(unit) = state.find_unit_mut(chilled) {
            unit.add_status(Status::Frozen);
        }

        advance(&resolver, &mut state, Side::Host).unwrap();

        assert!(state.find_unit(fresh).unwrap().can_attack);
        assert!(state.find_unit(chilled).unwrap().can_attack);
        assert_eq!(state.phase, TurnPhase::Switching);
    }

    #[test]
    fn test_draw_phase_with_empty_deck() {
        let catalog = CardCatalog::standard();
        let config = RulesConfig::default();
        let resolver = EffectResolver::new(&catalog, &config);
        let mut state = in_phase(TurnPhase::DrawPhase);

        let report = advance(&resolver, &mut state, Side::Host).unwrap();

        assert!(state.sides[Side::Host].hand.is_empty());
        assert!(report.lines.iter().any(|l| l.contains("deck is empty")));
        assert_eq!(state.phase, TurnPhase::Main);
    }

    #[test]
    fn test_draw_phase_draws_one() {
        let catalog = CardCatalog::standard();
        let config = RulesConfig::default();
        let resolver = EffectResolver::new(&catalog, &config);
        let mut state = in_phase(TurnPhase::DrawPhase);
        for _ in 0..2 {
            let id = state.alloc_instance();
            let card = crate::cards::CardInstance::new(id, CardDefinition::unit(CardId::new(1), "Grunt", 1, 1, 1));
            state.sides[Side::Host].deck.push(card).unwrap();
        }

        advance(&resolver, &mut state, Side::Host).unwrap();

        assert_eq!(state.sides[Side::Host].hand.len(), 1);
        assert_eq!(state.sides[Side::Host].deck.len(), 1);
        assert_eq!(state.phase, TurnPhase::Main);
    }

    #[test]
    fn test_coin_toss_and_forced_mulligan() {
        let catalog = CardCatalog::standard();
        let config = RulesConfig::default();
        let resolver = EffectResolver::new(&catalog, &config);
        let deck: Vec<CardId> = (1..=15).flat_map(|n| [CardId::new(n); 2]).collect();
        let mut state = crate::lifecycle::MatchBuilder::new(&catalog, &config)
            .with_deck(Side::Host, deck.clone())
            .with_deck(Side::Guest, deck)
            .build()
            .unwrap();

        advance(&resolver, &mut state, Side::Host).unwrap();
        let first = state.first_player.unwrap();
        assert_eq!(state.phase, TurnPhase::Mulligan);
        assert_eq!(state.sides[first].hand.len(), 3);
        assert_eq!(state.sides[first.opponent()].hand.len(), 4);

        advance(&resolver, &mut state, Side::Host).unwrap();
        assert!(state.sides[Side::Host].mulligan_done && state.sides[Side::Guest].mulligan_done);
        assert_eq!(state.sides[first.opponent()].hand.len(), 5);
        assert_eq!(state.turn, 1);
        assert_eq!(state.turn_owner, first);
        assert_eq!(state.phase, TurnPhase::StartEffect);
    }
}
