//! Player actions on a working copy.
//!
//! Each function validates first and returns a [`Decline`] before touching
//! the match. The engine clones the shared document, runs one of these on
//! the clone and turns the result into an [`Outcome`](super::Outcome).

use tracing::info;

use crate::cards::UnitInstance;
use crate::core::{InstanceId, Match, MatchStatus, Side, Strategy, TurnPhase};
use crate::effects::{EffectContext, EffectReport, EffectResolver};
use crate::lifecycle::{check_victory, draw_cards, exchange, mark_cards};
use crate::triggers::{sweep_deaths, TriggerKind};

use super::outcome::Decline;
use super::phase::enter;

/// Check that `side` may act in `phase` right now.
pub fn require_turn(state: &Match, side: Side, phase: TurnPhase) -> Result<(), Decline> {
    if state.is_finished() {
        return Err(Decline::MatchFinished);
    }
    if state.phase_lock {
        return Err(Decline::PhaseLocked(state.phase));
    }
    if state.phase != phase {
        return Err(Decline::WrongPhase {
            expected: phase,
            actual: state.phase,
        });
    }
    if state.turn_owner != side {
        return Err(Decline::NotTurnOwner);
    }
    Ok(())
}

/// Check that a card can be played, ignoring its target.
pub fn validate_play(state: &Match, side: Side, card: InstanceId) -> Result<(), Decline> {
    require_turn(state, side, TurnPhase::Main)?;

    let side_state = &state.sides[side];
    let instance = side_state.hand.find(card).ok_or(Decline::CardNotInHand(card))?;
    let cost = instance.cost().max(0);
    if cost > side_state.mana {
        return Err(Decline::InsufficientMana {
            cost,
            available: side_state.mana,
        });
    }
    if instance.card.occupies_board() && side_state.board.is_full() {
        return Err(Decline::BoardFull);
    }
    Ok(())
}

/// Play a card from hand.
///
/// Mana is spent and the card leaves the hand before its on-play effect
/// runs, so an effect that is declined still costs the card.
pub fn play_card(
    resolver: &EffectResolver<'_>,
    state: &mut Match,
    side: Side,
    card: InstanceId,
    target: Option<InstanceId>,
) -> Result<EffectReport, Decline> {
    validate_play(state, side, card)?;

    let instance = state.sides[side].hand.remove(card).ok_or(Decline::CardNotInHand(card))?;
    state.sides[side].mana -= instance.cost().max(0);
    let def = instance.card;

    let mut report = EffectReport::default();
    report.note(format!("{} plays {}", side, def.name));

    let mut ctx = EffectContext::new(side).with_target(target);
    if def.occupies_board() {
        let unit = UnitInstance::from_definition(&def, card, side);
        state.sides[side].board.push(unit).map_err(|_| Decline::BoardFull)?;
        ctx = ctx.with_source(card);
    }

    if let Some(spec) = def.triggers.get(TriggerKind::OnPlay) {
        report.merge(resolver.resolve(spec, &ctx, state));
    }
    report.merge(sweep_deaths(resolver, state, side, 0));
    check_victory(state);
    Ok(report)
}

/// Apply the strategy choice and move to the draw phase.
pub fn choose_strategy(
    resolver: &EffectResolver<'_>,
    state: &mut Match,
    side: Side,
    choice: Strategy,
) -> Result<EffectReport, Decline> {
    require_turn(state, side, TurnPhase::Strategy)?;

    let mut report = EffectReport::default();
    match choice {
        Strategy::Mana => {
            let cap = resolver.config().mana_cap;
            let side_state = &mut state.sides[side];
            side_state.max_mana = (side_state.max_mana + 1).min(cap);
            report.note(format!("{} grows to {} mana", side, side_state.max_mana));
        }
        Strategy::Draw => {
            report.note(format!("{} takes an extra card", side));
            report.merge(draw_cards(resolver, state, side, 1, 0).report);
        }
    }
    let side_state = &mut state.sides[side];
    side_state.mana = side_state.max_mana;

    if !check_victory(state) {
        enter(state, TurnPhase::DrawPhase);
    }
    Ok(report)
}

/// End the main phase.
pub fn end_turn(state: &mut Match, side: Side) -> Result<EffectReport, Decline> {
    require_turn(state, side, TurnPhase::Main)?;

    state.turn_end_resolved = false;
    enter(state, TurnPhase::EndEffect);

    let mut report = EffectReport::default();
    report.note(format!("{} ends turn {}", side, state.turn));
    Ok(report)
}

/// Concede. Valid in any phase and under the phase lock.
pub fn surrender(state: &mut Match, side: Side) -> Result<EffectReport, Decline> {
    if state.is_finished() {
        return Err(Decline::MatchFinished);
    }

    let winner = side.opponent();
    state.status = MatchStatus::Finished;
    state.winner = Some(winner);
    state.phase_lock = true;
    info!(match_id = %state.id, %side, %winner, "surrender");

    let mut report = EffectReport::default();
    report.note(format!("{} surrenders; {} wins", side, winner));
    Ok(report)
}

/// Check that a mulligan selection can be submitted or marked.
pub fn validate_mulligan(state: &Match, side: Side, cards: &[InstanceId]) -> Result<(), Decline> {
    if state.is_finished() {
        return Err(Decline::MatchFinished);
    }
    if state.phase != TurnPhase::Mulligan {
        return Err(Decline::WrongPhase {
            expected: TurnPhase::Mulligan,
            actual: state.phase,
        });
    }
    if state.sides[side].mulligan_done {
        return Err(Decline::MulliganAlreadySubmitted);
    }
    if let Some(&missing) = cards.iter().find(|id| !state.sides[side].hand.contains(**id)) {
        return Err(Decline::CardNotInHand(missing));
    }
    Ok(())
}

/// Exchange the selected cards.
pub fn submit_mulligan(
    resolver: &EffectResolver<'_>,
    state: &mut Match,
    side: Side,
    cards: &[InstanceId],
) -> Result<EffectReport, Decline> {
    validate_mulligan(state, side, cards)?;

    let mut unique: Vec<InstanceId> = Vec::with_capacity(cards.len());
    for &id in cards {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    Ok(exchange(resolver, state, side, &unique))
}

/// Record the private selection without submitting it.
pub fn mark_mulligan(state: &mut Match, side: Side, cards: &[InstanceId]) -> Result<EffectReport, Decline> {
    validate_mulligan(state, side, cards)?;
    mark_cards(state, side, cards);

    let mut report = EffectReport::default();
    report.note(format!("{} marks {} card(s)", side, state.sides[side].mulligan_marked.len()));
    Ok(report)
}
