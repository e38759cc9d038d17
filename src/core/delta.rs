//! State deltas.
//!
//! A `MatchDelta` carries only the parts of the document an operation
//! changed. The engine computes it by diffing the committed document against
//! the working copy; the caller merges it into its copy of the shared
//! document with [`MatchDelta::apply`].
//!
//! Granularity is one side or one top-level field: a side that changed in
//! any way is carried whole. Sides share structure with the original through
//! `im`, so this stays cheap.

use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::rng::GameRngState;
use super::side::{Side, SideMap};
use super::state::{Match, MatchStatus, SideState, TurnPhase};

/// The changed parts of a match document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchDelta {
    pub sides: SideMap<Option<SideState>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_player: Option<Option<Side>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_owner: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<TurnPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase_lock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MatchStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Option<Side>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_end_resolved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_instance: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rng: Option<GameRngState>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub appended_history: Vec<ActionRecord>,
}

fn changed<T: PartialEq + Clone>(before: &T, after: &T) -> Option<T> {
    (before != after).then(|| after.clone())
}

impl MatchDelta {
    /// Diff two versions of the same match.
    #[must_use]
    pub fn between(before: &Match, after: &Match) -> Self {
        Self {
            sides: SideMap::new(|s| changed(&before.sides[s], &after.sides[s])),
            first_player: changed(&before.first_player, &after.first_player),
            turn_owner: changed(&before.turn_owner, &after.turn_owner),
            turn: changed(&before.turn, &after.turn),
            phase: changed(&before.phase, &after.phase),
            phase_lock: changed(&before.phase_lock, &after.phase_lock),
            status: changed(&before.status, &after.status),
            winner: changed(&before.winner, &after.winner),
            turn_end_resolved: changed(&before.turn_end_resolved, &after.turn_end_resolved),
            next_instance: changed(&before.peek_instance().raw(), &after.peek_instance().raw()),
            rng: changed(&before.rng.state(), &after.rng.state()),
            appended_history: after.history.iter().skip(before.history.len()).cloned().collect(),
        }
    }

    /// Check if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Sides carried by this delta.
    pub fn touched_sides(&self) -> impl Iterator<Item = Side> + '_ {
        self.sides.iter().filter(|(_, s)| s.is_some()).map(|(side, _)| side)
    }

    /// Merge into a document.
    pub fn apply(&self, state: &mut Match) {
        for side in Side::BOTH {
            if let Some(updated) = &self.sides[side] {
                state.sides[side] = updated.clone();
            }
        }
        if let Some(first) = self.first_player {
            state.first_player = first;
        }
        if let Some(owner) = self.turn_owner {
            state.turn_owner = owner;
        }
        if let Some(turn) = self.turn {
            state.turn = turn;
        }
        if let Some(phase) = self.phase {
            state.phase = phase;
        }
        if let Some(lock) = self.phase_lock {
            state.phase_lock = lock;
        }
        if let Some(status) = self.status {
            state.status = status;
        }
        if let Some(winner) = self.winner {
            state.winner = winner;
        }
        if let Some(resolved) = self.turn_end_resolved {
            state.turn_end_resolved = resolved;
        }
        if let Some(next) = self.next_instance {
            state.set_next_instance(next);
        }
        if let Some(rng) = &self.rng {
            state.rng = rng.clone().into();
        }
        state.history.extend(self.appended_history.iter().cloned());
    }
}
