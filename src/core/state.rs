//! The shared match document.
//!
//! ## SideState
//!
//! Per-side resources and zones:
//! - Health, current and maximum mana
//! - Hand, deck, board, graveyard
//! - Mulligan progress and the private mulligan selection
//!
//! ## Match
//!
//! Both sides plus turn bookkeeping:
//! - Turn owner, turn counter, phase, phase lock
//! - Status and winner
//! - Instance-id allocator and RNG
//! - Action history
//!
//! Every field uses `im` persistent structures (through `Zone`), so the
//! engine can clone the whole document as a working copy in O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::config::RulesConfig;
use super::entity::{InstanceId, MatchId};
use super::rng::GameRng;
use super::side::{Side, SideMap};
use crate::cards::{CardInstance, UnitInstance};
use crate::error::DataError;
use crate::zones::Zone;

/// Overall match status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Decks are set; the coin toss has not happened.
    #[default]
    Waiting,
    InProgress,
    Finished,
}

/// Turn phases, in order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    #[default]
    CoinToss,
    Mulligan,
    StartEffect,
    Strategy,
    DrawPhase,
    Main,
    EndEffect,
    Switching,
}

impl TurnPhase {
    /// Whether player actions are locked out during this phase.
    #[must_use]
    pub fn is_locked(self) -> bool {
        matches!(
            self,
            TurnPhase::CoinToss | TurnPhase::StartEffect | TurnPhase::EndEffect | TurnPhase::Switching
        )
    }

    /// Whether this phase precedes the first turn.
    #[must_use]
    pub fn is_pre_game(self) -> bool {
        matches!(self, TurnPhase::CoinToss | TurnPhase::Mulligan)
    }

    /// Position in the phase order.
    #[must_use]
    pub fn order(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TurnPhase::CoinToss => "coin_toss",
            TurnPhase::Mulligan => "mulligan",
            TurnPhase::StartEffect => "start_effect",
            TurnPhase::Strategy => "strategy",
            TurnPhase::DrawPhase => "draw_phase",
            TurnPhase::Main => "main",
            TurnPhase::EndEffect => "end_effect",
            TurnPhase::Switching => "switching",
        };
        f.write_str(name)
    }
}

/// One side's resources and zones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SideState {
    pub health: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub hand: Zone<CardInstance>,
    pub deck: Zone<CardInstance>,
    pub board: Zone<UnitInstance>,
    pub graveyard: Zone<UnitInstance>,
    pub mulligan_done: bool,

    /// Current private mulligan selection, forced on timeout.
    #[serde(default)]
    pub mulligan_marked: Vec<InstanceId>,
}

impl SideState {
    /// A fresh side with empty zones.
    #[must_use]
    pub fn new(config: &RulesConfig) -> Self {
        Self {
            health: config.starting_health,
            mana: 0,
            max_mana: 0,
            hand: Zone::bounded(config.hand_capacity),
            deck: Zone::unbounded(),
            board: Zone::bounded(config.board_capacity),
            graveyard: Zone::unbounded(),
            mulligan_done: false,
            mulligan_marked: Vec::new(),
        }
    }

    /// Find a unit on this side's board.
    #[must_use]
    pub fn unit(&self, id: InstanceId) -> Option<&UnitInstance> {
        self.board.find(id)
    }

    /// Find a unit on this side's board mutably.
    pub fn unit_mut(&mut self, id: InstanceId) -> Option<&mut UnitInstance> {
        self.board.find_mut(id)
    }

    /// Check if any living taunt unit restricts enemy attacks.
    #[must_use]
    pub fn has_taunt(&self) -> bool {
        self.board.iter().any(UnitInstance::enforces_taunt)
    }
}

/// The shared match document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub sides: SideMap<SideState>,

    /// Side that takes the first turn, decided by the coin toss.
    pub first_player: Option<Side>,

    /// Side currently permitted to act.
    pub turn_owner: Side,

    /// Turn counter; 0 until the mulligan completes.
    pub turn: u32,

    pub phase: TurnPhase,
    pub phase_lock: bool,
    pub status: MatchStatus,

    /// Winner once finished; `None` with `Finished` is a draw.
    pub winner: Option<Side>,

    /// End-effect sub-step marker: turn-end triggers have fired and the
    /// settle delay is running.
    pub turn_end_resolved: bool,

    next_instance: u32,
    pub rng: GameRng,

    #[serde(default)]
    pub history: Vector<ActionRecord>,
}

impl Match {
    /// Create a match waiting for its coin toss.
    #[must_use]
    pub fn new(id: MatchId, seed: u64, config: &RulesConfig) -> Self {
        Self {
            id,
            sides: SideMap::new(|_| SideState::new(config)),
            first_player: None,
            turn_owner: Side::Host,
            turn: 0,
            phase: TurnPhase::CoinToss,
            phase_lock: true,
            status: MatchStatus::Waiting,
            winner: None,
            turn_end_resolved: false,
            next_instance: 1,
            rng: GameRng::new(seed),
            history: Vector::new(),
        }
    }

    /// Allocate a fresh instance id.
    pub fn alloc_instance(&mut self) -> InstanceId {
        let id = InstanceId(self.next_instance);
        self.next_instance += 1;
        id
    }

    /// The next id `alloc_instance` would return.
    #[must_use]
    pub fn peek_instance(&self) -> InstanceId {
        InstanceId(self.next_instance)
    }

    pub(crate) fn set_next_instance(&mut self, next: u32) {
        self.next_instance = next;
    }

    /// Side state accessor.
    #[must_use]
    pub fn side(&self, side: Side) -> &SideState {
        &self.sides[side]
    }

    /// Side state accessor (mutable).
    pub fn side_mut(&mut self, side: Side) -> &mut SideState {
        &mut self.sides[side]
    }

    /// Check if the match has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// Which board holds a unit.
    #[must_use]
    pub fn locate_unit(&self, id: InstanceId) -> Option<Side> {
        Side::BOTH.into_iter().find(|s| self.sides[*s].board.contains(id))
    }

    /// Find a unit on either board.
    #[must_use]
    pub fn find_unit(&self, id: InstanceId) -> Option<&UnitInstance> {
        Side::BOTH.into_iter().find_map(|s| self.sides[s].board.find(id))
    }

    /// Find a unit on either board mutably.
    pub fn find_unit_mut(&mut self, id: InstanceId) -> Option<&mut UnitInstance> {
        let side = self.locate_unit(id)?;
        self.sides[side].board.find_mut(id)
    }

    /// Append to the action history.
    pub fn record(&mut self, side: Side, action: super::action::PlayerAction) {
        let sequence = self.history.len() as u32;
        self.history.push_back(ActionRecord::new(side, action, self.turn, sequence));
    }

    /// Serialize a snapshot of the document.
    pub fn to_json(&self) -> Result<String, DataError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a snapshot of the document.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId};

    #[test]
    fn test_new_match() {
        let config = RulesConfig::default();
        let state = Match::new(MatchId(1), 42, &config);

        assert_eq!(state.status, MatchStatus::Waiting);
        assert_eq!(state.phase, TurnPhase::CoinToss);
        assert!(state.phase_lock);
        assert_eq!(state.turn, 0);
        for (_, side) in state.sides.iter() {
            assert_eq!(side.health, 30);
            assert_eq!((side.mana, side.max_mana), (0, 0));
            assert_eq!(side.hand.capacity(), Some(10));
            assert_eq!(side.board.capacity(), Some(7));
        }
    }

    #[test]
    fn test_alloc_instance_unique() {
        let mut state = Match::new(MatchId(1), 42, &RulesConfig::default());
        let a = state.alloc_instance();
        let b = state.alloc_instance();

        assert_ne!(a, b);
        assert_eq!(state.peek_instance(), b.next());
    }

    #[test]
    fn test_locate_unit() {
        let mut state = Match::new(MatchId(1), 42, &RulesConfig::default());
        let id = state.alloc_instance();
        let def = CardDefinition::unit(CardId::new(1), "Recruit", 1, 1, 1);
        let _ = state.sides[Side::Guest].board.push(UnitInstance::from_definition(&def, id, Side::Guest));

        assert_eq!(state.locate_unit(id), Some(Side::Guest));
        assert!(state.find_unit(id).is_some());
        assert_eq!(state.locate_unit(InstanceId(999)), None);
    }

    #[test]
    fn test_phase_locks() {
        assert!(TurnPhase::CoinToss.is_locked());
        assert!(!TurnPhase::Mulligan.is_locked());
        assert!(!TurnPhase::Main.is_locked());
        assert!(TurnPhase::Switching.is_locked());
        assert!(TurnPhase::Strategy < TurnPhase::DrawPhase);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut state = Match::new(MatchId(9), 7, &RulesConfig::default());
        let _ = state.rng.gen_range_usize(0..10);
        state.record(Side::Host, crate::core::PlayerAction::EndTurn);

        let json = state.to_json().unwrap();
        let restored = Match::from_json(&json).unwrap();

        assert_eq!(restored, state);
    }
}
