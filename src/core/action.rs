//! Player actions and action history.
//!
//! A `PlayerAction` is one intended move submitted by a side. The engine
//! either applies it (returning a delta) or declines it. Accepted actions are
//! appended to the match history as `ActionRecord`s.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::InstanceId;
use super::side::Side;

/// What an attack is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AttackTarget {
    /// The opposing side itself.
    Face,
    /// A unit on the opposing board.
    Unit(InstanceId),
}

/// The strategy-phase choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Maximum mana +1 (capped).
    Mana,
    /// One extra draw.
    Draw,
}

/// An intended move by one side.
///
/// ## Example
///
/// ```
/// use duel_ccg::core::{AttackTarget, InstanceId, PlayerAction};
///
/// let attack = PlayerAction::Attack { attacker: InstanceId(4), target: AttackTarget::Face };
/// let json = serde_json::to_string(&attack).unwrap();
/// assert_eq!(json, r#"{"action":"attack","attacker":4,"target":{"kind":"face"}}"#);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlayerAction {
    /// Record the private mulligan selection without submitting it.
    MarkMulligan { cards: SmallVec<[InstanceId; 4]> },

    /// Exchange the listed opening-hand cards and finish the mulligan.
    SubmitMulligan { cards: SmallVec<[InstanceId; 4]> },

    /// Play a card from hand, optionally aimed at a unit.
    PlayCard {
        card: InstanceId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<InstanceId>,
    },

    /// Declare an attack.
    Attack {
        attacker: InstanceId,
        target: AttackTarget,
    },

    /// Pick the strategy-phase option.
    ChooseStrategy { choice: Strategy },

    /// End the main phase.
    EndTurn,

    /// Concede the match.
    Surrender,
}

impl PlayerAction {
    /// Short name for log lines.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PlayerAction::MarkMulligan { .. } => "mark_mulligan",
            PlayerAction::SubmitMulligan { .. } => "submit_mulligan",
            PlayerAction::PlayCard { .. } => "play_card",
            PlayerAction::Attack { .. } => "attack",
            PlayerAction::ChooseStrategy { .. } => "choose_strategy",
            PlayerAction::EndTurn => "end_turn",
            PlayerAction::Surrender => "surrender",
        }
    }

    /// Whether the action belongs in the public history.
    ///
    /// Mulligan marks are private.
    #[must_use]
    pub fn is_recorded(&self) -> bool {
        !matches!(self, PlayerAction::MarkMulligan { .. })
    }
}

/// A recorded action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The side that took this action.
    pub side: Side,

    /// The action taken.
    pub action: PlayerAction,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Position in the match history.
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(side: Side, action: PlayerAction, turn: u32, sequence: u32) -> Self {
        Self {
            side,
            action,
            turn,
            sequence,
        }
    }
}
