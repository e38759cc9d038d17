//! Operation outcomes.
//!
//! Every engine operation returns an [`Outcome`]: either a delta to merge
//! into the shared document plus log lines, or a [`Decline`] naming the
//! precondition that failed. A declined operation never mutates anything.

use thiserror::Error;

use crate::core::{InstanceId, Match, MatchDelta, TurnPhase};

/// A precondition that was not met.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Decline {
    #[error("the match is finished")]
    MatchFinished,

    #[error("expected phase {expected}, match is in {actual}")]
    WrongPhase { expected: TurnPhase, actual: TurnPhase },

    #[error("it is not this side's turn")]
    NotTurnOwner,

    #[error("actions are locked during {0}")]
    PhaseLocked(TurnPhase),

    #[error("this side does not drive the current phase")]
    NotAuthoritative,

    #[error("{0} is not in hand")]
    CardNotInHand(InstanceId),

    #[error("card costs {cost} mana, {available} available")]
    InsufficientMana { cost: i32, available: i32 },

    #[error("the board is full")]
    BoardFull,

    #[error("{0} is not on the board")]
    UnitNotFound(InstanceId),

    #[error("{0} cannot attack")]
    CannotAttack(InstanceId),

    #[error("{0} is frozen")]
    Frozen(InstanceId),

    #[error("buildings cannot attack")]
    BuildingCannotAttack,

    #[error("buildings cannot be attacked")]
    TargetIsBuilding,

    #[error("a taunt unit must be attacked first")]
    TauntRequired,

    #[error("only elusive units can attack {0}")]
    ElusiveTarget(InstanceId),

    #[error("{0} is in stealth")]
    StealthTarget(InstanceId),

    #[error("mulligan already submitted")]
    MulliganAlreadySubmitted,

    #[error("waiting for a player action in {0}")]
    AwaitingPlayer(TurnPhase),

    #[error("transition due in {remaining_ms} ms")]
    NotDue { remaining_ms: u64 },

    #[error("transition already processed")]
    AlreadyProcessed,
}

/// An accepted operation.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    /// Changes to merge into the shared document.
    pub delta: MatchDelta,
    /// Human-readable log lines, in order.
    pub log: Vec<String>,
}

impl Resolution {
    /// The log as one line per entry.
    #[must_use]
    pub fn log_text(&self) -> String {
        self.log.join("\n")
    }
}

/// Result of one engine operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Applied(Resolution),
    Declined(Decline),
}

impl Outcome {
    /// Build an applied outcome from a working copy.
    #[must_use]
    pub fn applied(before: &Match, after: &Match, log: Vec<String>) -> Self {
        Outcome::Applied(Resolution {
            delta: MatchDelta::between(before, after),
            log,
        })
    }

    /// Check if the operation was accepted.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    /// The resolution, if accepted.
    #[must_use]
    pub fn resolution(&self) -> Option<&Resolution> {
        match self {
            Outcome::Applied(resolution) => Some(resolution),
            Outcome::Declined(_) => None,
        }
    }

    /// The decline, if rejected.
    #[must_use]
    pub fn decline(&self) -> Option<&Decline> {
        match self {
            Outcome::Applied(_) => None,
            Outcome::Declined(decline) => Some(decline),
        }
    }

    /// Merge the delta into `state`. Returns whether anything was applied.
    pub fn commit(&self, state: &mut Match) -> bool {
        match self {
            Outcome::Applied(resolution) => {
                resolution.delta.apply(state);
                true
            }
            Outcome::Declined(_) => false,
        }
    }
}

impl From<Decline> for Outcome {
    fn from(decline: Decline) -> Self {
        Outcome::Declined(decline)
    }
}
