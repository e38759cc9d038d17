//! Instance identification.
//!
//! Every runtime object created from a catalog entry (hand card, deck card,
//! board unit) carries a unique `InstanceId`. Ids are allocated by the match
//! that owns the object and are never reused within that match.
//!
//! ## Usage
//!
//! ```
//! use duel_ccg::core::InstanceId;
//!
//! let id = InstanceId::new(7);
//! assert_eq!(id.raw(), 7);
//! assert_eq!(id.to_string(), "#7");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card or unit instance within one match.
///
/// A unit keeps the id of the hand card it was played from, so a target
/// chosen while the card is still in hand stays meaningful once it lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Create an instance ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u32> for InstanceId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a match, used to key scheduled phase transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(pub u64);

impl MatchId {
    /// Create a match ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Match({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_id_basics() {
        let id = InstanceId::new(3);
        assert_eq!(id.raw(), 3);
        assert_eq!(id.next(), InstanceId(4));
        assert_eq!(InstanceId::from(9), InstanceId(9));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", InstanceId(42)), "#42");
        assert_eq!(format!("{}", MatchId(5)), "Match(5)");
    }

    #[test]
    fn test_ordering() {
        assert!(InstanceId(1) < InstanceId(2));
    }

    #[test]
    fn test_serialization() {
        let id = InstanceId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: InstanceId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
