//! Match participants and per-side data storage.
//!
//! ## Side
//!
//! A match always has exactly two sides. The `Host` created the room and is
//! authoritative for the pre-game phases; the `Guest` joined it.
//!
//! ## SideMap
//!
//! Fixed two-slot storage indexed by `Side`, with iteration in host-first
//! order.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two match participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The side that created the match.
    Host,
    /// The side that joined the match.
    Guest,
}

impl Side {
    /// Both sides, host first.
    pub const BOTH: [Side; 2] = [Side::Host, Side::Guest];

    /// The other side.
    ///
    /// ```
    /// use duel_ccg::core::Side;
    ///
    /// assert_eq!(Side::Host.opponent(), Side::Guest);
    /// assert_eq!(Side::Guest.opponent(), Side::Host);
    /// ```
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Host => Side::Guest,
            Side::Guest => Side::Host,
        }
    }

    /// Iterate over both sides starting from this one.
    pub fn this_then_opponent(self) -> impl Iterator<Item = Side> {
        [self, self.opponent()].into_iter()
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Host => write!(f, "host"),
            Side::Guest => write!(f, "guest"),
        }
    }
}

/// Per-side data storage.
///
/// ## Example
///
/// ```
/// use duel_ccg::core::{Side, SideMap};
///
/// let mut health: SideMap<i32> = SideMap::with_value(30);
/// health[Side::Guest] -= 4;
///
/// assert_eq!(health[Side::Host], 30);
/// assert_eq!(health[Side::Guest], 26);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    host: T,
    guest: T,
}

impl<T> SideMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            host: factory(Side::Host),
            guest: factory(Side::Guest),
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Host => &self.host,
            Side::Guest => &self.guest,
        }
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Host => &mut self.host,
            Side::Guest => &mut self.guest,
        }
    }

    /// Iterate over (Side, &T) pairs, host first.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::Host, &self.host), (Side::Guest, &self.guest)].into_iter()
    }

    /// Transform both entries.
    pub fn map<U>(&self, f: impl Fn(Side, &T) -> U) -> SideMap<U> {
        SideMap {
            host: f(Side::Host, &self.host),
            guest: f(Side::Guest, &self.guest),
        }
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Side::Host.opponent(), Side::Guest);
        assert_eq!(Side::Guest.opponent().opponent(), Side::Guest);
        assert_eq!(format!("{}", Side::Host), "host");
    }

    #[test]
    fn test_this_then_opponent() {
        let order: Vec<_> = Side::Guest.this_then_opponent().collect();
        assert_eq!(order, vec![Side::Guest, Side::Host]);
    }

    #[test]
    fn test_side_map_new() {
        let map = SideMap::new(|side| if side == Side::Host { 1 } else { 2 });
        assert_eq!(map[Side::Host], 1);
        assert_eq!(map[Side::Guest], 2);
    }

    #[test]
    fn test_side_map_mutation() {
        let mut map: SideMap<Vec<i32>> = SideMap::default();
        map[Side::Guest].push(5);

        assert!(map[Side::Host].is_empty());
        assert_eq!(map[Side::Guest], vec![5]);
    }

    #[test]
    fn test_side_map_iter_and_map() {
        let map = SideMap::with_value(3);
        let doubled = map.map(|_, v| v * 2);

        let pairs: Vec<_> = doubled.iter().collect();
        assert_eq!(pairs, vec![(Side::Host, &6), (Side::Guest, &6)]);
    }

    #[test]
    fn test_side_serialization() {
        let json = serde_json::to_string(&Side::Guest).unwrap();
        assert_eq!(json, "\"guest\"");

        let map = SideMap::new(|side| side == Side::Host);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: SideMap<bool> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
