//! Bounded, ordered card containers.
//!
//! A `Zone` is an ordered list of instances with an optional capacity.
//! Ordering matters everywhere: decks draw from the front, hands keep the
//! order cards arrived in, boards resolve left to right and graveyards are
//! append-only.
//!
//! Storage is an `im::Vector`, so cloning a zone (and therefore a whole
//! match) is O(1) and mutations share structure with the original.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::Instance;
use crate::core::{GameRng, InstanceId};

/// Ordered container with an optional capacity.
///
/// ## Usage
///
/// ```
/// use duel_ccg::cards::{CardDefinition, CardId, CardInstance};
/// use duel_ccg::core::InstanceId;
/// use duel_ccg::zones::Zone;
///
/// let card = CardDefinition::unit(CardId::new(1), "Recruit", 1, 1, 1);
/// let mut hand = Zone::bounded(1);
///
/// assert!(hand.push(CardInstance::new(InstanceId(1), card.clone())).is_ok());
/// assert!(hand.push(CardInstance::new(InstanceId(2), card)).is_err());
/// assert!(hand.is_full());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize + Clone",
    deserialize = "T: Deserialize<'de> + Clone"
))]
pub struct Zone<T: Clone> {
    items: Vector<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    capacity: Option<usize>,
}

impl<T: Clone> Default for Zone<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T: Clone> Zone<T> {
    /// An empty zone holding at most `capacity` items.
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self {
            items: Vector::new(),
            capacity: Some(capacity),
        }
    }

    /// An empty zone without a capacity.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            items: Vector::new(),
            capacity: None,
        }
    }

    /// The capacity, if bounded.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the zone is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check if the zone is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.items.len() >= cap)
    }

    /// Free slots left, or `None` if unbounded.
    #[must_use]
    pub fn remaining(&self) -> Option<usize> {
        self.capacity.map(|cap| cap.saturating_sub(self.items.len()))
    }

    /// Append an item. Returns it back if the zone is full.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        self.items.push_back(item);
        Ok(())
    }

    /// Take the first item.
    pub fn pop_front(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Item at a position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Iterate in order.
    pub fn iter(&self) -> im::vector::Iter<'_, T> {
        self.items.iter()
    }

    /// Iterate mutably in order.
    pub fn iter_mut(&mut self) -> im::vector::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Keep only items matching the predicate, preserving order.
    pub fn retain(&mut self, f: impl FnMut(&T) -> bool) {
        self.items.retain(f);
    }

    /// Remove and return every item matching the predicate, in order.
    pub fn drain_where(&mut self, mut f: impl FnMut(&T) -> bool) -> Vec<T> {
        let mut taken = Vec::new();
        let mut kept = Vector::new();
        for item in std::mem::take(&mut self.items) {
            if f(&item) {
                taken.push(item);
            } else {
                kept.push_back(item);
            }
        }
        self.items = kept;
        taken
    }

    /// Shuffle in place.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        let mut order: Vec<T> = self.items.iter().cloned().collect();
        rng.shuffle(&mut order);
        self.items = order.into_iter().collect();
    }

    /// Copy the items out in order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<T: Clone + Instance> Zone<T> {
    /// Position of an instance.
    #[must_use]
    pub fn position(&self, id: InstanceId) -> Option<usize> {
        self.items.iter().position(|item| item.instance_id() == id)
    }

    /// Check if an instance is present.
    #[must_use]
    pub fn contains(&self, id: InstanceId) -> bool {
        self.position(id).is_some()
    }

    /// Find an instance.
    #[must_use]
    pub fn find(&self, id: InstanceId) -> Option<&T> {
        self.items.iter().find(|item| item.instance_id() == id)
    }

    /// Find an instance mutably.
    pub fn find_mut(&mut self, id: InstanceId) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.instance_id() == id)
    }

    /// Remove an instance.
    pub fn remove(&mut self, id: InstanceId) -> Option<T> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }

    /// Ids in order.
    #[must_use]
    pub fn ids(&self) -> Vec<InstanceId> {
        self.items.iter().map(Instance::instance_id).collect()
    }
}

impl<'a, T: Clone> IntoIterator for &'a Zone<T> {
    type Item = &'a T;
    type IntoIter = im::vector::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId, CardInstance};

    fn card(id: u32) -> CardInstance {
        CardInstance::new(InstanceId(id), CardDefinition::unit(CardId::new(1), "Recruit", 1, 1, 1))
    }

    #[test]
    fn test_bounded_push() {
        let mut zone = Zone::bounded(2);
        assert!(zone.push(card(1)).is_ok());
        assert!(zone.push(card(2)).is_ok());

        let rejected = zone.push(card(3));
        assert_eq!(rejected.map_err(|c| c.instance_id), Err(InstanceId(3)));
        assert_eq!(zone.len(), 2);
        assert_eq!(zone.remaining(), Some(0));
    }

    #[test]
    fn test_unbounded() {
        let mut zone = Zone::unbounded();
        for i in 0..50 {
            assert!(zone.push(card(i)).is_ok());
        }
        assert!(!zone.is_full());
        assert_eq!(zone.remaining(), None);
    }

    #[test]
    fn test_pop_front_order() {
        let mut zone = Zone::unbounded();
        for i in 1..=3 {
            let _ = zone.push(card(i));
        }

        assert_eq!(zone.pop_front().map(|c| c.instance_id), Some(InstanceId(1)));
        assert_eq!(zone.ids(), vec![InstanceId(2), InstanceId(3)]);
    }

    #[test]
    fn test_find_and_remove() {
        let mut zone = Zone::unbounded();
        for i in 1..=3 {
            let _ = zone.push(card(i));
        }

        assert!(zone.contains(InstanceId(2)));
        assert_eq!(zone.position(InstanceId(3)), Some(2));

        let removed = zone.remove(InstanceId(2));
        assert_eq!(removed.map(|c| c.instance_id), Some(InstanceId(2)));
        assert!(!zone.contains(InstanceId(2)));
        assert!(zone.remove(InstanceId(2)).is_none());
    }

    #[test]
    fn test_drain_where() {
        let mut zone = Zone::unbounded();
        for i in 1..=5 {
            let _ = zone.push(card(i));
        }

        let odd = zone.drain_where(|c| c.instance_id.raw() % 2 == 1);

        assert_eq!(odd.len(), 3);
        assert_eq!(zone.ids(), vec![InstanceId(2), InstanceId(4)]);
    }

    #[test]
    fn test_shuffle_keeps_items() {
        let mut zone = Zone::unbounded();
        for i in 0..20 {
            let _ = zone.push(card(i));
        }
        let mut rng = GameRng::new(42);

        zone.shuffle(&mut rng);

        let mut ids = zone.ids();
        assert_ne!(ids, (0..20).map(InstanceId).collect::<Vec<_>>());
        ids.sort();
        assert_eq!(ids, (0..20).map(InstanceId).collect::<Vec<_>>());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut zone = Zone::bounded(10);
        let _ = zone.push(card(1));
        let snapshot = zone.clone();

        let _ = zone.push(card(2));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(zone.len(), 2);
    }
}
