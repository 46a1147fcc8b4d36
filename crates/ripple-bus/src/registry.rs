#![forbid(unsafe_code)]

//! Subscription registry: topic → ordered subscriber slots.
//!
//! The registry holds only the weak side of each callback; the strong side
//! lives in the [`Subscription`](crate::Subscription) guard. A slot whose
//! strong side has been dropped is dead and gets pruned the next time its
//! topic is snapshotted. Slot order within a topic is registration order and
//! removal preserves the order of the survivors.

use std::rc::{Rc, Weak};

use ahash::AHashMap;

use crate::payload::Payload;
use crate::topic::Topic;

/// Callback object shared between a subscription guard (strong) and the
/// registry (weak).
pub(crate) type SubscriberFn = dyn Fn(&Payload);

/// Identity of one registration within a registry.
///
/// Ids are allocated from a per-registry counter and never reused, so a
/// cancelled registration can not collide with a later one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SubscriberId(u64);

struct Slot {
    id: SubscriberId,
    callback: Weak<SubscriberFn>,
}

#[derive(Default)]
pub(crate) struct Registry {
    table: AHashMap<Topic, Vec<Slot>>,
    next_id: u64,
}

impl Registry {
    /// Append a registration for `topic`. Duplicate callbacks and duplicate
    /// topics are allowed; every insert is an independent slot.
    pub(crate) fn insert(&mut self, topic: Topic, callback: Weak<SubscriberFn>) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.table
            .entry(topic)
            .or_default()
            .push(Slot { id, callback });
        id
    }

    /// Remove one registration, preserving the order of the remaining slots.
    ///
    /// Removing the last slot for a topic drops the topic row entirely.
    /// Returns whether a slot was removed.
    pub(crate) fn remove(&mut self, topic: &Topic, id: SubscriberId) -> bool {
        let Some(slots) = self.table.get_mut(topic) else {
            return false;
        };
        let before = slots.len();
        slots.retain(|slot| slot.id != id);
        let removed = slots.len() != before;
        if slots.is_empty() {
            self.table.remove(topic);
        }
        removed
    }

    /// Upgrade the live callbacks for `topic`, in registration order.
    ///
    /// Dead slots are pruned as a side effect; an emptied topic row is
    /// dropped. The returned snapshot owns strong references, so the
    /// callbacks stay callable even if their guards are dropped mid-dispatch.
    pub(crate) fn snapshot(&mut self, topic: &Topic) -> Vec<Rc<SubscriberFn>> {
        let Some(slots) = self.table.get_mut(topic) else {
            return Vec::new();
        };
        let mut live = Vec::with_capacity(slots.len());
        slots.retain(|slot| match slot.callback.upgrade() {
            Some(callback) => {
                live.push(callback);
                true
            }
            None => false,
        });
        if slots.is_empty() {
            self.table.remove(topic);
        }
        live
    }

    /// Live registrations for `topic`. Dead slots are not counted (and not
    /// pruned — pruning stays on the dispatch path).
    pub(crate) fn live_count(&self, topic: &Topic) -> usize {
        self.table.get(topic).map_or(0, |slots| {
            slots
                .iter()
                .filter(|slot| slot.callback.strong_count() > 0)
                .count()
        })
    }

    /// Number of topics with at least one slot.
    pub(crate) fn topic_count(&self) -> usize {
        self.table.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn callback() -> Rc<SubscriberFn> {
        Rc::new(|_: &Payload| {})
    }

    #[test]
    fn insert_allocates_distinct_ids() {
        let mut registry = Registry::default();
        let cb = callback();
        let a = registry.insert(Topic::from_static("a"), Rc::downgrade(&cb));
        let b = registry.insert(Topic::from_static("a"), Rc::downgrade(&cb));
        assert_ne!(a, b);
    }

    #[test]
    fn snapshot_preserves_registration_order() {
        let mut registry = Registry::default();
        let topic = Topic::from_static("ordered");
        let first = callback();
        let second = callback();
        registry.insert(topic.clone(), Rc::downgrade(&first));
        registry.insert(topic.clone(), Rc::downgrade(&second));

        let snapshot = registry.snapshot(&topic);
        assert_eq!(snapshot.len(), 2);
        assert!(Rc::ptr_eq(&snapshot[0], &first));
        assert!(Rc::ptr_eq(&snapshot[1], &second));
    }

    #[test]
    fn remove_preserves_survivor_order() {
        let mut registry = Registry::default();
        let topic = Topic::from_static("ordered");
        let first = callback();
        let second = callback();
        let third = callback();
        registry.insert(topic.clone(), Rc::downgrade(&first));
        let middle = registry.insert(topic.clone(), Rc::downgrade(&second));
        registry.insert(topic.clone(), Rc::downgrade(&third));

        assert!(registry.remove(&topic, middle));
        let snapshot = registry.snapshot(&topic);
        assert_eq!(snapshot.len(), 2);
        assert!(Rc::ptr_eq(&snapshot[0], &first));
        assert!(Rc::ptr_eq(&snapshot[1], &third));
    }

    #[test]
    fn remove_unknown_is_false() {
        let mut registry = Registry::default();
        let topic = Topic::from_static("a");
        let cb = callback();
        let id = registry.insert(topic.clone(), Rc::downgrade(&cb));
        assert!(!registry.remove(&Topic::from_static("b"), id));
        assert!(registry.remove(&topic, id));
        assert!(!registry.remove(&topic, id), "second remove finds nothing");
    }

    #[test]
    fn snapshot_prunes_dead_slots() {
        let mut registry = Registry::default();
        let topic = Topic::from_static("pruned");
        let keep = callback();
        registry.insert(topic.clone(), Rc::downgrade(&keep));
        {
            let dropped = callback();
            registry.insert(topic.clone(), Rc::downgrade(&dropped));
        }

        let snapshot = registry.snapshot(&topic);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.live_count(&topic), 1);
    }

    #[test]
    fn empty_rows_are_dropped() {
        let mut registry = Registry::default();
        let topic = Topic::from_static("transient");
        let cb = callback();
        let id = registry.insert(topic.clone(), Rc::downgrade(&cb));
        assert_eq!(registry.topic_count(), 1);

        registry.remove(&topic, id);
        assert_eq!(registry.topic_count(), 0);

        // Dead-slot pruning drops the row too.
        {
            let dropped = callback();
            registry.insert(topic.clone(), Rc::downgrade(&dropped));
        }
        assert_eq!(registry.topic_count(), 1);
        assert!(registry.snapshot(&topic).is_empty());
        assert_eq!(registry.topic_count(), 0);
    }

    #[test]
    fn live_count_ignores_dead_slots_without_pruning() {
        let mut registry = Registry::default();
        let topic = Topic::from_static("counted");
        let keep = callback();
        registry.insert(topic.clone(), Rc::downgrade(&keep));
        {
            let dropped = callback();
            registry.insert(topic.clone(), Rc::downgrade(&dropped));
        }

        assert_eq!(registry.live_count(&topic), 1);
        // The dead slot is still physically present until a snapshot runs.
        assert_eq!(registry.topic_count(), 1);
    }
}
