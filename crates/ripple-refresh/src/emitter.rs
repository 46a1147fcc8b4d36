#![forbid(unsafe_code)]

//! Fire-and-forget topic firing for completed domain actions.
//!
//! A [`Notifier`] is the cross-cutting tail of a state-changing action: once
//! the action's own work (typically a remote persistence call) has
//! succeeded, it fires the topics that name what changed and moves on. The
//! notification is not part of the action's contract — subscriber failures,
//! missing subscribers, and delivery counts never reach the caller, and
//! nothing here can roll back or block the action.

use ripple_bus::{EventBus, Topic};

/// Fires named events after a state-changing action completes.
///
/// Thin clonable handle over an [`EventBus`]; an application typically
/// constructs one per domain service.
#[derive(Clone, Debug)]
pub struct Notifier {
    bus: EventBus,
}

impl Notifier {
    /// Wrap a bus handle.
    #[must_use]
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    /// Fire one topic, best-effort.
    ///
    /// The delivered count is observed only for trace logging.
    pub fn notify(&self, topic: &Topic) {
        let delivered = self.bus.publish(topic);
        tracing::trace!(topic = %topic, delivered, "notification fired");
    }

    /// Fire several topics in order.
    ///
    /// For actions whose effect is announced under more than one name — the
    /// topics stay independent; this just saves the caller a loop.
    pub fn notify_all(&self, topics: &[Topic]) {
        for topic in topics {
            self.notify(topic);
        }
    }

    /// The underlying bus handle.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }
}
