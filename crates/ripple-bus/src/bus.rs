#![forbid(unsafe_code)]

//! Event channel and subscription guards.
//!
//! [`EventBus`] is a cheap-to-clone handle over a shared subscription
//! registry. Components subscribe callbacks under a [`Topic`] and receive a
//! [`Subscription`] guard; publishers fire topics and get back the number of
//! callbacks invoked.
//!
//! # Dispatch
//!
//! `publish` snapshots the live subscriber list for the topic, releases the
//! registry borrow, then invokes each callback synchronously in registration
//! order. Consequences:
//!
//! - Callbacks may subscribe, cancel, or publish re-entrantly. Registry
//!   mutations take effect immediately but never alter the in-flight
//!   snapshot: a subscription added during dispatch first fires on the next
//!   publish, and a subscription cancelled during dispatch still fires if it
//!   was in the snapshot.
//! - A panicking callback is caught at the channel boundary, logged with the
//!   topic, and dispatch continues with the next subscriber. `publish` never
//!   panics out. (This relies on an unwinding panic runtime; under
//!   `panic = "abort"` the process aborts before containment.)
//! - Callbacks must not block: dispatch is synchronous and runs inside the
//!   publisher's event-loop turn. A callback that schedules asynchronous
//!   work should return immediately after scheduling it; `publish` does not
//!   await that work and orders nothing beyond the invocation sequence.
//!
//! # Lifecycle Guarantees
//!
//! 1. Dropping a [`Subscription`] ends delivery on all exit paths, including
//!    early returns and unwinding.
//! 2. `Subscription::cancel` is idempotent; the second call is a no-op.
//! 3. Re-subscribing after cancel creates a new, independent registration.
//!
//! # Thread Safety
//!
//! Single-threaded by design: the registry lives in `Rc<RefCell<..>>` and
//! handles are `!Send`. A multi-threaded port would need a mutex or a
//! snapshot-on-read structure around the registry.
//!
//! # Example
//!
//! ```
//! use ripple_bus::{EventBus, Topic};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let bus = EventBus::new();
//! let topic = Topic::from_static("score-awarded");
//!
//! let hits = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&hits);
//! let sub = bus.subscribe(topic.clone(), move || counter.set(counter.get() + 1));
//!
//! assert_eq!(bus.publish(&topic), 1);
//! assert_eq!(hits.get(), 1);
//!
//! drop(sub);
//! assert_eq!(bus.publish(&topic), 0);
//! ```

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use crate::payload::Payload;
use crate::registry::{Registry, SubscriberFn, SubscriberId};
use crate::topic::Topic;

/// The event channel.
///
/// Clones share one registry: an application typically creates a single bus
/// and hands clones to publishers and subscribers. Tests create an isolated
/// bus per case.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
}

impl EventBus {
    /// Create a bus with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zero-argument callback under `topic`.
    ///
    /// The returned guard owns the registration; delivery ends when the
    /// guard is cancelled or dropped.
    pub fn subscribe(&self, topic: Topic, callback: impl Fn() + 'static) -> Subscription {
        self.subscribe_with(topic, move |_| callback())
    }

    /// Register a payload-aware callback under `topic`.
    ///
    /// The callback receives the publisher's [`Payload`] (empty for plain
    /// [`publish`](Self::publish) calls).
    pub fn subscribe_with(
        &self,
        topic: Topic,
        callback: impl Fn(&Payload) + 'static,
    ) -> Subscription {
        let callback: Rc<SubscriberFn> = Rc::new(callback);
        let id = self
            .registry
            .borrow_mut()
            .insert(topic.clone(), Rc::downgrade(&callback));
        tracing::trace!(topic = %topic, "subscriber registered");
        Subscription {
            registry: Rc::downgrade(&self.registry),
            topic,
            id,
            callback: Some(callback),
        }
    }

    /// Publish `topic` with no payload. Returns the number of callbacks
    /// invoked.
    pub fn publish(&self, topic: &Topic) -> usize {
        self.publish_with(topic, &Payload::empty())
    }

    /// Publish `topic`, passing `payload` to payload-aware subscribers.
    ///
    /// Invokes every live subscriber in registration order and returns the
    /// count invoked (0 for an unknown topic — not an error). Never panics
    /// out; see the module docs for the dispatch contract.
    pub fn publish_with(&self, topic: &Topic, payload: &Payload) -> usize {
        // Snapshot first and release the registry borrow so callbacks can
        // subscribe, cancel, or publish re-entrantly.
        let snapshot = self.registry.borrow_mut().snapshot(topic);
        let invoked = snapshot.len();
        tracing::trace!(topic = %topic, subscribers = invoked, "dispatching");
        for callback in &snapshot {
            if let Err(cause) = panic::catch_unwind(AssertUnwindSafe(|| (**callback)(payload))) {
                tracing::error!(
                    topic = %topic,
                    error = panic_description(cause.as_ref()),
                    "subscriber panicked during dispatch"
                );
            }
        }
        invoked
    }

    /// Live registrations for `topic`.
    #[must_use]
    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.registry.borrow().live_count(topic)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("topics", &self.registry.borrow().topic_count())
            .finish()
    }
}

/// Best-effort description of a subscriber panic for the dispatch log.
fn panic_description(cause: &(dyn Any + Send)) -> &str {
    if let Some(message) = cause.downcast_ref::<&str>() {
        message
    } else if let Some(message) = cause.downcast_ref::<String>() {
        message
    } else {
        "opaque panic payload"
    }
}

/// RAII guard for one registration.
///
/// A subscription is Registered from creation until its first
/// [`cancel`](Self::cancel) (or drop), then Unregistered — a terminal state.
/// Subscribing again creates a new, independent guard.
#[must_use = "dropping a Subscription cancels delivery immediately"]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    topic: Topic,
    id: SubscriberId,
    callback: Option<Rc<SubscriberFn>>,
}

impl Subscription {
    /// End delivery for this registration.
    ///
    /// Idempotent: the second and later calls are no-ops. Other
    /// registrations for the same topic are untouched and keep their order.
    pub fn cancel(&mut self) {
        if self.callback.take().is_some() {
            if let Some(registry) = self.registry.upgrade() {
                registry.borrow_mut().remove(&self.topic, self.id);
            }
            tracing::trace!(topic = %self.topic, "subscriber cancelled");
        }
    }

    /// Whether this subscription still delivers notifications.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.callback.is_some()
    }

    /// The topic this subscription was registered under.
    #[must_use]
    pub fn topic(&self) -> &Topic {
        &self.topic
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("active", &self.is_active())
            .finish()
    }
}
