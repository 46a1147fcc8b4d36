#![forbid(unsafe_code)]

//! Mount-time subscription scopes and refresh coordinators.
//!
//! A view component that displays derived data goes through one lifecycle:
//! mount (subscribe to the topics that invalidate it), receive N
//! notifications (re-fetch/recompute), unmount (unsubscribe). Both types
//! here make the unmount half automatic:
//!
//! - [`RefreshScope`] collects arbitrary [`Subscription`] guards for one
//!   logical component and releases them all when dropped or cleared.
//! - [`Refresher`] binds a single fallible refresh action to one or more
//!   topics and contains its failures.
//!
//! # Invariants
//!
//! 1. Dropping a scope or refresher releases every held subscription, on all
//!    exit paths (early return, `?`, unwinding).
//! 2. After drop, no callback registered through the value fires again.
//! 3. A refresh action returning `Err` is logged and contained — it never
//!    reaches the event channel, other subscribers, or the publisher.
//! 4. `clear()` releases immediately; the scope stays reusable.

use std::error::Error;
use std::fmt;
use std::rc::Rc;

use ripple_bus::{EventBus, Subscription, Topic};

/// Outcome of one refresh action run.
pub type RefreshResult = Result<(), Box<dyn Error>>;

/// Run a refresh action, containing and logging any failure.
fn run_contained(action: &dyn Fn() -> RefreshResult, trigger: &str) {
    if let Err(error) = action() {
        tracing::warn!(%error, trigger, "refresh action failed; view stays stale");
    }
}

// ---------------------------------------------------------------------------
// RefreshScope — subscription collection per component
// ---------------------------------------------------------------------------

/// Collects subscriptions owned by one component scope.
///
/// When the scope is dropped, every held subscription is cancelled, cleanly
/// disconnecting the component from the bus.
///
/// ```
/// use ripple_bus::{EventBus, Topic};
/// use ripple_refresh::RefreshScope;
///
/// let bus = EventBus::new();
/// let topic = Topic::from_static("score-awarded");
///
/// let mut scope = RefreshScope::new();
/// scope.subscribe(&bus, topic.clone(), || { /* recompute */ });
/// assert_eq!(bus.subscriber_count(&topic), 1);
///
/// drop(scope);
/// assert_eq!(bus.subscriber_count(&topic), 0);
/// ```
#[derive(Default)]
pub struct RefreshScope {
    subscriptions: Vec<Subscription>,
}

impl RefreshScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an externally created subscription.
    pub fn hold(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Subscribe a callback within this scope.
    ///
    /// Returns the scope for chaining.
    pub fn subscribe(
        &mut self,
        bus: &EventBus,
        topic: Topic,
        callback: impl Fn() + 'static,
    ) -> &mut Self {
        self.subscriptions.push(bus.subscribe(topic, callback));
        self
    }

    /// Number of held subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether the scope holds no subscriptions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release all subscriptions immediately; the scope stays reusable.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

impl fmt::Debug for RefreshScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshScope")
            .field("subscription_count", &self.subscriptions.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Refresher — one refresh action bound to N topics
// ---------------------------------------------------------------------------

/// A mounted refresh action: re-fetches or recomputes a view's data whenever
/// any of its topics fires.
///
/// Mounting subscribes the action under every topic; dropping (or
/// [`unmount`](Self::unmount)) cancels every registration exactly once.
/// The action returns a [`RefreshResult`]; failures are logged and contained
/// so one broken view never disturbs the rest of the dispatch.
#[must_use = "dropping a Refresher unmounts it immediately"]
pub struct Refresher {
    action: Rc<dyn Fn() -> RefreshResult>,
    subscriptions: Vec<Subscription>,
}

impl Refresher {
    /// Subscribe `action` under every topic in `topics`.
    ///
    /// An empty `topics` slice mounts nothing; the action then only runs via
    /// [`run_now`](Self::run_now).
    pub fn mount(
        bus: &EventBus,
        topics: &[Topic],
        action: impl Fn() -> RefreshResult + 'static,
    ) -> Self {
        let action: Rc<dyn Fn() -> RefreshResult> = Rc::new(action);
        let subscriptions = topics
            .iter()
            .map(|topic| {
                let action = Rc::clone(&action);
                let name = topic.clone();
                bus.subscribe(topic.clone(), move || {
                    run_contained(action.as_ref(), name.as_str());
                })
            })
            .collect();
        Self {
            action,
            subscriptions,
        }
    }

    /// Run the refresh action immediately — the manual-reload path.
    ///
    /// Failures are contained and logged exactly as for notified runs.
    pub fn run_now(&self) {
        run_contained(self.action.as_ref(), "manual");
    }

    /// Number of topics this refresher is registered under.
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether at least one registration is still delivering.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.subscriptions.iter().any(Subscription::is_active)
    }

    /// Tear down explicitly. Equivalent to dropping the value.
    pub fn unmount(self) {
        drop(self);
    }
}

impl fmt::Debug for Refresher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refresher")
            .field("topic_count", &self.subscriptions.len())
            .field("mounted", &self.is_mounted())
            .finish()
    }
}
