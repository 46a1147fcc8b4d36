#![forbid(unsafe_code)]

//! Named-event dispatch core for Ripple.
//!
//! This crate provides the primitives for cross-component state invalidation:
//!
//! - [`Topic`]: an opaque event name, compared by exact string equality.
//! - [`Payload`]: an optional dynamically-typed value attached to a publish.
//! - [`EventBus`]: the event channel — `publish` looks up every live
//!   subscriber for a topic and invokes each synchronously.
//! - [`Subscription`]: RAII guard for one registration; cancels on drop.
//!
//! # Architecture
//!
//! The subscription registry lives in `Rc<RefCell<..>>` for single-threaded
//! shared ownership; [`EventBus`] handles are cheap clones of the same
//! registry. The registry stores `Weak` callback references and prunes dead
//! entries lazily during dispatch — the strong side is owned by the
//! [`Subscription`] guard, so the registry never keeps an abandoned
//! component's callback alive.
//!
//! Dispatch iterates a snapshot of the subscriber list taken when `publish`
//! begins, with the registry borrow released before the first callback runs.
//! Callbacks may therefore subscribe, cancel, or publish re-entrantly.
//!
//! # Invariants
//!
//! 1. Subscribers are invoked in registration order.
//! 2. `publish` invokes exactly the subscribers live at dispatch start;
//!    registry mutations made by callbacks take effect only afterwards.
//! 3. A panicking subscriber is caught at the channel boundary, logged, and
//!    never prevents later subscribers in the same dispatch from running.
//! 4. Cancelling a [`Subscription`] (explicitly or by drop) is idempotent
//!    and removes exactly that registration.
//! 5. Publishing a topic with zero subscribers returns 0; events are never
//!    buffered or replayed.

pub mod bus;
pub mod payload;
pub mod topic;

mod registry;

pub use bus::{EventBus, Subscription};
pub use payload::Payload;
pub use topic::Topic;
