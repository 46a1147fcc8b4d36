#![forbid(unsafe_code)]

//! Domain-facing layer of the Ripple notification bus.
//!
//! Two halves, one per side of a state change:
//!
//! - [`Notifier`]: fired by the *action* side after a state-changing
//!   operation completes — a best-effort, fire-and-forget signal that
//!   derived views are now stale.
//! - [`Refresher`] and [`RefreshScope`]: held by the *view* side — they bind
//!   refresh actions to topics at mount time and guarantee unsubscription at
//!   unmount, with per-view failure containment.
//!
//! Neither half knows about the other; they meet only at the
//! [`EventBus`](ripple_bus::EventBus) and the topic names.

pub mod emitter;
pub mod scope;

pub use emitter::Notifier;
pub use scope::{RefreshResult, RefreshScope, Refresher};
