#![forbid(unsafe_code)]

//! Optional per-publish values.
//!
//! Subscribers are side-effect-only: the default registration takes no
//! arguments and most events carry nothing beyond their name. When an event
//! does carry data (the amount awarded, the row that changed), the publisher
//! attaches a [`Payload`] and payload-aware subscribers recover it with a
//! typed [`downcast_ref`](Payload::downcast_ref). Each event name should
//! settle on one payload type up front; the downcast returning `None` means
//! publisher and subscriber disagree about that type.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Dynamically-typed value attached to a publish.
///
/// Cloning is cheap and shares the underlying value. The empty payload is
/// the default and what zero-argument subscribers implicitly ignore.
#[derive(Clone, Default)]
pub struct Payload {
    value: Option<Rc<dyn Any>>,
}

impl Payload {
    /// The empty payload.
    #[must_use]
    pub fn empty() -> Self {
        Self { value: None }
    }

    /// Wrap a value for publishing.
    #[must_use]
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            value: Some(Rc::new(value)),
        }
    }

    /// Whether this payload carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Borrow the carried value as `T`.
    ///
    /// Returns `None` for the empty payload or when the carried value is not
    /// a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.as_deref().and_then(<dyn Any>::downcast_ref)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("present", &self.value.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload() {
        let payload = Payload::empty();
        assert!(payload.is_empty());
        assert_eq!(payload.downcast_ref::<u64>(), None);
    }

    #[test]
    fn downcast_matching_type() {
        let payload = Payload::new(150u64);
        assert!(!payload.is_empty());
        assert_eq!(payload.downcast_ref::<u64>(), Some(&150));
    }

    #[test]
    fn downcast_wrong_type_is_none() {
        let payload = Payload::new(String::from("course-completed"));
        assert_eq!(payload.downcast_ref::<u64>(), None);
        assert_eq!(
            payload.downcast_ref::<String>().map(String::as_str),
            Some("course-completed")
        );
    }

    #[test]
    fn clone_shares_value() {
        let payload = Payload::new(7i32);
        let cloned = payload.clone();
        assert_eq!(payload.downcast_ref::<i32>(), cloned.downcast_ref::<i32>());
    }

    #[test]
    fn default_is_empty() {
        assert!(Payload::default().is_empty());
    }

    #[test]
    fn debug_is_opaque() {
        let debug = format!("{:?}", Payload::new(1u8));
        assert!(debug.contains("present: true"));
        assert!(!debug.contains('1'));
    }
}
