#![forbid(unsafe_code)]

//! Event names.
//!
//! A [`Topic`] identifies one named event on the bus. Topics are opaque
//! strings compared by exact equality — there is no wildcard, prefix, or
//! hierarchy matching. Components that need to react to several names
//! subscribe to each of them independently.
//!
//! Most topics are known at compile time; [`Topic::from_static`] is `const`
//! and allocation-free, so they can live in `const` items next to the code
//! that fires them:
//!
//! ```
//! use ripple_bus::Topic;
//!
//! const SCORE_AWARDED: Topic = Topic::from_static("score-awarded");
//!
//! assert_eq!(SCORE_AWARDED.as_str(), "score-awarded");
//! ```

use std::borrow::Cow;
use std::fmt;

/// Name of a bus event.
///
/// Cheap to clone: static names stay borrowed, owned names share via the
/// usual `String` clone. Equality and hashing follow the underlying string
/// exactly, so `Topic::from_static("a")` and `Topic::new("a")` are the same
/// key in the registry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Topic(Cow<'static, str>);

impl Topic {
    /// Create a topic from a static name without allocating.
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Create a topic from an owned or runtime-built name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// The topic name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Topic {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for Topic {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}
