//! Table alias tags.
//!
//! Every table slot in a statement carries a tag obtained once, at
//! construction, from a [`TagGenerator`]. The tag is rendered as the SQL alias
//! of the table and substituted into join conditions. Generators are injected
//! so a compilation stays a pure function of (request, schema, tag stream).

use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Opaque alias of one table instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag(String);

impl Tag {
    pub fn new(tag: impl Into<String>) -> Self {
        Tag(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues a fresh, never repeated tag per call.
pub trait TagGenerator {
    fn next_tag(&self) -> Tag;
}

/// Per-compilation counter yielding `0`, `1`, `2`, ...
///
/// Not `Sync`; one instance belongs to one compilation. Nested statements
/// built within the same compilation borrow the same generator so their tags
/// never collide with the outer statement's.
#[derive(Debug, Default)]
pub struct SequentialTags {
    next: Cell<u64>,
}

impl SequentialTags {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TagGenerator for SequentialTags {
    fn next_tag(&self) -> Tag {
        let id = self.next.get();
        self.next.set(id + 1);
        Tag(id.to_string())
    }
}

/// Process-wide generator safe to share between concurrent compilations.
#[derive(Debug)]
pub struct SharedTags {
    prefix: String,
    next: AtomicU64,
}

impl SharedTags {
    pub fn new(prefix: impl Into<String>) -> Self {
        SharedTags {
            prefix: prefix.into(),
            next: AtomicU64::new(0),
        }
    }
}

impl TagGenerator for SharedTags {
    fn next_tag(&self) -> Tag {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        Tag(format!("{}{}", self.prefix, id))
    }
}

impl<T: TagGenerator + ?Sized> TagGenerator for &T {
    fn next_tag(&self) -> Tag {
        (**self).next_tag()
    }
}
