//! Entity identifiers
//!
//! Ids are handed out by a single [`IdGenerator`] per simulation. They grow
//! monotonically and are never recycled, so a stale id simply fails to
//! resolve instead of aliasing a newer entity.

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};
use serde::{Deserialize, Serialize};

/// Opaque entity identifier. `0` is reserved as the invalid id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// The invalid/null id
    pub const INVALID: Self = Self(0);

    /// Wrap a raw value
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw value
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is a real id
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "EntityId({})", self.0)
        } else {
            write!(f, "EntityId(invalid)")
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id generator
pub struct IdGenerator {
    next: AtomicU32,
}

impl IdGenerator {
    /// Create a new generator; the first id is 1
    pub const fn new() -> Self {
        Self {
            next: AtomicU32::new(1),
        }
    }

    /// Generate the next unique id
    pub fn next(&self) -> EntityId {
        EntityId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Peek at the id the next call will return
    pub fn peek(&self) -> EntityId {
        EntityId(self.next.load(Ordering::Relaxed))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator").field("next", &self.peek()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic_and_valid() {
        let gen = IdGenerator::new();
        let a = gen.next();
        let b = gen.next();
        assert!(a.is_valid());
        assert!(b > a);
        assert_eq!(a.raw(), 1);
        assert_eq!(gen.peek().raw(), 3);
    }

    #[test]
    fn test_invalid_id() {
        assert!(!EntityId::INVALID.is_valid());
        assert_eq!(format!("{:?}", EntityId::INVALID), "EntityId(invalid)");
        assert_eq!(EntityId::from_raw(7).to_string(), "#7");
    }
}
