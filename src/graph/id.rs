//! Identity types for the wiring graph.
//!
//! `LinkId` is a newtype over `u32` that serves as a direct array index into
//! a chain's link arena, providing O(1) successor lookup. Each link stores
//! only the id of its successor, so a chain is a singly-linked ownership
//! sequence with no possibility of cycles.

use std::fmt;

/// Index into `Chain::links`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LinkId(pub u32);

impl LinkId {
    pub const INVALID: LinkId = LinkId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "LinkId(INVALID)")
        } else {
            write!(f, "LinkId({})", self.0)
        }
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_id() {
        let id = LinkId(42);
        assert!(id.is_valid());
        assert_eq!(id.index(), 42);
        assert!(!LinkId::INVALID.is_valid());
    }
}
