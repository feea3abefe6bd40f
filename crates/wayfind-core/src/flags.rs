//! Per-node membership flags a [`Map`](crate::Map) may cache.

use std::ops::{BitAnd, BitOr, Not};

/// Bitmask of search membership flags.
///
/// Storages keep these up to date through
/// [`Map::set_flags`](crate::Map::set_flags) when the map implements it.
/// They are a cache only: the driver always asks the storage for the
/// authoritative open/closed membership.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AStarFlags(pub u8);

impl AStarFlags {
    pub const NONE: Self = Self(0);
    pub const OPEN: Self = Self(1 << 0);
    pub const CLOSED: Self = Self(1 << 1);
    pub const OPEN_OR_CLOSED: Self = Self(Self::OPEN.0 | Self::CLOSED.0);
    pub const NOT_PASSABLE: Self = Self(1 << 2);

    /// Whether this mask contains all the bits from `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Whether this mask shares at least one bit with `other`.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Replace the open/closed bits with `membership`, keeping every other bit.
    #[inline]
    pub const fn with_membership(self, membership: Self) -> Self {
        Self((self.0 & !Self::OPEN_OR_CLOSED.0) | (membership.0 & Self::OPEN_OR_CLOSED.0))
    }
}

impl BitOr for AStarFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for AStarFlags {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for AStarFlags {
    type Output = Self;
    #[inline]
    fn not(self) -> Self {
        Self(!self.0)
    }
}
