//! Type index handle.
//!
//! All types are owned by the external type lattice and referenced by their
//! 32-bit index.
//!
//! - Copy, lightweight passing
//! - Handle equality is O(1); whether two distinct handles denote equal
//!   types is for the lattice to say (`TypeLattice::types_equal`)

use std::fmt;

/// A 32-bit index into the type lattice's storage.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    /// Create an index from a raw u32 value.
    ///
    /// Only the lattice that owns the type should mint indices.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize` (for indexing into the lattice's storage).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Idx({})", self.0)
    }
}

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

// Compile-time size assertion: Idx must be exactly 4 bytes
const _: () = assert!(std::mem::size_of::<Idx>() == 4);
const _: () = assert!(std::mem::size_of::<Option<Idx>>() == 8);
