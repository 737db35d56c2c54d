//! Interned string identifier.
//!
//! Provides compact 32-bit interned identifiers. The implicit names a scope
//! can synthesize (`this`, `super`, `arguments`, `exports`) are pre-interned
//! at fixed indices so they can be named without an interner.

use std::fmt;

/// Interned string identifier.
///
/// Dotted names (`a.b.c`) are interned whole; they are distinct names from
/// their root (`a`).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);
    /// Pre-interned `this`.
    pub const THIS: Name = Name(1);
    /// Pre-interned `super`.
    pub const SUPER: Name = Name(2);
    /// Pre-interned `arguments`.
    pub const ARGUMENTS: Name = Name(3);
    /// Pre-interned `exports`.
    pub const EXPORTS: Name = Name(4);

    /// Strings interned at construction, in index order.
    pub(crate) const PRE_INTERNED: [&'static str; 5] =
        ["", "this", "super", "arguments", "exports"];

    /// Create from raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize` (for indexing into the interner's storage).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is the empty name.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::EMPTY => write!(f, "Name::EMPTY"),
            Self::THIS => write!(f, "Name::THIS"),
            Self::SUPER => write!(f, "Name::SUPER"),
            Self::ARGUMENTS => write!(f, "Name::ARGUMENTS"),
            Self::EXPORTS => write!(f, "Name::EXPORTS"),
            _ => write!(f, "Name({})", self.0),
        }
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}
