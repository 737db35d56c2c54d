//! Strata IR - identifier and syntax handles.
//!
//! This crate holds the small, copyable values the scope layer receives
//! from its collaborators:
//! - `Name` for interned identifiers (simple and dotted)
//! - `StringInterner` / `SharedInterner` for turning strings into names
//! - `NodeId`, `DeclNode` and `DeclForm` for declaring/root syntax nodes
//! - `InputUnit` for the compilation unit a declaration came from
//! - `ModuleId` for the opaque module handle carried by a scope
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → Name(u32)
//! - **Handles, not references**: syntax lives in the parser's arena; the
//!   scope layer only stores `NodeId` handles into it.

mod interner;
mod name;
mod node;

pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use node::{DeclForm, DeclNode, InputId, InputUnit, ModuleId, NodeId};

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-copied handles.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{DeclNode, Name, NodeId};
    crate::static_assert_size!(Name, 4);
    crate::static_assert_size!(NodeId, 4);
    // NodeId (4) + DeclForm (1) + padding
    crate::static_assert_size!(DeclNode, 8);
}
