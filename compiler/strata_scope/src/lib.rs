//! Scope and flow-type layer of the Strata type checker.
//!
//! This crate provides:
//!
//! - **Declaration scopes** ([`ScopeTree`], [`ScopeId`], [`ScopeKind`]): the
//!   lexical scope tree built by the declaration pass, with qualified-name
//!   resolution that respects shadowing of the name's root, reserved names
//!   for scopes still under construction, and the `this` type of a scope.
//!
//! - **Declared variables** ([`TypedVar`], [`VarId`]): one per declaration,
//!   owned by the scope that declared it.
//!
//! - **Implicit variables** ([`ImplicitVar`]): `this`, `super` and
//!   `arguments`, synthesized on demand from the scope's role.
//!
//! - **Flow scopes** ([`FlowScope`], [`FlowSlot`]): persistent overlays of
//!   narrowed slot types at a program point, with cheap branching, lattice
//!   join at control-flow merges, compaction, and the equality used to detect
//!   a dataflow fixpoint.
//!
//! # Crate Dependencies
//!
//! `strata_scope` depends on `strata_ir` (for `Name`, `NodeId`, `InputUnit`)
//! and `strata_types` (for `Idx` and the [`TypeLattice`] contract). It never
//! builds or inspects types itself; every type question goes through the
//! lattice.
//!
//! [`TypeLattice`]: strata_types::TypeLattice

mod error;
mod flow;
mod implicit;
mod scope;
mod var;

#[cfg(test)]
mod test_helpers;

pub use error::ScopeError;
pub use flow::{FlowScope, FlowSlot};
pub use implicit::ImplicitVar;
pub use scope::{ScopeId, ScopeKind, ScopeTree};
pub use var::{TypedVar, VarId};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{FlowSlot, ScopeId, VarId};
    strata_ir::static_assert_size!(ScopeId, 4);
    strata_ir::static_assert_size!(VarId, 4);
    strata_ir::static_assert_size!(FlowSlot, 8);
}
