//! The type lattice contract.
//!
//! Flow analysis joins slot types at control-flow merges and compares them
//! to detect a fixpoint; implicit-variable synthesis asks a handful of
//! structural questions about receiver types. Those are the only things the
//! scope layer needs from the type algebra, and this trait is the whole of
//! that dependency.

use crate::Idx;

/// Queries the scope layer makes against the external type lattice.
///
/// Implementations that build new types (a union for `least_supertype`)
/// are expected to use interior mutability; every query takes `&self` so a
/// single lattice can be shared by all overlays of an analysis.
pub trait TypeLattice {
    /// Least upper bound of `a` and `b` (the "least supertype").
    fn least_supertype(&self, a: Idx, b: Idx) -> Idx;

    /// Lattice equality.
    ///
    /// Defaults to handle equality, which is exact for interning lattices.
    fn types_equal(&self, a: Idx, b: Idx) -> bool {
        a == b
    }

    /// Whether `ty` is an object type (something with properties and a
    /// prototype).
    fn is_object_type(&self, ty: Idx) -> bool;

    /// Whether `ty` is a function type.
    fn is_function_type(&self, ty: Idx) -> bool;

    /// The receiver (`this`) type of a function type.
    fn function_this_type(&self, function: Idx) -> Option<Idx>;

    /// Whether `ty` is the instance type of some constructor.
    fn is_instance_type(&self, ty: Idx) -> bool;

    /// The superclass constructor of an instance type's constructor.
    fn superclass_constructor(&self, instance: Idx) -> Option<Idx>;

    /// The instance type created by a constructor type.
    fn instance_type(&self, constructor: Idx) -> Option<Idx>;

    /// The implicit prototype of an object type.
    fn implicit_prototype(&self, object: Idx) -> Option<Idx>;

    /// Join two slot types, where `None` means "no type information".
    ///
    /// A slot untyped on one side takes the other side's type; it does not
    /// collapse to unknown.
    fn join_slot_types(&self, a: Option<Idx>, b: Option<Idx>) -> Option<Idx> {
        match (a, b) {
            (Some(a), Some(b)) => Some(self.least_supertype(a, b)),
            (Some(t), None) | (None, Some(t)) => Some(t),
            (None, None) => None,
        }
    }

    /// Equality of two slot types, where `None` only equals `None`.
    fn slot_types_equal(&self, a: Option<Idx>, b: Option<Idx>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => self.types_equal(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}
