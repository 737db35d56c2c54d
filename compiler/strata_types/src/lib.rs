//! Type handles for the Strata scope layer.
//!
//! The type algebra (subtyping, unions, object structure) lives outside this
//! workspace. The scope layer sees types only as:
//! - `Idx`: a 32-bit handle to a type value owned by the type lattice
//! - `TypeLattice`: the queries it is allowed to make about those handles
//!
//! "No type" is never an `Idx`; it is `Option<Idx>::None` everywhere.

mod idx;
mod lattice;

pub use idx::Idx;
pub use lattice::TypeLattice;
