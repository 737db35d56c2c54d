//! Scope construction errors.
//!
//! Every variant is an internal-invariant violation: a bug in the
//! declaration pass, never bad user input. The panicking entry points
//! (`declare`, `validate_completely_built`) turn these into crashes; the
//! `try_` variants hand them back for callers that want to report instead.

use crate::ScopeId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    /// A declaration was attempted with the empty name.
    #[error("cannot declare a variable with an empty name in {scope:?}")]
    EmptyName { scope: ScopeId },

    /// A name was declared twice in the same scope.
    #[error("`{name}` is already declared in {scope:?}")]
    DuplicateName { scope: ScopeId, name: String },

    /// A scope was declared complete while names reserved for it were never
    /// declared.
    #[error(
        "expected {scope:?} to have no reserved names, found: {names:?}; \
         the declaration pass failed to declare a variable"
    )]
    ReservedNamesRemain { scope: ScopeId, names: Vec<String> },
}
