//! Declared variables.

use strata_ir::{DeclForm, DeclNode, InputUnit, Name, NodeId};
use strata_types::Idx;

use crate::ScopeId;

/// Variable ID within a [`ScopeTree`](crate::ScopeTree).
///
/// IDs are allocated sequentially across the whole tree, in declaration
/// order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct VarId(u32);

impl VarId {
    /// Create a new variable ID from a raw index.
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize` (for indexing into `Vec`s).
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A declared identifier and its (possibly absent) type.
///
/// Created once by the declaration pass. The type may be replaced later
/// during inference; nothing else changes after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedVar {
    /// `None` for implicit variables, which are synthesized and never stored.
    pub(crate) id: Option<VarId>,
    pub(crate) name: Name,
    pub(crate) decl: Option<DeclNode>,
    pub(crate) ty: Option<Idx>,
    pub(crate) scope: ScopeId,
    /// Position among the owning scope's declarations; `None` for implicit
    /// variables.
    pub(crate) ordinal: Option<u32>,
    pub(crate) input: Option<InputUnit>,
    pub(crate) inferred: bool,
}

impl TypedVar {
    pub fn id(&self) -> Option<VarId> {
        self.id
    }

    pub fn name(&self) -> Name {
        self.name
    }

    /// The declaring node, or `None` for synthetic variables.
    pub fn decl_node(&self) -> Option<NodeId> {
        self.decl.map(|d| d.node)
    }

    /// The form of the declaration that introduced this variable.
    pub fn decl_form(&self) -> Option<DeclForm> {
        self.decl.map(|d| d.form)
    }

    /// The declared type; `None` means untyped.
    pub fn ty(&self) -> Option<Idx> {
        self.ty
    }

    pub fn set_type(&mut self, ty: Option<Idx>) {
        self.ty = ty;
    }

    /// The scope that owns this variable.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn ordinal(&self) -> Option<u32> {
        self.ordinal
    }

    pub fn input(&self) -> Option<InputUnit> {
        self.input
    }

    /// Whether the type was inferred rather than declared.
    pub fn is_inferred(&self) -> bool {
        self.inferred
    }

    /// Whether the variable was declared in an externs unit.
    pub fn is_extern(&self) -> bool {
        self.input.is_some_and(|input| input.is_extern)
    }

    pub fn is_implicit(&self) -> bool {
        self.id.is_none()
    }

    /// A `var` that has no type yet.
    ///
    /// Such variables can start type inference as `undefined` rather than
    /// unknown. Parameters and externs are not initialized by the function
    /// body, and `let`/`const` are initialized at their declaration before
    /// any use, so none of those qualify.
    pub fn is_declaratively_unbound_without_type(&self) -> bool {
        self.ty.is_none()
            && !self.is_extern()
            && self.decl.is_some_and(|d| d.form.is_value_hoisting())
    }
}
