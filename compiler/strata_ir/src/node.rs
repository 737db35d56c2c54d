//! Syntax handles handed to the scope layer by the declaration pass.
//!
//! The scope layer never walks syntax. It only needs to remember which node
//! created a scope or declared a variable, and, for declarations, which
//! syntactic form did the declaring.

/// Handle to a syntax node in the parser's arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a node ID from a raw index.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// The syntactic form that introduced a declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum DeclForm {
    /// `var x` (hoisted, starts out `undefined`).
    Var,
    /// `let x`.
    Let,
    /// `const x`.
    Const,
    /// Function parameter.
    Param,
    /// Function declaration.
    Function,
    /// Class declaration.
    Class,
    /// `catch (e)` binding.
    Catch,
    /// Import binding.
    Import,
    /// Assignment to a qualified name (`a.b = ...`).
    QualifiedName,
}

impl DeclForm {
    /// Whether the binding is hoisted to the top of its function with an
    /// initial value of `undefined`.
    #[inline]
    pub const fn is_value_hoisting(self) -> bool {
        matches!(self, DeclForm::Var)
    }
}

/// A declaring node: the name node plus the form of its parent declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeclNode {
    pub node: NodeId,
    pub form: DeclForm,
}

impl DeclNode {
    #[inline]
    pub const fn new(node: NodeId, form: DeclForm) -> Self {
        Self { node, form }
    }
}

/// Handle to a compilation unit (one source file or one externs file).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct InputId(u32);

impl InputId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// The compilation unit a declaration came from.
///
/// Extern units describe APIs implemented elsewhere; everything declared in
/// one is an extern.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InputUnit {
    pub id: InputId,
    pub is_extern: bool,
}

impl InputUnit {
    /// A regular source unit.
    #[inline]
    pub const fn source(id: InputId) -> Self {
        Self {
            id,
            is_extern: false,
        }
    }

    /// An externs unit.
    #[inline]
    pub const fn externs(id: InputId) -> Self {
        Self {
            id,
            is_extern: true,
        }
    }
}

/// Opaque handle to the module a scope belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ModuleId(u32);

impl ModuleId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}
