//! Implicit variables: `this`, `super`, `arguments` and `exports`.
//!
//! These are never declared. A scope whose role introduces one of them
//! "owns" that implicit slot, and the variable is synthesized on request
//! from the scope's root type through the [`TypeLattice`].

use strata_ir::Name;
use strata_types::{Idx, TypeLattice};

use crate::{ScopeId, ScopeKind, ScopeTree, TypedVar};

/// A binding every function-like scope has without declaring it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImplicitVar {
    This,
    Super,
    Arguments,
    /// Module `exports`. Owned by no scope: callers treat it as an ordinary
    /// declared variable.
    Exports,
}

impl ImplicitVar {
    pub const ALL: [ImplicitVar; 4] = [
        ImplicitVar::This,
        ImplicitVar::Super,
        ImplicitVar::Arguments,
        ImplicitVar::Exports,
    ];

    /// The pre-interned name of the binding.
    #[inline]
    pub const fn name(self) -> Name {
        match self {
            ImplicitVar::This => Name::THIS,
            ImplicitVar::Super => Name::SUPER,
            ImplicitVar::Arguments => Name::ARGUMENTS,
            ImplicitVar::Exports => Name::EXPORTS,
        }
    }

    /// The implicit variable spelled `name`, if any.
    pub fn from_name(name: Name) -> Option<Self> {
        Self::ALL.into_iter().find(|var| var.name() == name)
    }

    /// Whether a scope of `kind` introduces this binding.
    ///
    /// `this` and `super` are rebound by every non-arrow function and by
    /// class member initializers; `arguments` only by non-arrow functions.
    pub const fn is_made_by(self, kind: ScopeKind) -> bool {
        match self {
            ImplicitVar::This | ImplicitVar::Super => matches!(
                kind,
                ScopeKind::Function { arrow: false }
                    | ScopeKind::StaticBlock
                    | ScopeKind::FieldInit { .. }
            ),
            ImplicitVar::Arguments => matches!(kind, ScopeKind::Function { arrow: false }),
            ImplicitVar::Exports => false,
        }
    }
}

impl ScopeTree {
    /// The type of `this` inside `scope`.
    ///
    /// - global: the global object type (the root type, if it is an object)
    /// - non-arrow function: the function type's receiver, or `None` if the
    ///   function has not been typed yet
    /// - static block: the enclosing class's constructor type
    /// - field initializer: the class constructor for static fields, its
    ///   instance type otherwise
    /// - anything else: whatever the parent says
    ///
    /// # Panics
    ///
    /// Panics if a non-root scope has no parent, or if an instance field's
    /// enclosing class type has no instance type.
    pub fn type_of_this(&self, scope: ScopeId, lattice: &dyn TypeLattice) -> Option<Idx> {
        match self.kind(scope) {
            ScopeKind::Global => self
                .root_type(scope)
                .filter(|&ty| lattice.is_object_type(ty)),
            ScopeKind::Bottom => None,
            ScopeKind::Function { arrow: false } => self
                .root_type(scope)
                .filter(|&ty| lattice.is_function_type(ty))
                .and_then(|function| lattice.function_this_type(function)),
            ScopeKind::StaticBlock => self.root_type(self.expect_parent(scope)),
            ScopeKind::FieldInit { is_static } => {
                let class = self.root_type(self.expect_parent(scope))?;
                if is_static {
                    return Some(class);
                }
                let instance = lattice.instance_type(class);
                assert!(
                    instance.is_some(),
                    "instance field in {scope:?} belongs to {class}, which is not a constructor"
                );
                instance
            }
            ScopeKind::Function { arrow: true } | ScopeKind::Block | ScopeKind::Module => {
                self.type_of_this(self.expect_parent(scope), lattice)
            }
        }
    }

    /// Whether `scope` itself introduces the implicit binding `var`.
    #[inline]
    pub fn has_own_implicit_slot(&self, scope: ScopeId, var: ImplicitVar) -> bool {
        var.is_made_by(self.kind(scope))
    }

    /// Synthesize the implicit variable `var` as owned by `scope`.
    ///
    /// Returns `None` at the global scope and for `exports`. The result has
    /// no id, no declaring node, no input unit and no ordinal.
    pub fn make_implicit_var(
        &self,
        scope: ScopeId,
        var: ImplicitVar,
        lattice: &dyn TypeLattice,
    ) -> Option<TypedVar> {
        if self.is_global(scope) || var == ImplicitVar::Exports {
            return None;
        }
        Some(TypedVar {
            id: None,
            name: var.name(),
            decl: None,
            ty: self.implicit_var_type(scope, var, lattice),
            scope,
            ordinal: None,
            input: None,
            inferred: false,
        })
    }

    /// Resolve `var` as seen from `scope`: synthesized at the nearest scope
    /// (starting with `scope`) that owns the slot.
    pub fn implicit_var(
        &self,
        scope: ScopeId,
        var: ImplicitVar,
        lattice: &dyn TypeLattice,
    ) -> Option<TypedVar> {
        let owner = self
            .ancestors(scope)
            .find(|&s| self.has_own_implicit_slot(s, var))?;
        self.make_implicit_var(owner, var, lattice)
    }

    fn implicit_var_type(
        &self,
        scope: ScopeId,
        var: ImplicitVar,
        lattice: &dyn TypeLattice,
    ) -> Option<Idx> {
        match var {
            ImplicitVar::Arguments => {
                let global = self.ancestors(scope).last().unwrap_or(scope);
                self.get_own_slot(global, Name::ARGUMENTS)
                    .filter(|args| args.is_extern())
                    .and_then(TypedVar::ty)
            }
            ImplicitVar::This => self.type_of_this(scope, lattice),
            // Property accesses on `super` see the superclass instance; calls
            // to `super()` would see its constructor, which is not modeled.
            ImplicitVar::Super => {
                let receiver = self
                    .type_of_this(scope, lattice)
                    .filter(|&ty| lattice.is_object_type(ty))?;
                if lattice.is_instance_type(receiver) {
                    lattice
                        .superclass_constructor(receiver)
                        .and_then(|ctor| lattice.instance_type(ctor))
                } else {
                    lattice.implicit_prototype(receiver)
                }
            }
            ImplicitVar::Exports => unreachable!("scopes never synthesize an implicit `exports`"),
        }
    }

    fn expect_parent(&self, scope: ScopeId) -> ScopeId {
        self.parent(scope).unwrap_or_else(|| {
            panic!("{:?} scope {scope:?} has no parent", self.kind(scope))
        })
    }
}

#[cfg(test)]
mod tests;
