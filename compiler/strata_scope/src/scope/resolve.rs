//! Name resolution over the scope tree.
//!
//! Simple names resolve to the nearest enclosing declaration. Qualified
//! names (`a.b.c`) are declared in the same scope as their root `a`, so they
//! resolve through the root: if an inner scope shadows `a`, the outer `a.b`
//! is no longer visible from there.

use strata_ir::Name;
use strata_types::Idx;

use super::ScopeTree;
use crate::{ScopeId, TypedVar};

impl ScopeTree {
    /// Exact lookup in `scope`'s own variables; no shadowing, no ancestors.
    pub fn get_own_slot(&self, scope: ScopeId, name: Name) -> Option<&TypedVar> {
        self.data(scope).slots.get(&name).map(|&id| self.var(id))
    }

    /// Resolve `name` as seen from `scope`, honoring shadowing of qualified
    /// names.
    ///
    /// Lookup order:
    /// 1. `scope`'s own variables (a name declared here is never shadowed).
    /// 2. Nothing else if `scope` is a root.
    /// 3. For a simple name, the nearest ancestor declaring it.
    /// 4. For a qualified name, the scope declaring its root identifier; if
    ///    the root is declared nowhere, the global scope's own variables
    ///    (externs may declare `a.b` without declaring `a`).
    ///
    /// Implicit variables (`this`, `super`, `arguments`) are never declared
    /// and do not resolve here; see [`ScopeTree::implicit_var`].
    pub fn get_var(&self, scope: ScopeId, name: Name) -> Option<&TypedVar> {
        if let Some(own) = self.get_own_slot(scope, name) {
            return Some(own);
        }
        self.parent(scope)?;

        let full = self.interner.lookup(name);
        let Some(dot) = full.find('.') else {
            return self.lookup_in_ancestors(scope, name);
        };

        // A root nobody ever interned cannot have been declared.
        let root_var = self
            .interner
            .get(&full[..dot])
            .and_then(|root| self.lookup_in_ancestors(scope, root));
        match root_var {
            Some(root_var) => self.get_own_slot(root_var.scope(), name),
            None => self.get_own_slot(self.root_of(scope), name),
        }
    }

    /// The declared type of `name` as seen from `scope`.
    pub fn declared_type(&self, scope: ScopeId, name: Name) -> Option<Idx> {
        self.get_var(scope, name).and_then(TypedVar::ty)
    }

    /// The nearest scope, starting at `scope` and walking outwards, that
    /// either declares `name` or has reserved it for a later declaration.
    ///
    /// Meaningful while the tree is still being built: it answers where a
    /// name *will* live, which `get_var` cannot.
    pub fn get_topmost_scope_of_eventual_declaration(
        &self,
        scope: ScopeId,
        name: Name,
    ) -> Option<ScopeId> {
        self.ancestors(scope).find(|&s| {
            let data = self.data(s);
            data.slots.contains_key(&name) || data.reserved.contains(&name)
        })
    }

    /// Whether `name` means the same variable, or is undeclared, from both
    /// `from` and `to`.
    pub fn same_binding(&self, from: ScopeId, to: ScopeId, name: Name) -> bool {
        from == to
            || self.get_var(from, name).map(TypedVar::scope)
                == self.get_var(to, name).map(TypedVar::scope)
    }

    /// Ordinary ancestor-chain lookup without any qualified-name handling.
    fn lookup_in_ancestors(&self, scope: ScopeId, name: Name) -> Option<&TypedVar> {
        self.ancestors(scope).find_map(|s| self.get_own_slot(s, name))
    }

    /// The depth-0 scope `scope` hangs from.
    fn root_of(&self, scope: ScopeId) -> ScopeId {
        self.ancestors(scope).last().unwrap_or(scope)
    }
}
