//! Flow scopes: persistent overlays of narrowed slot types.
//!
//! A [`FlowScope`] is one layer in a chain rooted at an *entry lattice*.
//! Each layer records only the slots whose type was refined at that layer;
//! the effective type of a slot is the first layer (walking towards the
//! root) that mentions it, falling back to the type declared in the
//! layer's declaration scope.
//!
//! Refinements are keyed by name, so every refinement in a chain means the
//! variable that name resolves to from the top layer's declaration scope.
//! Changing scope with [`FlowScope::create_child_flow_scope_in`] and joining
//! with [`FlowScope::join`] drop the refinements that would change meaning.
//!
//! # Sharing
//!
//! Layers are reference counted. `create_child_flow_scope` is O(1) and
//! never copies the parent. Writes go through [`Rc::make_mut`], so a layer
//! that has already been taken as a parent is never changed underneath its
//! children: the writer gets a private copy instead.
//!
//! # Compaction
//!
//! Straight-line code and loops grow chains linearly. [`FlowScope::optimize`]
//! folds a chain into a single layer over its entry lattice without changing
//! any slot's effective type; the dataflow driver decides when to call it.

mod join;

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use strata_ir::Name;
use strata_types::{Idx, TypeLattice};

use crate::{ImplicitVar, ScopeId, ScopeTree};

/// A slot refined somewhere along a flow chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FlowSlot {
    pub name: Name,
    pub ty: Idx,
}

/// One layer of a flow chain.
#[derive(Clone)]
struct FlowLayer {
    parent: Option<FlowScope>,
    /// Declaration scope in effect at this layer.
    scope: ScopeId,
    /// Slots refined at this layer.
    slots: FxHashMap<Name, Idx>,
    /// Number of layers above the entry lattice (0 for an entry lattice).
    depth: u32,
}

impl Drop for FlowLayer {
    // Unlink the chain iteratively. Dropping a long chain recursively would
    // overflow the stack.
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(FlowScope(layer)) = next {
            match Rc::try_unwrap(layer) {
                Ok(mut layer) => next = layer.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// Narrowed slot types at one program point.
///
/// Cloning is O(1) and shares the whole chain.
#[derive(Clone)]
pub struct FlowScope(Rc<FlowLayer>);

impl FlowScope {
    /// The flow scope at the entry of `scope`: every slot has exactly its
    /// declared type.
    pub fn create_entry_lattice(scope: ScopeId) -> Self {
        FlowScope(Rc::new(FlowLayer {
            parent: None,
            scope,
            slots: FxHashMap::default(),
            depth: 0,
        }))
    }

    /// A new, empty layer on top of this one, in the same declaration scope.
    #[must_use]
    pub fn create_child_flow_scope(&self) -> Self {
        self.push_layer(self.0.scope)
    }

    /// A new layer whose slots fall back to the declarations of `scope`
    /// (entering or leaving a block).
    ///
    /// Refinements of names that mean a different variable from `scope` are
    /// dropped: a block-local leaving scope, or an outer variable shadowed
    /// by the block being entered. If anything is dropped, the result is a
    /// single layer over a fresh entry lattice of `scope` rather than a child
    /// of this one.
    #[must_use]
    pub fn create_child_flow_scope_in(&self, tree: &ScopeTree, scope: ScopeId) -> Self {
        if scope == self.0.scope {
            return self.push_layer(scope);
        }
        let mut slots = self.flatten();
        let before = slots.len();
        slots.retain(|&name, _| tree.same_binding(self.0.scope, scope, name));
        if slots.len() == before {
            return self.push_layer(scope);
        }

        tracing::trace!(
            from = self.0.scope.raw(),
            to = scope.raw(),
            dropped = before - slots.len(),
            "trimmed refinements at scope change"
        );
        FlowScope(Rc::new(FlowLayer {
            parent: Some(FlowScope::create_entry_lattice(scope)),
            scope,
            slots,
            depth: 1,
        }))
    }

    fn push_layer(&self, scope: ScopeId) -> Self {
        FlowScope(Rc::new(FlowLayer {
            parent: Some(self.clone()),
            scope,
            slots: FxHashMap::default(),
            depth: self.0.depth + 1,
        }))
    }

    /// Refine `name` to `ty` in this layer. The last write wins.
    ///
    /// If the layer is shared (it has children, or other clones of this
    /// handle exist), this handle is repointed at a private copy first.
    pub fn infer_slot_type(&mut self, name: Name, ty: Idx) {
        Rc::make_mut(&mut self.0).slots.insert(name, ty);
    }

    /// The declaration scope in effect.
    #[inline]
    pub fn declaration_scope(&self) -> ScopeId {
        self.0.scope
    }

    /// Number of layers between this one and its entry lattice.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.0.depth
    }

    pub fn parent(&self) -> Option<&FlowScope> {
        self.0.parent.as_ref()
    }

    /// Whether both handles point at the same layer.
    #[inline]
    pub fn ptr_eq(&self, other: &FlowScope) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Whether this flow scope describes unreachable code.
    pub fn is_bottom(&self, tree: &ScopeTree) -> bool {
        tree.is_bottom(self.0.scope)
    }

    /// The effective type of `name`: the nearest refinement, else the type
    /// declared for `name` in this layer's declaration scope.
    ///
    /// Implicit variables have no declaration to fall back to; use
    /// [`FlowScope::get_implicit_slot`] for them.
    pub fn get_slot(&self, tree: &ScopeTree, name: Name) -> Option<Idx> {
        self.refined_type(name)
            .or_else(|| tree.declared_type(self.0.scope, name))
    }

    /// The effective type of the implicit variable `var`: the nearest
    /// refinement, else the type synthesized for it by the scope that owns
    /// it.
    pub fn get_implicit_slot(
        &self,
        tree: &ScopeTree,
        var: ImplicitVar,
        lattice: &dyn TypeLattice,
    ) -> Option<Idx> {
        self.refined_type(var.name()).or_else(|| {
            tree.implicit_var(self.0.scope, var, lattice)
                .and_then(|v| v.ty())
        })
    }

    /// Names refined anywhere along the chain, sorted.
    pub fn slot_names(&self) -> Vec<Name> {
        let mut names: Vec<Name> = self.flatten().into_keys().collect();
        names.sort_unstable();
        names
    }

    /// If exactly one distinct slot was refined in the layers between this
    /// one (inclusive) and its ancestor `other` (exclusive), that slot and
    /// its type here.
    ///
    /// `None` if `other` is not an ancestor of this layer, or if zero or
    /// several slots were refined.
    pub fn find_unique_refined_slot(&self, other: &FlowScope) -> Option<FlowSlot> {
        let mut unique: Option<Name> = None;
        let mut current = self;
        while !current.ptr_eq(other) {
            for &name in current.0.slots.keys() {
                match unique {
                    Some(seen) if seen != name => return None,
                    _ => unique = Some(name),
                }
            }
            current = current.parent()?;
        }
        let name = unique?;
        let ty = self.refined_type(name)?;
        Some(FlowSlot { name, ty })
    }

    /// An equivalent flow scope with at most one layer over the entry
    /// lattice.
    ///
    /// Calling this on an already compact scope returns it (or its parent,
    /// for an empty child) unchanged.
    #[tracing::instrument(level = "trace", skip_all, fields(depth = self.depth()))]
    #[must_use]
    pub fn optimize(&self) -> Self {
        if self.0.depth <= 1 {
            return match &self.0.parent {
                Some(parent) if self.0.slots.is_empty() && parent.0.scope == self.0.scope => {
                    parent.clone()
                }
                _ => self.clone(),
            };
        }

        let mut entry = self;
        let mut slots = FxHashMap::default();
        while let Some(parent) = entry.parent() {
            for (&name, &ty) in &entry.0.slots {
                slots.entry(name).or_insert(ty);
            }
            entry = parent;
        }

        if slots.is_empty() && entry.0.scope == self.0.scope {
            return entry.clone();
        }
        tracing::trace!(from = self.0.depth, slots = slots.len(), "compacted flow chain");
        FlowScope(Rc::new(FlowLayer {
            parent: Some(entry.clone()),
            scope: self.0.scope,
            slots,
            depth: 1,
        }))
    }

    /// Overlay equality: the same effective type for every name refined in
    /// either chain, and, when the declaration scopes differ, for every name
    /// visible from either of them.
    ///
    /// Independent of chain shape; this is the fixpoint test of the dataflow
    /// driver.
    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(lhs = self.depth(), rhs = other.depth())
    )]
    pub fn flow_equals(
        &self,
        other: &FlowScope,
        tree: &ScopeTree,
        lattice: &dyn TypeLattice,
    ) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.is_bottom(tree) != other.is_bottom(tree) {
            return false;
        }

        let lhs = self.flatten();
        let rhs = other.flatten();
        let effective = |flow: &FlowScope, refined: &FxHashMap<Name, Idx>, name: Name| {
            refined
                .get(&name)
                .copied()
                .or_else(|| tree.declared_type(flow.0.scope, name))
        };
        let same = |name: Name| {
            lattice.slot_types_equal(effective(self, &lhs, name), effective(other, &rhs, name))
        };

        if !lhs.keys().chain(rhs.keys()).all(|&name| same(name)) {
            return false;
        }
        if self.0.scope == other.0.scope {
            return true;
        }
        tree.visible_names(self.0.scope)
            .chain(tree.visible_names(other.0.scope))
            .all(same)
    }

    /// The nearest refinement of `name`, ignoring declarations.
    fn refined_type(&self, name: Name) -> Option<Idx> {
        let mut current = Some(self);
        while let Some(flow) = current {
            if let Some(&ty) = flow.0.slots.get(&name) {
                return Some(ty);
            }
            current = flow.parent();
        }
        None
    }

    /// Every refinement along the chain, nearest first.
    fn flatten(&self) -> FxHashMap<Name, Idx> {
        let mut slots = FxHashMap::default();
        let mut current = Some(self);
        while let Some(flow) = current {
            for (&name, &ty) in &flow.0.slots {
                slots.entry(name).or_insert(ty);
            }
            current = flow.parent();
        }
        slots
    }
}

impl fmt::Debug for FlowScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut slots: Vec<_> = self.0.slots.iter().collect();
        slots.sort_unstable_by_key(|&(name, _)| *name);
        f.debug_struct("FlowScope")
            .field("scope", &self.0.scope)
            .field("depth", &self.0.depth)
            .field("slots", &slots)
            .finish_non_exhaustive()
    }
}
