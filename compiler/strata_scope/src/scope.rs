//! Declaration scope tree.
//!
//! One scope per lexical construct that introduces bindings (the global
//! scope, functions, blocks, class static blocks, field initializers). All
//! scopes and all their variables live in a single [`ScopeTree`] arena and
//! are addressed by [`ScopeId`] / [`VarId`] handles, so a scope's parent is
//! a handle rather than a reference.
//!
//! # Lifecycle
//!
//! The declaration pass creates scopes top-down, optionally with a set of
//! *reserved* names (simple names it already knows will be declared in that
//! scope), then calls [`ScopeTree::declare`] once per declaration in source
//! order. Declaring a reserved name removes it from the set; the set only
//! ever shrinks. Before flow analysis starts, every scope must pass
//! [`ScopeTree::validate_completely_built`]. After that the tree is read-only
//! apart from [`ScopeTree::var_mut`] updating inferred types.
//!
//! # Lattice bottom
//!
//! [`ScopeTree::create_lattice_bottom`] creates a parentless sentinel scope
//! used as the declaration scope of unreachable code. It never holds
//! variables and never has children.

mod resolve;

use rustc_hash::{FxHashMap, FxHashSet};
use strata_ir::{DeclNode, InputUnit, ModuleId, Name, NodeId, SharedInterner};
use strata_types::Idx;

use crate::{ScopeError, TypedVar, VarId};

/// Scope ID within a [`ScopeTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    /// Create a new scope ID from a raw index.
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

/// The syntactic role of a scope.
///
/// Determines what `this` means inside the scope and which implicit
/// variables the scope owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// The root of the tree.
    Global,
    /// The lattice-bottom sentinel for unreachable code.
    Bottom,
    /// A function body. Arrow functions inherit `this` from their parent.
    Function { arrow: bool },
    /// A block (`{ }`, loop body, `catch`, class body).
    Block,
    /// A class static initialization block.
    StaticBlock,
    /// A class field initializer (member field or computed field value).
    FieldInit { is_static: bool },
    /// A module body.
    Module,
}

impl ScopeKind {
    /// Whether scopes of this kind may only appear at depth 0.
    #[inline]
    pub const fn is_root(self) -> bool {
        matches!(self, ScopeKind::Global | ScopeKind::Bottom)
    }
}

/// Per-scope storage.
#[derive(Debug)]
struct ScopeData {
    parent: Option<ScopeId>,
    depth: u32,
    root: NodeId,
    kind: ScopeKind,
    /// Annotated type of the root node, once the checker has computed it.
    root_type: Option<Idx>,
    module: Option<ModuleId>,
    /// Own variables by name.
    slots: FxHashMap<Name, VarId>,
    /// Own variables in declaration order.
    vars: Vec<VarId>,
    /// Simple names that will eventually be declared here. Only shrinks.
    reserved: FxHashSet<Name>,
}

/// Arena of declaration scopes and their variables.
pub struct ScopeTree {
    scopes: Vec<ScopeData>,
    vars: Vec<TypedVar>,
    interner: SharedInterner,
}

impl ScopeTree {
    /// Create a tree holding only the global scope, rooted at `global_root`.
    pub fn new(interner: SharedInterner, global_root: NodeId) -> Self {
        let mut tree = ScopeTree {
            scopes: Vec::new(),
            vars: Vec::new(),
            interner,
        };
        tree.push_scope(None, global_root, ScopeKind::Global, FxHashSet::default(), None);
        tree
    }

    /// The global scope.
    #[inline]
    pub fn global(&self) -> ScopeId {
        ScopeId::new(0)
    }

    /// The interner that resolves the names stored in this tree.
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Create a lattice-bottom sentinel scope.
    pub fn create_lattice_bottom(&mut self, root: NodeId) -> ScopeId {
        self.push_scope(None, root, ScopeKind::Bottom, FxHashSet::default(), None)
    }

    /// Create a child scope with no reserved names and no module.
    pub fn create_scope(&mut self, parent: ScopeId, root: NodeId, kind: ScopeKind) -> ScopeId {
        self.create_scope_with_reserved(parent, root, kind, [], None)
    }

    /// Create a child scope.
    ///
    /// `reserved` lists simple names the declaration pass will declare in
    /// this scope later; until then [`Self::get_topmost_scope_of_eventual_declaration`]
    /// reports them as belonging here.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is a root kind, if `parent` is a lattice bottom, or
    /// if the child reuses its parent's root node. Debug builds also reject
    /// a qualified (dotted) reserved name.
    pub fn create_scope_with_reserved(
        &mut self,
        parent: ScopeId,
        root: NodeId,
        kind: ScopeKind,
        reserved: impl IntoIterator<Item = Name>,
        module: Option<ModuleId>,
    ) -> ScopeId {
        assert!(
            !kind.is_root(),
            "{kind:?} scopes cannot have a parent (creating child of {parent:?})"
        );
        let parent_data = self.data(parent);
        assert!(
            parent_data.kind != ScopeKind::Bottom,
            "lattice bottom {parent:?} cannot have child scopes"
        );
        assert!(
            parent_data.root != root,
            "child scope must not share root node {root:?} with its parent {parent:?}"
        );
        let reserved: FxHashSet<Name> = reserved.into_iter().collect();
        debug_assert!(
            reserved.iter().all(|&n| !self.interner.lookup(n).contains('.')),
            "reserved names must be simple identifiers, got a qualified name in {reserved:?}"
        );
        self.push_scope(Some(parent), root, kind, reserved, module)
    }

    fn push_scope(
        &mut self,
        parent: Option<ScopeId>,
        root: NodeId,
        kind: ScopeKind,
        reserved: FxHashSet<Name>,
        module: Option<ModuleId>,
    ) -> ScopeId {
        let id = ScopeId::new(
            u32::try_from(self.scopes.len())
                .unwrap_or_else(|_| panic!("scope count exceeds u32::MAX")),
        );
        let depth = parent.map_or(0, |p| self.data(p).depth + 1);
        tracing::debug!(
            scope = id.raw(),
            parent = ?parent,
            ?kind,
            depth,
            reserved = reserved.len(),
            "created scope"
        );
        self.scopes.push(ScopeData {
            parent,
            depth,
            root,
            kind,
            root_type: None,
            module,
            slots: FxHashMap::default(),
            vars: Vec::new(),
            reserved,
        });
        id
    }

    #[inline]
    fn data(&self, scope: ScopeId) -> &ScopeData {
        debug_assert!(
            scope.index() < self.scopes.len(),
            "ScopeId {} out of bounds (have {} scopes)",
            scope.raw(),
            self.scopes.len(),
        );
        &self.scopes[scope.index()]
    }

    #[inline]
    fn data_mut(&mut self, scope: ScopeId) -> &mut ScopeData {
        &mut self.scopes[scope.index()]
    }

    // === Declaration ===

    /// Declare `name` in `scope`.
    ///
    /// # Panics
    ///
    /// Panics on any [`ScopeError`], and when declaring into a lattice
    /// bottom. Use [`Self::try_declare`] to get the error instead.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: Name,
        decl: Option<DeclNode>,
        ty: Option<Idx>,
        input: Option<InputUnit>,
        inferred: bool,
    ) -> VarId {
        self.try_declare(scope, name, decl, ty, input, inferred)
            .unwrap_or_else(|e| panic!("{}", e))
    }

    /// Declare `name` in `scope`, returning an error instead of panicking.
    ///
    /// The new variable's ordinal is the number of variables the scope
    /// already had. Declaring a reserved name un-reserves it; dotted names
    /// are never reserved.
    pub fn try_declare(
        &mut self,
        scope: ScopeId,
        name: Name,
        decl: Option<DeclNode>,
        ty: Option<Idx>,
        input: Option<InputUnit>,
        inferred: bool,
    ) -> Result<VarId, ScopeError> {
        assert!(
            !self.is_bottom(scope),
            "cannot declare variables in lattice bottom {scope:?}"
        );
        if name.is_empty() {
            return Err(ScopeError::EmptyName { scope });
        }
        if self.data(scope).slots.contains_key(&name) {
            return Err(ScopeError::DuplicateName {
                scope,
                name: self.interner.lookup(name).to_owned(),
            });
        }

        let id = VarId::new(
            u32::try_from(self.vars.len())
                .unwrap_or_else(|_| panic!("variable count exceeds u32::MAX")),
        );
        let data = self.data_mut(scope);
        if !data.reserved.is_empty() {
            data.reserved.remove(&name);
        }
        let ordinal = u32::try_from(data.vars.len())
            .unwrap_or_else(|_| panic!("scope variable count exceeds u32::MAX"));
        data.slots.insert(name, id);
        data.vars.push(id);

        tracing::trace!(scope = scope.raw(), name = name.raw(), ordinal, "declared");

        self.vars.push(TypedVar {
            id: Some(id),
            name,
            decl,
            ty,
            scope,
            ordinal: Some(ordinal),
            input,
            inferred,
        });
        Ok(id)
    }

    // === Validation ===

    /// Assert that every name reserved for `scope` has been declared.
    ///
    /// # Panics
    ///
    /// Panics with [`ScopeError::ReservedNamesRemain`] if any remain.
    pub fn validate_completely_built(&mut self, scope: ScopeId) {
        self.try_validate_completely_built(scope)
            .unwrap_or_else(|e| panic!("{}", e));
    }

    /// Check that every name reserved for `scope` has been declared.
    ///
    /// On success the (empty) reserved set is replaced by a fresh one so its
    /// allocation is released.
    pub fn try_validate_completely_built(&mut self, scope: ScopeId) -> Result<(), ScopeError> {
        let data = self.data(scope);
        if !data.reserved.is_empty() {
            let mut names: Vec<&str> = data
                .reserved
                .iter()
                .map(|&n| self.interner.lookup(n))
                .collect();
            names.sort_unstable();
            tracing::debug!(
                scope = scope.raw(),
                remaining = names.len(),
                "scope not completely built"
            );
            return Err(ScopeError::ReservedNamesRemain {
                scope,
                names: names.into_iter().map(str::to_owned).collect(),
            });
        }
        self.data_mut(scope).reserved = FxHashSet::default();
        Ok(())
    }

    /// Run [`Self::try_validate_completely_built`] over every scope in the
    /// tree, stopping at the first failure.
    pub fn validate_all(&mut self) -> Result<(), ScopeError> {
        for index in 0..self.scopes.len() {
            let scope = ScopeId::new(
                u32::try_from(index).unwrap_or_else(|_| panic!("scope count exceeds u32::MAX")),
            );
            self.try_validate_completely_built(scope)?;
        }
        Ok(())
    }

    // === Accessors ===

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.data(scope).parent
    }

    /// 0 at the global scope and at bottoms, parent's depth + 1 otherwise.
    pub fn depth(&self, scope: ScopeId) -> u32 {
        self.data(scope).depth
    }

    pub fn root_node(&self, scope: ScopeId) -> NodeId {
        self.data(scope).root
    }

    pub fn kind(&self, scope: ScopeId) -> ScopeKind {
        self.data(scope).kind
    }

    pub fn module(&self, scope: ScopeId) -> Option<ModuleId> {
        self.data(scope).module
    }

    pub fn is_bottom(&self, scope: ScopeId) -> bool {
        self.data(scope).kind == ScopeKind::Bottom
    }

    pub fn is_global(&self, scope: ScopeId) -> bool {
        self.data(scope).kind == ScopeKind::Global
    }

    /// The annotated type of the scope's root node.
    pub fn root_type(&self, scope: ScopeId) -> Option<Idx> {
        self.data(scope).root_type
    }

    /// Record the annotated type of the scope's root node (a function's
    /// type, a class's constructor type, the global object type).
    pub fn set_root_type(&mut self, scope: ScopeId, ty: Option<Idx>) {
        self.data_mut(scope).root_type = ty;
    }

    /// Number of variables declared directly in `scope`.
    pub fn var_count(&self, scope: ScopeId) -> usize {
        self.data(scope).vars.len()
    }

    /// Variables declared directly in `scope`, in declaration order.
    pub fn vars(&self, scope: ScopeId) -> impl Iterator<Item = &TypedVar> + '_ {
        self.data(scope).vars.iter().map(move |&id| self.var(id))
    }

    /// Names still reserved in `scope`, in no particular order.
    pub fn reserved_names(&self, scope: ScopeId) -> impl Iterator<Item = Name> + '_ {
        self.data(scope).reserved.iter().copied()
    }

    pub fn var(&self, id: VarId) -> &TypedVar {
        &self.vars[id.index()]
    }

    /// Mutable access to a variable, for recording an inferred type.
    pub fn var_mut(&mut self, id: VarId) -> &mut TypedVar {
        &mut self.vars[id.index()]
    }

    /// The `var` declarations of `scope` that have no type yet, excluding
    /// parameters and externs.
    ///
    /// Lazy; call again to restart.
    pub fn declaratively_unbound_vars_without_types(
        &self,
        scope: ScopeId,
    ) -> impl Iterator<Item = &TypedVar> + '_ {
        self.vars(scope)
            .filter(|var| var.is_declaratively_unbound_without_type())
    }

    /// Walk from `scope` to the root of its tree, `scope` first.
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |&s| self.parent(s))
    }

    /// The nearest scope that is an ancestor of (or equal to) both `a` and
    /// `b`, or `None` if they belong to different roots.
    pub fn common_ancestor(&self, a: ScopeId, b: ScopeId) -> Option<ScopeId> {
        let (mut a, mut b) = (a, b);
        while self.depth(a) > self.depth(b) {
            a = self.parent(a)?;
        }
        while self.depth(b) > self.depth(a) {
            b = self.parent(b)?;
        }
        while a != b {
            a = self.parent(a)?;
            b = self.parent(b)?;
        }
        Some(a)
    }

    /// Every name declared in `scope` or one of its ancestors.
    ///
    /// A shadowed name is yielded once per declaring scope.
    pub fn visible_names(&self, scope: ScopeId) -> impl Iterator<Item = Name> + '_ {
        self.ancestors(scope)
            .flat_map(move |s| self.data(s).vars.iter().map(move |&id| self.var(id).name))
    }
}
