//! Joining flow scopes at control-flow merges.

use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use strata_ir::Name;
use strata_types::{Idx, TypeLattice};

use super::{FlowLayer, FlowScope};
use crate::ScopeTree;

impl FlowScope {
    /// Merge the flow scopes reaching a control-flow join point.
    ///
    /// The result lives in the inputs' nearest common declaration scope.
    /// Each input first drops the refinements of names that mean a different
    /// variable there (block-locals of a branch, or names its block
    /// shadows). Every remaining slot gets the least supertype of its types
    /// across the inputs, where an input that did not refine it contributes
    /// the declared type; an untyped contribution does not widen it. The
    /// result is a single layer over a fresh entry lattice of the common
    /// scope, holding only the slots whose joined type differs from the
    /// declared one.
    ///
    /// Flow scopes over the lattice bottom are unreachable and are ignored;
    /// if every input is bottom, the first one is returned.
    ///
    /// # Panics
    ///
    /// Panics if `flows` is empty, or if the inputs' declaration scopes do
    /// not share a root.
    #[tracing::instrument(level = "trace", skip_all, fields(count = flows.len()))]
    pub fn join(flows: &[FlowScope], tree: &ScopeTree, lattice: &dyn TypeLattice) -> FlowScope {
        assert!(!flows.is_empty(), "cannot join zero flow scopes");

        let live: SmallVec<[&FlowScope; 4]> = flows.iter().filter(|f| !f.is_bottom(tree)).collect();
        match live.as_slice() {
            [] => return flows[0].clone(),
            [only] => return (*only).clone(),
            _ => {}
        }

        let common = live[1..].iter().fold(live[0].declaration_scope(), |acc, flow| {
            tree.common_ancestor(acc, flow.declaration_scope())
                .unwrap_or_else(|| {
                    panic!(
                        "cannot join flow scopes over unrelated scopes {acc:?} and {:?}",
                        flow.declaration_scope()
                    )
                })
        });

        // Each input's refinements as seen from `common`: names that mean a
        // different variable there are out of scope after the merge.
        let refined: SmallVec<[FxHashMap<Name, Idx>; 4]> = live
            .iter()
            .map(|flow| {
                let mut slots = flow.flatten();
                let from = flow.declaration_scope();
                slots.retain(|&name, _| tree.same_binding(from, common, name));
                slots
            })
            .collect();
        let mut names: Vec<Name> = refined
            .iter()
            .flat_map(|slots| slots.keys().copied())
            .collect::<FxHashSet<_>>()
            .into_iter()
            .collect();
        // Fixed fold order keeps the lattice calls deterministic.
        names.sort_unstable();

        let mut slots = FxHashMap::default();
        for name in names {
            let declared = tree.declared_type(common, name);
            let joined = refined.iter().fold(None, |acc, refined| {
                let ty = refined.get(&name).copied().or(declared);
                lattice.join_slot_types(acc, ty)
            });
            let Some(joined) = joined else { continue };
            if !lattice.slot_types_equal(Some(joined), declared) {
                slots.insert(name, joined);
            }
        }

        tracing::trace!(
            inputs = live.len(),
            scope = common.raw(),
            slots = slots.len(),
            "joined"
        );
        FlowScope(Rc::new(FlowLayer {
            parent: Some(FlowScope::create_entry_lattice(common)),
            scope: common,
            slots,
            depth: 1,
        }))
    }
}
