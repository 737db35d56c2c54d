//! Shared test utilities for scope and flow tests.
//!
//! Provides a small interning type lattice with just enough structure
//! (unions, functions with receivers, classes, prototypes) to exercise
//! joins and implicit-variable synthesis. Only compiled in test builds.

use std::cell::RefCell;
use std::sync::Once;

use strata_ir::{NodeId, SharedInterner};
use strata_types::{Idx, TypeLattice};

use crate::ScopeTree;

/// Install a `RUST_LOG`-driven subscriber once per test binary.
pub(crate) fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// A fresh tree whose global scope is rooted at node 0.
pub(crate) fn tree() -> ScopeTree {
    init_tracing();
    ScopeTree::new(SharedInterner::new(), NodeId::new(0))
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum MockType {
    Number,
    String,
    Boolean,
    NoType,
    /// Sorted, deduplicated, never nested.
    Union(Vec<Idx>),
    Function { this: Option<Idx> },
    Constructor { instance: Idx, superclass: Option<Idx> },
    Instance { constructor: Idx },
    Object { proto: Option<Idx> },
}

/// Interning lattice. Structurally equal types share an `Idx`, so the
/// default handle equality of [`TypeLattice::types_equal`] is exact.
pub(crate) struct MockLattice {
    types: RefCell<Vec<MockType>>,
}

impl MockLattice {
    pub(crate) const NUMBER: Idx = Idx::from_raw(0);
    pub(crate) const STRING: Idx = Idx::from_raw(1);
    pub(crate) const BOOLEAN: Idx = Idx::from_raw(2);
    /// Bottom of the lattice; the identity for `least_supertype`.
    pub(crate) const NO_TYPE: Idx = Idx::from_raw(3);

    pub(crate) fn new() -> Self {
        MockLattice {
            types: RefCell::new(vec![
                MockType::Number,
                MockType::String,
                MockType::Boolean,
                MockType::NoType,
            ]),
        }
    }

    fn intern(&self, ty: MockType) -> Idx {
        let mut types = self.types.borrow_mut();
        let index = match types.iter().position(|t| *t == ty) {
            Some(index) => index,
            None => {
                types.push(ty);
                types.len() - 1
            }
        };
        Idx::from_raw(u32::try_from(index).unwrap_or_else(|_| panic!("too many mock types")))
    }

    fn get(&self, idx: Idx) -> MockType {
        self.types.borrow()[idx.index()].clone()
    }

    fn members(&self, idx: Idx) -> Vec<Idx> {
        match self.get(idx) {
            MockType::Union(members) => members,
            _ => vec![idx],
        }
    }

    pub(crate) fn union(&self, types: &[Idx]) -> Idx {
        let mut members: Vec<Idx> = types
            .iter()
            .flat_map(|&t| self.members(t))
            .filter(|&t| t != Self::NO_TYPE)
            .collect();
        members.sort_unstable_by_key(|t| t.raw());
        members.dedup();
        match members.as_slice() {
            [] => Self::NO_TYPE,
            [only] => *only,
            _ => self.intern(MockType::Union(members)),
        }
    }

    pub(crate) fn function(&self, this: Option<Idx>) -> Idx {
        self.intern(MockType::Function { this })
    }

    /// A class: returns `(constructor, instance)`.
    pub(crate) fn class(&self, superclass: Option<Idx>) -> (Idx, Idx) {
        let mut types = self.types.borrow_mut();
        let constructor = types.len();
        types.push(MockType::Constructor {
            instance: Idx::from_raw(0),
            superclass,
        });
        types.push(MockType::Instance {
            constructor: raw(constructor),
        });
        types[constructor] = MockType::Constructor {
            instance: raw(constructor + 1),
            superclass,
        };
        (raw(constructor), raw(constructor + 1))
    }

    pub(crate) fn object(&self, proto: Option<Idx>) -> Idx {
        self.intern(MockType::Object { proto })
    }
}

fn raw(index: usize) -> Idx {
    Idx::from_raw(u32::try_from(index).unwrap_or_else(|_| panic!("too many mock types")))
}

impl TypeLattice for MockLattice {
    fn least_supertype(&self, a: Idx, b: Idx) -> Idx {
        if a == b {
            a
        } else {
            self.union(&[a, b])
        }
    }

    fn is_object_type(&self, ty: Idx) -> bool {
        matches!(
            self.get(ty),
            MockType::Function { .. }
                | MockType::Constructor { .. }
                | MockType::Instance { .. }
                | MockType::Object { .. }
        )
    }

    fn is_function_type(&self, ty: Idx) -> bool {
        matches!(self.get(ty), MockType::Function { .. } | MockType::Constructor { .. })
    }

    fn function_this_type(&self, function: Idx) -> Option<Idx> {
        match self.get(function) {
            MockType::Function { this } => this,
            MockType::Constructor { instance, .. } => Some(instance),
            _ => None,
        }
    }

    fn is_instance_type(&self, ty: Idx) -> bool {
        matches!(self.get(ty), MockType::Instance { .. })
    }

    fn superclass_constructor(&self, instance: Idx) -> Option<Idx> {
        match self.get(instance) {
            MockType::Instance { constructor } => match self.get(constructor) {
                MockType::Constructor { superclass, .. } => superclass,
                _ => None,
            },
            _ => None,
        }
    }

    fn instance_type(&self, constructor: Idx) -> Option<Idx> {
        match self.get(constructor) {
            MockType::Constructor { instance, .. } => Some(instance),
            _ => None,
        }
    }

    fn implicit_prototype(&self, object: Idx) -> Option<Idx> {
        match self.get(object) {
            MockType::Object { proto } => proto,
            _ => None,
        }
    }
}
