use pretty_assertions::assert_eq;
use strata_ir::{InputId, InputUnit, Name, NodeId};
use strata_types::Idx;

use crate::test_helpers::{tree, MockLattice};
use crate::{ImplicitVar, ScopeId, ScopeKind, ScopeTree};

fn node(n: u32) -> NodeId {
    NodeId::new(n)
}

/// A class body at `root` whose root type is `constructor`.
fn class_body(tree: &mut ScopeTree, parent: ScopeId, root: u32, constructor: Idx) -> ScopeId {
    let body = tree.create_scope(parent, node(root), ScopeKind::Block);
    tree.set_root_type(body, Some(constructor));
    body
}

#[test]
fn implicit_names_round_trip() {
    for var in ImplicitVar::ALL {
        assert_eq!(ImplicitVar::from_name(var.name()), Some(var));
    }
    assert_eq!(ImplicitVar::from_name(Name::EMPTY), None);
}

#[test]
fn implicit_slot_ownership_by_kind() {
    use ImplicitVar::{Arguments, Exports, Super, This};

    let cases = [
        (ScopeKind::Global, [false, false, false, false]),
        (ScopeKind::Bottom, [false, false, false, false]),
        (ScopeKind::Function { arrow: false }, [true, true, true, false]),
        (ScopeKind::Function { arrow: true }, [false, false, false, false]),
        (ScopeKind::Block, [false, false, false, false]),
        (ScopeKind::Module, [false, false, false, false]),
        (ScopeKind::StaticBlock, [true, true, false, false]),
        (ScopeKind::FieldInit { is_static: true }, [true, true, false, false]),
        (ScopeKind::FieldInit { is_static: false }, [true, true, false, false]),
    ];
    for (kind, expected) in cases {
        let made = [This, Super, Arguments, Exports].map(|var| var.is_made_by(kind));
        assert_eq!(made, expected, "{kind:?}");
    }
}

// Type of `this`

#[test]
fn global_this_is_the_global_object() {
    let lattice = MockLattice::new();
    let mut tree = tree();
    let global = tree.global();
    assert_eq!(tree.type_of_this(global, &lattice), None);

    let window = lattice.object(None);
    tree.set_root_type(global, Some(window));
    assert_eq!(tree.type_of_this(global, &lattice), Some(window));

    tree.set_root_type(global, Some(MockLattice::NUMBER));
    assert_eq!(tree.type_of_this(global, &lattice), None);
}

#[test]
fn function_this_is_the_receiver_type() {
    let lattice = MockLattice::new();
    let mut tree = tree();
    let global = tree.global();
    let f = tree.create_scope(global, node(1), ScopeKind::Function { arrow: false });

    // Not typechecked yet.
    assert_eq!(tree.type_of_this(f, &lattice), None);

    let receiver = lattice.object(None);
    tree.set_root_type(f, Some(lattice.function(Some(receiver))));
    assert_eq!(tree.type_of_this(f, &lattice), Some(receiver));

    tree.set_root_type(f, Some(MockLattice::STRING));
    assert_eq!(tree.type_of_this(f, &lattice), None);
}

#[test]
fn arrows_blocks_and_modules_inherit_this() {
    let lattice = MockLattice::new();
    let mut tree = tree();
    let global = tree.global();
    let receiver = lattice.object(None);
    let f = tree.create_scope(global, node(1), ScopeKind::Function { arrow: false });
    tree.set_root_type(f, Some(lattice.function(Some(receiver))));
    let block = tree.create_scope(f, node(2), ScopeKind::Block);
    let arrow = tree.create_scope(block, node(3), ScopeKind::Function { arrow: true });
    // An arrow's own type never matters.
    tree.set_root_type(arrow, Some(lattice.function(None)));

    assert_eq!(tree.type_of_this(block, &lattice), Some(receiver));
    assert_eq!(tree.type_of_this(arrow, &lattice), Some(receiver));

    let module = tree.create_scope(global, node(4), ScopeKind::Module);
    let window = lattice.object(None);
    tree.set_root_type(global, Some(window));
    assert_eq!(tree.type_of_this(module, &lattice), Some(window));
}

#[test]
fn static_block_this_is_the_class_constructor() {
    let lattice = MockLattice::new();
    let mut tree = tree();
    let global = tree.global();
    let (ctor, _) = lattice.class(None);
    let body = class_body(&mut tree, global, 1, ctor);
    let init = tree.create_scope(body, node(2), ScopeKind::StaticBlock);

    assert_eq!(tree.type_of_this(init, &lattice), Some(ctor));
}

#[test]
fn field_initializer_this_depends_on_staticness() {
    let lattice = MockLattice::new();
    let mut tree = tree();
    let global = tree.global();
    let (ctor, instance) = lattice.class(None);
    let body = class_body(&mut tree, global, 1, ctor);
    let member = tree.create_scope(body, node(2), ScopeKind::FieldInit { is_static: false });
    let stat = tree.create_scope(body, node(3), ScopeKind::FieldInit { is_static: true });

    assert_eq!(tree.type_of_this(member, &lattice), Some(instance));
    assert_eq!(tree.type_of_this(stat, &lattice), Some(ctor));
}

#[test]
fn field_initializer_of_untyped_class_has_no_this() {
    let lattice = MockLattice::new();
    let mut tree = tree();
    let global = tree.global();
    let body = tree.create_scope(global, node(1), ScopeKind::Block);
    let member = tree.create_scope(body, node(2), ScopeKind::FieldInit { is_static: false });

    assert_eq!(tree.type_of_this(member, &lattice), None);
}

#[test]
#[should_panic(expected = "not a constructor")]
fn instance_field_of_non_constructor_panics() {
    let lattice = MockLattice::new();
    let mut tree = tree();
    let global = tree.global();
    let body = class_body(&mut tree, global, 1, MockLattice::NUMBER);
    let member = tree.create_scope(body, node(2), ScopeKind::FieldInit { is_static: false });
    tree.type_of_this(member, &lattice);
}

#[test]
fn bottom_has_no_this() {
    let lattice = MockLattice::new();
    let mut tree = tree();
    let bottom = tree.create_lattice_bottom(node(1));
    assert_eq!(tree.type_of_this(bottom, &lattice), None);
}

// Implicit variables

#[test]
fn global_and_exports_are_never_synthesized() {
    let lattice = MockLattice::new();
    let mut tree = tree();
    let global = tree.global();
    let f = tree.create_scope(global, node(1), ScopeKind::Function { arrow: false });

    for var in ImplicitVar::ALL {
        assert_eq!(tree.make_implicit_var(global, var, &lattice), None, "{var:?}");
    }
    assert_eq!(tree.make_implicit_var(f, ImplicitVar::Exports, &lattice), None);
    assert_eq!(tree.implicit_var(f, ImplicitVar::Exports, &lattice), None);
}

#[test]
fn implicit_var_is_owned_by_nearest_function() {
    let lattice = MockLattice::new();
    let mut tree = tree();
    let global = tree.global();
    let receiver = lattice.object(None);
    let f = tree.create_scope(global, node(1), ScopeKind::Function { arrow: false });
    tree.set_root_type(f, Some(lattice.function(Some(receiver))));
    let block = tree.create_scope(f, node(2), ScopeKind::Block);
    let arrow = tree.create_scope(block, node(3), ScopeKind::Function { arrow: true });

    let this = tree.implicit_var(arrow, ImplicitVar::This, &lattice);
    let Some(this) = this else {
        panic!("`this` should resolve inside a function");
    };
    assert_eq!(this.scope(), f);
    assert_eq!(this.name(), Name::THIS);
    assert_eq!(this.ty(), Some(receiver));
    assert_eq!(this.ordinal(), None);
    assert_eq!(this.decl_node(), None);
    assert!(this.is_implicit());
    assert!(!this.is_extern());
}

#[test]
fn implicit_var_outside_functions_is_absent() {
    let lattice = MockLattice::new();
    let mut tree = tree();
    let global = tree.global();
    let block = tree.create_scope(global, node(1), ScopeKind::Block);

    assert_eq!(tree.implicit_var(block, ImplicitVar::This, &lattice), None);
    assert_eq!(tree.implicit_var(block, ImplicitVar::Arguments, &lattice), None);
}

#[test]
fn arguments_type_comes_from_global_extern() {
    let lattice = MockLattice::new();
    let mut tree = tree();
    let global = tree.global();
    let args_type = lattice.object(None);
    let externs = InputUnit::externs(InputId::new(1));
    tree.declare(global, Name::ARGUMENTS, None, Some(args_type), Some(externs), false);
    let f = tree.create_scope(global, node(1), ScopeKind::Function { arrow: false });
    let block = tree.create_scope(f, node(2), ScopeKind::Block);

    let args = tree.implicit_var(block, ImplicitVar::Arguments, &lattice);
    assert_eq!(args.as_ref().map(|v| v.scope()), Some(f));
    assert_eq!(args.and_then(|v| v.ty()), Some(args_type));
}

#[test]
fn arguments_ignores_non_extern_global() {
    let lattice = MockLattice::new();
    let mut tree = tree();
    let global = tree.global();
    let source = InputUnit::source(InputId::new(0));
    tree.declare(global, Name::ARGUMENTS, None, Some(MockLattice::NUMBER), Some(source), false);
    let f = tree.create_scope(global, node(1), ScopeKind::Function { arrow: false });

    let args = tree.make_implicit_var(f, ImplicitVar::Arguments, &lattice);
    assert!(args.is_some());
    assert_eq!(args.and_then(|v| v.ty()), None);
}

#[test]
fn super_of_instance_is_superclass_instance() {
    let lattice = MockLattice::new();
    let mut tree = tree();
    let global = tree.global();
    let (base_ctor, base_instance) = lattice.class(None);
    let (derived_ctor, _) = lattice.class(Some(base_ctor));
    let body = class_body(&mut tree, global, 1, derived_ctor);
    let member = tree.create_scope(body, node(2), ScopeKind::FieldInit { is_static: false });
    let method = tree.create_scope(body, node(3), ScopeKind::Function { arrow: false });
    tree.set_root_type(method, Some(derived_ctor));

    let super_ty = |scope| {
        tree.make_implicit_var(scope, ImplicitVar::Super, &lattice)
            .and_then(|v| v.ty())
    };
    assert_eq!(super_ty(member), Some(base_instance));
    // A constructor's receiver is its instance type.
    assert_eq!(super_ty(method), Some(base_instance));
}

#[test]
fn super_without_superclass_is_absent() {
    let lattice = MockLattice::new();
    let mut tree = tree();
    let global = tree.global();
    let (ctor, _) = lattice.class(None);
    let body = class_body(&mut tree, global, 1, ctor);
    let member = tree.create_scope(body, node(2), ScopeKind::FieldInit { is_static: false });

    let super_var = tree.make_implicit_var(member, ImplicitVar::Super, &lattice);
    assert_eq!(super_var.and_then(|v| v.ty()), None);
}

#[test]
fn super_of_plain_object_is_its_prototype() {
    let lattice = MockLattice::new();
    let mut tree = tree();
    let global = tree.global();
    let proto = lattice.object(None);
    let receiver = lattice.object(Some(proto));
    let f = tree.create_scope(global, node(1), ScopeKind::Function { arrow: false });
    tree.set_root_type(f, Some(lattice.function(Some(receiver))));

    let super_var = tree.implicit_var(f, ImplicitVar::Super, &lattice);
    assert_eq!(super_var.and_then(|v| v.ty()), Some(proto));
}

#[test]
fn super_of_static_block_is_constructor_prototype() {
    let lattice = MockLattice::new();
    let mut tree = tree();
    let global = tree.global();
    // A constructor is not an instance and has no recorded prototype.
    let (ctor, _) = lattice.class(None);
    let body = class_body(&mut tree, global, 1, ctor);
    let init = tree.create_scope(body, node(2), ScopeKind::StaticBlock);

    let super_var = tree.implicit_var(init, ImplicitVar::Super, &lattice);
    assert_eq!(super_var.map(|v| (v.scope(), v.ty())), Some((init, None)));
}
