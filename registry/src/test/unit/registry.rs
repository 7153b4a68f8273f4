use decomp_ops::{OpRef, OpTarget};
use test_case::test_case;

use super::{Ops, named};
use crate::error::Error;
use crate::mode::Mode;
use crate::registry::{Registry, register_into};
use crate::table::DecompositionTable;

#[test_case(Mode::PreAutograd, Mode::PostAutograd)]
#[test_case(Mode::PostAutograd, Mode::Meta)]
#[test_case(Mode::Meta, Mode::PreAutograd)]
fn test_tables_are_isolated(registered: Mode, other: Mode) {
    let ops = Ops::new();
    let mut registry = Registry::new();
    registry.register().target(&ops.add_tensor).decomposition(named("d")).mode(registered).call().unwrap();

    assert!(registry.table(registered).contains(&ops.add_tensor));
    assert!(!registry.table(other).contains(&ops.add_tensor));
    assert!(registry.get_decompositions([&ops.add_tensor], other).is_empty());
}

#[test]
fn test_default_mode_is_post_autograd() {
    let ops = Ops::new();
    let mut registry = Registry::new();
    registry.register().target(&ops.add_tensor).decomposition(named("d")).call().unwrap();

    assert_eq!(registry.table(Mode::PostAutograd).len(), 1);
    assert!(registry.table(Mode::PreAutograd).is_empty());
    assert!(registry.table(Mode::Meta).is_empty());
}

#[test]
fn test_duplicate_leaves_registry_unchanged() {
    let ops = Ops::new();
    let mut registry = Registry::new();
    let first = named("first");
    registry.register().target(&ops.add_tensor).decomposition(first.clone()).mode(Mode::Meta).call().unwrap();

    let err = registry
        .register()
        .target(&ops.add)
        .decomposition(named("second"))
        .mode(Mode::Meta)
        .disable_meta(true)
        .call()
        .unwrap_err();

    assert_eq!(err, Error::DuplicateRegistration { operator: "aten::add.Tensor".into(), table: "meta".into() });
    assert!(err.to_string().contains("aten::add.Tensor"));
    let meta = registry.table(Mode::Meta);
    assert_eq!(meta.len(), 1);
    assert!(meta.get(&ops.add_tensor).unwrap().ptr_eq(&first));
    assert!(registry.disabled_meta().is_empty());
}

#[test]
fn test_packet_registration_matches_members() {
    let ops = Ops::new();
    let decomp = named("add");

    let mut by_packet = Registry::new();
    by_packet.register().target(&ops.add).decomposition(decomp.clone()).call().unwrap();

    let mut by_member = Registry::new();
    for overload in ops.add.overloads() {
        by_member.register().target(overload).decomposition(decomp.clone()).call().unwrap();
    }

    let packet_keys: Vec<_> = by_packet.table(Mode::PostAutograd).overloads().cloned().collect();
    let member_keys: Vec<_> = by_member.table(Mode::PostAutograd).overloads().cloned().collect();
    assert_eq!(packet_keys, member_keys);
    assert_eq!(packet_keys, vec![ops.add_tensor.clone(), ops.add_scalar.clone(), ops.add_out.clone()]);
}

#[test]
fn test_nested_target() {
    let ops = Ops::new();
    let mut registry = Registry::new();
    let target = OpTarget::map([
        ("views", OpTarget::from(&ops.select)),
        ("adds", OpTarget::list([&ops.add_tensor, &ops.add_scalar])),
    ]);

    registry.register().target(target).decomposition(named("d")).call().unwrap();

    let keys: Vec<_> = registry.table(Mode::PostAutograd).overloads().cloned().collect();
    assert_eq!(keys, vec![ops.select.clone(), ops.add_tensor.clone(), ops.add_scalar.clone()]);
}

#[test]
fn test_packet_expands_to_current_members() {
    let ops = Ops::new();
    let mut registry = Registry::new();
    let late = ops.catalog.define("aten::add.Tensor_out(Tensor self, Tensor other) -> Tensor").unwrap();

    registry.register().target(&ops.add).decomposition(named("d")).call().unwrap();

    assert!(registry.table(Mode::PostAutograd).contains(&late));
}

#[test]
fn test_partial_family_query() {
    let ops = Ops::new();
    let mut registry = Registry::new();
    registry.register().target([&ops.add_tensor, &ops.add_scalar]).decomposition(named("d")).call().unwrap();

    let found = registry.get_decompositions([&ops.add], Mode::PostAutograd);

    let keys: Vec<_> = found.keys().cloned().collect();
    assert_eq!(keys, vec![ops.add_tensor.clone(), ops.add_scalar.clone()]);
}

#[test]
fn test_unknown_query_items_are_omitted() {
    let ops = Ops::new();
    let mut registry = Registry::new();
    registry.register().target(&ops.add_tensor).decomposition(named("d")).call().unwrap();

    let found =
        registry.get_decompositions([OpRef::from(&ops.add_out), OpRef::from(&ops.add_tensor)], Mode::PostAutograd);

    assert_eq!(found.len(), 1);
    assert!(found.contains_key(&ops.add_tensor));
}

#[test]
fn test_disable_meta_records_overloads() {
    let ops = Ops::new();
    let mut registry = Registry::new();
    registry.register().target(&ops.add).decomposition(named("d")).disable_meta(true).call().unwrap();
    registry.register().target(&ops.select).decomposition(named("v")).call().unwrap();

    assert!(registry.is_meta_disabled(&ops.add_scalar));
    assert!(!registry.is_meta_disabled(&ops.select));
    assert_eq!(registry.disabled_meta().len(), 3);
}

#[test]
fn test_mode_strings() {
    let ops = Ops::new();
    let mut registry = Registry::new();
    let mode = "pre_autograd".parse().unwrap();
    registry.register().target(&ops.add_tensor).decomposition(named("d")).mode(mode).call().unwrap();

    assert_eq!(registry.table_by_name("pre_autograd").unwrap().len(), 1);
    assert_eq!(registry.get_decompositions_by_name([&ops.add_tensor], "pre_autograd").unwrap().len(), 1);

    let expected = Error::UnsupportedMode { mode: "inference".into() };
    assert_eq!(registry.table_by_name("inference").unwrap_err(), expected);
    assert_eq!(registry.get_decompositions_by_name([&ops.add_tensor], "inference").unwrap_err(), expected);
}

#[test]
fn test_register_into_custom_table() {
    let ops = Ops::new();
    let registry = Registry::new();
    let mut table = DecompositionTable::new("inductor");

    register_into(&mut table, &ops.add, named("d")).unwrap();

    assert_eq!(table.len(), 3);
    assert!(registry.tables().all(|(_, table)| table.is_empty()));
    assert_eq!(
        register_into(&mut table, &ops.add_out, named("again")).unwrap_err(),
        Error::DuplicateRegistration { operator: "aten::add.out".into(), table: "inductor".into() }
    );
}

#[test]
fn test_register_returns_stored_callable() {
    let ops = Ops::new();
    let mut registry = Registry::new();
    let decomp = named("d");

    let stored = registry.register().target(&ops.add_tensor).decomposition(decomp.clone()).call().unwrap();

    assert!(stored.ptr_eq(&decomp));
}
