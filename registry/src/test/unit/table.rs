use decomp_ops::{OpRef, OperatorName};

use super::{Ops, named};
use crate::error::Error;
use crate::table::DecompositionTable;

#[test]
fn test_insert_all_and_lookup() {
    let ops = Ops::new();
    let mut table = DecompositionTable::new("custom");
    let decomp = named("add");

    table.insert_all(&[ops.add_tensor.clone(), ops.add_scalar.clone()], &decomp).unwrap();

    assert_eq!(table.len(), 2);
    assert!(table.get(&ops.add_tensor).unwrap().ptr_eq(&decomp));
    assert!(table.contains(&ops.add_scalar));
    assert!(!table.contains(&ops.add_out));
}

#[test]
fn test_insert_all_is_atomic() {
    let ops = Ops::new();
    let mut table = DecompositionTable::new("custom");
    table.insert_all(&[ops.add_scalar.clone()], &named("first")).unwrap();

    let err = table.insert_all(&[ops.add_tensor.clone(), ops.add_scalar.clone()], &named("second")).unwrap_err();

    assert_eq!(err, Error::DuplicateRegistration { operator: "aten::add.Scalar".into(), table: "custom".into() });
    assert_eq!(table.len(), 1);
    assert!(!table.contains(&ops.add_tensor), "nothing from the failed call is inserted");
    assert_eq!(table.get(&ops.add_scalar).unwrap().name(), "first");
}

#[test]
fn test_insert_all_rejects_repeats_within_call() {
    let ops = Ops::new();
    let mut table = DecompositionTable::new("custom");

    let err = table.insert_all(&[ops.add_tensor.clone(), ops.add_tensor.clone()], &named("twice")).unwrap_err();

    assert!(matches!(err, Error::DuplicateRegistration { .. }));
    assert!(table.is_empty());
}

#[test]
fn test_packet_index_groups_by_packet() {
    let ops = Ops::new();
    let mut table = DecompositionTable::new("custom");
    table.insert_all(&[ops.add_tensor.clone(), ops.select.clone(), ops.add_out.clone()], &named("d")).unwrap();

    let index = table.packet_index();
    let add = OperatorName::parse("aten::add").unwrap();
    let select = OperatorName::parse("aten::select").unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(index[&add], vec![ops.add_tensor.clone(), ops.add_out.clone()]);
    assert_eq!(index[&select], vec![ops.select.clone()]);
}

#[test]
fn test_select_mixes_packets_and_overloads() {
    let ops = Ops::new();
    let mut table = DecompositionTable::new("custom");
    table.insert_all(&[ops.add_tensor.clone(), ops.add_scalar.clone()], &named("add")).unwrap();
    table.insert_all(&[ops.select.clone()], &named("select")).unwrap();

    let found = table.select([OpRef::from(&ops.select), OpRef::from(&ops.add)]);

    let keys: Vec<_> = found.keys().cloned().collect();
    assert_eq!(keys, vec![ops.select.clone(), ops.add_tensor.clone(), ops.add_scalar.clone()]);
    assert_eq!(found[&ops.select].name(), "select");
}

#[test]
fn test_select_skips_unknown() {
    let ops = Ops::new();
    let mut table = DecompositionTable::new("custom");
    table.insert_all(&[ops.add_tensor.clone()], &named("add")).unwrap();

    let unregistered = ops.catalog.packet_or_insert("aten::mul").unwrap();
    let found = table.select([OpRef::from(&ops.add_out), OpRef::from(&unregistered), OpRef::from(&ops.select)]);

    assert!(found.is_empty());
}
