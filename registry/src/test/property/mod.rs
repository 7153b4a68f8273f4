use decomp_ops::test::generators;
use decomp_ops::{CallArgs, Decomposition, OpRef, Value};
use proptest::prelude::*;

use crate::activate::merge_tables;
use crate::error::Error;
use crate::mode::Mode;
use crate::registry::Registry;

fn mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::PreAutograd), Just(Mode::PostAutograd), Just(Mode::Meta)]
}

fn noop(name: &str) -> Decomposition {
    Decomposition::new(name, |_: CallArgs| Ok(Value::None))
}

proptest! {
    #[test]
    fn registration_touches_only_its_table(overloads in generators::distinct_overloads(6), target in mode()) {
        let mut registry = Registry::new();
        registry.register().target(overloads.clone()).decomposition(noop("d")).mode(target).call().unwrap();

        for (mode, table) in registry.tables() {
            let expected = if mode == target { overloads.len() } else { 0 };
            prop_assert_eq!(table.len(), expected);
        }
    }

    #[test]
    fn duplicate_registration_is_rejected_atomically(
        overloads in generators::distinct_overloads(6),
        pick in any::<prop::sample::Index>(),
        target in mode(),
    ) {
        let mut registry = Registry::new();
        let repeated = pick.get(&overloads).clone();
        registry.register().target(&repeated).decomposition(noop("first")).mode(target).call().unwrap();

        let err = registry.register().target(overloads.clone()).decomposition(noop("second")).mode(target).call();

        let is_duplicate = matches!(err, Err(Error::DuplicateRegistration { .. }));
        prop_assert!(is_duplicate);
        prop_assert_eq!(registry.table(target).len(), 1);
        prop_assert_eq!(registry.table(target).get(&repeated).map(|decomp| decomp.name()), Some("first"));
    }

    #[test]
    fn query_returns_exactly_registered_subset(
        overloads in generators::distinct_overloads(8),
        mask in prop::collection::vec(any::<bool>(), 8),
    ) {
        let mut registry = Registry::new();
        let registered: Vec<_> =
            overloads.iter().zip(&mask).filter(|(_, keep)| **keep).map(|(overload, _)| overload.clone()).collect();
        registry.register().target(registered.clone()).decomposition(noop("d")).call().unwrap();

        let found = registry.get_decompositions(overloads.iter().map(OpRef::from), Mode::PostAutograd);

        let keys: Vec<_> = found.keys().cloned().collect();
        prop_assert_eq!(keys, registered);
    }

    #[test]
    fn merged_record_prefers_earlier_modes(
        overloads in generators::distinct_overloads(6),
        modes in prop::collection::vec(mode(), 6),
    ) {
        let mut registry = Registry::new();
        for (overload, mode) in overloads.iter().zip(&modes) {
            registry.register().target(overload).decomposition(noop(mode.as_str())).mode(*mode).call().unwrap();
            if *mode != Mode::PreAutograd {
                let fallback = noop("fallback");
                registry.register().target(overload).decomposition(fallback).mode(Mode::PreAutograd).call().unwrap();
            }
        }

        let merged = merge_tables(&registry, &Mode::ACTIVATION_ORDER);

        prop_assert_eq!(merged.len(), overloads.len());
        for (overload, mode) in overloads.iter().zip(&modes) {
            prop_assert_eq!(merged[overload].name(), mode.as_str());
        }
    }
}
