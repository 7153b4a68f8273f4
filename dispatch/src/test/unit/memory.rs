use decomp_ops::{CallArgs, Decomposition, OperatorCatalog, OpOverload, ScalarType, TensorMeta, Value};

use crate::dispatcher::Dispatcher;
use crate::error::Error;
use crate::key::DispatchKey;
use crate::memory::{InMemoryDispatcher, KernelSlot};

fn add_tensor() -> OpOverload {
    OperatorCatalog::new().define("aten::add.Tensor(Tensor self, Tensor other, *, Scalar alpha=1) -> Tensor").unwrap()
}

fn same_shape() -> Decomposition {
    Decomposition::new("same_shape", |args: CallArgs| Ok(args.positional(0).cloned().unwrap_or_default()))
}

#[test]
fn test_dump_lists_schema_and_keys() {
    let add = add_tensor();
    let mut dispatcher = InMemoryDispatcher::new();
    dispatcher.declare(&add);
    dispatcher.register_native("aten::add.Tensor", DispatchKey::CPU, "native").unwrap();
    dispatcher.register_native("aten::add.Tensor", DispatchKey::CompositeExplicitAutograd, "native").unwrap();

    let dump = dispatcher.dump_registration_table("aten::add.Tensor");
    assert_eq!(
        dump,
        "name: aten::add.Tensor\n\
         schema: aten::add.Tensor(Tensor self, Tensor other, *, Scalar alpha=1) -> Tensor\n\
         CPU: registered at native\n\
         CompositeExplicitAutograd[alias]: registered at native\n"
    );
    assert!(!dump.contains("CompositeImplicitAutograd"));
}

#[test]
fn test_dump_unknown_operator() {
    let dump = InMemoryDispatcher::new().dump_registration_table("aten::nope");
    assert_eq!(dump, "name: aten::nope\nschema: (none)\n");
}

#[test]
fn test_install_binds_meta_and_logs() {
    let add = add_tensor();
    let mut dispatcher = InMemoryDispatcher::new();
    dispatcher.install_abstract_impl(&add, same_shape()).unwrap();

    assert!(matches!(dispatcher.kernel("aten::add.Tensor", DispatchKey::Meta), Some(KernelSlot::Decomposition(_))));
    assert_eq!(dispatcher.install_log(), [("aten::add.Tensor".to_string(), DispatchKey::Meta)]);
    assert!(dispatcher.dump_registration_table("aten::add.Tensor").contains("Meta: registered by decomposition same_shape"));
}

#[test]
fn test_install_conflict() {
    let add = add_tensor();
    let mut dispatcher = InMemoryDispatcher::new();
    dispatcher.register_native("aten::add.Tensor", DispatchKey::Meta, "native").unwrap();

    let err = dispatcher.install_abstract_impl(&add, same_shape()).unwrap_err();
    assert_eq!(err, Error::InstallConflict { operator: "aten::add.Tensor".into(), key: DispatchKey::Meta });
    assert!(dispatcher.install_log().is_empty());
}

#[test]
fn test_call_runs_installed_kernel() {
    let add = add_tensor();
    let mut dispatcher = InMemoryDispatcher::new();
    dispatcher.install_abstract_impl(&add, same_shape()).unwrap();

    let meta = TensorMeta::new([4, 4], ScalarType::BFloat16);
    let out = dispatcher.call("aten::add.Tensor", DispatchKey::Meta, CallArgs::new().arg(meta.clone())).unwrap();
    assert_eq!(out, Value::Tensor(meta));
}

#[test]
fn test_call_errors() {
    let mut dispatcher = InMemoryDispatcher::new();
    dispatcher.register_native("aten::relu", DispatchKey::CPU, "native").unwrap();

    assert!(matches!(
        dispatcher.call("aten::relu", DispatchKey::CPU, CallArgs::new()),
        Err(Error::NativeKernel { .. })
    ));
    assert!(matches!(
        dispatcher.call("aten::relu", DispatchKey::Meta, CallArgs::new()),
        Err(Error::MissingKernel { .. })
    ));
    assert!(matches!(
        dispatcher.call("aten::sub", DispatchKey::Meta, CallArgs::new()),
        Err(Error::UnknownOperator { .. })
    ));
}
