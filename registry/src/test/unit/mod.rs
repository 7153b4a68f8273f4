mod registry;
mod table;

use decomp_ops::{CallArgs, Decomposition, OpOverload, OpOverloadPacket, OperatorCatalog, Value};

/// `aten::add` with three overloads and a view, `aten::select.int`.
pub(super) struct Ops {
    pub catalog: OperatorCatalog,
    pub add: OpOverloadPacket,
    pub add_tensor: OpOverload,
    pub add_scalar: OpOverload,
    pub add_out: OpOverload,
    pub select: OpOverload,
}

impl Ops {
    pub fn new() -> Self {
        let catalog = OperatorCatalog::new();
        let add_tensor =
            catalog.define("aten::add.Tensor(Tensor self, Tensor other, *, Scalar alpha=1) -> Tensor").unwrap();
        let add_scalar =
            catalog.define("aten::add.Scalar(Tensor self, Scalar other, Scalar alpha=1) -> Tensor").unwrap();
        let add_out = catalog
            .define("aten::add.out(Tensor self, Tensor other, *, Scalar alpha=1, Tensor(a!) out) -> Tensor(a!)")
            .unwrap();
        let select = catalog.define("aten::select.int(Tensor(a) self, int dim, int index) -> Tensor(a)").unwrap();
        let add = catalog.packet("aten::add").unwrap();
        Self { catalog, add, add_tensor, add_scalar, add_out, select }
    }
}

pub(super) fn named(name: &str) -> Decomposition {
    let tag = name.to_string();
    Decomposition::new(name, move |_: CallArgs| Ok(Value::Str(tag.clone())))
}
