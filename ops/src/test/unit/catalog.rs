use crate::catalog::OperatorCatalog;
use crate::error::Error;

fn catalog() -> OperatorCatalog {
    let catalog = OperatorCatalog::new();
    for schema in [
        "aten::add.Tensor(Tensor self, Tensor other, *, Scalar alpha=1) -> Tensor",
        "aten::add.Scalar(Tensor self, Scalar other, Scalar alpha=1) -> Tensor",
        "aten::relu(Tensor self) -> Tensor",
    ] {
        catalog.define(schema).unwrap();
    }
    catalog
}

#[test]
fn test_define_groups_into_packets() {
    let catalog = catalog();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.packet("aten::add").unwrap().len(), 2);
    assert_eq!(catalog.overloads().len(), 3);
}

#[test]
fn test_overload_lookup() {
    let catalog = catalog();
    assert_eq!(catalog.overload("aten::add.Scalar").unwrap().overload_name(), "Scalar");
    assert_eq!(catalog.overload("aten::relu").unwrap().qualified_name(), "aten::relu");
    assert!(catalog.overload("aten::add").is_none(), "add has no default overload");
    assert!(catalog.overload("aten::sub.Tensor").is_none());
}

#[test]
fn test_duplicate_define_fails() {
    let catalog = catalog();
    let err = catalog.define("aten::relu(Tensor self) -> Tensor").unwrap_err();
    assert_eq!(err, Error::DuplicateOverload { name: "aten::relu".into() });
    assert_eq!(catalog.packet("aten::relu").unwrap().len(), 1);
}

#[test]
fn test_define_propagates_parse_errors() {
    let catalog = OperatorCatalog::new();
    assert!(matches!(catalog.define("aten::relu"), Err(Error::MalformedSchema { .. })));
    assert!(catalog.is_empty());
}
