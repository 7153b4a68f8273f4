use test_case::test_case;

use crate::error::Error;
use crate::name::OperatorName;

#[test]
fn test_parse_splits_namespace() {
    let name = OperatorName::parse("aten::add").unwrap();
    assert_eq!(name.namespace(), "aten");
    assert_eq!(name.base(), "add");
    assert_eq!(name.to_string(), "aten::add");
}

#[test_case("add"; "missing_namespace")]
#[test_case("::add"; "empty_namespace")]
#[test_case("aten::"; "empty_operator")]
#[test_case("aten::add.Tensor"; "overload_suffix")]
#[test_case("aten::1add"; "leading_digit")]
fn test_parse_rejects(name: &str) {
    assert!(matches!(OperatorName::parse(name), Err(Error::InvalidOperatorName { .. })));
}

#[test]
fn test_lookup_by_str() {
    let mut map = std::collections::HashMap::new();
    map.insert(OperatorName::parse("prims::convert_element_type").unwrap(), 1);
    assert_eq!(map.get("prims::convert_element_type"), Some(&1));
}
