use indoc::indoc;

use facetry_core::{ExprError, FacetExpr, Name};

use crate::{AliasTable, ConfigError};

#[test]
fn insert_reports_new_entries() {
    let mut table = AliasTable::new();

    assert!(table.insert("basic", FacetExpr::name("id")));
    assert!(!table.insert("basic", FacetExpr::name("title")));
    assert_eq!(table.len(), 1);
    assert_eq!(table.get("basic"), Some(&FacetExpr::name("title")));
}

#[test]
fn identity_alias_is_not_a_reference() {
    let mut table = AliasTable::new();
    table.insert("a", FacetExpr::name("a"));

    assert!(table.contains("a"));
    assert!(!table.is_alias_reference("a"));
    assert_eq!(table.reference("a"), None);
}

#[test]
fn renamed_atom_is_a_reference() {
    let mut table = AliasTable::new();
    table.insert("a", FacetExpr::name("b"));

    assert_eq!(table.reference("a"), Some(&FacetExpr::name("b")));
}

#[test]
fn single_element_list_of_self_is_a_reference() {
    let mut table = AliasTable::new();
    table.insert("a", FacetExpr::list(["a"]));

    assert!(table.is_alias_reference("a"));
}

#[test]
fn unknown_name_is_not_a_reference() {
    let table = AliasTable::new();

    assert!(!table.is_alias_reference("missing"));
}

#[test]
fn names_in_registration_order() {
    let table: AliasTable = [
        ("z", FacetExpr::name("z")),
        ("a", FacetExpr::name("a")),
        ("m", FacetExpr::name("m")),
    ]
    .into_iter()
    .collect();

    let names: Vec<&str> = table.names().map(Name::as_str).collect();
    assert_eq!(names, vec!["z", "a", "m"]);
}

#[test]
fn extend_from_overwrites_with_other() {
    let mut child: AliasTable = [
        ("basic", FacetExpr::name("id")),
        ("own", FacetExpr::name("own")),
    ]
    .into_iter()
    .collect();
    let parent: AliasTable = [
        ("basic", FacetExpr::list(["id", "name"])),
        ("timestamps", FacetExpr::list(["created_at", "updated_at"])),
    ]
    .into_iter()
    .collect();

    child.extend_from(&parent);

    assert_eq!(child.len(), 3);
    assert_eq!(child.get("basic"), Some(&FacetExpr::list(["id", "name"])));
    assert!(child.contains("own"));
    assert!(child.contains("timestamps"));
}

#[test]
fn from_json_str() {
    let json = indoc! {r#"
        {
            "minimal": ["a", ["b", {"c": null, "d": "e"}]],
            "identity": "identity",
            "empty": []
        }
    "#};

    let table = AliasTable::from_json_str(json).unwrap();

    assert_eq!(table.len(), 3);
    assert!(!table.is_alias_reference("identity"));
    assert!(table.is_alias_reference("empty"));
    assert_eq!(table.get("empty"), Some(&FacetExpr::List(vec![])));
}

#[test]
fn from_json_str_rejects_non_object() {
    let err = AliasTable::from_json_str(r#"["a"]"#).unwrap_err();

    assert_eq!(
        err,
        ConfigError::InvalidFacet(ExprError::InvalidShape { found: "array" })
    );
}

#[test]
fn from_json_str_rejects_invalid_definition() {
    let err = AliasTable::from_json_str(r#"{"basic": ["id", 3]}"#).unwrap_err();

    assert_eq!(
        err,
        ConfigError::InvalidFacet(ExprError::InvalidShape { found: "number" })
    );
    assert_eq!(
        err.to_string(),
        "invalid facet: expected name, list or selection, found number"
    );
}
