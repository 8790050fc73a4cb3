use facetry_core::FacetExpr;

use crate::inject::{DefaultFacets, inject_default};
use crate::test_utils::facet;

fn inject(json: &str) -> FacetExpr {
    inject_default(&facet(json), &DefaultFacets::default())
}

#[test]
fn empty_becomes_basic() {
    assert_eq!(
        inject_default(&FacetExpr::Empty, &DefaultFacets::default()),
        FacetExpr::name("basic")
    );
}

#[test]
fn name_gets_basic_appended() {
    assert_eq!(inject(r#""foo""#), facet(r#"["foo", "basic"]"#));
}

#[test]
fn basic_is_not_duplicated() {
    assert_eq!(inject(r#""basic""#), facet(r#"["basic"]"#));
    assert_eq!(inject(r#"["foo", "basic"]"#), facet(r#"["foo", "basic"]"#));
}

#[test]
fn minimal_name_is_unchanged() {
    assert_eq!(inject(r#""minimal""#), facet(r#""minimal""#));
}

#[test]
fn minimal_in_list_is_unchanged() {
    assert_eq!(inject(r#"["foo", "minimal"]"#), facet(r#"["foo", "minimal"]"#));
}

#[test]
fn minimal_in_nested_list_is_unchanged() {
    let json = r#"["a", "d", ["c", {"minimal": null}]]"#;
    assert_eq!(inject(json), facet(json));
}

#[test]
fn minimal_selection_key_is_unchanged() {
    assert_eq!(inject(r#"{"minimal": null}"#), facet(r#"{"minimal": null}"#));
}

#[test]
fn nested_minimal_does_not_suppress_basic() {
    assert_eq!(
        inject(r#"{"author": "minimal"}"#),
        facet(r#"{"author": "minimal", "basic": null}"#)
    );
}

#[test]
fn list_gets_basic_appended() {
    assert_eq!(inject(r#"["a", "b"]"#), facet(r#"["a", "b", "basic"]"#));
}

#[test]
fn selection_gets_basic_key() {
    assert_eq!(
        inject(r#"{"a": "b", "c": "d"}"#),
        facet(r#"{"a": "b", "c": "d", "basic": null}"#)
    );
}

#[test]
fn selection_keeps_existing_basic_value() {
    assert_eq!(inject(r#"{"basic": "x"}"#), facet(r#"{"basic": "x"}"#));
}

#[test]
fn custom_default_names() {
    let defaults = DefaultFacets {
        default: "summary".into(),
        minimal: "bare".into(),
    };

    assert_eq!(
        inject_default(&facet(r#""foo""#), &defaults),
        facet(r#"["foo", "summary"]"#)
    );
    assert_eq!(
        inject_default(&facet(r#"["foo", "bare"]"#), &defaults),
        facet(r#"["foo", "bare"]"#)
    );
}

#[test]
fn default_facets_deserialize_with_defaults() {
    let defaults: DefaultFacets = serde_json::from_str(r#"{"default": "summary"}"#).unwrap();

    assert_eq!(defaults.default, "summary");
    assert_eq!(defaults.minimal, "minimal");
}
