use facetry_core::{FacetExpr, FacetTree};

use crate::normalize;
use crate::shot_normalized;
use crate::test_utils::facet;

#[test]
fn empty_is_empty_tree() {
    assert_eq!(normalize(&FacetExpr::Empty), FacetTree::new());
}

#[test]
fn name_is_single_leaf() {
    assert_eq!(normalize(&FacetExpr::name("foo")), FacetTree::leaf("foo"));
}

#[test]
fn list_of_names() {
    shot_normalized!(r#"["foo", "bar"]"#, @r"
    foo
    bar
    ");
}

#[test]
fn composite() {
    shot_normalized!(r#"["foo", {"bar": "whatnot"}]"#, @r"
    foo
    bar
      whatnot
    ");
}

#[test]
fn nested_lists_flatten() {
    shot_normalized!(r#"["a", [["b", {"c": null, "d": "e"}]]]"#, @r"
    a
    b
    c
    d
      e
    ");
}

#[test]
fn nested_selection_values_are_normalized() {
    shot_normalized!(r#"
        ["a", [["b", {"c": null}, {"d": "e"}, {"f": [{"g": "h"}, "i"]}]]]
    "#, @r"
    a
    b
    c
    d
      e
    f
      g
        h
      i
    ");
}

#[test]
fn duplicates_merge_and_deeper_wins() {
    shot_normalized!(r#"["a", [["a", {"a": null}, {"a": "e"}]]]"#, @r"
    a
      e
    ");
}

#[test]
fn empty_list_is_empty_tree() {
    assert!(normalize(&facet("[]")).is_empty());
}

#[test]
fn normalizing_canonical_tree_is_idempotent() {
    let tree = normalize(&facet(r#"["a", {"d": ["e", {"f": "g"}]}, "b"]"#));

    let again = normalize(&FacetExpr::from(&tree));

    assert_eq!(again, tree);
}

#[test]
fn list_order_does_not_matter() {
    let a = normalize(&facet(r#"["x", {"y": "z"}, "w"]"#));
    let b = normalize(&facet(r#"["w", {"y": "z"}, "x"]"#));

    assert_eq!(a, b);
}
