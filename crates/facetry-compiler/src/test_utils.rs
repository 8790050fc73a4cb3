//! Test utilities and snapshot macros.

use facetry_core::{FacetExpr, FacetTree};

use crate::FacetConfig;

/// Parse a JSON facet expression.
pub fn facet(json: &str) -> FacetExpr {
    FacetExpr::from_json_str(json).unwrap_or_else(|e| panic!("bad test facet {json}: {e}"))
}

/// Collect every field `iterate` visits into a tree.
pub fn visited(config: &FacetConfig, expr: &FacetExpr) -> FacetTree {
    let mut tree = FacetTree::new();
    config
        .iterate(expr, |field, nested| tree.insert(field.clone(), nested.clone()))
        .expect("iterate failed");
    tree
}

/// Build a compiled config from a JSON object of aliases.
pub fn compiled(aliases: &str) -> FacetConfig {
    let table = crate::AliasTable::from_json_str(aliases).expect("bad test aliases");
    let mut config = FacetConfig::builder()
        .aliases(table)
        .build()
        .expect("build failed");
    config
        .compile(crate::AssociationSet::new())
        .expect("compile failed");
    config
}

/// Snapshot test for the fields visited when iterating a facet.
#[macro_export]
macro_rules! shot_facet {
    ($config:expr, $facet:literal, @$snapshot:literal) => {{
        let facet = $crate::test_utils::facet(indoc::indoc!($facet).trim());
        let tree = $crate::test_utils::visited(&$config, &facet);
        insta::assert_snapshot!(tree.dump(), @$snapshot);
    }};
}

/// Snapshot test for a normalized expression.
#[macro_export]
macro_rules! shot_normalized {
    ($facet:literal, @$snapshot:literal) => {{
        let facet = $crate::test_utils::facet(indoc::indoc!($facet).trim());
        let tree = $crate::normalize(&facet);
        insta::assert_snapshot!(tree.dump(), @$snapshot);
    }};
}
