//! Expression to canonical tree conversion.
//!
//! Normalization is purely structural. It does not know about aliases: by
//! the time an expression gets here, the dealiaser has already expanded
//! every alias at this resource's level. Selection values are normalized
//! too, but as-is, since they name fields of an associated resource whose
//! aliases are resolved by that resource's own configuration.

use facetry_core::{FacetExpr, FacetTree};

/// Convert an expression into a canonical tree.
///
/// - `Empty` yields the empty tree
/// - a name yields a single terminal field
/// - a list folds its elements left to right with a deep merge
/// - a selection maps each key to its normalized value
pub fn normalize(expr: &FacetExpr) -> FacetTree {
    match expr {
        FacetExpr::Empty => FacetTree::new(),
        FacetExpr::Name(name) => FacetTree::leaf(name.clone()),
        FacetExpr::List(items) => items.iter().fold(FacetTree::new(), |mut acc, item| {
            acc.merge(normalize(item));
            acc
        }),
        FacetExpr::Selection(entries) => entries
            .iter()
            .map(|(name, nested)| (name.clone(), normalize(nested)))
            .collect(),
    }
}
