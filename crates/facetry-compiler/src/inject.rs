//! Default facet injection.
//!
//! Every request implicitly includes the default facet (`basic`) unless it
//! explicitly asks for the minimal facet (`minimal`). Only the top level of
//! the request is inspected; a `minimal` nested under an association applies
//! to that association, not to this resource.

use serde::{Deserialize, Serialize};

use facetry_core::name::{BASIC, MINIMAL};
use facetry_core::{FacetExpr, Name};

/// Names driving default injection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultFacets {
    /// Facet added to every request (default: `basic`).
    pub default: Name,
    /// Facet whose presence suppresses injection (default: `minimal`).
    pub minimal: Name,
}

impl Default for DefaultFacets {
    fn default() -> Self {
        Self {
            default: BASIC.into(),
            minimal: MINIMAL.into(),
        }
    }
}

/// Add the default facet to `expr` unless the minimal facet is requested.
///
/// Applied once to what a caller asks for, never to stored alias definitions.
pub fn inject_default(expr: &FacetExpr, defaults: &DefaultFacets) -> FacetExpr {
    let default = &defaults.default;

    match expr {
        FacetExpr::Empty => FacetExpr::Name(default.clone()),
        _ if expr.mentions(defaults.minimal.as_str()) => expr.clone(),
        FacetExpr::Name(name) if name == default => FacetExpr::List(vec![expr.clone()]),
        FacetExpr::Name(_) => FacetExpr::List(vec![expr.clone(), FacetExpr::Name(default.clone())]),
        FacetExpr::List(items) => {
            let mut items = items.clone();
            if !items.iter().any(|item| item.as_name() == Some(default)) {
                items.push(FacetExpr::Name(default.clone()));
            }
            FacetExpr::List(items)
        }
        FacetExpr::Selection(entries) => {
            let mut entries = entries.clone();
            entries.entry(default.clone()).or_insert(FacetExpr::Empty);
            FacetExpr::Selection(entries)
        }
    }
}
