#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for facetry field selection.
//!
//! Two layers:
//! - **Input layer**: [`FacetExpr`], the polymorphic expression callers write
//! - **Canonical layer**: [`FacetTree`], the deduplicated tree serializers walk
//!
//! Both share [`Name`] identifiers. JSON conversion lives alongside so hosts
//! can declare facets in data files.

mod expr;
mod json;
pub mod name;
mod tree;


pub use expr::FacetExpr;
pub use json::ExprError;
pub use name::Name;
pub use tree::FacetTree;
