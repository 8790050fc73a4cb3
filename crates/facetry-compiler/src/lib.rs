//! Facetry compiler: alias expansion and normalization of facet expressions.
//!
//! This crate turns caller-supplied [`FacetExpr`]s into canonical
//! [`FacetTree`]s:
//! - `alias_table` - named facet definitions
//! - `inject` - implicit `basic` facet unless `minimal` is requested
//! - `dealias` - recursive alias expansion with cycle detection
//! - `normalize` - expression to canonical tree, merging duplicates
//! - `config` - compile-once state and field iteration
//!
//! The lifecycle is register, compile, then iterate any number of times:
//!
//! ```
//! use facetry_compiler::{AssociationSet, FacetConfig};
//! use facetry_core::FacetExpr;
//!
//! let mut config = FacetConfig::new();
//! config.register_alias("basic", FacetExpr::list(["id", "title"]))?;
//! config.compile(AssociationSet::from_iter(["author"]))?;
//!
//! let mut fields = Vec::new();
//! config.iterate(&FacetExpr::Empty, |field, _nested| fields.push(field.to_string()))?;
//! assert_eq!(fields, ["id", "title"]);
//! # Ok::<(), facetry_compiler::ConfigError>(())
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod alias_table;
mod classify;
pub mod config;
pub mod dealias;
mod error;
pub mod inject;
pub mod normalize;

#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
mod alias_table_tests;
#[cfg(test)]
mod inject_tests;
#[cfg(test)]
mod normalize_tests;

pub use alias_table::AliasTable;
pub use classify::{AssociationSet, Classifier};
pub use config::{FacetConfig, FacetConfigBuilder, NormalizedFacet};
pub use dealias::{DEFAULT_RECURSION_LIMIT, Dealiaser};
pub use error::ConfigError;
pub use inject::{DefaultFacets, inject_default};
pub use normalize::normalize;

pub use facetry_core::{ExprError, FacetExpr, FacetTree, Name};

/// Result type for facet configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
