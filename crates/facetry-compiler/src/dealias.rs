//! Alias expansion.
//!
//! Rewrites an expression so that every alias reference at this resource's
//! level is replaced by its definition. The result keeps the expression
//! shape (lists stay lists) and is handed to [`normalize`](crate::normalize)
//! for merging.
//!
//! Two reserved names are not aliases but views of compiled state:
//! - `all` - union of every alias's fields
//! - `all_attributes` - the same union without association fields
//!
//! Self-referencing declarations are caught twice: an explicit expansion
//! stack reports the exact cycle, and a depth counter bounds everything else.
//!
//! While `all` itself is being built there is no aggregate yet. The views then
//! expand to nothing and the dealiaser remembers it, so the compiler can run
//! that alias again once the aggregate exists.

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};

use facetry_core::name::ALL_ATTRIBUTES;
use facetry_core::{FacetExpr, Name};

use crate::alias_table::AliasTable;
use crate::config::NormalizedFacet;
use crate::error::ConfigError;
use crate::normalize::normalize;
use crate::Result;

/// Default maximum alias expansion depth.
pub const DEFAULT_RECURSION_LIMIT: u32 = 256;

/// Expands alias references within facet expressions.
pub struct Dealiaser<'a> {
    aliases: &'a AliasTable,
    /// Compiled `all` entry. `None` while it is still being built.
    aggregate: Option<&'a NormalizedFacet>,
    recursion_limit: u32,
    /// Aliases currently being expanded, outermost first.
    stack: IndexSet<Name>,
    /// Set when `all` or `all_attributes` was read with no aggregate.
    needs_aggregate: bool,
}

impl<'a> Dealiaser<'a> {
    pub fn new(
        aliases: &'a AliasTable,
        aggregate: Option<&'a NormalizedFacet>,
        recursion_limit: u32,
    ) -> Self {
        Self {
            aliases,
            aggregate,
            recursion_limit,
            stack: IndexSet::new(),
            needs_aggregate: false,
        }
    }

    /// Expand every alias reference in `expr`.
    pub fn dealias(&mut self, expr: &FacetExpr) -> Result<FacetExpr> {
        self.dealias_expr(expr, 0)
    }

    /// Whether an expansion so far depended on the missing `all` aggregate.
    pub fn needs_aggregate(&self) -> bool {
        self.needs_aggregate
    }

    fn dealias_expr(&mut self, expr: &FacetExpr, depth: u32) -> Result<FacetExpr> {
        if depth > self.recursion_limit {
            tracing::warn!(
                limit = self.recursion_limit,
                "facet expansion exceeded recursion limit"
            );
            return Err(ConfigError::RecursionLimitExceeded {
                limit: self.recursion_limit,
            });
        }

        match expr {
            FacetExpr::Empty => Ok(FacetExpr::Empty),
            FacetExpr::Name(name) => self.dealias_name(name, depth),
            FacetExpr::List(items) => items
                .iter()
                .map(|item| self.dealias_expr(item, depth + 1))
                .collect::<Result<Vec<_>>>()
                .map(FacetExpr::List),
            FacetExpr::Selection(entries) => self.dealias_selection(entries, depth),
        }
    }

    fn dealias_name(&mut self, name: &Name, depth: u32) -> Result<FacetExpr> {
        if name.is_reserved() {
            let Some(aggregate) = self.aggregate else {
                self.needs_aggregate = true;
                return Ok(FacetExpr::Empty);
            };
            let view = if name == ALL_ATTRIBUTES {
                &aggregate.attributes
            } else {
                &aggregate.fields
            };
            return Ok(view.into());
        }

        let Some(definition) = self.aliases.reference(name.as_str()) else {
            return Ok(FacetExpr::Name(name.clone()));
        };

        if !self.stack.insert(name.clone()) {
            let mut chain: Vec<Name> = self
                .stack
                .iter()
                .skip_while(|n| *n != name)
                .cloned()
                .collect();
            chain.push(name.clone());
            tracing::warn!(alias = %name, "self referencing facet declaration");
            return Err(ConfigError::AliasCycle { chain });
        }

        tracing::trace!(alias = %name, depth, "expanding facet alias");
        let expanded = self.dealias_expr(definition, depth + 1);
        self.stack.pop();
        expanded
    }

    /// Expand selection keys.
    ///
    /// A key with an empty value is a bare reference and is replaced by its
    /// whole expansion. A key with a nested value hands that value to every
    /// field the key expands to; the nested value itself is left alone.
    fn dealias_selection(
        &mut self,
        entries: &IndexMap<Name, FacetExpr>,
        depth: u32,
    ) -> Result<FacetExpr> {
        let mut fields: IndexMap<Name, FacetExpr> = IndexMap::new();
        let mut expansions = Vec::new();

        for (key, nested) in entries {
            let expanded = self.dealias_name(key, depth + 1)?;

            if nested.is_empty() {
                match expanded {
                    FacetExpr::Name(field) => attach(&mut fields, field, FacetExpr::Empty),
                    FacetExpr::Empty => {}
                    other => expansions.push(other),
                }
                continue;
            }

            for (field, subtree) in normalize(&expanded) {
                let value = if subtree.is_terminal() {
                    nested.clone()
                } else {
                    FacetExpr::List(vec![subtree.into(), nested.clone()])
                };
                attach(&mut fields, field, value);
            }
        }

        if expansions.is_empty() {
            return Ok(FacetExpr::Selection(fields));
        }

        let mut parts = Vec::with_capacity(expansions.len() + 1);
        if !fields.is_empty() {
            parts.push(FacetExpr::Selection(fields));
        }
        parts.extend(expansions);
        Ok(FacetExpr::List(parts))
    }
}

/// Add `nested` under `field`, combining with any value already present.
fn attach(fields: &mut IndexMap<Name, FacetExpr>, field: Name, nested: FacetExpr) {
    match fields.entry(field) {
        Entry::Occupied(mut e) => {
            let existing = std::mem::take(e.get_mut());
            *e.get_mut() = combine(existing, nested);
        }
        Entry::Vacant(e) => {
            e.insert(nested);
        }
    }
}

fn combine(a: FacetExpr, b: FacetExpr) -> FacetExpr {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b,
        (_, true) => a,
        _ => FacetExpr::List(vec![a, b]),
    }
}
