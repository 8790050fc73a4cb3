//! Alias table: named facet definitions.
//!
//! An alias maps a name to the raw expression it stands for. The identity
//! form `a -> a` is special: it declares `a` as a plain field, not a
//! reference to expand.

use indexmap::IndexMap;
use serde_json::Value;

use facetry_core::{ExprError, FacetExpr, Name};

use crate::Result;

/// Registry of named facet definitions, in registration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AliasTable {
    table: IndexMap<Name, FacetExpr>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an alias definition.
    ///
    /// Returns `true` if the alias was newly inserted, `false` if it already
    /// existed (in which case the old definition is replaced).
    pub fn insert(&mut self, name: impl Into<Name>, expr: FacetExpr) -> bool {
        self.table.insert(name.into(), expr).is_none()
    }

    /// Check if an alias is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Get the raw definition for an alias.
    pub fn get(&self, name: &str) -> Option<&FacetExpr> {
        self.table.get(name)
    }

    /// Definition to expand when `name` appears in an expression.
    ///
    /// `None` for unknown names and identity aliases; both are literal fields.
    pub fn reference(&self, name: &str) -> Option<&FacetExpr> {
        self.table
            .get(name)
            .filter(|def| !matches!(def, FacetExpr::Name(n) if n == name))
    }

    pub fn is_alias_reference(&self, name: &str) -> bool {
        self.reference(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterate over alias names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.table.keys()
    }

    /// Iterate over (name, definition) pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &FacetExpr)> {
        self.table.iter()
    }

    /// Copy every alias from `other`. Definitions in `other` win.
    pub fn extend_from(&mut self, other: &AliasTable) {
        for (name, expr) in other.iter() {
            self.table.insert(name.clone(), expr.clone());
        }
    }

    /// Load aliases from a JSON object of `"alias": <facet>` entries.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ExprError::Json(e.to_string()))?;
        let entries = match value {
            Value::Object(entries) => entries,
            other => {
                return Err(ExprError::InvalidShape {
                    found: json_kind(&other),
                }
                .into());
            }
        };

        let mut table = Self::new();
        for (name, definition) in &entries {
            table.insert(name.as_str(), FacetExpr::from_json(definition)?);
        }
        Ok(table)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<N: Into<Name>> FromIterator<(N, FacetExpr)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (N, FacetExpr)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, expr) in iter {
            table.insert(name, expr);
        }
        table
    }
}
