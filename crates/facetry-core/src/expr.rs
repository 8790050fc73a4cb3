//! Facet expressions: the caller-facing selection grammar.
//!
//! An expression is one of four shapes:
//! - `Empty` - nothing requested (or, as a selection value, "leaf")
//! - `Name` - a single field or alias
//! - `List` - any number of expressions; order is irrelevant
//! - `Selection` - field or alias mapped to a nested expression
//!
//! Expressions are raw input. They become canonical only after dealiasing
//! and normalization in `facetry-compiler`.

use std::fmt;

use indexmap::IndexMap;

use crate::name::Name;
use crate::tree::FacetTree;

/// A polymorphic field selection request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FacetExpr {
    #[default]
    Empty,
    Name(Name),
    List(Vec<FacetExpr>),
    /// Insertion-ordered; equality ignores order.
    Selection(IndexMap<Name, FacetExpr>),
}

impl FacetExpr {
    pub fn name(name: impl Into<Name>) -> Self {
        Self::Name(name.into())
    }

    pub fn list<I, E>(items: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<FacetExpr>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a selection from `(key, nested)` pairs.
    ///
    /// Duplicate keys keep the last nested value, like any map literal.
    pub fn select<I, K, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<Name>,
        E: Into<FacetExpr>,
    {
        Self::Selection(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// True for `Empty`, an empty list and an empty selection.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Name(_) => false,
            Self::List(items) => items.is_empty(),
            Self::Selection(entries) => entries.is_empty(),
        }
    }

    pub fn as_name(&self) -> Option<&Name> {
        match self {
            Self::Name(n) => Some(n),
            _ => None,
        }
    }

    /// Whether `name` is requested at the top level of this expression.
    ///
    /// Matches an atom, any atom inside nested lists, or a selection key.
    /// Selection values belong to another resource and are never inspected.
    pub fn mentions(&self, name: &str) -> bool {
        match self {
            Self::Empty => false,
            Self::Name(n) => n == name,
            Self::List(items) => items.iter().any(|item| item.mentions(name)),
            Self::Selection(entries) => entries.contains_key(name),
        }
    }

    /// Key under which the compiled form of this expression is memoized.
    ///
    /// Atoms key by their bare name so that an atom naming an alias shares
    /// the alias's compiled entry.
    pub fn memo_key(&self) -> String {
        match self {
            Self::Name(n) => n.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<Name> for FacetExpr {
    fn from(name: Name) -> Self {
        Self::Name(name)
    }
}

impl From<&Name> for FacetExpr {
    fn from(name: &Name) -> Self {
        Self::Name(name.clone())
    }
}

impl From<&str> for FacetExpr {
    fn from(s: &str) -> Self {
        Self::Name(s.into())
    }
}

impl From<String> for FacetExpr {
    fn from(s: String) -> Self {
        Self::Name(s.into())
    }
}

impl From<Vec<FacetExpr>> for FacetExpr {
    fn from(items: Vec<FacetExpr>) -> Self {
        Self::List(items)
    }
}

impl<T: Into<FacetExpr>> From<Option<T>> for FacetExpr {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Empty, Into::into)
    }
}

/// A canonical tree read back as an expression.
///
/// Terminal subtrees become `Empty` selection values. Only meaningful as
/// input to normalization: dealiasing the result again would treat those
/// leaves as alias references.
impl From<FacetTree> for FacetExpr {
    fn from(tree: FacetTree) -> Self {
        if tree.is_empty() {
            return Self::Empty;
        }
        Self::Selection(
            tree.into_iter()
                .map(|(name, nested)| (name, nested.into()))
                .collect(),
        )
    }
}

impl From<&FacetTree> for FacetExpr {
    fn from(tree: &FacetTree) -> Self {
        tree.clone().into()
    }
}

/// Compact JSON.
impl fmt::Display for FacetExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
