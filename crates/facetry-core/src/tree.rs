//! Canonical field trees.
//!
//! A `FacetTree` maps each selected field to the tree selected beneath it.
//! An empty subtree marks a terminal field. Trees are what a serializer walks:
//! fully dealiased, deduplicated and closed under merge.

use std::fmt::Write as _;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};

use crate::name::Name;

/// Normalized, deduplicated field selection.
///
/// Keys keep first-insertion order for stable output. Equality ignores order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetTree(IndexMap<Name, FacetTree>);

impl FacetTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tree holding a single terminal field.
    pub fn leaf(name: impl Into<Name>) -> Self {
        let mut tree = Self::new();
        tree.0.insert(name.into(), Self::new());
        tree
    }

    /// True when this tree selects nothing beneath its owner.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, name: &str) -> Option<&FacetTree> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Merge `nested` under `name`, keeping whatever is already there.
    pub fn insert(&mut self, name: impl Into<Name>, nested: FacetTree) {
        match self.0.entry(name.into()) {
            Entry::Occupied(mut e) => e.get_mut().merge(nested),
            Entry::Vacant(e) => {
                e.insert(nested);
            }
        }
    }

    /// Deep union. A terminal never overrides a deeper selection.
    pub fn merge(&mut self, other: FacetTree) {
        for (name, nested) in other.0 {
            self.insert(name, nested);
        }
    }

    /// Deep union of two trees, consuming both.
    pub fn merged(mut a: FacetTree, b: FacetTree) -> FacetTree {
        a.merge(b);
        a
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Name, FacetTree> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Name> {
        self.0.keys()
    }

    /// Top-level field names, in selection order.
    pub fn field_names(&self) -> Vec<Name> {
        self.0.keys().cloned().collect()
    }

    /// Keep only the top-level fields for which `keep` returns true.
    ///
    /// Nested subtrees are copied untouched.
    pub fn retain_top_level(&self, mut keep: impl FnMut(&Name) -> bool) -> FacetTree {
        Self(
            self.0
                .iter()
                .filter(|(name, _)| keep(name))
                .map(|(name, nested)| (name.clone(), nested.clone()))
                .collect(),
        )
    }

    /// Drop the top-level fields `is_association` reports as associations.
    pub fn without_associations(&self, is_association: impl Fn(&Name) -> bool) -> FacetTree {
        self.retain_top_level(|name| !is_association(name))
    }

    /// Indented rendering, one field per line, two spaces per level.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        if out.ends_with('\n') {
            out.pop();
        }
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        for (name, nested) in &self.0 {
            let _ = writeln!(out, "{:indent$}{name}", "", indent = depth * 2);
            nested.dump_into(out, depth + 1);
        }
    }
}

impl<K: Into<Name>> FromIterator<(K, FacetTree)> for FacetTree {
    fn from_iter<I: IntoIterator<Item = (K, FacetTree)>>(iter: I) -> Self {
        let mut tree = Self::new();
        for (name, nested) in iter {
            tree.insert(name, nested);
        }
        tree
    }
}

impl IntoIterator for FacetTree {
    type Item = (Name, FacetTree);
    type IntoIter = indexmap::map::IntoIter<Name, FacetTree>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FacetTree {
    type Item = (&'a Name, &'a FacetTree);
    type IntoIter = indexmap::map::Iter<'a, Name, FacetTree>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
