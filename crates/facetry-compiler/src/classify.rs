//! Association classification.
//!
//! Whether a field names a nested resource is decided by the host's
//! reflection layer. The compiler only asks.

use indexmap::IndexSet;

use facetry_core::Name;

/// Reports whether a field refers to an associated resource.
pub trait Classifier: Send + Sync {
    fn is_association(&self, field: &Name) -> bool;
}

impl<F> Classifier for F
where
    F: Fn(&Name) -> bool + Send + Sync,
{
    fn is_association(&self, field: &Name) -> bool {
        self(field)
    }
}

/// Fixed set of association names.
///
/// The default (empty) set classifies every field as an attribute.
#[derive(Clone, Debug, Default)]
pub struct AssociationSet(IndexSet<Name>);

impl AssociationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<Name>) -> bool {
        self.0.insert(name.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Classifier for AssociationSet {
    fn is_association(&self, field: &Name) -> bool {
        self.0.contains(field)
    }
}

impl<N: Into<Name>> FromIterator<N> for AssociationSet {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
