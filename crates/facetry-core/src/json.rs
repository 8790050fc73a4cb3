//! JSON representation of facet expressions.
//!
//! The mapping is positional:
//! - `null` is `Empty`
//! - a string is a `Name`
//! - an array is a `List`
//! - an object is a `Selection`
//!
//! Numbers and booleans have no facet meaning and are rejected.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::expr::FacetExpr;
use crate::name::Name;

/// Error converting external data into a facet expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExprError {
    /// Input is not null, a string, an array or an object.
    #[error("invalid facet: expected name, list or selection, found {found}")]
    InvalidShape { found: &'static str },

    #[error("invalid facet JSON: {0}")]
    Json(String),
}

impl FacetExpr {
    /// Convert a parsed JSON value.
    pub fn from_json(value: &Value) -> Result<Self, ExprError> {
        match value {
            Value::Null => Ok(Self::Empty),
            Value::String(s) => Ok(Self::Name(s.as_str().into())),
            Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            Value::Object(entries) => entries
                .iter()
                .map(|(k, v)| Ok((Name::from(k.as_str()), Self::from_json(v)?)))
                .collect::<Result<IndexMap<_, _>, ExprError>>()
                .map(Self::Selection),
            Value::Bool(_) => Err(ExprError::InvalidShape { found: "boolean" }),
            Value::Number(_) => Err(ExprError::InvalidShape { found: "number" }),
        }
    }

    /// Parse JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ExprError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ExprError::Json(e.to_string()))?;
        Self::from_json(&value)
    }
}

impl Serialize for FacetExpr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FacetExpr::Empty => serializer.serialize_none(),
            FacetExpr::Name(n) => serializer.serialize_str(n.as_str()),
            FacetExpr::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            FacetExpr::Selection(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, nested) in entries {
                    map.serialize_entry(key, nested)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for FacetExpr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawFacet::deserialize(deserializer).map(Into::into)
    }
}

/// Raw facet matching the JSON shapes one to one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFacet {
    Empty,
    Name(String),
    List(Vec<RawFacet>),
    Selection(IndexMap<String, RawFacet>),
}

impl From<RawFacet> for FacetExpr {
    fn from(raw: RawFacet) -> Self {
        match raw {
            RawFacet::Empty => FacetExpr::Empty,
            RawFacet::Name(s) => FacetExpr::Name(s.into()),
            RawFacet::List(items) => FacetExpr::List(items.into_iter().map(Into::into).collect()),
            RawFacet::Selection(entries) => FacetExpr::Selection(
                entries
                    .into_iter()
                    .map(|(k, v)| (Name::from(k), v.into()))
                    .collect(),
            ),
        }
    }
}
