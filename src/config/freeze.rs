//! Deep-immutable configuration trees.
//!
//! Freezing converts a [`Value`] into a [`FrozenValue`]: every mapping, sequence
//! and string is moved behind an `Arc` and offers no mutable access. `null`,
//! `true` and `false` are stored inline since there is nothing to protect.
//! Clones are cheap and the tree can be shared freely across threads.

use super::keys::Node;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Number, Value};
use std::sync::Arc;

/// Immutable mapping. Keeps keys in the order they were frozen.
#[derive(Debug, Clone, Default)]
pub struct FrozenMap {
    entries: Box<[(Arc<str>, FrozenValue)]>,
}

impl FrozenMap {
    pub fn get(&self, key: &str) -> Option<&FrozenValue> {
        self.entries
            .iter()
            .find(|(k, _)| &**k == key)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrozenValue)> {
        self.entries.iter().map(|(k, v)| (&**k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| &**k)
    }
}

impl FromIterator<(Arc<str>, FrozenValue)> for FrozenMap {
    fn from_iter<I: IntoIterator<Item = (Arc<str>, FrozenValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// Same keys and values, in any order
impl PartialEq for FrozenMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

/// Immutable counterpart of [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum FrozenValue {
    Null,
    Bool(bool),
    Number(Number),
    String(Arc<str>),
    Sequence(Arc<[FrozenValue]>),
    Mapping(Arc<FrozenMap>),
}

impl FrozenValue {
    /// Freeze a value and everything beneath it.
    pub fn freeze(value: Value) -> Self {
        match value {
            Value::Null => FrozenValue::Null,
            Value::Bool(b) => FrozenValue::Bool(b),
            Value::Number(n) => FrozenValue::Number(n),
            Value::String(s) => FrozenValue::String(Arc::from(s)),
            Value::Array(items) => {
                FrozenValue::Sequence(items.into_iter().map(FrozenValue::freeze).collect())
            }
            Value::Object(map) => FrozenValue::Mapping(Arc::new(
                map.into_iter()
                    .map(|(k, v)| (Arc::from(k), FrozenValue::freeze(v)))
                    .collect(),
            )),
        }
    }

    /// An owned, mutable copy of this tree.
    pub fn thaw(&self) -> Value {
        match self {
            FrozenValue::Null => Value::Null,
            FrozenValue::Bool(b) => Value::Bool(*b),
            FrozenValue::Number(n) => Value::Number(n.clone()),
            FrozenValue::String(s) => Value::String(s.to_string()),
            FrozenValue::Sequence(items) => Value::Array(items.iter().map(Self::thaw).collect()),
            FrozenValue::Mapping(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.to_string(), v.thaw()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }

    /// Whether this node is a singleton held inline rather than behind an `Arc`.
    pub fn is_singleton(&self) -> bool {
        matches!(self, FrozenValue::Null | FrozenValue::Bool(_))
    }

    pub fn get(&self, key: &str) -> Option<&FrozenValue> {
        self.as_mapping()?.get(key)
    }

    pub fn as_mapping(&self) -> Option<&FrozenMap> {
        match self {
            FrozenValue::Mapping(map) => Some(map.as_ref()),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[FrozenValue]> {
        match self {
            FrozenValue::Sequence(items) => Some(items.as_ref()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FrozenValue::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FrozenValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FrozenValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FrozenValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FrozenValue::Null)
    }
}

impl From<Value> for FrozenValue {
    fn from(value: Value) -> Self {
        FrozenValue::freeze(value)
    }
}

impl Node for FrozenValue {
    fn child(&self, key: &str) -> Option<&Self> {
        self.get(key)
    }
}

impl Serialize for FrozenValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FrozenValue::Null => serializer.serialize_unit(),
            FrozenValue::Bool(b) => serializer.serialize_bool(*b),
            FrozenValue::Number(n) => n.serialize(serializer),
            FrozenValue::String(s) => serializer.serialize_str(s),
            FrozenValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            FrozenValue::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map.iter() {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}
