//! Attribute maps shared by text and element nodes.
//!
//! Attributes can be supplied as nothing at all, a key/value map or any
//! iterable of pairs:
//!
//! ```rust
//! use folio_model::Attributes;
//! use std::collections::HashMap;
//!
//! let empty = Attributes::from(None::<Attributes>);
//! let pairs = Attributes::from([("bold", true)]);
//! let map: HashMap<&str, &str> = HashMap::from([("href", "https://example.com")]);
//! let mapped = Attributes::from(map);
//!
//! assert!(empty.is_empty());
//! assert!(pairs.has("bold"));
//! assert_eq!(mapped.len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Key/value attribute map. Ordering is irrelevant for equality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, Value>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set an attribute, returning the previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove an attribute, returning the previous value
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Set when `value` is `Some`, remove otherwise
    pub fn apply(&mut self, key: &str, value: Option<&Value>) -> Option<Value> {
        match value {
            Some(value) => self.set(key, value.clone()),
            None => self.remove(key),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for Attributes {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Attributes {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Attributes {
    fn from(map: BTreeMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>, S: BuildHasher> From<HashMap<K, V, S>> for Attributes {
    fn from(map: HashMap<K, V, S>) -> Self {
        map.into_iter().collect()
    }
}

impl<T: Into<Attributes>> From<Option<T>> for Attributes {
    fn from(attributes: Option<T>) -> Self {
        attributes.map(Into::into).unwrap_or_default()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
