//! Per-entity voice alias overrides

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Longest alias the panel accepts
pub const MAX_ALIAS_LENGTH: usize = 128;

/// Mapping from entity id to the name voice assistants should use
///
/// Values are never blank: setting a blank alias removes the entry, and
/// blank entries received from the host are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, String>", into = "IndexMap<String, String>")]
pub struct AliasMap(IndexMap<String, String>);

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, entity_id: &str) -> Option<&str> {
        self.0.get(entity_id).map(String::as_str)
    }

    pub fn contains(&self, entity_id: &str) -> bool {
        self.0.contains_key(entity_id)
    }

    /// Set or clear an alias. Returns true if the stored value changed.
    pub fn set(&mut self, entity_id: impl Into<String>, alias: impl Into<String>) -> bool {
        let entity_id = entity_id.into();
        let alias = alias.into();
        if alias.trim().is_empty() {
            return self.remove(&entity_id);
        }
        self.0.insert(entity_id, alias.clone()).as_deref() != Some(alias.as_str())
    }

    /// Remove an alias. Returns true if one was present.
    pub fn remove(&mut self, entity_id: &str) -> bool {
        self.0.shift_remove(entity_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<IndexMap<String, String>> for AliasMap {
    fn from(map: IndexMap<String, String>) -> Self {
        Self(
            map.into_iter()
                .filter(|(_, alias)| !alias.trim().is_empty())
                .collect(),
        )
    }
}

impl From<AliasMap> for IndexMap<String, String> {
    fn from(map: AliasMap) -> Self {
        map.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AliasMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}
