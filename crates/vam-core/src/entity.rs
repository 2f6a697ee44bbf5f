//! Read-only catalog types supplied by the host in the state snapshot

use serde::{Deserialize, Serialize};

/// Domain part of an entity id: the text before the first `.`
///
/// An id without a separator is treated as all-domain, which keeps the
/// exposure evaluator total over arbitrary strings.
pub fn domain_of(entity_id: &str) -> &str {
    entity_id
        .split_once('.')
        .map_or(entity_id, |(domain, _)| domain)
}

/// An entity as listed by the host's entity registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub area_id: Option<String>,
    #[serde(default)]
    pub area_name: Option<String>,
    #[serde(default)]
    pub platform: String,
}

impl Entity {
    /// Create a catalog entry with its domain derived from the id
    pub fn new(entity_id: impl Into<String>) -> Self {
        let entity_id = entity_id.into();
        Self {
            domain: domain_of(&entity_id).to_string(),
            entity_id,
            name: None,
            device_id: None,
            device_name: None,
            area_id: None,
            area_name: None,
            platform: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    pub fn with_area(mut self, area_id: impl Into<String>, area_name: impl Into<String>) -> Self {
        self.area_id = Some(area_id.into());
        self.area_name = Some(area_name.into());
        self
    }

    /// Domain as reported by the host, falling back to the id prefix
    pub fn domain(&self) -> &str {
        if self.domain.is_empty() {
            domain_of(&self.entity_id)
        } else {
            &self.domain
        }
    }

    /// Friendly name, or the entity id when the host has none
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.entity_id,
        }
    }
}

/// A device from the host's device registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub area_id: Option<String>,
    #[serde(default)]
    pub area_name: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// An area from the host's area registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub name: String,
}

/// A HomeKit Bridge config entry the local bridge scope can be attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomekitBridge {
    pub entry_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub include_domains: Vec<String>,
    #[serde(default)]
    pub exclude_entities: Vec<String>,
}
