//! Validated entity identifiers (`<domain>.<object_id>`)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Longest entity id the host accepts
pub const MAX_ENTITY_ID_LENGTH: usize = 255;

/// Error type for malformed entity ids
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntityIdError {
    #[error("entity_id is empty")]
    Empty,

    #[error("entity_id longer than {MAX_ENTITY_ID_LENGTH} characters")]
    TooLong,

    #[error("entity_id has no '.' separating domain and object_id")]
    MissingSeparator,

    #[error("domain '{0}' must be non-empty lowercase alphanumeric with underscores")]
    InvalidDomain(String),

    #[error("object_id '{0}' must be non-empty lowercase alphanumeric with underscores")]
    InvalidObjectId(String),
}

/// An entity id that passed validation, e.g. `light.kitchen`
///
/// The domain is everything before the first `.`; the object id is the
/// remainder. Both parts are restricted to `[a-z0-9_]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId {
    raw: String,
    split: usize,
}

impl EntityId {
    /// Validate a raw identifier
    pub fn parse(raw: impl Into<String>) -> Result<Self, EntityIdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(EntityIdError::Empty);
        }
        if raw.len() > MAX_ENTITY_ID_LENGTH {
            return Err(EntityIdError::TooLong);
        }
        let split = raw.find('.').ok_or(EntityIdError::MissingSeparator)?;
        let (domain, object_id) = (&raw[..split], &raw[split + 1..]);
        if !is_slug(domain) {
            return Err(EntityIdError::InvalidDomain(domain.to_string()));
        }
        if !is_slug(object_id) {
            return Err(EntityIdError::InvalidObjectId(object_id.to_string()));
        }
        Ok(Self { raw, split })
    }

    pub fn domain(&self) -> &str {
        &self.raw[..self.split]
    }

    pub fn object_id(&self) -> &str {
        &self.raw[self.split + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn is_slug(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

impl FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EntityId {
    type Error = EntityIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> String {
        id.raw
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
