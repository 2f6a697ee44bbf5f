//! Assistant modes, platforms and edit-scope resolution

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error for a string that names no known variant
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct ParseVariantError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseVariantError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Whether all assistants share one configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantMode {
    #[default]
    Linked,
    Separate,
}

impl AssistantMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linked => "linked",
            Self::Separate => "separate",
        }
    }
}

impl fmt::Display for AssistantMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssistantMode {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linked" => Ok(Self::Linked),
            "separate" => Ok(Self::Separate),
            other => Err(ParseVariantError::new("assistant mode", other)),
        }
    }
}

/// A voice assistant integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Cloud assistant
    #[default]
    Google,
    /// Voice-commerce assistant
    Alexa,
    /// Local bridge protocol; has no alias map
    Homekit,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Self::Google, Self::Alexa, Self::Homekit];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Alexa => "alexa",
            Self::Homekit => "homekit",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Self::Google),
            "alexa" => Ok(Self::Alexa),
            "homekit" => Ok(Self::Homekit),
            other => Err(ParseVariantError::new("platform", other)),
        }
    }
}

/// Which filter config / alias map an edit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    /// The shared config used in linked mode
    Shared,
    Google,
    Alexa,
    Homekit,
}

impl ScopeKey {
    /// The homekit scope carries filters only
    pub fn has_aliases(self) -> bool {
        !matches!(self, Self::Homekit)
    }

    /// Key of this scope's filter config in the state snapshot and save payload
    pub fn filter_config_key(self) -> &'static str {
        match self {
            Self::Shared => "filter_config",
            Self::Google => "google_filter_config",
            Self::Alexa => "alexa_filter_config",
            Self::Homekit => "homekit_filter_config",
        }
    }

    /// Key of this scope's alias map, if it has one
    pub fn aliases_key(self) -> Option<&'static str> {
        match self {
            Self::Shared => Some("aliases"),
            Self::Google => Some("google_aliases"),
            Self::Alexa => Some("alexa_aliases"),
            Self::Homekit => None,
        }
    }
}

impl From<Platform> for ScopeKey {
    fn from(platform: Platform) -> Self {
        match platform {
            Platform::Google => Self::Google,
            Platform::Alexa => Self::Alexa,
            Platform::Homekit => Self::Homekit,
        }
    }
}

/// Resolve the scope edits apply to
///
/// Linked mode always edits the shared scope; separate mode edits the
/// active platform's own scope.
pub fn resolve_scope(mode: AssistantMode, active_platform: Platform) -> ScopeKey {
    match mode {
        AssistantMode::Linked => ScopeKey::Shared,
        AssistantMode::Separate => active_platform.into(),
    }
}
