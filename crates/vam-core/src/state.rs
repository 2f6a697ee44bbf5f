//! Full state snapshot returned by the host's `get_state` command

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::alias::AliasMap;
use crate::entity::{Area, Device, Entity, HomekitBridge};
use crate::filter_config::FilterConfig;
use crate::scope::{AssistantMode, ScopeKey};
use crate::settings::{AlexaSettings, GoogleSettings};

/// Timestamps of the last configuration generation per assistant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LastGenerated {
    pub google: Option<String>,
    pub alexa: Option<String>,
    pub homekit: Option<String>,
}

impl LastGenerated {
    /// Parse a stored ISO-8601 timestamp; unparseable values read as never
    pub fn parse(raw: Option<&str>) -> Option<DateTime<FixedOffset>> {
        raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }

    pub fn google_at(&self) -> Option<DateTime<FixedOffset>> {
        Self::parse(self.google.as_deref())
    }

    pub fn alexa_at(&self) -> Option<DateTime<FixedOffset>> {
        Self::parse(self.alexa.as_deref())
    }

    pub fn homekit_at(&self) -> Option<DateTime<FixedOffset>> {
        Self::parse(self.homekit.as_deref())
    }
}

/// Everything the panel renders, as delivered by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceManagerState {
    pub mode: AssistantMode,
    pub filter_config: FilterConfig,
    pub aliases: AliasMap,
    pub google_filter_config: FilterConfig,
    pub google_aliases: AliasMap,
    pub alexa_filter_config: FilterConfig,
    pub alexa_aliases: AliasMap,
    pub homekit_filter_config: FilterConfig,
    pub homekit_entry_id: Option<String>,
    pub google_settings: GoogleSettings,
    pub alexa_settings: AlexaSettings,
    pub last_generated: LastGenerated,
    pub google_complete: bool,
    pub alexa_complete: bool,
    pub homekit_complete: bool,
    pub entities: Vec<Entity>,
    pub devices: Vec<Device>,
    pub areas: Vec<Area>,
    pub domains: Vec<String>,
    pub homekit_bridges: Vec<HomekitBridge>,
    pub homekit_supported_domains: Vec<String>,
}

impl VoiceManagerState {
    pub fn filter_config(&self, scope: ScopeKey) -> &FilterConfig {
        match scope {
            ScopeKey::Shared => &self.filter_config,
            ScopeKey::Google => &self.google_filter_config,
            ScopeKey::Alexa => &self.alexa_filter_config,
            ScopeKey::Homekit => &self.homekit_filter_config,
        }
    }

    pub fn aliases(&self, scope: ScopeKey) -> Option<&AliasMap> {
        match scope {
            ScopeKey::Shared => Some(&self.aliases),
            ScopeKey::Google => Some(&self.google_aliases),
            ScopeKey::Alexa => Some(&self.alexa_aliases),
            ScopeKey::Homekit => None,
        }
    }

    pub fn entity(&self, entity_id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.entity_id == entity_id)
    }

    pub fn bridge(&self, entry_id: &str) -> Option<&HomekitBridge> {
        self.homekit_bridges.iter().find(|b| b.entry_id == entry_id)
    }

    pub fn area_name(&self, area_id: &str) -> Option<&str> {
        self.areas
            .iter()
            .find(|a| a.id == area_id)
            .map(|a| a.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter_config::FilterMode;

    #[test]
    fn test_sparse_snapshot_uses_defaults() {
        let state: VoiceManagerState = serde_json::from_str(
            r#"{
                "mode": "separate",
                "google_filter_config": {"filter_mode": "include", "domains": ["light"]},
                "entities": [{"entity_id": "light.kitchen", "name": "Kitchen"}],
                "last_generated": {"google": "2026-01-05T10:00:00+00:00", "alexa": "garbage"}
            }"#,
        )
        .unwrap();

        assert_eq!(state.mode, AssistantMode::Separate);
        assert_eq!(
            state.filter_config(ScopeKey::Google).filter_mode,
            FilterMode::Include
        );
        assert_eq!(state.filter_config(ScopeKey::Alexa), &FilterConfig::default());
        assert!(state.aliases(ScopeKey::Homekit).is_none());
        assert!(state.entity("light.kitchen").is_some());
        assert!(state.last_generated.google_at().is_some());
        assert!(state.last_generated.alexa_at().is_none());
        assert!(state.last_generated.homekit_at().is_none());
    }
}
