//! Pending-edit buffer
//!
//! A mutable copy of every editable part of the snapshot. All local edits
//! land here; the committed snapshot only changes on load.

use vam_client::SaveAllPayload;
use vam_core::{
    AlexaSettings, AliasMap, AssistantMode, FilterConfig, GoogleSettings, ScopeKey,
    VoiceManagerState,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingBuffer {
    filter_config: FilterConfig,
    aliases: AliasMap,
    google_filter_config: FilterConfig,
    google_aliases: AliasMap,
    alexa_filter_config: FilterConfig,
    alexa_aliases: AliasMap,
    homekit_filter_config: FilterConfig,
    google_settings: GoogleSettings,
    alexa_settings: AlexaSettings,
    homekit_bridge: Option<String>,
}

impl PendingBuffer {
    pub fn from_state(state: &VoiceManagerState) -> Self {
        Self {
            filter_config: state.filter_config.clone(),
            aliases: state.aliases.clone(),
            google_filter_config: state.google_filter_config.clone(),
            google_aliases: state.google_aliases.clone(),
            alexa_filter_config: state.alexa_filter_config.clone(),
            alexa_aliases: state.alexa_aliases.clone(),
            homekit_filter_config: state.homekit_filter_config.clone(),
            google_settings: state.google_settings.clone(),
            alexa_settings: state.alexa_settings.clone(),
            homekit_bridge: committed_bridge(state),
        }
    }

    pub fn filter_config(&self, scope: ScopeKey) -> &FilterConfig {
        match scope {
            ScopeKey::Shared => &self.filter_config,
            ScopeKey::Google => &self.google_filter_config,
            ScopeKey::Alexa => &self.alexa_filter_config,
            ScopeKey::Homekit => &self.homekit_filter_config,
        }
    }

    pub fn filter_config_mut(&mut self, scope: ScopeKey) -> &mut FilterConfig {
        self.scope_mut(scope).0
    }

    pub fn aliases(&self, scope: ScopeKey) -> Option<&AliasMap> {
        match scope {
            ScopeKey::Shared => Some(&self.aliases),
            ScopeKey::Google => Some(&self.google_aliases),
            ScopeKey::Alexa => Some(&self.alexa_aliases),
            ScopeKey::Homekit => None,
        }
    }

    pub fn aliases_mut(&mut self, scope: ScopeKey) -> Option<&mut AliasMap> {
        self.scope_mut(scope).1
    }

    /// Filter config and aliases of one scope, borrowed together
    pub fn scope_mut(&mut self, scope: ScopeKey) -> (&mut FilterConfig, Option<&mut AliasMap>) {
        match scope {
            ScopeKey::Shared => (&mut self.filter_config, Some(&mut self.aliases)),
            ScopeKey::Google => (&mut self.google_filter_config, Some(&mut self.google_aliases)),
            ScopeKey::Alexa => (&mut self.alexa_filter_config, Some(&mut self.alexa_aliases)),
            ScopeKey::Homekit => (&mut self.homekit_filter_config, None),
        }
    }

    pub fn google_settings(&self) -> &GoogleSettings {
        &self.google_settings
    }

    pub fn google_settings_mut(&mut self) -> &mut GoogleSettings {
        &mut self.google_settings
    }

    pub fn alexa_settings(&self) -> &AlexaSettings {
        &self.alexa_settings
    }

    pub fn alexa_settings_mut(&mut self) -> &mut AlexaSettings {
        &mut self.alexa_settings
    }

    pub fn homekit_bridge(&self) -> Option<&str> {
        self.homekit_bridge.as_deref()
    }

    /// Select a bridge entry, or `None` to detach HomeKit
    pub fn set_homekit_bridge(&mut self, entry_id: Option<String>) {
        self.homekit_bridge = entry_id.filter(|id| !id.is_empty());
    }

    /// Build the `save_all` payload for the given committed snapshot
    ///
    /// Linked mode sends only the shared scope, separate mode only the
    /// per-assistant scopes. Settings are always sent. The bridge is sent
    /// only when it differs from the committed one.
    pub fn save_payload(&self, committed: &VoiceManagerState) -> SaveAllPayload {
        let mut payload = SaveAllPayload {
            google_settings: Some(self.google_settings.clone()),
            alexa_settings: Some(self.alexa_settings.clone()),
            ..Default::default()
        };

        match committed.mode {
            AssistantMode::Linked => {
                payload.filter_config = Some(self.filter_config.clone());
                payload.aliases = Some(self.aliases.clone());
            }
            AssistantMode::Separate => {
                payload.google_filter_config = Some(self.google_filter_config.clone());
                payload.alexa_filter_config = Some(self.alexa_filter_config.clone());
                payload.homekit_filter_config = Some(self.homekit_filter_config.clone());
                payload.google_aliases = Some(self.google_aliases.clone());
                payload.alexa_aliases = Some(self.alexa_aliases.clone());
            }
        }

        if self.homekit_bridge != committed_bridge(committed) {
            payload.homekit_entry_id = Some(self.homekit_bridge.clone());
        }

        payload
    }
}

fn committed_bridge(state: &VoiceManagerState) -> Option<String> {
    state
        .homekit_entry_id
        .clone()
        .filter(|id| !id.is_empty())
}
