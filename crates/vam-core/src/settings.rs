//! Per-assistant settings blocks edited on the settings tab

use serde::{Deserialize, Serialize};

/// Google Assistant (cloud assistant) settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    pub enabled: bool,
    pub project_id: String,
    pub service_account_path: String,
    pub report_state: bool,
    pub secure_devices_pin: String,
    pub advanced_yaml: String,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            project_id: String::new(),
            service_account_path: String::new(),
            report_state: true,
            secure_devices_pin: String::new(),
            advanced_yaml: String::new(),
        }
    }
}

impl GoogleSettings {
    /// Enough is filled in to generate configuration
    pub fn is_complete(&self) -> bool {
        self.enabled && !self.project_id.is_empty() && !self.service_account_path.is_empty()
    }
}

/// Alexa (voice-commerce assistant) settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlexaSettings {
    pub enabled: bool,
    /// Base configuration; required for generation
    pub advanced_yaml: String,
}

impl AlexaSettings {
    pub fn is_complete(&self) -> bool {
        self.enabled && !self.advanced_yaml.is_empty()
    }
}
