//! Command and response types
//!
//! Commands are serialized with a `type` of `voice_assistant_manager/<op>`;
//! the connection adds the `id` when sending.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vam_core::{AlexaSettings, AliasMap, AssistantMode, FilterConfig, GoogleSettings};

// =============================================================================
// Outgoing
// =============================================================================

/// A panel operation executed by the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Command {
    #[serde(rename = "voice_assistant_manager/get_state")]
    GetState,
    #[serde(rename = "voice_assistant_manager/set_mode")]
    SetMode { mode: AssistantMode },
    #[serde(rename = "voice_assistant_manager/save_all")]
    SaveAll(SaveAllPayload),
    #[serde(rename = "voice_assistant_manager/preview_yaml")]
    PreviewYaml,
    #[serde(rename = "voice_assistant_manager/write_files")]
    WriteFiles,
    #[serde(rename = "voice_assistant_manager/check_config")]
    CheckConfig,
    #[serde(rename = "voice_assistant_manager/restart")]
    Restart,
}

impl Command {
    /// Short operation name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetState => "get_state",
            Self::SetMode { .. } => "set_mode",
            Self::SaveAll(_) => "save_all",
            Self::PreviewYaml => "preview_yaml",
            Self::WriteFiles => "write_files",
            Self::CheckConfig => "check_config",
            Self::Restart => "restart",
        }
    }
}

/// Fields pushed by `save_all`; absent fields are left unchanged by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaveAllPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_config: Option<FilterConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliases: Option<AliasMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_filter_config: Option<FilterConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alexa_filter_config: Option<FilterConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homekit_filter_config: Option<FilterConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_aliases: Option<AliasMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alexa_aliases: Option<AliasMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_settings: Option<GoogleSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alexa_settings: Option<AlexaSettings>,
    /// `Some(None)` detaches the bridge (sent as `null`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homekit_entry_id: Option<Option<String>>,
}

// =============================================================================
// Responses
// =============================================================================

/// Generated configuration for one assistant
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PreviewEntry {
    pub yaml: String,
    pub warnings: Vec<String>,
    pub complete: bool,
}

/// `preview_yaml` result; assistants that are not configured are absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PreviewContent {
    pub google: Option<PreviewEntry>,
    pub alexa: Option<PreviewEntry>,
}

/// Outcome of writing one assistant's files
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WriteStatus {
    pub written: bool,
    pub error: Option<String>,
}

/// `write_files` result
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WriteResult {
    pub google: WriteStatus,
    pub alexa: WriteStatus,
    pub homekit: WriteStatus,
}

/// `check_config` result
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CheckResult {
    pub success: bool,
    pub error: Option<String>,
}

// =============================================================================
// Incoming frames
// =============================================================================

/// Error body of a failed result frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RemoteError {
    pub code: String,
    pub message: String,
}

/// Frames the host sends on the WebSocket
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    AuthRequired {
        #[serde(default)]
        ha_version: Option<String>,
    },
    AuthOk {
        #[serde(default)]
        ha_version: Option<String>,
    },
    AuthInvalid {
        #[serde(default)]
        message: Option<String>,
    },
    Result {
        id: u64,
        success: bool,
        #[serde(default)]
        result: Option<Value>,
        #[serde(default)]
        error: Option<RemoteError>,
    },
    Event {
        #[serde(default)]
        id: u64,
    },
    Pong {
        #[serde(default)]
        id: u64,
    },
    #[serde(other)]
    Unknown,
}
