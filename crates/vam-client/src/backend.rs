//! The seam between the panel and the host

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use vam_core::{AssistantMode, VoiceManagerState};

use crate::error::{ClientError, ClientResult};
use crate::messages::{CheckResult, Command, PreviewContent, SaveAllPayload, WriteResult};

/// Executes panel commands against a host
///
/// Implementors only provide [`Backend::call`]; the typed operations are
/// derived from it.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Send one command and wait for its result payload
    async fn call(&self, command: Command) -> ClientResult<Value>;

    /// Fetch the full state snapshot
    async fn get_state(&self) -> ClientResult<VoiceManagerState> {
        let command = Command::GetState;
        let name = command.name();
        decode(name, self.call(command).await?)
    }

    async fn set_mode(&self, mode: AssistantMode) -> ClientResult<()> {
        self.call(Command::SetMode { mode }).await.map(drop)
    }

    async fn save_all(&self, payload: SaveAllPayload) -> ClientResult<()> {
        self.call(Command::SaveAll(payload)).await.map(drop)
    }

    async fn preview_yaml(&self) -> ClientResult<PreviewContent> {
        decode("preview_yaml", self.call(Command::PreviewYaml).await?)
    }

    async fn write_files(&self) -> ClientResult<WriteResult> {
        decode("write_files", self.call(Command::WriteFiles).await?)
    }

    async fn check_config(&self) -> ClientResult<CheckResult> {
        decode("check_config", self.call(Command::CheckConfig).await?)
    }

    async fn restart(&self) -> ClientResult<()> {
        self.call(Command::Restart).await.map(drop)
    }
}

#[async_trait]
impl<T: Backend + ?Sized> Backend for Arc<T> {
    async fn call(&self, command: Command) -> ClientResult<Value> {
        (**self).call(command).await
    }
}

fn decode<T: DeserializeOwned>(command: &'static str, value: Value) -> ClientResult<T> {
    serde_json::from_value(value).map_err(|source| ClientError::Decode { command, source })
}
