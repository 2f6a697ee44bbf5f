//! Client error types

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised while talking to the host
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },

    #[error("timed out connecting to {url}")]
    ConnectTimeout { url: String },

    #[error("authentication rejected: {0}")]
    AuthInvalid(String),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("connection closed by host")]
    Closed,

    #[error("unexpected message: {0}")]
    Protocol(String),

    /// The host answered with `success: false`
    #[error("{message}")]
    Remote { code: String, message: String },

    #[error("invalid {command} response: {source}")]
    Decode {
        command: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
