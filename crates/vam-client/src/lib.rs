//! Client for the voice_assistant_manager WebSocket commands
//!
//! The host exposes every panel operation as a command on its WebSocket
//! API. This crate provides the typed commands and responses, the
//! [`Backend`] trait the panel is written against, and [`WsBackend`], the
//! implementation that talks to a running host.

mod backend;
mod error;
mod messages;
mod websocket;

pub use backend::Backend;
pub use error::{ClientError, ClientResult};
pub use messages::{
    CheckResult, Command, PreviewContent, PreviewEntry, RemoteError, SaveAllPayload,
    ServerMessage, WriteResult, WriteStatus,
};
pub use websocket::WsBackend;
