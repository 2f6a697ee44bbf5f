//! WebSocket implementation of [`Backend`]

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace, warn};

use crate::backend::Backend;
use crate::error::{ClientError, ClientResult};
use crate::messages::{Command, ServerMessage};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// An authenticated connection to the host's WebSocket API
///
/// Calls are serialized: each one holds the connection until its result
/// frame arrives.
pub struct WsBackend {
    url: String,
    stream: Mutex<WsStream>,
    next_id: AtomicU64,
}

impl WsBackend {
    /// Connect and authenticate with a long-lived access token
    ///
    /// `connect_timeout` bounds the TCP connect and the auth exchange only.
    pub async fn connect(url: &str, token: &str, connect_timeout: Duration) -> ClientResult<Self> {
        let handshake = async {
            let (mut stream, _) = connect_async(url)
                .await
                .map_err(|source| ClientError::Connect {
                    url: url.to_string(),
                    source,
                })?;
            authenticate(&mut stream, token).await?;
            Ok::<_, ClientError>(stream)
        };

        let stream = timeout(connect_timeout, handshake)
            .await
            .map_err(|_| ClientError::ConnectTimeout {
                url: url.to_string(),
            })??;

        info!(url, "Connected to host");
        Ok(Self {
            url: url.to_string(),
            stream: Mutex::new(stream),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a close frame; errors are ignored since the connection is going away
    pub async fn close(&self) {
        let mut stream = self.stream.lock().await;
        if let Err(e) = stream.close(None).await {
            debug!(error = %e, "Error closing connection");
        }
    }
}

#[async_trait]
impl Backend for WsBackend {
    async fn call(&self, command: Command) -> ClientResult<Value> {
        let name = command.name();
        let mut frame = serde_json::to_value(&command)?;

        let mut stream = self.stream.lock().await;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        if let Value::Object(map) = &mut frame {
            map.insert("id".to_string(), json!(id));
        }

        debug!(id, command = name, "Sending command");
        stream.send(Message::Text(frame.to_string())).await?;

        loop {
            match recv(&mut stream).await? {
                ServerMessage::Result {
                    id: result_id,
                    success,
                    result,
                    error,
                } if result_id == id => {
                    if success {
                        trace!(id, command = name, "Command succeeded");
                        return Ok(result.unwrap_or(Value::Null));
                    }
                    let error = error.unwrap_or_default();
                    warn!(
                        id,
                        command = name,
                        code = %error.code,
                        "Command failed: {}",
                        error.message
                    );
                    return Err(ClientError::Remote {
                        code: error.code,
                        message: error.message,
                    });
                }
                other => trace!(id, ?other, "Skipping unrelated frame"),
            }
        }
    }
}

async fn authenticate(stream: &mut WsStream, token: &str) -> ClientResult<()> {
    match recv(stream).await? {
        ServerMessage::AuthRequired { ha_version } => {
            debug!(?ha_version, "Host requested authentication");
        }
        other => {
            return Err(ClientError::Protocol(format!(
                "expected auth_required, got {other:?}"
            )))
        }
    }

    let auth = json!({"type": "auth", "access_token": token});
    stream.send(Message::Text(auth.to_string())).await?;

    match recv(stream).await? {
        ServerMessage::AuthOk { ha_version } => {
            debug!(?ha_version, "Authenticated");
            Ok(())
        }
        ServerMessage::AuthInvalid { message } => Err(ClientError::AuthInvalid(
            message.unwrap_or_else(|| "invalid access token".to_string()),
        )),
        other => Err(ClientError::Protocol(format!(
            "expected auth_ok, got {other:?}"
        ))),
    }
}

/// Read the next JSON frame, skipping control frames
async fn recv(stream: &mut WsStream) -> ClientResult<ServerMessage> {
    loop {
        let message = stream.next().await.ok_or(ClientError::Closed)??;
        match message {
            Message::Text(text) => return Ok(serde_json::from_str(&text)?),
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            Message::Binary(_) => {
                return Err(ClientError::Protocol("unexpected binary frame".to_string()))
            }
            Message::Close(_) => return Err(ClientError::Closed),
        }
    }
}
