//! WebSocket connection to the server's echo channel.

use crate::ClientError;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, instrument, warn};

/// How long to wait for the echoed frame.
const ECHO_TIMEOUT: Duration = Duration::from_secs(5);

/// State of the echo connection as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display)]
pub enum ConnectionStatus {
    /// Dial in progress.
    #[default]
    #[display("connecting")]
    Connecting,
    /// Socket open.
    #[display("connected")]
    Connected,
    /// Server closed the socket.
    #[display("disconnected")]
    Disconnected,
    /// Dial or read failed.
    #[display("error")]
    Error,
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    #[track_caller]
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::new(format!("WebSocket failed: {err}"), None)
    }
}

/// An open WebSocket to `/ws`.
#[derive(Debug)]
pub struct EchoChannel {
    url: String,
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl EchoChannel {
    /// Dials the echo endpoint at `url`, e.g. `ws://localhost:8080/ws`.
    #[instrument]
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        let (stream, response) = connect_async(url).await?;
        info!(status = %response.status(), "Echo channel connected");
        Ok(Self {
            url: url.to_string(),
            stream,
        })
    }

    /// Sends `text` and waits for the server to echo a frame back.
    ///
    /// Control frames are skipped. Returns the echoed payload as text.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn send_text(&mut self, text: &str) -> Result<String, ClientError> {
        self.stream.send(Message::text(text)).await?;
        tokio::time::timeout(ECHO_TIMEOUT, self.next_payload())
            .await
            .map_err(|_| ClientError::new("no echo from server", None))?
    }

    async fn next_payload(&mut self) -> Result<String, ClientError> {
        while let Some(frame) = self.stream.next().await {
            match frame? {
                Message::Text(text) => return Ok(text.as_str().to_string()),
                Message::Binary(bytes) => return Ok(String::from_utf8_lossy(&bytes).into_owned()),
                Message::Close(_) => break,
                other => debug!(frame = ?other, "Skipping control frame"),
            }
        }
        warn!("Echo channel closed");
        Err(ClientError::new("echo channel closed", None))
    }

    /// Closes the socket.
    pub async fn close(mut self) -> Result<(), ClientError> {
        self.stream.close(None).await?;
        Ok(())
    }
}
