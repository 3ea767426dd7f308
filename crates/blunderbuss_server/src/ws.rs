//! WebSocket echo channel.
//!
//! Frames carry no game semantics: every text or binary frame is sent back
//! unchanged.

use axum::extract::ws::{Message, WebSocketUpgrade};
use axum::response::Response;
use futures::{Sink, SinkExt, Stream, StreamExt};
use std::fmt::Display;
use tracing::{debug, info, instrument, warn};

/// Upgrades the connection and runs [`echo`] on it.
#[instrument(skip(ws))]
pub async fn upgrade(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(|socket| async move {
        info!("WebSocket connected");
        let (outgoing, incoming) = socket.split();
        let echoed = echo(incoming, outgoing).await;
        info!(echoed, "WebSocket closed");
    })
}

/// Sends every text and binary frame from `incoming` back on `outgoing`.
///
/// Stops at a close frame, the end of the stream, or the first read or
/// write error. Pings and pongs are answered by the transport and skipped
/// here. Returns the number of frames echoed.
pub async fn echo<R, W, E>(mut incoming: R, mut outgoing: W) -> usize
where
    R: Stream<Item = Result<Message, E>> + Unpin,
    W: Sink<Message> + Unpin,
    E: Display,
    W::Error: Display,
{
    let mut echoed = 0;
    while let Some(frame) = incoming.next().await {
        let message = match frame {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "WebSocket read failed");
                break;
            }
        };

        match message {
            Message::Close(_) => {
                debug!("Close frame received");
                break;
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            Message::Text(_) | Message::Binary(_) => {
                if let Err(e) = outgoing.send(message).await {
                    warn!(error = %e, "WebSocket write failed");
                    break;
                }
                echoed += 1;
            }
        }
    }
    echoed
}
