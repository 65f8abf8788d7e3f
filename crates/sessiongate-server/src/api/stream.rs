// ABOUTME: WebSocket event streaming for real-time delivery of session events.
// ABOUTME: Subscribes to the event pool's broadcast channel and forwards each event as a JSON text frame.

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, Stream, StreamExt};
use sessiongate_core::Event;
use tokio::sync::broadcast;
use tokio::time::{Instant, interval_at};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

const PING_PERIOD: Duration = Duration::from_secs(10);

/// Convert a broadcast receiver into a stream of WebSocket text frames.
fn event_messages(rx: broadcast::Receiver<Event>) -> impl Stream<Item = Message> {
    BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => {
                let data = serde_json::to_string(&event)
                    .map_err(|e| tracing::error!("error while encoding event to JSON: {}", e))
                    .ok()?;
                Some(Message::Text(data.into()))
            }
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event stream subscriber lagged");
                None
            }
        }
    })
}

/// Hand the connection over to the streaming loop.
pub fn stream_events(ws: WebSocketUpgrade, rx: broadcast::Receiver<Event>) -> Response {
    ws.on_upgrade(move |socket| pump(socket, rx))
}

/// Push events until the client goes away or the event pool is dropped.
async fn pump(socket: WebSocket, rx: broadcast::Receiver<Event>) {
    tracing::debug!("event stream opened");

    let (mut sink, mut incoming) = socket.split();
    let mut events = Box::pin(event_messages(rx));
    let mut ping = interval_at(Instant::now() + PING_PERIOD, PING_PERIOD);

    loop {
        tokio::select! {
            next = events.next() => {
                let Some(msg) = next else { break };
                if let Err(e) = sink.send(msg).await {
                    tracing::debug!("event stream write failed: {}", e);
                    break;
                }
            }
            _ = ping.tick() => {
                if sink.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
            msg = incoming.next() => match msg {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    let _ = sink.close().await;
    tracing::debug!("event stream closed");
}
