//! WebSocket connection loop.
//!
//! Reads event frames from the client and hands channel commands to the
//! connection's [`ChannelRouter`], while draining the connection's
//! outbound queue back onto the socket.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use super::lifecycle::ConnectionLifecycleManager;
use super::messages::EventFrame;
use super::router::ChannelRouter;
use super::session::ConnectionHandle;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Registers the connection with the lifecycle manager, which sends `env`.
/// - Dispatches inbound channel frames without waiting for their results.
/// - Writes queued `env`/`exec` events as text frames.
pub async fn run_connection(socket: WebSocket, lifecycle: Arc<ConnectionLifecycleManager>) {
    let (handle, mut outbound_rx) = ConnectionHandle::new();
    let connection_id = handle.id();
    let router = lifecycle.connect(handle).await;
    tracing::info!(connection = %connection_id, "ws connection opened");

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming frame from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => handle_text_message(&text, &router),
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(connection = %connection_id, error = %e, "ws read failed");
                        break;
                    }
                    _ => {}
                }
            }
            // Event queued by the lifecycle manager or a finished command
            event = outbound_rx.recv() => {
                let Some(event) = event else { break };
                let json = serde_json::to_string(&event.into_frame()).unwrap_or_default();
                if ws_tx.send(Message::text(json)).await.is_err() {
                    break;
                }
            }
        }
    }

    tracing::info!(connection = %connection_id, "ws connection closed");
}

/// Decodes a text frame and routes it.
fn handle_text_message(text: &str, router: &ChannelRouter) {
    match serde_json::from_str::<EventFrame>(text) {
        Ok(frame) => {
            let _ = router.route_frame(&frame);
        }
        Err(e) => {
            tracing::warn!(error = %e, "dropping malformed ws frame");
        }
    }
}
