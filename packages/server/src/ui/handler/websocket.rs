//! WebSocket connection handlers (ingestion endpoint).
//!
//! Producers and viewers share the same endpoint: every connection may send
//! `gazeData` / `pageChange` envelopes and receives every broadcast.

use std::{sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::{Sink, SinkExt},
    stream::{Stream, StreamExt},
};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::Instant,
};

use crate::{
    domain::ConnectionId,
    infrastructure::dto::websocket::{InboundMessage, decode_inbound},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the connection's outbound channel into the WebSocket sink.
///
/// Also sends a Ping every `ping_interval` so idle viewers keep producing Pongs.
/// The task ends when a socket write fails or takes longer than `write_timeout`,
/// or when the registry drops the channel's sender. Either way the channel is
/// closed and later broadcasts to this connection fail.
fn pusher_loop<S>(
    mut rx: mpsc::Receiver<String>,
    mut sender: S,
    ping_interval: Duration,
    write_timeout: Duration,
) -> JoinHandle<()>
where
    S: Sink<Message> + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut ping = tokio::time::interval_at(Instant::now() + ping_interval, ping_interval);
        loop {
            let frame = tokio::select! {
                msg = rx.recv() => match msg {
                    Some(msg) => Message::Text(msg.into()),
                    None => break,
                },
                _ = ping.tick() => Message::Ping(Bytes::new()),
            };
            match tokio::time::timeout(write_timeout, sender.send(frame)).await {
                Ok(Ok(())) => {}
                Ok(Err(_)) => break,
                Err(_) => {
                    tracing::warn!("Socket write stalled for {:?}, closing", write_timeout);
                    break;
                }
            }
        }
        // Close the receiver first so in-flight broadcasts fail fast
        rx.close();
        let _ = tokio::time::timeout(write_timeout, sender.close()).await;
    })
}

/// Reads one frame at a time until the peer closes, the socket errors, nothing
/// arrives within `idle_timeout`, or `stop` is raised.
///
/// `stop` is only observed between frames, so a frame that has been read is
/// always dispatched to completion.
async fn read_loop<S>(
    mut receiver: S,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    idle_timeout: Duration,
    mut stop: watch::Receiver<bool>,
) where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        let next = tokio::select! {
            biased;
            _ = stop.changed() => {
                tracing::debug!("Reader for '{}' stopped", connection_id);
                break;
            }
            next = tokio::time::timeout(idle_timeout, receiver.next()) => next,
        };
        let msg = match next {
            Err(_) => {
                tracing::info!(
                    "Connection '{}' idle for {:?}, closing",
                    connection_id,
                    idle_timeout
                );
                break;
            }
            Ok(None) => break,
            Ok(Some(Err(e))) => {
                tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                break;
            }
            Ok(Some(Ok(msg))) => msg,
        };

        match msg {
            Message::Text(text) => dispatch(&state, connection_id, text.as_str()).await,
            Message::Binary(bytes) => {
                tracing::debug!(
                    "Ignoring {}-byte binary frame from '{}'",
                    bytes.len(),
                    connection_id
                );
            }
            Message::Close(_) => {
                tracing::info!("Connection '{}' requested close", connection_id);
                break;
            }
            // Pongs only refresh the idle timer; Pings are answered by axum
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }
}

/// Route one inbound text frame.
async fn dispatch(state: &AppState, connection_id: ConnectionId, text: &str) {
    match decode_inbound(text) {
        Ok(InboundMessage::PositionSample(sample)) => {
            tracing::trace!("Sample ({}, {}) from '{}'", sample.x, sample.y, connection_id);
            state.record_sample_usecase.execute(sample);
        }
        Ok(InboundMessage::PageChange(change)) => {
            if let Err(e) = state.change_page_usecase.execute(change).await {
                tracing::warn!("Failed to handle page change from '{}': {}", connection_id, e);
            }
        }
        Ok(InboundMessage::Unknown(kind)) => {
            tracing::info!(
                "Ignoring message of unknown type '{}' from '{}'",
                kind,
                connection_id
            );
        }
        Err(e) => {
            tracing::warn!("Dropping malformed message from '{}': {}", connection_id, e);
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();

    let connection = state.connection;

    // Create a channel for this connection to receive broadcasts
    let (tx, rx) = mpsc::channel(connection.outbound_capacity);
    let count = state.connect_viewer_usecase.execute(connection_id, tx).await;
    tracing::info!("Connection '{}' opened ({} connected)", connection_id, count);

    let (sender, receiver) = socket.split();
    let (stop_tx, stop_rx) = watch::channel(false);

    let mut send_task = pusher_loop(
        rx,
        sender,
        connection.ping_interval,
        connection.write_timeout,
    );
    let mut recv_task = tokio::spawn(read_loop(
        receiver,
        state.clone(),
        connection_id,
        connection.idle_timeout,
        stop_rx,
    ));

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => {
            // Let the reader finish the frame it is dispatching
            let _ = stop_tx.send(true);
            let _ = (&mut recv_task).await;
        }
    };

    // Single cleanup path for every way a connection can end
    match state
        .disconnect_viewer_usecase
        .execute(&connection_id)
        .await
    {
        Some(remaining) => tracing::info!(
            "Connection '{}' closed ({} connected)",
            connection_id,
            remaining
        ),
        None => tracing::info!(
            "Connection '{}' closed (already removed after a failed write)",
            connection_id
        ),
    }
}
