//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::HeaderMap,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, MessageDraft, MessageId, PushFrame, SessionProfile},
    infrastructure::dto::websocket::ClientEvent,
    ui::{error::ApiError, state::AppState},
    usecase::AdmissionError,
};

use super::auth::bearer_token;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Browser clients cannot set headers on the handshake.
    #[serde(default)]
    pub token: Option<String>,
}

/// Admission runs before the upgrade completes. A refused handshake gets 401
/// (credential) or an empty 403 (admission gate).
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers).or(query.token);

    // Create a channel for this connection to receive events
    let (tx, rx) = mpsc::unbounded_channel();

    let session = match state
        .connect_participant_usecase
        .execute(token.as_deref(), tx)
        .await
    {
        Ok(session) => session,
        Err(AdmissionError::Unauthorized(e)) => {
            tracing::warn!("Rejecting handshake: {}", e);
            return Err(ApiError::Unauthorized);
        }
        Err(AdmissionError::Denied(_)) => return Err(ApiError::Capacity),
    };

    let connection_id = session.connection_id;
    let failed_state = state.clone();
    let failed_id = connection_id.clone();
    Ok(ws
        .on_failed_upgrade(move |e| {
            tracing::warn!("WebSocket upgrade failed: {}", e);
            tokio::spawn(async move {
                failed_state
                    .disconnect_participant_usecase
                    .execute(&failed_id)
                    .await;
            });
        })
        .on_upgrade(move |socket| handle_socket(socket, state, connection_id, rx)))
}

/// Spawns a task that receives frames from the rx channel and writes them to the WebSocket.
///
/// A `PushFrame::Close` closes the socket after everything queued before it.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<PushFrame>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                PushFrame::Text(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                PushFrame::Close => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    rx: mpsc::UnboundedReceiver<PushFrame>,
) {
    let (sender, mut receiver) = socket.split();

    // Spawn a task to write events pushed to this connection
    let mut send_task = pusher_loop(rx, sender);

    // Spawn a task to read events from this connection, one at a time
    let recv_state = state.clone();
    let recv_id = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", recv_id.as_str(), e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => dispatch(&recv_state, &recv_id, text.as_str()).await,
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", recv_id.as_str());
                    break;
                }
                // Ping/pong is handled by the WebSocket protocol
                _ => {}
            }
        }
    });

    // If any one of the tasks completes (or panics), abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Finalizer: runs on every close path
    state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await;
}

async fn dispatch(state: &AppState, connection_id: &ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Ignoring malformed frame from '{}': {}", connection_id.as_str(), e);
            return;
        }
    };

    match event {
        ClientEvent::Join(payload) => {
            if let Err(e) = state
                .join_session_usecase
                .execute(connection_id, SessionProfile::from(payload))
                .await
            {
                tracing::warn!("Join failed: {}", e);
            }
        }
        ClientEvent::Message(payload) => match MessageDraft::try_from(payload) {
            Ok(draft) => {
                if let Err(e) = state.send_message_usecase.execute(connection_id, draft).await {
                    tracing::warn!("Message from '{}' dropped: {}", connection_id.as_str(), e);
                }
            }
            Err(e) => tracing::warn!("Invalid message from '{}': {}", connection_id.as_str(), e),
        },
        ClientEvent::Delete(payload) => match MessageId::new(payload.id) {
            Ok(id) => {
                if let Err(e) = state.delete_message_usecase.execute(connection_id, id).await {
                    tracing::debug!("Delete from '{}' failed: {}", connection_id.as_str(), e);
                }
            }
            Err(e) => tracing::warn!("Invalid delete from '{}': {}", connection_id.as_str(), e),
        },
        ClientEvent::Typing(payload) => {
            state.relay_typing_usecase.typing(connection_id, payload).await;
        }
        ClientEvent::StopTyping => {
            state.relay_typing_usecase.stop_typing(connection_id).await;
        }
        ClientEvent::EmergencyExit => {
            state.emergency_exit_usecase.execute(connection_id).await;
        }
    }
}
