//! UseCase: 入力中インジケータの中継（送信者以外へ）

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{ConnectionId, LobbyRepository, MessagePusher, RelayEvent};

pub struct RelayTypingUseCase {
    lobby: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayTypingUseCase {
    pub fn new(lobby: Arc<dyn LobbyRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            lobby,
            message_pusher,
        }
    }

    pub async fn typing(&self, from: &ConnectionId, payload: Value) {
        self.relay(from, RelayEvent::Typing(payload)).await;
    }

    pub async fn stop_typing(&self, from: &ConnectionId) {
        self.relay(from, RelayEvent::StopTyping).await;
    }

    async fn relay(&self, from: &ConnectionId, event: RelayEvent) {
        let targets: Vec<ConnectionId> = self
            .lobby
            .connection_ids()
            .await
            .into_iter()
            .filter(|id| id != from)
            .collect();

        if let Err(e) = self.message_pusher.broadcast(targets, &event).await {
            tracing::debug!("Failed to relay typing indicator: {}", e);
        }
    }
}
